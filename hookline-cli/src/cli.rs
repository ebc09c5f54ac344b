//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use hookline_timeline::Check;

/// Default configuration file, used only when it exists.
pub const DEFAULT_CONFIG_PATH: &str = "hookline.toml";

/// Hookline -- lifecycle event emission and timeline verification.
///
/// Use `hookline <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "hookline", version, about, long_about = None)]
pub struct Cli {
    /// Path to the hookline.toml configuration file (default: ./hookline.toml if present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the instrumented command for a container or lifecycle hook.
    Command(CommandArgs),

    /// Parse captured container output and run relational checks.
    Verify(VerifyArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- command ----

/// Build the event-emitting command for one container or hook.
#[derive(Args, Debug)]
pub struct CommandArgs {
    /// Name tagged on every emitted event (e.g. `regular-1`, `PreStop-regular-1`).
    pub name: String,

    /// Seconds to stay running (container) or to sleep between hook events (hook).
    #[arg(long, default_value_t = 0)]
    pub delay: u32,

    /// Seconds to keep running after SIGTERM before reporting exit (containers only).
    #[arg(long, default_value_t = 0)]
    pub termination_seconds: u32,

    /// Exit code reported and returned by the command (0-255).
    #[arg(long, default_value_t = 0)]
    pub exit_code: i32,

    /// Build a hook command whose events go to this container's stdout.
    #[arg(long)]
    pub hook_for: Option<String>,
}

// ---- verify ----

/// Verify captured output against a list of checks.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Captured stdout of one container, as NAME=PATH (repeatable).
    #[arg(long = "capture", value_parser = parse_capture, required = true)]
    pub captures: Vec<Capture>,

    /// Check to run, e.g. "run-together regular-1 PreStop-regular-1" (repeatable).
    #[arg(long = "check")]
    pub checks: Vec<Check>,

    /// Run every check instead of stopping at the first failure.
    #[arg(long)]
    pub keep_going: bool,

    /// Test case name used in narration.
    #[arg(long)]
    pub test_name: Option<String>,
}

/// One `--capture NAME=PATH` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// Container name the output belongs to.
    pub name: String,
    /// File holding the captured stdout.
    pub path: PathBuf,
}

fn parse_capture(value: &str) -> Result<Capture, String> {
    let (name, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{value}'"))?;
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=PATH, got '{value}'"));
    }
    Ok(Capture {
        name: name.to_owned(),
        path: PathBuf::from(path),
    })
}

// ---- config ----

/// Manage hookline configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, emission, parser).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_command_defaults() {
        let cli = Cli::try_parse_from(["hookline", "command", "regular-1"]).expect("parse succeeded");
        match cli.command {
            Commands::Command(args) => {
                assert_eq!(args.name, "regular-1");
                assert_eq!(args.delay, 0);
                assert_eq!(args.termination_seconds, 0);
                assert_eq!(args.exit_code, 0);
                assert!(args.hook_for.is_none());
            }
            _ => panic!("expected Command command"),
        }
    }

    #[test]
    fn test_cli_parse_command_hook() {
        let cli = Cli::try_parse_from([
            "hookline",
            "command",
            "PreStop-regular-1",
            "--delay",
            "1",
            "--hook-for",
            "regular-1",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Command(args) => {
                assert_eq!(args.delay, 1);
                assert_eq!(args.hook_for, Some("regular-1".to_owned()));
            }
            _ => panic!("expected Command command"),
        }
    }

    #[test]
    fn test_cli_parse_command_negative_delay_fails() {
        let args = Cli::try_parse_from(["hookline", "command", "a", "--delay", "-1"]);
        assert!(args.is_err(), "delay must be unsigned");
    }

    #[test]
    fn test_cli_parse_verify() {
        let cli = Cli::try_parse_from([
            "hookline",
            "verify",
            "--capture",
            "regular-1=/tmp/regular-1.log",
            "--check",
            "run-together regular-1 PreStop-regular-1",
            "--check",
            "exits regular-1 0",
            "--keep-going",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Verify(args) => {
                assert_eq!(
                    args.captures,
                    vec![Capture {
                        name: "regular-1".to_owned(),
                        path: PathBuf::from("/tmp/regular-1.log"),
                    }]
                );
                assert_eq!(args.checks.len(), 2);
                assert_eq!(args.checks[1].to_string(), "exits regular-1 0");
                assert!(args.keep_going);
            }
            _ => panic!("expected Verify command"),
        }
    }

    #[test]
    fn test_cli_parse_verify_requires_capture() {
        let args = Cli::try_parse_from(["hookline", "verify", "--check", "starts a"]);
        assert!(args.is_err(), "verify without --capture should fail");
    }

    #[test]
    fn test_cli_parse_verify_rejects_bad_capture() {
        let args = Cli::try_parse_from(["hookline", "verify", "--capture", "no-equals-sign"]);
        assert!(args.is_err());
        let args = Cli::try_parse_from(["hookline", "verify", "--capture", "=path"]);
        assert!(args.is_err());
    }

    #[test]
    fn test_cli_parse_verify_rejects_bad_check() {
        let args = Cli::try_parse_from([
            "hookline",
            "verify",
            "--capture",
            "a=/tmp/a",
            "--check",
            "finishes a",
        ]);
        assert!(args.is_err(), "unknown check keyword should fail");
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["hookline", "config", "show", "--section", "emission"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => match config_args.action {
                ConfigAction::Show { section } => {
                    assert_eq!(section, Some("emission".to_owned()));
                }
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_global_options() {
        let cli = Cli::try_parse_from([
            "hookline",
            "-c",
            "/custom/hookline.toml",
            "config",
            "validate",
            "--output",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.config, Some(PathBuf::from("/custom/hookline.toml")));
        assert_eq!(cli.log_level, Some("debug".to_owned()));
        assert!(matches!(cli.output, OutputFormat::Json));
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        let args = Cli::try_parse_from(["hookline"]);
        assert!(args.is_err(), "should fail when no command provided");
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "hookline");

        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        for expected in ["command", "verify", "config"] {
            assert!(
                subcommands.contains(&expected),
                "should have '{expected}' subcommand"
            );
        }
    }
}
