//! `hookline command` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use hookline_core::config::HooklineConfig;
use hookline_timeline::{CommandBuilder, ExecParams, TimelineConfig};

use crate::cli::CommandArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `command` command.
///
/// Builds the instrumented command for one container or hook and prints it.
pub fn execute(
    args: CommandArgs,
    config: &HooklineConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let timeline_config = TimelineConfig::from_core(config);
    timeline_config.validate()?;

    let params = ExecParams {
        delay_secs: args.delay,
        termination_secs: args.termination_seconds,
        exit_code: args.exit_code,
        dependent_container: args.hook_for.clone(),
    };

    let tokens = CommandBuilder::new(&timeline_config).build(&args.name, &params)?;
    info!(
        name = %args.name,
        hook = params.is_hook(),
        "built emission command"
    );

    let report = CommandReport {
        name: args.name,
        hook_for: args.hook_for,
        params,
        command: tokens,
    };
    writer.render(&report)?;
    Ok(())
}

/// Built command, ready to paste into a workload spec.
#[derive(Serialize)]
pub struct CommandReport {
    /// Name tagged on the emitted events
    pub name: String,
    /// Dependent container for hook commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_for: Option<String>,
    /// Parameters the command was built from
    pub params: ExecParams,
    /// Command tokens (`[shell, "-c", script]`)
    pub command: Vec<String>,
}

impl Render for CommandReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        match &self.hook_for {
            Some(dependent) => writeln!(
                w,
                "Hook {} (events -> {})",
                self.name.bold(),
                dependent.bold()
            )?,
            None => writeln!(w, "Container {}", self.name.bold())?,
        }

        if let [shell, flag, script] = self.command.as_slice() {
            writeln!(w, "  {} {}", shell.cyan(), flag)?;
            for line in script.lines() {
                writeln!(w, "    {line}")?;
            }
        } else {
            for token in &self.command {
                writeln!(w, "  {token}")?;
            }
        }
        Ok(())
    }
}
