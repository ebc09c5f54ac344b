//! `hookline config` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use hookline_core::config::HooklineConfig;
use hookline_timeline::TimelineConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::commands::{ConfigSource, load_config};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Sections accepted by `config show --section`.
const SECTIONS: [&str; 3] = ["general", "emission", "parser"];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    source: &ConfigSource,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(source, writer).await,
        ConfigAction::Show { section } => execute_show(source, section, writer).await,
    }
}

/// Execute the config validate subcommand.
///
/// Loads the configuration, then also checks the stricter rules the
/// emission builder applies, reporting the first error found.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails.
async fn execute_validate(source: &ConfigSource, writer: &OutputWriter) -> Result<(), CliError> {
    info!(source = %source, "validating configuration");

    let errors = match load_config(source).await {
        Ok(config) => match TimelineConfig::from_core(&config).validate() {
            Ok(()) => Vec::new(),
            Err(e) => vec![e.to_string()],
        },
        Err(e) => vec![e.to_string()],
    };

    let report = ConfigValidationReport {
        source: source.to_string(),
        valid: errors.is_empty(),
        errors,
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Displays the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Config` if loading fails or `CliError::Command` if section name is invalid.
async fn execute_show(
    source: &ConfigSource,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(source = %source, "loading configuration");

    let config = load_config(source).await?;
    let report = ConfigReport::build(source, &config, section.as_deref())?;

    writer.render(&report)?;

    Ok(())
}

/// Configuration display report.
///
/// `config_toml` is only used for text rendering; JSON output carries the structured `config`.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Where the configuration came from
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Selected configuration as structured data
    pub config: toml::Value,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl ConfigReport {
    fn build(
        source: &ConfigSource,
        config: &HooklineConfig,
        section: Option<&str>,
    ) -> Result<Self, CliError> {
        let value = match section {
            None => toml::Value::try_from(config),
            Some("general") => toml::Value::try_from(&config.general),
            Some("emission") => toml::Value::try_from(&config.emission),
            Some("parser") => toml::Value::try_from(&config.parser),
            Some(other) => {
                return Err(CliError::Command(format!(
                    "unknown section: {} (expected: {})",
                    other,
                    SECTIONS.join(", ")
                )));
            }
        }
        .map_err(|e| CliError::Command(format!("failed to serialize config: {e}")))?;

        let config_toml = toml::to_string_pretty(&value)
            .unwrap_or_else(|e| format!("(serialization error: {})", e));

        Ok(Self {
            source: source.to_string(),
            section: section.map(str::to_owned),
            config: value,
            config_toml,
        })
    }
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Where the configuration came from
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
