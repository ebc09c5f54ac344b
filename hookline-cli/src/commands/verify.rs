//! `hookline verify` command handler

use std::io::Write;

use serde::Serialize;
use tracing::{info, warn};

use hookline_core::Narrator;
use hookline_core::config::HooklineConfig;
use hookline_timeline::{
    ResultSet, TimelineConfig, TimelineParser, TracingNarrator, VerificationReport, Verifier,
};

use crate::cli::VerifyArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `verify` command.
///
/// Reads every captured output, parses the timelines, runs the checks
/// and renders a report. Returns `CliError::VerificationFailed` when any check fails.
pub async fn execute(
    args: VerifyArgs,
    config: &HooklineConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let timeline_config = TimelineConfig::from_core(config);
    timeline_config.validate()?;

    let mut blobs = Vec::with_capacity(args.captures.len());
    for capture in &args.captures {
        let content = tokio::fs::read_to_string(&capture.path).await?;
        info!(
            container = %capture.name,
            path = %capture.path.display(),
            bytes = content.len(),
            "read captured output"
        );
        blobs.push((capture.name.clone(), content));
    }

    let results = TimelineParser::from_config(&timeline_config).parse(blobs)?;

    let narrator = TracingNarrator;
    if let Some(name) = &args.test_name {
        narrator.test_name(name);
    }
    let verifier = Verifier::new(&results, &narrator);
    let report = if args.keep_going {
        verifier.evaluate(&args.checks)
    } else {
        verifier.evaluate_until_failure(&args.checks)
    };

    let failed = report.failures().count();
    let output = VerifyReport {
        test_name: args.test_name,
        skipped: args.checks.len() - report.outcomes.len(),
        results,
        report,
    };
    writer.render(&output)?;

    if failed > 0 {
        warn!(failed, total = args.checks.len(), "verification failed");
        return Err(CliError::VerificationFailed {
            failed,
            total: args.checks.len(),
        });
    }
    Ok(())
}

/// Verification outcome with the timelines it was computed from.
#[derive(Serialize)]
pub struct VerifyReport {
    /// Optional test case name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_name: Option<String>,
    /// Parsed timelines
    pub results: ResultSet,
    /// Per-check outcomes
    pub report: VerificationReport,
    /// Checks not run because an earlier check failed
    pub skipped: usize,
}

impl Render for VerifyReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(name) = &self.test_name {
            writeln!(w, "Test: {}", name.bold())?;
        }
        writeln!(w, "Timelines: {}", self.results.len())?;

        for outcome in &self.report.outcomes {
            match &outcome.error {
                None => writeln!(w, "  {} {}", "PASS".green().bold(), outcome.check)?,
                Some(err) => {
                    writeln!(w, "  {} {}", "FAIL".red().bold(), outcome.check)?;
                    writeln!(w, "       {}", err.to_string().red())?;
                }
            }
        }
        if self.skipped > 0 {
            writeln!(w, "  {} {} check(s)", "SKIP".yellow(), self.skipped)?;
        }

        if self.report.passed() {
            writeln!(w, "Result: {}", "PASSED".green().bold())?;
        } else {
            writeln!(w, "Result: {}", "FAILED".red().bold())?;
            writeln!(w)?;
            writeln!(w, "Events (by timestamp):")?;
            for line in self.results.to_string().lines() {
                writeln!(w, "  {line}")?;
            }
        }
        Ok(())
    }
}
