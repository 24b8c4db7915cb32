//! Offline comparison of recorded catalog results
//!
//! Backs the `catalog-parity` binary: loads two tagged result dumps, one per
//! execution path, and runs them through the same verification pass the
//! dispatcher uses.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use parity_compare::{DiagnosticLog, ParityVerifier};
use parity_core::VerifierConfig;
use parity_value::{Dump, ResultValue};
use std::path::{Path, PathBuf};

/// Operation name recorded for offline comparisons
pub const OPERATION: &str = "compare";

/// Command-line definition
#[must_use]
pub fn command() -> Command {
    let config_arg = Arg::new("config")
        .long("config")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("TOML verifier configuration");

    Command::new("catalog-parity")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compare recorded direct and indirect catalog results")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("compare")
                .about("Compare two result dumps; exits 1 on divergence")
                .arg(
                    Arg::new("direct")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Result recorded on the direct path"),
                )
                .arg(
                    Arg::new("indirect")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Result recorded on the indirect path"),
                )
                .arg(config_arg.clone())
                .arg(
                    Arg::new("multi")
                        .long("multi")
                        .action(ArgAction::SetTrue)
                        .help("Treat both dumps as multi-item results"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print diagnostic entries as JSON"),
                ),
        )
        .subcommand(
            Command::new("dump")
                .about("Print the structured dump of a result")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Tagged result dump"),
                )
                .arg(config_arg),
        )
}

/// Load a verifier configuration, or the defaults when no file is given
///
/// # Errors
/// Fails if the file cannot be read or is not valid TOML
pub fn load_config(path: Option<&Path>) -> anyhow::Result<VerifierConfig> {
    let Some(path) = path else {
        return Ok(VerifierConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Load a tagged result dump
///
/// # Errors
/// Fails if the file cannot be read or is not a tagged value
pub fn load_value(path: &Path) -> anyhow::Result<ResultValue> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    ResultValue::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

/// How two dumps are compared and reported
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareOptions {
    /// Compare as multi-item results: size first, then item by item
    pub multi: bool,
    /// Report diagnostic entries as JSON
    pub json: bool,
}

/// Outcome of an offline comparison
#[derive(Debug, Clone)]
pub struct CompareReport {
    /// Whether the dumps are equivalent
    pub equivalent: bool,
    /// Text to print
    pub output: String,
}

/// Compare two recorded results
///
/// # Errors
/// Fails if `multi` is set and either value is not a sequence
pub fn compare(
    direct: &ResultValue,
    indirect: &ResultValue,
    config: &VerifierConfig,
    options: CompareOptions,
) -> anyhow::Result<CompareReport> {
    let log = DiagnosticLog::new();
    let verifier = ParityVerifier::new(&log)
        .with_budget(config.max_reported_divergences)
        .with_indent(config.dump_indent);

    let result = if options.multi {
        let d = direct
            .as_sequence()
            .context("direct result is not a sequence")?;
        let i = indirect
            .as_sequence()
            .context("indirect result is not a sequence")?;
        verifier.items(OPERATION, d, i)
    } else {
        verifier.single(OPERATION, direct, indirect)
    };

    let equivalent = match result {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(error = %err, "results diverge");
            false
        }
    };

    let output = if options.json {
        let mut json = log.to_json()?;
        json.push('\n');
        json
    } else if equivalent {
        "equivalent\n".to_string()
    } else {
        log.entries().iter().map(|e| e.entry.render()).collect()
    };

    Ok(CompareReport { equivalent, output })
}

/// Render the structured dump of a value
#[must_use]
pub fn dump(value: &ResultValue, config: &VerifierConfig) -> String {
    Dump::new("value", value)
        .with_indent(config.dump_indent)
        .to_string()
}
