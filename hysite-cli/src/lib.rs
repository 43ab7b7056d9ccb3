//! Command-line interface for the hydrogen siting engine.
//!
//! `hysite analyse` scores a candidate site and prints the assessment as
//! JSON. `hysite compare` asks the report analyst a question about a list of
//! saved site reports. Options layer defaults, configuration files,
//! `HYSITE_*` environment variables and flags, in increasing precedence.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use hysite_data::ChatClientConfig;

mod analyse;
mod compare;
mod error;
mod fs;

use analyse::{AnalyseArgs, run_analyse};
use compare::{CompareArgs, run_compare};
pub use error::CliError;

const ARG_LATITUDE: &str = "latitude";
const ARG_LONGITUDE: &str = "longitude";
const ARG_RADIUS_KM: &str = "radius-km";
const ARG_WEIGHT_INFRA: &str = "weight-infra";
const ARG_WEIGHT_ENV: &str = "weight-env";
const ARG_WEIGHT_ECON: &str = "weight-econ";
const ARG_DESCRIPTION: &str = "description";
const ARG_ASSETS_URL: &str = "assets-url";
const ARG_MODEL: &str = "model";
const ARG_NO_NARRATIVE: &str = "no-narrative";
const ARG_CHAT_MODEL: &str = "chat-model";
const ARG_CHAT_BASE_URL: &str = "chat-base-url";
const ARG_REPORTS: &str = "reports";
const ARG_QUESTION: &str = "question";
const ARG_USER_KEY: &str = "user-key";

const ENV_ANALYSE_LATITUDE: &str = "HYSITE_CMDS_ANALYSE_LATITUDE";
const ENV_ANALYSE_LONGITUDE: &str = "HYSITE_CMDS_ANALYSE_LONGITUDE";
const ENV_ANALYSE_RADIUS_KM: &str = "HYSITE_CMDS_ANALYSE_RADIUS_KM";
const ENV_COMPARE_REPORTS: &str = "HYSITE_CMDS_COMPARE_REPORTS_PATH";
const ENV_COMPARE_QUESTION: &str = "HYSITE_CMDS_COMPARE_QUESTION";
const ENV_COMPARE_USER_KEY: &str = "HYSITE_CMDS_COMPARE_USER_KEY";

/// Default model artefact, resolved against the working directory.
const DEFAULT_MODEL_PATH: &str = "model.json";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, collaborators or
/// output fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Analyse(args) => run_analyse(args),
        Command::Compare(args) => run_compare(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "hysite",
    about = "Score and compare candidate sites for hydrogen infrastructure",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a site from nearby inventory assets and a trained model.
    Analyse(AnalyseArgs),
    /// Ask the report analyst to compare saved site reports.
    Compare(CompareArgs),
}

/// Resolve chat client settings, keeping defaults for absent overrides.
fn chat_config(model: Option<String>, base_url: Option<String>) -> ChatClientConfig {
    let defaults = ChatClientConfig::default();
    let with_model = match model {
        Some(model) => defaults.with_model(model),
        None => defaults,
    };
    match base_url {
        Some(base_url) => with_model.with_base_url(base_url),
        None => with_model,
    }
}

#[cfg(test)]
mod tests;
