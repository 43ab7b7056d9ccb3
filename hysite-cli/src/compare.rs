//! Compare command implementation for the `hysite` CLI.

use std::io::{BufReader, Write};
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use hysite_core::ChatCompletion;
use hysite_data::{ChatClientConfig, GroqChatClient};
use hysite_narrative::{ComparisonReply, ComparisonRequest, Report, ReportComparator};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::{open_utf8_file, require_existing};
use crate::{
    ARG_CHAT_BASE_URL, ARG_CHAT_MODEL, ARG_QUESTION, ARG_REPORTS, ARG_USER_KEY, CliError,
    ENV_COMPARE_QUESTION, ENV_COMPARE_REPORTS, ENV_COMPARE_USER_KEY, chat_config,
};

/// CLI arguments for the `compare` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "compare",
    long_about = "Ask the report analyst a question about saved site reports. \
                 The reports file holds a JSON array of {name, summary} \
                 objects. The conversation lasts for this invocation only.",
    about = "Compare saved site reports"
)]
#[ortho_config(prefix = "HYSITE")]
pub(crate) struct CompareArgs {
    /// Path to a JSON file listing the reports to compare.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) reports_path: Option<Utf8PathBuf>,
    /// Question for the analyst.
    #[arg(long = ARG_QUESTION, value_name = "text")]
    #[serde(default)]
    pub(crate) question: Option<String>,
    /// Key identifying the asking user's conversation.
    #[arg(long = ARG_USER_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) user_key: Option<String>,
    /// Chat model used for the comparison.
    #[arg(long = ARG_CHAT_MODEL, value_name = "model")]
    #[serde(default)]
    pub(crate) chat_model: Option<String>,
    /// OpenAI-compatible chat API base URL.
    #[arg(long = ARG_CHAT_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) chat_base_url: Option<String>,
}

impl CompareArgs {
    pub(crate) fn into_config(self) -> Result<CompareConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CompareConfig::try_from(merged)
    }
}

/// Resolved `compare` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompareConfig {
    pub(crate) reports_path: Utf8PathBuf,
    pub(crate) question: String,
    pub(crate) user_key: String,
    pub(crate) chat: ChatClientConfig,
}

impl TryFrom<CompareArgs> for CompareConfig {
    type Error = CliError;

    fn try_from(args: CompareArgs) -> Result<Self, Self::Error> {
        let reports_path = args.reports_path.ok_or(CliError::MissingArgument {
            field: ARG_REPORTS,
            env: ENV_COMPARE_REPORTS,
        })?;
        let question = args.question.ok_or(CliError::MissingArgument {
            field: ARG_QUESTION,
            env: ENV_COMPARE_QUESTION,
        })?;
        let user_key = args.user_key.ok_or(CliError::MissingArgument {
            field: ARG_USER_KEY,
            env: ENV_COMPARE_USER_KEY,
        })?;
        Ok(Self {
            reports_path,
            question,
            user_key,
            chat: chat_config(args.chat_model, args.chat_base_url),
        })
    }
}

/// Builds the chat client for the current compare invocation.
pub(super) trait CompletionClientBuilder {
    fn build(&self, config: &ChatClientConfig) -> Result<Arc<dyn ChatCompletion>, CliError>;
}

pub(super) struct DefaultCompletionClientBuilder;

impl CompletionClientBuilder for DefaultCompletionClientBuilder {
    fn build(&self, config: &ChatClientConfig) -> Result<Arc<dyn ChatCompletion>, CliError> {
        let client = GroqChatClient::with_config(config.clone()).map_err(|source| {
            CliError::BuildChatClient {
                base_url: config.base_url.clone(),
                source,
            }
        })?;
        Ok(Arc::new(client))
    }
}

pub(super) fn run_compare(args: CompareArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_compare_with(args, &DefaultCompletionClientBuilder, &mut stdout)
}

pub(super) fn run_compare_with(
    args: CompareArgs,
    builder: &dyn CompletionClientBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let reply = execute_compare(args, builder)?;
    let payload = serde_json::to_string_pretty(&reply).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

fn execute_compare(
    args: CompareArgs,
    builder: &dyn CompletionClientBuilder,
) -> Result<ComparisonReply, CliError> {
    let config = args.into_config()?;
    require_existing(&config.reports_path, ARG_REPORTS)?;
    let reports = load_reports(&config.reports_path)?;
    log::debug!(
        "comparing {} reports from {}",
        reports.len(),
        config.reports_path
    );
    let client = builder.build(&config.chat)?;
    let comparator = ReportComparator::new(client);
    let reply = comparator.compare(&ComparisonRequest {
        reports,
        question: config.question,
        user_key: config.user_key,
    })?;
    Ok(reply)
}

/// Loads a JSON-encoded report list from disk.
pub(super) fn load_reports(path: &Utf8Path) -> Result<Vec<Report>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenReports {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseReports {
        path: path.to_path_buf(),
        source,
    })
}
