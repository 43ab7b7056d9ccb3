//! Error types emitted by the `hysite` CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use hysite_core::{ModelError, RequestError};
use hysite_data::ClientBuildError;
use hysite_narrative::ComparisonError;
use hysite_scorer::AnalysisError;
use thiserror::Error;

/// Errors emitted by the `hysite` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the input.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the input.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the input.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The site query failed validation.
    #[error("invalid site query: {0}")]
    InvalidQuery(#[from] RequestError),
    /// The model artefact could not be loaded.
    #[error(transparent)]
    LoadModel(#[from] ModelError),
    /// Constructing the asset inventory client failed.
    #[error("failed to build asset inventory client for {url:?}: {source}")]
    BuildAssetSource {
        /// Inventory URL.
        url: String,
        /// Underlying build error.
        #[source]
        source: ClientBuildError,
    },
    /// Constructing the chat completion client failed.
    #[error("failed to build chat client for {base_url:?}: {source}")]
    BuildChatClient {
        /// Chat API base URL.
        base_url: String,
        /// Underlying build error.
        #[source]
        source: ClientBuildError,
    },
    /// The site analysis failed.
    #[error("site analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
    /// Opening the report list failed.
    #[error("failed to open reports at {path:?}: {source}")]
    OpenReports {
        /// Report list path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The report list JSON could not be decoded.
    #[error("failed to parse reports JSON at {path:?}: {source}")]
    ParseReports {
        /// Report list path.
        path: Utf8PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// The comparison request was rejected.
    #[error("report comparison rejected: {0}")]
    Comparison(#[from] ComparisonError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
