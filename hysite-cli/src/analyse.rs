//! Analyse command implementation for the `hysite` CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use hysite_core::{AssetSource, CategoryWeights, ModelScorer, NarrativeSource, SiteQuery};
use hysite_data::inventory::DEFAULT_ASSETS_URL;
use hysite_data::{ChatClientConfig, GroqChatClient, HttpAssetSource};
use hysite_narrative::NarrativeWriter;
use hysite_scorer::{ArtefactModel, SiteAnalyser, SiteAssessmentReport};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::require_existing;
use crate::{
    ARG_ASSETS_URL, ARG_CHAT_BASE_URL, ARG_CHAT_MODEL, ARG_DESCRIPTION, ARG_LATITUDE,
    ARG_LONGITUDE, ARG_MODEL, ARG_NO_NARRATIVE, ARG_RADIUS_KM, ARG_WEIGHT_ECON, ARG_WEIGHT_ENV,
    ARG_WEIGHT_INFRA, CliError, DEFAULT_MODEL_PATH, ENV_ANALYSE_LATITUDE, ENV_ANALYSE_LONGITUDE,
    ENV_ANALYSE_RADIUS_KM, chat_config,
};

/// CLI arguments for the `analyse` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "analyse",
    long_about = "Score a candidate site for hydrogen infrastructure. Nearby \
                 assets are fetched from the inventory service, scored on \
                 infrastructure, environmental and economic factors, and \
                 combined by a trained model. Any option can come from CLI \
                 flags, configuration files, or HYSITE_CMDS_ANALYSE_* \
                 environment variables.",
    about = "Score a candidate site"
)]
#[ortho_config(prefix = "HYSITE")]
pub(crate) struct AnalyseArgs {
    /// Site latitude in degrees.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Site longitude in degrees.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Search radius in kilometres.
    #[arg(long = ARG_RADIUS_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) radius_km: Option<f64>,
    /// Weight of the infrastructure factor (default 1).
    #[arg(long = ARG_WEIGHT_INFRA, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_infra: Option<f64>,
    /// Weight of the environmental factor (default 1).
    #[arg(long = ARG_WEIGHT_ENV, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_env: Option<f64>,
    /// Weight of the economic factor (default 1).
    #[arg(long = ARG_WEIGHT_ECON, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_econ: Option<f64>,
    /// Free-text description passed to the narrative.
    #[arg(long = ARG_DESCRIPTION, value_name = "text")]
    #[serde(default)]
    pub(crate) description: Option<String>,
    /// Asset inventory listing URL.
    #[arg(long = ARG_ASSETS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) assets_url: Option<String>,
    /// Path to the JSON model artefact (default `model.json`).
    #[arg(long = ARG_MODEL, value_name = "path")]
    #[serde(default)]
    pub(crate) model: Option<Utf8PathBuf>,
    /// Skip the generated narrative.
    #[arg(
        long = ARG_NO_NARRATIVE,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) no_narrative: Option<bool>,
    /// Chat model used for the narrative.
    #[arg(long = ARG_CHAT_MODEL, value_name = "model")]
    #[serde(default)]
    pub(crate) chat_model: Option<String>,
    /// OpenAI-compatible chat API base URL.
    #[arg(long = ARG_CHAT_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) chat_base_url: Option<String>,
}

impl AnalyseArgs {
    pub(crate) fn into_config(self) -> Result<AnalyseConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AnalyseConfig::try_from(merged)
    }
}

/// Resolved `analyse` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AnalyseConfig {
    /// Site, radius, weights and description.
    pub(crate) query: SiteQuery,
    /// Asset inventory listing URL.
    pub(crate) assets_url: String,
    /// Model artefact path.
    pub(crate) model: Utf8PathBuf,
    /// Whether to request a narrative.
    pub(crate) narrative: bool,
    /// Chat client settings for the narrative.
    pub(crate) chat: ChatClientConfig,
}

impl AnalyseConfig {
    /// Reject invalid queries and missing artefacts before any network call.
    pub(crate) fn validate(&self) -> Result<(), CliError> {
        self.query.validate()?;
        require_existing(&self.model, ARG_MODEL)
    }
}

impl TryFrom<AnalyseArgs> for AnalyseConfig {
    type Error = CliError;

    fn try_from(args: AnalyseArgs) -> Result<Self, Self::Error> {
        let latitude = args.latitude.ok_or(CliError::MissingArgument {
            field: ARG_LATITUDE,
            env: ENV_ANALYSE_LATITUDE,
        })?;
        let longitude = args.longitude.ok_or(CliError::MissingArgument {
            field: ARG_LONGITUDE,
            env: ENV_ANALYSE_LONGITUDE,
        })?;
        let radius_km = args.radius_km.ok_or(CliError::MissingArgument {
            field: ARG_RADIUS_KM,
            env: ENV_ANALYSE_RADIUS_KM,
        })?;

        let weights = CategoryWeights::new(
            args.weight_infra.unwrap_or(1.0),
            args.weight_env.unwrap_or(1.0),
            args.weight_econ.unwrap_or(1.0),
        );
        let query = SiteQuery::new(latitude, longitude, radius_km)
            .with_weights(weights)
            .with_description(args.description.unwrap_or_default());

        Ok(Self {
            query,
            assets_url: args
                .assets_url
                .unwrap_or_else(|| DEFAULT_ASSETS_URL.to_owned()),
            model: args
                .model
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_MODEL_PATH)),
            narrative: !args.no_narrative.unwrap_or(false),
            chat: chat_config(args.chat_model, args.chat_base_url),
        })
    }
}

/// Collaborators for one analysis.
pub(crate) struct AnalyseServices {
    pub(crate) source: Box<dyn AssetSource>,
    pub(crate) model: Box<dyn ModelScorer>,
    pub(crate) narrative: Option<Box<dyn NarrativeSource>>,
}

/// Builds the collaborators for the current analyse invocation.
pub(super) trait AnalyseServicesBuilder {
    fn build(&self, config: &AnalyseConfig) -> Result<AnalyseServices, CliError>;
}

pub(super) struct DefaultAnalyseServicesBuilder;

impl AnalyseServicesBuilder for DefaultAnalyseServicesBuilder {
    fn build(&self, config: &AnalyseConfig) -> Result<AnalyseServices, CliError> {
        let source = HttpAssetSource::new(config.assets_url.clone()).map_err(|source| {
            CliError::BuildAssetSource {
                url: config.assets_url.clone(),
                source,
            }
        })?;
        let model = ArtefactModel::load(&config.model)?;
        let narrative: Option<Box<dyn NarrativeSource>> = if config.narrative {
            let client = GroqChatClient::with_config(config.chat.clone()).map_err(|source| {
                CliError::BuildChatClient {
                    base_url: config.chat.base_url.clone(),
                    source,
                }
            })?;
            Some(Box::new(NarrativeWriter::new(client)))
        } else {
            None
        };
        Ok(AnalyseServices {
            source: Box::new(source),
            model: Box::new(model),
            narrative,
        })
    }
}

pub(super) fn run_analyse(args: AnalyseArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_analyse_with(args, &DefaultAnalyseServicesBuilder, &mut stdout)
}

pub(super) fn run_analyse_with(
    args: AnalyseArgs,
    builder: &dyn AnalyseServicesBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let report = execute_analyse(args, builder)?;
    write_report(writer, &report)
}

fn execute_analyse(
    args: AnalyseArgs,
    builder: &dyn AnalyseServicesBuilder,
) -> Result<SiteAssessmentReport, CliError> {
    let config = args.into_config()?;
    config.validate()?;
    let services = builder.build(&config)?;
    log::debug!(
        "analysing site at ({}, {}) within {} km using model {}",
        config.query.latitude,
        config.query.longitude,
        config.query.radius_km,
        config.model
    );
    let analyser = SiteAnalyser::new(services.source, services.model);
    let assessment = match services.narrative {
        Some(narrative) => analyser.with_narrative(narrative).analyse(&config.query),
        None => analyser.analyse(&config.query),
    }?;
    Ok(assessment.report())
}

fn write_report(writer: &mut dyn Write, report: &SiteAssessmentReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<AnalyseConfig, CliError> {
    let merged = AnalyseArgs::merge_from_layers(layers).map_err(CliError::from)?;
    AnalyseConfig::try_from(merged)
}
