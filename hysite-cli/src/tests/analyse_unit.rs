//! Focused unit tests covering analyse CLI configuration and validation.

use super::helpers::{CONSTANT_MODEL, utf8_tempdir, write_utf8};
use super::*;
use crate::analyse::{AnalyseArgs, AnalyseConfig, config_from_layers_for_test};
use camino::Utf8PathBuf;
use hysite_core::RequestError;
use rstest::{fixture, rstest};

#[fixture]
fn located() -> AnalyseArgs {
    AnalyseArgs {
        latitude: Some(12.9716),
        longitude: Some(77.5946),
        radius_km: Some(5.0),
        ..AnalyseArgs::default()
    }
}

#[rstest]
#[case::latitude(ARG_LATITUDE, ENV_ANALYSE_LATITUDE)]
#[case::longitude(ARG_LONGITUDE, ENV_ANALYSE_LONGITUDE)]
#[case::radius(ARG_RADIUS_KM, ENV_ANALYSE_RADIUS_KM)]
fn converting_without_required_fields_errors(
    located: AnalyseArgs,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let mut args = located;
    match field {
        ARG_LATITUDE => args.latitude = None,
        ARG_LONGITUDE => args.longitude = None,
        _ => args.radius_km = None,
    }
    let err = AnalyseConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn converting_fills_defaults(located: AnalyseArgs) {
    let config = AnalyseConfig::try_from(located).expect("config should build");
    assert_eq!(config.query.weights, hysite_core::CategoryWeights::new(1.0, 1.0, 1.0));
    assert_eq!(config.query.description, "");
    assert_eq!(config.assets_url, "http://localhost:8000/api/assets/list/");
    assert_eq!(config.model, Utf8PathBuf::from("model.json"));
    assert!(config.narrative);
    assert_eq!(config.chat.model, "llama3-8b-8192");
}

#[rstest]
fn converting_honours_overrides(located: AnalyseArgs) {
    let args = AnalyseArgs {
        weight_infra: Some(2.0),
        weight_econ: Some(0.0),
        description: Some("Export terminal".to_owned()),
        no_narrative: Some(true),
        chat_model: Some("llama3-70b-8192".to_owned()),
        chat_base_url: Some("http://127.0.0.1:8080/v1".to_owned()),
        ..located
    };
    let config = AnalyseConfig::try_from(args).expect("config should build");
    assert_eq!(config.query.weights, hysite_core::CategoryWeights::new(2.0, 1.0, 0.0));
    assert_eq!(config.query.description, "Export terminal");
    assert!(!config.narrative);
    assert_eq!(config.chat.model, "llama3-70b-8192");
    assert_eq!(config.chat.base_url, "http://127.0.0.1:8080/v1");
}

#[rstest]
fn validate_rejects_out_of_range_latitude(located: AnalyseArgs) {
    let (_tmp, root) = utf8_tempdir();
    let model = root.join("model.json");
    write_utf8(&model, CONSTANT_MODEL);
    let args = AnalyseArgs {
        latitude: Some(95.0),
        model: Some(model),
        ..located
    };
    let config = AnalyseConfig::try_from(args).expect("config should build");
    let err = config.validate().expect_err("latitude out of range");
    assert!(
        matches!(err, CliError::InvalidQuery(RequestError::InvalidLatitude { .. })),
        "unexpected error {err:?}"
    );
}

#[rstest]
fn validate_reports_missing_model(located: AnalyseArgs) {
    let (_tmp, root) = utf8_tempdir();
    let model = root.join("missing.json");
    let args = AnalyseArgs {
        model: Some(model.clone()),
        ..located
    };
    let config = AnalyseConfig::try_from(args).expect("config should build");
    match config.validate().expect_err("model is missing") {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_MODEL);
            assert_eq!(path, model);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_rejects_model_directory(located: AnalyseArgs) {
    let (_tmp, root) = utf8_tempdir();
    let args = AnalyseArgs {
        model: Some(root.clone()),
        ..located
    };
    let config = AnalyseConfig::try_from(args).expect("config should build");
    match config.validate().expect_err("model is a directory") {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_MODEL),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "latitude": "north" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "latitude": 1.0,
            "longitude": 2.0,
            "radius_km": 10.0,
            "assets_url": "http://from-file/assets/",
        }),
        None,
    );
    composer.push_environment(json!({
        "radius_km": 20.0,
        "weight_env": 0.5,
    }));
    composer.push_cli(json!({ "radius_km": 30.0 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.query.latitude, 1.0);
    assert_eq!(config.query.radius_km, 30.0);
    assert_eq!(config.query.weights.environmental, 0.5);
    assert_eq!(config.assets_url, "http://from-file/assets/");
}

#[rstest]
fn parses_negative_longitudes() {
    let cli = Cli::try_parse_from([
        "hysite",
        "analyse",
        "--latitude",
        "51.5",
        "--longitude",
        "-0.12",
        "--radius-km",
        "3",
        "--no-narrative",
    ])
    .expect("arguments should parse");
    match cli.command {
        Command::Analyse(args) => {
            assert_eq!(args.longitude, Some(-0.12));
            assert_eq!(args.no_narrative, Some(true));
        }
        Command::Compare(_) => panic!("expected analyse command"),
    }
}
