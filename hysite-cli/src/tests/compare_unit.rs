//! Focused unit tests covering compare CLI configuration and report loading.

use super::helpers::{utf8_tempdir, write_utf8};
use super::*;
use crate::compare::{CompareArgs, CompareConfig, load_reports};
use camino::Utf8PathBuf;
use hysite_narrative::Report;
use rstest::rstest;

fn complete_args() -> CompareArgs {
    CompareArgs {
        reports_path: Some(Utf8PathBuf::from("reports.json")),
        question: Some("Which site is better?".to_owned()),
        user_key: Some("ada@example.com".to_owned()),
        ..CompareArgs::default()
    }
}

#[rstest]
#[case::reports(ARG_REPORTS, ENV_COMPARE_REPORTS)]
#[case::question(ARG_QUESTION, ENV_COMPARE_QUESTION)]
#[case::user_key(ARG_USER_KEY, ENV_COMPARE_USER_KEY)]
fn converting_without_required_fields_errors(
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let mut args = complete_args();
    match field {
        ARG_REPORTS => args.reports_path = None,
        ARG_QUESTION => args.question = None,
        _ => args.user_key = None,
    }
    let err = CompareConfig::try_from(args).expect_err("missing field should error");
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
fn converting_keeps_chat_defaults() {
    let config = CompareConfig::try_from(complete_args()).expect("config should build");
    assert_eq!(config.question, "Which site is better?");
    assert_eq!(config.chat.model, "llama3-8b-8192");
    assert_eq!(
        config.chat.completions_url(),
        "https://api.groq.com/openai/v1/chat/completions"
    );
}

#[rstest]
fn load_reports_decodes_json() {
    let (_tmp, root) = utf8_tempdir();
    let path = root.join("reports.json");
    write_utf8(
        &path,
        br#"[{"name":"Site A","summary":"Strong port access."},{"name":"Site B","summary":"Cheap land."}]"#,
    );
    let reports = load_reports(&path).expect("reports should decode");
    assert_eq!(
        reports,
        vec![
            Report {
                name: "Site A".to_owned(),
                summary: "Strong port access.".to_owned(),
            },
            Report {
                name: "Site B".to_owned(),
                summary: "Cheap land.".to_owned(),
            },
        ]
    );
}

#[rstest]
fn load_reports_reports_missing_files() {
    let (_tmp, root) = utf8_tempdir();
    let path = root.join("absent.json");
    match load_reports(&path).expect_err("missing file should error") {
        CliError::OpenReports { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("expected OpenReports, found {other:?}"),
    }
}
