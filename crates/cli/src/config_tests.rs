// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

fn fallback() -> Result<PathBuf, ConfigError> {
    Ok(PathBuf::from("/fallback/state"))
}

fn layer(api_url: &str) -> Overrides {
    Overrides { api_url: Some(api_url.to_string()), ..Overrides::default() }
}

#[test]
fn defaults_apply_without_layers() {
    let settings = Settings::resolve([], fallback).unwrap();
    assert_eq!(settings.api_url, None);
    assert_eq!(settings.poll_interval, Duration::from_secs(5));
    assert_eq!(settings.request_timeout, Duration::from_secs(30));
    assert_eq!(settings.state_dir, PathBuf::from("/fallback/state"));
    assert_eq!(settings.steps, default_catalog());
}

#[test]
fn later_layers_win_field_by_field() {
    let file = Overrides {
        api_url: Some("https://file".into()),
        poll_interval_ms: Some(1_000),
        ..Overrides::default()
    };
    let env = Overrides { api_token: Some("env-token".into()), ..layer("https://env") };
    let flags = Overrides { poll_interval_ms: Some(250), ..Overrides::default() };

    let settings = Settings::resolve([file, env, flags], fallback).unwrap();

    assert_eq!(settings.api_url.as_deref(), Some("https://env"));
    assert_eq!(settings.api_token.as_deref(), Some("env-token"));
    assert_eq!(settings.poll_interval, Duration::from_millis(250));
}

#[test]
fn explicit_state_dir_skips_fallback() {
    let flags = Overrides { state_dir: Some("/explicit".into()), ..Overrides::default() };
    let settings = Settings::resolve([flags], || Err(ConfigError::NoStateDir)).unwrap();
    assert_eq!(settings.state_dir, PathBuf::from("/explicit"));
}

#[test]
fn file_parses_steps() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
api_url = "https://cp.example.com"
poll_interval_ms = 2000

[[steps]]
id = "PLAN"
label = "Planning"
message = "Waiting for a plan"

[[steps]]
id = "DEPLOY"
label = "Deploying"
"#
    )
    .unwrap();

    let overrides = Overrides::from_file(file.path()).unwrap();
    let settings = Settings::resolve([overrides], fallback).unwrap();

    assert_eq!(settings.api_url.as_deref(), Some("https://cp.example.com"));
    assert_eq!(settings.steps.len(), 2);
    assert_eq!(settings.steps[0].id, "PLAN");
    assert_eq!(settings.steps[0].default_message, "Waiting for a plan");
    assert_eq!(settings.steps[1].default_message, "");
}

#[test]
fn duplicate_steps_are_rejected() {
    let steps = vec![
        StepDefinition::new("A", "First", ""),
        StepDefinition::new("A", "Again", ""),
    ];
    let overrides = Overrides { steps: Some(steps), ..Overrides::default() };
    let err = Settings::resolve([overrides], fallback).unwrap_err();
    assert!(matches!(err, ConfigError::Catalog(CatalogError::DuplicateId(ref id)) if id == "A"));
}

#[test]
fn unknown_keys_are_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_uri = \"typo\"").unwrap();
    let err = Overrides::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn missing_optional_file_is_empty_layer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert_eq!(Overrides::from_optional_file(&path).unwrap(), Overrides::default());
    assert!(matches!(Overrides::from_file(&path), Err(ConfigError::Read { .. })));
}
