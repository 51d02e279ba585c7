use std::collections::HashMap;

use assert_matches::assert_matches;
use camino_tempfile::tempdir;
use indoc::indoc;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let config = AppConfig::from_file(&dir.path().join("config.toml")).unwrap();

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.mode, Mode::Production);
    assert_eq!(config.router.api_key_env, "BYOROUTER_API_KEY");
    assert_eq!(config.generation.default_model.to_string(), "openai/gpt-4o");
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, indoc! {r#"
        mode = "test"

        [router]
        base_url = "http://localhost:9999"

        [generation]
        default_model = "anthropic/claude-3-haiku"
        smooth_delay_ms = 0
    "#})
    .unwrap();

    let config = AppConfig::from_file(&path).unwrap();

    assert_eq!(config.mode, Mode::Test);
    assert_eq!(config.router.base_url, "http://localhost:9999");
    assert_eq!(config.router.app_name, "quill");
    assert_eq!(config.generation.smooth_delay(), Duration::ZERO);
    assert_eq!(
        config.generation.default_model.to_string(),
        "anthropic/claude-3-haiku"
    );
}

#[test]
fn test_invalid_file_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[generation]\ndefault_model = \"no-separator\"\n").unwrap();

    assert_matches!(AppConfig::from_file(&path), Err(Error::Parse { .. }));
}

#[test]
fn test_unknown_fields_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[router]\napi_key = \"secret\"\n").unwrap();

    assert_matches!(AppConfig::from_file(&path), Err(Error::Parse { .. }));
}

#[test]
fn test_env_overrides() {
    let env = HashMap::from([
        (ENV_MODE, "TEST"),
        (ENV_ROUTER_BASE_URL, "http://router.local"),
        (ENV_DEFAULT_MODEL, "openai/o1-mini"),
    ]);

    let mut config = AppConfig::default();
    config
        .apply_env(|key| env.get(key).map(ToString::to_string))
        .unwrap();

    assert_eq!(config.mode, Mode::Test);
    assert_eq!(config.router.base_url, "http://router.local");
    assert_eq!(config.generation.default_model.to_string(), "openai/o1-mini");
}

#[test]
fn test_invalid_env_override() {
    let mut config = AppConfig::default();

    let error = config
        .apply_env(|key| (key == ENV_MODE).then(|| "staging".to_owned()))
        .unwrap_err();

    assert_matches!(error, Error::InvalidValue { key: ENV_MODE, value } if value == "staging");
}
