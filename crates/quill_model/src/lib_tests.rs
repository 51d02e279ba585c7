use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_parse_model_id() {
    let id: ModelId = "openai/gpt-4o".parse().unwrap();

    assert_eq!(id.provider().as_str(), "openai");
    assert_eq!(id.name(), "gpt-4o");
    assert_eq!(id.to_string(), "openai/gpt-4o");
}

#[test]
fn test_parse_model_id_rejects_malformed_input() {
    let cases = [
        ("", Error::Empty("model ID")),
        ("gpt-4o", Error::InvalidIdFormat("\"gpt-4o\" must match <provider>/<model>".to_owned())),
        ("/gpt-4o", Error::Empty("provider ID")),
        ("openai/", Error::Empty("model name")),
        ("/", Error::Empty("model name")),
        (
            "openai/gpt/4o",
            Error::InvalidIdFormat("\"openai/gpt/4o\" must contain exactly one '/'".to_owned()),
        ),
    ];

    for (input, expected) in cases {
        assert_eq!(ModelId::from_str(input).unwrap_err(), expected, "input: {input:?}");
    }
}

#[test]
fn test_parse_model_id_is_syntactic_only() {
    // Unknown providers and models are accepted, the router decides later.
    let id: ModelId = "not-a-provider/not-a-model".parse().unwrap();
    assert_eq!(id.provider().as_str(), "not-a-provider");
}

#[test]
fn test_model_id_serde() {
    let id: ModelId = serde_json::from_str(r#""anthropic/claude-3-haiku""#).unwrap();
    assert_eq!(id.name(), "claude-3-haiku");
    assert_eq!(
        serde_json::to_string(&id).unwrap(),
        r#""anthropic/claude-3-haiku""#
    );

    assert_matches!(serde_json::from_str::<ModelId>(r#""nope""#), Err(_));
}

#[test]
fn test_default_chat_model() {
    assert_eq!(ModelId::default_chat_model().to_string(), DEFAULT_CHAT_MODEL);
    assert_eq!(ProviderId::default().as_str(), DEFAULT_CHAT_PROVIDER);
}

#[test]
fn test_model_id_from_provider_and_name() {
    let id = ModelId::try_from((ProviderId::default(), "o1-mini")).unwrap();
    assert_eq!(id.to_string(), "openai/o1-mini");
}

#[test]
fn test_session_user_id() {
    assert_eq!(Session::anonymous().user_id(), None);
    assert_eq!(
        Session::for_user("u-1").user_id(),
        Some(&UserId::new("u-1"))
    );
}
