use futures::StreamExt as _;
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use quill_model::ConnectionId;
use quill_router::{
    Client, Error,
    types::request::{ChatCompletion, Prediction, RequestMessage},
};
use quill_test::sse;
use serde_json::json;

fn client(server: &MockServer) -> Client {
    Client::new("test-key".to_owned(), ConnectionId::new("conn-1"))
        .with_base_url(server.base_url())
        .with_app_name("quill-test")
        .with_max_retries(2)
}

#[test_log::test(tokio::test)]
async fn test_chat_completion_stream() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/chat/completions")
                .header("authorization", "Bearer test-key")
                .header("x-connection-id", "conn-1")
                .header("x-title", "quill-test")
                .json_body_partial(
                    json!({
                        "model": "openai/gpt-4o",
                        "stream": true,
                        "prediction": { "type": "content", "content": "old" }
                    })
                    .to_string(),
                );
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(sse::content_body(&["Hello", " ", "world"]));
        })
        .await;

    let mut request = ChatCompletion::new("openai/gpt-4o")
        .with_message(RequestMessage::system("Be brief."))
        .with_message(RequestMessage::user("Greet me."));
    request.prediction = Some(Prediction::Content {
        content: "old".to_owned(),
    });

    let chunks: Vec<_> = client(&server)
        .chat_completion_stream(request)
        .collect()
        .await;

    mock.assert_async().await;

    let content = chunks
        .iter()
        .filter_map(|chunk| chunk.as_ref().unwrap().content())
        .collect::<Vec<_>>();
    assert_eq!(content, vec!["Hello", " ", "world"]);
}

#[test_log::test(tokio::test)]
async fn test_mid_stream_error_chunk_ends_stream() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(200).body(sse::body(&[
                sse::content_chunk("partial"),
                json!({ "error": { "code": 500, "message": "provider crashed" } }),
            ]));
        })
        .await;

    let chunks: Vec<_> = client(&server)
        .chat_completion_stream(ChatCompletion::new("openai/gpt-4o"))
        .collect()
        .await;

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].as_ref().unwrap().content(), Some("partial"));
    assert!(matches!(&chunks[1], Err(Error::Api { code: 500, .. })));
}

#[test_log::test(tokio::test)]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(401).body("invalid connection");
        })
        .await;

    let chunks: Vec<_> = client(&server)
        .chat_completion_stream(ChatCompletion::new("openai/gpt-4o"))
        .collect()
        .await;

    assert_eq!(mock.hits_async().await, 1);
    assert_eq!(chunks.len(), 1);
    assert!(matches!(&chunks[0], Err(Error::Api { code: 401, message }) if message == "invalid connection"));
}

#[test_log::test(tokio::test)]
async fn test_transient_errors_are_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/providers");
            then.status(503).body("busy");
        })
        .await;

    let error = client(&server).providers().await.unwrap_err();

    // One attempt plus two retries.
    assert_eq!(mock.hits_async().await, 3);
    assert!(matches!(error, Error::Api { code: 503, .. }));
}

#[test_log::test(tokio::test)]
async fn test_list_providers() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/providers")
                .header("x-connection-id", "conn-1");
            then.status(200).json_body(json!({
                "data": [
                    { "provider": "openai", "displayName": "OpenAI" },
                    { "provider": "anthropic", "display_name": "Anthropic" }
                ]
            }));
        })
        .await;

    let providers = client(&server).providers().await.unwrap();

    let names = providers
        .data
        .iter()
        .map(|p| (p.provider.as_str(), p.display_name.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(names, vec![("openai", "OpenAI"), ("anthropic", "Anthropic")]);
}

#[test_log::test(tokio::test)]
async fn test_list_models_for_provider() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/models")
                .query_param("provider", "openai");
            then.status(200).json_body(json!({
                "data": [{ "id": "openai/gpt-4o", "name": "GPT-4o" }]
            }));
        })
        .await;

    let models = client(&server).models(Some("openai")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(models.data.len(), 1);
    assert_eq!(models.data[0].id, "openai/gpt-4o");
}
