use std::{sync::Arc, time::Duration};

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use quill_llm::provider::mock::{MockModel, RecordedRequest};
use serde_json::json;

use super::*;
use crate::{DeltaEvent, ErrorKind, sink::MemorySink};

fn mock() -> MockModel {
    MockModel::new("openai/gpt-4o".parse().unwrap())
}

fn text_events(contents: &[&str]) -> Vec<DeltaEvent> {
    contents
        .iter()
        .map(|c| DocumentKind::Text.delta((*c).to_owned()))
        .collect()
}

fn code_events(contents: &[&str]) -> Vec<DeltaEvent> {
    contents
        .iter()
        .map(|c| DocumentKind::Code.delta((*c).to_owned()))
        .collect()
}

#[test_log::test(tokio::test)]
async fn test_text_create_appends_fragments() {
    let model = mock().with_text(["Hello", " ", "world"]);
    let sink = MemorySink::new();
    let request = GenerationRequest::create(DocumentKind::Text, "Greetings", Arc::new(model.clone()))
        .with_smooth_delay(Duration::ZERO);

    let draft = generate(request, &sink).await.unwrap();

    assert_eq!(draft, "Hello world");
    assert_eq!(sink.events(), text_events(&["Hello", " ", "world"]));
    assert_eq!(model.requests(), vec![RecordedRequest::Text(TextRequest {
        system: TEXT_PROMPT.to_owned(),
        prompt: "Greetings".to_owned(),
        prediction: None,
        chunking: Chunking::Word {
            delay: Duration::ZERO
        },
    })]);
}

#[test_log::test(tokio::test)]
async fn test_code_create_replaces_draft() {
    let model = mock().with_code(["def f():", "def f():\n    pass"]);
    let sink = MemorySink::new();
    let request = GenerationRequest::create(DocumentKind::Code, "A function", Arc::new(model.clone()));

    let draft = generate(request, &sink).await.unwrap();

    assert_eq!(draft, "def f():\n    pass");
    assert_eq!(sink.events(), code_events(&["def f():", "def f():\n    pass"]));

    let requests = model.requests();
    assert_matches!(&requests[..], [RecordedRequest::Object(request)] => {
        assert_eq!(request.system, CODE_PROMPT);
        assert_eq!(request.prompt, "A function");
        assert_eq!(request.schema_name, "code");
        assert_eq!(request.schema["required"], json!(["code"]));
        assert_eq!(request.schema["properties"]["code"]["type"], "string");
        assert_eq!(request.schema["additionalProperties"], false);
        assert!(request.schema.get("$schema").is_none());
    });
}

#[test_log::test(tokio::test)]
async fn test_update_embeds_existing_content_in_system_instruction() {
    let model = mock().with_text(["Shorter."]);

    for existing in ["First version.", "Second version."] {
        let request = GenerationRequest::update(
            DocumentKind::Text,
            existing,
            "Make it shorter",
            Arc::new(model.clone()),
        );
        generate(request, &MemorySink::new()).await.unwrap();
    }

    let requests = model
        .requests()
        .into_iter()
        .map(|request| match request {
            RecordedRequest::Text(request) => request,
            RecordedRequest::Object(_) => panic!("unexpected object request"),
        })
        .collect::<Vec<_>>();

    assert_eq!(requests.len(), 2);
    assert!(requests[0].system.contains("First version."));
    assert!(requests[1].system.contains("Second version."));
    assert_ne!(requests[0].system, requests[1].system);
    assert_eq!(requests[0].prompt, "Make it shorter");
    assert_eq!(requests[1].prompt, "Make it shorter");
    assert_eq!(requests[0].prediction.as_deref(), Some("First version."));
}

#[test_log::test(tokio::test)]
async fn test_code_update_embeds_existing_content() {
    let model = mock().with_code(["x = 2"]);
    let request = GenerationRequest::update(
        DocumentKind::Code,
        "x = 1",
        "Increment x",
        Arc::new(model.clone()),
    );

    let draft = generate(request, &MemorySink::new()).await.unwrap();

    assert_eq!(draft, "x = 2");
    assert_matches!(&model.requests()[..], [RecordedRequest::Object(request)] => {
        assert_eq!(request.system, update_document_prompt("x = 1", DocumentKind::Code));
        assert_eq!(request.prompt, "Increment x");
    });
}

#[test_log::test(tokio::test)]
async fn test_failure_keeps_emitted_events() {
    let model = mock().with_text(["one ", "two "]).failing_with("provider down");
    let sink = MemorySink::new();
    let request = GenerationRequest::create(DocumentKind::Text, "Numbers", Arc::new(model));

    let error = generate(request, &sink).await.unwrap_err();

    assert_eq!(
        error,
        Error::Llm(quill_llm::Error::Generation("provider down".to_owned()))
    );
    assert_eq!(error.kind(), ErrorKind::UpstreamFailure);
    assert_eq!(sink.events(), text_events(&["one ", "two "]));
}

#[test_log::test(tokio::test)]
async fn test_code_failure_keeps_emitted_events() {
    let model = mock().with_code(["a", "ab"]).failing_with("provider down");
    let sink = MemorySink::new();
    let request = GenerationRequest::create(DocumentKind::Code, "Letters", Arc::new(model));

    let error = generate(request, &sink).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::UpstreamFailure);
    assert_eq!(sink.events(), code_events(&["a", "ab"]));
}

#[test_log::test(tokio::test)]
async fn test_empty_increments_are_skipped() {
    let model = mock()
        .with_text(["", "Hello", "", " world", ""])
        .with_objects([json!({}), json!({"code": ""}), json!({"code": "x"})]);

    let sink = MemorySink::new();
    let request = GenerationRequest::create(DocumentKind::Text, "t", Arc::new(model.clone()));
    assert_eq!(generate(request, &sink).await.unwrap(), "Hello world");
    assert_eq!(sink.events(), text_events(&["Hello", " world"]));

    let sink = MemorySink::new();
    let request = GenerationRequest::create(DocumentKind::Code, "t", Arc::new(model));
    assert_eq!(generate(request, &sink).await.unwrap(), "x");
    assert_eq!(sink.events(), code_events(&["x"]));
}

#[test_log::test(tokio::test)]
async fn test_empty_stream_yields_empty_draft() {
    for kind in [DocumentKind::Text, DocumentKind::Code] {
        let sink = MemorySink::new();
        let request = GenerationRequest::create(kind, "Nothing", Arc::new(mock()));

        assert_eq!(generate(request, &sink).await.unwrap(), "");
        assert!(sink.events().is_empty());
    }
}

#[test_log::test(tokio::test)]
async fn test_code_must_be_a_string() {
    let model = mock().with_objects([json!({"code": "x"}), json!({"code": 42})]);
    let sink = MemorySink::new();
    let request = GenerationRequest::create(DocumentKind::Code, "t", Arc::new(model));

    let error = generate(request, &sink).await.unwrap_err();

    assert_matches!(error, Error::Schema(_));
    assert_eq!(sink.events(), code_events(&["x"]));
}

#[test_log::test(tokio::test)]
async fn test_final_code_object_is_validated() {
    let model = mock().with_objects([json!({"code": "x", "extra": true})]);
    let sink = MemorySink::new();
    let request = GenerationRequest::create(DocumentKind::Code, "t", Arc::new(model));

    let error = generate(request, &sink).await.unwrap_err();

    assert_matches!(error, Error::Schema(_));
    assert_eq!(error.kind(), ErrorKind::UpstreamFailure);
}

#[test_log::test(tokio::test)]
async fn test_cancelled_generation() {
    let model = mock().with_text(["never"]);
    let sink = MemorySink::new();
    let request = GenerationRequest::create(DocumentKind::Text, "t", Arc::new(model));
    let token = CancellationToken::new();
    token.cancel();

    let error = generate_with_cancellation(request, &sink, token)
        .await
        .unwrap_err();

    assert_eq!(error, Error::Cancelled);
    assert_eq!(error.kind(), ErrorKind::Cancelled);
    assert!(sink.events().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_uncancelled_generation_completes() {
    let model = mock().with_text(["done"]);
    let sink = MemorySink::new();
    let request = GenerationRequest::create(DocumentKind::Text, "t", Arc::new(model));

    let draft = generate_with_cancellation(request, &sink, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(draft, "done");
}
