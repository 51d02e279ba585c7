use futures::{StreamExt as _, TryStreamExt as _};
use pretty_assertions::assert_eq;

use super::*;
use crate::model::Chunking;

fn id() -> ModelId {
    "openai/gpt-4o".parse().unwrap()
}

#[tokio::test]
async fn test_text_fragments_are_yielded_verbatim() {
    let model = MockModel::new(id()).with_text(["Hello", " ", "world"]);
    let request = TextRequest::new("system", "prompt").with_chunking(Chunking::Word {
        delay: std::time::Duration::ZERO,
    });

    let fragments = model
        .stream_text(request.clone())
        .await
        .unwrap()
        .try_collect::<Vec<_>>()
        .await
        .unwrap();

    assert_eq!(fragments, vec!["Hello", " ", "world"]);
    assert_eq!(model.requests(), vec![RecordedRequest::Text(request)]);
}

#[tokio::test]
async fn test_code_values() {
    let model = MockModel::new(id()).with_code(["a", "ab"]);
    let request = ObjectRequest::new("system", "prompt", "code", json!({}));

    let values = model
        .stream_object(request.clone())
        .await
        .unwrap()
        .try_collect::<Vec<_>>()
        .await
        .unwrap();

    assert_eq!(values, vec![json!({"code": "a"}), json!({"code": "ab"})]);
    assert_eq!(model.requests(), vec![RecordedRequest::Object(request)]);
}

#[tokio::test]
async fn test_failure_follows_script() {
    let model = MockModel::new(id())
        .with_text(["one", "two"])
        .failing_with("boom");

    let items = model
        .stream_text(TextRequest::new("system", "prompt"))
        .await
        .unwrap()
        .collect::<Vec<_>>()
        .await;

    assert_eq!(items, vec![
        Ok("one".to_owned()),
        Ok("two".to_owned()),
        Err(Error::Generation("boom".to_owned())),
    ]);
}

#[tokio::test]
async fn test_clones_share_recorded_requests() {
    let model = MockModel::new(id());
    let handle: crate::ModelHandle = Arc::new(model.clone());

    handle
        .stream_text(TextRequest::new("system", "prompt"))
        .await
        .unwrap();

    assert_eq!(model.requests().len(), 1);
}

#[test]
fn test_registry_contents() {
    let registry = test_registry().unwrap();

    let ids = registry
        .models()
        .map(|model| model.id().to_string())
        .collect::<Vec<_>>();

    assert_eq!(ids, vec!["openai/gpt-4o", "openai/gpt-4o-mini", "openai/o1-mini"]);
}

#[tokio::test]
async fn test_registry_text_reassembles() {
    let registry = test_registry().unwrap();
    let model = registry.get(&id()).unwrap();

    let text = model
        .stream_text(TextRequest::new("system", "prompt"))
        .await
        .unwrap()
        .try_collect::<Vec<_>>()
        .await
        .unwrap()
        .concat();

    assert_eq!(text, "This is a test document.");
}
