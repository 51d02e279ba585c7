//! Server-sent event fixtures for the model router.

use serde_json::{Value, json};

/// Render `events` as an SSE body, terminated by the `[DONE]` marker.
#[must_use]
pub fn body(events: &[Value]) -> String {
    let mut body = String::new();
    for event in events {
        body.push_str("data: ");
        body.push_str(&event.to_string());
        body.push_str("\n\n");
    }

    body.push_str("data: [DONE]\n\n");
    body
}

/// A chat completion chunk carrying a single content fragment.
#[must_use]
pub fn content_chunk(content: &str) -> Value {
    json!({
        "id": "gen-test",
        "model": "openai/gpt-4o",
        "choices": [{ "delta": { "role": "assistant", "content": content }, "finish_reason": null }]
    })
}

/// The final chat completion chunk.
#[must_use]
pub fn stop_chunk() -> Value {
    json!({
        "id": "gen-test",
        "model": "openai/gpt-4o",
        "choices": [{ "delta": {}, "finish_reason": "stop" }]
    })
}

/// A full SSE body streaming `fragments` followed by a stop chunk.
#[must_use]
pub fn content_body(fragments: &[&str]) -> String {
    let mut events: Vec<Value> = fragments.iter().map(|f| content_chunk(f)).collect();
    events.push(stop_chunk());
    body(&events)
}
