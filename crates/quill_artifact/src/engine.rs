//! The document generation engine.
//!
//! A generation drives exactly one model stream to completion. Every
//! non-empty increment is folded into the draft according to the document
//! kind's [`Accumulation`] rule and forwarded to the sink as one event, in
//! arrival order. A failing stream aborts the generation, leaving the events
//! already appended in place.

use async_stream::try_stream;
use futures::{Stream, StreamExt as _, TryStreamExt as _};
use quill_llm::{Chunking, ModelHandle, ObjectRequest, TextRequest};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    kind::{Accumulation, DocumentKind},
    prompts::{CODE_PROMPT, TEXT_PROMPT, update_document_prompt},
    request::{Action, GenerationRequest},
    sink::DataStreamSink,
};

/// Name of the schema code documents are generated with.
const CODE_SCHEMA_NAME: &str = "code";

/// The structured output of a code generation.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct CodeOutput {
    code: String,
}

/// Generate a document, forwarding progress to `sink`.
///
/// Returns the final draft. Dropping the returned future stops the
/// generation and releases the model stream.
pub async fn generate(request: GenerationRequest, sink: &dyn DataStreamSink) -> Result<String> {
    let GenerationRequest {
        kind,
        action,
        model,
        smooth_delay,
    } = request;

    debug!(%kind, action = action.name(), model = %model.id(), "Generating document.");

    let draft = match kind {
        DocumentKind::Text => {
            let increments = text_increments(&model, action, smooth_delay).await?;
            drive(increments, kind, sink).await?
        }
        DocumentKind::Code => {
            let increments = code_increments(&model, action).await?;
            drive(increments, kind, sink).await?
        }
    };

    debug!(%kind, len = draft.len(), "Document generated.");
    Ok(draft)
}

/// Like [`generate`], but stops as soon as `token` is cancelled.
///
/// Events appended before cancellation stay in the sink.
pub async fn generate_with_cancellation(
    request: GenerationRequest,
    sink: &dyn DataStreamSink,
    token: CancellationToken,
) -> Result<String> {
    tokio::select! {
        biased;
        () = token.cancelled() => {
            debug!("Generation cancelled.");
            Err(Error::Cancelled)
        }
        result = generate(request, sink) => result,
    }
}

async fn drive(
    increments: impl Stream<Item = Result<String>>,
    kind: DocumentKind,
    sink: &dyn DataStreamSink,
) -> Result<String> {
    let accumulation: Accumulation = kind.accumulation();
    let mut draft = String::new();

    tokio::pin!(increments);
    while let Some(increment) = increments.try_next().await? {
        if increment.is_empty() {
            continue;
        }

        trace!(%kind, len = increment.len(), "Received increment.");
        accumulation.apply(&mut draft, &increment);
        sink.append(kind.delta(increment)).await?;
    }

    Ok(draft)
}

async fn text_increments(
    model: &ModelHandle,
    action: Action,
    smooth_delay: std::time::Duration,
) -> Result<impl Stream<Item = Result<String>>> {
    let request = match action {
        Action::Create { title } => TextRequest::new(TEXT_PROMPT, title),
        Action::Update {
            existing_content,
            description,
        } => TextRequest::new(
            update_document_prompt(&existing_content, DocumentKind::Text),
            description,
        )
        .with_prediction(existing_content),
    }
    .with_chunking(Chunking::Word {
        delay: smooth_delay,
    });

    let fragments = model.stream_text(request).await?;
    Ok(fragments.map_err(Error::from))
}

async fn code_increments(
    model: &ModelHandle,
    action: Action,
) -> Result<impl Stream<Item = Result<String>>> {
    let (system, prompt) = match action {
        Action::Create { title } => (CODE_PROMPT.to_owned(), title),
        Action::Update {
            existing_content,
            description,
        } => (
            update_document_prompt(&existing_content, DocumentKind::Code),
            description,
        ),
    };

    let request = ObjectRequest::new(system, prompt, CODE_SCHEMA_NAME, code_schema()?);
    let objects = model.stream_object(request).await?;

    Ok(code_values(objects.map_err(Error::from)))
}

/// The current `code` value of every partial object.
///
/// Objects without a `code` string yet yield an empty increment. The last
/// object must be a complete [`CodeOutput`].
fn code_values(
    objects: impl Stream<Item = Result<Value>>,
) -> impl Stream<Item = Result<String>> {
    try_stream! {
        let mut last = None;

        tokio::pin!(objects);
        while let Some(object) = objects.try_next().await? {
            let code = match object.get("code") {
                None => String::new(),
                Some(Value::String(code)) => code.clone(),
                Some(other) => Err(Error::Schema(format!("`code` is not a string: {other}")))?,
            };

            last = Some(object);
            yield code;
        }

        if let Some(object) = last {
            serde_json::from_value::<CodeOutput>(object)
                .map_err(|error| Error::Schema(error.to_string()))?;
        }
    }
}

fn code_schema() -> Result<Value> {
    let mut schema = serde_json::to_value(schemars::schema_for!(CodeOutput))?;
    if let Some(schema) = schema.as_object_mut() {
        schema.remove("$schema");
    }

    Ok(schema)
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
