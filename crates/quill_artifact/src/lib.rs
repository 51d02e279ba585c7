//! Incremental generation of text and code documents.
//!
//! [`generate`] drives a model stream for a [`GenerationRequest`], appends
//! one [`DeltaEvent`] per increment to a [`DataStreamSink`], and returns the
//! final draft.

mod engine;
pub mod error;
mod event;
mod kind;
pub mod prompts;
mod request;
pub mod sink;

pub use engine::{generate, generate_with_cancellation};
pub use error::{Error, ErrorKind};
pub use event::DeltaEvent;
pub use kind::{Accumulation, DocumentKind};
pub use request::{
    Action, ActionKind, DEFAULT_SMOOTH_DELAY, GenerationParams, GenerationRequest,
};
pub use sink::{ChannelSink, DataStreamSink, JsonLinesSink, MemorySink};
