//! Destinations for delta events.
//!
//! A sink is append-only and ordered. Events that were appended are never
//! retracted, even when generation fails afterwards.

use std::{fmt, io, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    event::DeltaEvent,
};

#[async_trait]
pub trait DataStreamSink: Send + Sync {
    /// Append one event.
    async fn append(&self, event: DeltaEvent) -> Result<()>;
}

/// Records events in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<DeltaEvent>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The events appended so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<DeltaEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl DataStreamSink for MemorySink {
    async fn append(&self, event: DeltaEvent) -> Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// Forwards events to a channel read by the client connection.
///
/// A dropped receiver means the client went away, which aborts generation.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    id: String,
    sender: mpsc::Sender<DeltaEvent>,
}

impl ChannelSink {
    /// Create a sink for the generation session `id`, buffering at most
    /// `capacity` events.
    #[must_use]
    pub fn new(id: impl Into<String>, capacity: usize) -> (Self, mpsc::Receiver<DeltaEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let sink = Self {
            id: id.into(),
            sender,
        };

        (sink, receiver)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl DataStreamSink for ChannelSink {
    async fn append(&self, event: DeltaEvent) -> Result<()> {
        trace!(stream = %self.id, "Forwarding event.");
        self.sender.send(event).await.map_err(|_| {
            debug!(stream = %self.id, "Data stream receiver dropped.");
            Error::SinkClosed(self.id.clone())
        })
    }
}

/// Writes every event as a single line of JSON.
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: io::Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W> fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonLinesSink").finish_non_exhaustive()
    }
}

#[async_trait]
impl<W: io::Write + Send> DataStreamSink for JsonLinesSink<W> {
    async fn append(&self, event: DeltaEvent) -> Result<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, &event)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
