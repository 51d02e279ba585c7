//! Word-level smoothing of text streams.

use std::time::Duration;

use async_stream::try_stream;
use futures::{Stream, StreamExt as _};

use crate::{error::Result, model::TextStream};

/// Re-chunk `fragments` so that every yielded chunk ends on a word boundary.
///
/// A chunk is everything up to and including the next run of non-whitespace
/// followed by whitespace. Whatever is left once `fragments` ends is yielded
/// as-is. An error ends the stream, dropping any partial word still buffered.
pub fn smooth_words(fragments: TextStream, delay: Duration) -> TextStream {
    Box::pin(words(fragments, delay))
}

fn words(mut fragments: TextStream, delay: Duration) -> impl Stream<Item = Result<String>> {
    try_stream! {
        let mut buffer = String::new();

        while let Some(fragment) = fragments.next().await {
            buffer.push_str(&fragment?);

            while let Some(end) = word_boundary(&buffer) {
                let chunk: String = buffer.drain(..end).collect();
                yield chunk;

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        if !buffer.is_empty() {
            yield buffer;
        }
    }
}

/// The byte offset just past the first word and its trailing whitespace.
fn word_boundary(buffer: &str) -> Option<usize> {
    let word_start = buffer.find(|c: char| !c.is_whitespace())?;
    let word_len = buffer[word_start..].find(char::is_whitespace)?;
    let space_start = word_start + word_len;
    let space_len = buffer[space_start..]
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(buffer.len() - space_start);

    Some(space_start + space_len)
}

#[cfg(test)]
#[path = "smooth_tests.rs"]
mod tests;
