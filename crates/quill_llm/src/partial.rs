//! Parsing of incomplete JSON objects.
//!
//! Structured output arrives as raw JSON text, one fragment at a time. After
//! every fragment the accumulated text is closed off (an open string is
//! terminated, open objects and arrays are closed) and parsed. Text that still
//! does not parse, such as a half-written key or literal, yields nothing until
//! more input arrives.

use serde_json::Value;

/// Accumulates JSON text and tracks the last successfully parsed value.
#[derive(Debug, Default)]
pub struct PartialObject {
    buffer: String,
    last: Option<Value>,
}

impl PartialObject {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `fragment`, returning the parsed value if it changed.
    pub fn push(&mut self, fragment: &str) -> Option<Value> {
        self.buffer.push_str(fragment);

        let value = parse_partial(&self.buffer)?;
        if self.last.as_ref() == Some(&value) {
            return None;
        }

        self.last = Some(value.clone());
        Some(value)
    }

    /// Parse the complete text strictly.
    pub fn finish(self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.buffer)
    }
}

/// Parse `text` as JSON, completing it first if it is cut off.
#[must_use]
pub fn parse_partial(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    serde_json::from_str(&complete(text)).ok()
}

fn complete(text: &str) -> String {
    let mut closers = vec![];
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => closers.push('}'),
            '[' => closers.push(']'),
            '}' | ']' => {
                closers.pop();
            }
            _ => {}
        }
    }

    let mut completed = if in_string {
        let mut s = text.to_owned();
        if escaped {
            s.pop();
        }
        s.push('"');
        s
    } else {
        text.trim_end().trim_end_matches(',').to_owned()
    };

    while let Some(closer) = closers.pop() {
        completed.push(closer);
    }

    completed
}

#[cfg(test)]
#[path = "partial_tests.rs"]
mod tests;
