pub use quill_llm::ErrorKind;

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Llm(#[from] quill_llm::Error),

    #[error("invalid generation request: {0}")]
    InvalidRequest(String),

    #[error("structured output does not match the schema: {0}")]
    Schema(String),

    #[error("data stream {0} was closed by the client")]
    SinkClosed(String),

    #[error("failed to write to the data stream: {0}")]
    Sink(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("generation was cancelled")]
    Cancelled,
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Llm(error) => error.kind(),
            Self::InvalidRequest(_) => ErrorKind::BadRequest,
            Self::Schema(_) | Self::Sink(_) | Self::Json(_) => ErrorKind::UpstreamFailure,
            Self::SinkClosed(_) | Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        if std::mem::discriminant(self) != std::mem::discriminant(other) {
            return false;
        }

        // Good enough for testing purposes
        format!("{self:?}") == format!("{other:?}")
    }
}
