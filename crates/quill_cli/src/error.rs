use std::io;

use quill_artifact::ErrorKind;

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] quill_config::Error),

    #[error(transparent)]
    Llm(#[from] quill_llm::Error),

    #[error(transparent)]
    Artifact(#[from] quill_artifact::Error),

    #[error("Connection store error: {0}")]
    Storage(#[from] quill_storage::Error),

    #[error("No user given. Use `--user` to specify one.")]
    MissingUser,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The class of the error, if it came from model resolution or
    /// generation.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Llm(error) => Some(error.kind()),
            Self::Artifact(error) => Some(error.kind()),
            Self::MissingUser => Some(ErrorKind::Unauthorized),
            Self::Config(_) => Some(ErrorKind::Configuration),
            Self::Storage(_) => Some(ErrorKind::UpstreamFailure),
            Self::Io(_) | Self::Json(_) => None,
        }
    }

    /// The process exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            Some(ErrorKind::BadRequest) => 2,
            Some(ErrorKind::Unauthorized) => 3,
            Some(ErrorKind::Forbidden) => 4,
            Some(ErrorKind::UpstreamFailure) => 5,
            Some(ErrorKind::Configuration) => 6,
            Some(ErrorKind::Cancelled) => 130,
            None => 1,
        }
    }
}
