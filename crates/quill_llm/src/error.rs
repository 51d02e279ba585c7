use quill_model::{ModelId, UserId};

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid model ID: {0}")]
    InvalidModelId(#[from] quill_model::Error),

    #[error("session has no authenticated user")]
    Unauthorized,

    #[error("user {0} has no active provider connection")]
    Forbidden(UserId),

    #[error("connection store error: {0}")]
    Storage(#[from] quill_storage::Error),

    #[error("router error: {0}")]
    Router(#[from] quill_router::Error),

    #[error("unknown model: {0}")]
    UnknownModel(ModelId),

    #[error("structured output does not match the schema: {0}")]
    Schema(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("model registry was never initialized")]
    RegistryUninitialized,

    #[error("model registry is already initialized")]
    RegistryAlreadyInitialized,

    #[error("missing env var: {0}")]
    MissingEnv(String),
}

/// The class of an error, for callers that map failures onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request itself is malformed.
    BadRequest,

    /// No user identity was present.
    Unauthorized,

    /// The user has no active provider connection.
    Forbidden,

    /// The connection store, the router or the model failed.
    UpstreamFailure,

    /// The process was set up incorrectly.
    Configuration,

    /// The caller abandoned the request.
    Cancelled,
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidModelId(_) => ErrorKind::BadRequest,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Storage(_)
            | Self::Router(_)
            | Self::UnknownModel(_)
            | Self::Schema(_)
            | Self::Generation(_) => ErrorKind::UpstreamFailure,
            Self::RegistryUninitialized | Self::RegistryAlreadyInitialized | Self::MissingEnv(_) => {
                ErrorKind::Configuration
            }
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
