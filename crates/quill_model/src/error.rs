pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid model ID format: {0}")]
    InvalidIdFormat(String),

    #[error("Invalid provider ID: {0}")]
    InvalidProviderId(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
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
