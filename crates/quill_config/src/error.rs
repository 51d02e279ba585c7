use camino::Utf8PathBuf;

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read config file {path}: {error}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {error}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        error: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
