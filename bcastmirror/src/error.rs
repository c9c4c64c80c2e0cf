use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = MirrorError> = std::result::Result<T, E>;

/// Errors that can be encountered during a mirror run.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("unable to build http client")]
    ClientBuild(#[source] reqwest::Error),
    #[error("failed to read {url}: {source}")]
    RemoteFetch {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("failed to write {url}: {source}")]
    RemoteWrite {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("could not determine {0}")]
    IdentifierResolution(&'static str),
}

impl MirrorError {
    pub fn fetch(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        MirrorError::RemoteFetch {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn write(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        MirrorError::RemoteWrite {
            url: url.into(),
            source: source.into(),
        }
    }
}
