use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed speed store at {path}: {source}")]
    Malformed {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode speed store: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to persist speed store: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, Error>;
