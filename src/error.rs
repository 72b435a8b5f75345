use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PreprocessError>;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("npy error: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),

    #[error("could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("could not replace output file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("input has no '{0}' column")]
    MissingColumn(String),

    #[error("output directory {0} already exists")]
    OutputExists(PathBuf),
}

impl PreprocessError {
    pub fn config(msg: impl Into<String>) -> Self {
        PreprocessError::Config(msg.into())
    }
}
