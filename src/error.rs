use std::path::PathBuf;

/// error type for jot operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed typed name (missing '#'): {0}")]
    MalformedName(String),

    #[error("unknown node kind '{kind}' in name: {name}")]
    UnknownKind { name: String, kind: String },

    #[error("base name contains '#': {0}")]
    InvalidBase(String),

    #[error("leaf content is not an integer at {path}: {content:?}")]
    InvalidInteger { path: String, content: String },

    #[error("path not found in tree: {0}")]
    PathNotFound(String),

    #[error("unsupported set element at {path}: sets may only contain scalars")]
    UnsupportedElement { path: String },

    #[error("unsupported value at {path}: {reason}")]
    UnsupportedValue { path: String, reason: String },

    #[error("backend selection: {0}")]
    BackendSelection(String),

    #[error("git {command} failed: {message}")]
    GitCommand { command: String, message: String },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
