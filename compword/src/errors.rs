/// Error types for compword.
///
/// Only a handful of things can actually go wrong: the word list cannot be
/// read, its bytes are not valid UTF-8, the configuration is malformed, or the
/// word list turns out to be empty. Everything else, including "no compound
/// word exists", is a regular outcome and is reported as an empty result.
///
/// ```rust,ignore
/// match compword::run(&config) {
///     Ok(outcome) => println!("{}", outcome.word),
///     Err(FinderError::EmptyLexicon) => // Nothing to search,
///     Err(FinderError::FileNotFound(path)) => // Handle missing word list,
///     Err(e) => // Handle other errors
/// }
/// ```
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for finder operations
pub type FinderResult<T> = Result<T, FinderError>;

/// Errors that can occur while loading a word list or preparing a search
#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Word list is empty; nothing to search")]
    EmptyLexicon,
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid UTF-8 in file {path}: {source}")]
    EncodingError {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
}

/// Canonicalize the path and strip UNC prefixes so that
/// paths reported in errors look the same on every platform.
pub fn unify_path(original: &Path) -> PathBuf {
    let canonical = original
        .canonicalize()
        .unwrap_or_else(|_| original.to_path_buf());
    strip_unc_prefix(&canonical)
}

/// Strips the Windows UNC prefix (\\?\) from a path if present
fn strip_unc_prefix(p: &Path) -> PathBuf {
    let s = p.display().to_string();
    if let Some(stripped) = s.strip_prefix(r"\\?\") {
        PathBuf::from(stripped)
    } else {
        p.to_path_buf()
    }
}

impl FinderError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn encoding_error(path: impl Into<PathBuf>, source: std::string::FromUtf8Error) -> Self {
        let path = path.into();
        Self::EncodingError {
            path: unify_path(&path),
            source,
        }
    }

    /// Maps an I/O error raised while opening or reading `path` onto the
    /// matching variant.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}

impl From<config::ConfigError> for FinderError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
