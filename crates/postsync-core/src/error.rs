//! Error types for postsync.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level result type for postsync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Which half of a post a failed write belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Index,
    Document,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Index => f.write_str("index"),
            Artifact::Document => f.write_str("document"),
        }
    }
}

/// Top-level error type for postsync.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid title: it must contain at least one letter or digit")]
    InvalidTitle,

    #[error("a post with slug \"{slug}\" already exists")]
    SlugCollision { slug: String },

    #[error("document {} already exists but has no index entry", path.display())]
    DocumentExists { path: PathBuf },

    #[error("failed to write {artifact} {}: {source}", path.display())]
    Persistence {
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read index {}: {source}", path.display())]
    IndexLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("index {} is not a valid post list: {message}", path.display())]
    IndexParse { path: PathBuf, message: String },

    #[error("frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading or writing a frontmatter block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontmatterError {
    #[error("no '---' frontmatter marker at the start of the document")]
    NotFound,

    #[error("no closing '---' frontmatter marker found")]
    Unterminated,

    #[error("invalid value for '{key}': {message}")]
    Invalid { key: String, message: String },

    #[error("unsupported value for '{key}': {reason}")]
    UnsupportedValue { key: String, reason: String },
}
