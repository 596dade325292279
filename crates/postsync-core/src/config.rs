//! Where the index and the post files live, and how posts are written.
//!
//! Every engine call takes a [`SyncConfig`]; nothing is resolved from the
//! current directory behind the caller's back. An optional `postsync.toml`
//! overrides the defaults:
//!
//! ```toml
//! index_path = "data/posts.json"
//! documents_dir = "data/posts"
//! extension = "mdx"
//! list_style = "inline"   # or "block"
//! tags_key = "tags"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SyncError;
use crate::frontmatter::ListStyle;

/// Conventional config file name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "postsync.toml";

/// Resolved paths and formatting options for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub index_path: PathBuf,
    pub documents_dir: PathBuf,
    /// File extension without the leading dot.
    pub extension: String,
    pub list_style: ListStyle,
    /// Frontmatter key the tags of a new post are written under.
    pub tags_key: String,
}

impl SyncConfig {
    /// The historical layout (`data/posts.json`, `data/posts/*.mdx`) under `root`.
    #[must_use]
    pub fn with_root(root: &Path) -> Self {
        Self {
            index_path: root.join("data").join("posts.json"),
            documents_dir: root.join("data").join("posts"),
            extension: "mdx".to_string(),
            list_style: ListStyle::default(),
            tags_key: "tags".to_string(),
        }
    }

    /// Path of the post file for `slug`.
    #[must_use]
    pub fn document_path(&self, slug: &str) -> PathBuf {
        self.documents_dir.join(format!("{slug}.{}", self.extension))
    }

    /// Load configuration for `root`.
    ///
    /// Reads `explicit` if given, otherwise `root/postsync.toml` when it
    /// exists, otherwise uses the defaults. Relative paths in the file are
    /// resolved against `root`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the file cannot be read or parsed.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, SyncError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = root.join(CONFIG_FILE_NAME);
                if !candidate.is_file() {
                    return Ok(Self::with_root(root));
                }
                candidate
            }
        };

        let text = std::fs::read_to_string(&path)
            .map_err(|e| SyncError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(root, &text)
            .map_err(|e| SyncError::Config(format!("{}: {e}", path.display())))
    }

    /// Apply a TOML config document on top of the defaults for `root`.
    ///
    /// # Errors
    ///
    /// Returns the TOML error message if the document is invalid.
    pub fn from_toml(root: &Path, text: &str) -> Result<Self, String> {
        let file: ConfigFile = toml::from_str(text).map_err(|e| e.to_string())?;
        let mut config = Self::with_root(root);

        if let Some(index_path) = file.index_path {
            config.index_path = root.join(index_path);
        }
        if let Some(documents_dir) = file.documents_dir {
            config.documents_dir = root.join(documents_dir);
        }
        if let Some(extension) = file.extension {
            let extension = extension.trim_start_matches('.');
            if extension.is_empty() {
                return Err("extension must not be empty".to_string());
            }
            config.extension = extension.to_string();
        }
        if let Some(list_style) = file.list_style {
            config.list_style = list_style;
        }
        if let Some(tags_key) = file.tags_key {
            if tags_key.trim().is_empty() {
                return Err("tags_key must not be empty".to_string());
            }
            config.tags_key = tags_key;
        }

        Ok(config)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    index_path: Option<PathBuf>,
    documents_dir: Option<PathBuf>,
    extension: Option<String>,
    list_style: Option<ListStyle>,
    tags_key: Option<String>,
}
