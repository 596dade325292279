//! The JSON post index on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use postsync_core::entry::{Collection, IndexEntry};
use postsync_core::error::{Artifact, SyncError};

/// Reads and writes the whole index file at once.
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the index, creating an empty one if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::IndexLoad`] if the file cannot be read or
    /// created, and [`SyncError::IndexParse`] if it is not a post list.
    pub fn load(&self) -> Result<Collection, SyncError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.initialize()?;
                return Ok(Collection::default());
            }
            Err(source) => {
                return Err(SyncError::IndexLoad {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if text.trim().is_empty() {
            return Ok(Collection::default());
        }

        let collection: Collection =
            serde_json::from_str(&text).map_err(|e| SyncError::IndexParse {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        debug!(path = %self.path.display(), posts = collection.len(), "loaded index");
        Ok(collection)
    }

    /// Write the whole collection back, pretty-printed with four-space
    /// indentation.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persistence`] naming the index if the write fails.
    pub fn save(&self, collection: &Collection) -> Result<(), SyncError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        collection
            .serialize(&mut ser)
            .map_err(|e| self.persistence_error(std::io::Error::other(e)))?;
        buf.push(b'\n');

        fs::write(&self.path, buf).map_err(|e| self.persistence_error(e))
    }

    /// Append `entry` and persist the collection.
    ///
    /// The in-memory collection is left unchanged when the write fails.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SlugCollision`] without writing if the slug is
    /// taken, or [`SyncError::Persistence`] if the index cannot be written.
    pub fn insert(&self, collection: &mut Collection, entry: IndexEntry) -> Result<(), SyncError> {
        if collection.contains_slug(&entry.slug) {
            return Err(SyncError::SlugCollision { slug: entry.slug });
        }

        let mut updated = collection.clone();
        updated.push(entry);
        self.save(&updated)?;
        *collection = updated;
        Ok(())
    }

    fn initialize(&self) -> Result<(), SyncError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SyncError::IndexLoad {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, "[]\n").map_err(|source| SyncError::IndexLoad {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "created empty index");
        Ok(())
    }

    fn persistence_error(&self, source: std::io::Error) -> SyncError {
        SyncError::Persistence {
            artifact: Artifact::Index,
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, slug: &str) -> IndexEntry {
        IndexEntry::new(
            id,
            format!("Post {id}"),
            slug.to_string(),
            "2025-02-10".to_string(),
            vec!["rust".to_string()],
        )
    }

    #[test]
    fn load_creates_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("data").join("posts.json"));

        let collection = store.load().unwrap();
        assert!(collection.is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]\n");

        // Second load reads the file it just created.
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn load_rejects_non_list_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("posts.json"));
        fs::write(store.path(), "{\"posts\": []}").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, SyncError::IndexParse { .. }));
    }

    #[test]
    fn save_uses_four_space_indentation() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("posts.json"));
        store
            .save(&Collection::new(vec![entry(1, "first")]))
            .unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n    {\n        \"id\": 1,\n        \"title\": \"Post 1\",\n"));
        assert!(text.ends_with("]\n"));
    }

    #[test]
    fn insert_persists_and_rejects_duplicate_slugs() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("posts.json"));
        let mut collection = store.load().unwrap();

        store.insert(&mut collection, entry(1, "first")).unwrap();
        store.insert(&mut collection, entry(2, "second")).unwrap();
        assert_eq!(store.load().unwrap(), collection);

        let before = fs::read_to_string(store.path()).unwrap();
        let err = store.insert(&mut collection, entry(3, "first")).unwrap_err();
        assert!(matches!(err, SyncError::SlugCollision { ref slug } if slug == "first"));
        assert_eq!(collection.len(), 2);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn insert_leaves_collection_alone_when_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the index file should be makes the write fail.
        let store = IndexStore::new(dir.path().to_path_buf());
        let mut collection = Collection::default();

        let err = store.insert(&mut collection, entry(1, "first")).unwrap_err();
        assert!(matches!(
            err,
            SyncError::Persistence {
                artifact: Artifact::Index,
                ..
            }
        ));
        assert!(collection.is_empty());
    }
}
