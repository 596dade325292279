//! Creating posts and keeping their navigation links in sync with the index.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use postsync_core::config::SyncConfig;
use postsync_core::entry::IndexEntry;
use postsync_core::error::{Artifact, FrontmatterError, SyncError};
use postsync_core::frontmatter::{self, Document, Frontmatter};
use postsync_core::navigation::{links_for, NavigationLinks, NEXT_KEY, PREV_KEY};
use postsync_core::slug::normalize;

use crate::store::IndexStore;
use crate::title::TitleProvider;

/// Body text of a freshly created post, below its heading.
pub const PLACEHOLDER: &str = "Write your content here...";

/// Input for [`SyncEngine::create_post`].
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub tags: Vec<String>,
    /// Defaults to today's UTC date.
    pub date: Option<NaiveDate>,
}

/// An index entry together with where its document lives.
#[derive(Debug, Clone, Serialize)]
pub struct PostInfo {
    #[serde(flatten)]
    pub entry: IndexEntry,
    pub document_path: PathBuf,
    pub document_exists: bool,
}

/// Why relink left a document alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    MissingDocument,
    MalformedFrontmatter(String),
    Unreadable(String),
    WriteFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingDocument => f.write_str("missing document"),
            SkipReason::MalformedFrontmatter(msg) => write!(f, "malformed frontmatter: {msg}"),
            SkipReason::Unreadable(msg) => write!(f, "unreadable: {msg}"),
            SkipReason::WriteFailed(msg) => write!(f, "write failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub slug: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Outcome of [`SyncEngine::relink_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelinkReport {
    /// Documents rewritten with new links.
    pub updated: usize,
    /// Documents whose links were already correct.
    pub unchanged: usize,
    pub skipped: Vec<SkippedDocument>,
}

impl RelinkReport {
    #[must_use]
    pub fn missing(&self) -> usize {
        self.count(|r| matches!(r, SkipReason::MissingDocument))
    }

    #[must_use]
    pub fn malformed(&self) -> usize {
        self.count(|r| matches!(r, SkipReason::MalformedFrontmatter(_)))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|r| matches!(r, SkipReason::Unreadable(_) | SkipReason::WriteFailed(_)))
    }

    fn count(&self, pred: impl Fn(&SkipReason) -> bool) -> usize {
        self.skipped.iter().filter(|s| pred(&s.reason)).count()
    }
}

enum Relinked {
    Updated,
    Unchanged,
}

/// Orchestrates the index store, the frontmatter codec and navigation.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    config: SyncConfig,
    store: IndexStore,
}

impl SyncEngine {
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        let store = IndexStore::new(config.index_path.clone());
        Self { config, store }
    }

    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Ask `provider` for a title, then [`create_post`](Self::create_post).
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidTitle`] if the provider is cancelled,
    /// [`SyncError::Io`] if it fails, and anything `create_post` returns.
    pub fn create_post_from(
        &self,
        provider: &mut dyn TitleProvider,
        tags: Vec<String>,
        date: Option<NaiveDate>,
    ) -> Result<PostInfo, SyncError> {
        let title = provider.title()?.ok_or(SyncError::InvalidTitle)?;
        self.create_post(NewPost { title, tags, date })
    }

    /// Add a post to the index and write its document.
    ///
    /// Nothing is written unless the title is valid, the slug is free and
    /// the frontmatter can be produced. The document is written first; if
    /// the index write then fails the error names the index and the new
    /// document stays on disk.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidTitle`], [`SyncError::SlugCollision`],
    /// [`SyncError::DocumentExists`], [`SyncError::Frontmatter`] or
    /// [`SyncError::Persistence`].
    pub fn create_post(&self, post: NewPost) -> Result<PostInfo, SyncError> {
        let title = post.title.trim().to_string();
        let slug = normalize(&title);
        if slug.is_empty() {
            return Err(SyncError::InvalidTitle);
        }

        let mut collection = self.store.load()?;
        if collection.contains_slug(&slug) {
            return Err(SyncError::SlugCollision { slug });
        }

        let date = post
            .date
            .unwrap_or_else(|| Utc::now().date_naive())
            .format("%Y-%m-%d")
            .to_string();
        let entry = IndexEntry::new(collection.next_id(), title, slug, date, post.tags);
        let text = self.render_new_document(&entry)?;

        let path = self.config.document_path(&entry.slug);
        fs::create_dir_all(&self.config.documents_dir).map_err(|source| {
            SyncError::Persistence {
                artifact: Artifact::Document,
                path: self.config.documents_dir.clone(),
                source,
            }
        })?;
        write_new_file(&path, &text)?;

        if let Err(e) = self.store.insert(&mut collection, entry.clone()) {
            warn!(
                document = %path.display(),
                "document written but index update failed; remove it or add the entry by hand"
            );
            return Err(e);
        }

        info!(id = entry.id, slug = %entry.slug, "created post");
        Ok(PostInfo {
            entry,
            document_path: path,
            document_exists: true,
        })
    }

    /// Rewrite `prev`/`next` in every post document from the index order.
    ///
    /// Per-document problems are recorded in the report and never abort the
    /// batch. Running it again right away changes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error only if the index itself cannot be loaded.
    pub fn relink_all(&self) -> Result<RelinkReport, SyncError> {
        let collection = self.store.load()?;
        let sorted = collection.sorted_by_id();
        let links = links_for(&sorted);

        let mut report = RelinkReport::default();
        for entry in sorted {
            let Some(nav) = links.get(&entry.slug) else {
                continue;
            };
            let path = self.config.document_path(&entry.slug);

            match self.relink_document(&path, nav) {
                Ok(Relinked::Updated) => {
                    debug!(slug = %entry.slug, prev = %nav.prev, next = %nav.next, "updated links");
                    report.updated += 1;
                }
                Ok(Relinked::Unchanged) => {
                    debug!(slug = %entry.slug, "links already current");
                    report.unchanged += 1;
                }
                Err(reason) => {
                    warn!(slug = %entry.slug, path = %path.display(), %reason, "skipped document");
                    report.skipped.push(SkippedDocument {
                        slug: entry.slug.clone(),
                        path,
                        reason,
                    });
                }
            }
        }

        info!(
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped.len(),
            "relink finished"
        );
        Ok(report)
    }

    /// Look up a post by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be loaded.
    pub fn post_info(&self, id: u64) -> Result<Option<PostInfo>, SyncError> {
        let collection = self.store.load()?;
        Ok(collection.find_by_id(id).map(|e| self.info_for(e)))
    }

    /// The post with the highest id.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be loaded.
    pub fn last_post(&self) -> Result<Option<PostInfo>, SyncError> {
        let collection = self.store.load()?;
        Ok(collection.latest().map(|e| self.info_for(e)))
    }

    fn info_for(&self, entry: &IndexEntry) -> PostInfo {
        let document_path = self.config.document_path(&entry.slug);
        PostInfo {
            entry: entry.clone(),
            document_exists: document_path.is_file(),
            document_path,
        }
    }

    fn render_new_document(&self, entry: &IndexEntry) -> Result<String, SyncError> {
        let id = i64::try_from(entry.id).map_err(|_| FrontmatterError::UnsupportedValue {
            key: "id".to_string(),
            reason: format!("{} does not fit in a signed 64-bit integer", entry.id),
        })?;

        let mut fm = Frontmatter::new();
        fm.set("title", entry.title.as_str())?;
        fm.set("subtitle", "")?;
        fm.set("id", id)?;
        fm.set("date", entry.date.as_str())?;
        fm.set(&self.config.tags_key, entry.tags.clone())?;

        let body = format!("\n# {}\n\n{PLACEHOLDER}\n", entry.title);
        Ok(frontmatter::serialize(
            &Document::new(fm, body),
            self.config.list_style,
        )?)
    }

    fn relink_document(&self, path: &Path, nav: &NavigationLinks) -> Result<Relinked, SkipReason> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SkipReason::MissingDocument,
            _ => SkipReason::Unreadable(e.to_string()),
        })?;

        let mut doc = frontmatter::parse(&text)
            .map_err(|e| SkipReason::MalformedFrontmatter(e.to_string()))?;
        let write_failed = |e: FrontmatterError| SkipReason::WriteFailed(e.to_string());
        doc.frontmatter
            .set(PREV_KEY, nav.prev.as_str())
            .map_err(write_failed)?;
        doc.frontmatter
            .set(NEXT_KEY, nav.next.as_str())
            .map_err(write_failed)?;

        let updated =
            frontmatter::serialize(&doc, self.config.list_style).map_err(write_failed)?;
        if updated == text {
            return Ok(Relinked::Unchanged);
        }

        fs::write(path, updated).map_err(|e| SkipReason::WriteFailed(e.to_string()))?;
        Ok(Relinked::Updated)
    }
}

/// Write `text` to a file that must not exist yet.
fn write_new_file(path: &Path, text: &str) -> Result<(), SyncError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            ErrorKind::AlreadyExists => SyncError::DocumentExists {
                path: path.to_path_buf(),
            },
            _ => SyncError::Persistence {
                artifact: Artifact::Document,
                path: path.to_path_buf(),
                source,
            },
        })?;

    file.write_all(text.as_bytes())
        .map_err(|source| SyncError::Persistence {
            artifact: Artifact::Document,
            path: path.to_path_buf(),
            source,
        })
}
