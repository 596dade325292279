//! # postsync-vault
//!
//! File system side of postsync.
//!
//! The JSON index is the authority for post identity and order. Each post
//! document carries a copy of part of that metadata plus derived `prev` /
//! `next` links, which [`SyncEngine::relink_all`] rewrites from the index
//! without touching anything else in the file.

pub mod engine;
pub mod store;
pub mod title;
pub mod watcher;

pub use engine::{NewPost, PostInfo, RelinkReport, SkipReason, SkippedDocument, SyncEngine};
pub use store::IndexStore;
pub use title::{FixedTitle, TitleProvider};
pub use watcher::{IndexEvent, IndexWatcher};
