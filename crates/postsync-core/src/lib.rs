//! # postsync-core
//!
//! Core types and codecs for postsync.
//!
//! This crate defines the pieces shared by the vault and the CLI:
//! - [`normalize`] — title to slug
//! - [`frontmatter`] — lossless frontmatter parsing and writing
//! - [`IndexEntry`] / [`Collection`] — the post index
//! - [`links_for`] — circular previous/next navigation
//! - [`SyncConfig`] — explicit project paths and formatting options
//! - Error hierarchy ([`SyncError`], [`FrontmatterError`])

pub mod config;
pub mod entry;
pub mod error;
pub mod frontmatter;
pub mod navigation;
pub mod slug;

pub use config::SyncConfig;
pub use entry::{Collection, IndexEntry};
pub use error::{Artifact, FrontmatterError, Result, SyncError};
pub use frontmatter::{Document, FieldValue, Frontmatter, ListStyle};
pub use navigation::{links_for, NavigationLinks};
pub use slug::normalize;
