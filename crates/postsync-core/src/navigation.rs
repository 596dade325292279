//! Circular previous/next links between posts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::IndexEntry;

/// Frontmatter key holding the previous post's slug.
pub const PREV_KEY: &str = "prev";
/// Frontmatter key holding the next post's slug.
pub const NEXT_KEY: &str = "next";

/// A post's neighbours in id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationLinks {
    pub prev: String,
    pub next: String,
}

/// Compute the circular neighbours of every entry, keyed by slug.
///
/// `sorted` must already be in ascending id order. The first entry's
/// `prev` wraps to the last and the last entry's `next` wraps to the first;
/// a single entry links to itself.
#[must_use]
pub fn links_for(sorted: &[&IndexEntry]) -> BTreeMap<String, NavigationLinks> {
    let n = sorted.len();
    sorted
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let links = NavigationLinks {
                prev: sorted[(i + n - 1) % n].slug.clone(),
                next: sorted[(i + 1) % n].slug.clone(),
            };
            (entry.slug.clone(), links)
        })
        .collect()
}
