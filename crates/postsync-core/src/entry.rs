//! Index entries and the ordered collection that owns them.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// One post's canonical metadata record in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Hand-edited indexes sometimes hold `"007"`; it reads as 7 and is
    /// written back as a number.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u64,
    pub title: String,
    pub slug: String,
    /// Calendar date in `YYYY-MM-DD` form.
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,

    /// Hand-added record fields this tool does not manage.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl IndexEntry {
    #[must_use]
    pub fn new(id: u64, title: String, slug: String, date: String, tags: Vec<String>) -> Self {
        Self {
            id,
            title,
            slug,
            date,
            tags,
            extra: BTreeMap::new(),
        }
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid post id {text:?}"))),
    }
}

/// The whole index: entries in file order.
///
/// File order carries no meaning; [`Collection::sorted_by_id`] is the
/// navigation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    entries: Vec<IndexEntry>,
}

impl Collection {
    #[must_use]
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Next id to hand out: one past the highest id, or 1 when empty.
    /// Gaps are never reused.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.entries.iter().map(|e| e.id).max().map_or(1, |max| max + 1)
    }

    #[must_use]
    pub fn contains_slug(&self, slug: &str) -> bool {
        self.entries.iter().any(|e| e.slug == slug)
    }

    #[must_use]
    pub fn find_by_id(&self, id: u64) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The entry with the highest id.
    #[must_use]
    pub fn latest(&self) -> Option<&IndexEntry> {
        self.entries.iter().max_by_key(|e| e.id)
    }

    /// Append without any uniqueness check. Callers go through the index
    /// store, which rejects slug collisions first.
    pub fn push(&mut self, entry: IndexEntry) {
        self.entries.push(entry);
    }

    /// Entries in ascending id order. The sort is stable, so duplicate ids
    /// from a hand-edited index keep their file order.
    #[must_use]
    pub fn sorted_by_id(&self) -> Vec<&IndexEntry> {
        let mut sorted: Vec<&IndexEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.id);
        sorted
    }
}
