use std::collections::HashMap;

use crate::models::BookRecord;

/// In-memory book catalog plus the precomputed popularity ranking
///
/// Records keep the order they were loaded in; that order is what free-text
/// search walks. Lookups by identifier go through a position map.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    entries: Vec<(String, BookRecord)>,
    positions: HashMap<String, usize>,
    popular: Vec<String>,
}

impl CatalogStore {
    /// Builds the store. When an identifier appears twice, the first record wins.
    pub fn new(
        books: impl IntoIterator<Item = (String, BookRecord)>,
        popular: Vec<String>,
    ) -> Self {
        let mut entries = Vec::new();
        let mut positions = HashMap::new();

        for (isbn, record) in books {
            if positions.contains_key(&isbn) {
                tracing::warn!(isbn = %isbn, "Duplicate catalog identifier ignored");
                continue;
            }
            positions.insert(isbn.clone(), entries.len());
            entries.push((isbn, record));
        }

        Self {
            entries,
            positions,
            popular,
        }
    }

    pub fn get(&self, isbn: &str) -> Option<&BookRecord> {
        self.positions.get(isbn).map(|&i| &self.entries[i].1)
    }

    /// Iterates records in load order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BookRecord)> {
        self.entries
            .iter()
            .map(|(isbn, record)| (isbn.as_str(), record))
    }

    /// Identifiers ranked most popular first. May name books that are not in the catalog.
    pub fn popular(&self) -> &[String] {
        &self.popular
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
