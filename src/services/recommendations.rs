use std::collections::HashMap;
use std::fmt::Display;

/// Which precomputed table a recommendation comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationKind {
    /// Item-item co-occurrence in user ratings
    Correlation,
    /// Similarity of book metadata
    Content,
}

impl Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationKind::Correlation => write!(f, "correlation"),
            RecommendationKind::Content => write!(f, "content"),
        }
    }
}

/// Source identifier → related identifiers, most relevant first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationTable {
    related: HashMap<String, Vec<String>>,
}

impl RecommendationTable {
    pub fn new(related: HashMap<String, Vec<String>>) -> Self {
        Self { related }
    }

    /// Related identifiers in artifact order, or an empty slice for an unknown source
    pub fn related(&self, isbn: &str) -> &[String] {
        self.related.get(isbn).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of source identifiers with an entry
    pub fn len(&self) -> usize {
        self.related.len()
    }

    pub fn is_empty(&self) -> bool {
        self.related.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for RecommendationTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Both recommendation tables, loaded together and never modified
#[derive(Debug, Clone, Default)]
pub struct RecommendationIndex {
    correlation: RecommendationTable,
    content: RecommendationTable,
}

impl RecommendationIndex {
    pub fn new(correlation: RecommendationTable, content: RecommendationTable) -> Self {
        Self {
            correlation,
            content,
        }
    }

    pub fn related_correlation(&self, isbn: &str) -> &[String] {
        self.correlation.related(isbn)
    }

    pub fn related_content(&self, isbn: &str) -> &[String] {
        self.content.related(isbn)
    }

    pub fn related(&self, kind: RecommendationKind, isbn: &str) -> &[String] {
        self.table(kind).related(isbn)
    }

    pub fn table(&self, kind: RecommendationKind) -> &RecommendationTable {
        match kind {
            RecommendationKind::Correlation => &self.correlation,
            RecommendationKind::Content => &self.content,
        }
    }
}
