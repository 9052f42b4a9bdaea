use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::{BookRecord, CanonicalBook};
use crate::services::{
    sources::{DatasetSource, Datasets},
    RecommendationKind,
};

/// Errors a caller can receive from the query engine
///
/// Unknown identifiers and malformed records are deliberately absent: they
/// shorten the result instead of failing the query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Book not found: {0}")]
    NotFound(String),
}

/// Load state reported by [`QueryEngine::status`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EngineStatus {
    Healthy {
        books: usize,
        popular: usize,
        correlation_sources: usize,
        content_sources: usize,
        loaded_at: DateTime<Utc>,
    },
    Degraded {
        reason: String,
        since: DateTime<Utc>,
    },
}

enum EngineState {
    Ready {
        datasets: Datasets,
        loaded_at: DateTime<Utc>,
    },
    Degraded {
        reason: String,
        since: DateTime<Utc>,
    },
}

/// Answers catalog queries from immutable in-memory data
///
/// Built once, then shared freely: cloning only bumps a reference count and
/// no query takes a lock. An engine whose data failed to load stays usable;
/// every valid query just returns nothing.
#[derive(Clone)]
pub struct QueryEngine {
    state: Arc<EngineState>,
}

impl QueryEngine {
    pub fn new(datasets: Datasets) -> Self {
        Self {
            state: Arc::new(EngineState::Ready {
                datasets,
                loaded_at: Utc::now(),
            }),
        }
    }

    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            state: Arc::new(EngineState::Degraded {
                reason: reason.into(),
                since: Utc::now(),
            }),
        }
    }

    /// Loads data from `source`. A failed load is logged once and yields a degraded engine.
    pub async fn initialize(source: &dyn DatasetSource) -> Self {
        let location = source.describe();
        tracing::info!(source = %location, "Loading catalog data");

        match source.load().await {
            Ok(datasets) => {
                tracing::info!(
                    source = %location,
                    books = datasets.catalog.len(),
                    popular = datasets.catalog.popular().len(),
                    correlation_sources = datasets.recommendations.table(RecommendationKind::Correlation).len(),
                    content_sources = datasets.recommendations.table(RecommendationKind::Content).len(),
                    "Catalog data loaded"
                );
                Self::new(datasets)
            }
            Err(e) => {
                tracing::error!(
                    source = %location,
                    error = %e,
                    "Failed to load catalog data, serving empty results"
                );
                Self::degraded(e.to_string())
            }
        }
    }

    pub fn status(&self) -> EngineStatus {
        match self.state.as_ref() {
            EngineState::Ready {
                datasets,
                loaded_at,
            } => EngineStatus::Healthy {
                books: datasets.catalog.len(),
                popular: datasets.catalog.popular().len(),
                correlation_sources: datasets
                    .recommendations
                    .table(RecommendationKind::Correlation)
                    .len(),
                content_sources: datasets
                    .recommendations
                    .table(RecommendationKind::Content)
                    .len(),
                loaded_at: *loaded_at,
            },
            EngineState::Degraded { reason, since } => EngineStatus::Degraded {
                reason: reason.clone(),
                since: *since,
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state.as_ref(), EngineState::Ready { .. })
    }

    fn datasets(&self) -> Option<&Datasets> {
        match self.state.as_ref() {
            EngineState::Ready { datasets, .. } => Some(datasets),
            EngineState::Degraded { .. } => None,
        }
    }

    /// The `limit` most popular books, in popularity order.
    ///
    /// Ranked identifiers missing from the catalog are skipped without pulling
    /// in replacements, so fewer than `limit` books may come back.
    pub fn list_popular(&self, limit: usize) -> Result<Vec<CanonicalBook>, QueryError> {
        check_limit(limit)?;
        let Some(datasets) = self.datasets() else {
            return Ok(Vec::new());
        };

        let ranked = datasets.catalog.popular().iter().take(limit);
        Ok(resolve(datasets, ranked, "popular"))
    }

    pub fn recommend_by_correlation(
        &self,
        isbn: &str,
        limit: usize,
    ) -> Result<Vec<CanonicalBook>, QueryError> {
        self.recommend(RecommendationKind::Correlation, isbn, limit)
    }

    pub fn recommend_by_content(
        &self,
        isbn: &str,
        limit: usize,
    ) -> Result<Vec<CanonicalBook>, QueryError> {
        self.recommend(RecommendationKind::Content, isbn, limit)
    }

    /// Books related to `isbn` according to the `kind` table, most relevant first.
    ///
    /// Takes the first `limit` candidates, then drops those the catalog cannot
    /// resolve. An unknown `isbn` yields an empty list.
    pub fn recommend(
        &self,
        kind: RecommendationKind,
        isbn: &str,
        limit: usize,
    ) -> Result<Vec<CanonicalBook>, QueryError> {
        check_limit(limit)?;
        let Some(datasets) = self.datasets() else {
            return Ok(Vec::new());
        };

        let candidates = datasets.recommendations.related(kind, isbn);
        if candidates.is_empty() {
            tracing::debug!(isbn = %isbn, kind = %kind, "No recommendations for identifier");
        }

        let operation = match kind {
            RecommendationKind::Correlation => "correlation",
            RecommendationKind::Content => "content",
        };
        Ok(resolve(datasets, candidates.iter().take(limit), operation))
    }

    /// Case-insensitive substring search over title, author and identifier.
    ///
    /// Walks the whole catalog in load order and keeps the first `limit`
    /// matches; there is no ranking. A blank query matches nothing; any
    /// other query is matched as given, surrounding whitespace included.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<CanonicalBook>, QueryError> {
        check_limit(limit)?;
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let needle = query.to_lowercase();
        let Some(datasets) = self.datasets() else {
            return Ok(Vec::new());
        };

        Ok(datasets
            .catalog
            .iter()
            .filter(|(isbn, record)| matches_query(isbn, record, &needle))
            .take(limit)
            .filter_map(|(isbn, record)| normalize_or_skip(isbn, record, "search"))
            .collect())
    }

    /// Single book lookup for detail views
    pub fn get_book(&self, isbn: &str) -> Result<CanonicalBook, QueryError> {
        self.datasets()
            .and_then(|datasets| datasets.catalog.get(isbn))
            .and_then(|record| normalize_or_skip(isbn, record, "book"))
            .ok_or_else(|| QueryError::NotFound(isbn.to_string()))
    }
}

fn check_limit(limit: usize) -> Result<(), QueryError> {
    if limit < 1 {
        return Err(QueryError::InvalidArgument(
            "limit must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

fn resolve<'a>(
    datasets: &Datasets,
    isbns: impl Iterator<Item = &'a String>,
    operation: &'static str,
) -> Vec<CanonicalBook> {
    isbns
        .filter_map(|isbn| {
            let Some(record) = datasets.catalog.get(isbn) else {
                tracing::debug!(isbn = %isbn, operation, "Skipping identifier missing from catalog");
                return None;
            };
            normalize_or_skip(isbn, record, operation)
        })
        .collect()
}

fn normalize_or_skip(isbn: &str, record: &BookRecord, operation: &'static str) -> Option<CanonicalBook> {
    match CanonicalBook::normalize(isbn, record) {
        Ok(book) => Some(book),
        Err(e) => {
            tracing::warn!(isbn = %isbn, operation, error = %e, "Dropping malformed book record");
            None
        }
    }
}

fn matches_query(isbn: &str, record: &BookRecord, needle: &str) -> bool {
    let contains = |haystack: Option<String>| {
        haystack.is_some_and(|text| text.to_lowercase().contains(needle))
    };

    isbn.to_lowercase().contains(needle)
        || contains(record.title_text())
        || contains(record.author_text())
}
