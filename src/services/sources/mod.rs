//! Loading strategies for the catalog and recommendation artifacts
//!
//! The query engine does not care where its data comes from. A
//! [`DatasetSource`] fetches the four artifacts (books, popularity ranking,
//! correlation table, content table) and hands back parsed [`Datasets`].
//! Local files and a remote HTTP location are both supported; they share the
//! same parsing so the resulting engine behaves identically.

use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    config::{Config, DataSourceKind},
    models::BookRecord,
    services::{CatalogStore, RecommendationIndex, RecommendationTable},
};

pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::HttpSource;

pub const CATALOG_ARTIFACT: &str = "books_data.json";
pub const POPULAR_ARTIFACT: &str = "popular_books.json";
pub const CORRELATION_ARTIFACT: &str = "corr_rec_dict.json";
pub const CONTENT_ARTIFACT: &str = "cont_rec.json";

/// Errors raised while loading artifacts
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {artifact}: {source}")]
    Io {
        artifact: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {artifact}: {source}")]
    Parse {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to fetch {artifact}: {source}")]
    Http {
        artifact: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected shape in {artifact}: {message}")]
    InvalidShape {
        artifact: &'static str,
        message: String,
    },

    #[error("Data source misconfigured: {0}")]
    Misconfigured(String),
}

/// Everything the query engine needs, fully parsed
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub catalog: CatalogStore,
    pub recommendations: RecommendationIndex,
}

/// Unparsed artifact bytes as fetched by a source
#[derive(Debug, Clone, Default)]
pub struct RawArtifacts {
    pub catalog: Vec<u8>,
    pub popular: Vec<u8>,
    pub correlation: Vec<u8>,
    pub content: Vec<u8>,
}

/// A place the artifacts can be loaded from
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DatasetSource: Send + Sync {
    /// Loads and parses all four artifacts. Any missing or unreadable artifact fails the load.
    async fn load(&self) -> Result<Datasets, LoadError>;

    /// Human-readable location for logging
    fn describe(&self) -> String;
}

/// Builds the source selected by configuration
pub fn from_config(config: &Config) -> Result<Box<dyn DatasetSource>, LoadError> {
    match config.data_source {
        DataSourceKind::File => Ok(Box::new(FileSource::new(&config.data_dir))),
        DataSourceKind::Http => {
            let url = config.data_url.as_deref().ok_or_else(|| {
                LoadError::Misconfigured("DATA_URL is required when DATA_SOURCE=http".to_string())
            })?;
            let source = HttpSource::new(url, Duration::from_secs(config.fetch_timeout_secs))?;
            Ok(Box::new(source))
        }
    }
}

/// Parses raw artifacts into [`Datasets`]
///
/// Individual bad entries (a non-object book, a null identifier) are skipped
/// with a warning. An artifact with the wrong top-level shape fails the load.
pub fn parse_datasets(raw: &RawArtifacts) -> Result<Datasets, LoadError> {
    let books = parse_catalog(&raw.catalog)?;
    let popular = match parse_value(POPULAR_ARTIFACT, &raw.popular)? {
        Value::Array(items) => identifier_list(POPULAR_ARTIFACT, items),
        other => return Err(shape(POPULAR_ARTIFACT, "an array of identifiers", &other)),
    };
    let correlation = parse_table(CORRELATION_ARTIFACT, &raw.correlation)?;
    let content = parse_table(CONTENT_ARTIFACT, &raw.content)?;

    Ok(Datasets {
        catalog: CatalogStore::new(books, popular),
        recommendations: RecommendationIndex::new(correlation, content),
    })
}

fn parse_value(artifact: &'static str, bytes: &[u8]) -> Result<Value, LoadError> {
    serde_json::from_slice(bytes).map_err(|source| LoadError::Parse { artifact, source })
}

fn parse_object(artifact: &'static str, bytes: &[u8]) -> Result<Map<String, Value>, LoadError> {
    match parse_value(artifact, bytes)? {
        Value::Object(map) => Ok(map),
        other => Err(shape(artifact, "an object keyed by identifier", &other)),
    }
}

fn shape(artifact: &'static str, expected: &str, found: &Value) -> LoadError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    LoadError::InvalidShape {
        artifact,
        message: format!("expected {expected}, found {found}"),
    }
}

fn parse_catalog(bytes: &[u8]) -> Result<Vec<(String, BookRecord)>, LoadError> {
    let map = parse_object(CATALOG_ARTIFACT, bytes)?;
    let mut books = Vec::with_capacity(map.len());

    for (isbn, value) in map {
        if !value.is_object() {
            tracing::warn!(isbn = %isbn, "Skipping catalog entry that is not an object");
            continue;
        }
        match serde_json::from_value::<BookRecord>(value) {
            Ok(record) => books.push((isbn, record)),
            Err(e) => tracing::warn!(isbn = %isbn, error = %e, "Skipping unreadable catalog entry"),
        }
    }

    Ok(books)
}

fn parse_table(artifact: &'static str, bytes: &[u8]) -> Result<RecommendationTable, LoadError> {
    let map = parse_object(artifact, bytes)?;
    let mut related = std::collections::HashMap::with_capacity(map.len());

    for (isbn, value) in map {
        match value {
            Value::Array(items) => {
                related.insert(isbn, identifier_list(artifact, items));
            }
            _ => tracing::warn!(artifact, isbn = %isbn, "Skipping recommendation entry that is not a list"),
        }
    }

    Ok(RecommendationTable::new(related))
}

/// Identifiers written by the export are strings, but numeric ISBNs occasionally
/// slip through as numbers.
fn identifier_list(artifact: &'static str, items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Null => None,
            other => {
                tracing::warn!(artifact, value = %other, "Skipping non-identifier list entry");
                None
            }
        })
        .collect()
}
