use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A catalog entry exactly as it appears in the books artifact.
///
/// Field values are kept as raw JSON because the offline export does not
/// guarantee their types (titles can be numbers, ratings can be strings).
/// Coercion happens once, in [`CanonicalBook::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "Book-Title", default)]
    pub title: Value,
    #[serde(rename = "Book-Author", default)]
    pub author: Value,
    #[serde(rename = "Year-Of-Publication", default)]
    pub year_of_publication: Value,
    #[serde(rename = "Publisher", default)]
    pub publisher: Value,
    #[serde(rename = "Image-URL-L", default)]
    pub image_url: Value,
    #[serde(rename = "Book-Rating", default)]
    pub rating: Value,
    #[serde(rename = "Total-Reviewers", default)]
    pub total_reviewers: Value,
}

impl BookRecord {
    /// Title as text, if it can be read as text at all
    pub fn title_text(&self) -> Option<String> {
        text("title", &self.title).ok()
    }

    /// Author as text, if it can be read as text at all
    pub fn author_text(&self) -> Option<String> {
        text("author", &self.author).ok()
    }
}

/// Book shape returned by every query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub publisher: String,
    pub image_url: String,
    pub rating: f64,
    pub total_reviewers: u64,
}

/// Reasons a raw record cannot be turned into a [`CanonicalBook`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("field `{field}` is missing")]
    MissingField { field: &'static str },

    #[error("field `{field}` cannot be read as {expected}: {value}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl CanonicalBook {
    /// Coerces every field of `record` to its declared type.
    ///
    /// The image URL is the only optional field; a missing one becomes an
    /// empty string. Fractional years and reviewer counts are truncated.
    pub fn normalize(isbn: &str, record: &BookRecord) -> Result<Self, NormalizeError> {
        let year = integer("year", &record.year_of_publication)?;
        let year = i32::try_from(year).map_err(|_| invalid("year", "a 32-bit year", year))?;

        let total_reviewers = integer("total_reviewers", &record.total_reviewers)?;
        let total_reviewers = u64::try_from(total_reviewers)
            .map_err(|_| invalid("total_reviewers", "a non-negative count", total_reviewers))?;

        Ok(Self {
            isbn: isbn.to_string(),
            title: text("title", &record.title)?,
            author: text("author", &record.author)?,
            year,
            publisher: text("publisher", &record.publisher)?,
            image_url: optional_text("image_url", &record.image_url)?,
            rating: float("rating", &record.rating)?,
            total_reviewers,
        })
    }
}

fn invalid(field: &'static str, expected: &'static str, value: impl ToString) -> NormalizeError {
    NormalizeError::InvalidField {
        field,
        expected,
        value: value.to_string(),
    }
}

fn text(field: &'static str, value: &Value) -> Result<String, NormalizeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(NormalizeError::MissingField { field }),
        other => Err(invalid(field, "text", other)),
    }
}

fn optional_text(field: &'static str, value: &Value) -> Result<String, NormalizeError> {
    match value {
        Value::Null => Ok(String::new()),
        other => text(field, other),
    }
}

fn float(field: &'static str, value: &Value) -> Result<f64, NormalizeError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null => return Err(NormalizeError::MissingField { field }),
        _ => None,
    };

    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid(field, "a number", value))
}

fn integer(field: &'static str, value: &Value) -> Result<i64, NormalizeError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        Value::Null => return Err(NormalizeError::MissingField { field }),
        _ => None,
    };

    parsed.ok_or_else(|| invalid(field, "an integer", value))
}

fn truncate(n: f64) -> Option<i64> {
    if n.is_finite() && n.abs() < i64::MAX as f64 {
        Some(n.trunc() as i64)
    } else {
        None
    }
}
