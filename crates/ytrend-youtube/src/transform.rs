//! Raw API video records and their normalization into CSV rows

use serde::{Deserialize, Deserializer};

use crate::schema::COLUMNS;

/// Characters that break line-oriented CSV consumers; stripped, not escaped
const UNSAFE_CHARACTERS: [char; 2] = ['\n', '"'];

// === Null-handling deserializers ===

/// Deserialize null as empty string (for optional String fields)
fn null_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Statistics counts arrive as JSON strings ("1234") but tolerate plain numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

// === Typed record structs ===

/// One entry of the `items` list returned by `videos.list`
#[derive(Debug, Default, Deserialize)]
pub struct VideoRecord {
    #[serde(default, deserialize_with = "null_to_empty")]
    pub id: String,
    #[serde(default)]
    pub snippet: Option<Snippet>,
    /// Absent for deleted or otherwise unavailable videos
    #[serde(default)]
    pub statistics: Option<Statistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default, deserialize_with = "null_to_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub published_at: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub channel_id: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub channel_title: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub category_id: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub description: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Thumbnail {
    #[serde(default, deserialize_with = "null_to_empty")]
    pub url: String,
}

/// Missing counters mean the feature is disabled on the video
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default, deserialize_with = "string_or_number")]
    pub view_count: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub like_count: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub comment_count: Option<String>,
}

/// Borrowed view of one record with its statistics already resolved.
///
/// Column extractors read from this instead of the raw record.
pub struct RecordView<'a> {
    pub id: &'a str,
    pub snippet: &'a Snippet,
    pub statistics: &'a Statistics,
    pub trending_date: &'a str,
}

/// One normalized CSV row: sanitized, quoted fields in header order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row(Vec<String>);

impl Row {
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Field by column name, if the column exists
    pub fn get(&self, column: &str) -> Option<&str> {
        COLUMNS
            .iter()
            .position(|c| c.name == column)
            .and_then(|idx| self.0.get(idx))
            .map(String::as_str)
    }

    /// Comma-joined line, without trailing newline
    pub fn to_line(&self) -> String {
        self.0.join(",")
    }
}

/// Strip newlines and double quotes, then wrap the value in double quotes
pub fn sanitize(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    out.extend(value.chars().filter(|c| !UNSAFE_CHARACTERS.contains(c)));
    out.push('"');
    out
}

/// Format the trending date column value for `date` (always midnight UTC)
pub fn trending_date(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%dT00:00:00Z").to_string()
}

/// Normalize one record into a row.
///
/// Returns `None` when the record has no statistics (deleted video).
pub fn normalize(record: &VideoRecord, trending_date: &str) -> Option<Row> {
    let statistics = record.statistics.as_ref()?;
    let empty = Snippet::default();
    let view = RecordView {
        id: &record.id,
        snippet: record.snippet.as_ref().unwrap_or(&empty),
        statistics,
        trending_date,
    };
    Some(Row(
        COLUMNS
            .iter()
            .map(|column| sanitize(&(column.extract)(&view)))
            .collect(),
    ))
}
