//! Output CSV schema
//!
//! A single ordered column table drives both the header line and every row,
//! so the two cannot drift apart.

use crate::transform::RecordView;

/// Placeholder written when a video has no tags at all
const NO_TAGS: &str = "[None]";

/// One output column: header name plus the raw (unsanitized) value extractor
pub struct Column {
    pub name: &'static str,
    pub extract: fn(&RecordView<'_>) -> String,
}

/// Python-style boolean spelling, matching the published dataset
fn flag(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

fn count(value: Option<&String>) -> String {
    value.cloned().unwrap_or_else(|| "0".to_string())
}

fn tags(v: &RecordView<'_>) -> String {
    match &v.snippet.tags {
        Some(tags) => tags.join("|"),
        None => NO_TAGS.to_string(),
    }
}

fn thumbnail_link(v: &RecordView<'_>) -> String {
    v.snippet
        .thumbnails
        .as_ref()
        .and_then(|t| t.default.as_ref())
        .map(|t| t.url.clone())
        .unwrap_or_default()
}

/// Columns in output order
pub const COLUMNS: [Column; 16] = [
    Column {
        name: "video_id",
        extract: |v| v.id.to_string(),
    },
    Column {
        name: "title",
        extract: |v| v.snippet.title.clone(),
    },
    Column {
        name: "publishedAt",
        extract: |v| v.snippet.published_at.clone(),
    },
    Column {
        name: "channelId",
        extract: |v| v.snippet.channel_id.clone(),
    },
    Column {
        name: "channelTitle",
        extract: |v| v.snippet.channel_title.clone(),
    },
    Column {
        name: "categoryId",
        extract: |v| v.snippet.category_id.clone(),
    },
    Column {
        name: "trending_date",
        extract: |v| v.trending_date.to_string(),
    },
    Column {
        name: "tags",
        extract: tags,
    },
    Column {
        name: "view_count",
        extract: |v| count(v.statistics.view_count.as_ref()),
    },
    Column {
        name: "likes",
        extract: |v| count(v.statistics.like_count.as_ref()),
    },
    // Public dislike counts were removed upstream on 2021-12-13
    Column {
        name: "dislikes",
        extract: |_| "0".to_string(),
    },
    Column {
        name: "comment_count",
        extract: |v| count(v.statistics.comment_count.as_ref()),
    },
    Column {
        name: "thumbnail_link",
        extract: thumbnail_link,
    },
    Column {
        name: "comments_disabled",
        extract: |v| flag(v.statistics.comment_count.is_none()),
    },
    Column {
        name: "ratings_disabled",
        extract: |v| flag(v.statistics.like_count.is_none()),
    },
    Column {
        name: "description",
        extract: |v| v.snippet.description.clone(),
    },
];

/// Header line: column names joined by commas, unquoted
pub fn header_line() -> String {
    COLUMNS
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matches_published_layout() {
        assert_eq!(
            header_line(),
            "video_id,title,publishedAt,channelId,channelTitle,categoryId,trending_date,tags,\
             view_count,likes,dislikes,comment_count,thumbnail_link,comments_disabled,\
             ratings_disabled,description"
        );
    }

    #[test]
    fn column_names_unique() {
        let mut names: Vec<&str> = COLUMNS.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COLUMNS.len());
    }

    #[test]
    fn flag_spelling() {
        assert_eq!(flag(true), "True");
        assert_eq!(flag(false), "False");
    }
}
