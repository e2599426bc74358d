use std::path::{Path, PathBuf};

use serde::Serialize;
use time::{Date, format_description::FormatItem, macros::format_description};

use super::error::DomainError;

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Title substituted when a directly fetched post has none.
pub const UNTITLED: &str = "Untitled";
/// Read-time label substituted when a directly fetched post has none.
pub const DEFAULT_READ_TIME: &str = "5 min read";

/// The raw content set: one `(path, text)` entry per file, in encounter order.
///
/// Loaded once and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    entries: Vec<(PathBuf, String)>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.entries.push((path.into(), text.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.entries
            .iter()
            .map(|(path, text)| (path.as_path(), text.as_str()))
    }
}

impl<P, S> FromIterator<(P, S)> for DocumentSet
where
    P: Into<PathBuf>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (P, S)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (path, text) in iter {
            set.push(path, text);
        }
        set
    }
}

/// Listing entry for one post. Never carries the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub identifier: String,
    pub title: String,
    #[serde(with = "iso_date")]
    pub published_date: Date,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
}

impl PostSummary {
    pub fn href(&self) -> String {
        post_href(&self.identifier)
    }
}

/// A fully resolved post, defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub identifier: String,
    pub title: String,
    #[serde(with = "iso_date")]
    pub published_date: Date,
    pub author: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub read_time: String,
    pub body: String,
}

/// Derive the route identifier from a content path: the file name without
/// its extension.
pub fn identifier_from_path(path: &Path) -> Result<String, DomainError> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| DomainError::malformed_path(path.display().to_string()))
}

/// Whether an identifier can stand as a single route segment and a single
/// directory name on export.
pub fn is_routable(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier != "."
        && identifier != ".."
        && !identifier.contains(['/', '\\'])
}

pub fn post_href(identifier: &str) -> String {
    format!("/blog/{identifier}")
}

pub fn format_human_date(date: Date) -> String {
    date.format(HUMAN_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn identifier_strips_directories_and_extension() {
        let id = identifier_from_path(Path::new("content/blog/why-chess.md")).expect("identifier");
        assert_eq!(id, "why-chess");
    }

    #[test]
    fn identifier_keeps_inner_dots() {
        let id = identifier_from_path(Path::new("v1.2-notes.md")).expect("identifier");
        assert_eq!(id, "v1.2-notes");
    }

    #[test]
    fn identifier_without_file_name_is_malformed() {
        let err = identifier_from_path(Path::new("/")).expect_err("no file name");
        assert!(matches!(err, DomainError::MalformedPath { .. }));

        let err = identifier_from_path(Path::new("")).expect_err("empty path");
        assert!(matches!(err, DomainError::MalformedPath { .. }));
    }

    #[test]
    fn dot_identifiers_are_not_routes() {
        let dots = identifier_from_path(Path::new("content/...md")).expect("identifier");
        assert_eq!(dots, "..");
        assert!(!is_routable(&dots));
        assert!(!is_routable("."));
        assert!(!is_routable("a\\b"));
        assert!(is_routable("v1.2-notes"));
        assert!(is_routable("..hidden"));
    }

    #[test]
    fn human_dates_use_long_month_names() {
        assert_eq!(format_human_date(date!(2025 - 10 - 27)), "October 27, 2025");
        assert_eq!(format_human_date(date!(2024 - 03 - 05)), "March 5, 2024");
    }

    #[test]
    fn summaries_serialize_with_iso_dates() {
        let summary = PostSummary {
            identifier: "focus".into(),
            title: "Focus".into(),
            published_date: date!(2025 - 01 - 02),
            excerpt: String::new(),
            cover_image: None,
            read_time: Some("4 min read".into()),
        };

        let json = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(json["publishedDate"], "2025-01-02");
        assert_eq!(json["readTime"], "4 min read");
        assert!(json.get("coverImage").is_none());
        assert_eq!(summary.href(), "/blog/focus");
    }
}
