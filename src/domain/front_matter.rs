//! Fenced metadata blocks at the top of content files.
//!
//! A document may open with a block such as
//!
//! ```text
//! ---
//! title: How Chess Builds Concentration
//! date: 2025-10-27
//! readTime: "5 min read"
//! ---
//! ## Introduction
//! ```
//!
//! Parsing is deliberately forgiving: unknown keys are ignored, values are
//! single-line, and a document without a block is all body. Nothing here
//! returns an error; missing data surfaces as `None`.

use time::{Date, format_description::FormatItem, macros::format_description};

/// Line that opens and closes a metadata block.
pub const DELIMITER: &str = "---";

const ISO_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Recognised metadata fields. Keys match case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterKey {
    Title,
    Date,
    Excerpt,
    CoverImage,
    ReadTime,
    Author,
}

impl FrontMatterKey {
    fn parse(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "title" => Some(Self::Title),
            "date" => Some(Self::Date),
            "excerpt" => Some(Self::Excerpt),
            "coverimage" => Some(Self::CoverImage),
            "readtime" => Some(Self::ReadTime),
            "author" => Some(Self::Author),
            _ => None,
        }
    }
}

/// Raw field values extracted from a metadata block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub read_time: Option<String>,
    pub author: Option<String>,
}

impl FrontMatter {
    /// Parse the lines between the delimiters.
    ///
    /// The first non-empty value for a key wins; later repetitions are ignored.
    pub fn parse(block: &str) -> Self {
        let mut front_matter = Self::default();

        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let Some(key) = FrontMatterKey::parse(key.trim()) else {
                continue;
            };
            let value = strip_quotes(value.trim());
            if value.is_empty() {
                continue;
            }

            let slot = front_matter.slot_mut(key);
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }

        front_matter
    }

    fn slot_mut(&mut self, key: FrontMatterKey) -> &mut Option<String> {
        match key {
            FrontMatterKey::Title => &mut self.title,
            FrontMatterKey::Date => &mut self.date,
            FrontMatterKey::Excerpt => &mut self.excerpt,
            FrontMatterKey::CoverImage => &mut self.cover_image,
            FrontMatterKey::ReadTime => &mut self.read_time,
            FrontMatterKey::Author => &mut self.author,
        }
    }

    /// Calendar date from the `date` field, if it holds one.
    ///
    /// Accepts `YYYY-MM-DD` optionally followed by a time component
    /// (`2025-10-27T09:00:00Z`, `2025-10-27 09:00`), which is discarded.
    pub fn published_date(&self) -> Option<Date> {
        let raw = self.date.as_deref()?;
        let day = raw
            .split(|c: char| c == 'T' || c.is_whitespace())
            .next()
            .unwrap_or(raw);
        Date::parse(day, ISO_DATE_FORMAT).ok()
    }
}

/// A document split into its optional metadata block and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDocument<'a> {
    pub front_matter: Option<FrontMatter>,
    pub body: &'a str,
}

/// Locate the leading fenced block and split it from the body.
///
/// The opening delimiter must be the first line of the document (a leading
/// byte-order mark is tolerated). An opening delimiter without a closing one
/// is not a block; the whole text is body in that case.
pub fn split(raw: &str) -> SplitDocument<'_> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return SplitDocument {
            front_matter: None,
            body: raw,
        };
    };
    if !is_delimiter(first) {
        return SplitDocument {
            front_matter: None,
            body: raw,
        };
    }

    let block_start = first.len();
    let mut cursor = block_start;
    for line in lines {
        if is_delimiter(line) {
            let block = &text[block_start..cursor];
            let body = &text[cursor + line.len()..];
            return SplitDocument {
                front_matter: Some(FrontMatter::parse(block)),
                body,
            };
        }
        cursor += line.len();
    }

    SplitDocument {
        front_matter: None,
        body: raw,
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
