//! Blog listing and post lookup over the loaded document set.

use std::{collections::HashSet, sync::Arc};

use metrics::counter;
use time::Date;
use tracing::{debug, warn};

use crate::{
    application::{error::AppError, render::MarkdownRenderer},
    domain::{
        error::DomainError,
        front_matter,
        posts::{
            DEFAULT_READ_TIME, Document, DocumentSet, PostSummary, UNTITLED,
            identifier_from_path, is_routable,
        },
    },
    infra::telemetry::{BLOG_INDEX_DOCUMENTS_DROPPED_TOTAL, BLOG_POST_NOT_FOUND_TOTAL},
};

const SOURCE: &str = "application::content";

/// Build the blog listing: one summary per document carrying both a title
/// and a parseable date, newest first. Ties keep encounter order.
///
/// Identifiers are unique in the listing; the first document to claim one
/// wins, as in [`resolve`]. Identifiers that cannot be a route segment are
/// skipped. Fails only when a path has no file name to derive an identifier
/// from.
pub fn build_index(documents: &DocumentSet) -> Result<Vec<PostSummary>, DomainError> {
    let mut summaries = Vec::with_capacity(documents.len());
    let mut claimed = HashSet::new();

    for (path, raw) in documents.iter() {
        let identifier = identifier_from_path(path)?;
        if !is_routable(&identifier) {
            warn!(
                target = "gambit::content::index",
                path = %path.display(),
                identifier = %identifier,
                "identifier is not a route segment; skipped"
            );
            counter!(BLOG_INDEX_DOCUMENTS_DROPPED_TOTAL).increment(1);
            continue;
        }
        if !claimed.insert(identifier.clone()) {
            warn!(
                target = "gambit::content::index",
                path = %path.display(),
                identifier = %identifier,
                "identifier already taken by an earlier document; skipped"
            );
            counter!(BLOG_INDEX_DOCUMENTS_DROPPED_TOTAL).increment(1);
            continue;
        }
        let split = front_matter::split(raw);
        let Some(front_matter) = split.front_matter else {
            debug!(
                target = "gambit::content::index",
                identifier = %identifier,
                "no metadata block; skipped"
            );
            counter!(BLOG_INDEX_DOCUMENTS_DROPPED_TOTAL).increment(1);
            continue;
        };

        let (Some(title), Some(published_date)) =
            (front_matter.title.clone(), front_matter.published_date())
        else {
            debug!(
                target = "gambit::content::index",
                identifier = %identifier,
                has_title = front_matter.title.is_some(),
                raw_date = front_matter.date.as_deref().unwrap_or(""),
                "missing title or date; skipped"
            );
            counter!(BLOG_INDEX_DOCUMENTS_DROPPED_TOTAL).increment(1);
            continue;
        };

        summaries.push(PostSummary {
            identifier,
            title,
            published_date,
            excerpt: front_matter.excerpt.unwrap_or_default(),
            cover_image: front_matter.cover_image,
            read_time: front_matter.read_time,
        });
    }

    // `sort_by` is stable, so equal dates stay in encounter order.
    summaries.sort_by(|a, b| b.published_date.cmp(&a.published_date));
    Ok(summaries)
}

/// Look one document up by identifier and fill in defaults for whatever its
/// metadata lacks. `today` stands in for a missing or unreadable date.
///
/// Entries whose path yields no identifier cannot match and are skipped, and
/// an identifier that is not a route segment resolves to nothing.
pub fn resolve(
    documents: &DocumentSet,
    identifier: &str,
    today: Date,
    organization: &str,
) -> Option<Document> {
    if !is_routable(identifier) {
        return None;
    }
    let (_, raw) = documents.iter().find(|(path, _)| {
        identifier_from_path(path).is_ok_and(|candidate| candidate == identifier)
    })?;

    let split = front_matter::split(raw);
    let (front_matter, body) = match split.front_matter {
        Some(front_matter) => (front_matter, split.body.trim()),
        None => (Default::default(), raw),
    };

    let published_date = front_matter.published_date().unwrap_or(today);
    Some(Document {
        identifier: identifier.to_string(),
        title: front_matter.title.unwrap_or_else(|| UNTITLED.to_string()),
        published_date,
        author: front_matter
            .author
            .unwrap_or_else(|| organization.to_string()),
        excerpt: front_matter.excerpt.unwrap_or_default(),
        cover_image: front_matter.cover_image,
        read_time: front_matter
            .read_time
            .unwrap_or_else(|| DEFAULT_READ_TIME.to_string()),
        body: body.to_string(),
    })
}

/// A resolved post with its body rendered to HTML.
#[derive(Debug, Clone)]
pub struct RenderedPost {
    pub document: Document,
    pub body_html: String,
}

/// Read-only blog queries over a document set loaded at startup.
#[derive(Clone)]
pub struct BlogService {
    documents: Arc<DocumentSet>,
    renderer: Arc<MarkdownRenderer>,
    organization: Arc<str>,
}

impl BlogService {
    pub fn new(
        documents: Arc<DocumentSet>,
        renderer: Arc<MarkdownRenderer>,
        organization: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            documents,
            renderer,
            organization: organization.into(),
        }
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn index(&self) -> Result<Vec<PostSummary>, AppError> {
        let summaries = build_index(&self.documents)?;
        debug!(
            target = "gambit::content::index",
            documents = self.documents.len(),
            listed = summaries.len(),
            "blog index built"
        );
        Ok(summaries)
    }

    pub fn find(&self, identifier: &str, today: Date) -> Option<Document> {
        resolve(&self.documents, identifier, today, &self.organization)
    }

    /// Resolve and render one post. A miss is a `NotFound` domain error.
    pub fn post(&self, identifier: &str, today: Date) -> Result<RenderedPost, AppError> {
        let Some(document) = self.find(identifier, today) else {
            warn!(
                target = "gambit::content::resolve",
                source = SOURCE,
                identifier,
                "post not found"
            );
            counter!(BLOG_POST_NOT_FOUND_TOTAL).increment(1);
            return Err(DomainError::not_found("post", identifier).into());
        };

        let body_html = self.renderer.render(&document.body);
        Ok(RenderedPost {
            document,
            body_html,
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::application::render::markdown_renderer;

    const TODAY: Date = date!(2025 - 11 - 01);
    const ORG: &str = "Chan Chess Club";

    fn post(title: &str, date: &str) -> String {
        format!("---\ntitle: {title}\ndate: {date}\n---\nBody of {title}\n")
    }

    #[test]
    fn index_sorts_newest_first() {
        let documents: DocumentSet = [
            ("a.md", post("Old", "2024-01-01")),
            ("b.md", post("New", "2025-06-01")),
            ("c.md", post("Middle", "2024-09-15")),
        ]
        .into_iter()
        .collect();

        let titles: Vec<_> = build_index(&documents)
            .expect("index")
            .into_iter()
            .map(|summary| summary.title)
            .collect();
        assert_eq!(titles, vec!["New", "Middle", "Old"]);
    }

    #[test]
    fn index_is_stable_on_equal_dates() {
        let documents: DocumentSet = [
            ("first.md", post("First", "2025-01-01")),
            ("second.md", post("Second", "2025-01-01")),
            ("third.md", post("Third", "2025-01-01")),
        ]
        .into_iter()
        .collect();

        let ids: Vec<_> = build_index(&documents)
            .expect("index")
            .into_iter()
            .map(|summary| summary.identifier)
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn index_drops_documents_missing_title_or_date() {
        let documents: DocumentSet = [
            ("plain.md", "No metadata at all".to_string()),
            ("untitled.md", "---\ndate: 2025-01-01\n---\nx".to_string()),
            ("undated.md", "---\ntitle: Undated\n---\nx".to_string()),
            ("bad-date.md", "---\ntitle: Bad\ndate: someday\n---\nx".to_string()),
            ("good.md", post("Good", "2025-02-02")),
        ]
        .into_iter()
        .collect();

        let index = build_index(&documents).expect("index");
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].identifier, "good");
    }

    #[test]
    fn index_of_nothing_is_empty() {
        assert!(build_index(&DocumentSet::new()).expect("index").is_empty());
    }

    #[test]
    fn index_rejects_paths_without_a_file_name() {
        let documents: DocumentSet = [("/", post("Root", "2025-01-01"))].into_iter().collect();
        let err = build_index(&documents).expect_err("malformed path");
        assert!(matches!(err, DomainError::MalformedPath { .. }));
    }

    #[test]
    fn index_skips_identifiers_that_are_not_route_segments() {
        let documents: DocumentSet = [
            ("content/...md", post("Parent", "2025-01-01")),
            ("content/..md", post("Current", "2025-01-01")),
            ("content/kept.md", post("Kept", "2025-01-01")),
        ]
        .into_iter()
        .collect();

        let ids: Vec<_> = build_index(&documents)
            .expect("index")
            .into_iter()
            .map(|summary| summary.identifier)
            .collect();
        assert_eq!(ids, vec!["kept"]);
        assert!(resolve(&documents, "..", TODAY, ORG).is_none());
        assert!(resolve(&documents, ".", TODAY, ORG).is_none());
    }

    #[test]
    fn index_lists_each_identifier_once() {
        let documents: DocumentSet = [
            ("content/x.md", post("Markdown", "2025-01-01")),
            ("content/x.txt", post("Text", "2025-06-01")),
            ("content/y.md", post("Other", "2025-03-01")),
        ]
        .into_iter()
        .collect();

        let index = build_index(&documents).expect("index");
        let titles: Vec<_> = index.iter().map(|summary| summary.title.as_str()).collect();
        assert_eq!(titles, vec!["Other", "Markdown"]);
        assert_eq!(
            resolve(&documents, "x", TODAY, ORG).expect("found").title,
            "Markdown"
        );
    }

    #[test]
    fn summaries_carry_optional_fields() {
        let documents: DocumentSet = [(
            "fork.md",
            "---\ntitle: Forks\ndate: 2025-03-03\nexcerpt: Two at once\ncoverImage: /img/fork.png\nreadTime: 3 min read\n---\nbody",
        )]
        .into_iter()
        .collect();

        let summary = build_index(&documents).expect("index").remove(0);
        assert_eq!(summary.excerpt, "Two at once");
        assert_eq!(summary.cover_image.as_deref(), Some("/img/fork.png"));
        assert_eq!(summary.read_time.as_deref(), Some("3 min read"));
    }

    #[test]
    fn resolve_parses_block_and_trims_body() {
        let documents: DocumentSet = [("x.md", "---\ntitle: X\ndate: 2025-01-01\n---\nBODY")]
            .into_iter()
            .collect();

        let document = resolve(&documents, "x", TODAY, ORG).expect("found");
        assert_eq!(document.title, "X");
        assert_eq!(document.published_date, date!(2025 - 01 - 01));
        assert_eq!(document.body, "BODY");
        assert_eq!(document.author, ORG);
    }

    #[test]
    fn resolve_without_block_applies_defaults() {
        let raw = "Just some thoughts on the Sicilian.\n";
        let documents: DocumentSet = [("notes.txt", raw)].into_iter().collect();

        let document = resolve(&documents, "notes", TODAY, ORG).expect("found");
        assert_eq!(document.title, UNTITLED);
        assert_eq!(document.read_time, DEFAULT_READ_TIME);
        assert_eq!(document.published_date, TODAY);
        assert_eq!(document.cover_image, None);
        assert_eq!(document.body, raw);
    }

    #[test]
    fn resolve_is_lenient_where_the_index_is_strict() {
        let documents: DocumentSet = [("draft.md", "---\nauthor: Coach Priya\n---\n\nDraft\n")]
            .into_iter()
            .collect();

        assert!(build_index(&documents).expect("index").is_empty());
        let document = resolve(&documents, "draft", TODAY, ORG).expect("found");
        assert_eq!(document.author, "Coach Priya");
        assert_eq!(document.body, "Draft");
    }

    #[test]
    fn resolve_unknown_identifier_is_none() {
        let documents: DocumentSet = [("a.md", post("A", "2025-01-01"))].into_iter().collect();
        assert!(resolve(&documents, "b", TODAY, ORG).is_none());
        assert!(resolve(&documents, "A", TODAY, ORG).is_none());
    }

    #[test]
    fn resolve_returns_first_match() {
        let documents: DocumentSet = [
            ("one/dup.md", post("First", "2025-01-01")),
            ("two/dup.md", post("Second", "2025-01-02")),
        ]
        .into_iter()
        .collect();
        let document = resolve(&documents, "dup", TODAY, ORG).expect("found");
        assert_eq!(document.title, "First");
    }

    #[test]
    fn service_renders_post_html_and_reports_misses() {
        let documents: DocumentSet = [("x.md", "---\ntitle: X\n---\n**bold**")]
            .into_iter()
            .collect();
        let service = BlogService::new(Arc::new(documents), markdown_renderer(), ORG);

        let post = service.post("x", TODAY).expect("post");
        assert!(post.body_html.contains("<strong>bold</strong>"));

        let err = service.post("y", TODAY).expect_err("missing");
        assert!(matches!(
            err,
            AppError::Domain(DomainError::NotFound { .. })
        ));
    }
}
