use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::{
    booking::BookingOutcome,
    content::RenderedPost,
    error::{ErrorReport, HttpError},
    landing::{LandingContent, SiteIdentity},
};
use crate::domain::{
    booking::{BookingErrors, BookingField, BookingSubmission},
    posts::{PostSummary, format_human_date},
};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome, content: ErrorPageView) -> Response {
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
    pub phone: String,
    pub phone_href: String,
    pub email: String,
    pub address: String,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub canonical: String,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: Vec<NavigationLinkView>,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

const NAVIGATION: [(&str, &str); 6] = [
    ("Home", "/#home"),
    ("Programs", "/#programs"),
    ("Achievements", "/#achievements"),
    ("Book a Demo", "/#book"),
    ("FAQ", "/#faq"),
    ("Blog", "/blog"),
];

impl LayoutChrome {
    /// Site-wide chrome; `base_url` must end with `/`.
    pub fn for_site(identity: &SiteIdentity, base_url: &str) -> Self {
        let phone_digits: String = identity
            .contact_phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();

        Self {
            brand: BrandView {
                title: identity.organization.clone(),
                href: "/".to_string(),
            },
            navigation: NAVIGATION
                .iter()
                .map(|&(label, href)| NavigationLinkView { label, href })
                .collect(),
            footer: FooterView {
                copy: format!("© {}. All rights reserved.", identity.organization),
                phone: identity.contact_phone.clone(),
                phone_href: format!("tel:{phone_digits}"),
                email: identity.contact_email.clone(),
                address: identity.contact_address.clone(),
            },
            meta: PageMetaView {
                title: format!("{} | {}", identity.organization, identity.tagline),
                description: identity.tagline.clone(),
                canonical: base_url.to_string(),
            },
        }
    }

    /// Point the canonical link at `path`, resolved against the site root.
    pub fn at(self, path: &str) -> Self {
        let root = self.meta.canonical.trim_end_matches('/').to_string();
        let canonical = format!("{root}/{}", path.trim_start_matches('/'));
        Self {
            meta: PageMetaView {
                canonical,
                ..self.meta
            },
            ..self
        }
    }

    pub fn titled(self, title: &str) -> Self {
        let brand = self.brand.title.clone();
        Self {
            meta: PageMetaView {
                title: format!("{title} | {brand}"),
                ..self.meta
            },
            ..self
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: Vec<NavigationLinkView>,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

/// Booking form state: the entered values plus any field messages.
#[derive(Clone, Default)]
pub struct BookingFormView {
    pub values: BookingSubmission,
    pub terms_checked: bool,
    pub name_error: Option<&'static str>,
    pub city_error: Option<&'static str>,
    pub contact_number_error: Option<&'static str>,
    pub date_of_birth_error: Option<&'static str>,
    pub email_error: Option<&'static str>,
    pub device_error: Option<&'static str>,
    pub language_error: Option<&'static str>,
    pub terms_error: Option<&'static str>,
    /// Latest selectable date of birth, `YYYY-MM-DD`.
    pub max_date: String,
}

impl BookingFormView {
    pub fn empty(max_date: String) -> Self {
        Self {
            max_date,
            ..Self::default()
        }
    }

    pub fn with_errors(
        submission: BookingSubmission,
        errors: &BookingErrors,
        max_date: String,
    ) -> Self {
        Self {
            terms_checked: submission.terms_accepted(),
            name_error: errors.message_for(BookingField::Name),
            city_error: errors.message_for(BookingField::City),
            contact_number_error: errors.message_for(BookingField::ContactNumber),
            date_of_birth_error: errors.message_for(BookingField::DateOfBirth),
            email_error: errors.message_for(BookingField::Email),
            device_error: errors.message_for(BookingField::Device),
            language_error: errors.message_for(BookingField::Language),
            terms_error: errors.message_for(BookingField::Terms),
            values: submission,
            max_date,
        }
    }

    pub fn has_errors(&self) -> bool {
        [
            self.name_error,
            self.city_error,
            self.contact_number_error,
            self.date_of_birth_error,
            self.email_error,
            self.device_error,
            self.language_error,
            self.terms_error,
        ]
        .iter()
        .any(Option::is_some)
    }

    pub fn device_checked(&self, device: &str) -> bool {
        self.values.device.trim() == device
    }

    pub fn language_checked(&self, language: &str) -> bool {
        self.values.language.trim() == language
    }
}

pub struct LandingView {
    pub page: LandingContent,
    pub form: BookingFormView,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct LandingTemplate {
    pub view: LayoutContext<LandingView>,
}

pub struct PostCard {
    pub href: String,
    pub title: String,
    pub date_label: String,
    pub date_iso: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub read_time: Option<String>,
}

impl From<&PostSummary> for PostCard {
    fn from(summary: &PostSummary) -> Self {
        Self {
            href: summary.href(),
            title: summary.title.clone(),
            date_label: format_human_date(summary.published_date),
            date_iso: summary.published_date.to_string(),
            excerpt: summary.excerpt.clone(),
            cover_image: summary.cover_image.clone(),
            read_time: summary.read_time.clone(),
        }
    }
}

pub struct BlogListView {
    pub posts: Vec<PostCard>,
}

impl BlogListView {
    pub fn from_summaries(summaries: &[PostSummary]) -> Self {
        Self {
            posts: summaries.iter().map(PostCard::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "blog.html")]
pub struct BlogTemplate {
    pub view: LayoutContext<BlogListView>,
}

pub struct PostDetailView {
    pub title: String,
    pub author: String,
    pub date_label: String,
    pub date_iso: String,
    pub read_time: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub body_html: String,
}

impl From<RenderedPost> for PostDetailView {
    fn from(post: RenderedPost) -> Self {
        let RenderedPost {
            document,
            body_html,
        } = post;
        Self {
            date_label: format_human_date(document.published_date),
            date_iso: document.published_date.to_string(),
            title: document.title,
            author: document.author,
            read_time: document.read_time,
            excerpt: document.excerpt,
            cover_image: document.cover_image,
            body_html,
        }
    }
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailView>,
}

pub struct BookedView {
    pub app_link: String,
    pub web_link: String,
    pub message: String,
}

impl From<BookingOutcome> for BookedView {
    fn from(outcome: BookingOutcome) -> Self {
        Self {
            app_link: outcome.app_link,
            web_link: outcome.web_link,
            message: outcome.message,
        }
    }
}

#[derive(Template)]
#[template(path = "booked.html")]
pub struct BookedTemplate {
    pub view: LayoutContext<BookedView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Try returning to the homepage."
                .to_string(),
            primary_action: Some(ErrorAction::home()),
        }
    }

    pub fn post_not_found() -> Self {
        Self {
            title: "Post Not Found".to_string(),
            message: "We couldn't find that article. It may have been renamed or removed."
                .to_string(),
            primary_action: Some(ErrorAction::blog()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Back to home".to_string(),
        }
    }

    pub fn blog() -> Self {
        Self {
            href: "/blog".to_string(),
            label: "Back to Blog".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SiteIdentity {
        SiteIdentity {
            organization: "Chan Chess Club".into(),
            tagline: "Shaping Global Thinkers Through Chess".into(),
            contact_phone: "+91 63795 97908".into(),
            contact_email: "chanchessclub64@gmail.com".into(),
            contact_address: "Hosur".into(),
        }
    }

    #[test]
    fn chrome_resolves_canonical_paths() {
        let chrome = LayoutChrome::for_site(&identity(), "https://chanchess.club/").at("/blog");
        assert_eq!(chrome.meta.canonical, "https://chanchess.club/blog");
        assert_eq!(chrome.footer.phone_href, "tel:+916379597908");
    }

    #[test]
    fn titled_pages_keep_the_brand() {
        let chrome = LayoutChrome::for_site(&identity(), "/").titled("Blog");
        assert_eq!(chrome.meta.title, "Blog | Chan Chess Club");
    }

    #[test]
    fn form_view_keeps_values_and_errors() {
        let submission = BookingSubmission {
            name: "A".into(),
            device: "Tablet".into(),
            ..Default::default()
        };
        let today = time::macros::date!(2025 - 10 - 27);
        let errors = submission.validate(today).expect_err("invalid");
        let view = BookingFormView::with_errors(submission, &errors, "2025-10-27".into());

        assert!(view.has_errors());
        assert_eq!(view.values.name, "A");
        assert!(view.device_checked("Tablet"));
        assert!(view.device_error.is_none());
        assert_eq!(view.name_error, Some("Name must be at least 2 characters"));
    }

    #[test]
    fn not_found_page_renders_with_404() {
        let chrome = LayoutChrome::for_site(&identity(), "/");
        let response = render_not_found_response(chrome, ErrorPageView::post_not_found());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorReport>().is_some());
    }
}
