//! Page assembly for every public route, plus static export of the site.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use askama::Template;
use time::Date;
use tokio::fs;
use tracing::info;

use crate::{
    application::{
        booking::{BookingOutcome, BookingService},
        content::BlogService,
        error::AppError,
        landing::LandingService,
    },
    domain::{
        booking::{BookingErrors, BookingSubmission},
        posts::post_href,
    },
    infra::{assets, error::InfraError},
    presentation::views::{
        BlogListView, BlogTemplate, BookedTemplate, BookedView, BookingFormView, ErrorPageView,
        ErrorTemplate, LandingTemplate, LandingView, LayoutChrome, LayoutContext, PageMetaView,
        PostDetailView, PostTemplate,
    },
};

/// Shared services behind every public page.
#[derive(Clone)]
pub struct SiteService {
    blog: Arc<BlogService>,
    booking: Arc<BookingService>,
    landing: Arc<LandingService>,
    chrome: LayoutChrome,
}

impl SiteService {
    pub fn new(
        blog: Arc<BlogService>,
        booking: Arc<BookingService>,
        landing: Arc<LandingService>,
        base_url: &str,
    ) -> Self {
        let chrome = LayoutChrome::for_site(landing.identity(), base_url);
        Self {
            blog,
            booking,
            landing,
            chrome,
        }
    }

    pub fn blog(&self) -> &BlogService {
        &self.blog
    }

    pub fn booking(&self) -> &BookingService {
        &self.booking
    }

    pub fn chrome(&self) -> LayoutChrome {
        self.chrome.clone()
    }

    pub fn landing(&self, today: Date) -> LandingTemplate {
        self.landing_with_form(today, BookingFormView::empty(today.to_string()))
    }

    /// The landing page with a rejected submission echoed back into the form.
    pub fn landing_with_errors(
        &self,
        today: Date,
        submission: BookingSubmission,
        errors: &BookingErrors,
    ) -> LandingTemplate {
        let form = BookingFormView::with_errors(submission, errors, today.to_string());
        self.landing_with_form(today, form)
    }

    fn landing_with_form(&self, today: Date, form: BookingFormView) -> LandingTemplate {
        let view = LayoutContext::new(
            self.chrome(),
            LandingView {
                page: self.landing.content(today),
                form,
            },
        );
        LandingTemplate { view }
    }

    pub fn blog_index(&self) -> Result<BlogTemplate, AppError> {
        let summaries = self.blog.index()?;
        let chrome = self.chrome().at("/blog").titled("Blog");
        let view = LayoutContext::new(chrome, BlogListView::from_summaries(&summaries));
        Ok(BlogTemplate { view })
    }

    pub fn post(&self, identifier: &str, today: Date) -> Result<PostTemplate, AppError> {
        let rendered = self.blog.post(identifier, today)?;
        let href = post_href(&rendered.document.identifier);
        let chrome = self.chrome().at(&href);
        let meta = PageMetaView {
            title: format!("{} | {}", rendered.document.title, chrome.brand.title),
            description: rendered.document.excerpt.clone(),
            canonical: chrome.meta.canonical.clone(),
        };
        let chrome = LayoutChrome { meta, ..chrome };
        let view = LayoutContext::new(chrome, PostDetailView::from(rendered));
        Ok(PostTemplate { view })
    }

    pub fn booked(&self, outcome: BookingOutcome) -> BookedTemplate {
        let chrome = self.chrome().at("/book").titled("Booking Submitted");
        BookedTemplate {
            view: LayoutContext::new(chrome, BookedView::from(outcome)),
        }
    }

    pub fn not_found(&self) -> ErrorTemplate {
        ErrorTemplate {
            view: LayoutContext::new(
                self.chrome().titled("Page Not Found"),
                ErrorPageView::not_found(),
            ),
        }
    }
}

/// Write the landing page, the blog index, every post and the embedded assets
/// under `output`, using the same routes the server answers on.
pub async fn export_site(site: &SiteService, output: &Path, today: Date) -> Result<usize, AppError> {
    let mut written = 0usize;

    write_page(output, "", site.landing(today)).await?;
    written += 1;

    write_page(output, "blog", site.blog_index()?).await?;
    written += 1;

    for summary in site.blog().index()? {
        let post = site.post(&summary.identifier, today)?;
        write_page(output, summary.href().trim_start_matches('/'), post).await?;
        written += 1;
    }

    write_file(&output.join("404.html"), render(site.not_found())?.as_bytes()).await?;
    written += 1;

    let static_root = output.join(assets::STATIC_PREFIX.trim_start_matches('/'));
    for (path, contents) in assets::embedded_files() {
        write_file(&static_root.join(path), contents).await?;
        written += 1;
    }

    info!(
        target = "gambit::site::export",
        output = %output.display(),
        files = written,
        "site exported"
    );
    Ok(written)
}

async fn write_page<T: Template>(output: &Path, route: &str, page: T) -> Result<(), AppError> {
    let html = render(page)?;
    let path: PathBuf = if route.is_empty() {
        output.join("index.html")
    } else {
        output.join(route).join("index.html")
    };
    write_file(&path, html.as_bytes()).await
}

fn render<T: Template>(page: T) -> Result<String, AppError> {
    page.render()
        .map_err(|err| AppError::unexpected(format!("failed to render page: {err}")))
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|err| InfraError::content(parent, err))?;
    }
    fs::write(path, contents)
        .await
        .map_err(|err| InfraError::content(path, err))?;
    Ok(())
}
