use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use time::{Date, OffsetDateTime};

use crate::{
    application::{
        error::{AppError, ErrorReport},
        site::SiteService,
    },
    domain::{booking::BookingSubmission, error::DomainError},
    infra::assets::serve_static,
    presentation::views::{
        ErrorPageView, render_not_found_response, render_template_response,
    },
};

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub site: Arc<SiteService>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/blog", get(blog_index))
        .route("/blog/{identifier}", get(post_detail))
        .route("/book", post(book))
        .route("/static/{*path}", get(serve_static))
        .route("/_health", get(health))
        .fallback(fallback_router)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

async fn index(State(state): State<HttpState>) -> Response {
    render_template_response(state.site.landing(today()), StatusCode::OK)
}

async fn blog_index(State(state): State<HttpState>) -> Response {
    match state.site.blog_index() {
        Ok(page) => render_template_response(page, StatusCode::OK),
        Err(err) => err.into_response(),
    }
}

async fn post_detail(
    State(state): State<HttpState>,
    Path(identifier): Path<String>,
) -> Response {
    match state.site.post(&identifier, today()) {
        Ok(page) => render_template_response(page, StatusCode::OK),
        Err(AppError::Domain(DomainError::NotFound { .. })) => {
            render_not_found_response(state.site.chrome(), ErrorPageView::post_not_found())
        }
        Err(err) => err.into_response(),
    }
}

async fn book(
    State(state): State<HttpState>,
    Form(submission): Form<BookingSubmission>,
) -> Response {
    let today = today();
    match state.site.booking().submit(&submission, today) {
        Ok(outcome) => render_template_response(state.site.booked(outcome), StatusCode::OK),
        Err(errors) => {
            let page = state.site.landing_with_errors(today, submission, &errors);
            let mut response = render_template_response(page, StatusCode::UNPROCESSABLE_ENTITY);
            ErrorReport::from_error(
                "infra::http::public::book",
                StatusCode::UNPROCESSABLE_ENTITY,
                &errors,
            )
            .attach(&mut response);
            response
        }
    }
}

async fn health() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

async fn fallback_router(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.site.chrome(), ErrorPageView::not_found())
}
