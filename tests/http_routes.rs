use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use gambit::{
    application::{
        booking::BookingService,
        content::BlogService,
        landing::{LandingService, SiteIdentity},
        render::markdown_renderer,
        site::SiteService,
    },
    domain::{booking::MessagingLink, posts::DocumentSet},
    infra::http::{HttpState, RequestContext, build_router},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

const VALID_FORM: &str = "name=Kavin&city=Chennai&contact_number=9123456780\
    &date_of_birth=2017-08-21&email=kavin.parent%40example.in\
    &device=Laptop&language=Tamil&terms=on";

fn router() -> Router {
    let mut documents = DocumentSet::new();
    documents.push(
        "content/opening-principles.md",
        "---\ntitle: Opening Principles\ndate: 2025-03-05\nexcerpt: Control the centre.\n---\n\nKnights before bishops.\n",
    );

    let identity = SiteIdentity {
        organization: "Chan Chess Club".into(),
        tagline: "Shaping Global Thinkers Through Chess".into(),
        contact_phone: "+91 63795 97908".into(),
        contact_email: "chanchessclub64@gmail.com".into(),
        contact_address: "Hosur".into(),
    };
    let link = MessagingLink::new("whatsapp", "916379597908");
    let site = SiteService::new(
        Arc::new(BlogService::new(
            Arc::new(documents),
            markdown_renderer(),
            "Chan Chess Club",
        )),
        Arc::new(BookingService::new(link.clone(), "Chan Chess Club")),
        Arc::new(LandingService::new(identity, link)),
        "https://chanchess.club/",
    );

    build_router(HttpState {
        site: Arc::new(site),
    })
}

async fn get(path: &str) -> (StatusCode, String) {
    let response = router()
        .oneshot(Request::get(path).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

async fn book(form: &'static str) -> (StatusCode, String) {
    let request = Request::post("/book")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .expect("request");
    let response = router().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn landing_page_renders() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Chan Chess Club"));
    assert!(body.contains("Student Achievements"));
    assert!(body.contains("action=\"/book\""));
    assert!(body.contains("https://wa.me/916379597908"));
}

#[tokio::test]
async fn blog_lists_posts() {
    let (status, body) = get("/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("href=\"/blog/opening-principles\""));
    assert!(body.contains("March 5, 2025"));
}

#[tokio::test]
async fn post_page_renders_body() {
    let (status, body) = get("/blog/opening-principles").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<p>Knights before bishops.</p>"));
    assert!(body.contains("https://chanchess.club/blog/opening-principles"));
}

#[tokio::test]
async fn missing_post_is_a_404_page() {
    let (status, body) = get("/blog/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Post Not Found"));
    assert!(body.contains("Back to Blog"));
}

#[tokio::test]
async fn unknown_route_is_a_404_page() {
    let (status, body) = get("/no/such/page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page Not Found"));
}

#[tokio::test]
async fn valid_booking_hands_off_to_messaging() {
    let (status, body) = book(VALID_FORM).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("http-equiv=\"refresh\""));
    assert!(body.contains("whatsapp://send?phone=916379597908"));
    assert!(body.contains("https://wa.me/916379597908?text=%2ANew%20Demo%20Booking%20Request%2A"));
}

#[tokio::test]
async fn invalid_booking_re_renders_the_form() {
    let (status, body) = book("name=K&city=Chennai&device=Laptop").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Name must be at least 2 characters"));
    assert!(body.contains("value=\"Chennai\""));
    assert!(body.contains("value=\"Laptop\" checked"));
    assert!(!body.contains("whatsapp://send"));
}

#[tokio::test]
async fn static_assets_are_served() {
    let response = router()
        .oneshot(
            Request::get("/static/site.css")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).expect("type"),
        "text/css"
    );

    let (status, _) = get("/static/missing.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_check_and_request_ids() {
    let response = router()
        .oneshot(Request::get("/_health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let context = response
        .extensions()
        .get::<RequestContext>()
        .expect("request context");
    assert!(!context.request_id.is_empty());
}
