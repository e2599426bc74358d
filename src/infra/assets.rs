//! Embedded static asset serving utilities.

use std::path::Path as FsPath;

use axum::{
    body::Body,
    extract::Path,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use include_dir::{Dir, File, include_dir};
use mime_guess::{Mime, MimeGuess};

use crate::application::error::ErrorReport;

static STATIC_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

/// URL prefix the bundle is mounted under.
pub const STATIC_PREFIX: &str = "/static";

/// Serve embedded static assets.
pub async fn serve_static(path: Option<Path<String>>) -> Response {
    let captured = path.map(|Path(value)| value);
    match resolve_asset(captured) {
        Some(asset) => asset.into_response(),
        None => not_found_response("infra::assets::serve_static"),
    }
}

/// Every embedded file with its path relative to the bundle root.
pub fn embedded_files() -> Vec<(&'static FsPath, &'static [u8])> {
    let mut files = Vec::new();
    collect_files(&STATIC_ASSETS, &mut files);
    files
}

fn collect_files(dir: &'static Dir<'static>, out: &mut Vec<(&'static FsPath, &'static [u8])>) {
    out.extend(
        dir.files()
            .map(|file: &'static File<'static>| (file.path(), file.contents())),
    );
    for child in dir.dirs() {
        collect_files(child, out);
    }
}

fn not_found_response(source: &'static str) -> Response {
    let mut response = StatusCode::NOT_FOUND.into_response();
    ErrorReport::from_message(source, StatusCode::NOT_FOUND, "Static asset not found")
        .attach(&mut response);
    response
}

struct Asset {
    contents: &'static [u8],
    mime: MimeGuess,
}

fn resolve_asset(path: Option<String>) -> Option<Asset> {
    let candidate = path.unwrap_or_default();
    let candidate = candidate.trim_start_matches('/');

    if candidate.is_empty() || candidate.ends_with('/') || candidate.contains("..") {
        // No traversal and no directory listings.
        return None;
    }

    let file = STATIC_ASSETS.get_file(candidate)?;
    Some(Asset {
        contents: file.contents(),
        mime: mime_guess::from_path(candidate),
    })
}

impl IntoResponse for Asset {
    fn into_response(self) -> Response {
        build_response(
            Bytes::from_static(self.contents),
            self.mime.first_or_octet_stream(),
        )
    }
}

fn build_response(bytes: Bytes, mime: Mime) -> Response {
    let len = bytes.len();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&len.to_string()) {
        headers.insert(header::CONTENT_LENGTH, value);
    }
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_is_embedded() {
        let asset = resolve_asset(Some("site.css".to_string())).expect("stylesheet");
        assert_eq!(asset.mime.first_or_octet_stream().as_ref(), "text/css");
        assert!(!asset.contents.is_empty());
    }

    #[test]
    fn traversal_and_directories_are_refused() {
        assert!(resolve_asset(Some("../Cargo.toml".to_string())).is_none());
        assert!(resolve_asset(Some("js/".to_string())).is_none());
        assert!(resolve_asset(None).is_none());
    }

    #[test]
    fn embedded_files_cover_the_bundle() {
        let files = embedded_files();
        assert!(files.iter().any(|(path, _)| path.ends_with("site.css")));
        assert!(files.iter().any(|(path, _)| path.ends_with("showcase.js")));
    }
}
