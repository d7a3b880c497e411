//! # Simple-Index HTTP Handlers
//!
//! The four content modes of the index surface, in the precedence the
//! router wires them up with:
//!
//! 1. `GET /simple` redirects (303) to `/simple/`
//! 2. `GET /simple/` lists all projects
//! 3. any path with a non-empty query streams the referenced artifact file
//! 4. `GET /simple/{project}/` lists one project's cached wheels
//! 5. everything else renders the informational home page
//!
//! Listing hrefs always carry the normalized project name, and the index
//! normalizes at lookup time, so a client mechanically following links can
//! never request a name the index does not recognize.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path as AxumPath, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::render::{escape_html, render_page};
use crate::state::AppState;
use crate::{normalize_name, AppError, AppResult};

/// Characters percent-encoded in download queries. Matches Python's
/// `quote_plus`: alphanumerics and `_.-~` pass through, space becomes `+`.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Where released builds of this server live.
const CRATE_REGISTRY_URL: &str = "https://crates.io/crates/wheelhouse";

/// `GET /simple` - redirect to the canonical trailing-slash form.
pub async fn simple_redirect() -> impl IntoResponse {
    info!("Redirecting /simple to /simple/");
    (StatusCode::SEE_OTHER, [(header::LOCATION, "/simple/")])
}

/// `GET /simple/` - the project listing.
///
/// One link per known distribution, sorted case-insensitively by the
/// original on-disk name. Hrefs carry the normalized name; labels keep the
/// original casing.
pub async fn project_listing(State(state): State<Arc<AppState>>) -> Html<String> {
    info!("Generating project listing");

    let mut projects: Vec<(&str, &str)> = state
        .index
        .projects()
        .map(|(key, entry)| (key, entry.display_name.as_str()))
        .collect();
    projects.sort_by_key(|(_, display)| display.to_lowercase());

    let head = vec!["<title>Simple index</title>".to_string()];
    let mut body = Vec::with_capacity(projects.len());
    for (key, display) in projects {
        body.push(format!(
            "<a href=\"/simple/{key}/\">{}</a> ",
            escape_html(display)
        ));
    }
    Html(render_page(&body, &head))
}

/// `GET /simple/{project}/` - artifact listing, or a download when the
/// request carries a query string.
///
/// The listing links each cached wheel as
/// `/simple/{name}/?{encoded path}` with the base filename as label, the
/// form the download mode decodes on the way back in.
pub async fn project_links(
    AxumPath(project): AxumPath<String>,
    uri: Uri,
    State(state): State<Arc<AppState>>,
) -> AppResult<Response> {
    if let Some(query) = uri.query().filter(|q| !q.is_empty()) {
        return stream_artifact(query).await;
    }

    info!(project = %project, "Generating artifact listing");
    let artifacts = state.index.artifacts(&project)?;
    let name = normalize_name(&project);

    let head = vec![format!("<title>Links for {}</title>", escape_html(&project))];
    let mut body = vec![format!("<h1>Links for {}</h1>", escape_html(&project))];
    for path in artifacts {
        let target = encode_query(&path.to_string_lossy());
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        debug!(artifact = %label, "Adding artifact link");
        body.push(format!(
            "<a href=\"/simple/{name}/?{target}\">{}</a><br>",
            escape_html(&label)
        ));
    }
    Ok(Html(render_page(&body, &head)).into_response())
}

/// Catch-all handler: a request with a query string is a download from any
/// path; everything else gets the informational home page.
pub async fn home_or_download(uri: Uri, State(state): State<Arc<AppState>>) -> AppResult<Response> {
    if let Some(query) = uri.query().filter(|q| !q.is_empty()) {
        return stream_artifact(query).await;
    }

    info!(path = %uri.path(), "Serving home page");
    let title = format!("Wheelhouse v{}", env!("CARGO_PKG_VERSION"));
    let body = vec![
        format!("<h1>{title}</h1>"),
        "<a href=\"/simple/\">Project Listing</a>".to_string(),
        format!(
            "<p>Serving from {}</p>",
            escape_html(&state.index.root().display().to_string())
        ),
        format!(
            "<p>{} cached distribution(s). New wheels are picked up on restart.</p>",
            state.index.len()
        ),
        format!(
            "<p>Registry: <a href=\"{CRATE_REGISTRY_URL}\">{CRATE_REGISTRY_URL}</a></p>"
        ),
        format!(
            "<p>Source Code: <a href=\"{repo}\">{repo}</a></p>",
            repo = env!("CARGO_PKG_REPOSITORY")
        ),
    ];
    Ok(Html(render_page(&body, &[])).into_response())
}

/// Download mode: the query string is the percent-encoded filesystem path
/// of one cached artifact. Streams the file in bounded-memory chunks with
/// an exact `Content-Length`; the handle is dropped on every exit path,
/// including a client disconnect mid-stream.
async fn stream_artifact(raw_query: &str) -> AppResult<Response> {
    let path = decode_query_path(raw_query)?;
    info!(path = %path.display(), "Streaming artifact");

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound(format!("No cached artifact at {}", path.display()))
        } else {
            AppError::Io(e)
        }
    })?;
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(AppError::NotFound(format!(
            "No cached artifact at {}",
            path.display()
        )));
    }

    let stream = ReaderStream::new(file);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, metadata.len())
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::InternalError(format!("Failed to build response: {e}")))
}

/// Decode a `quote_plus`-style query back into a filesystem path.
/// Fails with a 400-class error when the bytes are not valid UTF-8.
fn decode_query_path(raw_query: &str) -> AppResult<PathBuf> {
    let spaced = raw_query.replace('+', " ");
    let decoded = percent_decode_str(&spaced).decode_utf8().map_err(|_| {
        AppError::BadRequest("Download query is not valid UTF-8 after percent-decoding".to_string())
    })?;
    Ok(PathBuf::from(decoded.into_owned()))
}

/// Encode a filesystem path for use as a download query (`quote_plus`
/// semantics: space becomes `+`, everything outside `[A-Za-z0-9_.~-]` is
/// percent-encoded).
fn encode_query(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}
