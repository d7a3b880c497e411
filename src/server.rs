//! HTTP server setup for the simple-index surface
//!
//! Route construction is separate from the serve loop so tests can drive
//! the router directly with an index built over a temporary directory.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::index::WheelIndex;
use crate::simple;
use crate::state::AppState;

/// Build the GET-only router over an explicitly constructed state.
///
/// Route precedence mirrors the matcher priority: the static `/simple`
/// routes win over the catch-all, and the catch-all itself decides between
/// download (query present) and home page. Non-GET methods are answered
/// with 405 by the method router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/simple", get(simple::simple_redirect))
        .route("/simple/", get(simple::project_listing))
        .route("/simple/{project}/", get(simple::project_links))
        .route("/", get(simple::home_or_download))
        .route("/{*rest}", get(simple::home_or_download))
        .with_state(state)
}

/// Scan the cache, bind, and serve until the process exits.
///
/// `cache_root = None` means no cache directory could be resolved; the
/// server still starts with an empty index so clients get an empty listing
/// rather than connection failures.
pub async fn run_server(host: String, port: u16, cache_root: Option<PathBuf>) -> Result<()> {
    info!("Starting Wheelhouse");

    let index = match cache_root {
        Some(root) => WheelIndex::scan(root),
        None => {
            warn!("No pip cache directory found, serving an empty index");
            WheelIndex::empty(PathBuf::new())
        }
    };
    println!(
        "📦 Indexed {} distribution(s) from {}",
        index.len(),
        index.root().display()
    );

    let state = Arc::new(AppState { index });
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse().map_err(|e| {
        error!(host = %host, port = %port, error = %e, "Invalid socket address");
        anyhow::anyhow!("Invalid socket address {}:{}: {}", host, port, e)
    })?;

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        error!(addr = %addr, error = %e, "Failed to bind to address");
        anyhow::anyhow!("Failed to bind to {}:{}: {}", host, port, e)
    })?;

    println!("✅ Simple index available at http://{}/simple/", addr);
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await.map_err(|e| {
        error!(error = %e, "Server error");
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
