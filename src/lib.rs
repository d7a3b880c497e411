//! # Wheelhouse
//!
//! A tiny HTTP server that exposes the machine's pip wheel cache as a
//! PEP 503 "simple" package index, so `pip install` can reuse previously
//! downloaded wheels without a network round-trip.
//!
//! ## Key Modules
//!
//! - [`index`]: one-shot cache scan and the read-only wheel index
//! - [`simple`]: the simple-index HTTP handlers (listings, downloads)
//! - [`server`]: router construction and the serve loop
//! - [`error`]: error handling and standardized responses
//! - [`envelope`]: best-effort decoder for legacy HTTP-cache entries
//!
//! The index is built once at startup and never mutated afterwards; a wheel
//! dropped into the cache mid-run is invisible until restart.

pub mod config;
pub mod envelope;
pub mod error;
pub mod index;
pub mod render;
pub mod server;
pub mod simple;
pub mod state;

// Re-export key types for convenience
pub use error::{ApiErrorResponse, AppError, AppResult, ErrorCode};
pub use index::{ProjectEntry, WheelIndex};
pub use server::{build_router, run_server};
pub use state::AppState;

/// Normalize a distribution name according to PEP 503.
///
/// Converts the name to lowercase and replaces runs of `[-_.]+` with a
/// single `-`, so that `Django-REST-framework`, `django_rest_framework`,
/// and `django.rest.framework` all resolve to the same lookup key.
/// Normalization is idempotent: applying it twice changes nothing.
///
/// # Examples
///
/// ```
/// # use wheelhouse::normalize_name;
/// assert_eq!(normalize_name("Django-REST-framework"), "django-rest-framework");
/// assert_eq!(normalize_name("some_package"), "some-package");
/// assert_eq!(normalize_name("package.name"), "package-name");
/// ```
pub fn normalize_name(name: &str) -> String {
    use regex::Regex;
    use std::sync::OnceLock;

    static NAME_SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let re = NAME_SEPARATORS.get_or_init(|| {
        Regex::new(r"[-_.]+").unwrap_or_else(|e| {
            panic!("Failed to compile name normalization regex: {}. This is a bug in the code - the regex pattern should be valid.", e)
        })
    });
    re.replace_all(&name.to_lowercase(), "-").to_string()
}

/// Extract the distribution name from a wheel filename stem.
///
/// The stem must already be stripped of any directory path and extension.
/// Wheel filenames put the distribution first (`requests-2.31.0-py3-none-any`),
/// so the first `-`-delimited segment is the name; a stem with no `-` is
/// returned whole. No normalization is applied here and no attempt is made
/// to parse the full version/tag grammar.
///
/// # Examples
///
/// ```
/// # use wheelhouse::distribution_name;
/// assert_eq!(distribution_name("requests-2.31.0-py3-none-any"), "requests");
/// assert_eq!(distribution_name("my_pkg-1.0"), "my_pkg");
/// ```
pub fn distribution_name(stem: &str) -> &str {
    stem.split('-').next().unwrap_or(stem)
}
