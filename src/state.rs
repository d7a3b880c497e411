//! # Application State
//!
//! Shared state for the HTTP handlers. The state is created once during
//! server construction and shared across all request handlers behind an
//! `Arc`; the wheel index inside it is read-only, so no locking is needed
//! for concurrent requests.

use crate::index::WheelIndex;

/// State injected into every request handler.
///
/// Built explicitly at startup and passed to [`crate::build_router`], which
/// makes tests trivial to run against a synthetic index over a temporary
/// directory.
pub struct AppState {
    /// The one-shot scan result; immutable for the process lifetime
    pub index: WheelIndex,
}
