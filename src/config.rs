//! # Cache Root Discovery
//!
//! Resolution order for the pip cache directory: an explicit command-line
//! override, then the `PIP_CACHE_DIR` environment variable, then the
//! platform cache directory (`~/.cache/pip` on Linux). Absence at every
//! level is recovered by serving an empty index, never by failing startup.

use std::path::PathBuf;

use tracing::debug;

/// Environment variable pip itself honors for relocating its cache.
pub const PIP_CACHE_ENV: &str = "PIP_CACHE_DIR";

/// Resolve the pip cache root, or `None` when nothing can be determined.
pub fn resolve_cache_root(override_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(dir) = override_dir {
        debug!(dir = %dir.display(), "Using cache directory from command line");
        return Some(dir);
    }
    if let Some(dir) = std::env::var_os(PIP_CACHE_ENV) {
        let dir = PathBuf::from(dir);
        debug!(dir = %dir.display(), "Using cache directory from {PIP_CACHE_ENV}");
        return Some(dir);
    }
    let dir = dirs::cache_dir().map(|base| base.join("pip"));
    if let Some(ref dir) = dir {
        debug!(dir = %dir.display(), "Using platform default cache directory");
    }
    dir
}
