//! # Cache Scanning and the Wheel Index
//!
//! The wheel index is built by a single recursive walk of the pip cache's
//! `wheels/` tree before the server starts accepting connections, and is
//! read-only for the lifetime of the process. Concurrent request handlers
//! can therefore read it without locking. There is no incremental update
//! path: a refresh is a full rebuild under a new index instance.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{AppError, AppResult};
use crate::{distribution_name, normalize_name};

/// All cached artifacts for one distribution.
#[derive(Debug, Clone)]
pub struct ProjectEntry {
    /// Distribution name as first seen on disk, original casing preserved
    pub display_name: String,
    /// Artifact paths in filesystem enumeration order
    pub artifacts: Vec<PathBuf>,
}

/// Read-only mapping from normalized distribution name to cached wheels.
///
/// Keys are normalized with [`normalize_name`], so a lookup succeeds for any
/// casing or separator variant of a project name; the original spelling is
/// kept in [`ProjectEntry::display_name`] for rendering.
#[derive(Debug)]
pub struct WheelIndex {
    root: PathBuf,
    projects: BTreeMap<String, ProjectEntry>,
}

impl WheelIndex {
    /// Build an index with no projects, used when no cache directory exists.
    pub fn empty(root: PathBuf) -> Self {
        WheelIndex {
            root,
            projects: BTreeMap::new(),
        }
    }

    /// Scan `{cache_root}/wheels` recursively for `*.whl` files and group
    /// them by distribution name.
    ///
    /// A missing or empty directory is not an error: it produces an empty
    /// index and the server still starts, serving an empty project listing.
    pub fn scan(cache_root: impl Into<PathBuf>) -> Self {
        let root = cache_root.into();
        let wheel_dir = root.join("wheels");
        let mut projects: BTreeMap<String, ProjectEntry> = BTreeMap::new();

        if !wheel_dir.is_dir() {
            warn!(dir = %wheel_dir.display(), "Wheel cache directory not found, serving empty index");
            return WheelIndex { root, projects };
        }

        let mut artifact_count = 0usize;
        for entry in WalkDir::new(&wheel_dir).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("whl") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                debug!(path = %path.display(), "Skipping wheel with non-UTF-8 filename");
                continue;
            };

            let name = distribution_name(stem);
            let project = projects
                .entry(normalize_name(name))
                .or_insert_with(|| ProjectEntry {
                    display_name: name.to_string(),
                    artifacts: Vec::new(),
                });
            project.artifacts.push(path.to_path_buf());
            artifact_count += 1;
        }

        info!(
            root = %root.display(),
            projects = projects.len(),
            artifacts = artifact_count,
            "Wheel cache scanned"
        );
        WheelIndex { root, projects }
    }

    /// All known projects, keyed by normalized name. Unsorted; ordering for
    /// display is a presentation concern.
    pub fn projects(&self) -> impl Iterator<Item = (&str, &ProjectEntry)> {
        self.projects.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Artifact paths for a project. The name is normalized before lookup,
    /// so the listing hrefs and any casing variant a client sends both
    /// resolve. Unknown names fail with `NotFound`.
    pub fn artifacts(&self, project: &str) -> AppResult<&[PathBuf]> {
        self.projects
            .get(&normalize_name(project))
            .map(|entry| entry.artifacts.as_slice())
            .ok_or_else(|| AppError::NotFound(format!("Unknown project: {project}")))
    }

    /// The cache root this index was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of known projects.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_wheel(cache_root: &Path, rel: &str) -> PathBuf {
        let path = cache_root.join("wheels").join(rel);
        fs::create_dir_all(path.parent().expect("wheel path should have a parent"))
            .expect("should create wheel directory");
        fs::write(&path, b"fake wheel content").expect("should write wheel file");
        path
    }

    #[test]
    fn test_scan_nonexistent_root_is_empty() {
        let index = WheelIndex::scan("/does/not/exist/anywhere");
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_scan_empty_cache_is_empty() {
        let temp = TempDir::new().expect("should create temp dir");
        fs::create_dir_all(temp.path().join("wheels")).expect("should create wheels dir");
        let index = WheelIndex::scan(temp.path());
        assert!(index.is_empty());
    }

    #[test]
    fn test_scan_groups_wheels_by_distribution() {
        let temp = TempDir::new().expect("should create temp dir");
        write_wheel(temp.path(), "foo-1.0.0-py3-none-any.whl");
        write_wheel(temp.path(), "foo-2.0.0-py3-none-any.whl");
        write_wheel(temp.path(), "bar-0.1-py3-none-any.whl");
        // not a wheel, must be ignored
        fs::write(temp.path().join("wheels/notes.txt"), b"ignored").unwrap();

        let index = WheelIndex::scan(temp.path());
        assert_eq!(index.len(), 2);
        assert_eq!(index.artifacts("foo").expect("foo should exist").len(), 2);
        assert_eq!(index.artifacts("bar").expect("bar should exist").len(), 1);
    }

    #[test]
    fn test_scan_recurses_into_hash_subdirectories() {
        // pip shards the wheel cache into nested hash directories
        let temp = TempDir::new().expect("should create temp dir");
        write_wheel(temp.path(), "ab/cd/ef/deep-1.0-py3-none-any.whl");

        let index = WheelIndex::scan(temp.path());
        assert_eq!(index.artifacts("deep").expect("deep should exist").len(), 1);
    }

    #[test]
    fn test_lookup_is_normalized() {
        let temp = TempDir::new().expect("should create temp dir");
        write_wheel(temp.path(), "My_Pkg-1.0-py3-none-any.whl");

        let index = WheelIndex::scan(temp.path());
        assert_eq!(index.artifacts("my-pkg").expect("normalized lookup").len(), 1);
        assert_eq!(index.artifacts("My_Pkg").expect("original lookup").len(), 1);
        assert_eq!(index.artifacts("MY.PKG").expect("variant lookup").len(), 1);

        let (key, entry) = index.projects().next().expect("one project");
        assert_eq!(key, "my-pkg");
        assert_eq!(entry.display_name, "My_Pkg");
    }

    #[test]
    fn test_unknown_project_is_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let index = WheelIndex::scan(temp.path());
        let err = index.artifacts("nope").expect_err("should be NotFound");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_root_is_preserved() {
        let temp = TempDir::new().expect("should create temp dir");
        let index = WheelIndex::scan(temp.path());
        assert_eq!(index.root(), temp.path());
    }
}
