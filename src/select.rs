//! Candidate discovery and random selection.
//!
//! Paths are matched in the shape `find .` prints them: relative to the scan
//! root with a leading `./`, so an exclusion like `./plain/README.md` only
//! hits the top-level file.

use anyhow::{Context, Result};
use rand::Rng;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::SelectConfig;

#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("no candidate documentation files found")]
    NoCandidates,
}

/// Which files count as candidates.
#[derive(Debug, Clone)]
pub struct Filter {
    pub file_name: String,
    pub segment: String,
    pub exclude: Vec<String>,
}

impl From<&SelectConfig> for Filter {
    fn from(config: &SelectConfig) -> Self {
        Self {
            file_name: config.file_name.clone(),
            segment: config.segment.clone(),
            exclude: config.exclude.clone(),
        }
    }
}

impl Filter {
    /// All three predicates, in order.
    pub fn matches(&self, path: &Path) -> bool {
        let rendered = path.to_string_lossy();
        has_file_name(path, &self.file_name)
            && contains_segment(&rendered, &self.segment)
            && excludes_all(&rendered, &self.exclude)
    }
}

/// The last path component is exactly `name`.
pub fn has_file_name(path: &Path, name: &str) -> bool {
    path.file_name().is_some_and(|n| n == name)
}

pub fn contains_segment(path: &str, segment: &str) -> bool {
    path.contains(segment)
}

/// None of `exclude` occurs anywhere in `path`.
pub fn excludes_all(path: &str, exclude: &[String]) -> bool {
    !exclude.iter().any(|e| path.contains(e.as_str()))
}

/// Render `path` relative to `root` with a leading `./`.
fn relative(root: &Path, path: &Path) -> PathBuf {
    let rel = path.strip_prefix(root).unwrap_or(path);
    Path::new(".").join(rel)
}

/// Walk `root` and return every matching file, sorted.
///
/// Directories whose path already contains an excluded substring are not
/// descended into; every path below them would be rejected anyway.
pub fn candidates(root: &Path, filter: &Filter) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || excludes_all(&relative(root, entry.path()).to_string_lossy(), &filter.exclude)
        });

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = relative(root, entry.path());
        if filter.matches(&rel) {
            tracing::trace!("candidate {}", rel.display());
            found.push(rel);
        }
    }
    found.sort();
    tracing::debug!("{} candidate(s) under {}", found.len(), root.display());
    Ok(found)
}

/// Choose one candidate uniformly with `rng`.
pub fn pick<'a, R: Rng + ?Sized>(
    candidates: &'a [PathBuf],
    rng: &mut R,
) -> Result<&'a PathBuf, SelectError> {
    candidates.choose(rng).ok_or(SelectError::NoCandidates)
}
