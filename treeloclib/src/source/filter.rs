//! File filtering and discovery with glob pattern support.
//!
//! Discovery is lazy: [`discover_files`] returns an iterator that walks the
//! tree depth-first and yields matching files as it goes.

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::debug;
use walkdir::{DirEntry, FilterEntry, IntoIter, WalkDir};

use crate::error::TreelocError;
use crate::Result;

/// Configuration for file filtering.
///
/// The default filter keeps every file in the tree.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Extension files must carry (without the dot), if any
    pub extension: Option<String>,
    /// Glob patterns to include (if empty, include all files)
    pub include: Vec<Pattern>,
    /// Glob patterns to exclude
    pub exclude: Vec<Pattern>,
    /// Skip dot-directories during the walk and as namespaces
    pub skip_hidden: bool,
}

impl FilterConfig {
    /// Create a new filter that includes all files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only keep files with this extension. A leading dot is ignored.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = Some(extension.trim_start_matches('.').to_string());
        self
    }

    /// Toggle skipping of hidden directories.
    pub fn skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self> {
        self.include.push(compile(pattern)?);
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude.push(compile(pattern)?);
        Ok(self)
    }

    /// Add multiple include patterns.
    pub fn include_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.include(pattern)?;
        }
        Ok(self)
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.exclude(pattern)?;
        }
        Ok(self)
    }

    /// Check if a path matches the filter criteria.
    ///
    /// A path matches if:
    /// 1. It carries the required extension (when one is set)
    /// 2. It matches at least one include pattern (or include is empty)
    /// 3. It doesn't match any exclude pattern
    pub fn matches(&self, path: &Path) -> bool {
        if let Some(extension) = &self.extension {
            if path.extension().is_none_or(|ext| ext != extension.as_str()) {
                return false;
            }
        }

        let path_str = path.to_string_lossy();

        if self.exclude.iter().any(|p| p.matches(&path_str)) {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|p| p.matches(&path_str))
    }
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| TreelocError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Hidden files and directories start with a dot.
pub(crate) fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn keep_any(_entry: &DirEntry) -> bool {
    true
}

fn keep_visible(entry: &DirEntry) -> bool {
    // Always include the root itself
    if entry.depth() == 0 {
        return true;
    }
    if entry.file_type().is_dir() {
        return !entry.file_name().to_str().is_some_and(is_hidden);
    }
    true
}

/// Lazy, depth-first sequence of matching files.
///
/// Entries inside a directory are visited in file-name order, so the
/// sequence is deterministic. Unreadable entries are skipped.
pub struct SourceFiles {
    walker: FilterEntry<IntoIter, fn(&DirEntry) -> bool>,
    filter: FilterConfig,
}

impl Iterator for SourceFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.walker.by_ref() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if entry.file_type().is_file() && self.filter.matches(entry.path()) {
                return Some(entry.into_path());
            }
        }
        None
    }
}

/// Discover files below `root`.
///
/// If `root` is itself a file it is yielded when it matches.
pub fn discover_files(root: impl AsRef<Path>, filter: &FilterConfig) -> Result<SourceFiles> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(TreelocError::PathNotFound(root.to_path_buf()));
    }

    let keep: fn(&DirEntry) -> bool = if filter.skip_hidden {
        keep_visible
    } else {
        keep_any
    };
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(keep);

    Ok(SourceFiles {
        walker,
        filter: filter.clone(),
    })
}
