//! Root namespace discovery.
//!
//! The first-level subdirectories of the analyzed tree are its root
//! namespaces: the project boundaries that dependencies are reported
//! against.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TreelocError;
use crate::Result;

use super::filter::is_hidden;

/// A top-level subdirectory of the input root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RootNamespace {
    /// Directory name, which is also the dotted namespace prefix
    pub name: String,
    /// Absolute directory path
    pub path: PathBuf,
}

impl RootNamespace {
    /// Create a namespace for the directory `name` below `root`.
    pub fn new(root: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = root.join(&name);
        Self { name, path }
    }

    /// Dotted form used to match import names.
    pub fn dotted(&self) -> &str {
        &self.name
    }

    /// Whether `import` lies inside this namespace.
    ///
    /// Matching respects segment boundaries: `app` prefixes `app` and
    /// `app.Main` but not `application.Main`.
    pub fn prefixes(&self, import: &str) -> bool {
        match import.strip_prefix(self.dotted()) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }
}

/// Discover the root namespaces of `root`, sorted by name.
///
/// With `skip_hidden`, dot-directories are left out, matching a file walk
/// that skips them.
pub fn discover_roots(root: impl AsRef<Path>, skip_hidden: bool) -> Result<Vec<RootNamespace>> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(TreelocError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(TreelocError::NotADirectory(root.to_path_buf()));
    }

    let entries = fs::read_dir(root).map_err(|e| TreelocError::DirectoryRead {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut namespaces = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.path().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = %entry.path().display(), "skipping non UTF-8 directory name");
            continue;
        };
        if skip_hidden && is_hidden(&name) {
            continue;
        }
        namespaces.push(RootNamespace::new(root, name));
    }

    namespaces.sort();
    debug!(
        root = %root.display(),
        namespaces = ?namespaces.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(),
        "discovered root namespaces"
    );
    Ok(namespaces)
}

/// Name of the top-level directory `file` lives in, relative to `root`.
///
/// Files directly inside `root` belong to no namespace.
pub fn top_level_dir<'p>(root: &Path, file: &'p Path) -> Option<&'p str> {
    let relative = file.strip_prefix(root).ok()?;
    let mut components = relative.components();
    let first = components.next()?;
    // A lone component is the file itself
    components.next()?;
    match first {
        Component::Normal(name) => name.to_str(),
        _ => None,
    }
}

/// The namespace that owns `file`, if any.
pub fn owning_root<'r>(
    namespaces: &'r [RootNamespace],
    root: &Path,
    file: &Path,
) -> Option<&'r RootNamespace> {
    let dir = top_level_dir(root, file)?;
    namespaces.iter().find(|ns| ns.name == dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_discover_roots() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("zeta/inner")).unwrap();
        fs::create_dir_all(temp.path().join("alpha")).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join("README.java"), "class R {}").unwrap();

        let roots = discover_roots(temp.path(), false).unwrap();
        let names: Vec<&str> = roots.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec![".git", "alpha", "zeta"]);
        assert_eq!(roots[1].path, temp.path().join("alpha"));
    }

    #[test]
    fn test_discover_roots_skipping_hidden() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("alpha")).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();

        let roots = discover_roots(temp.path(), true).unwrap();
        let names: Vec<&str> = roots.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["alpha"]);
    }

    #[test]
    fn test_discover_roots_missing() {
        let result = discover_roots("/nonexistent/treeloc/root", false);
        assert!(matches!(result, Err(TreelocError::PathNotFound(_))));
    }

    #[test]
    fn test_discover_roots_on_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("A.java");
        fs::write(&file, "class A {}").unwrap();

        let result = discover_roots(&file, false);
        assert!(matches!(result, Err(TreelocError::NotADirectory(_))));
    }

    #[test]
    fn test_prefixes_respects_segments() {
        let ns = RootNamespace::new(Path::new("/src"), "app");

        assert!(ns.prefixes("app"));
        assert!(ns.prefixes("app.Main"));
        assert!(ns.prefixes("app.util.Strings"));
        assert!(!ns.prefixes("application.Main"));
        assert!(!ns.prefixes("core.app.Main"));
    }

    #[test]
    fn test_dotted_directory_name() {
        let ns = RootNamespace::new(Path::new("/src"), "org.example");

        assert!(ns.prefixes("org.example.Main"));
        assert!(!ns.prefixes("org.other.Main"));
    }

    #[test]
    fn test_top_level_dir() {
        let root = Path::new("/src");

        assert_eq!(
            top_level_dir(root, Path::new("/src/app/Main.java")),
            Some("app")
        );
        assert_eq!(
            top_level_dir(root, Path::new("/src/app/deep/x/Y.java")),
            Some("app")
        );
        assert_eq!(top_level_dir(root, Path::new("/src/Loose.java")), None);
        assert_eq!(top_level_dir(root, Path::new("/other/app/A.java")), None);
    }

    #[test]
    fn test_owning_root() {
        let root = Path::new("/src");
        let namespaces = vec![
            RootNamespace::new(root, "app"),
            RootNamespace::new(root, "core"),
        ];

        let owner = owning_root(&namespaces, root, Path::new("/src/core/a/B.java"));
        assert_eq!(owner.map(|n| n.name.as_str()), Some("core"));
        assert!(owning_root(&namespaces, root, Path::new("/src/B.java")).is_none());
    }
}
