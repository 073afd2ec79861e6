//! Root namespace dependencies and their propagation along imports.
//!
//! Two steps:
//!
//! 1. [`direct_dependencies`] maps one file's imports to the foreign root
//!    namespaces they name.
//! 2. [`DependencyGraph::close`] pushes every file's direct set to all files
//!    that import it, directly or through a chain of imports. If `C` imports
//!    `B` and `B` imports `A`, then `A`'s namespaces end up in the sets of
//!    `B` and `C`.
//!
//! Per-file state lives in an arena indexed by [`FileId`]. Each propagation
//! walk stamps the files it has reached, so import cycles terminate.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::source::roots::RootNamespace;

/// The set of root namespace names a file depends on.
pub type DependencySet = BTreeSet<String>;

/// Namespaces from `candidates` that at least one import lies in.
///
/// `candidates` should exclude the file's own namespace. Stops scanning once
/// every candidate has matched.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use treeloclib::{direct_dependencies, RootNamespace};
///
/// let root = Path::new("/src");
/// let core = RootNamespace::new(root, "core");
/// let util = RootNamespace::new(root, "util");
/// let imports = ["core.model.User", "java.util.List"];
///
/// let deps = direct_dependencies(&imports, &[&core, &util]);
/// assert_eq!(deps.into_iter().collect::<Vec<_>>(), vec!["core"]);
/// ```
pub fn direct_dependencies<S: AsRef<str>>(
    imports: &[S],
    candidates: &[&RootNamespace],
) -> DependencySet {
    let mut dependencies = DependencySet::new();
    if candidates.is_empty() {
        return dependencies;
    }

    for import in imports {
        let import = import.as_ref();
        for namespace in candidates {
            if !dependencies.contains(&namespace.name) && namespace.prefixes(import) {
                dependencies.insert(namespace.name.clone());
            }
        }
        if dependencies.len() == candidates.len() {
            break;
        }
    }
    dependencies
}

/// Index of a file in a [`DependencyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

impl FileId {
    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct FileNode {
    path: PathBuf,
    direct: DependencySet,
    /// Files importing this one
    dependents: Vec<FileId>,
}

/// Reverse import graph over the files of one run.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<FileNode>,
    index: HashMap<PathBuf, FileId>,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file; registering the same path twice returns the same id.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> FileId {
        let path = path.into();
        if let Some(&id) = self.index.get(&path) {
            return id;
        }
        let id = FileId(self.nodes.len());
        self.index.insert(path.clone(), id);
        self.nodes.push(FileNode {
            path,
            direct: DependencySet::new(),
            dependents: Vec::new(),
        });
        id
    }

    /// Id of a registered path.
    pub fn id_of(&self, path: &Path) -> Option<FileId> {
        self.index.get(path).copied()
    }

    /// Path of a registered file.
    pub fn path(&self, id: FileId) -> &Path {
        &self.nodes[id.0].path
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no file is registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Replace a file's direct dependency set.
    pub fn set_direct(&mut self, id: FileId, direct: DependencySet) {
        self.nodes[id.0].direct = direct;
    }

    /// A file's direct dependency set.
    pub fn direct(&self, id: FileId) -> &DependencySet {
        &self.nodes[id.0].direct
    }

    /// Record that `dependent` imports `dependency`. Repeated edges are ignored.
    pub fn add_dependent(&mut self, dependency: FileId, dependent: FileId) {
        let dependents = &mut self.nodes[dependency.0].dependents;
        if !dependents.contains(&dependent) {
            dependents.push(dependent);
        }
    }

    /// Files importing `id`, in insertion order.
    pub fn dependents(&self, id: FileId) -> &[FileId] {
        &self.nodes[id.0].dependents
    }

    /// Closed dependency set of every file, indexed like the arena.
    ///
    /// Every file starts from its direct set; each file with a non-empty
    /// direct set then has it folded into all of its transitive dependents.
    pub fn close(&self) -> Vec<DependencySet> {
        let mut closure: Vec<DependencySet> =
            self.nodes.iter().map(|node| node.direct.clone()).collect();
        // Stamp of the last walk that reached each file; 0 means never
        let mut reached = vec![0usize; self.nodes.len()];
        let mut stack = Vec::new();
        let mut walks = 0usize;

        for (source, node) in self.nodes.iter().enumerate() {
            if node.direct.is_empty() {
                continue;
            }
            walks += 1;
            reached[source] = walks;
            stack.push(source);

            while let Some(current) = stack.pop() {
                for dependent in &self.nodes[current].dependents {
                    let dependent = dependent.0;
                    if reached[dependent] == walks {
                        continue;
                    }
                    reached[dependent] = walks;
                    closure[dependent].extend(node.direct.iter().cloned());
                    stack.push(dependent);
                }
            }
        }

        debug!(files = self.nodes.len(), walks, "propagated dependencies");
        closure
    }
}
