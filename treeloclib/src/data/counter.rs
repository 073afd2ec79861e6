//! High-level analysis API.
//!
//! [`analyze_tree`] runs the whole pipeline over a source tree:
//!
//! 1. Discover the root namespaces and the source files
//! 2. For every file: count lines, extract imports, resolve direct
//!    dependencies and record which files it imports
//! 3. Propagate dependency sets along the recorded imports
//! 4. Assemble one [`FileReport`] per file

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::TreelocError;
use crate::options::{ClassifyOptions, CountMode, Syntax};
use crate::source::filter::{discover_files, FilterConfig};
use crate::source::roots::{discover_roots, owning_root, RootNamespace};
use crate::Result;

use super::deps::{direct_dependencies, DependencyGraph, FileId};
use super::imports::{import_path, ImportExtractor};
use super::stats::{FileReport, LineCount, NameCollision, Totals};
use super::visitor::{count_lines, read_lines};

/// Options for analyzing a tree.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Language markers; the extension is used to resolve imports to files
    pub syntax: Syntax,
    /// File filter configuration
    pub file_filter: FilterConfig,
    /// Drop getter/setter boilerplate from the enhanced count
    pub skip_accessors: bool,
    /// Compute the enhanced count next to the baseline one
    pub enhanced: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            syntax: Syntax::java(),
            file_filter: FilterConfig::new(),
            skip_accessors: false,
            enhanced: true,
        }
    }
}

impl AnalyzeOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language markers.
    pub fn syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Set file filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.file_filter = filter;
        self
    }

    /// Toggle accessor stripping in the enhanced count.
    pub fn skip_accessors(mut self, skip: bool) -> Self {
        self.skip_accessors = skip;
        self
    }

    /// Toggle the enhanced count.
    pub fn enhanced(mut self, enhanced: bool) -> Self {
        self.enhanced = enhanced;
        self
    }

    fn classify_options(&self, mode: CountMode) -> ClassifyOptions {
        ClassifyOptions::new()
            .mode(mode)
            .skip_accessors(self.skip_accessors)
            .syntax(self.syntax.clone())
    }
}

/// Result of analyzing a tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Normalized input root
    pub root: PathBuf,
    /// Root namespace names, sorted
    pub namespaces: Vec<String>,
    /// One record per file, sorted by path
    pub files: Vec<FileReport>,
    /// File names shared by more than one file
    pub collisions: Vec<NameCollision>,
}

impl AnalysisReport {
    /// Record for a path.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&FileReport> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path == path)
    }

    /// Records keyed by bare file name.
    ///
    /// When names collide the record with the greatest path wins; the losers
    /// are listed in [`collisions`](Self::collisions).
    pub fn by_name(&self) -> BTreeMap<&str, &FileReport> {
        self.files.iter().map(|f| (f.name.as_str(), f)).collect()
    }

    /// Sums over all records.
    pub fn totals(&self) -> Totals {
        let mut totals = Totals::default();
        for file in &self.files {
            totals.add(file);
        }
        totals
    }
}

/// Per-file results of the first pass.
struct Scanned {
    id: FileId,
    path: PathBuf,
    namespace: Option<String>,
    lines: LineCount,
    enhanced_lines: Option<LineCount>,
}

/// Analyze every source file below `path`.
///
/// # Example
///
/// ```rust
/// use treeloclib::{analyze_tree, AnalyzeOptions};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// fs::create_dir_all(dir.path().join("app")).unwrap();
/// fs::create_dir_all(dir.path().join("core")).unwrap();
/// fs::write(dir.path().join("core/Base.java"), "package core;\nclass Base {}\n").unwrap();
/// fs::write(
///     dir.path().join("app/Main.java"),
///     "package app;\nimport core.Base;\n// entry\nclass Main {}\n",
/// ).unwrap();
///
/// let report = analyze_tree(dir.path(), AnalyzeOptions::new()).unwrap();
/// let main = report.by_name()["Main.java"];
/// assert_eq!(main.lines.value(), Some(3));
/// assert_eq!(main.dependencies, vec!["core"]);
/// ```
pub fn analyze_tree(path: impl AsRef<Path>, options: AnalyzeOptions) -> Result<AnalysisReport> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TreelocError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(TreelocError::NotADirectory(path.to_path_buf()));
    }
    options.syntax.validate()?;

    let root = path.canonicalize()?;
    let namespaces = discover_roots(&root, options.file_filter.skip_hidden)?;
    let extractor = ImportExtractor::new(&options.syntax)?;
    let baseline = options.classify_options(CountMode::Baseline);
    let enhanced = options
        .enhanced
        .then(|| options.classify_options(CountMode::Enhanced));

    let files: Vec<PathBuf> = discover_files(&root, &options.file_filter)?.collect();

    let mut graph = DependencyGraph::new();
    for file in &files {
        graph.add_file(file.clone());
    }

    let mut scanned = Vec::with_capacity(files.len());
    for file in files {
        let Some(id) = graph.id_of(&file) else {
            continue;
        };
        let own = owning_root(&namespaces, &root, &file);

        let content = read_lines(&file)
            .inspect_err(|e| debug!(path = %file.display(), error = %e, "could not count file"));
        let count = |opts: &ClassifyOptions| {
            LineCount::from(
                content
                    .as_ref()
                    .map(|lines| count_lines(lines, opts))
                    .map_err(|e| *e),
            )
        };
        let lines = count(&baseline);
        let enhanced_lines = enhanced.as_ref().map(count);
        let imports = content
            .as_ref()
            .map(|lines| extractor.extract_lines(lines))
            .unwrap_or_default();

        let candidates: Vec<&RootNamespace> = namespaces
            .iter()
            .filter(|ns| own.is_none_or(|o| o.name != ns.name))
            .collect();
        graph.set_direct(id, direct_dependencies(&imports, &candidates));

        for import in &imports {
            let target = import_path(&root, import, &options.syntax.extension);
            if let Some(dependency) = graph.id_of(&target) {
                graph.add_dependent(dependency, id);
            }
        }

        scanned.push(Scanned {
            id,
            path: file,
            namespace: own.map(|ns| ns.name.clone()),
            lines,
            enhanced_lines,
        });
    }

    let closure = graph.close();

    let mut reports: Vec<FileReport> = scanned
        .into_iter()
        .map(|s| FileReport {
            name: file_name(&s.path),
            dependencies: closure[s.id.index()].iter().cloned().collect(),
            path: s.path,
            namespace: s.namespace,
            lines: s.lines,
            enhanced_lines: s.enhanced_lines,
        })
        .collect();
    reports.sort_by(|a, b| a.path.cmp(&b.path));

    let collisions = find_collisions(&reports);
    for collision in &collisions {
        debug!(name = %collision.name, count = collision.paths.len(), "file name collision");
    }

    let report = AnalysisReport {
        root,
        namespaces: namespaces.into_iter().map(|ns| ns.name).collect(),
        files: reports,
        collisions,
    };
    info!(
        root = %report.root.display(),
        files = report.files.len(),
        namespaces = report.namespaces.len(),
        collisions = report.collisions.len(),
        "analysis complete"
    );
    Ok(report)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Group paths by file name and keep the names used more than once.
fn find_collisions(reports: &[FileReport]) -> Vec<NameCollision> {
    let mut by_name: BTreeMap<&str, Vec<PathBuf>> = BTreeMap::new();
    for report in reports {
        by_name
            .entry(report.name.as_str())
            .or_default()
            .push(report.path.clone());
    }

    by_name
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(name, mut paths)| {
            paths.sort();
            NameCollision {
                name: name.to_string(),
                paths,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LineCountError;
    use std::fs;
    use tempfile::tempdir;

    fn create_java_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Three projects: `web` uses `app`, `app` uses `core`, `core` uses `util`.
    fn create_project(root: &Path) {
        create_java_file(
            &root.join("util/Strings.java"),
            r#"package util;

public class Strings {
    public static String trim(String s) {
        return s.trim();
    }
}
"#,
        );
        create_java_file(
            &root.join("core/model/User.java"),
            r#"package core.model;

import util.Strings;

/**
 * A user.
 */
public class User {
    private String name;

    public String getName() {
        return name;
    }
}
"#,
        );
        create_java_file(
            &root.join("app/Service.java"),
            r#"package app;

import core.model.User;
import java.util.List;

public class Service {
    // lookup
    List<User> users;
}
"#,
        );
        create_java_file(
            &root.join("web/Controller.java"),
            r#"package web;

import app.Service;

public class Controller {
    Service service;
}
"#,
        );
    }

    fn deps(report: &AnalysisReport, name: &str) -> Vec<String> {
        report.by_name()[name].dependencies.clone()
    }

    #[test]
    fn test_analyze_tree() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let report = analyze_tree(temp.path(), AnalyzeOptions::new()).unwrap();

        assert_eq!(report.files.len(), 4);
        assert_eq!(report.namespaces, vec!["app", "core", "util", "web"]);
        assert!(report.collisions.is_empty());
    }

    #[test]
    fn test_line_counts() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let report = analyze_tree(temp.path(), AnalyzeOptions::new()).unwrap();
        let user = report.by_name()["User.java"];

        assert_eq!(user.lines, LineCount::Counted(11));
        assert_eq!(user.enhanced_lines, Some(LineCount::Counted(8)));

        let service = report.by_name()["Service.java"];
        assert_eq!(service.lines, LineCount::Counted(6));
        assert_eq!(service.enhanced_lines, Some(LineCount::Counted(6)));
    }

    #[test]
    fn test_skip_accessors() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let options = AnalyzeOptions::new().skip_accessors(true);
        let report = analyze_tree(temp.path(), options).unwrap();
        let user = report.by_name()["User.java"];

        assert_eq!(user.lines, LineCount::Counted(11));
        assert_eq!(user.enhanced_lines, Some(LineCount::Counted(5)));
    }

    #[test]
    fn test_baseline_only() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let report = analyze_tree(temp.path(), AnalyzeOptions::new().enhanced(false)).unwrap();

        assert!(report.files.iter().all(|f| f.enhanced_lines.is_none()));
    }

    #[test]
    fn test_dependencies_close_backward() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let report = analyze_tree(temp.path(), AnalyzeOptions::new()).unwrap();

        assert!(deps(&report, "Strings.java").is_empty());
        assert_eq!(deps(&report, "User.java"), vec!["util"]);
        assert_eq!(deps(&report, "Service.java"), vec!["core", "util"]);
        assert_eq!(deps(&report, "Controller.java"), vec!["app", "core", "util"]);
    }

    #[test]
    fn test_own_namespace_is_never_a_dependency() {
        let temp = tempdir().unwrap();
        create_java_file(
            &temp.path().join("app/a/A.java"),
            "package app.a;\nimport app.b.B;\nclass A {}\n",
        );
        create_java_file(
            &temp.path().join("app/b/B.java"),
            "package app.b;\nimport core.C;\nclass B {}\n",
        );
        create_java_file(&temp.path().join("core/C.java"), "package core;\nclass C {}\n");

        let report = analyze_tree(temp.path(), AnalyzeOptions::new()).unwrap();

        assert_eq!(deps(&report, "B.java"), vec!["core"]);
        // Inherited from B through the app-internal import
        assert_eq!(deps(&report, "A.java"), vec!["core"]);
        assert!(deps(&report, "C.java").is_empty());
    }

    #[test]
    fn test_unknown_import_adds_no_edge() {
        let temp = tempdir().unwrap();
        create_java_file(
            &temp.path().join("app/A.java"),
            "import core.Missing;\nclass A {}\n",
        );
        create_java_file(
            &temp.path().join("web/W.java"),
            "import app.Nope;\nclass W {}\n",
        );
        fs::create_dir_all(temp.path().join("core")).unwrap();

        let report = analyze_tree(temp.path(), AnalyzeOptions::new()).unwrap();

        assert_eq!(deps(&report, "A.java"), vec!["core"]);
        // app.Nope is a namespace hit but no file, so nothing is inherited
        assert_eq!(deps(&report, "W.java"), vec!["app"]);
    }

    #[test]
    fn test_import_cycle_terminates() {
        let temp = tempdir().unwrap();
        create_java_file(
            &temp.path().join("app/A.java"),
            "import app.B;\nimport core.X;\nclass A {}\n",
        );
        create_java_file(
            &temp.path().join("app/B.java"),
            "import app.A;\nimport web.Y;\nclass B {}\n",
        );
        fs::create_dir_all(temp.path().join("core")).unwrap();
        fs::create_dir_all(temp.path().join("web")).unwrap();

        let report = analyze_tree(temp.path(), AnalyzeOptions::new()).unwrap();

        assert_eq!(deps(&report, "A.java"), vec!["core", "web"]);
        assert_eq!(deps(&report, "B.java"), vec!["core", "web"]);
    }

    #[test]
    fn test_name_collisions_are_reported() {
        let temp = tempdir().unwrap();
        create_java_file(&temp.path().join("app/Util.java"), "class Util {}\n");
        create_java_file(&temp.path().join("core/Util.java"), "class Util {}\n");
        create_java_file(&temp.path().join("core/Other.java"), "class Other {}\n");

        let report = analyze_tree(temp.path(), AnalyzeOptions::new()).unwrap();

        assert_eq!(report.files.len(), 3);
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].name, "Util.java");
        assert_eq!(report.collisions[0].paths.len(), 2);
        assert_eq!(report.by_name().len(), 2);
    }

    #[test]
    fn test_loose_files_have_no_namespace() {
        let temp = tempdir().unwrap();
        create_java_file(&temp.path().join("Loose.java"), "import app.A;\nclass Loose {}\n");
        create_java_file(&temp.path().join("app/A.java"), "class A {}\n");

        let report = analyze_tree(temp.path(), AnalyzeOptions::new()).unwrap();
        let loose = report.by_name()["Loose.java"];

        assert_eq!(loose.namespace, None);
        assert_eq!(loose.dependencies, vec!["app"]);
        assert_eq!(report.by_name()["A.java"].namespace.as_deref(), Some("app"));
    }

    #[test]
    fn test_every_file_is_analyzed() {
        let temp = tempdir().unwrap();
        create_java_file(&temp.path().join("app/A.java"), "import core.B;\nclass A {}\n");
        create_java_file(&temp.path().join("app/build.gradle"), "apply plugin: 'java'\n");
        create_java_file(&temp.path().join(".cfg/B.java"), "class B {}\n");

        let report = analyze_tree(temp.path(), AnalyzeOptions::new()).unwrap();

        assert_eq!(report.files.len(), 3);
        assert_eq!(report.namespaces, vec![".cfg", "app"]);
        assert_eq!(
            report.by_name()["build.gradle"].lines,
            LineCount::Counted(1)
        );
        assert_eq!(
            report.by_name()["B.java"].namespace.as_deref(),
            Some(".cfg")
        );
    }

    #[test]
    fn test_extension_and_hidden_filters_are_opt_in() {
        let temp = tempdir().unwrap();
        create_java_file(&temp.path().join("app/A.java"), "class A {}\n");
        create_java_file(&temp.path().join("app/build.gradle"), "apply plugin: 'java'\n");
        create_java_file(&temp.path().join(".cfg/B.java"), "class B {}\n");

        let filter = FilterConfig::new().with_extension("java").skip_hidden(true);
        let report = analyze_tree(temp.path(), AnalyzeOptions::new().filter(filter)).unwrap();

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.namespaces, vec!["app"]);
    }

    #[test]
    fn test_filter_excludes_files() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let filter = FilterConfig::new().exclude("**/web/**").unwrap();
        let report = analyze_tree(temp.path(), AnalyzeOptions::new().filter(filter)).unwrap();

        assert_eq!(report.files.len(), 3);
        assert!(report.by_name().get("Controller.java").is_none());
        // The namespace itself is still known
        assert!(report.namespaces.contains(&"web".to_string()));
    }

    #[test]
    fn test_other_extension() {
        let temp = tempdir().unwrap();
        create_java_file(&temp.path().join("app/A.kt"), "import core.B;\nclass A\n");
        create_java_file(&temp.path().join("core/B.kt"), "class B\n");
        create_java_file(&temp.path().join("core/C.java"), "class C {}\n");

        let syntax = Syntax::java().with_extension("kt");
        let filter = FilterConfig::new().with_extension("kt");
        let options = AnalyzeOptions::new().syntax(syntax).filter(filter);
        let report = analyze_tree(temp.path(), options).unwrap();

        assert_eq!(report.files.len(), 2);
        assert_eq!(deps(&report, "A.kt"), vec!["core"]);
    }

    #[test]
    fn test_empty_file() {
        let temp = tempdir().unwrap();
        create_java_file(&temp.path().join("app/Empty.java"), "");

        let report = analyze_tree(temp.path(), AnalyzeOptions::new()).unwrap();
        let empty = report.by_name()["Empty.java"];

        assert_eq!(empty.lines, LineCount::Counted(0));
        assert_eq!(empty.enhanced_lines, Some(LineCount::Counted(0)));
    }

    #[test]
    fn test_unreadable_file_does_not_abort() {
        let temp = tempdir().unwrap();
        create_java_file(&temp.path().join("app/Good.java"), "class Good {}\n");
        fs::write(temp.path().join("app/Bad.java"), [0xff, 0xfe, b'\n']).unwrap();

        let report = analyze_tree(temp.path(), AnalyzeOptions::new()).unwrap();

        let bad = report.by_name()["Bad.java"];
        assert_eq!(bad.lines, LineCount::Failed(LineCountError::ReadFailure));
        assert_eq!(
            bad.enhanced_lines,
            Some(LineCount::Failed(LineCountError::ReadFailure))
        );
        assert!(bad.dependencies.is_empty());
        assert_eq!(
            report.by_name()["Good.java"].lines,
            LineCount::Counted(1)
        );

        let totals = report.totals();
        assert_eq!(totals.files, 2);
        assert_eq!(totals.failed, 1);
        assert_eq!(totals.lines, 1);
    }

    #[test]
    fn test_get_by_path() {
        let temp = tempdir().unwrap();
        create_java_file(&temp.path().join("app/A.java"), "class A {}\n");

        let report = analyze_tree(temp.path(), AnalyzeOptions::new()).unwrap();
        let path = report.root.join("app/A.java");

        assert!(report.get(&path).is_some());
        assert!(report.get(report.root.join("app/B.java")).is_none());
    }

    #[test]
    fn test_missing_root() {
        let result = analyze_tree("/nonexistent/treeloc", AnalyzeOptions::new());
        assert!(matches!(result, Err(TreelocError::PathNotFound(_))));
    }

    #[test]
    fn test_root_is_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("A.java");
        fs::write(&file, "class A {}\n").unwrap();

        let result = analyze_tree(&file, AnalyzeOptions::new());
        assert!(matches!(result, Err(TreelocError::NotADirectory(_))));
    }

    #[test]
    fn test_invalid_syntax() {
        let temp = tempdir().unwrap();
        let mut syntax = Syntax::java();
        syntax.line_comment.clear();

        let result = analyze_tree(temp.path(), AnalyzeOptions::new().syntax(syntax));
        assert!(matches!(result, Err(TreelocError::InvalidSyntax(_))));
    }
}
