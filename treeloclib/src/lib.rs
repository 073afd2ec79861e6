//! # treeloclib
//!
//! A source-line counter and root-namespace dependency analyzer for
//! Java-like source trees.
//!
//! ## Overview
//!
//! Given a source root (for example `src/main/java`), every top-level
//! directory below it is a *root namespace*. For each source file the
//! library computes:
//!
//! - **Source lines**: lines that are neither blank nor line comments
//! - **Enhanced source lines**: the same, but block comments are dropped
//!   too, and getter/setter boilerplate can be; text block lines still
//!   count in both modes
//! - **Dependencies**: the root namespaces the file reaches through its
//!   imports, directly or through the files it imports
//!
//! ## Pipeline
//!
//! - **source**: discover root namespaces and source files
//! - **data**: classify lines, extract imports, propagate dependencies
//! - **output**: turn a report into table rows
//!
//! ## Example
//!
//! ```rust
//! use treeloclib::{analyze_tree, count_str, AnalyzeOptions, ClassifyOptions, FilterConfig};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! // Count a snippet
//! let code = "// header\nclass A {\n\n    int x;\n}\n";
//! assert_eq!(count_str(code, &ClassifyOptions::new()), 3);
//!
//! // Analyze a tree
//! let dir = tempdir().unwrap();
//! fs::create_dir_all(dir.path().join("core")).unwrap();
//! fs::write(dir.path().join("core/A.java"), code).unwrap();
//! let report = analyze_tree(dir.path(), AnalyzeOptions::new()).unwrap();
//! assert_eq!(report.totals().lines, 3);
//!
//! // Analyze with filtering
//! let filter = FilterConfig::new().exclude("**/generated/**").unwrap();
//! let report = analyze_tree(dir.path(), AnalyzeOptions::new().filter(filter)).unwrap();
//! assert_eq!(report.files.len(), 1);
//! ```

pub mod data;
pub mod error;
pub mod options;
pub mod output;
pub mod source;

pub use data::{
    analyze_tree, count_file, count_lines, count_str, direct_dependencies, import_path,
    mark_accessors, read_lines, read_lines_from, AnalysisReport, AnalyzeOptions, DependencyGraph,
    DependencySet, FileId, FileReport, ImportExtractor, LineCount, NameCollision, Totals, Visitor,
};
pub use error::{LineCountError, TreelocError};
pub use options::{ClassifyOptions, CountMode, Syntax};
pub use output::{ReportTable, TableRow};
pub use source::{discover_files, discover_roots, FilterConfig, RootNamespace, SourceFiles};

/// Result type for treeloclib operations
pub type Result<T> = std::result::Result<T, TreelocError>;
