//! Data collection: classify lines and resolve dependencies.
//!
//! This module handles the second stage of the pipeline - reading source
//! files and turning them into per-file records. It provides:
//!
//! - **Classification**: line visitor for the baseline and enhanced counts
//! - **Accessors**: detection of getter/setter boilerplate
//! - **Imports**: extraction of import paths from source lines
//! - **Dependencies**: direct root namespace sets and their propagation
//! - **Analysis**: the high-level `analyze_tree` entry point
//!
//! ## Example
//!
//! ```rust,ignore
//! use treeloclib::data::{analyze_tree, AnalyzeOptions};
//!
//! let report = analyze_tree("src/main/java", AnalyzeOptions::new())?;
//! println!("Total lines: {}", report.totals().lines);
//! ```

pub mod accessors;
pub mod counter;
pub mod deps;
pub mod imports;
pub mod stats;
pub mod visitor;

pub use accessors::mark_accessors;
pub use counter::{analyze_tree, AnalysisReport, AnalyzeOptions};
pub use deps::{direct_dependencies, DependencyGraph, DependencySet, FileId};
pub use imports::{import_path, ImportExtractor};
pub use stats::{FileReport, LineCount, NameCollision, Totals};
pub use visitor::{count_file, count_lines, count_str, read_lines, read_lines_from, Visitor};
