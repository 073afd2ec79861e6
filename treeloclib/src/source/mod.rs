//! Source discovery: find namespaces and files to analyze.
//!
//! This module handles the first stage of the pipeline - discovering what
//! to count. It provides:
//!
//! - **Root namespaces**: the top-level directories of the source root
//! - **File filtering**: Include/exclude files with glob patterns
//!
//! ## Example
//!
//! ```rust,ignore
//! use treeloclib::source::{discover_roots, FilterConfig};
//!
//! let namespaces = discover_roots("src/main/java", false)?;
//!
//! let filter = FilterConfig::new()
//!     .exclude("**/generated/**")?;
//! ```

pub mod filter;
pub mod roots;

pub use filter::{discover_files, FilterConfig, SourceFiles};
pub use roots::{discover_roots, owning_root, top_level_dir, RootNamespace};
