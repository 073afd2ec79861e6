//! Output formatting: present reports as tables.
//!
//! This module handles the final stage of the pipeline - formatting an
//! analysis report for display. It provides:
//!
//! - **ReportTable**: Table-ready data structure with headers, rows, and footer
//! - **TableRow**: Individual row with label and formatted values
//!
//! ## Example
//!
//! ```rust,ignore
//! use treeloclib::output::ReportTable;
//!
//! let table = ReportTable::from_report(&report);
//! // table.headers: ["File", "Source Lines", "Enhanced", "Dependencies"]
//! // table.rows: [TableRow { label: "User.java", values: ["11", "8", "util"] }]
//! // table.footer: TableRow { label: "Total (4 files)", ... }
//! ```

pub mod table;

pub use table::{ReportTable, TableRow};
