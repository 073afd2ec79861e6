//! Table-ready data structures for analysis output.
//!
//! `ReportTable` is a pure presentation layer: it turns an
//! [`AnalysisReport`] into rows of strings that a front end can pad and
//! print, or serialize as is.

use serde::{Deserialize, Serialize};

use crate::data::counter::AnalysisReport;
use crate::data::stats::FileReport;

/// A single row in the table (data row or footer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row label (file name, or relative path when names collide)
    pub label: String,
    /// Values for each column after the label
    pub values: Vec<String>,
}

/// Table-ready analysis data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTable {
    /// Column headers, label column first
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<TableRow>,
    /// Summary row
    pub footer: TableRow,
    /// Extra lines shown below the table (name collisions, failures)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

impl ReportTable {
    /// Build the table for a report.
    ///
    /// Rows are sorted by file name, then path. Files whose name is shared
    /// with another file are labeled with their path relative to the root.
    pub fn from_report(report: &AnalysisReport) -> Self {
        let with_enhanced = report.files.iter().any(|f| f.enhanced_lines.is_some());

        let mut headers = vec!["File".to_string(), "Source Lines".to_string()];
        if with_enhanced {
            headers.push("Enhanced".to_string());
        }
        headers.push("Dependencies".to_string());

        let mut files: Vec<&FileReport> = report.files.iter().collect();
        files.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        let rows: Vec<TableRow> = files
            .into_iter()
            .map(|file| TableRow {
                label: row_label(report, file),
                values: row_values(file, with_enhanced),
            })
            .collect();

        let totals = report.totals();
        let mut footer_values = vec![totals.lines.to_string()];
        if with_enhanced {
            footer_values.push(totals.enhanced_lines.to_string());
        }
        footer_values.push(format!("{} namespaces", report.namespaces.len()));
        let footer = TableRow {
            label: format!("Total ({} files)", totals.files),
            values: footer_values,
        };

        let mut notes = Vec::new();
        for collision in &report.collisions {
            notes.push(format!(
                "{} files are named {}",
                collision.paths.len(),
                collision.name
            ));
        }
        if totals.failed > 0 {
            notes.push(format!(
                "{} files could not be read (negative counts)",
                totals.failed
            ));
        }

        ReportTable {
            headers,
            rows,
            footer,
            notes,
        }
    }

    /// Width of every column, wide enough for headers, rows and footer.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in self.rows.iter().chain(std::iter::once(&self.footer)) {
            let cells = std::iter::once(&row.label).chain(row.values.iter());
            for (idx, cell) in cells.enumerate() {
                if let Some(width) = widths.get_mut(idx) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }
        widths
    }
}

fn row_label(report: &AnalysisReport, file: &FileReport) -> String {
    let collides = report.collisions.iter().any(|c| c.name == file.name);
    if !collides {
        return file.name.clone();
    }
    file.path
        .strip_prefix(&report.root)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| file.path.to_string_lossy().to_string())
}

fn row_values(file: &FileReport, with_enhanced: bool) -> Vec<String> {
    let mut values = vec![file.lines.to_string()];
    if with_enhanced {
        values.push(
            file.enhanced_lines
                .map(|c| c.to_string())
                .unwrap_or_default(),
        );
    }
    values.push(file.dependencies.join(", "));
    values
}
