//! Import statement extraction.
//!
//! Only whole-line statements of the form `import a.b.C;` are recognized.
//! Wildcards, static imports and names containing digits do not match; the
//! extractor is a line filter, not a parser.

use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

use regex::Regex;
use tracing::debug;

use crate::error::TreelocError;
use crate::options::Syntax;
use crate::Result;

use super::visitor::read_lines;

/// Pulls fully-qualified names out of import statements.
#[derive(Debug, Clone)]
pub struct ImportExtractor {
    pattern: Regex,
}

impl ImportExtractor {
    /// Build an extractor for the keyword and terminator of `syntax`.
    pub fn new(syntax: &Syntax) -> Result<Self> {
        let pattern = format!(
            r"^\s*{}\s+([A-Za-z_.]+)\s*{}\s*$",
            regex::escape(&syntax.import_keyword),
            regex::escape(&syntax.terminator)
        );
        let pattern =
            Regex::new(&pattern).map_err(|e| TreelocError::InvalidSyntax(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Imported name on this line, if the line is an import statement.
    pub fn extract_line<'l>(&self, line: &'l str) -> Option<&'l str> {
        self.pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Imported names in line order.
    pub fn extract_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        lines
            .iter()
            .filter_map(|line| self.extract_line(line.as_ref()))
            .map(str::to_string)
            .collect()
    }

    /// Imported names in a string, in line order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use treeloclib::{ImportExtractor, Syntax};
    ///
    /// let extractor = ImportExtractor::new(&Syntax::java()).unwrap();
    /// let source = "package a;\nimport b.util.Strings;\n  import c.Core ;\nimport d.*;\n";
    /// assert_eq!(extractor.extract_str(source), vec!["b.util.Strings", "c.Core"]);
    /// ```
    pub fn extract_str(&self, source: &str) -> Vec<String> {
        let lines: Vec<&str> = source.lines().collect();
        self.extract_lines(&lines)
    }

    /// Imported names in a file.
    ///
    /// A file that cannot be opened or read yields no imports.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Vec<String> {
        let path = path.as_ref();
        match read_lines(path) {
            Ok(lines) => self.extract_lines(&lines),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no imports read");
                Vec::new()
            }
        }
    }
}

/// Path of the file an import would resolve to inside `root`.
///
/// `a.b.C` becomes `<root>/a/b/C.<extension>`.
pub fn import_path(root: &Path, import: &str, extension: &str) -> PathBuf {
    let relative = import.replace('.', MAIN_SEPARATOR_STR);
    root.join(format!("{relative}.{extension}"))
}
