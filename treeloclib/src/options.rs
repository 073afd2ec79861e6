//! Input options that control how lines are classified and imports matched.
//!
//! The defaults describe Java sources: `//` line comments, `/* */` block
//! comments, `"""` text blocks and `import a.b.C;` statements.

use crate::error::TreelocError;
use crate::Result;

/// Lexical markers of the analyzed language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    /// File extension (without the dot) that imports resolve to
    pub extension: String,
    /// Line comment marker
    pub line_comment: String,
    /// Block comment opener
    pub block_open: String,
    /// Block comment closer
    pub block_close: String,
    /// Multi-line string delimiter
    pub text_block: String,
    /// Keyword that starts an import statement
    pub import_keyword: String,
    /// Statement terminator ending an import
    pub terminator: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Self::java()
    }
}

impl Syntax {
    /// Java markers.
    pub fn java() -> Self {
        Self {
            extension: "java".to_string(),
            line_comment: "//".to_string(),
            block_open: "/*".to_string(),
            block_close: "*/".to_string(),
            text_block: "\"\"\"".to_string(),
            import_keyword: "import".to_string(),
            terminator: ";".to_string(),
        }
    }

    /// Use a different source extension. A leading dot is ignored.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Reject configurations the classifier cannot work with.
    pub fn validate(&self) -> Result<()> {
        let markers = [
            ("extension", &self.extension),
            ("line comment", &self.line_comment),
            ("block comment opener", &self.block_open),
            ("block comment closer", &self.block_close),
            ("text block delimiter", &self.text_block),
            ("import keyword", &self.import_keyword),
            ("terminator", &self.terminator),
        ];
        for (what, value) in markers {
            if value.is_empty() {
                return Err(TreelocError::InvalidSyntax(format!("{what} is empty")));
            }
        }
        Ok(())
    }
}

/// Which counting rules apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CountMode {
    /// Drop blank lines and pure line comments
    #[default]
    Baseline,
    /// Additionally drop block comments (and accessors, if enabled)
    Enhanced,
}

/// Options for a single classification.
#[derive(Debug, Clone, Default)]
pub struct ClassifyOptions {
    /// Counting rules
    pub mode: CountMode,
    /// Drop getter/setter boilerplate in enhanced mode
    pub skip_accessors: bool,
    /// Language markers
    pub syntax: Syntax,
}

impl ClassifyOptions {
    /// Create new default options (baseline, Java).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the counting mode.
    pub fn mode(mut self, mode: CountMode) -> Self {
        self.mode = mode;
        self
    }

    /// Toggle accessor stripping.
    pub fn skip_accessors(mut self, skip: bool) -> Self {
        self.skip_accessors = skip;
        self
    }

    /// Set the language markers.
    pub fn syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }
}
