//! Line visitor for source-line counting.
//!
//! Every physical line is trimmed and run through a small state machine that
//! decides whether it counts as a source line. Two rule sets exist:
//!
//! - **Baseline**: blank lines and lines that start with a line comment are
//!   dropped. Multi-line string (text block) content always counts, even when
//!   it starts with the line comment marker.
//! - **Enhanced**: baseline plus block comments (and, when requested,
//!   getter/setter boilerplate) are dropped.
//!
//! The visitor works line by line and never builds a token stream, so a
//! marker inside an ordinary string literal is seen as a marker.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::trace;

use crate::error::LineCountError;
use crate::options::{ClassifyOptions, CountMode, Syntax};

use super::accessors::mark_accessors;

/// State carried from one line to the next.
#[derive(Default, Debug, Copy, Clone)]
struct LineContext {
    in_text_block: bool,
    text_block_first_line: bool,
    in_block_comment: bool,
}

/// Counts source lines one line at a time.
///
/// # Example
///
/// ```rust
/// use treeloclib::{CountMode, Syntax, Visitor};
///
/// let syntax = Syntax::java();
/// let mut visitor = Visitor::new(&syntax, CountMode::Enhanced);
/// for line in ["int a = 1;", "/* note", "*/", "int b = 2;"] {
///     visitor.visit_line(line, false);
/// }
/// assert_eq!(visitor.count(), 2);
/// ```
pub struct Visitor<'a> {
    syntax: &'a Syntax,
    mode: CountMode,
    context: LineContext,
    /// Baseline state followed next to the enhanced one
    shadow: LineContext,
    count: u64,
    curr_line_no: usize,
}

impl<'a> Visitor<'a> {
    /// Create a visitor for the given markers and rules.
    pub fn new(syntax: &'a Syntax, mode: CountMode) -> Self {
        Self {
            syntax,
            mode,
            context: LineContext::default(),
            shadow: LineContext::default(),
            count: 0,
            curr_line_no: 0,
        }
    }

    /// Number of source lines seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether the visitor is currently inside a multi-line string.
    pub fn in_text_block(&self) -> bool {
        self.context.in_text_block
    }

    /// Whether the visitor is currently inside a block comment.
    pub fn in_block_comment(&self) -> bool {
        self.context.in_block_comment
    }

    /// Classify one physical line and return whether it was counted.
    ///
    /// `is_accessor` marks getter/setter boilerplate; it is only honored in
    /// enhanced mode and never inside a multi-line string.
    ///
    /// In enhanced mode the baseline rules run alongside, and a line only
    /// counts when the baseline rules count it too.
    pub fn visit_line(&mut self, raw: &str, is_accessor: bool) -> bool {
        let line = raw.trim();
        let counted = match self.mode {
            CountMode::Baseline => classify(&mut self.context, self.syntax, line, None),
            CountMode::Enhanced => {
                let baseline = classify(&mut self.shadow, self.syntax, line, None);
                let enhanced =
                    classify(&mut self.context, self.syntax, line, Some(is_accessor));
                baseline && enhanced
            }
        };
        self.finish_line(line, counted);
        counted
    }

    fn finish_line(&mut self, line: &str, counted: bool) {
        self.curr_line_no += 1;
        if counted {
            self.count += 1;
        }
        trace!(
            line_no = self.curr_line_no,
            counted,
            in_text_block = self.context.in_text_block,
            in_block_comment = self.context.in_block_comment,
            "{line}"
        );
    }
}

/// Apply one rule set to a trimmed line. `accessor` is `Some` in enhanced
/// mode and carries whether the line is getter/setter boilerplate.
fn classify(
    context: &mut LineContext,
    syntax: &Syntax,
    line: &str,
    accessor: Option<bool>,
) -> bool {
    let enhanced = accessor.is_some();
    let mut counted = false;
    // End column of a block comment opener found on this very line
    let mut opener_end = None;

    if !context.in_text_block && !context.in_block_comment {
        // Strings first: a text block opener is never part of a comment
        if opens_text_block(line, syntax) {
            context.in_text_block = true;
            context.text_block_first_line = true;
        } else if enhanced {
            if let Some(start) = block_comment_opener(line, syntax) {
                context.in_block_comment = true;
                opener_end = Some(start + syntax.block_open.len());
                // Code in front of the comment
                counted = start != 0;
            }
        }
    }

    let pure_line_comment = line.starts_with(&syntax.line_comment) && !context.in_text_block;
    if !context.in_block_comment && !line.is_empty() && !pure_line_comment {
        let dropped_accessor = accessor == Some(true) && !context.in_text_block;
        if !dropped_accessor {
            counted = true;
        }
    }

    if context.in_text_block && !context.text_block_first_line && line.contains(&syntax.text_block)
    {
        context.in_text_block = false;
    }
    context.text_block_first_line = false;

    if context.in_block_comment {
        if let Some(close) = line.rfind(&syntax.block_close) {
            // A closer starting exactly where this line's opener ended
            // does not close the comment.
            if opener_end != Some(close) {
                context.in_block_comment = false;
                // Exactly one character after the closer is code
                let trailing = &line[close + syntax.block_close.len()..];
                if trailing.chars().count() == 1 {
                    counted = true;
                }
            }
        }
    }

    counted
}

/// The line holds a text block delimiter that is not preceded by the start of
/// a line or block comment.
fn opens_text_block(line: &str, syntax: &Syntax) -> bool {
    let Some(quote) = line.find(&syntax.text_block) else {
        return false;
    };
    !starts_before(line, &syntax.line_comment, quote)
        && !starts_before(line, &syntax.block_open, quote)
}

/// Column of the block comment opener on this line, if any.
///
/// The right-most opener that is not preceded by a line comment wins.
fn block_comment_opener(line: &str, syntax: &Syntax) -> Option<usize> {
    let limit = line.find(&syntax.line_comment).unwrap_or(line.len());
    line.match_indices(&syntax.block_open)
        .map(|(idx, _)| idx)
        .take_while(|&idx| idx <= limit)
        .last()
}

fn starts_before(line: &str, marker: &str, pos: usize) -> bool {
    line.find(marker).is_some_and(|idx| idx < pos)
}

/// Count source lines in an already split file.
pub fn count_lines<S: AsRef<str>>(lines: &[S], options: &ClassifyOptions) -> u64 {
    let accessors = if options.mode == CountMode::Enhanced && options.skip_accessors {
        mark_accessors(lines)
    } else {
        vec![false; lines.len()]
    };

    let mut visitor = Visitor::new(&options.syntax, options.mode);
    for (line, is_accessor) in lines.iter().zip(accessors) {
        visitor.visit_line(line.as_ref(), is_accessor);
    }
    visitor.count()
}

/// Count source lines in a string.
///
/// # Example
///
/// ```rust
/// use treeloclib::{count_str, ClassifyOptions, CountMode};
///
/// let source = "int a;\n// note\n\nint b;\n";
/// assert_eq!(count_str(source, &ClassifyOptions::new()), 2);
///
/// let source = "int a;\n/*\n note\n*/\nint b;\n";
/// assert_eq!(count_str(source, &ClassifyOptions::new()), 5);
/// assert_eq!(count_str(source, &ClassifyOptions::new().mode(CountMode::Enhanced)), 2);
/// ```
pub fn count_str(source: &str, options: &ClassifyOptions) -> u64 {
    let lines: Vec<&str> = source.lines().collect();
    count_lines(&lines, options)
}

/// Read all lines from a reader. Any failure is a [`LineCountError::ReadFailure`].
pub fn read_lines_from<R: Read>(reader: R) -> Result<Vec<String>, LineCountError> {
    BufReader::new(reader)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(|_| LineCountError::ReadFailure)
}

/// Read all lines of a file; the handle is released before returning.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>, LineCountError> {
    let file = File::open(path.as_ref()).map_err(|e| LineCountError::from_open_error(&e))?;
    read_lines_from(file)
}

/// Count source lines in a file at the given path.
///
/// # Example
///
/// ```rust
/// use treeloclib::{count_file, ClassifyOptions, LineCountError};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// let path = dir.path().join("Main.java");
/// fs::write(&path, "class Main {\n    // entry\n}\n").unwrap();
///
/// assert_eq!(count_file(&path, &ClassifyOptions::new()), Ok(2));
/// assert_eq!(
///     count_file(dir.path().join("Missing.java"), &ClassifyOptions::new()),
///     Err(LineCountError::NotFound)
/// );
/// ```
pub fn count_file(
    path: impl AsRef<Path>,
    options: &ClassifyOptions,
) -> Result<u64, LineCountError> {
    let lines = read_lines(path)?;
    Ok(count_lines(&lines, options))
}
