//! Getter/setter boilerplate detection.
//!
//! Recognizes the trivial accessor shapes, either on one line
//!
//! ```text
//! public String getName() { return name; }
//! public void setName(String name) { this.name = name; }
//! ```
//!
//! or spread over exactly three lines (signature, single statement, `}`).
//! Anything with more logic in the body is left alone.

use std::sync::LazyLock;

use regex::Regex;

const MODIFIERS: &str = r"(?:(?:public|protected|private|static|final|synchronized)\s+)*";
const TYPE: &str = r"[\w.$]+(?:<[\w<>\[\]?,.\s]*>)?(?:\[\])*";
const GETTER_SIGNATURE: &str = r"\s+(?:get|is)[A-Z]\w*\s*\(\s*\)\s*\{";
const SETTER_SIGNATURE: &str = r"void\s+set[A-Z]\w*\s*\(\s*(?:final\s+)?";
const SETTER_PARAMETER: &str = r"\s+\w+\s*\)\s*\{";
const GETTER_BODY: &str = r"return\s+(?:this\.)?\w+\s*;";
const SETTER_BODY: &str = r"(?:this\.)?\w+\s*=\s*\w+\s*;";

struct AccessorPatterns {
    getter_open: Regex,
    getter_inline: Regex,
    getter_body: Regex,
    setter_open: Regex,
    setter_inline: Regex,
    setter_body: Regex,
}

impl AccessorPatterns {
    fn compile() -> Option<Self> {
        let getter = [MODIFIERS, TYPE, GETTER_SIGNATURE].concat();
        let setter = [MODIFIERS, SETTER_SIGNATURE, TYPE, SETTER_PARAMETER].concat();

        Some(Self {
            getter_open: Regex::new(&format!("^{getter}$")).ok()?,
            getter_inline: Regex::new(&format!(r"^{getter}\s*{GETTER_BODY}\s*\}}$")).ok()?,
            getter_body: Regex::new(&format!("^{GETTER_BODY}$")).ok()?,
            setter_open: Regex::new(&format!("^{setter}$")).ok()?,
            setter_inline: Regex::new(&format!(r"^{setter}\s*{SETTER_BODY}\s*\}}$")).ok()?,
            setter_body: Regex::new(&format!("^{SETTER_BODY}$")).ok()?,
        })
    }

    fn is_inline(&self, line: &str) -> bool {
        self.getter_inline.is_match(line) || self.setter_inline.is_match(line)
    }

    fn is_block(&self, signature: &str, body: &str, close: &str) -> bool {
        if close != "}" {
            return false;
        }
        (self.getter_open.is_match(signature) && self.getter_body.is_match(body))
            || (self.setter_open.is_match(signature) && self.setter_body.is_match(body))
    }
}

static PATTERNS: LazyLock<Option<AccessorPatterns>> = LazyLock::new(AccessorPatterns::compile);

/// Flag every line that belongs to a trivial getter or setter.
///
/// The returned vector has one entry per input line.
pub fn mark_accessors<S: AsRef<str>>(lines: &[S]) -> Vec<bool> {
    let mut marks = vec![false; lines.len()];
    let Some(patterns) = PATTERNS.as_ref() else {
        return marks;
    };

    let trimmed: Vec<&str> = lines.iter().map(|l| l.as_ref().trim()).collect();
    let mut idx = 0;
    while idx < trimmed.len() {
        if patterns.is_inline(trimmed[idx]) {
            marks[idx] = true;
            idx += 1;
        } else if idx + 2 < trimmed.len()
            && patterns.is_block(trimmed[idx], trimmed[idx + 1], trimmed[idx + 2])
        {
            marks[idx..idx + 3].fill(true);
            idx += 3;
        } else {
            idx += 1;
        }
    }
    marks
}
