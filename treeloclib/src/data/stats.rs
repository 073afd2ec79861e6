//! Per-file result records.
//!
//! A [`FileReport`] combines the two line counts of one file with its closed
//! dependency set. Line counts are [`LineCount`] values: either a count or
//! the reason the file could not be read. At the serialization boundary a
//! failed count turns into its negative sentinel, so consumers that expect
//! plain integers keep working.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LineCountError;

/// Outcome of counting one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineCount {
    /// Number of source lines
    Counted(u64),
    /// The file could not be read
    Failed(LineCountError),
}

impl LineCount {
    /// The count, if the file was read.
    pub fn value(&self) -> Option<u64> {
        match self {
            Self::Counted(n) => Some(*n),
            Self::Failed(_) => None,
        }
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<LineCountError> {
        match self {
            Self::Counted(_) => None,
            Self::Failed(e) => Some(*e),
        }
    }

    /// Whether the file could not be read.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Integer form: the count, or the failure's negative sentinel.
    pub fn as_sentinel(&self) -> i64 {
        match self {
            Self::Counted(n) => i64::try_from(*n).unwrap_or(i64::MAX),
            Self::Failed(e) => e.sentinel(),
        }
    }
}

impl From<Result<u64, LineCountError>> for LineCount {
    fn from(result: Result<u64, LineCountError>) -> Self {
        match result {
            Ok(n) => Self::Counted(n),
            Err(e) => Self::Failed(e),
        }
    }
}

impl fmt::Display for LineCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sentinel())
    }
}

impl Serialize for LineCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_sentinel())
    }
}

impl<'de> Deserialize<'de> for LineCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        if let Ok(n) = u64::try_from(value) {
            return Ok(Self::Counted(n));
        }
        LineCountError::from_sentinel(value)
            .map(Self::Failed)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown line count sentinel {value}")))
    }
}

/// Result record for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Full normalized path (the unique key)
    pub path: PathBuf,
    /// Bare file name (display key, not unique)
    pub name: String,
    /// Root namespace the file lives in
    pub namespace: Option<String>,
    /// Baseline source-line count
    pub lines: LineCount,
    /// Enhanced source-line count, when requested
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub enhanced_lines: Option<LineCount>,
    /// Closed set of root namespace dependencies, sorted
    pub dependencies: Vec<String>,
}

/// Several files share one bare file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCollision {
    /// The shared file name
    pub name: String,
    /// Every path carrying that name, sorted
    pub paths: Vec<PathBuf>,
}

/// Sums over the successfully counted files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Files in the report
    pub files: usize,
    /// Files whose baseline count failed
    pub failed: usize,
    /// Sum of baseline counts
    pub lines: u64,
    /// Sum of enhanced counts
    pub enhanced_lines: u64,
}

impl Totals {
    /// Add one file to the sums.
    pub fn add(&mut self, report: &FileReport) {
        self.files += 1;
        match report.lines {
            LineCount::Counted(n) => self.lines += n,
            LineCount::Failed(_) => self.failed += 1,
        }
        if let Some(n) = report.enhanced_lines.and_then(|c| c.value()) {
            self.enhanced_lines += n;
        }
    }
}
