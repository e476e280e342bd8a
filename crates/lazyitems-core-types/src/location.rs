//! Source locations for diagnostics
//!
//! Every declared item operation remembers where it came from so that
//! specification errors can point back at the project file.

use serde::{Deserialize, Serialize};

/// File, line and column of a declaration
///
/// Line and column are 1-based. A value of 0 means "unknown".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ElementLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl ElementLocation {
    /// Create a location from its parts
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location with a file but no line information
    pub fn in_file(file: impl Into<String>) -> Self {
        Self::new(file, 0, 0)
    }

    /// Whether line information is available
    pub fn has_line_info(&self) -> bool {
        self.line != 0
    }

    /// Render as `file (line,column)`
    ///
    /// Falls back to `file (line)` without a column and to `file` without a
    /// line.
    pub fn location_string(&self) -> String {
        match (self.line, self.column) {
            (0, _) => self.file.clone(),
            (line, 0) => format!("{} ({})", self.file, line),
            (line, column) => format!("{} ({},{})", self.file, line, column),
        }
    }
}

impl std::fmt::Display for ElementLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.location_string())
    }
}
