use glob::{MatchOptions, Pattern};

use crate::errors::{ItemEvalError, Result};

/// Compiled path pattern for a glob fragment
///
/// Supports `*` and `?` within one path segment and `**` across segments.
/// Both separators are accepted. Brackets are literal characters, as they
/// are in project files.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    text: String,
    pattern: Pattern,
    options: MatchOptions,
    base_directory: Option<String>,
}

impl GlobMatcher {
    /// Compile `text`
    ///
    /// # Errors
    ///
    /// Returns `InvalidGlob` when the pattern is malformed, e.g. `**` mixed
    /// with other characters inside one segment.
    pub fn compile(text: &str, case_sensitive: bool) -> Result<Self> {
        let normalized = escape_brackets(&normalize_path(text));
        let pattern = Pattern::new(&normalized).map_err(|e| ItemEvalError::InvalidGlob {
            pattern: text.to_string(),
            reason: e.msg.to_string(),
        })?;
        Ok(Self {
            text: text.to_string(),
            pattern,
            options: MatchOptions {
                case_sensitive,
                require_literal_separator: true,
                require_literal_leading_dot: false,
            },
            base_directory: None,
        })
    }

    /// Directory the pattern is relative to
    ///
    /// Item values under this directory are matched by their relative part.
    pub fn with_base_directory(mut self, directory: Option<&str>) -> Self {
        self.base_directory = directory
            .map(normalize_path)
            .map(|d| d.trim_end_matches('/').to_string())
            .filter(|d| !d.is_empty());
        self
    }

    /// The pattern text as written
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn matches(&self, value: &str) -> bool {
        let normalized = normalize_path(value);
        if self.pattern.matches_with(&normalized, self.options) {
            return true;
        }
        match &self.base_directory {
            Some(base) => normalized
                .strip_prefix(base.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some_and(|relative| self.pattern.matches_with(relative, self.options)),
            None => false,
        }
    }
}

/// Whether a fragment should be treated as a glob
pub fn has_wildcards(text: &str) -> bool {
    text.contains('*') || text.contains('?')
}

fn normalize_path(text: &str) -> String {
    let forward = text.replace('\\', "/");
    let mut rest = forward.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest.to_string()
}

fn escape_brackets(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '[' => escaped.push_str("[[]"),
            ']' => escaped.push_str("[]]"),
            other => escaped.push(other),
        }
    }
    escaped
}
