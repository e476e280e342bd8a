//! Evaluation options
//!
//! Options are plain data. Hosts usually build them in code, but they can
//! also be read from a TOML table:
//!
//! ```
//! use lazyitems_core::EvaluationOptions;
//!
//! let options = EvaluationOptions::from_toml_str("glob_case_sensitive = false").unwrap();
//! assert!(!options.glob_case_sensitive);
//! assert!(options.skip_removed_glob_expansion);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Knobs that affect matching and glob expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationOptions {
    /// Whether glob fragments match item values case-sensitively
    pub glob_case_sensitive: bool,

    /// Whether `PathLike` metadata comparison distinguishes case
    pub path_like_case_sensitive: bool,

    /// Skip expanding Include globs that a later Remove/Exclude removes
    /// wholesale. The materialized list is the same either way.
    pub skip_removed_glob_expansion: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            glob_case_sensitive: true,
            path_like_case_sensitive: !cfg!(windows),
            skip_removed_glob_expansion: true,
        }
    }
}

impl EvaluationOptions {
    /// Parse options from TOML; absent keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns `InvalidOptions` for malformed TOML, unknown keys or
    /// mistyped values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
