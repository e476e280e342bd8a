//! Matching by metadata value instead of item value
//!
//! A Remove may select items whose metadata agrees with the metadata of a
//! referenced item list, e.g. remove every `Compile` item whose `Link`
//! metadata equals the `Link` of some `Exclusions` item. Comparison is
//! ordinal, case-insensitive, or path-aware.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ItemEvalError;
use crate::model::Item;

/// How metadata values are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MetadataComparisonMode {
    /// Ordinal comparison
    #[default]
    CaseSensitive,
    /// Ordinal comparison after case folding
    CaseInsensitive,
    /// Values are paths; separators and `.`/`..` segments are normalized
    PathLike,
}

impl MetadataComparisonMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataComparisonMode::CaseSensitive => "CaseSensitive",
            MetadataComparisonMode::CaseInsensitive => "CaseInsensitive",
            MetadataComparisonMode::PathLike => "PathLike",
        }
    }

    /// Canonical comparison key for `value`, or `None` when it is empty
    ///
    /// `path_case_sensitive` only matters for `PathLike`.
    pub fn comparison_key(&self, value: &str, path_case_sensitive: bool) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        let key = match self {
            MetadataComparisonMode::CaseSensitive => value.to_string(),
            MetadataComparisonMode::CaseInsensitive => value.to_lowercase(),
            MetadataComparisonMode::PathLike => {
                let normalized = normalize_path(value);
                if path_case_sensitive {
                    normalized
                } else {
                    normalized.to_lowercase()
                }
            }
        };
        Some(key)
    }
}

impl fmt::Display for MetadataComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataComparisonMode {
    type Err = ItemEvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "casesensitive" => Ok(MetadataComparisonMode::CaseSensitive),
            "caseinsensitive" => Ok(MetadataComparisonMode::CaseInsensitive),
            "pathlike" => Ok(MetadataComparisonMode::PathLike),
            _ => Err(ItemEvalError::InvalidComparisonMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Metadata names to match on plus the comparison mode
///
/// Never empty: construction returns `None` for an empty name set, which
/// callers treat as "match on item value".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOnMetadataState {
    names: BTreeSet<String>,
    declared: usize,
    mode: MetadataComparisonMode,
}

impl MatchOnMetadataState {
    /// Build from raw names; blank names are ignored
    ///
    /// Repeated names share one entry in `names()` but still count towards
    /// `count()`.
    pub fn new<N, S>(names: N, mode: MetadataComparisonMode) -> Option<Self>
    where
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let declared: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if declared.is_empty() {
            return None;
        }
        Some(Self {
            declared: declared.len(),
            names: declared.into_iter().collect(),
            mode,
        })
    }

    /// Number of names as declared, repeats included
    pub fn count(&self) -> usize {
        self.declared
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn mode(&self) -> MetadataComparisonMode {
        self.mode
    }

    /// The name, when exactly one is held
    pub fn single_name(&self) -> Option<&str> {
        match self.declared {
            1 => self.names.iter().next().map(String::as_str),
            _ => None,
        }
    }
}

/// Comparison keys of a set of reference items
///
/// Built once per operation so each candidate is a hash lookup. An item with
/// an empty or missing value for any of the names never matches.
#[derive(Debug, Clone)]
pub struct MetadataIndex {
    names: Vec<String>,
    mode: MetadataComparisonMode,
    path_case_sensitive: bool,
    keys: HashSet<Vec<String>>,
}

impl MetadataIndex {
    pub fn build<'i, I, It>(state: &MatchOnMetadataState, path_case_sensitive: bool, items: It) -> Self
    where
        I: Item + ?Sized + 'i,
        It: IntoIterator<Item = &'i I>,
    {
        let mut index = Self {
            names: state.names().map(str::to_string).collect(),
            mode: state.mode(),
            path_case_sensitive,
            keys: HashSet::new(),
        };
        for item in items {
            if let Some(key) = index.key_of(item) {
                index.keys.insert(key);
            }
        }
        index
    }

    pub fn contains<I: Item + ?Sized>(&self, item: &I) -> bool {
        self.key_of(item).is_some_and(|key| self.keys.contains(&key))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn key_of<I: Item + ?Sized>(&self, item: &I) -> Option<Vec<String>> {
        self.names
            .iter()
            .map(|name| {
                item.metadata_value(name)
                    .and_then(|v| self.mode.comparison_key(v, self.path_case_sensitive))
            })
            .collect()
    }
}

/// Separator-agnostic path form: `\` becomes `/`, `.` segments vanish and
/// `..` consumes its parent. A leading `/` survives.
fn normalize_path(value: &str) -> String {
    let forward = value.replace('\\', "/");
    let rooted = forward.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in forward.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    if rooted {
        format!("/{}", joined)
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metadata, ProjectItem};

    fn item(value: &str, link: &str) -> ProjectItem {
        ProjectItem::new("I", value).with_metadata(Metadata::from_iter([("Link", link)]))
    }

    #[test]
    fn test_mode_parses_case_insensitively() {
        assert_eq!(
            "pathlike".parse::<MetadataComparisonMode>().unwrap(),
            MetadataComparisonMode::PathLike
        );
        assert_eq!(
            "CaseInsensitive".parse::<MetadataComparisonMode>().unwrap(),
            MetadataComparisonMode::CaseInsensitive
        );
        assert!(matches!(
            "Fuzzy".parse::<MetadataComparisonMode>(),
            Err(ItemEvalError::InvalidComparisonMode { .. })
        ));
    }

    #[test]
    fn test_default_mode_is_case_sensitive() {
        assert_eq!(
            MetadataComparisonMode::default(),
            MetadataComparisonMode::CaseSensitive
        );
    }

    #[test]
    fn test_state_rejects_empty_and_counts_repeats() {
        assert!(MatchOnMetadataState::new(Vec::<String>::new(), Default::default()).is_none());
        assert!(MatchOnMetadataState::new([" ", ""], Default::default()).is_none());

        let single = MatchOnMetadataState::new(["Link", " "], Default::default()).unwrap();
        assert_eq!(single.count(), 1);
        assert_eq!(single.single_name(), Some("Link"));

        let repeated = MatchOnMetadataState::new(["Link", "Link"], Default::default()).unwrap();
        assert_eq!(repeated.count(), 2);
        assert_eq!(repeated.names().collect::<Vec<_>>(), vec!["Link"]);
        assert_eq!(repeated.single_name(), None);

        let two = MatchOnMetadataState::new(["A", "B"], Default::default()).unwrap();
        assert_eq!(two.single_name(), None);
    }

    #[test]
    fn test_path_normalization() {
        assert_eq!(normalize_path("a\\b\\..\\c"), "a/c");
        assert_eq!(normalize_path("./a//b/"), "a/b");
        assert_eq!(normalize_path("/x/./y"), "/x/y");
        assert_eq!(normalize_path("../a"), "../a");
        assert_eq!(normalize_path("/../a"), "/a");
    }

    #[test]
    fn test_index_modes() {
        let refs = [item("r", "Sub\\File.cs")];

        let sensitive = MatchOnMetadataState::new(["Link"], MetadataComparisonMode::CaseSensitive).unwrap();
        let index = MetadataIndex::build(&sensitive, true, refs.iter());
        assert!(index.contains(&item("x", "Sub\\File.cs")));
        assert!(!index.contains(&item("x", "sub\\file.cs")));

        let insensitive =
            MatchOnMetadataState::new(["Link"], MetadataComparisonMode::CaseInsensitive).unwrap();
        let index = MetadataIndex::build(&insensitive, true, refs.iter());
        assert!(index.contains(&item("x", "SUB\\FILE.CS")));
        assert!(!index.contains(&item("x", "Sub/File.cs")));

        let path = MatchOnMetadataState::new(["Link"], MetadataComparisonMode::PathLike).unwrap();
        let index = MetadataIndex::build(&path, true, refs.iter());
        assert!(index.contains(&item("x", "Sub/./Other/../File.cs")));
        assert!(!index.contains(&item("x", "sub/file.cs")));

        let index = MetadataIndex::build(&path, false, refs.iter());
        assert!(index.contains(&item("x", "sub/file.cs")));
    }

    #[test]
    fn test_empty_metadata_never_matches() {
        let refs = [item("r", "")];
        let state = MatchOnMetadataState::new(["Link"], Default::default()).unwrap();
        let index = MetadataIndex::build(&state, true, refs.iter());

        assert!(index.is_empty());
        assert!(!index.contains(&item("x", "")));
        assert!(!index.contains(&ProjectItem::new("I", "x")));
    }
}
