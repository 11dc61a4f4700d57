//! Validated dotted module paths
//!
//! A module path is a dot-separated sequence of identifiers, e.g.
//! `synapse.data_types`. Paths are validated at construction so the
//! registry never has to reason about malformed keys.

use std::fmt;
use std::str::FromStr;

use sdk::errors::HostError;

/// A syntactically valid dotted namespace identifier.
///
/// Each segment must start with an ASCII letter or underscore and continue
/// with ASCII letters, digits, or underscores. At least one segment is
/// required.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(String);

impl ModulePath {
    /// Parse and validate a dotted path
    pub fn parse(path: &str) -> Result<Self, HostError> {
        if path.is_empty() {
            return Err(HostError::InvalidModulePath("empty path".to_string()));
        }
        for segment in path.split('.') {
            validate_segment(path, segment)?;
        }
        Ok(Self(path.to_string()))
    }

    /// The full dotted path
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path's segments, in order
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Append a child segment, validating it
    pub fn join(&self, child: &str) -> Result<ModulePath, HostError> {
        validate_segment(child, child)?;
        Ok(ModulePath(format!("{}.{}", self.0, child)))
    }

    /// The path with its last segment removed, if any remains
    pub fn parent(&self) -> Option<ModulePath> {
        self.0
            .rfind('.')
            .map(|idx| ModulePath(self.0[..idx].to_string()))
    }
}

fn validate_segment(path: &str, segment: &str) -> Result<(), HostError> {
    let mut chars = segment.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(HostError::InvalidModulePath(format!(
            "invalid segment '{segment}' in '{path}'"
        )));
    }
    Ok(())
}

impl FromStr for ModulePath {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_dotted_identifiers() {
        for path in ["synapse", "synapse.data_types", "a.b.c", "_x._y", "v1.v2"] {
            assert!(ModulePath::parse(path).is_ok(), "{path} should parse");
        }
    }

    #[test]
    fn test_parse_rejects_malformed_paths() {
        for path in ["", ".", "a.", ".a", "a..b", "1a", "a.1b", "a b", "a-b"] {
            assert!(ModulePath::parse(path).is_err(), "{path} should be rejected");
        }
    }

    #[test]
    fn test_join_and_parent() {
        let root = ModulePath::parse("synapse").expect("valid");
        let child = root.join("data_types").expect("valid child");
        assert_eq!(child.as_str(), "synapse.data_types");
        assert_eq!(child.parent(), Some(root));
        assert_eq!(ModulePath::parse("synapse").expect("valid").parent(), None);
    }

    #[test]
    fn test_join_rejects_dotted_child() {
        let root = ModulePath::parse("synapse").expect("valid");
        assert!(root.join("a.b").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let path = ModulePath::parse("synapse.data_types").expect("valid");
        assert_eq!(path.to_string(), "synapse.data_types");
    }
}
