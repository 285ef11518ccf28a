use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Reserved oid of the synthetic row standing for working-tree changes.
/// It is never a valid parent reference.
pub const UNCOMMITTED: &str = "*";

/// Kind of reference pointing at a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefKind {
    Head,
    Branch,
    Remote,
    Tag,
}

/// A branch, tag or HEAD label attached to a commit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefLabel {
    pub name: String,
    pub kind: RefKind,
}

impl RefLabel {
    pub fn new(name: impl Into<String>, kind: RefKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A commit as supplied to the layout engine. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Commit id (SHA), or [`UNCOMMITTED`]
    pub oid: String,
    /// Parent commit ids, first parent first
    pub parent_oids: Vec<String>,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
    /// Refs pointing at this commit
    #[serde(default)]
    pub refs: Vec<RefLabel>,
    /// Author name
    #[serde(default)]
    pub author: String,
    /// Commit message (short)
    #[serde(default)]
    pub message: String,
}

impl Commit {
    pub fn new(oid: impl Into<String>, parent_oids: Vec<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            oid: oid.into(),
            parent_oids,
            timestamp,
            refs: Vec::new(),
            author: String::new(),
            message: String::new(),
        }
    }

    /// The working-tree pseudo-commit. Its only parent is HEAD; pending merge
    /// heads may be appended to preview a merge.
    pub fn uncommitted(head: Option<&str>, timestamp: DateTime<Utc>) -> Self {
        let parent_oids = head.map(|h| vec![h.to_string()]).unwrap_or_default();
        let mut commit = Self::new(UNCOMMITTED, parent_oids, timestamp);
        commit.message = "Uncommitted Changes".to_string();
        commit
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_refs(mut self, refs: Vec<RefLabel>) -> Self {
        self.refs = refs;
        self
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parent_oids.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parent_oids.len() > 1
    }

    /// Check if this is the working-tree pseudo-commit
    pub fn is_uncommitted(&self) -> bool {
        self.oid == UNCOMMITTED
    }
}

/// Parse a JSON array of commits, children before parents
pub fn parse_commits(source: &str) -> Result<Vec<Commit>> {
    Ok(serde_json::from_str(source)?)
}

/// Read a commit list written as JSON
pub fn load_commits<P: AsRef<Path>>(path: P) -> Result<Vec<Commit>> {
    let source = std::fs::read_to_string(path)?;
    parse_commits(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_flags() {
        let root = Commit::new("a", vec![], Utc::now());
        assert!(root.is_root());
        assert!(!root.is_merge());

        let merge = Commit::new("m", vec!["a".into(), "b".into()], Utc::now());
        assert!(merge.is_merge());
        assert!(!merge.is_uncommitted());
    }

    #[test]
    fn uncommitted_points_at_head() {
        let wip = Commit::uncommitted(Some("abc"), Utc::now());
        assert!(wip.is_uncommitted());
        assert_eq!(wip.parent_oids, vec!["abc".to_string()]);

        let unborn = Commit::uncommitted(None, Utc::now());
        assert!(unborn.is_root());
    }

    #[test]
    fn parses_commit_lists() {
        let json = r#"[
            {"oid":"c1","parentOids":["c0"],"timestamp":"2024-01-01T00:00:00Z","message":"fix"},
            {"oid":"c0","parentOids":[],"timestamp":"2023-12-31T00:00:00Z"}
        ]"#;
        let commits = parse_commits(json).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message, "fix");
        assert!(commits[1].is_root());

        let err = parse_commits(r#"[{"oid":"c1"}]"#).unwrap_err();
        assert!(matches!(err, crate::error::GraphError::Input(_)));
    }

    #[test]
    fn loads_commit_lists_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("commits.json");
        std::fs::write(&path, r#"[{"oid":"a","parentOids":[],"timestamp":"2024-01-01T00:00:00Z"}]"#)
            .unwrap();
        assert_eq!(load_commits(&path).unwrap()[0].oid, "a");

        let missing = load_commits(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, crate::error::GraphError::Io(_)));
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let json = r#"{"oid":"c1","parentOids":["c0"],"timestamp":"2024-01-01T00:00:00Z"}"#;
        let commit: Commit = serde_json::from_str(json).unwrap();
        assert_eq!(commit.parent_oids, vec!["c0".to_string()]);
        assert!(commit.refs.is_empty());
    }
}
