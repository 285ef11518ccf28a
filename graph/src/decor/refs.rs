use crate::core::{Commit, RefKind};
use crate::layout::RowGraphData;

/// Ref badges for one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub is_head: bool,
    pub branches: Vec<String>,
    pub remotes: Vec<String>,
    pub tags: Vec<String>,
    /// Badge colour; follows the lane the commit sits in
    pub color_index: usize,
}

impl Decoration {
    pub fn is_empty(&self) -> bool {
        !self.is_head && self.branches.is_empty() && self.remotes.is_empty() && self.tags.is_empty()
    }

    /// Badge texts in display order
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if self.is_head {
            labels.push("HEAD".to_string());
        }
        labels.extend(self.branches.iter().cloned());
        labels.extend(self.remotes.iter().cloned());
        labels.extend(self.tags.iter().map(|tag| format!("tag: {}", tag)));
        labels
    }
}

pub struct RefDecorator {
    head: Option<String>,
}

impl RefDecorator {
    pub fn new(head: Option<&str>) -> Self {
        Self {
            head: head.map(str::to_string),
        }
    }

    pub fn decorate(&self, commit: &Commit, row: &RowGraphData) -> Decoration {
        let names = |kind: RefKind| {
            commit
                .refs
                .iter()
                .filter(|r| r.kind == kind)
                .map(|r| r.name.clone())
                .collect::<Vec<_>>()
        };

        Decoration {
            is_head: self.head.as_deref() == Some(commit.oid.as_str())
                || commit.refs.iter().any(|r| r.kind == RefKind::Head),
            branches: names(RefKind::Branch),
            remotes: names(RefKind::Remote),
            tags: names(RefKind::Tag),
            color_index: row.color,
        }
    }
}
