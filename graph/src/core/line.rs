use serde::{Deserialize, Serialize};

/// Shape of a connector between two adjacent rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    /// Same column in both rows
    Straight,
    /// Column changes between rows (branch, merge or convergence)
    Curved,
}

/// A lane crossing a row without touching its node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassingLane {
    pub column: usize,
    pub color: usize,
    pub is_committed: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_merge_preview: bool,
}

/// A connector between a node and a lane in the neighbouring row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub from_column: usize,
    pub to_column: usize,
    pub color: usize,
    pub is_committed: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_merge_preview: bool,
}

impl Line {
    pub fn new(from_column: usize, to_column: usize, color: usize, is_committed: bool) -> Self {
        Self {
            from_column,
            to_column,
            color,
            is_committed,
            is_merge_preview: false,
        }
    }

    pub fn merge_preview(mut self, is_merge_preview: bool) -> Self {
        self.is_merge_preview = is_merge_preview;
        self
    }

    pub fn kind(&self) -> EdgeKind {
        if self.from_column == self.to_column {
            EdgeKind::Straight
        } else {
            EdgeKind::Curved
        }
    }

    pub fn is_straight(&self) -> bool {
        self.kind() == EdgeKind::Straight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_columns() {
        assert_eq!(Line::new(2, 2, 0, true).kind(), EdgeKind::Straight);
        assert_eq!(Line::new(0, 3, 1, true).kind(), EdgeKind::Curved);
    }

    #[test]
    fn merge_preview_is_omitted_when_false() {
        let json = serde_json::to_string(&Line::new(0, 1, 2, true)).unwrap();
        assert_eq!(json, r#"{"fromColumn":0,"toColumn":1,"color":2,"isCommitted":true}"#);

        let preview = Line::new(0, 1, 2, false).merge_preview(true);
        let json = serde_json::to_string(&preview).unwrap();
        assert!(json.contains(r#""isMergePreview":true"#));
    }
}
