use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Line, PassingLane};
use crate::layout::LaneIdx;

/// Connectors attached to a node; rarely more than a couple per row
pub type Lines = SmallVec<[Line; 2]>;

/// Everything a renderer needs to draw one row of the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowGraphData {
    /// Lane holding this row's node
    pub column: LaneIdx,
    /// Palette index of the node
    pub color: usize,
    pub is_committed: bool,
    /// The checked-out commit
    pub is_current: bool,
    pub is_merge: bool,
    pub has_children: bool,
    pub has_parents: bool,
    /// De-emphasized per mute configuration; styling only
    pub muted: bool,
    pub passing_lanes: Vec<PassingLane>,
    /// Edges from the row above that end at this node
    pub incoming_lines: Lines,
    /// Edges from this node to lanes of the row below
    pub outgoing_lines: Lines,
}

impl RowGraphData {
    /// Widest column touched by this row, plus one
    pub fn width(&self) -> usize {
        let lines = self.incoming_lines.iter().chain(self.outgoing_lines.iter());
        lines
            .flat_map(|line| [line.from_column, line.to_column])
            .chain(self.passing_lanes.iter().map(|lane| lane.column))
            .chain(std::iter::once(self.column))
            .max()
            .map_or(0, |max| max + 1)
    }

    pub fn curved_lines(&self) -> impl Iterator<Item = &Line> {
        self.incoming_lines
            .iter()
            .chain(self.outgoing_lines.iter())
            .filter(|line| !line.is_straight())
    }
}
