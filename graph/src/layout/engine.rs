use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;

use crate::config::MuteCommitsConfig;
use crate::core::{Commit, Line, PassingLane};
use crate::layout::color::{ColorAssigner, DEFAULT_PALETTE_SIZE};
use crate::layout::lane::{LaneAllocator, LaneIdx};
use crate::layout::mute::MuteResolver;
use crate::layout::row::{Lines, RowGraphData};

/// Lane assignment state after a prefix of the commit list.
///
/// Processing commits `0..k` and then `k..k+m` from the saved state yields
/// the same rows as processing `0..k+m` in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutState {
    lanes: LaneAllocator,
    colors: ColorAssigner,
    /// Parent oids referenced by processed rows whose own row is still ahead
    referenced: HashSet<String>,
    /// Outgoing lines of the last emitted row
    previous_outgoing: Lines,
    rows: usize,
}

impl LayoutState {
    pub fn new(palette_size: usize) -> Self {
        Self {
            colors: ColorAssigner::new(palette_size),
            ..Default::default()
        }
    }

    pub fn rows_processed(&self) -> usize {
        self.rows
    }

    pub fn lanes(&self) -> &LaneAllocator {
        &self.lanes
    }

    /// Lay out `commits` from this state without touching it.
    ///
    /// `muted` is aligned with `commits`; missing entries count as unmuted.
    pub fn advance(
        &self,
        commits: &[Commit],
        head: Option<&str>,
        muted: &[bool],
    ) -> (Vec<RowGraphData>, LayoutState) {
        let mut next = self.clone();
        let rows = commits
            .iter()
            .enumerate()
            .map(|(i, commit)| next.step(commit, head, muted.get(i).copied().unwrap_or(false)))
            .collect();
        (rows, next)
    }

    /// Lay out the next commit.
    ///
    /// Precondition: no commit passed so far is a parent of `commit`.
    /// Violating it gives an unspecified but complete row.
    pub fn step(&mut self, commit: &Commit, head: Option<&str>, muted: bool) -> RowGraphData {
        let row = self.rows;
        let is_committed = !commit.is_uncommitted();
        let has_children = self.referenced.remove(&commit.oid);

        // Unawaited commits are branch tips, or parents of rows outside the window
        let (column, continued) = match self.lanes.find_lane_awaiting(&commit.oid) {
            Some(index) => (index, true),
            None => (self.open_lane(row, is_committed, false), false),
        };
        let (color, lane_committed, lane_preview, assigned_row) = match self.lanes.lane(column) {
            Some(lane) => (
                lane.color,
                lane.is_committed,
                lane.is_merge_preview,
                lane.assigned_row,
            ),
            None => (0, is_committed, false, row),
        };

        let passing_lanes = self
            .lanes
            .active()
            .filter(|lane| lane.index != column)
            .map(|lane| PassingLane {
                column: lane.index,
                color: lane.color,
                is_committed: lane.is_committed,
                is_merge_preview: lane.is_merge_preview,
            })
            .collect();

        let mut incoming_lines = Lines::new();
        // lane passed straight through the previous row
        if continued && assigned_row + 1 < row {
            incoming_lines
                .push(Line::new(column, column, color, lane_committed).merge_preview(lane_preview));
        }
        incoming_lines.extend(
            self.previous_outgoing
                .iter()
                .filter(|line| line.to_column == column)
                .copied(),
        );

        let mut outgoing_lines = Lines::new();
        let mut seen: SmallVec<[&str; 4]> = SmallVec::new();

        match commit.parent_oids.first() {
            None => self.lanes.release(column),
            Some(first) => {
                seen.push(first.as_str());
                self.referenced.insert(first.clone());
                match self.lanes.find_lane_awaiting(first) {
                    // Convergence: another lane already continues to the parent
                    Some(target) if target != column => {
                        self.lanes.release(column);
                        tracing::trace!(row, from = column, to = target, "lane converges");
                        outgoing_lines.push(Line::new(column, target, color, is_committed));
                    }
                    _ => {
                        self.continue_lane(column, first, row, is_committed);
                        outgoing_lines.push(Line::new(column, column, color, is_committed));
                    }
                }
            }
        }

        // Merge parents; from the uncommitted row these preview a pending merge
        let is_merge_preview = !is_committed;
        for parent in commit.parent_oids.iter().skip(1) {
            if seen.contains(&parent.as_str()) {
                continue;
            }
            seen.push(parent.as_str());
            self.referenced.insert(parent.clone());

            let target = match self.lanes.find_lane_awaiting(parent) {
                Some(existing) => existing,
                None => {
                    let opened = self.open_lane(row, is_committed, is_merge_preview);
                    self.lanes.assign(opened, parent);
                    opened
                }
            };
            let target_color = self.lanes.lane(target).map_or(color, |lane| lane.color);
            outgoing_lines.push(
                Line::new(column, target, target_color, is_committed)
                    .merge_preview(is_merge_preview),
            );
        }

        self.previous_outgoing = outgoing_lines.clone();
        self.rows += 1;

        RowGraphData {
            column,
            color,
            is_committed,
            is_current: head == Some(commit.oid.as_str()),
            is_merge: commit.is_merge(),
            has_children,
            has_parents: !commit.parent_oids.is_empty(),
            muted,
            passing_lanes,
            incoming_lines,
            outgoing_lines,
        }
    }

    /// End of window: free lanes still waiting for parents that never showed
    /// up. Returns how many there were.
    pub fn release_unresolved(&mut self) -> usize {
        self.referenced.clear();
        self.previous_outgoing.clear();
        self.lanes.release_all()
    }

    fn open_lane(&mut self, row: usize, is_committed: bool, is_merge_preview: bool) -> LaneIdx {
        let in_use: SmallVec<[usize; 8]> = self.lanes.active().map(|lane| lane.color).collect();
        let index = self.lanes.acquire();
        let color = self.colors.next_color(&in_use);
        if let Some(lane) = self.lanes.lane_mut(index) {
            lane.color = color;
            lane.is_committed = is_committed;
            lane.is_merge_preview = is_merge_preview;
            lane.assigned_row = row;
        }
        index
    }

    fn continue_lane(&mut self, index: LaneIdx, oid: &str, row: usize, is_committed: bool) {
        self.lanes.assign(index, oid);
        if let Some(lane) = self.lanes.lane_mut(index) {
            lane.is_committed = is_committed;
            lane.is_merge_preview = false;
            lane.assigned_row = row;
        }
    }
}

/// Saved engine state, moved between engines by value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    head: Option<String>,
    state: LayoutState,
    mute: MuteResolver,
}

impl EngineSnapshot {
    pub fn rows_processed(&self) -> usize {
        self.state.rows_processed()
    }
}

/// Lays out a commit list page by page.
///
/// Build a fresh engine whenever HEAD or the mute configuration changes;
/// append to the existing one when more history is loaded.
#[derive(Debug)]
pub struct GraphLayoutEngine {
    head: Option<String>,
    state: LayoutState,
    mute: MuteResolver,
}

impl GraphLayoutEngine {
    pub fn new(head: Option<&str>, mute_config: MuteCommitsConfig) -> Self {
        Self::with_palette_size(head, mute_config, DEFAULT_PALETTE_SIZE)
    }

    pub fn with_palette_size(
        head: Option<&str>,
        mute_config: MuteCommitsConfig,
        palette_size: usize,
    ) -> Self {
        Self {
            head: head.map(str::to_string),
            state: LayoutState::new(palette_size),
            mute: MuteResolver::new(mute_config, head),
        }
    }

    /// One-shot layout of a complete window
    pub fn layout(
        commits: &[Commit],
        head: Option<&str>,
        mute_config: MuteCommitsConfig,
    ) -> Vec<RowGraphData> {
        let mut engine = Self::new(head, mute_config);
        let rows = engine.append(commits);
        engine.finish();
        rows
    }

    /// Continue the layout with the next page of commits
    pub fn append(&mut self, commits: &[Commit]) -> Vec<RowGraphData> {
        let muted = self.mute.resolve(commits);
        let head = self.head.as_deref();
        let mut rows = Vec::with_capacity(commits.len());
        for (commit, muted) in commits.iter().zip(muted) {
            rows.push(self.state.step(commit, head, muted));
        }

        tracing::debug!(
            rows = rows.len(),
            total_rows = self.state.rows_processed(),
            active_lanes = self.state.lanes().active_count(),
            lane_slots = self.state.lanes().slot_count(),
            "laid out page"
        );
        rows
    }

    /// Close the window, releasing lanes whose parents were never loaded
    pub fn finish(&mut self) -> usize {
        let released = self.state.release_unresolved();
        if released > 0 {
            tracing::debug!(released, "released lanes awaiting unloaded parents");
        }
        released
    }

    pub fn head(&self) -> Option<&str> {
        self.head.as_deref()
    }

    pub fn mute_config(&self) -> MuteCommitsConfig {
        self.mute.config()
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn rows_processed(&self) -> usize {
        self.state.rows_processed()
    }

    pub fn into_snapshot(self) -> EngineSnapshot {
        EngineSnapshot {
            head: self.head,
            state: self.state,
            mute: self.mute,
        }
    }

    pub fn resume(snapshot: EngineSnapshot) -> Self {
        Self {
            head: snapshot.head,
            state: snapshot.state,
            mute: snapshot.mute,
        }
    }
}
