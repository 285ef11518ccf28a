use serde::{Deserialize, Serialize};

/// A lane represents a vertical column in the graph
pub type LaneIdx = usize;

/// An active lane: a column waiting for a specific, not yet processed commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub index: LaneIdx,
    /// Commit this lane continues to, `None` until assigned
    pub awaited_oid: Option<String>,
    /// Palette index, fixed for the lane's lifetime
    pub color: usize,
    /// False while the lane hangs off the uncommitted pseudo-row
    pub is_committed: bool,
    pub is_merge_preview: bool,
    /// Row that assigned the current awaited oid
    pub assigned_row: usize,
}

impl Lane {
    fn new(index: LaneIdx) -> Self {
        Self {
            index,
            awaited_oid: None,
            color: 0,
            is_committed: true,
            is_merge_preview: false,
            assigned_row: 0,
        }
    }

    pub fn awaits(&self, oid: &str) -> bool {
        self.awaited_oid.as_deref() == Some(oid)
    }
}

/// Slot table for lanes.
///
/// Strategy:
/// - acquire: lowest free slot, else append a new one
/// - release: slot becomes free for reuse by any later branch
///
/// The slot vector never shrinks, so its length is the high-water mark of
/// concurrently active lanes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneAllocator {
    slots: Vec<Option<Lane>>,
}

impl LaneAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the lowest-numbered free slot
    pub fn acquire(&mut self) -> LaneIdx {
        let index = match self.slots.iter().position(Option::is_none) {
            Some(free) => free,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };
        self.slots[index] = Some(Lane::new(index));
        tracing::trace!(lane = index, "acquired lane");
        index
    }

    /// Free a slot. No-op if it is already free.
    pub fn release(&mut self, index: LaneIdx) {
        if let Some(slot) = self.slots.get_mut(index) {
            if slot.take().is_some() {
                tracing::trace!(lane = index, "released lane");
            }
        }
    }

    /// Point an active lane at the commit it waits for
    pub fn assign(&mut self, index: LaneIdx, oid: &str) {
        if let Some(lane) = self.lane_mut(index) {
            lane.awaited_oid = Some(oid.to_string());
        }
    }

    /// Find the lane waiting for `oid`.
    ///
    /// Linear scan: O(active lanes) per call and O(n × average concurrency)
    /// over a pass. Branching concurrency stays in single digits even for
    /// large histories.
    pub fn find_lane_awaiting(&self, oid: &str) -> Option<LaneIdx> {
        self.active().find(|lane| lane.awaits(oid)).map(|lane| lane.index)
    }

    pub fn lane(&self, index: LaneIdx) -> Option<&Lane> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn lane_mut(&mut self, index: LaneIdx) -> Option<&mut Lane> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Active lanes in column order
    pub fn active(&self) -> impl Iterator<Item = &Lane> {
        self.slots.iter().flatten()
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Number of slots ever opened
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Free every active lane, returning how many were still waiting
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for slot in &mut self.slots {
            if slot.take().is_some() {
                released += 1;
            }
        }
        released
    }
}
