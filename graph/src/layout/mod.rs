pub mod color;
pub mod engine;
pub mod geometry;
pub mod lane;
pub mod mute;
pub mod row;

pub use color::{ColorAssigner, DEFAULT_PALETTE_SIZE};
pub use engine::{EngineSnapshot, GraphLayoutEngine, LayoutState};
pub use geometry::{EdgeGeometryResolver, Point, Segment};
pub use lane::{Lane, LaneAllocator, LaneIdx};
pub use mute::{compute_muted, MuteResolver};
pub use row::{Lines, RowGraphData};
