//! Commit graph layout: turns an ordered commit list into per-row lanes,
//! colours and connector geometry for a `git log --graph` style diagram.

pub mod config;
pub mod core;
pub mod decor;
pub mod error;
pub mod git_backend;
pub mod layout;
pub mod render;

pub use config::{
    Config, GraphConfig, GraphStyle, Grid, MuteCommitsConfig, UncommittedChangesStyle,
};
pub use crate::core::{
    load_commits, parse_commits, Commit, EdgeKind, Line, PassingLane, RefKind, RefLabel,
    UNCOMMITTED,
};
pub use decor::{Decoration, RefDecorator};
pub use error::{GraphError, Result};
pub use git_backend::{GitWalker, HistoryPages};
pub use layout::{
    compute_muted, ColorAssigner, EdgeGeometryResolver, EngineSnapshot, GraphLayoutEngine,
    LaneAllocator, LaneIdx, LayoutState, MuteResolver, RowGraphData, Segment,
};
pub use render::{SvgRenderer, TextRenderer};
