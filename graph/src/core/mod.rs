pub mod commit;
pub mod line;

pub use commit::{load_commits, parse_commits, Commit, RefKind, RefLabel, UNCOMMITTED};
pub use line::{EdgeKind, Line, PassingLane};
