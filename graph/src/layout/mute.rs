use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::MuteCommitsConfig;
use crate::core::Commit;

/// Flags commits for visual de-emphasis.
///
/// Ancestry is resolved with one forward pass: since no commit precedes its
/// children, an oid is an ancestor of HEAD once HEAD or an ancestor already
/// seen lists it as a parent. Only commits inside the loaded window count,
/// so ancestors reached solely through history outside the window are muted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteResolver {
    config: MuteCommitsConfig,
    head: Option<String>,
    /// Ancestors of HEAD referenced but not yet processed
    pending_ancestors: HashSet<String>,
}

impl MuteResolver {
    pub fn new(config: MuteCommitsConfig, head: Option<&str>) -> Self {
        Self {
            config,
            head: head.map(str::to_string),
            pending_ancestors: HashSet::new(),
        }
    }

    pub fn config(&self) -> MuteCommitsConfig {
        self.config
    }

    /// Resolve the next commits of the window, in order
    pub fn resolve(&mut self, commits: &[Commit]) -> Vec<bool> {
        commits.iter().map(|commit| self.resolve_one(commit)).collect()
    }

    pub fn resolve_one(&mut self, commit: &Commit) -> bool {
        let is_ancestor = self.track_ancestry(commit);
        if commit.is_uncommitted() {
            return false;
        }
        (self.config.merge_commits && commit.is_merge())
            || (self.config.commits_not_ancestors_of_head && !is_ancestor)
    }

    fn track_ancestry(&mut self, commit: &Commit) -> bool {
        let Some(head) = self.head.as_deref() else {
            // no HEAD to be relative to
            return true;
        };
        let is_ancestor = self.pending_ancestors.remove(&commit.oid)
            || commit.oid == head
            || commit.is_uncommitted();
        if is_ancestor && !commit.is_uncommitted() {
            self.pending_ancestors.extend(commit.parent_oids.iter().cloned());
        }
        is_ancestor
    }
}

/// Mute flags aligned index-for-index with `commits`
pub fn compute_muted(
    commits: &[Commit],
    head: Option<&str>,
    config: MuteCommitsConfig,
) -> Vec<bool> {
    MuteResolver::new(config, head).resolve(commits)
}
