use chrono::{TimeZone, Utc};
use git2::{
    Commit as GitCommit, ErrorCode, Oid, Repository, RepositoryState, Revwalk, Sort, StatusOptions,
};
use std::collections::HashMap;
use std::path::Path;

use crate::core::{Commit, RefKind, RefLabel};
use crate::error::{GraphError, Result};

/// Loads windows of history in an order the layout engine accepts:
/// topological (children first), ties broken by time.
pub struct GitWalker {
    repo: Repository,
}

impl GitWalker {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            repo: Repository::open(path)?,
        })
    }

    pub fn open_from_env() -> Result<Self> {
        Ok(Self {
            repo: Repository::open_from_env()?,
        })
    }

    /// HEAD commit id, `None` on an unborn branch
    pub fn head(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Ok(head) => Ok(head.target().map(|oid| oid.to_string())),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Cursor over the whole history, one page at a time
    pub fn pages(&self) -> Result<HistoryPages<'_>> {
        let mut revwalk = self.repo.revwalk()?;

        // Start from HEAD and all branches
        if let Some(head) = self.head()? {
            revwalk.push(Oid::from_str(&head)?)?;
        }
        for branch in self.repo.branches(None)? {
            let (branch, _) = branch?;
            if let Some(target) = branch.get().target() {
                revwalk.push(target)?;
            }
        }
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        Ok(HistoryPages {
            walker: self,
            revwalk,
            refs: self.refs_by_oid()?,
            started: false,
        })
    }

    /// Load `limit` commits after skipping `skip` commits.
    ///
    /// Prefer [`GitWalker::pages`] when loading page after page; this walks
    /// the skipped commits again on every call.
    pub fn load_window(&self, skip: usize, limit: Option<usize>) -> Result<Vec<Commit>> {
        let mut pages = self.pages()?;
        pages.skip_commits(skip)?;
        pages.next_page(limit)
    }

    /// Working-tree pseudo-commit, if there is anything uncommitted
    pub fn uncommitted(&self) -> Result<Option<Commit>> {
        if self.repo.is_bare() {
            return Ok(None);
        }
        let mut options = StatusOptions::new();
        options.include_untracked(true).include_ignored(false);
        if self.repo.statuses(Some(&mut options))?.is_empty() {
            return Ok(None);
        }

        let head = self.head()?;
        let mut wip = Commit::uncommitted(head.as_deref(), Utc::now());
        if self.repo.state() == RepositoryState::Merge {
            let merge_heads = std::fs::read_to_string(self.repo.path().join("MERGE_HEAD"))?;
            for line in merge_heads.lines().map(str::trim).filter(|l| !l.is_empty()) {
                wip.parent_oids.push(Oid::from_str(line)?.to_string());
            }
        }
        Ok(Some(wip))
    }

    /// Branch, remote and tag labels keyed by the commit they point at
    pub fn refs_by_oid(&self) -> Result<HashMap<String, Vec<RefLabel>>> {
        let mut refs: HashMap<String, Vec<RefLabel>> = HashMap::new();

        for reference in self.repo.references()? {
            let reference = reference?;
            let kind = if reference.is_branch() {
                RefKind::Branch
            } else if reference.is_remote() {
                RefKind::Remote
            } else if reference.is_tag() {
                RefKind::Tag
            } else {
                continue;
            };
            let Some(name) = reference.shorthand().map(str::to_string) else {
                continue;
            };
            // annotated tags point at tag objects
            match reference.peel_to_commit() {
                Ok(commit) => refs
                    .entry(commit.id().to_string())
                    .or_default()
                    .push(RefLabel::new(name, kind)),
                Err(e) => tracing::warn!(
                    reference = %name,
                    error = %e,
                    "skipping ref not pointing at a commit"
                ),
            }
        }

        Ok(refs)
    }
}

/// History cursor returned by [`GitWalker::pages`]. The revwalk and the ref
/// map are built once and shared by every page.
pub struct HistoryPages<'r> {
    walker: &'r GitWalker,
    revwalk: Revwalk<'r>,
    refs: HashMap<String, Vec<RefLabel>>,
    started: bool,
}

impl HistoryPages<'_> {
    /// Skip `count` commits without loading them
    pub fn skip_commits(&mut self, count: usize) -> Result<()> {
        if count > 0 {
            self.started = true;
        }
        for oid in self.revwalk.by_ref().take(count) {
            oid?;
        }
        Ok(())
    }

    /// Load the next `limit` commits, or everything left when `None`.
    ///
    /// The first page starts with the uncommitted pseudo-commit when the
    /// working tree is dirty; during a merge it also lists the pending merge
    /// heads as extra parents. `limit` counts real commits only.
    pub fn next_page(&mut self, limit: Option<usize>) -> Result<Vec<Commit>> {
        let mut commits = Vec::new();
        if !self.started {
            self.started = true;
            if let Some(wip) = self.walker.uncommitted()? {
                commits.push(wip);
            }
        }

        for oid in self.revwalk.by_ref().take(limit.unwrap_or(usize::MAX)) {
            let commit = self.walker.repo.find_commit(oid?)?;
            let mut node = commit_to_node(&commit)?;
            if let Some(labels) = self.refs.get(&node.oid) {
                node.refs = labels.clone();
            }
            commits.push(node);
        }

        tracing::debug!(loaded = commits.len(), "loaded commit page");
        Ok(commits)
    }
}

/// Convert a git2 commit to the engine's input form
fn commit_to_node(commit: &GitCommit) -> Result<Commit> {
    let oid = commit.id().to_string();
    let seconds = commit.time().seconds();
    let timestamp = Utc
        .timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| GraphError::InvalidTimestamp {
            oid: oid.clone(),
            seconds,
        })?;
    let parents = commit.parent_ids().map(|id| id.to_string()).collect();

    Ok(Commit::new(oid, parents, timestamp)
        .with_author(commit.author().name().unwrap_or("Unknown"))
        .with_message(commit.summary().unwrap_or("")))
}
