use chrono::Utc;
use graph::{Commit, GraphLayoutEngine, LayoutState, MuteCommitsConfig, RowGraphData};
use pretty_assertions::assert_eq;

fn commit(oid: &str, parents: &[&str]) -> Commit {
    Commit::new(oid, parents.iter().map(|p| p.to_string()).collect(), Utc::now())
}

/// Small LCG so generated histories are reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) % bound as u64) as usize
    }
}

/// History of `n` commits, newest first, with parents at most 4 commits back
fn history(n: usize, seed: u64) -> Vec<Commit> {
    let mut rng = Lcg(seed);
    let mut commits = Vec::with_capacity(n);
    for i in 0..n {
        let mut parents = Vec::new();
        if i > 0 {
            parents.push(format!("c{}", i - 1 - rng.next(i.min(2))));
        }
        if i > 2 && rng.next(3) == 0 {
            parents.push(format!("c{}", i - 1 - rng.next(i.min(4))));
        }
        let parents: Vec<&str> = parents.iter().map(String::as_str).collect();
        commits.push(commit(&format!("c{}", i), &parents));
    }
    commits.reverse();
    commits
}

fn all_mute() -> MuteCommitsConfig {
    MuteCommitsConfig {
        merge_commits: true,
        commits_not_ancestors_of_head: true,
    }
}

#[test]
fn columns_stay_below_lane_high_water_mark() {
    for seed in 0..20 {
        let commits = history(60, seed);
        let mut state = LayoutState::default();
        for commit in &commits {
            let row = state.step(commit, None, false);
            assert!(row.column < state.lanes().slot_count(), "seed {}: {:?}", seed, row);
            for line in row.outgoing_lines.iter().chain(&row.incoming_lines) {
                assert!(line.from_column < state.lanes().slot_count());
                assert!(line.to_column < state.lanes().slot_count());
            }
        }
    }
}

#[test]
fn linear_chain_is_straight_and_single_lane() {
    let n = 10;
    let oids: Vec<String> = (0..n).rev().map(|i| format!("l{}", i)).collect();
    let commits: Vec<Commit> = oids
        .iter()
        .enumerate()
        .map(|(i, oid)| match oids.get(i + 1) {
            Some(parent) => commit(oid, &[parent.as_str()]),
            None => commit(oid, &[]),
        })
        .collect();

    let mut engine = GraphLayoutEngine::new(None, MuteCommitsConfig::default());
    let rows = engine.append(&commits);

    assert_eq!(engine.state().lanes().slot_count(), 1);
    assert!(rows.iter().all(|r| r.column == 0));
    let straight_in = rows
        .iter()
        .flat_map(|r| &r.incoming_lines)
        .filter(|l| l.is_straight())
        .count();
    let straight_out = rows
        .iter()
        .flat_map(|r| &r.outgoing_lines)
        .filter(|l| l.is_straight())
        .count();
    assert_eq!(straight_in, n - 1);
    assert_eq!(straight_out, n - 1);
    assert_eq!(rows.iter().flat_map(RowGraphData::curved_lines).count(), 0);
}

#[test]
fn merge_adds_at_most_one_lane_per_extra_parent() {
    for parent_count in 2..=6 {
        let parents: Vec<String> = (0..parent_count).map(|i| format!("p{}", i)).collect();
        let parent_refs: Vec<&str> = parents.iter().map(String::as_str).collect();

        let mut state = LayoutState::default();
        state.step(&commit("child", &["M"]), None, false);
        let before = state.lanes().active_count();
        let row = state.step(&commit("M", &parent_refs), None, false);
        let after = state.lanes().active_count();

        assert_eq!(row.outgoing_lines.iter().filter(|l| l.is_straight()).count(), 1);
        assert_eq!(row.curved_lines().count(), parent_count - 1);
        assert!(after - before <= parent_count - 1);
    }
}

#[test]
fn concurrent_lanes_have_distinct_colors() {
    for seed in 0..20 {
        let commits = history(80, seed);
        let rows = GraphLayoutEngine::layout(&commits, None, MuteCommitsConfig::default());

        for row in &rows {
            let mut colors: Vec<usize> = row.passing_lanes.iter().map(|l| l.color).collect();
            colors.push(row.color);
            assert!(colors.len() <= 8);
            let total = colors.len();
            colors.sort_unstable();
            colors.dedup();
            assert_eq!(colors.len(), total, "seed {}: {:?}", seed, row);
        }
    }
}

#[test]
fn layout_is_deterministic() {
    let commits = history(80, 7);
    let first = GraphLayoutEngine::layout(&commits, Some("c79"), all_mute());
    let second = GraphLayoutEngine::layout(&commits, Some("c79"), all_mute());
    assert_eq!(first, second);
}

#[test]
fn paging_matches_single_pass_at_every_split() {
    let commits = history(40, 3);
    let head = Some("c37");
    let expected = GraphLayoutEngine::layout(&commits, head, all_mute());

    for k in 0..=commits.len() {
        let mut engine = GraphLayoutEngine::new(head, all_mute());
        let mut rows = engine.append(&commits[..k]);

        let mut engine = GraphLayoutEngine::resume(engine.into_snapshot());
        rows.extend(engine.append(&commits[k..]));
        engine.finish();

        assert_eq!(rows, expected, "split at {}", k);
    }
}

#[test]
fn diamond_converges_back_into_lane_zero() {
    let commits = vec![
        commit("C3", &["C2"]),
        commit("C2", &["C1a", "C1b"]),
        commit("C1a", &["C0"]),
        commit("C1b", &["C0"]),
        commit("C0", &[]),
    ];
    let mut engine = GraphLayoutEngine::new(Some("C3"), MuteCommitsConfig::default());
    let rows = engine.append(&commits[..4]);

    let columns: Vec<_> = rows.iter().map(|r| r.column).collect();
    assert_eq!(columns, vec![0, 0, 0, 1]);
    assert!(rows[1].is_merge);
    assert_eq!(engine.state().lanes().active_count(), 1);

    let root = engine.append(&commits[4..]).remove(0);
    assert_eq!(root.column, 0);
    let curved: Vec<_> = root.incoming_lines.iter().filter(|l| !l.is_straight()).collect();
    assert_eq!(curved.len(), 1);
    assert_eq!((curved[0].from_column, curved[0].to_column), (1, 0));
    assert!(root.passing_lanes.is_empty());
}

#[test]
fn merge_commits_are_muted() {
    let commits = history(60, 11);
    let mute = MuteCommitsConfig {
        merge_commits: true,
        ..Default::default()
    };
    let rows = GraphLayoutEngine::layout(&commits, Some("c59"), mute);

    assert!(rows.iter().any(|r| r.is_merge));
    for row in &rows {
        assert_eq!(row.muted, row.is_merge);
    }
}
