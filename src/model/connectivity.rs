//! Connectivity analyzer: groups competitors that can't be strictly
//! ordered by their games (ever played to a mixed result) into the same
//! group, builds a digraph of decisive wins between groups, collapses any
//! cycles in that digraph back into single groups, and emits the result
//! in topological order — strongest group first.

use crate::error::{CoreError, CoreResult};
use crate::model::structures::encounter::Encounter;
use crate::model::structures::group::{FinalGroup, Group};
use std::collections::{HashSet, VecDeque};

/// Runs the full grouping pipeline over every non-discarded encounter
/// (typically the FULL selectivity table, so flagged competitors still
/// appear in their natural group). Returns `CoreError::Internal` if the
/// collapsed digraph still contains a cycle — an internal-consistency
/// failure per §7 that should be unreachable once `collapse_cycles` has
/// run to a fixed point.
pub fn analyze_connectivity(n: usize, encounters: &[Encounter]) -> CoreResult<Vec<FinalGroup>> {
    let mut arena: Vec<Group> = (0..n).map(|i| Group::singleton(i, i)).collect();

    for e in encounters {
        if e.is_mixed() {
            union(&mut arena, e.white, e.black);
        }
    }

    for e in encounters {
        if !e.is_all_decisive() {
            continue;
        }
        let ra = find(&mut arena, e.white);
        let rb = find(&mut arena, e.black);
        if ra == rb {
            continue;
        }
        if e.wscore == e.played as f64 {
            add_edge(&mut arena, ra, rb);
        } else {
            add_edge(&mut arena, rb, ra);
        }
    }

    collapse_cycles(&mut arena);
    emit_topological(&arena)
}

/// Follows `combined` forwarding pointers to the current root, compressing
/// the path as it goes so future lookups are O(1) amortized.
fn find(arena: &mut [Group], id: usize) -> usize {
    let mut root = id;
    while let Some(next) = arena[root].combined {
        root = next;
    }
    let mut cur = id;
    while let Some(next) = arena[cur].combined {
        if next != root {
            arena[cur].combined = Some(root);
        }
        cur = next;
    }
    root
}

/// Merges the groups containing `a` and `b`, absorbing the smaller
/// (fewer participants) into the larger. No-op if they're already the
/// same group.
fn union(arena: &mut Vec<Group>, a: usize, b: usize) {
    let ra = find(arena, a);
    let rb = find(arena, b);
    if ra == rb {
        return;
    }

    let (winner, loser) = if arena[ra].participants.len() >= arena[rb].participants.len() {
        (ra, rb)
    } else {
        (rb, ra)
    };

    let absorbed_participants = std::mem::take(&mut arena[loser].participants);
    let absorbed_beats = std::mem::take(&mut arena[loser].beats);
    let absorbed_lost_to = std::mem::take(&mut arena[loser].lost_to);

    arena[winner].participants.extend(absorbed_participants);
    arena[winner].beats.extend(absorbed_beats);
    arena[winner].lost_to.extend(absorbed_lost_to);
    arena[loser].combined = Some(winner);
}

/// Records that group `winner` has a decisive win over group `loser`,
/// resolving both ids through `find` first so the edge always lands on
/// current roots.
fn add_edge(arena: &mut Vec<Group>, winner: usize, loser: usize) {
    let winner = find(arena, winner);
    let loser = find(arena, loser);
    if winner == loser {
        return;
    }
    if !arena[winner].beats.contains(&loser) {
        arena[winner].beats.push(loser);
    }
    if !arena[loser].lost_to.contains(&winner) {
        arena[loser].lost_to.push(winner);
    }
}

/// Repeatedly finds a strongly connected component of size > 1 in the
/// current beats digraph (groups that both beat and lose to each other,
/// directly or transitively) and merges it into one group, until the
/// digraph among surviving roots is acyclic.
fn collapse_cycles(arena: &mut Vec<Group>) {
    loop {
        let roots: Vec<usize> = (0..arena.len()).filter(|&id| arena[id].combined.is_none()).collect();
        let sccs = tarjan_scc(arena, &roots);

        let mut merged_any = false;
        for scc in sccs {
            if scc.len() < 2 {
                continue;
            }
            let mut iter = scc.into_iter();
            let first = iter.next().unwrap();
            for other in iter {
                union(arena, first, other);
            }
            merged_any = true;
        }

        if !merged_any {
            break;
        }
    }
}

/// Tarjan's algorithm over the current roots' resolved `beats` edges.
fn tarjan_scc(arena: &mut Vec<Group>, roots: &[usize]) -> Vec<Vec<usize>> {
    struct State {
        index: usize,
        indices: std::collections::HashMap<usize, usize>,
        lowlink: std::collections::HashMap<usize, usize>,
        on_stack: HashSet<usize>,
        stack: Vec<usize>,
        result: Vec<Vec<usize>>
    }

    fn resolved_beats(arena: &mut Vec<Group>, root: usize) -> Vec<usize> {
        let beats = arena[root].beats.clone();
        let mut seen = HashSet::new();
        for t in beats {
            seen.insert(find(arena, t));
        }
        seen.into_iter().collect()
    }

    fn strongconnect(arena: &mut Vec<Group>, v: usize, st: &mut State) {
        st.indices.insert(v, st.index);
        st.lowlink.insert(v, st.index);
        st.index += 1;
        st.stack.push(v);
        st.on_stack.insert(v);

        for w in resolved_beats(arena, v) {
            if w == v {
                continue;
            }
            if !st.indices.contains_key(&w) {
                strongconnect(arena, w, st);
                let wl = st.lowlink[&w];
                let vl = st.lowlink[&v];
                st.lowlink.insert(v, vl.min(wl));
            } else if st.on_stack.contains(&w) {
                let wi = st.indices[&w];
                let vl = st.lowlink[&v];
                st.lowlink.insert(v, vl.min(wi));
            }
        }

        if st.lowlink[&v] == st.indices[&v] {
            let mut component = Vec::new();
            loop {
                let w = st.stack.pop().unwrap();
                st.on_stack.remove(&w);
                component.push(w);
                if w == v {
                    break;
                }
            }
            st.result.push(component);
        }
    }

    let mut st = State {
        index: 0,
        indices: std::collections::HashMap::new(),
        lowlink: std::collections::HashMap::new(),
        on_stack: HashSet::new(),
        stack: Vec::new(),
        result: Vec::new()
    };

    for &root in roots {
        if arena[root].combined.is_some() {
            continue;
        }
        if !st.indices.contains_key(&root) {
            strongconnect(arena, root, &mut st);
        }
    }

    st.result
}

/// Kahn's algorithm over the acyclic beats digraph among surviving roots,
/// emitting strongest group first. `beats`/`lost_to` on the returned
/// `FinalGroup`s are indices into the returned vector, not arena ids.
fn emit_topological(arena: &[Group]) -> CoreResult<Vec<FinalGroup>> {
    let roots: Vec<usize> = (0..arena.len()).filter(|&id| arena[id].combined.is_none()).collect();

    let mut in_degree: std::collections::HashMap<usize, usize> = roots.iter().map(|&r| (r, 0)).collect();
    for &r in &roots {
        for &target in &arena[r].beats {
            if roots.contains(&target) {
                *in_degree.get_mut(&target).unwrap() += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = roots.iter().copied().filter(|r| in_degree[r] == 0).collect();
    let mut order = Vec::with_capacity(roots.len());
    let mut remaining_in_degree = in_degree.clone();

    while let Some(r) = queue.pop_front() {
        order.push(r);
        for &target in &arena[r].beats {
            if let Some(d) = remaining_in_degree.get_mut(&target) {
                *d -= 1;
                if *d == 0 {
                    queue.push_back(target);
                }
            }
        }
    }

    // Every root should have been dequeued by Kahn's algorithm once the
    // digraph is acyclic. If one wasn't, `collapse_cycles` failed to
    // collapse a cycle it should have — report it rather than silently
    // appending the leftover roots in arbitrary order.
    if order.len() != roots.len() {
        let stuck = roots.iter().find(|r| !order.contains(r)).copied().unwrap_or(usize::MAX);
        return Err(CoreError::Internal(format!(
            "group {stuck} was not reachable by topological emission after cycle collapse"
        )));
    }

    let index_of: std::collections::HashMap<usize, usize> = order.iter().enumerate().map(|(i, &r)| (r, i)).collect();

    Ok(order
        .iter()
        .map(|&r| FinalGroup {
            participants: arena[r].participants.clone(),
            beats: arena[r].beats.iter().filter_map(|t| index_of.get(t).copied()).collect(),
            lost_to: arena[r].lost_to.iter().filter_map(|t| index_of.get(t).copied()).collect()
        })
        .collect())
}
