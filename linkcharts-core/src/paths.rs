// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Unweighted shortest paths
//!
//! Bidirectional breadth-first search over the undirected view: the smaller
//! fringe is expanded one full level at a time until the two searches meet.

use crate::graph::{AnalysisGraph, VertexIndex};
use std::collections::VecDeque;

/// Shortest path between two node IDs, source first and target last
///
/// Returns `None` if either endpoint is missing or the nodes are not
/// connected. A path from a node to itself is `[node]`.
pub fn shortest_path(graph: &AnalysisGraph, source_id: &str, target_id: &str) -> Option<Vec<String>> {
    let source = graph.index_of(source_id)?;
    let target = graph.index_of(target_id)?;

    bidirectional_search(graph, source, target).map(|path| {
        path.into_iter()
            .map(|idx| graph.vertex(idx).id.clone())
            .collect()
    })
}

/// Bidirectional BFS on vertex indices
pub fn bidirectional_search(
    graph: &AnalysisGraph,
    source: VertexIndex,
    target: VertexIndex,
) -> Option<Vec<VertexIndex>> {
    if source == target {
        return Some(vec![source]);
    }

    let n = graph.node_count();
    // pred[v]: next hop back toward source; succ[v]: next hop toward target
    let mut pred: Vec<Option<VertexIndex>> = vec![None; n];
    let mut succ: Vec<Option<VertexIndex>> = vec![None; n];
    let mut in_pred = vec![false; n];
    let mut in_succ = vec![false; n];
    in_pred[source] = true;
    in_succ[target] = true;

    let mut forward_fringe = vec![source];
    let mut reverse_fringe = vec![target];

    while !forward_fringe.is_empty() && !reverse_fringe.is_empty() {
        if forward_fringe.len() <= reverse_fringe.len() {
            let level = std::mem::take(&mut forward_fringe);
            for v in level {
                for &w in graph.neighbors(v) {
                    if !in_pred[w] {
                        in_pred[w] = true;
                        pred[w] = Some(v);
                        forward_fringe.push(w);
                    }
                    if in_succ[w] {
                        return Some(join_path(&pred, &succ, w));
                    }
                }
            }
        } else {
            let level = std::mem::take(&mut reverse_fringe);
            for v in level {
                for &w in graph.neighbors(v) {
                    if !in_succ[w] {
                        in_succ[w] = true;
                        succ[w] = Some(v);
                        reverse_fringe.push(w);
                    }
                    if in_pred[w] {
                        return Some(join_path(&pred, &succ, w));
                    }
                }
            }
        }
    }

    None
}

fn join_path(
    pred: &[Option<VertexIndex>],
    succ: &[Option<VertexIndex>],
    meeting: VertexIndex,
) -> Vec<VertexIndex> {
    let mut path = VecDeque::from([meeting]);

    let mut current = meeting;
    while let Some(previous) = pred[current] {
        path.push_front(previous);
        current = previous;
    }

    current = meeting;
    while let Some(next) = succ[current] {
        path.push_back(next);
        current = next;
    }

    path.into()
}

/// Hop distances from every vertex to the nearest of `sources`
///
/// Multi-source BFS; unreachable vertices are `None`.
pub fn multi_source_distances(graph: &AnalysisGraph, sources: &[VertexIndex]) -> Vec<Option<usize>> {
    let mut distances = vec![None; graph.node_count()];
    let mut queue = VecDeque::with_capacity(sources.len());

    for &s in sources {
        if distances[s].is_none() {
            distances[s] = Some(0);
            queue.push_back(s);
        }
    }

    while let Some(v) = queue.pop_front() {
        let next = distances[v].map(|d| d + 1);
        for &w in graph.neighbors(v) {
            if distances[w].is_none() {
                distances[w] = next;
                queue.push_back(w);
            }
        }
    }

    distances
}
