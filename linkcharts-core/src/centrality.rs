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

//! Centrality Metrics
//!
//! Both measures read the graph as undirected and unweighted.
//!
//! - **Degree**: distinct neighbors / (n - 1)
//! - **Betweenness**: Brandes' accumulation, each unordered pair counted
//!   once, normalized by (n - 1)(n - 2) / 2 so scores fall in [0, 1]
//!
//! Betweenness is O(V·E); graphs of a few thousand nodes are the practical
//! ceiling for interactive use.

use crate::entities::CentralityResult;
use crate::graph::{AnalysisGraph, VertexIndex};
use std::collections::VecDeque;

/// Degree centrality per vertex, indexed like `graph.vertices()`
pub fn degree_scores(graph: &AnalysisGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }

    let denominator = (n - 1) as f64;
    (0..n)
        .map(|v| graph.degree(v) as f64 / denominator)
        .collect()
}

/// Betweenness centrality per vertex, indexed like `graph.vertices()`
pub fn betweenness_scores(graph: &AnalysisGraph) -> Vec<f64> {
    let n = graph.node_count();
    let mut betweenness = vec![0.0; n];
    if n <= 2 {
        return betweenness;
    }

    let mut sigma = vec![0.0_f64; n];
    let mut distance: Vec<Option<usize>> = vec![None; n];
    let mut delta = vec![0.0_f64; n];
    let mut predecessors: Vec<Vec<VertexIndex>> = vec![Vec::new(); n];
    let mut stack: Vec<VertexIndex> = Vec::with_capacity(n);
    let mut queue: VecDeque<VertexIndex> = VecDeque::with_capacity(n);

    for source in 0..n {
        sigma.iter_mut().for_each(|s| *s = 0.0);
        distance.iter_mut().for_each(|d| *d = None);
        delta.iter_mut().for_each(|d| *d = 0.0);
        predecessors.iter_mut().for_each(Vec::clear);
        stack.clear();

        sigma[source] = 1.0;
        distance[source] = Some(0);
        queue.push_back(source);

        // Shortest-path counting
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let dv = distance[v].unwrap_or_default();
            for &w in graph.neighbors(v) {
                if distance[w].is_none() {
                    distance[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if distance[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Dependency accumulation in reverse BFS order
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != source {
                betweenness[w] += delta[w];
            }
        }
    }

    // Every unordered pair was visited from both ends: halve, then divide by
    // the (n-1)(n-2)/2 pairs not involving the vertex itself
    let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
    for score in &mut betweenness {
        *score *= scale;
    }

    betweenness
}

/// Degree centrality ranked by score, highest first
pub fn degree_centrality(graph: &AnalysisGraph) -> Vec<CentralityResult> {
    rank(graph, &degree_scores(graph))
}

/// Betweenness centrality ranked by score, highest first
pub fn betweenness_centrality(graph: &AnalysisGraph) -> Vec<CentralityResult> {
    rank(graph, &betweenness_scores(graph))
}

/// Pair scores with node IDs and sort descending; ties keep insertion order
pub(crate) fn rank(graph: &AnalysisGraph, scores: &[f64]) -> Vec<CentralityResult> {
    let mut results: Vec<CentralityResult> = graph
        .vertices()
        .iter()
        .zip(scores)
        .map(|(vertex, &score)| CentralityResult {
            node_id: vertex.id.clone(),
            score,
        })
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results
}
