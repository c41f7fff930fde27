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

//! Leadership and Chain-of-Command Inference
//!
//! Nodes are scored by a blend of normalized betweenness and degree
//! centrality. The top scorers become leaders, and every other node is
//! placed by its hop distance to the nearest leader:
//!
//! | Level    | Role       |
//! |----------|------------|
//! | 0        | leader     |
//! | 1        | lieutenant |
//! | 2, 3     | operative  |
//! | 4+, -1   | peripheral |
//!
//! Parents point one level up, children one level down, and each leader
//! contributes a chain: the depth-first walk of its subordinates, strongest
//! first.

use crate::centrality::{betweenness_scores, degree_scores};
use crate::config::HierarchyConfig;
use crate::entities::{HierarchyNode, HierarchyResult, Role};
use crate::graph::{AnalysisGraph, VertexIndex};
use crate::paths::multi_source_distances;
use std::collections::BTreeMap;
use tracing::debug;

/// Level assigned to nodes no leader can reach
pub const UNREACHABLE_LEVEL: i32 = -1;

/// Infers leaders, levels, roles and chains from graph structure
pub struct HierarchyAnalyzer {
    config: HierarchyConfig,
}

impl HierarchyAnalyzer {
    pub fn new() -> Self {
        Self {
            config: HierarchyConfig::default(),
        }
    }

    pub fn with_config(config: HierarchyConfig) -> Self {
        Self { config }
    }

    /// Leadership score per vertex, indexed like `graph.vertices()`
    pub fn leadership_scores(&self, graph: &AnalysisGraph) -> Vec<f64> {
        let betweenness = self.normalize(betweenness_scores(graph));
        let degree = self.normalize(degree_scores(graph));

        betweenness
            .iter()
            .zip(&degree)
            .map(|(b, d)| self.config.betweenness_weight * b + self.config.degree_weight * d)
            .collect()
    }

    /// Number of leaders actually selected for a request of `requested`
    pub fn leader_cap(&self, node_count: usize, requested: usize) -> usize {
        // Small slack so products like 30 * 0.1 don't round up past the integer
        let fraction_cap = (node_count as f64 * self.config.max_leader_fraction - 1e-9)
            .ceil()
            .max(0.0) as usize;
        requested.min(fraction_cap).min(node_count)
    }

    /// Run the full analysis for up to `leader_count` leaders
    pub fn analyze(&self, graph: &AnalysisGraph, leader_count: usize) -> HierarchyResult {
        let n = graph.node_count();
        if n == 0 {
            return HierarchyResult::default();
        }

        let scores = self.leadership_scores(graph);

        let mut ranking: Vec<VertexIndex> = (0..n).collect();
        ranking.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        ranking.truncate(self.leader_cap(n, leader_count));
        let leaders = ranking;

        let levels: Vec<i32> = multi_source_distances(graph, &leaders)
            .into_iter()
            .map(|d| d.map_or(UNREACHABLE_LEVEL, |d| d as i32))
            .collect();

        let parents: Vec<Option<VertexIndex>> = (0..n)
            .map(|v| {
                if levels[v] <= 0 {
                    return None;
                }
                graph
                    .neighbors(v)
                    .iter()
                    .copied()
                    .find(|&w| levels[w] == levels[v] - 1)
            })
            .collect();

        let children: Vec<Vec<VertexIndex>> = (0..n)
            .map(|v| {
                graph
                    .neighbors(v)
                    .iter()
                    .copied()
                    .filter(|&w| levels[w] == levels[v] + 1)
                    .collect()
            })
            .collect();

        let chains: Vec<Vec<String>> = leaders
            .iter()
            .map(|&leader| chain_from(leader, &children, &scores))
            .filter(|chain| chain.len() > 1)
            .map(|chain| chain.into_iter().map(|v| graph.vertex(v).id.clone()).collect())
            .collect();

        let mut order: Vec<VertexIndex> = (0..n).collect();
        order.sort_by_key(|&v| levels[v]);

        let mut by_level: BTreeMap<i32, Vec<String>> = BTreeMap::new();
        let nodes: Vec<HierarchyNode> = order
            .into_iter()
            .map(|v| {
                let vertex = graph.vertex(v);
                by_level
                    .entry(levels[v])
                    .or_default()
                    .push(vertex.id.clone());

                HierarchyNode {
                    node_id: vertex.id.clone(),
                    label: vertex.label.clone(),
                    level: levels[v],
                    role: Role::for_level(levels[v]),
                    leadership_score: scores[v],
                    parent_id: parents[v].map(|p| graph.vertex(p).id.clone()),
                    children_ids: children[v]
                        .iter()
                        .map(|&c| graph.vertex(c).id.clone())
                        .collect(),
                }
            })
            .collect();

        debug!(
            nodes = n,
            leaders = leaders.len(),
            levels = by_level.len(),
            chains = chains.len(),
            "Hierarchy inferred"
        );

        HierarchyResult {
            nodes,
            levels: by_level,
            leaders: leaders
                .iter()
                .map(|&v| graph.vertex(v).id.clone())
                .collect(),
            chains,
        }
    }

    /// Divide by the maximum, or by the floor when every score is zero
    fn normalize(&self, mut scores: Vec<f64>) -> Vec<f64> {
        let max = scores.iter().copied().fold(0.0_f64, f64::max);
        let divisor = if max > 0.0 {
            max
        } else {
            self.config.normalization_floor
        };
        for score in &mut scores {
            *score /= divisor;
        }
        scores
    }
}

impl Default for HierarchyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Preorder walk of a leader's subordinates, strongest child first
fn chain_from(leader: VertexIndex, children: &[Vec<VertexIndex>], scores: &[f64]) -> Vec<VertexIndex> {
    let mut visited = vec![false; children.len()];
    let mut chain = Vec::new();
    let mut stack = vec![leader];

    while let Some(v) = stack.pop() {
        if visited[v] {
            continue;
        }
        visited[v] = true;
        chain.push(v);

        let mut ordered = children[v].clone();
        ordered.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        // Reverse so the strongest child is popped first
        stack.extend(ordered.into_iter().rev().filter(|&c| !visited[c]));
    }

    chain
}
