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

//! Louvain Community Detection
//!
//! Greedy multi-level modularity optimization over the undirected view of
//! the graph.
//!
//! ## Algorithm Overview
//!
//! 1. **Local Moving Phase**: Visit nodes in index order and move each into
//!    the neighboring community with the largest modularity gain
//! 2. **Aggregation Phase**: Collapse every community into a super-node,
//!    keeping internal weight as a self-loop
//! 3. **Repeat**: Until a level makes no move or the gain is negligible
//!
//! ## Modularity
//!
//! Q = Σc [ in(c) / 2m - γ (tot(c) / 2m)² ]
//!
//! Where:
//! - in(c) = weight of edges inside c, counted from both ends
//! - tot(c) = sum of degrees of nodes in c
//! - m = total edge weight (each edge weighs 1; parallel edges add up)
//! - γ = resolution
//!
//! No randomization: the same graph and config always give the same
//! partition. Isolated vertices remain singleton communities.

use crate::config::LouvainConfig;
use crate::graph::AnalysisGraph;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Gains at or below this are treated as no improvement
const GAIN_EPSILON: f64 = 1e-12;

/// Partition plus quality measures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityDetection {
    /// Community ID -> member node IDs (vertex order)
    pub communities: BTreeMap<String, Vec<String>>,
    /// Modularity of the final partition
    pub modularity: f64,
    /// Aggregation levels that moved at least one node
    pub levels: usize,
}

/// Weighted undirected graph for one Louvain level
struct LevelGraph {
    /// (neighbor, weight), no self entries, ordered by neighbor index
    neighbors: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
    degrees: Vec<f64>,
    total_weight: f64,
}

impl LevelGraph {
    fn from_graph(graph: &AnalysisGraph) -> Self {
        let n = graph.node_count();
        let mut weights: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        let mut self_loops = vec![0.0; n];

        for edge in graph.edges() {
            if edge.source == edge.target {
                self_loops[edge.source] += 1.0;
            } else {
                *weights[edge.source].entry(edge.target).or_default() += 1.0;
                *weights[edge.target].entry(edge.source).or_default() += 1.0;
            }
        }

        Self::from_parts(weights, self_loops)
    }

    fn from_parts(weights: Vec<BTreeMap<usize, f64>>, self_loops: Vec<f64>) -> Self {
        let neighbors: Vec<Vec<(usize, f64)>> = weights
            .into_iter()
            .map(|m| m.into_iter().collect())
            .collect();

        let degrees: Vec<f64> = neighbors
            .iter()
            .zip(&self_loops)
            .map(|(adj, &loops)| adj.iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * loops)
            .collect();

        let total_weight = degrees.iter().sum::<f64>() / 2.0;

        Self {
            neighbors,
            self_loops,
            degrees,
            total_weight,
        }
    }

    fn len(&self) -> usize {
        self.degrees.len()
    }

    /// Collapse communities (numbered 0..count) into super-nodes
    fn aggregate(&self, communities: &[usize], count: usize) -> Self {
        let mut weights: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
        let mut self_loops = vec![0.0; count];

        for (node, adjacency) in self.neighbors.iter().enumerate() {
            let c = communities[node];
            self_loops[c] += self.self_loops[node];
            for &(neighbor, weight) in adjacency {
                let d = communities[neighbor];
                if c == d {
                    // Seen once from each endpoint
                    self_loops[c] += weight / 2.0;
                } else {
                    *weights[c].entry(d).or_default() += weight;
                }
            }
        }

        Self::from_parts(weights, self_loops)
    }
}

/// Louvain community detection algorithm
pub struct LouvainClustering {
    config: LouvainConfig,
}

impl LouvainClustering {
    /// Create new Louvain clustering with default config
    pub fn new() -> Self {
        Self {
            config: LouvainConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: LouvainConfig) -> Self {
        Self { config }
    }

    /// Community index per vertex, numbered by first member in vertex order
    pub fn assign(&self, graph: &AnalysisGraph) -> (Vec<usize>, f64, usize) {
        let n = graph.node_count();
        if n == 0 {
            return (Vec::new(), 0.0, 0);
        }

        let mut level_graph = LevelGraph::from_graph(graph);
        if level_graph.total_weight == 0.0 {
            // No edges, each node is its own community
            return ((0..n).collect(), 0.0, 0);
        }

        // Original vertex -> node of the current level graph
        let mut membership: Vec<usize> = (0..n).collect();
        let identity: Vec<usize> = (0..n).collect();
        let mut modularity = self.compute_modularity(&level_graph, &identity);
        let mut levels = 0;

        while levels < self.config.max_levels {
            let (communities, moved) = self.local_moving_phase(&level_graph);
            if !moved {
                break;
            }

            let (communities, count) = renumber_communities(&communities);
            let new_modularity = self.compute_modularity(&level_graph, &communities);
            let improvement = new_modularity - modularity;

            for node in membership.iter_mut() {
                *node = communities[*node];
            }
            level_graph = level_graph.aggregate(&communities, count);
            modularity = new_modularity;
            levels += 1;

            trace!(
                level = levels,
                communities = count,
                modularity,
                "Louvain level complete"
            );

            if improvement < self.config.min_improvement || count == 1 {
                break;
            }
        }

        let (membership, _) = renumber_communities(&membership);
        (membership, modularity, levels)
    }

    /// Run Louvain and group node IDs by community
    pub fn detect(&self, graph: &AnalysisGraph) -> CommunityDetection {
        let (membership, modularity, levels) = self.assign(graph);

        let mut communities: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (vertex, &community) in graph.vertices().iter().zip(&membership) {
            communities
                .entry(community.to_string())
                .or_default()
                .push(vertex.id.clone());
        }

        CommunityDetection {
            communities,
            modularity,
            levels,
        }
    }

    /// Local moving phase: move nodes to maximize modularity gain
    ///
    /// Returns the community per node and whether any node moved.
    fn local_moving_phase(&self, graph: &LevelGraph) -> (Vec<usize>, bool) {
        let n = graph.len();
        let resolution = self.config.resolution;
        let two_m = 2.0 * graph.total_weight;

        let mut communities: Vec<usize> = (0..n).collect();
        let mut totals: Vec<f64> = graph.degrees.clone();
        let mut weight_to: Vec<f64> = vec![0.0; n];
        let mut touched: Vec<usize> = Vec::new();
        let mut moved_any = false;

        for _pass in 0..self.config.max_passes {
            let mut moved = false;

            for node in 0..n {
                let current = communities[node];
                let degree = graph.degrees[node];

                for &(neighbor, weight) in &graph.neighbors[node] {
                    let c = communities[neighbor];
                    if weight_to[c] == 0.0 {
                        touched.push(c);
                    }
                    weight_to[c] += weight;
                }

                totals[current] -= degree;

                let gain = |c: usize, w: f64| w - resolution * totals[c] * degree / two_m;
                let mut best = current;
                let mut best_gain = gain(current, weight_to[current]);

                for &c in &touched {
                    let g = gain(c, weight_to[c]);
                    if g > best_gain + GAIN_EPSILON {
                        best = c;
                        best_gain = g;
                    }
                }

                totals[best] += degree;
                if best != current {
                    communities[node] = best;
                    moved = true;
                }

                for &c in &touched {
                    weight_to[c] = 0.0;
                }
                touched.clear();
            }

            if !moved {
                break;
            }
            moved_any = true;
        }

        (communities, moved_any)
    }

    /// Compute total modularity of a partition of a level graph
    fn compute_modularity(&self, graph: &LevelGraph, communities: &[usize]) -> f64 {
        if graph.total_weight == 0.0 {
            return 0.0;
        }

        let two_m = 2.0 * graph.total_weight;
        let mut internal: HashMap<usize, f64> = HashMap::new();
        let mut totals: HashMap<usize, f64> = HashMap::new();

        for node in 0..graph.len() {
            let c = communities[node];
            *totals.entry(c).or_default() += graph.degrees[node];
            let inside: f64 = graph.neighbors[node]
                .iter()
                .filter(|&&(neighbor, _)| communities[neighbor] == c)
                .map(|&(_, w)| w)
                .sum();
            *internal.entry(c).or_default() += inside + 2.0 * graph.self_loops[node];
        }

        totals
            .iter()
            .map(|(c, &tot)| {
                let inside = internal.get(c).copied().unwrap_or(0.0);
                inside / two_m - self.config.resolution * (tot / two_m).powi(2)
            })
            .sum()
    }
}

impl Default for LouvainClustering {
    fn default() -> Self {
        Self::new()
    }
}

/// Renumber communities to be contiguous, in order of first appearance
fn renumber_communities(communities: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let mut next_id = 0;

    let renumbered: Vec<usize> = communities
        .iter()
        .map(|&c| {
            *mapping.entry(c).or_insert_with(|| {
                let id = next_id;
                next_id += 1;
                id
            })
        })
        .collect();

    (renumbered, next_id)
}
