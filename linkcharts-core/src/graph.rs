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

//! Analysis Graph
//!
//! The adjacency structure every analysis runs on, rebuilt from a
//! `(nodes, edges)` snapshot on each call. Supports:
//! - Vertex lookup by ID, in snapshot insertion order
//! - Directed edge records with their type and label
//! - Direction-agnostic neighbor lists, sorted by node ID
//! - Build diagnostics and summary statistics
//!
//! Construction is lenient: repeated node IDs, edges with a missing endpoint
//! and repeated edge IDs are skipped (first occurrence wins) and counted in
//! [`BuildDiagnostics`].

use crate::entities::{EdgeRecord, GraphStats, NodeRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Dense index of a vertex, assigned in insertion order
pub type VertexIndex = usize;

/// A vertex and its attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: String,
    pub label: String,
    pub node_type: String,
}

/// An accepted edge (stored directed)
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub source: VertexIndex,
    pub target: VertexIndex,
    pub edge_type: String,
    pub label: Option<String>,
}

/// Records dropped while building a graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDiagnostics {
    /// Nodes whose ID was already present
    pub duplicate_nodes: usize,
    /// Edges with a source or target that is not a vertex
    pub dangling_edges: usize,
    /// Edges whose ID was already added
    pub duplicate_edges: usize,
}

impl BuildDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.duplicate_nodes == 0 && self.dangling_edges == 0 && self.duplicate_edges == 0
    }
}

/// In-memory graph built from a snapshot
#[derive(Debug, Clone, Default)]
pub struct AnalysisGraph {
    vertices: Vec<Vertex>,
    index: HashMap<String, VertexIndex>,
    edges: Vec<GraphEdge>,
    /// Distinct neighbors per vertex, excluding self, ordered by node ID
    adjacency: Vec<Vec<VertexIndex>>,
    diagnostics: BuildDiagnostics,
}

impl AnalysisGraph {
    /// Build a graph from node and edge records
    pub fn build(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Self {
        let mut graph = Self::default();

        for node in nodes {
            if graph.index.contains_key(&node.id) {
                graph.diagnostics.duplicate_nodes += 1;
                continue;
            }
            graph.index.insert(node.id.clone(), graph.vertices.len());
            graph.vertices.push(Vertex {
                id: node.id.clone(),
                label: node.label.clone(),
                node_type: node.node_type.clone(),
            });
        }

        graph.adjacency = vec![Vec::new(); graph.vertices.len()];
        let mut edge_ids: HashSet<&str> = HashSet::with_capacity(edges.len());

        for edge in edges {
            let (Some(&source), Some(&target)) =
                (graph.index.get(&edge.source_id), graph.index.get(&edge.target_id))
            else {
                graph.diagnostics.dangling_edges += 1;
                continue;
            };
            if !edge_ids.insert(edge.id.as_str()) {
                graph.diagnostics.duplicate_edges += 1;
                continue;
            }

            if source != target {
                graph.adjacency[source].push(target);
                graph.adjacency[target].push(source);
            }
            graph.edges.push(GraphEdge {
                id: edge.id.clone(),
                source,
                target,
                edge_type: edge.edge_type.clone(),
                label: edge.label.clone(),
            });
        }

        let vertices = &graph.vertices;
        for neighbors in &mut graph.adjacency {
            neighbors.sort_by(|&a, &b| vertices[a].id.cmp(&vertices[b].id));
            neighbors.dedup();
        }

        if !graph.diagnostics.is_clean() {
            debug!(
                duplicate_nodes = graph.diagnostics.duplicate_nodes,
                dangling_edges = graph.diagnostics.dangling_edges,
                duplicate_edges = graph.diagnostics.duplicate_edges,
                "Dropped records while building analysis graph"
            );
        }

        graph
    }

    pub fn node_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Index of the vertex with the given ID
    pub fn index_of(&self, node_id: &str) -> Option<VertexIndex> {
        self.index.get(node_id).copied()
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.index.contains_key(node_id)
    }

    /// Vertex at `index`. Panics if the index is out of range.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self.vertices[index]
    }

    /// All vertices in insertion order
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All accepted edges in insertion order
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Distinct neighbors of a vertex regardless of edge direction
    pub fn neighbors(&self, index: VertexIndex) -> &[VertexIndex] {
        &self.adjacency[index]
    }

    /// Neighbor IDs of a node, empty if the node is unknown
    pub fn neighbor_ids(&self, node_id: &str) -> Vec<&str> {
        self.index_of(node_id)
            .map(|idx| {
                self.adjacency[idx]
                    .iter()
                    .map(|&n| self.vertices[n].id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of distinct neighbors
    pub fn degree(&self, index: VertexIndex) -> usize {
        self.adjacency[index].len()
    }

    pub fn diagnostics(&self) -> BuildDiagnostics {
        self.diagnostics
    }

    /// Connected components of the undirected view, each in BFS order
    pub fn connected_components(&self) -> Vec<Vec<VertexIndex>> {
        let mut seen = vec![false; self.vertices.len()];
        let mut components = Vec::new();

        for start in 0..self.vertices.len() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);

            while let Some(v) = queue.pop_front() {
                for &w in &self.adjacency[v] {
                    if !seen[w] {
                        seen[w] = true;
                        component.push(w);
                        queue.push_back(w);
                    }
                }
            }
            components.push(component);
        }

        components
    }

    /// Get graph statistics
    pub fn stats(&self) -> GraphStats {
        let node_count = self.vertices.len();
        let neighbor_slots: usize = self.adjacency.iter().map(Vec::len).sum();

        let avg_degree = if node_count > 0 {
            neighbor_slots as f64 / node_count as f64
        } else {
            0.0
        };

        // Each adjacent pair appears twice in the neighbor lists
        let density = if node_count > 1 {
            neighbor_slots as f64 / (node_count * (node_count - 1)) as f64
        } else {
            0.0
        };

        let mut node_type_distribution: HashMap<String, usize> = HashMap::new();
        for vertex in &self.vertices {
            *node_type_distribution
                .entry(vertex.node_type.clone())
                .or_default() += 1;
        }

        let mut edge_type_distribution: HashMap<String, usize> = HashMap::new();
        for edge in &self.edges {
            *edge_type_distribution
                .entry(edge.edge_type.clone())
                .or_default() += 1;
        }

        GraphStats {
            node_count,
            edge_count: self.edges.len(),
            avg_degree,
            density,
            isolated_count: self.adjacency.iter().filter(|n| n.is_empty()).count(),
            component_count: self.connected_components().len(),
            node_type_distribution,
            edge_type_distribution,
        }
    }
}
