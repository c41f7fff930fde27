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

//! Analysis entry points
//!
//! Every call builds a fresh [`AnalysisGraph`] from the snapshot it is given;
//! nothing is cached between calls, so a `GraphAnalyzer` can be shared freely.

use crate::centrality;
use crate::config::{AnalysisConfig, LayoutOptions};
use crate::entities::{CentralityResult, EdgeRecord, GraphStats, HierarchyResult, NodeRecord, Position};
use crate::graph::AnalysisGraph;
use crate::hierarchy::HierarchyAnalyzer;
use crate::layout;
use crate::louvain::{CommunityDetection, LouvainClustering};
use crate::paths;
use std::collections::BTreeMap;
use tracing::{instrument, warn};

/// Runs analyses with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct GraphAnalyzer {
    config: AnalysisConfig,
}

impl GraphAnalyzer {
    /// Analyzer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Build the adjacency structure for a snapshot
    pub fn build_graph(&self, nodes: &[NodeRecord], edges: &[EdgeRecord]) -> AnalysisGraph {
        AnalysisGraph::build(nodes, edges)
    }

    /// One shortest path between two nodes, or `None` if they are not connected
    #[instrument(skip_all, fields(source = source_id, target = target_id))]
    pub fn find_shortest_path(
        &self,
        nodes: &[NodeRecord],
        edges: &[EdgeRecord],
        source_id: &str,
        target_id: &str,
    ) -> Option<Vec<String>> {
        let graph = self.build_graph(nodes, edges);
        paths::shortest_path(&graph, source_id, target_id)
    }

    #[instrument(skip_all, fields(nodes = nodes.len()))]
    pub fn calculate_degree_centrality(
        &self,
        nodes: &[NodeRecord],
        edges: &[EdgeRecord],
    ) -> Vec<CentralityResult> {
        let graph = self.build_graph(nodes, edges);
        centrality::degree_centrality(&graph)
    }

    #[instrument(skip_all, fields(nodes = nodes.len()))]
    pub fn calculate_betweenness_centrality(
        &self,
        nodes: &[NodeRecord],
        edges: &[EdgeRecord],
    ) -> Vec<CentralityResult> {
        let graph = self.build_graph(nodes, edges);
        self.check_size(&graph, "betweenness");
        centrality::betweenness_centrality(&graph)
    }

    /// Community ID -> member node IDs
    pub fn detect_communities(
        &self,
        nodes: &[NodeRecord],
        edges: &[EdgeRecord],
    ) -> BTreeMap<String, Vec<String>> {
        self.detect_communities_detailed(nodes, edges).communities
    }

    /// Communities together with modularity and level count
    #[instrument(skip_all, fields(nodes = nodes.len(), resolution = self.config.communities.resolution))]
    pub fn detect_communities_detailed(
        &self,
        nodes: &[NodeRecord],
        edges: &[EdgeRecord],
    ) -> CommunityDetection {
        let graph = self.build_graph(nodes, edges);
        self.check_size(&graph, "communities");
        LouvainClustering::with_config(self.config.communities.clone()).detect(&graph)
    }

    #[instrument(skip_all, fields(nodes = nodes.len(), leader_count))]
    pub fn analyze_hierarchy(
        &self,
        nodes: &[NodeRecord],
        edges: &[EdgeRecord],
        leader_count: usize,
    ) -> HierarchyResult {
        let graph = self.build_graph(nodes, edges);
        self.check_size(&graph, "hierarchy");
        HierarchyAnalyzer::with_config(self.config.hierarchy.clone()).analyze(&graph, leader_count)
    }

    /// Hierarchy with the configured default leader count
    pub fn analyze_hierarchy_default(&self, nodes: &[NodeRecord], edges: &[EdgeRecord]) -> HierarchyResult {
        self.analyze_hierarchy(nodes, edges, self.config.hierarchy.default_leader_count)
    }

    /// Layout using the configured geometry
    pub fn calculate_hierarchy_layout(&self, result: &HierarchyResult) -> BTreeMap<String, Position> {
        layout::calculate_hierarchy_layout(result, &self.config.layout)
    }

    pub fn graph_stats(&self, nodes: &[NodeRecord], edges: &[EdgeRecord]) -> GraphStats {
        self.build_graph(nodes, edges).stats()
    }

    fn check_size(&self, graph: &AnalysisGraph, analysis: &str) {
        let limit = self.config.limits.warn_node_count;
        if graph.node_count() > limit {
            warn!(
                analysis,
                nodes = graph.node_count(),
                limit,
                "Graph exceeds the interactive size limit; analysis may be slow"
            );
        }
    }
}

/// Build the adjacency structure for a snapshot
pub fn build_graph(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> AnalysisGraph {
    AnalysisGraph::build(nodes, edges)
}

pub fn find_shortest_path(
    nodes: &[NodeRecord],
    edges: &[EdgeRecord],
    source_id: &str,
    target_id: &str,
) -> Option<Vec<String>> {
    GraphAnalyzer::new().find_shortest_path(nodes, edges, source_id, target_id)
}

pub fn calculate_degree_centrality(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Vec<CentralityResult> {
    GraphAnalyzer::new().calculate_degree_centrality(nodes, edges)
}

pub fn calculate_betweenness_centrality(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Vec<CentralityResult> {
    GraphAnalyzer::new().calculate_betweenness_centrality(nodes, edges)
}

pub fn detect_communities(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> BTreeMap<String, Vec<String>> {
    GraphAnalyzer::new().detect_communities(nodes, edges)
}

pub fn analyze_hierarchy(nodes: &[NodeRecord], edges: &[EdgeRecord], leader_count: usize) -> HierarchyResult {
    GraphAnalyzer::new().analyze_hierarchy(nodes, edges, leader_count)
}

pub fn calculate_hierarchy_layout(
    result: &HierarchyResult,
    options: &LayoutOptions,
) -> BTreeMap<String, Position> {
    layout::calculate_hierarchy_layout(result, options)
}

pub fn graph_stats(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> GraphStats {
    build_graph(nodes, edges).stats()
}
