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

//! Linkcharts Graph Analytics
//!
//! Structural analysis of investigative link charts: entities (people,
//! organizations, accounts) joined by typed relationships. Provides:
//! - **Paths**: shortest chain of relationships between two entities
//! - **Centrality**: degree and betweenness rankings
//! - **Communities**: deterministic Louvain clustering
//! - **Hierarchy**: inferred leaders, lieutenants and chains of command
//! - **Layout**: level-by-level canvas placement of a hierarchy
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     GraphAnalyzer                         │
//! │  ┌──────────┐ ┌────────────┐ ┌──────────┐ ┌───────────┐  │
//! │  │  Paths   │ │ Centrality │ │ Louvain  │ │ Hierarchy │  │
//! │  └────┬─────┘ └─────┬──────┘ └────┬─────┘ └─────┬─────┘  │
//! │       │             │             │              │        │
//! │  ┌────▼─────────────▼─────────────▼──────────────▼─────┐  │
//! │  │          AnalysisGraph (rebuilt per call)           │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! All analyses are synchronous and pure. Betweenness, Louvain and the
//! hierarchy analysis are super-linear; graphs in the low thousands of
//! nodes are the practical interactive limit.
//!
//! # Example
//!
//! ```rust
//! use linkcharts_core::{EdgeRecord, GraphAnalyzer, NodeRecord};
//!
//! let nodes = vec![
//!     NodeRecord::new("a", "Alice", "PERSON"),
//!     NodeRecord::new("b", "Bob", "PERSON"),
//!     NodeRecord::new("c", "Acme Ltd", "ORGANIZATION"),
//! ];
//! let edges = vec![
//!     EdgeRecord::new("e1", "a", "b", "CONTACT"),
//!     EdgeRecord::new("e2", "b", "c", "EMPLOYMENT"),
//! ];
//!
//! let analyzer = GraphAnalyzer::new();
//! let path = analyzer.find_shortest_path(&nodes, &edges, "a", "c");
//! assert_eq!(path, Some(vec!["a".to_string(), "b".to_string(), "c".to_string()]));
//!
//! let hierarchy = analyzer.analyze_hierarchy(&nodes, &edges, 1);
//! assert_eq!(hierarchy.leaders, vec!["b".to_string()]);
//! ```

pub mod centrality;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod layout;
pub mod louvain;
pub mod paths;

// Re-exports
pub use config::{AnalysisConfig, HierarchyConfig, LayoutOptions, LimitsConfig, LouvainConfig};
pub use engine::{
    analyze_hierarchy, build_graph, calculate_betweenness_centrality, calculate_degree_centrality,
    calculate_hierarchy_layout, detect_communities, find_shortest_path, graph_stats, GraphAnalyzer,
};
pub use entities::{
    CentralityResult, EdgeRecord, GraphSnapshot, GraphStats, HierarchyNode, HierarchyResult,
    NodeRecord, Position, Role,
};
pub use error::{AnalysisError, AnalysisResult};
pub use graph::{AnalysisGraph, BuildDiagnostics, GraphEdge, Vertex, VertexIndex};
pub use hierarchy::HierarchyAnalyzer;
pub use layout::{layout_bounds, LayoutBounds};
pub use louvain::{CommunityDetection, LouvainClustering};
