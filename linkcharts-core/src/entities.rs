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

//! Node, Edge and Result Types
//!
//! Input records mirror the REST graph payload (camelCase on the wire), so an
//! exported graph can be deserialized directly. Result types are value
//! objects produced by a single analysis call.

use crate::error::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// An entity on the chart (person, organization, account, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Unique identifier within a graph
    pub id: String,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Open-ended type tag (e.g. "PERSON", "ORGANIZATION")
    #[serde(rename = "type", default)]
    pub node_type: String,
}

impl NodeRecord {
    /// Create a node record
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        node_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type: node_type.into(),
        }
    }
}

/// A typed relationship between two entities
///
/// Stored directed, but every shipped analysis reads it as an undirected
/// adjacency between `source_id` and `target_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    /// Unique identifier
    pub id: String,
    /// Source node ID
    pub source_id: String,
    /// Target node ID
    pub target_id: String,
    /// Relationship category (e.g. "CONTACT", "TRANSACTION")
    #[serde(rename = "type", default)]
    pub edge_type: String,
    /// Optional display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EdgeRecord {
    /// Create an edge record without a label
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            edge_type: edge_type.into(),
            label: None,
        }
    }

    /// Set the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A plain snapshot of a chart's nodes and edges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Self {
        Self { nodes, edges }
    }

    /// Parse a snapshot from JSON text
    pub fn from_json_str(json: &str) -> AnalysisResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a snapshot from any reader
    pub fn from_reader<R: Read>(reader: R) -> AnalysisResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a snapshot from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> AnalysisResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

/// Score of a single node for a centrality measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralityResult {
    pub node_id: String,
    pub score: f64,
}

/// Position of a node within an inferred command structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Selected leader (level 0)
    Leader,
    /// Direct contact of a leader (level 1)
    Lieutenant,
    /// Two or three hops from a leader
    Operative,
    /// Four or more hops away, or unreachable from every leader
    Peripheral,
}

impl Role {
    /// Role implied by a hierarchy level (-1 means unreachable)
    pub fn for_level(level: i32) -> Self {
        match level {
            0 => Role::Leader,
            1 => Role::Lieutenant,
            2 | 3 => Role::Operative,
            _ => Role::Peripheral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Leader => "leader",
            Role::Lieutenant => "lieutenant",
            Role::Operative => "operative",
            Role::Peripheral => "peripheral",
        }
    }
}

/// A node annotated with its inferred hierarchy position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub node_id: String,
    pub label: String,
    /// Hop distance to the nearest leader, -1 if unreachable
    pub level: i32,
    pub role: Role,
    /// Combined normalized score in [0, 1]
    pub leadership_score: f64,
    pub parent_id: Option<String>,
    pub children_ids: Vec<String>,
}

/// Output of the hierarchy analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyResult {
    /// Nodes ordered by ascending level (-1 first)
    pub nodes: Vec<HierarchyNode>,
    /// Node IDs grouped by level; `levels[-1]` holds unreachable nodes
    pub levels: BTreeMap<i32, Vec<String>>,
    /// Leader IDs in rank order
    pub leaders: Vec<String>,
    /// Chains of command, one per leader with at least one subordinate
    pub chains: Vec<Vec<String>>,
}

impl HierarchyResult {
    /// Look up a node by ID
    pub fn node(&self, node_id: &str) -> Option<&HierarchyNode> {
        self.nodes.iter().find(|n| n.node_id == node_id)
    }

    /// All nodes holding the given role, in result order
    pub fn nodes_with_role(&self, role: Role) -> Vec<&HierarchyNode> {
        self.nodes.iter().filter(|n| n.role == role).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Canvas coordinates (top-left corner of a node box)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Statistics about an analysis graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    /// Number of vertices
    pub node_count: usize,
    /// Number of accepted edges
    pub edge_count: usize,
    /// Mean number of distinct neighbors per vertex
    pub avg_degree: f64,
    /// Undirected density (neighbor pairs / possible pairs)
    pub density: f64,
    /// Vertices without any neighbor
    pub isolated_count: usize,
    /// Connected components of the undirected view
    pub component_count: usize,
    /// Distribution of node types
    pub node_type_distribution: HashMap<String, usize>,
    /// Distribution of edge types
    pub edge_type_distribution: HashMap<String, usize>,
}
