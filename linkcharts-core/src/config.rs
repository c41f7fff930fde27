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

//! Analysis configuration
//!
//! Every section has defaults, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! [hierarchy]
//! default_leader_count = 5
//!
//! [communities]
//! resolution = 1.2
//! ```

use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for all analyses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Leadership inference
    pub hierarchy: HierarchyConfig,
    /// Community detection
    pub communities: LouvainConfig,
    /// Hierarchy layout geometry
    pub layout: LayoutOptions,
    /// Size thresholds
    pub limits: LimitsConfig,
}

impl AnalysisConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> AnalysisResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> AnalysisResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values the analyses cannot work with
    pub fn validate(&self) -> AnalysisResult<()> {
        self.hierarchy.validate()?;
        self.communities.validate()?;
        self.layout.validate()?;
        Ok(())
    }
}

/// Leadership scoring and leader selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Weight of normalized betweenness in the leadership score
    pub betweenness_weight: f64,
    /// Weight of normalized degree in the leadership score
    pub degree_weight: f64,
    /// Upper bound on leaders as a fraction of the node count (rounded up)
    pub max_leader_fraction: f64,
    /// Divisor used when a metric's maximum is zero
    pub normalization_floor: f64,
    /// Leaders requested when the caller does not specify a count
    pub default_leader_count: usize,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            betweenness_weight: 0.7,
            degree_weight: 0.3,
            max_leader_fraction: 0.1,
            normalization_floor: 0.001,
            default_leader_count: 3,
        }
    }
}

impl HierarchyConfig {
    fn validate(&self) -> AnalysisResult<()> {
        let weights = [
            ("hierarchy.betweenness_weight", self.betweenness_weight),
            ("hierarchy.degree_weight", self.degree_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        let total = self.betweenness_weight + self.degree_weight;
        if (total - 1.0).abs() > 1e-9 {
            return Err(AnalysisError::InvalidConfig(format!(
                "hierarchy.betweenness_weight + hierarchy.degree_weight must equal 1, got {}",
                total
            )));
        }
        if !(self.max_leader_fraction > 0.0 && self.max_leader_fraction <= 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "hierarchy.max_leader_fraction must be in (0, 1], got {}",
                self.max_leader_fraction
            )));
        }
        if !(self.normalization_floor.is_finite() && self.normalization_floor > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "hierarchy.normalization_floor must be positive, got {}",
                self.normalization_floor
            )));
        }
        Ok(())
    }
}

/// Louvain community detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LouvainConfig {
    /// Resolution parameter (higher = more, smaller communities)
    pub resolution: f64,
    /// Maximum local-moving sweeps per level
    pub max_passes: usize,
    /// Maximum aggregation levels
    pub max_levels: usize,
    /// Minimum modularity improvement for another level
    pub min_improvement: f64,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_passes: 100,
            max_levels: 32,
            min_improvement: 1e-7,
        }
    }
}

impl LouvainConfig {
    fn validate(&self) -> AnalysisResult<()> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "communities.resolution must be positive, got {}",
                self.resolution
            )));
        }
        if self.max_passes == 0 || self.max_levels == 0 {
            return Err(AnalysisError::InvalidConfig(
                "communities.max_passes and communities.max_levels must be at least 1".to_string(),
            ));
        }
        if !self.min_improvement.is_finite() || self.min_improvement < 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "communities.min_improvement must be non-negative, got {}",
                self.min_improvement
            )));
        }
        Ok(())
    }
}

/// Geometry of the hierarchy layout, in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub node_width: f64,
    pub node_height: f64,
    /// Vertical distance between consecutive rows
    pub level_gap: f64,
    /// Horizontal space between neighbouring boxes
    pub node_gap: f64,
    pub start_x: f64,
    pub start_y: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            node_width: 150.0,
            node_height: 80.0,
            level_gap: 180.0,
            node_gap: 100.0,
            start_x: 100.0,
            start_y: 50.0,
        }
    }
}

impl LayoutOptions {
    fn validate(&self) -> AnalysisResult<()> {
        let sizes = [
            ("layout.node_width", self.node_width),
            ("layout.node_height", self.node_height),
            ("layout.level_gap", self.level_gap),
            ("layout.node_gap", self.node_gap),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !self.start_x.is_finite() || !self.start_y.is_finite() {
            return Err(AnalysisError::InvalidConfig(
                "layout.start_x and layout.start_y must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Size thresholds for the super-linear analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Node count above which betweenness, Louvain and hierarchy runs log a warning
    pub warn_node_count: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            warn_node_count: 2_000,
        }
    }
}
