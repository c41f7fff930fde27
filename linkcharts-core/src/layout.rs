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

//! Level-by-level placement of a hierarchy on the canvas
//!
//! Ranked levels are stacked top to bottom, each row centered on the widest
//! one. Unreachable nodes get a final left-aligned row.

use crate::config::LayoutOptions;
use crate::entities::{HierarchyResult, Position};
use crate::hierarchy::UNREACHABLE_LEVEL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bounding box of a set of placed node boxes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl LayoutBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Top-left corner of every node box, keyed by node ID
pub fn calculate_hierarchy_layout(
    result: &HierarchyResult,
    options: &LayoutOptions,
) -> BTreeMap<String, Position> {
    let mut positions = BTreeMap::new();

    let ranked: Vec<&Vec<String>> = result
        .levels
        .iter()
        .filter(|(level, _)| **level != UNREACHABLE_LEVEL)
        .map(|(_, ids)| ids)
        .collect();

    let row_width = |count: usize| {
        if count == 0 {
            0.0
        } else {
            count as f64 * options.node_width + (count - 1) as f64 * options.node_gap
        }
    };
    let max_width = ranked
        .iter()
        .map(|ids| row_width(ids.len()))
        .fold(0.0_f64, f64::max);
    let step = options.node_width + options.node_gap;

    for (rank, ids) in ranked.iter().enumerate() {
        let y = options.start_y + rank as f64 * options.level_gap;
        let offset = options.start_x + (max_width - row_width(ids.len())) / 2.0;
        for (i, id) in ids.iter().enumerate() {
            positions.insert(
                id.clone(),
                Position {
                    x: offset + i as f64 * step,
                    y,
                },
            );
        }
    }

    if let Some(unreachable) = result.levels.get(&UNREACHABLE_LEVEL) {
        let y = options.start_y + ranked.len() as f64 * options.level_gap;
        for (i, id) in unreachable.iter().enumerate() {
            positions.insert(
                id.clone(),
                Position {
                    x: options.start_x + i as f64 * step,
                    y,
                },
            );
        }
    }

    positions
}

/// Box enclosing every placed node, `None` for an empty layout
pub fn layout_bounds(
    positions: &BTreeMap<String, Position>,
    options: &LayoutOptions,
) -> Option<LayoutBounds> {
    let mut points = positions.values();
    let first = points.next()?;

    let mut bounds = LayoutBounds {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x,
        max_y: first.y,
    };
    for p in points {
        bounds.min_x = bounds.min_x.min(p.x);
        bounds.min_y = bounds.min_y.min(p.y);
        bounds.max_x = bounds.max_x.max(p.x);
        bounds.max_y = bounds.max_y.max(p.y);
    }
    bounds.max_x += options.node_width;
    bounds.max_y += options.node_height;

    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Levels given as space-separated ID lists
    fn result_with_levels(levels: &[(i32, &str)]) -> HierarchyResult {
        HierarchyResult {
            levels: levels
                .iter()
                .map(|(level, ids)| (*level, ids.split_whitespace().map(String::from).collect()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rows_are_centered() {
        let result = result_with_levels(&[(0, "L"), (1, "a b c")]);
        let options = LayoutOptions::default();
        let positions = calculate_hierarchy_layout(&result, &options);

        // Widest row: 3 * 150 + 2 * 100 = 650; single box: offset (650 - 150) / 2
        assert_eq!(positions["L"], Position { x: 350.0, y: 50.0 });
        assert_eq!(positions["a"], Position { x: 100.0, y: 230.0 });
        assert_eq!(positions["b"], Position { x: 350.0, y: 230.0 });
        assert_eq!(positions["c"], Position { x: 600.0, y: 230.0 });
    }

    #[test]
    fn test_unreachable_row_is_left_aligned_below() {
        let result = result_with_levels(&[(-1, "x y"), (0, "L"), (1, "a b c")]);
        let options = LayoutOptions::default();
        let positions = calculate_hierarchy_layout(&result, &options);

        assert_eq!(positions["x"], Position { x: 100.0, y: 410.0 });
        assert_eq!(positions["y"], Position { x: 350.0, y: 410.0 });
        assert_eq!(positions.len(), 6);
    }

    #[test]
    fn test_levels_with_gaps_are_stacked_by_rank() {
        let result = result_with_levels(&[(0, "L"), (3, "d")]);
        let positions = calculate_hierarchy_layout(&result, &LayoutOptions::default());
        assert_eq!(positions["d"].y, 230.0);
    }

    #[test]
    fn test_only_unreachable() {
        let result = result_with_levels(&[(-1, "x")]);
        let options = LayoutOptions {
            start_x: 0.0,
            start_y: 0.0,
            ..Default::default()
        };
        let positions = calculate_hierarchy_layout(&result, &options);
        assert_eq!(positions["x"], Position { x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_empty_result() {
        let positions = calculate_hierarchy_layout(&HierarchyResult::default(), &LayoutOptions::default());
        assert!(positions.is_empty());
        assert_eq!(layout_bounds(&positions, &LayoutOptions::default()), None);
    }

    #[test]
    fn test_bounds_cover_boxes() {
        let result = result_with_levels(&[(-1, "x"), (0, "L"), (1, "a b")]);
        let options = LayoutOptions::default();
        let positions = calculate_hierarchy_layout(&result, &options);
        let bounds = layout_bounds(&positions, &options).unwrap();

        assert_eq!(bounds.min_x, 100.0);
        assert_eq!(bounds.min_y, 50.0);
        // Row "a b" spans 400 units starting at 100
        assert_eq!(bounds.max_x, 500.0);
        assert_eq!(bounds.max_y, 50.0 + 2.0 * 180.0 + 80.0);
        assert_eq!(bounds.width(), 400.0);
    }
}
