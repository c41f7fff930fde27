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

//! Integration tests for the analysis entry points

use linkcharts_core::{
    analyze_hierarchy, calculate_betweenness_centrality, calculate_degree_centrality,
    calculate_hierarchy_layout, detect_communities, find_shortest_path, EdgeRecord, GraphAnalyzer,
    GraphSnapshot, LayoutOptions, NodeRecord, Role,
};
use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};

fn nodes(ids: &[&str]) -> Vec<NodeRecord> {
    ids.iter().map(|id| NodeRecord::new(*id, *id, "PERSON")).collect()
}

fn edges(links: &[(&str, &str)]) -> Vec<EdgeRecord> {
    links
        .iter()
        .enumerate()
        .map(|(i, (a, b))| EdgeRecord::new(format!("e{}", i), *a, *b, "CONTACT"))
        .collect()
}

fn two_triangles() -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
    (
        nodes(&["A", "B", "C", "D", "E", "F"]),
        edges(&[("A", "B"), ("B", "C"), ("C", "A"), ("D", "E"), ("E", "F"), ("F", "D")]),
    )
}

/// Test the chain scenario end to end
#[test]
fn test_chain_scenario() {
    let nodes = nodes(&["A", "B", "C", "D"]);
    let edges = edges(&[("A", "B"), ("B", "C"), ("C", "D")]);

    assert_eq!(
        find_shortest_path(&nodes, &edges, "A", "D"),
        Some(vec!["A".into(), "B".into(), "C".into(), "D".into()])
    );

    let degree = calculate_degree_centrality(&nodes, &edges);
    let top: HashSet<&str> = degree[..2].iter().map(|r| r.node_id.as_str()).collect();
    assert_eq!(top, HashSet::from(["B", "C"]));

    let hierarchy = analyze_hierarchy(&nodes, &edges, 1);
    assert_eq!(hierarchy.leaders.len(), 1);
    assert!(hierarchy.leaders[0] == "B" || hierarchy.leaders[0] == "C");
    let leader = hierarchy.node(&hierarchy.leaders[0]).unwrap();
    assert_eq!(leader.level, 0);
    assert_eq!(leader.role, Role::Leader);
}

/// Test the two-triangle scenario
#[test]
fn test_two_triangles_scenario() {
    let (nodes, edges) = two_triangles();

    let communities = detect_communities(&nodes, &edges);
    assert_eq!(communities.len(), 2);
    assert!(communities.values().all(|members| members.len() == 3));

    assert_eq!(find_shortest_path(&nodes, &edges, "A", "D"), None);
}

/// Test the star scenario
#[test]
fn test_star_scenario() {
    let nodes = nodes(&["hub", "l1", "l2", "l3", "l4", "l5"]);
    let edges = edges(&[
        ("hub", "l1"),
        ("hub", "l2"),
        ("hub", "l3"),
        ("hub", "l4"),
        ("hub", "l5"),
    ]);

    let betweenness = calculate_betweenness_centrality(&nodes, &edges);
    assert_eq!(betweenness[0].node_id, "hub");
    assert!(betweenness[0].score > 0.0);
    assert!(betweenness[1..].iter().all(|r| r.score == 0.0));

    let degree = calculate_degree_centrality(&nodes, &edges);
    assert_eq!(degree[0].node_id, "hub");
    assert_eq!(degree[0].score, 1.0);
}

/// Test hierarchy on a fully disconnected graph
#[test]
fn test_disconnected_hierarchy() {
    let ids: Vec<String> = (0..12).map(|i| format!("n{}", i)).collect();
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let result = analyze_hierarchy(&nodes(&refs), &[], 5);

    // ceil(12 * 0.1) = 2 leaders, both isolated
    assert_eq!(result.leaders.len(), 2);
    for node in &result.nodes {
        if result.leaders.contains(&node.node_id) {
            assert_eq!(node.level, 0);
        } else {
            assert_eq!(node.level, -1);
            assert_eq!(node.role, Role::Peripheral);
        }
    }
    assert!(result.chains.is_empty());
}

/// Test degenerate inputs never panic
#[test]
fn test_degenerate_inputs() {
    let analyzer = GraphAnalyzer::new();
    let empty: Vec<NodeRecord> = Vec::new();

    assert!(analyzer.calculate_degree_centrality(&empty, &[]).is_empty());
    assert!(analyzer.calculate_betweenness_centrality(&empty, &[]).is_empty());
    assert!(analyzer.detect_communities(&empty, &[]).is_empty());
    assert!(analyzer.analyze_hierarchy(&empty, &[], 3).is_empty());
    assert_eq!(analyzer.find_shortest_path(&empty, &[], "a", "b"), None);

    let single = nodes(&["solo"]);
    let result = analyzer.analyze_hierarchy(&single, &[], 10);
    assert_eq!(result.leaders, vec!["solo"]);
    let communities = analyzer.detect_communities(&single, &[]);
    assert_eq!(communities["0"], vec!["solo"]);
}

/// Test loading a REST export and running every analysis on it
#[test]
fn test_snapshot_pipeline() {
    let json = r#"{
        "nodes": [
            {"id": "p1", "label": "Boss", "type": "PERSON", "color": "red"},
            {"id": "p2", "label": "Runner", "type": "PERSON"},
            {"id": "p3", "label": "Courier", "type": "PERSON"},
            {"id": "o1", "label": "Front Co", "type": "ORGANIZATION"}
        ],
        "edges": [
            {"id": "e1", "sourceId": "p1", "targetId": "p2", "type": "CONTACT"},
            {"id": "e2", "sourceId": "p2", "targetId": "p3", "type": "CONTACT"},
            {"id": "e3", "sourceId": "p1", "targetId": "o1", "type": "OWNERSHIP", "label": "owns"},
            {"id": "e4", "sourceId": "p3", "targetId": "missing", "type": "CONTACT"}
        ]
    }"#;
    let snapshot = GraphSnapshot::from_json_str(json).unwrap();
    let analyzer = GraphAnalyzer::new();

    let stats = analyzer.graph_stats(&snapshot.nodes, &snapshot.edges);
    assert_eq!(stats.node_count, 4);
    assert_eq!(stats.edge_count, 3);
    assert_eq!(stats.component_count, 1);

    let path = analyzer.find_shortest_path(&snapshot.nodes, &snapshot.edges, "o1", "p3");
    assert_eq!(path.map(|p| p.len()), Some(4));

    let hierarchy = analyzer.analyze_hierarchy(&snapshot.nodes, &snapshot.edges, 1);
    let positions = analyzer.calculate_hierarchy_layout(&hierarchy);
    assert_eq!(positions.len(), 4);

    let encoded = serde_json::to_value(&hierarchy).unwrap();
    assert!(encoded["nodes"][0].get("leadershipScore").is_some());
}

/// Reference BFS distance used to check path minimality
fn bfs_distance(n: usize, links: &[(usize, usize)], s: usize, t: usize) -> Option<usize> {
    let mut adjacency = vec![Vec::new(); n];
    for &(a, b) in links {
        adjacency[a].push(b);
        adjacency[b].push(a);
    }
    let mut dist = vec![None; n];
    dist[s] = Some(0);
    let mut queue = VecDeque::from([s]);
    while let Some(v) = queue.pop_front() {
        for &w in &adjacency[v] {
            if dist[w].is_none() {
                dist[w] = dist[v].map(|d| d + 1);
                queue.push_back(w);
            }
        }
    }
    dist[t]
}

fn random_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..14).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..30)))
}

fn records(n: usize, links: &[(usize, usize)]) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
    let nodes = (0..n)
        .map(|i| NodeRecord::new(format!("n{}", i), format!("Node {}", i), "PERSON"))
        .collect();
    let edges = links
        .iter()
        .enumerate()
        .map(|(i, &(a, b))| EdgeRecord::new(format!("e{}", i), format!("n{}", a), format!("n{}", b), "CONTACT"))
        .collect();
    (nodes, edges)
}

proptest! {
    #[test]
    fn prop_paths_are_valid_and_minimal((n, links) in random_graph(), s in 0usize..14, t in 0usize..14) {
        let (s, t) = (s % n, t % n);
        let (nodes, edges) = records(n, &links);
        let path = find_shortest_path(&nodes, &edges, &format!("n{}", s), &format!("n{}", t));

        match (path, bfs_distance(n, &links, s, t)) {
            (Some(path), Some(distance)) => {
                prop_assert_eq!(path.len(), distance + 1);
                prop_assert_eq!(path[0].clone(), format!("n{}", s));
                prop_assert_eq!(path[path.len() - 1].clone(), format!("n{}", t));
                let adjacent: HashSet<(String, String)> = edges
                    .iter()
                    .flat_map(|e| {
                        [
                            (e.source_id.clone(), e.target_id.clone()),
                            (e.target_id.clone(), e.source_id.clone()),
                        ]
                    })
                    .collect();
                for pair in path.windows(2) {
                    prop_assert!(adjacent.contains(&(pair[0].clone(), pair[1].clone())));
                }
            }
            (None, None) => {}
            (found, expected) => prop_assert!(false, "path {:?} vs distance {:?}", found, expected),
        }
    }

    #[test]
    fn prop_centrality_in_unit_range((n, links) in random_graph()) {
        let (nodes, edges) = records(n, &links);
        for result in calculate_degree_centrality(&nodes, &edges)
            .into_iter()
            .chain(calculate_betweenness_centrality(&nodes, &edges))
        {
            prop_assert!((0.0..=1.0 + 1e-9).contains(&result.score));
        }
    }

    #[test]
    fn prop_communities_partition_nodes((n, links) in random_graph()) {
        let (nodes, edges) = records(n, &links);
        let communities = detect_communities(&nodes, &edges);

        let members: Vec<&String> = communities.values().flatten().collect();
        prop_assert_eq!(members.len(), n);
        let distinct: HashSet<&String> = members.into_iter().collect();
        prop_assert_eq!(distinct.len(), n);
    }

    #[test]
    fn prop_leader_cap_on_twenty_nodes(links in prop::collection::vec((0usize..20, 0usize..20), 0..60)) {
        let (nodes, edges) = records(20, &links);
        let result = analyze_hierarchy(&nodes, &edges, 5);
        prop_assert!(result.leaders.len() <= 2);
        prop_assert!(!result.leaders.is_empty());
    }

    #[test]
    fn prop_hierarchy_levels_are_consistent((n, links) in random_graph(), leaders in 0usize..5) {
        let (nodes, edges) = records(n, &links);
        let result = analyze_hierarchy(&nodes, &edges, leaders);

        prop_assert_eq!(result.nodes.len(), n);
        prop_assert!(result.nodes.windows(2).all(|w| w[0].level <= w[1].level));
        for node in &result.nodes {
            prop_assert_eq!(node.role, Role::for_level(node.level));
            if let Some(parent) = &node.parent_id {
                prop_assert_eq!(result.node(parent).map(|p| p.level), Some(node.level - 1));
            }
            if node.level > 0 {
                prop_assert!(node.parent_id.is_some());
            }
        }
        for chain in &result.chains {
            prop_assert!(chain.len() > 1);
            prop_assert!(result.leaders.contains(&chain[0]));
        }
    }

    #[test]
    fn prop_layout_is_deterministic((n, links) in random_graph()) {
        let (nodes, edges) = records(n, &links);
        let result = analyze_hierarchy(&nodes, &edges, 2);
        let options = LayoutOptions::default();

        let first = calculate_hierarchy_layout(&result, &options);
        let second = calculate_hierarchy_layout(&result, &options);
        prop_assert_eq!(first.len(), n);
        prop_assert_eq!(first, second);
    }
}
