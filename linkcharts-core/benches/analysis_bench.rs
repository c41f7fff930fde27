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

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use linkcharts_core::{EdgeRecord, GraphAnalyzer, LayoutOptions, NodeRecord};

const SIZES: [usize; 3] = [50, 200, 500];

/// Clusters of ten nodes on a ring, each cluster linked to the next plus
/// a few long-range chords
fn synthetic_chart(n: usize) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
    let nodes: Vec<NodeRecord> = (0..n)
        .map(|i| NodeRecord::new(format!("n{}", i), format!("Entity {}", i), "PERSON"))
        .collect();

    let mut links = Vec::new();
    for i in 0..n {
        let cluster = i / 10 * 10;
        let next_in_cluster = cluster + (i - cluster + 1) % 10;
        if next_in_cluster < n {
            links.push((i, next_in_cluster));
        }
        if i % 10 == 0 {
            links.push((i, (i + 10) % n));
        }
        if i % 7 == 0 {
            links.push((i, (i * 13 + 5) % n));
        }
    }

    let edges = links
        .into_iter()
        .enumerate()
        .map(|(id, (a, b))| EdgeRecord::new(format!("e{}", id), format!("n{}", a), format!("n{}", b), "CONTACT"))
        .collect();

    (nodes, edges)
}

fn bench_shortest_path(c: &mut Criterion) {
    let analyzer = GraphAnalyzer::new();
    let mut group = c.benchmark_group("shortest_path");

    for size in SIZES.iter() {
        let (nodes, edges) = synthetic_chart(*size);
        let target = format!("n{}", size / 2 + 3);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| analyzer.find_shortest_path(black_box(&nodes), black_box(&edges), "n0", &target));
        });
    }

    group.finish();
}

fn bench_centrality(c: &mut Criterion) {
    let analyzer = GraphAnalyzer::new();
    let mut group = c.benchmark_group("centrality");

    for size in SIZES.iter() {
        let (nodes, edges) = synthetic_chart(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("degree", size), size, |b, _| {
            b.iter(|| analyzer.calculate_degree_centrality(black_box(&nodes), black_box(&edges)));
        });
        group.bench_with_input(BenchmarkId::new("betweenness", size), size, |b, _| {
            b.iter(|| analyzer.calculate_betweenness_centrality(black_box(&nodes), black_box(&edges)));
        });
    }

    group.finish();
}

fn bench_communities(c: &mut Criterion) {
    let analyzer = GraphAnalyzer::new();
    let mut group = c.benchmark_group("louvain");

    for size in SIZES.iter() {
        let (nodes, edges) = synthetic_chart(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| analyzer.detect_communities(black_box(&nodes), black_box(&edges)));
        });
    }

    group.finish();
}

fn bench_hierarchy(c: &mut Criterion) {
    let analyzer = GraphAnalyzer::new();
    let options = LayoutOptions::default();
    let mut group = c.benchmark_group("hierarchy");

    for size in SIZES.iter() {
        let (nodes, edges) = synthetic_chart(*size);
        group.bench_with_input(BenchmarkId::new("analyze", size), size, |b, _| {
            b.iter(|| analyzer.analyze_hierarchy(black_box(&nodes), black_box(&edges), 5));
        });

        let result = analyzer.analyze_hierarchy(&nodes, &edges, 5);
        group.bench_with_input(BenchmarkId::new("layout", size), size, |b, _| {
            b.iter(|| linkcharts_core::calculate_hierarchy_layout(black_box(&result), &options));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_shortest_path,
    bench_centrality,
    bench_communities,
    bench_hierarchy
);
criterion_main!(benches);
