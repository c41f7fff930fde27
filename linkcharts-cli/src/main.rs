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

//! Linkcharts CLI
//!
//! Runs graph analyses over an exported chart snapshot.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linkcharts_core::{
    layout_bounds, AnalysisConfig, CentralityResult, GraphAnalyzer, GraphSnapshot, HierarchyResult,
    Position,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "linkcharts")]
#[command(about = "Linkcharts - graph analytics for investigative link charts", long_about = None)]
struct Cli {
    /// Graph snapshot JSON file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    snapshot: String,

    /// Analysis configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Rows printed by ranking commands
    #[arg(long, default_value = "20")]
    top: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shortest path between two nodes
    Path {
        /// Source node ID
        source: String,

        /// Target node ID
        target: String,
    },

    /// Rank nodes by degree centrality
    Degree,

    /// Rank nodes by betweenness centrality
    Betweenness,

    /// Detect communities (Louvain)
    Communities {
        /// Resolution override (higher = smaller communities)
        #[arg(long)]
        resolution: Option<f64>,
    },

    /// Infer leaders, levels and chains of command
    Hierarchy {
        /// Number of leaders requested
        #[arg(long)]
        leaders: Option<usize>,

        /// Include canvas positions
        #[arg(long)]
        layout: bool,
    },

    /// Graph statistics
    Stats,
}

#[derive(Serialize)]
struct PathOutput<'a> {
    source: &'a str,
    target: &'a str,
    path: Option<Vec<String>>,
}

#[derive(Serialize)]
struct HierarchyOutput<'a> {
    #[serde(flatten)]
    hierarchy: &'a HierarchyResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    positions: Option<BTreeMap<String, Position>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for results
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let snapshot = load_snapshot(&cli.snapshot)?;
    info!(
        nodes = snapshot.nodes.len(),
        edges = snapshot.edges.len(),
        "Loaded snapshot"
    );

    let output = execute(&cli, config, &snapshot)?;
    print!("{}", output);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn load_snapshot(source: &str) -> Result<GraphSnapshot> {
    if source == "-" {
        debug!("Reading snapshot from stdin");
        GraphSnapshot::from_reader(std::io::stdin().lock()).context("Failed to read snapshot from stdin")
    } else {
        GraphSnapshot::load(source).with_context(|| format!("Failed to load snapshot from {}", source))
    }
}

/// Run the selected command and render its output
fn execute(cli: &Cli, mut config: AnalysisConfig, snapshot: &GraphSnapshot) -> Result<String> {
    match &cli.command {
        Commands::Communities {
            resolution: Some(resolution),
        } => config.communities.resolution = *resolution,
        Commands::Hierarchy {
            leaders: Some(leaders),
            ..
        } => config.hierarchy.default_leader_count = *leaders,
        _ => {}
    }
    config.validate().context("Invalid configuration")?;

    let analyzer = GraphAnalyzer::with_config(config);
    let (nodes, edges) = (&snapshot.nodes, &snapshot.edges);
    let mut out = String::new();

    match &cli.command {
        Commands::Path { source, target } => {
            let path = analyzer.find_shortest_path(nodes, edges, source, target);
            if cli.json {
                let output = PathOutput { source, target, path };
                writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
            } else {
                match path {
                    Some(path) => {
                        writeln!(out, "✓ Path ({} hops):", path.len() - 1)?;
                        writeln!(out, "  {}", path.join(" -> "))?;
                    }
                    None => writeln!(out, "✗ No path between {} and {}", source, target)?,
                }
            }
        }

        Commands::Degree => {
            let ranking = analyzer.calculate_degree_centrality(nodes, edges);
            render_ranking(&mut out, "Degree Centrality", &ranking, cli.top, cli.json)?;
        }

        Commands::Betweenness => {
            let ranking = analyzer.calculate_betweenness_centrality(nodes, edges);
            render_ranking(&mut out, "Betweenness Centrality", &ranking, cli.top, cli.json)?;
        }

        Commands::Communities { .. } => {
            let detection = analyzer.detect_communities_detailed(nodes, edges);
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&detection)?)?;
            } else {
                writeln!(
                    out,
                    "Communities: {} (modularity {:.4})",
                    detection.communities.len(),
                    detection.modularity
                )?;
                writeln!(out, "{:-<60}", "")?;
                // Numeric order, not string order
                let mut groups: Vec<(&String, &Vec<String>)> = detection.communities.iter().collect();
                groups.sort_by_key(|(id, _)| id.parse::<usize>().unwrap_or(usize::MAX));
                for (id, members) in groups {
                    writeln!(out, "  [{}] {} members: {}", id, members.len(), members.join(", "))?;
                }
            }
        }

        Commands::Hierarchy { layout, .. } => {
            let result = analyzer.analyze_hierarchy_default(nodes, edges);
            let positions = layout.then(|| analyzer.calculate_hierarchy_layout(&result));

            if cli.json {
                let output = HierarchyOutput {
                    hierarchy: &result,
                    positions,
                };
                writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
            } else {
                render_hierarchy(&mut out, &result)?;
                if let Some(positions) = positions {
                    writeln!(out)?;
                    writeln!(out, "Layout:")?;
                    for (id, p) in &positions {
                        writeln!(out, "  {:<20} x={:>8.1} y={:>8.1}", id, p.x, p.y)?;
                    }
                    if let Some(bounds) = layout_bounds(&positions, &analyzer.config().layout) {
                        writeln!(
                            out,
                            "  Bounds: {:.1} x {:.1}",
                            bounds.width(),
                            bounds.height()
                        )?;
                    }
                }
            }
        }

        Commands::Stats => {
            let graph = analyzer.build_graph(nodes, edges);
            let stats = graph.stats();
            let diagnostics = graph.diagnostics();

            if cli.json {
                let output = serde_json::json!({
                    "stats": stats,
                    "diagnostics": diagnostics,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
            } else {
                writeln!(out, "Graph Statistics")?;
                writeln!(out, "================")?;
                writeln!(out, "  Nodes:       {}", stats.node_count)?;
                writeln!(out, "  Edges:       {}", stats.edge_count)?;
                writeln!(out, "  Avg degree:  {:.2}", stats.avg_degree)?;
                writeln!(out, "  Density:     {:.4}", stats.density)?;
                writeln!(out, "  Isolated:    {}", stats.isolated_count)?;
                writeln!(out, "  Components:  {}", stats.component_count)?;

                let mut types: Vec<_> = stats.node_type_distribution.iter().collect();
                types.sort();
                writeln!(out)?;
                writeln!(out, "Node types:")?;
                for (node_type, count) in types {
                    writeln!(out, "  {:<20} {}", node_type, count)?;
                }

                let mut types: Vec<_> = stats.edge_type_distribution.iter().collect();
                types.sort();
                writeln!(out)?;
                writeln!(out, "Edge types:")?;
                for (edge_type, count) in types {
                    writeln!(out, "  {:<20} {}", edge_type, count)?;
                }

                if !diagnostics.is_clean() {
                    writeln!(out)?;
                    writeln!(
                        out,
                        "Dropped: {} duplicate nodes, {} dangling edges, {} duplicate edges",
                        diagnostics.duplicate_nodes,
                        diagnostics.dangling_edges,
                        diagnostics.duplicate_edges
                    )?;
                }
            }
        }
    }

    Ok(out)
}

fn render_ranking(
    out: &mut String,
    title: &str,
    ranking: &[CentralityResult],
    top: usize,
    json: bool,
) -> Result<()> {
    let shown = &ranking[..top.min(ranking.len())];
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(shown)?)?;
        return Ok(());
    }

    writeln!(out, "{} (top {} of {}):", title, shown.len(), ranking.len())?;
    writeln!(out, "{:-<40}", "")?;
    for (rank, result) in shown.iter().enumerate() {
        writeln!(out, "{:>4}. {:<24} {:.4}", rank + 1, result.node_id, result.score)?;
    }
    Ok(())
}

fn render_hierarchy(out: &mut String, result: &HierarchyResult) -> Result<()> {
    writeln!(out, "Leaders: {}", result.leaders.join(", "))?;
    writeln!(out, "{:-<60}", "")?;
    for (level, ids) in &result.levels {
        let name = if *level < 0 {
            "unreachable".to_string()
        } else {
            format!("level {}", level)
        };
        writeln!(out, "  {:<12} {}", name, ids.join(", "))?;
    }

    writeln!(out)?;
    writeln!(out, "Nodes:")?;
    for node in &result.nodes {
        writeln!(
            out,
            "  {:<20} {:<11} score={:.3} parent={}",
            node.node_id,
            node.role.as_str(),
            node.leadership_score,
            node.parent_id.as_deref().unwrap_or("-")
        )?;
    }

    if !result.chains.is_empty() {
        writeln!(out)?;
        writeln!(out, "Chains of command:")?;
        for chain in &result.chains {
            writeln!(out, "  {}", chain.join(" -> "))?;
        }
    }
    Ok(())
}
