// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use stepgraph_engine::layout::{Layout, LayoutConfig, LayoutSimulator, Position, Rect};
use stepgraph_engine::{Graph, NodeId, Step, StepKind, analyze};

#[derive(Parser, Debug)]
#[command(name = "stepgraph")]
#[command(about = "Trace SCC, condensation and topological sort on a directed graph")]
struct Cli {
    /// Log engine events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the analysis pipeline and print its step trace
    Trace {
        #[command(flatten)]
        graph: GraphArgs,

        /// Print the trace and results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the force-directed layout and print final positions
    Layout {
        #[command(flatten)]
        graph: GraphArgs,

        /// Maximum number of ticks to run
        #[arg(long, default_value_t = 1000)]
        ticks: usize,

        /// JSON file with layout parameter overrides
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value_t = 800.0)]
        width: f64,

        #[arg(long, default_value_t = 600.0)]
        height: f64,

        /// Sleep `tick_interval_ms` between ticks, like a live view would
        #[arg(long)]
        paced: bool,

        /// Print positions as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct GraphArgs {
    /// Number of nodes, labeled 1..=N
    #[arg(long)]
    nodes: usize,

    /// Directed edge as `u:v`; may be repeated
    #[arg(long = "edge", value_parser = parse_edge)]
    edges: Vec<(NodeId, NodeId)>,
}

impl GraphArgs {
    fn build(&self) -> Result<Graph> {
        Graph::from_edges(self.nodes, &self.edges).context("invalid graph")
    }
}

fn parse_edge(s: &str) -> std::result::Result<(NodeId, NodeId), String> {
    let (u, v) = s
        .split_once(':')
        .ok_or_else(|| format!("expected `u:v`, got `{s}`"))?;
    let u = u.trim().parse().map_err(|e| format!("bad source `{u}`: {e}"))?;
    let v = v.trim().parse().map_err(|e| format!("bad target `{v}`: {e}"))?;
    Ok((u, v))
}

#[derive(Serialize)]
struct TraceReport<'a> {
    scc_count: usize,
    scc_ids: &'a [usize],
    condensed_edges: &'a [(NodeId, NodeId)],
    topo_ok: bool,
    topo_order: &'a [NodeId],
    steps: &'a [Step],
}

#[derive(Serialize)]
struct LayoutReport {
    ticks: usize,
    settled: bool,
    alpha: f64,
    positions: Layout,
}

fn init_logging(verbose: u8) {
    let directives = match verbose {
        0 => "warn",
        1 => "warn,stepgraph_engine=debug,stepgraph=debug",
        _ => "info,stepgraph_engine=trace,stepgraph=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_trace(graph: &GraphArgs, json: bool) -> Result<()> {
    let g = graph.build()?;
    let analysis = analyze(&g);
    let steps = analysis.combined_trace();
    debug!(steps = steps.len(), "trace built");

    if json {
        let report = TraceReport {
            scc_count: analysis.scc.scc_count,
            scc_ids: &analysis.scc.scc_ids,
            condensed_edges: analysis.condensed.dag.edges(),
            topo_ok: analysis.topo.ok,
            topo_order: &analysis.topo.order,
            steps: &steps,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (i, step) in steps.iter().enumerate() {
        match step.kind {
            StepKind::ResetVisualization { .. } => println!("---- {}", step.note),
            _ => println!("{i:>5}  {}", step.note),
        }
    }

    println!();
    println!("{} strongly connected component(s):", analysis.scc.scc_count);
    for (i, members) in analysis.scc.components().iter().enumerate() {
        println!("  SCC{}: {:?}", i + 1, members);
    }
    if analysis.topo.ok {
        println!("component order: {:?}", analysis.component_order());
    } else {
        println!("topological sort failed after {:?}", analysis.topo.order);
    }
    Ok(())
}

/// Tick until settled or `ticks` pulses have run, sleeping `pace` between
/// pulses when given. Returns the number of ticks that moved the layout.
fn drive(sim: &mut LayoutSimulator, g: &Graph, ticks: usize, pace: Option<Duration>) -> usize {
    let dt = sim.config().time_step;
    let mut ran = 0;
    while ran < ticks && sim.tick(g, dt) {
        ran += 1;
        if let Some(interval) = pace {
            std::thread::sleep(interval);
        }
    }
    ran
}

fn run_layout(
    graph: &GraphArgs,
    ticks: usize,
    config: Option<&PathBuf>,
    viewport: Rect,
    paced: bool,
    json: bool,
) -> Result<()> {
    let g = graph.build()?;
    let config = match config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<LayoutConfig>(&contents)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => LayoutConfig::default(),
    };

    let pace = paced.then(|| config.tick_interval());
    let mut sim = LayoutSimulator::new(&g, &Layout::new(), viewport, config)?;
    let ran = drive(&mut sim, &g, ticks, pace);
    info!(ticks = ran, settled = !sim.is_running(), "layout finished");

    let report = LayoutReport {
        ticks: ran,
        settled: !sim.is_running(),
        alpha: sim.alpha(),
        positions: sim.positions(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let status = if report.settled { "settled" } else { "still moving" };
    println!("{} ticks, {status}, alpha {:.4}", report.ticks, report.alpha);
    for (id, Position { x, y }) in &report.positions {
        println!("{id:>5}  {x:>9.2} {y:>9.2}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Trace { graph, json } => run_trace(graph, *json),
        Command::Layout {
            graph,
            ticks,
            config,
            width,
            height,
            paced,
            json,
        } => {
            let viewport = Rect::centered(Position::ZERO, *width, *height);
            run_layout(graph, *ticks, config.as_ref(), viewport, *paced, *json)
        }
    }
}
