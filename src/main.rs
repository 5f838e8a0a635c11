// src/main.rs

mod cli;

use anyhow::{bail, Context};
use chrono::TimeZone;
use clap::Parser;
use cli::{Args, Command};
use git_lanes::analyzer::{self, LoadedLog};
use git_lanes::renderer::{self, RenderOptions};
use git_lanes::{GraphEngine, PermanentGraphInfo, VisibleGraph};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let start_time = Instant::now();
    let loaded = analyzer::load_repository(&args.repo, args.max_commits)
        .with_context(|| format!("failed to read repository at {}", args.repo.display()))?;
    let engine = GraphEngine::new(loaded.commits(), loaded.refs.clone())?;
    let info = engine.snapshot();
    let view = visible_view(&info, &args.branch)?;
    tracing::info!(rows = view.row_count(), elapsed = ?start_time.elapsed(), "graph ready");

    match &args.command {
        Command::Summary { rows } => print_summary(&info, &view, &loaded, *rows)?,
        Command::Render { output, lane_width, row_height } => {
            let options = RenderOptions { lane_width: *lane_width, row_height: *row_height };
            let image = renderer::render(&info, &view, &options)?;
            image
                .save(output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            tracing::info!(path = %output.display(), width = image.width(), height = image.height(), "saved graph image");
        }
    }

    Ok(())
}

fn visible_view(info: &PermanentGraphInfo, names: &[String]) -> anyhow::Result<VisibleGraph> {
    if names.is_empty() {
        return Ok(info.visible_graph(info.permanent_graph_layout().heads())?);
    }
    let mut heads = Vec::new();
    for name in names {
        let Some(r) = info.refs().iter().find(|r| &r.name == name) else {
            bail!("unknown ref {}", name);
        };
        match info.node_of(&r.hash.into()) {
            Some(node) => heads.push(node),
            None => bail!("ref {} points outside the loaded history", name),
        }
    }
    Ok(info.visible_graph(&heads)?)
}

fn print_summary(info: &PermanentGraphInfo, view: &VisibleGraph, loaded: &LoadedLog, rows: usize) -> anyhow::Result<()> {
    let layout = info.permanent_graph_layout();
    println!("{} commits, {} lanes, {} branch heads", view.row_count(), layout.lane_count(), info.branch_node_ids().len());

    for row in 0..view.row_count().min(rows) {
        let node = view.node_at_row(row)?;
        let record = loaded.record(node).context("row outside the loaded log")?;
        let date = chrono::Utc
            .timestamp_opt(info.permanent_commits_info().timestamp(node)?, 0)
            .single()
            .map_or_else(|| "?".to_string(), |d| d.format("%Y-%m-%d %H:%M").to_string());
        let refs: Vec<&str> = info.refs_at(node)?.into_iter().map(|r| r.name.as_str()).collect();
        let refs = if refs.is_empty() { String::new() } else { format!(" ({})", refs.join(", ")) };
        println!(
            "{:>5}  lane {:>3}  {}  {}  {:<20} {}{}",
            row,
            layout.lane(node)?,
            record.commit.hash.short(),
            date,
            record.author,
            record.subject(),
            refs
        );
    }
    Ok(())
}
