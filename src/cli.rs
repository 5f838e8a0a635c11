// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the git repository to read
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// Stop after this many commits; older history is treated as not loaded
    #[arg(long)]
    pub max_commits: Option<usize>,

    /// Only show commits reachable from these refs (branch, tag or HEAD names)
    #[arg(short, long)]
    pub branch: Vec<String>,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the first rows of the log with their lanes
    Summary {
        #[arg(long, default_value_t = 30)]
        rows: usize,
    },
    /// Draw the commit graph to a PNG file
    Render {
        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Width of a lane column in pixels
        #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..))]
        lane_width: u32,

        /// Height of a commit row in pixels
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
        row_height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_sizes_must_be_positive() {
        assert!(Args::try_parse_from(["git-lanes", "render", "-o", "out.png", "--lane-width", "0"]).is_err());
        assert!(Args::try_parse_from(["git-lanes", "render", "-o", "out.png", "--row-height", "0"]).is_err());

        let args = Args::try_parse_from(["git-lanes", "render", "-o", "out.png", "--lane-width", "4"]).unwrap();
        match args.command {
            Command::Render { lane_width, row_height, .. } => assert_eq!((lane_width, row_height), (4, 20)),
            Command::Summary { .. } => panic!("parsed the wrong subcommand"),
        }
    }
}
