//! huginn: dataset retrieval from the command line.
//!
//! Fetches actor/movie pairs from Wikidata and reconstructs stored
//! assignments, printing a short summary of each.

use std::cmp::Ordering;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use huginn::{DataSource, MovieActor, ServerMode, SourceConfig};

/// Huginn dataset client
#[derive(Parser)]
#[command(name = "huginn")]
#[command(version = huginn::PKG_VERSION)]
#[command(about = "Fetch and cache remote teaching datasets")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data server family (overrides the config file).
    #[arg(long, env = "HUGINN_MODE")]
    mode: Option<ServerMode>,

    /// Verbose protocol logging.
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List actor/movie pairs for films released in a year range
    Actors {
        /// First release year (inclusive)
        begin: i32,
        /// Last release year (inclusive)
        end: i32,
        /// Field to sort by
        #[arg(long, value_enum, default_value_t = SortKey::Actor)]
        sort: SortKey,
        /// Sort in descending order
        #[arg(long)]
        desc: bool,
        /// Sorting algorithm
        #[arg(long, value_enum, default_value_t = Algorithm::Merge)]
        algorithm: Algorithm,
    },

    /// Reconstruct a color grid assignment
    Grid {
        /// Owner of the assignment
        user: String,
        /// Assignment number
        assignment: u32,
        /// Subassignment number
        #[arg(long, default_value_t = 0)]
        sub: u32,
    },

    /// Reconstruct a graph assignment
    Graph {
        /// Owner of the assignment
        user: String,
        /// Assignment number
        assignment: u32,
        /// Subassignment number
        #[arg(long, default_value_t = 0)]
        sub: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKey {
    Actor,
    Movie,
}

#[derive(Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Unstable in-place sort
    Quick,
    /// Stable sort
    Merge,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Default: warn, info with --debug; RUST_LOG overrides both.
    let default_filter = if args.debug { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = SourceConfig::load(args.config.as_deref())?;
    if let Some(mode) = args.mode {
        config.server_mode = mode;
    }
    config.debug |= args.debug;

    info!(version = huginn::version_string(), mode = %config.server_mode, "huginn starting");

    let source = DataSource::builder().config(config).build()?;

    match args.command {
        Command::Actors {
            begin,
            end,
            sort,
            desc,
            algorithm,
        } => {
            let mut pairs = source.wikidata_actor_movie(begin, end).await?;
            sort_pairs(&mut pairs, sort, desc, algorithm);
            for pair in &pairs {
                println!("{} : {}", pair.actor_name, pair.movie_name);
            }
            eprintln!("{} pairs", pairs.len());
        }
        Command::Grid {
            user,
            assignment,
            sub,
        } => {
            let grid = source
                .color_grid_from_assignment(&user, assignment, sub)
                .await?;
            println!("{} x {}", grid.dimx(), grid.dimy());
            if let Some(c) = grid.get(0, 0) {
                println!("(0, 0): r={} g={} b={} a={}", c.r, c.g, c.b, c.a);
            }
        }
        Command::Graph {
            user,
            assignment,
            sub,
        } => {
            let graph = source.graph_from_assignment(&user, assignment, sub).await?;
            println!(
                "{} vertices, {} edges",
                graph.vertices().len(),
                graph.edges().len()
            );
        }
    }

    Ok(())
}

fn sort_pairs(pairs: &mut [MovieActor], key: SortKey, desc: bool, algorithm: Algorithm) {
    let compare = |a: &MovieActor, b: &MovieActor| -> Ordering {
        let ord = match key {
            SortKey::Actor => a.actor_name.cmp(&b.actor_name),
            SortKey::Movie => a.movie_name.cmp(&b.movie_name),
        };
        if desc { ord.reverse() } else { ord }
    };
    match algorithm {
        Algorithm::Quick => pairs.sort_unstable_by(compare),
        Algorithm::Merge => pairs.sort_by(compare),
    }
}
