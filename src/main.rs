use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pijersi_engine::board::index_to_coords;
use pijersi_engine::search::weights::EvalWeights;
use pijersi_engine::search::{Evaluator, Searcher, MAX_DEPTH};
use pijersi_engine::{load_position, search_mcts, MctsParams, Move, Position, SearchParams};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Depth,
    Time,
    Mcts,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Pick a move for a Pijersi position", long_about = None)]
struct Args {
    /// Search strategy
    #[arg(long, value_enum, default_value_t = Mode::Depth)]
    mode: Mode,

    /// JSON position record; the start position when omitted
    #[arg(long)]
    position: Option<PathBuf>,

    /// Fixed search depth (depth mode)
    #[arg(long, default_value_t = 4)]
    depth: u32,

    /// Time budget in milliseconds (time and mcts modes)
    #[arg(long, default_value_t = 1000)]
    movetime_ms: u64,

    /// Worker threads, defaults to the hardware concurrency
    #[arg(long)]
    threads: Option<usize>,

    /// Break ties between equal root moves at random
    #[arg(long)]
    randomize: bool,

    /// Seed for the tie-breaker and MCTS rollouts
    #[arg(long)]
    seed: Option<u64>,

    /// Random playouts per MCTS rollout
    #[arg(long, default_value_t = 1)]
    simulations: u32,

    /// Transposition cache entries
    #[arg(long, default_value_t = 1 << 20)]
    tt_entries: usize,

    /// JSON evaluation weights
    #[arg(long)]
    weights: Option<PathBuf>,
}

fn describe(mv: Move) -> String {
    let square = |index: usize| {
        let (row, column) = index_to_coords(index);
        format!("{index}(r{row}c{column})")
    };
    match mv.mid() {
        Some(mid) => format!("{} -> {} -> {}", square(mv.start()), square(mid), square(mv.end())),
        None => format!("{} -> {}", square(mv.start()), square(mv.end())),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let position = match &args.position {
        Some(path) => load_position(path).with_context(|| format!("loading position {}", path.display()))?,
        None => Position::start(),
    };
    let threads = args.threads.unwrap_or_else(|| SearchParams::default().threads).max(1);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().context("building thread pool")?;

    let chosen = match args.mode {
        Mode::Mcts => {
            let params = MctsParams {
                movetime: Duration::from_millis(args.movetime_ms),
                simulations: args.simulations,
                threads,
                seed: args.seed,
                ..MctsParams::default()
            };
            let result = pool.install(|| search_mcts(&position, params));
            println!("rollouts: {} nodes: {} time: {}ms", result.rollouts, result.nodes, result.elapsed.as_millis());
            result.bestmove
        }
        Mode::Depth | Mode::Time => {
            let evaluator = match &args.weights {
                Some(path) => {
                    let weights = EvalWeights::load(path).with_context(|| format!("loading weights {}", path.display()))?;
                    Arc::new(Evaluator::new(weights)?)
                }
                None => Evaluator::shared(),
            };
            let mut params = SearchParams {
                depth: args.depth,
                threads,
                randomize: args.randomize,
                seed: args.seed,
                tt_capacity: args.tt_entries,
                ..SearchParams::default()
            };
            if args.mode == Mode::Time {
                params.depth = MAX_DEPTH;
                params.movetime = Some(Duration::from_millis(args.movetime_ms));
            }
            let mut searcher = Searcher::from_params(&params).with_evaluator(evaluator);
            let result = pool.install(|| searcher.search_with_params(&position, params));
            println!(
                "score: {} depth: {} nodes: {} time: {}ms",
                result.score,
                result.depth,
                result.nodes,
                result.elapsed.as_millis()
            );
            result.bestmove
        }
    };

    match chosen {
        Some(mv) => {
            let [start, mid, end] = mv.to_triple();
            println!("bestmove {start} {mid} {end}");
            println!("{}", describe(mv));
        }
        None => println!("bestmove none"),
    }
    Ok(())
}
