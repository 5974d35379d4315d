use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use pijersi_engine::selfplay::{generate_games_with_progress, write_games, MoveSource, SelfPlayParams};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Source {
    Random,
    Alphabeta,
    Mcts,
}

#[derive(Parser, Debug)]
#[command(name = "pijersi-selfplay", about = "Generate self-play games as JSON lines")]
struct Args {
    #[arg(long, default_value_t = 100)]
    games: usize,
    #[arg(long, default_value_t = 200)]
    max_plies: usize,
    /// Search threads per game
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Parallel games, defaults to the hardware concurrency
    #[arg(long)]
    jobs: Option<usize>,
    #[arg(long, value_enum, default_value_t = Source::Alphabeta)]
    source: Source,
    #[arg(long, default_value_t = 2)]
    depth: u32,
    #[arg(long)]
    movetime_ms: Option<u64>,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 4)]
    random_plies: usize,
    #[arg(long, default_value_t = 1)]
    simulations: u32,
    #[arg(long, default_value = "out/selfplay.jsonl")]
    out: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let a = Args::parse();
    let params = SelfPlayParams {
        games: a.games,
        max_plies: a.max_plies,
        threads: a.threads,
        source: match a.source {
            Source::Random => MoveSource::Random,
            Source::Alphabeta => MoveSource::AlphaBeta,
            Source::Mcts => MoveSource::Mcts,
        },
        depth: a.depth,
        movetime_ms: a.movetime_ms,
        seed: a.seed,
        random_plies: a.random_plies,
        mcts_simulations: a.simulations,
    };

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = a.jobs {
        pool = pool.num_threads(jobs.max(1));
    }
    let pool = pool.build().context("building thread pool")?;

    let bar = ProgressBar::new(a.games as u64);
    bar.set_style(
        ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} games {msg}")
            .context("progress template")?
            .progress_chars("=> "),
    );
    eprintln!("Generating {} games (source={:?}, depth={}, seed={})", a.games, a.source, a.depth, a.seed);
    let games = pool.install(|| generate_games_with_progress(&params, |_| bar.inc(1)));
    bar.finish_with_message("done");

    let white = games.iter().filter(|g| g.result > 0).count();
    let black = games.iter().filter(|g| g.result < 0).count();
    eprintln!("White {white} / Black {black} / Draw {}", games.len() - white - black);

    write_games(&games, &a.out).with_context(|| format!("writing {}", a.out.display()))?;
    eprintln!("Wrote {}", a.out.display());
    Ok(())
}
