use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use pijersi_engine::perft::{perft, perft_parallel, perft_split};
use pijersi_engine::{load_position, Position};

#[derive(Parser, Debug)]
#[command(name = "perft", about = "Move generation node counts")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// JSON position record; the start position when omitted
    #[arg(long)]
    position: Option<PathBuf>,
    /// Number of threads for root-split
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Print the count below each root move
    #[arg(long, default_value_t = false)]
    split: bool,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let base = match &args.position {
        Some(path) => load_position(path).with_context(|| format!("loading {}", path.display()))?,
        None => Position::start(),
    };

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads.max(1)).build().context("building thread pool")?;
    let t0 = Instant::now();
    let nodes = pool.install(|| {
        if args.split {
            let split = perft_split(&base, args.depth);
            for (mv, n) in &split {
                println!("{mv}: {n}");
            }
            split.iter().map(|&(_, n)| n).sum::<u64>()
        } else if args.threads <= 1 {
            perft(&base, args.depth)
        } else {
            perft_parallel(&base, args.depth)
        }
    });
    let dt = t0.elapsed().as_secs_f64();

    if args.nps {
        println!("nodes: {nodes} elapsed: {dt:.3}s nps: {:.1}", nodes as f64 / dt.max(f64::EPSILON));
    } else {
        println!("nodes: {nodes}");
    }
    Ok(())
}
