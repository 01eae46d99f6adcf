use anyhow::Context;
use clap::Parser;
use hyperbola::board::movegen::{generate_all, is_legal, MoveList};
use hyperbola::board::Position;
use hyperbola::perft::{perft, perft_divide};
use rayon::prelude::*;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "perft", about = "Perft driver for Hyperbola")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// FEN string or "startpos"
    #[arg(value_name = "FEN", default_value = "startpos")]
    fen: String,
    /// Number of threads for root-split
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Print per-move counts
    #[arg(long, default_value_t = false)]
    divide: bool,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let base = if args.fen == "startpos" {
        Position::startpos()
    } else {
        Position::from_fen(&args.fen).with_context(|| format!("invalid FEN '{}'", args.fen))?
    };

    if args.divide {
        let mut pos = base.clone();
        let mut total = 0;
        for (mv, n) in perft_divide(&mut pos, args.depth) {
            println!("{mv}: {n}");
            total += n;
        }
        println!("\nnodes: {total}");
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads.max(1)).build()?;
    let t0 = Instant::now();
    let nodes = pool.install(|| {
        if args.threads <= 1 || args.depth <= 1 {
            let mut pos = base.clone();
            return perft(&mut pos, args.depth);
        }
        let mut root = MoveList::new();
        generate_all(&base, &mut root);
        root.as_slice()
            .par_iter()
            .map(|&mv| {
                let mut pos = base.clone();
                if !is_legal(&mut pos, mv) { return 0; }
                pos.apply(mv);
                perft(&mut pos, args.depth - 1)
            })
            .sum()
    });
    let dt = t0.elapsed().as_secs_f64();

    if args.nps {
        let nps = if dt > 0.0 { nodes as f64 / dt } else { f64::INFINITY };
        println!("nodes: {nodes} elapsed: {dt:.3}s nps: {nps:.1}");
    } else {
        println!("nodes: {nodes}");
    }
    Ok(())
}
