use anyhow::Context;
use clap::Parser;
use hyperbola::board::Position;
use hyperbola::config::EngineConfig;
use hyperbola::search::eval::PieceSquareEvaluator;
use hyperbola::search::ordering::MAX_PLY;
use hyperbola::search::smp::SearchCoordinator;
use hyperbola::search::tt::TranspositionTable;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Middlegame and endgame positions searched when no FEN is given.
const BENCH_FENS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    "6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1",
];

#[derive(Parser, Debug)]
#[command(name = "hyperbola-bench", version, about = "Benchmark Hyperbola search NPS")]
struct Args {
    /// FEN string or 'startpos'; omit to run the built-in suite
    #[arg(long)]
    fen: Option<String>,

    /// Threads (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Movetime in milliseconds (ignored if depth is set)
    #[arg(long, default_value_t = 1000)]
    movetime: u64,

    /// Fixed search depth (overrides movetime when > 0)
    #[arg(long, default_value_t = 0)]
    depth: u32,

    /// Transposition table size in MB
    #[arg(long)]
    hash_mb: Option<usize>,

    /// JSON engine config
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut config = EngineConfig::load_or_default(args.config.as_deref())?;
    if let Some(t) = args.threads { config.threads = t; }
    if let Some(mb) = args.hash_mb { config.hash_mb = mb; }

    let fens: Vec<String> = match args.fen.as_deref() {
        Some("startpos") => vec![BENCH_FENS[0].to_string()],
        Some(f) => vec![f.to_string()],
        None => BENCH_FENS.iter().map(|s| s.to_string()).collect(),
    };

    let mut p = config.search_params();
    if args.depth > 0 {
        p.depth = args.depth;
        p.movetime = None;
    } else {
        p.depth = (MAX_PLY - 1) as u32;
        p.movetime = Some(Duration::from_millis(args.movetime));
    }

    let coordinator = SearchCoordinator::new(Arc::new(TranspositionTable::new(config.hash_mb)), Arc::new(PieceSquareEvaluator));
    let mut total_nodes = 0u64;
    let t_all = Instant::now();
    for fen in &fens {
        let pos = Position::from_fen(fen).with_context(|| format!("invalid FEN '{fen}'"))?;
        coordinator.tt().clear();
        let t0 = Instant::now();
        let res = coordinator.search(&pos, &p);
        let dt = t0.elapsed().as_secs_f64();
        let nps = if dt > 0.0 { res.nodes as f64 / dt } else { 0.0 };
        total_nodes += res.nodes;
        println!(
            "bestmove={} depth={} score_cp={} nodes={} elapsed={:.3}s nps={:.1}",
            res.best_move.map_or_else(|| "(none)".to_string(), |m| m.to_string()),
            res.depth,
            res.score_cp,
            res.nodes,
            dt,
            nps
        );
    }
    let dt = t_all.elapsed().as_secs_f64();
    if fens.len() > 1 {
        let nps = if dt > 0.0 { total_nodes as f64 / dt } else { 0.0 };
        println!("total nodes={total_nodes} elapsed={dt:.3}s nps={nps:.1}");
    }
    Ok(())
}
