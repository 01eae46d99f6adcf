use anyhow::Context;
use clap::Parser;
use hyperbola::selfplay::{generate_games, write_jsonl, SelfPlayParams};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hyperbola-selfplay", about = "Play engine-vs-engine games and write them as JSON lines")]
struct Args {
    #[arg(long, default_value_t = 10)]
    games: usize,
    #[arg(long, default_value_t = 200)]
    max_plies: usize,
    #[arg(long, default_value_t = 1)]
    threads: usize,
    #[arg(long, default_value_t = 4)]
    depth: u32,
    #[arg(long)]
    movetime_ms: Option<u64>,
    #[arg(long, default_value_t = 16)]
    hash_mb: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Random opening plies before the engine plays
    #[arg(long, default_value_t = 4)]
    random_plies: usize,
    #[arg(long, default_value = "out/selfplay.jsonl")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let params = SelfPlayParams {
        games: a.games,
        max_plies: a.max_plies,
        threads: a.threads,
        depth: a.depth,
        movetime_ms: a.movetime_ms,
        hash_mb: a.hash_mb,
        seed: a.seed,
        random_plies: a.random_plies,
        progress: true,
    };
    eprintln!("Generating {} games (depth={}, threads={}, random plies={})", a.games, a.depth, a.threads, a.random_plies);
    let games = generate_games(&params);
    write_jsonl(&games, &a.out).with_context(|| format!("writing {}", a.out.display()))?;
    let decisive = games.iter().filter(|g| g.result != 0).count();
    eprintln!("Wrote {} games ({} decisive) to {}", games.len(), decisive, a.out.display());
    Ok(())
}
