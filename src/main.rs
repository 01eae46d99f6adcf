use anyhow::{Context, Result};
use clap::Parser;
use hyperbola::board::movegen::parse_uci_move;
use hyperbola::board::{Color, Position};
use hyperbola::config::EngineConfig;
use hyperbola::search::eval::PieceSquareEvaluator;
use hyperbola::search::ordering::MAX_PLY;
use hyperbola::search::smp::SearchCoordinator;
use hyperbola::search::time::compute_budget;
use hyperbola::search::tt::TranspositionTable;
use hyperbola::selfplay::{game_outcome, Termination};
use hyperbola::uci::{format_score, UciEngine};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against the Hyperbola engine", long_about = None)]
struct Args {
    /// Speak UCI on stdin/stdout instead of playing on the console
    #[arg(long)]
    uci: bool,

    /// Engine plays both sides
    #[arg(long)]
    selfplay: bool,

    /// Your color: 'w' for white, 'b' for black
    #[arg(long, default_value = "w")]
    color: String,

    /// Starting FEN position
    #[arg(long)]
    fen: Option<String>,

    /// JSON engine config; explicit flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    threads: Option<usize>,

    #[arg(long)]
    hash_mb: Option<usize>,

    /// Fixed search depth instead of clock-based thinking
    #[arg(long)]
    depth: Option<u32>,

    /// Engine clock in milliseconds
    #[arg(long, default_value_t = 300_000)]
    time_ms: u64,

    /// Increment per move in milliseconds
    #[arg(long, default_value_t = 2_000)]
    inc_ms: u64,

    /// Print search statistics
    #[arg(long)]
    verbose: bool,
}

fn parse_color(color_str: &str) -> Result<Color> {
    match color_str.to_lowercase().as_str() {
        "w" | "white" => Ok(Color::White),
        "b" | "black" => Ok(Color::Black),
        _ => anyhow::bail!("Invalid color: use 'w' or 'b'"),
    }
}

fn read_human_move(pos: &mut Position) -> Result<Option<hyperbola::Move>> {
    loop {
        print!("Enter your move (e.g., e2e4, or 'quit'): ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        let input = input.trim();
        if input == "quit" {
            return Ok(None);
        }
        match parse_uci_move(pos, input) {
            Ok(mv) => return Ok(Some(mv)),
            Err(e) => println!("{e}"),
        }
    }
}

fn announce(term: Termination, pos: &Position) {
    match term {
        Termination::Checkmate => {
            let winner = if pos.side_to_move() == Color::White { "Black" } else { "White" };
            println!("\nCheckmate! {winner} wins!");
        }
        Termination::Stalemate => println!("\nGame is a stalemate!"),
        Termination::FiftyMoves => println!("\nDraw by the fifty-move rule!"),
        Termination::Threefold => println!("\nDraw by threefold repetition!"),
        Termination::MaxPlies | Termination::NoMove => println!("\nGame stopped."),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = EngineConfig::load_or_default(args.config.as_deref())?;
    if let Some(t) = args.threads { config.threads = t; }
    if let Some(mb) = args.hash_mb { config.hash_mb = mb; }
    if let Some(d) = args.depth { config.depth = d; }

    if args.uci {
        let mut engine = UciEngine::new(config);
        engine.run_loop().context("UCI loop failed")?;
        return Ok(());
    }

    let human_color = parse_color(&args.color)?;
    let mut pos = match args.fen.as_deref() {
        Some(fen) => Position::from_fen(fen).context("Invalid FEN string")?,
        None => Position::startpos(),
    };

    let coordinator = SearchCoordinator::new(Arc::new(TranspositionTable::new(config.hash_mb)), Arc::new(PieceSquareEvaluator));
    // Remaining clock per color, engine side only.
    let mut clocks = [args.time_ms; 2];
    let mut evals: [Vec<i32>; 2] = [Vec::new(), Vec::new()];

    loop {
        if let Some(term) = game_outcome(&mut pos) {
            println!("\n{pos}");
            announce(term, &pos);
            break;
        }

        let side = pos.side_to_move();
        println!("\n{}'s turn", if side == Color::White { "White" } else { "Black" });
        println!("{pos}");

        if !args.selfplay && side == human_color {
            match read_human_move(&mut pos)? {
                Some(mv) => pos.apply(mv),
                None => break,
            }
            continue;
        }

        let mut params = config.search_params();
        if args.depth.is_none() {
            let budget = compute_budget(&pos, clocks[side.index()], args.inc_ms, pos.fullmove_number(), &evals[side.index()]);
            params.depth = (MAX_PLY - 1) as u32;
            params.movetime = Some(Duration::from_millis(budget));
        }

        let t0 = Instant::now();
        let res = coordinator.search(&pos, &params);
        let elapsed = t0.elapsed();
        evals[side.index()].push(res.score_cp);

        if args.depth.is_none() {
            let spent = elapsed.as_millis() as u64;
            if spent >= clocks[side.index()] {
                println!("\nEngine lost on time.");
                break;
            }
            clocks[side.index()] = clocks[side.index()] - spent + args.inc_ms;
        }

        if args.verbose {
            let nps = res.nodes as f64 / elapsed.as_secs_f64().max(1e-3);
            println!(
                "depth {} score {} nodes {} elapsed {:.2}s nps {:.0} clock {}ms",
                res.depth,
                format_score(res.score_cp),
                res.nodes,
                elapsed.as_secs_f64(),
                nps,
                clocks[side.index()]
            );
        }

        match res.best_move {
            Some(mv) => {
                println!("Computer plays: {mv}");
                pos.apply(mv);
            }
            None => {
                println!("No legal moves available!");
                break;
            }
        }
    }

    Ok(())
}
