use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::movegen::{has_legal_move, legal_moves};
use crate::board::position::HALFMOVE_LIMIT;
use crate::board::{Color, Position};
use crate::search::alphabeta::SearchParams;
use crate::search::eval::PieceSquareEvaluator;
use crate::search::smp::SearchCoordinator;
use crate::search::tt::TranspositionTable;

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Checkmate,
    Stalemate,
    FiftyMoves,
    Threefold,
    MaxPlies,
    /// The engine returned no move in a position that still had one.
    NoMove,
}

/// Terminal state of `pos` under the game rules, if any.
pub fn game_outcome(pos: &mut Position) -> Option<Termination> {
    if !has_legal_move(pos) {
        return Some(if pos.in_check() { Termination::Checkmate } else { Termination::Stalemate });
    }
    if pos.halfmove_clock() >= HALFMOVE_LIMIT {
        return Some(Termination::FiftyMoves);
    }
    if pos.is_threefold_repetition() {
        return Some(Termination::Threefold);
    }
    None
}

#[derive(Clone, Debug)]
pub struct SelfPlayParams {
    pub games: usize,
    pub max_plies: usize,
    pub threads: usize,
    pub depth: u32,
    pub movetime_ms: Option<u64>,
    pub hash_mb: usize,
    pub seed: u64,
    /// Uniformly random legal moves played before the engine takes over.
    pub random_plies: usize,
    pub progress: bool,
}

impl Default for SelfPlayParams {
    fn default() -> Self {
        Self {
            games: 10,
            max_plies: 200,
            threads: 1,
            depth: 4,
            movetime_ms: None,
            hash_mb: 16,
            seed: 42,
            random_plies: 4,
            progress: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub moves: Vec<String>,
    /// 1 white win, 0 draw, -1 black win
    pub result: i8,
    pub termination: Termination,
    pub final_fen: String,
}

pub fn play_game(params: &SelfPlayParams, coordinator: &SearchCoordinator, rng: &mut SmallRng) -> GameRecord {
    let mut pos = Position::startpos();
    let mut moves = Vec::new();
    let search = SearchParams {
        depth: params.depth,
        threads: params.threads,
        movetime: params.movetime_ms.map(Duration::from_millis),
        ..SearchParams::default()
    };

    let termination = loop {
        if let Some(t) = game_outcome(&mut pos) { break t; }
        if moves.len() >= params.max_plies { break Termination::MaxPlies; }

        let mv = if moves.len() < params.random_plies {
            let legal = legal_moves(&mut pos);
            Some(legal[rng.gen_range(0..legal.len())])
        } else {
            coordinator.search(&pos, &search).best_move
        };
        let Some(mv) = mv else { break Termination::NoMove };
        moves.push(mv.to_string());
        pos.apply(mv);
    };

    let result = match termination {
        // The side to move is the one mated.
        Termination::Checkmate => if pos.side_to_move() == Color::White { -1 } else { 1 },
        _ => 0,
    };
    debug!("game over after {} plies: {:?} ({})", moves.len(), termination, result);
    GameRecord { moves, result, termination, final_fen: pos.to_fen() }
}

pub fn generate_games(params: &SelfPlayParams) -> Vec<GameRecord> {
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let tt = Arc::new(TranspositionTable::new(params.hash_mb));
    let coordinator = SearchCoordinator::new(tt.clone(), Arc::new(PieceSquareEvaluator));

    let bar = if params.progress { ProgressBar::new(params.games as u64) } else { ProgressBar::hidden() };
    if let Ok(style) = ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ETA: {eta}") {
        bar.set_style(style);
    }

    let mut games = Vec::with_capacity(params.games);
    for _ in 0..params.games {
        tt.clear();
        games.push(play_game(params, &coordinator, &mut rng));
        bar.inc(1);
    }
    bar.finish_and_clear();
    games
}

/// One JSON object per line.
pub fn write_jsonl<P: AsRef<Path>>(games: &[GameRecord], path: P) -> std::io::Result<()> {
    if let Some(dir) = path.as_ref().parent() {
        if !dir.as_os_str().is_empty() { std::fs::create_dir_all(dir)?; }
    }
    let mut w = BufWriter::new(File::create(path)?);
    for g in games {
        serde_json::to_writer(&mut w, g)?;
        w.write_all(b"\n")?;
    }
    w.flush()
}

pub fn read_jsonl<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<GameRecord>> {
    let r = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    for line in r.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        out.push(serde_json::from_str(&line)?);
    }
    Ok(out)
}
