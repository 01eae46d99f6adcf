use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use crate::board::movegen::parse_uci_move;
use crate::board::{Color, Position};
use crate::config::EngineConfig;
use crate::search::alphabeta::SearchParams;
use crate::search::eval::{PieceSquareEvaluator, MATE_BOUND, MATE_SCORE};
use crate::search::ordering::MAX_PLY;
use crate::search::smp::SearchCoordinator;
use crate::search::time::compute_budget;
use crate::search::tt::TranspositionTable;

pub struct UciEngine {
    pos: Position,
    config: EngineConfig,
    coordinator: SearchCoordinator,
    recent_evals: Vec<i32>,
}

impl Default for UciEngine {
    fn default() -> Self { Self::new(EngineConfig::default()) }
}

/// `score cp N` or `score mate N` as UCI prints it.
pub fn format_score(score: i32) -> String {
    if score >= MATE_BOUND {
        format!("mate {}", (MATE_SCORE - score + 1) / 2)
    } else if score <= -MATE_BOUND {
        match (MATE_SCORE + score) / 2 {
            0 => "mate 0".to_string(),
            n => format!("mate -{n}"),
        }
    } else {
        format!("cp {score}")
    }
}

impl UciEngine {
    pub fn new(config: EngineConfig) -> Self {
        let coordinator = Self::build_coordinator(&config);
        Self { pos: Position::startpos(), config, coordinator, recent_evals: Vec::new() }
    }

    fn build_coordinator(config: &EngineConfig) -> SearchCoordinator {
        SearchCoordinator::new(Arc::new(TranspositionTable::new(config.hash_mb)), Arc::new(PieceSquareEvaluator))
    }

    pub fn position(&self) -> &Position { &self.pos }

    fn cmd_uci(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "id name Hyperbola {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "id author Hyperbola developers")?;
        writeln!(out, "option name Threads type spin default {} min 0 max 512", self.config.threads)?;
        writeln!(out, "option name Hash type spin default {} min 1 max 16384", self.config.hash_mb)?;
        writeln!(out, "uciok")
    }

    fn cmd_ucinewgame(&mut self) {
        self.pos = Position::startpos();
        self.recent_evals.clear();
        self.coordinator.tt().clear();
    }

    fn cmd_setoption(&mut self, args: &str, out: &mut impl Write) -> io::Result<()> {
        // setoption name <Name> value <N>
        let mut tokens = args.split_whitespace();
        let mut name = String::new();
        let mut value = None;
        while let Some(tok) = tokens.next() {
            match tok {
                "name" => name = tokens.next().unwrap_or_default().to_ascii_lowercase(),
                "value" => value = tokens.next().and_then(|v| v.parse::<usize>().ok()),
                _ => {}
            }
        }
        match (name.as_str(), value) {
            ("hash", Some(mb)) => {
                self.config.hash_mb = mb.max(1);
                self.coordinator = Self::build_coordinator(&self.config);
            }
            ("threads", Some(n)) => self.config.threads = n,
            _ => writeln!(out, "info string ignoring option '{args}'")?,
        }
        Ok(())
    }

    fn cmd_position(&mut self, args: &str, out: &mut impl Write) -> io::Result<()> {
        // Supports: 'position startpos [moves ...]' and 'position fen <fen> [moves ...]'
        let (setup, moves) = match args.split_once(" moves") {
            Some((s, m)) => (s.trim(), m.split_whitespace().collect::<Vec<_>>()),
            None => (args.trim(), Vec::new()),
        };
        let mut pos = if setup == "startpos" {
            Position::startpos()
        } else if let Some(fen) = setup.strip_prefix("fen ") {
            match Position::from_fen(fen) {
                Ok(p) => p,
                Err(e) => return writeln!(out, "info string bad fen: {e}"),
            }
        } else {
            return writeln!(out, "info string bad position command");
        };
        for text in moves {
            match parse_uci_move(&mut pos, text) {
                Ok(mv) => pos.apply(mv),
                Err(e) => return writeln!(out, "info string {e}"),
            }
        }
        self.pos = pos;
        Ok(())
    }

    /// Search parameters for a `go` command.
    pub fn go_params(&mut self, args: &str) -> SearchParams {
        let mut params = self.config.search_params();
        let mut depth = None;
        let mut movetime = None;
        let (mut wtime, mut btime, mut winc, mut binc) = (None, None, 0u64, 0u64);
        let mut tokens = args.split_whitespace();
        while let Some(tok) = tokens.next() {
            let mut num = || tokens.next().and_then(|s| s.parse::<u64>().ok());
            match tok {
                "depth" => depth = num(),
                "movetime" => movetime = num(),
                "wtime" => wtime = num(),
                "btime" => btime = num(),
                "winc" => winc = num().unwrap_or(0),
                "binc" => binc = num().unwrap_or(0),
                _ => {}
            }
        }
        let (clock, inc) = match self.pos.side_to_move() {
            Color::White => (wtime, winc),
            Color::Black => (btime, binc),
        };
        if let Some(d) = depth {
            params.depth = u32::try_from(d).unwrap_or(u32::MAX);
        }
        if let Some(ms) = movetime {
            params.movetime = Some(Duration::from_millis(ms));
        } else if let Some(remaining) = clock {
            let ms = compute_budget(&self.pos, remaining, inc, self.pos.fullmove_number(), &self.recent_evals);
            params.movetime = Some(Duration::from_millis(ms));
        }
        if params.movetime.is_some() && depth.is_none() {
            params.depth = (MAX_PLY - 1) as u32;
        }
        params
    }

    fn cmd_go(&mut self, args: &str, out: &mut impl Write) -> io::Result<()> {
        let params = self.go_params(args);
        debug!("go depth {} movetime {:?}", params.depth, params.movetime);
        let t0 = Instant::now();
        let res = self.coordinator.search(&self.pos, &params);
        let ms = t0.elapsed().as_millis().max(1) as u64;
        self.recent_evals.push(res.score_cp);
        writeln!(
            out,
            "info depth {} score {} nodes {} nps {} time {} hashfull {}",
            res.depth,
            format_score(res.score_cp),
            res.nodes,
            res.nodes * 1000 / ms,
            ms,
            self.coordinator.tt().hashfull()
        )?;
        match res.best_move {
            Some(m) => writeln!(out, "bestmove {m}"),
            None => writeln!(out, "bestmove 0000"),
        }
    }

    /// Handles one command line. Returns `false` on `quit`.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let line = line.trim();
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        match cmd {
            "" => {}
            "uci" => self.cmd_uci(out)?,
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => self.cmd_ucinewgame(),
            "setoption" => self.cmd_setoption(rest, out)?,
            "position" => self.cmd_position(rest, out)?,
            "go" => self.cmd_go(rest, out)?,
            "d" => write!(out, "{}", self.pos)?,
            "quit" => return Ok(false),
            // searches are synchronous, so there is nothing to stop
            "stop" => {}
            _ => writeln!(out, "info string unknown command '{cmd}'")?,
        }
        out.flush()?;
        Ok(true)
    }

    pub fn run_loop(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in stdin.lock().lines() {
            if !self.handle_line(&line?, &mut out)? { break; }
        }
        Ok(())
    }
}
