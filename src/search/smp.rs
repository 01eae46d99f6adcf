use std::sync::Arc;

use log::{info, warn};
use rayon::prelude::*;

use crate::board::Position;
use crate::search::alphabeta::{SearchParams, SearchResult, Searcher};
use crate::search::eval::Evaluator;
use crate::search::tt::TranspositionTable;

/// Runs independent workers over one shared table.
///
/// Workers only talk through the table. The answer is the first worker (in
/// spawn order) that found a move; node counts are summed after the join.
pub struct SearchCoordinator {
    tt: Arc<TranspositionTable>,
    eval: Arc<dyn Evaluator>,
}

impl SearchCoordinator {
    pub fn new(tt: Arc<TranspositionTable>, eval: Arc<dyn Evaluator>) -> Self { Self { tt, eval } }

    pub fn tt(&self) -> &Arc<TranspositionTable> { &self.tt }

    pub fn workers(params: &SearchParams) -> usize {
        match params.threads {
            0 => std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            n => n,
        }
    }

    pub fn search(&self, pos: &Position, params: &SearchParams) -> SearchResult {
        self.tt.bump_generation();
        let workers = Self::workers(params);

        if workers == 1 {
            let mut searcher = Searcher::new(self.tt.clone(), self.eval.clone());
            let mut local = pos.clone();
            return searcher.search(&mut local, params);
        }

        let run = || -> Vec<SearchResult> {
            (0..workers)
                .into_par_iter()
                .map(|_| {
                    let mut searcher = Searcher::new(self.tt.clone(), self.eval.clone());
                    let mut local = pos.clone();
                    searcher.search(&mut local, params)
                })
                .collect()
        };
        let results = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(run),
            Err(e) => {
                warn!("could not build a {workers}-thread pool ({e}); using the global pool");
                run()
            }
        };

        let nodes: u64 = results.iter().map(|r| r.nodes).sum();
        let mut chosen = results.iter().find(|r| r.best_move.is_some()).or(results.first()).cloned().unwrap_or_default();
        chosen.nodes = nodes;
        if chosen.best_move.is_none() {
            warn!("coordinated search over {workers} workers found no move");
        }
        info!(
            "workers {} depth {} score {} nodes {} hashfull {}",
            workers,
            chosen.depth,
            chosen.score_cp,
            nodes,
            self.tt.hashfull()
        );
        chosen
    }
}
