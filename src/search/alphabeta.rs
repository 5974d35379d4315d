use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::board::{is_position_win, play_move, player_moves, Cells, Move, Player, Position, NUM_CELLS};
use crate::search::eval::{Breakdown, Evaluator, INFINITY, MATE_SCORE};
use crate::search::noise::{pick_first_best, RootNoise};
use crate::search::tt::{Bound, Entry, Tt};
use crate::search::zobrist::ZobristKeys;

/// Depth ceiling for time-bounded searches.
pub const MAX_DEPTH: u32 = 64;

/// Nodes between two deadline checks.
const CLOCK_INTERVAL: u64 = 1024;

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub depth: u32,
    pub movetime: Option<Duration>,
    /// Root-split workers. Above 1 the searcher runs the split on its own pool of this size.
    pub threads: usize,
    pub randomize: bool,
    pub seed: Option<u64>,
    pub use_tt: bool,
    pub tt_capacity: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            depth: 4,
            movetime: None,
            threads: default_threads(),
            randomize: false,
            seed: None,
            use_tt: true,
            tt_capacity: 1 << 20,
        }
    }
}

pub fn default_threads() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub bestmove: Option<Move>,
    /// Score of `bestmove` for the side to move.
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: u32,
    pub nodes: u64,
    pub elapsed: Duration,
}

pub struct Searcher {
    tt: Arc<Tt>,
    evaluator: Arc<Evaluator>,
    keys: Arc<ZobristKeys>,
    pub(crate) nodes: u64,
    next_clock_check: u64,
    deadline: Option<Instant>,
    abort: Arc<AtomicBool>,
    interruptible: bool,
    use_tt: bool,
    threads: usize,
    pool: Option<Arc<ThreadPool>>,
}

impl Default for Searcher {
    fn default() -> Self {
        Searcher::new(Arc::new(Tt::default()), Evaluator::shared(), ZobristKeys::shared())
    }
}

impl Searcher {
    pub fn new(tt: Arc<Tt>, evaluator: Arc<Evaluator>, keys: Arc<ZobristKeys>) -> Self {
        Searcher {
            tt,
            evaluator,
            keys,
            nodes: 0,
            next_clock_check: CLOCK_INTERVAL,
            deadline: None,
            abort: Arc::new(AtomicBool::new(false)),
            interruptible: true,
            use_tt: true,
            threads: 1,
            pool: None,
        }
    }

    /// Searcher with its own cache sized from `params`.
    pub fn from_params(params: &SearchParams) -> Self {
        Searcher::new(Arc::new(Tt::new(params.tt_capacity)), Evaluator::shared(), ZobristKeys::shared())
    }

    pub fn with_evaluator(mut self, evaluator: Arc<Evaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_keys(mut self, keys: Arc<ZobristKeys>) -> Self {
        self.keys = keys;
        self
    }

    pub fn tt(&self) -> &Arc<Tt> {
        &self.tt
    }

    pub fn set_tt_capacity(&mut self, entries: usize) {
        self.tt = Arc::new(Tt::new(entries));
    }

    /// Setting the returned flag makes the running search return at the next
    /// node. The first iteration always completes.
    pub fn abort_handle(&self) -> Arc<AtomicBool> {
        self.abort.clone()
    }

    pub fn get_threads(&self) -> usize {
        self.threads
    }

    /// Fixed-depth search with the current settings, no randomisation.
    pub fn search_depth(&mut self, position: &Position, depth: u32) -> SearchResult {
        let params = SearchParams { depth, movetime: None, randomize: false, threads: self.threads, ..SearchParams::default() };
        self.search_with_params(position, params)
    }

    /// Deepens until `movetime` runs out and keeps the last completed depth.
    pub fn search_time(&mut self, position: &Position, movetime: Duration) -> SearchResult {
        let params =
            SearchParams { depth: MAX_DEPTH, movetime: Some(movetime), randomize: false, threads: self.threads, ..SearchParams::default() };
        self.search_with_params(position, params)
    }

    pub fn search_with_params(&mut self, position: &Position, params: SearchParams) -> SearchResult {
        let start = Instant::now();
        self.nodes = 0;
        self.next_clock_check = CLOCK_INTERVAL;
        self.threads = params.threads.max(1);
        self.ensure_pool();
        self.use_tt = params.use_tt;
        self.deadline = params.movetime.map(|d| start + d);
        self.abort.store(false, Ordering::Relaxed);

        let side = position.side_to_move();
        let cells = *position.cells();
        let mut moves = position.legal_moves();
        if moves.is_empty() {
            debug!("no legal move for {side:?}");
            return SearchResult { bestmove: None, score: -MATE_SCORE, depth: 0, nodes: 0, elapsed: start.elapsed() };
        }

        let hash = self.keys.hash(&cells);
        // Depth 0 still picks a move on the static score of each child.
        let max_depth = params.depth.clamp(1, MAX_DEPTH);
        let mut noise = params.randomize.then(|| RootNoise::new(params.seed));
        let mut result = SearchResult::default();

        for depth in 1..=max_depth {
            self.interruptible = depth > 1;
            let scores = self.score_root(&cells, hash, side, &moves, depth);
            if self.aborted() {
                debug!("depth {depth} interrupted after {} nodes", self.nodes);
                break;
            }
            let picked = match noise.as_mut() {
                Some(noise) => noise.pick(&scores),
                None => pick_first_best(&scores),
            };
            let Some(index) = picked else { break };
            let best = moves[index];
            result.bestmove = Some(best);
            result.score = scores[index];
            result.depth = depth;
            debug!(
                "depth {depth} best {best} score {} nodes {} time {}ms",
                scores[index],
                self.nodes,
                start.elapsed().as_millis()
            );

            // Principal variation first on the next iteration.
            moves.remove(index);
            moves.insert(0, best);

            if moves.len() == 1 || self.deadline.is_some_and(|dl| Instant::now() >= dl) {
                break;
            }
        }

        self.interruptible = true;
        result.nodes = self.nodes;
        result.elapsed = start.elapsed();
        if let Some(best) = result.bestmove {
            info!(
                "bestmove {best} score {} depth {} nodes {} time {}ms tt {}/{}",
                result.score,
                result.depth,
                result.nodes,
                result.elapsed.as_millis(),
                self.tt.len(),
                self.tt.capacity()
            );
        }
        result
    }

    /// Keeps a pool with exactly `threads` workers for the root split.
    fn ensure_pool(&mut self) {
        if self.threads <= 1 {
            return;
        }
        if self.pool.as_ref().is_some_and(|pool| pool.current_num_threads() == self.threads) {
            return;
        }
        self.pool = match ThreadPoolBuilder::new().num_threads(self.threads).build() {
            Ok(pool) => Some(Arc::new(pool)),
            Err(err) => {
                warn!("cannot build {} search threads, using the global pool: {err}", self.threads);
                None
            }
        };
    }

    /// Scores every root move with the full window so root scores are exact.
    fn score_root(&mut self, cells: &Cells, hash: u64, side: Player, moves: &[Move], depth: u32) -> Vec<i32> {
        if self.threads > 1 && depth > 1 && moves.len() > 1 {
            let split = || -> Vec<(i32, u64)> {
                moves
                    .par_iter()
                    .map(|&mv| {
                        let mut worker = self.worker();
                        let score = worker.negamax_move(cells, hash, mv, side, depth - 1, -INFINITY, INFINITY);
                        (score, worker.nodes)
                    })
                    .collect()
            };
            let results = match &self.pool {
                Some(pool) => pool.install(split),
                None => split(),
            };
            self.nodes += results.iter().map(|&(_, n)| n).sum::<u64>();
            return results.into_iter().map(|(score, _)| score).collect();
        }
        let mut scores = Vec::with_capacity(moves.len());
        for &mv in moves {
            scores.push(self.negamax_move(cells, hash, mv, side, depth - 1, -INFINITY, INFINITY));
            if self.aborted() {
                break;
            }
        }
        scores
    }

    /// Shares the cache, tables, clock and abort flag.
    fn worker(&self) -> Searcher {
        Searcher {
            tt: self.tt.clone(),
            evaluator: self.evaluator.clone(),
            keys: self.keys.clone(),
            nodes: 0,
            next_clock_check: CLOCK_INTERVAL,
            deadline: self.deadline,
            abort: self.abort.clone(),
            interruptible: self.interruptible,
            use_tt: self.use_tt,
            threads: 1,
            pool: None,
        }
    }

    #[inline]
    fn aborted(&self) -> bool {
        self.interruptible && self.abort.load(Ordering::Relaxed)
    }

    fn check_clock(&mut self) -> bool {
        if !self.interruptible {
            return false;
        }
        if self.nodes >= self.next_clock_check {
            self.next_clock_check = self.nodes + CLOCK_INTERVAL;
            if let Some(dl) = self.deadline {
                if Instant::now() >= dl {
                    self.abort.store(true, Ordering::Relaxed);
                }
            }
        }
        self.abort.load(Ordering::Relaxed)
    }

    /// Score of `mv` for `mover` with `depth` plies left after it.
    #[allow(clippy::too_many_arguments)]
    fn negamax_move(&mut self, cells: &Cells, hash: u64, mv: Move, mover: Player, depth: u32, alpha: i32, beta: i32) -> i32 {
        let mut child = *cells;
        play_move(&mut child, mv);
        if depth == 0 || is_position_win(&child) {
            self.nodes += 1;
            return mover.sign() * self.evaluator.evaluate(&child);
        }
        let child_hash = self.keys.update(hash, cells, &child);
        -self.negamax(&child, child_hash, depth, -beta, -alpha, mover.other())
    }

    fn negamax(&mut self, cells: &Cells, hash: u64, depth: u32, mut alpha: i32, beta: i32, side: Player) -> i32 {
        self.nodes += 1;
        if self.check_clock() {
            return 0;
        }

        let mut moves = player_moves(side, cells);
        if moves.is_empty() {
            return -MATE_SCORE;
        }
        if depth == 1 {
            return self.terminal(cells, &moves, side, alpha, beta);
        }

        let key = self.keys.search_key(hash, depth, side);
        if self.use_tt {
            if let Some(en) = self.tt.get(key) {
                match en.bound {
                    Bound::Exact => return en.score,
                    Bound::Lower => {
                        if en.score >= beta {
                            return en.score;
                        }
                    }
                    Bound::Upper => {
                        if en.score <= alpha {
                            return en.score;
                        }
                    }
                }
                if let Some(ttm) = en.best {
                    if let Some(pos) = moves.iter().position(|&m| m == ttm) {
                        let mv = moves.remove(pos);
                        moves.insert(0, mv);
                    }
                }
            }
        }

        let orig_alpha = alpha;
        let mut best = -INFINITY;
        let mut best_move = None;
        for mv in moves {
            let score = self.negamax_move(cells, hash, mv, side, depth - 1, alpha, beta);
            if self.aborted() {
                return 0;
            }
            if score > best {
                best = score;
                best_move = Some(mv);
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                break;
            }
        }

        if self.use_tt {
            let bound = if best <= orig_alpha {
                Bound::Upper
            } else if best >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.tt.put(Entry { key, depth, score: best, best: best_move, bound });
            trace!("tt store depth {depth} score {best} {bound:?}");
        }
        best
    }

    /// Last ply: scores each reply by patching the parent evaluation.
    fn terminal(&mut self, cells: &Cells, moves: &[Move], side: Player, mut alpha: i32, beta: i32) -> i32 {
        let mut breakdown: Breakdown = [0; NUM_CELLS];
        let base = self.evaluator.evaluate_with_breakdown(cells, &mut breakdown);
        let mut buffer = *cells;
        let mut best = -INFINITY;
        for &mv in moves {
            self.nodes += 1;
            let score = side.sign() * self.evaluator.evaluate_move_incremental(base, &breakdown, cells, mv, &mut buffer);
            if score > best {
                best = score;
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_split_uses_a_pool_of_the_requested_size() {
        let position = Position::start();
        let mut searcher = Searcher::default();
        let mut params = SearchParams::default();
        params.depth = 2;
        params.threads = 3;
        assert!(searcher.search_with_params(&position, params).bestmove.is_some());
        assert_eq!(searcher.pool.as_ref().map(|p| p.current_num_threads()), Some(3));

        params.threads = 2;
        searcher.search_with_params(&position, params);
        assert_eq!(searcher.pool.as_ref().map(|p| p.current_num_threads()), Some(2));
        assert_eq!(searcher.get_threads(), 2);
    }

    #[test]
    fn depth_zero_is_a_one_ply_pick() {
        let mut searcher = Searcher::default();
        let result = searcher.search_depth(&Position::start(), 0);
        assert_eq!(result.depth, 1);
        assert!(result.bestmove.is_some());
    }
}
