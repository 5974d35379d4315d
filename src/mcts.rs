//! Monte-Carlo tree search with random rollouts.
//!
//! Each worker grows an independent tree stored in an index arena; once the
//! deadline passes, root child visit counts are summed across workers and the
//! most visited move wins the vote.

use std::ops::Range;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::board::{Move, Position};
use crate::search::alphabeta::default_threads;

pub const EXPLORATION: f64 = 1.414;

#[derive(Debug, Clone, Copy)]
pub struct MctsParams {
    pub movetime: Duration,
    /// Random playouts per rollout.
    pub simulations: u32,
    pub threads: usize,
    pub exploration: f64,
    /// Playouts longer than this are scored as draws.
    pub max_rollout_plies: u32,
    pub seed: Option<u64>,
}

impl Default for MctsParams {
    fn default() -> Self {
        MctsParams {
            movetime: Duration::from_millis(1000),
            simulations: 1,
            threads: default_threads(),
            exploration: EXPLORATION,
            max_rollout_plies: 400,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MctsResult {
    pub bestmove: Option<Move>,
    /// Root moves with their visits summed over all trees, in generation order.
    pub visits: Vec<(Move, u64)>,
    pub rollouts: u64,
    pub nodes: usize,
    pub elapsed: Duration,
}

struct Node {
    position: Position,
    parent: Option<usize>,
    children: Range<usize>,
    visits: u64,
    /// Rollout credit for the player who moved into this node.
    wins: f64,
}

impl Node {
    fn new(position: Position, parent: Option<usize>) -> Self {
        Node { position, parent, children: 0..0, visits: 0, wins: 0.0 }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// No further expansion: a goal row is reached or the draw rule applies.
    fn is_terminal(&self) -> bool {
        self.position.is_win() || self.position.is_draw()
    }
}

fn calc_uct(wins: f64, visits: u64, parent_visits: u64, exploration: f64) -> f64 {
    let n = visits as f64;
    wins / n + exploration * ((parent_visits as f64).ln() / n).sqrt()
}

pub struct Tree {
    nodes: Vec<Node>,
    root_moves: Vec<Move>,
    rng: SmallRng,
    params: MctsParams,
    rollouts: u64,
}

impl Tree {
    pub fn new(position: &Position, params: MctsParams, rng: SmallRng) -> Self {
        let mut tree = Tree { nodes: vec![Node::new(*position, None)], root_moves: Vec::new(), rng, params, rollouts: 0 };
        tree.root_moves = tree.expand(0);
        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn rollouts(&self) -> u64 {
        self.rollouts
    }

    /// Appends one child per legal move and returns the moves in child order.
    fn expand(&mut self, index: usize) -> Vec<Move> {
        let position = self.nodes[index].position;
        let moves = position.legal_moves();
        let first = self.nodes.len();
        for &mv in &moves {
            self.nodes.push(Node::new(position.played(mv), Some(index)));
        }
        self.nodes[index].children = first..self.nodes.len();
        moves
    }

    /// Unvisited child first, else the best UCT score. Ties keep the earliest child.
    fn uct_select(&self, index: usize) -> usize {
        let node = &self.nodes[index];
        let mut best = node.children.start;
        let mut best_score = f64::NEG_INFINITY;
        for child in node.children.clone() {
            let c = &self.nodes[child];
            if c.visits == 0 {
                return child;
            }
            let score = calc_uct(c.wins, c.visits, node.visits, self.params.exploration);
            if score > best_score {
                best_score = score;
                best = child;
            }
        }
        best
    }

    /// One selection step from `current`. Returns the next node to visit.
    fn step(&mut self, current: usize) -> usize {
        if !self.nodes[current].is_leaf() {
            return self.uct_select(current);
        }
        let node = &self.nodes[current];
        if node.visits > 0 && !node.is_terminal() {
            self.expand(current);
            let children = &self.nodes[current].children;
            if !children.is_empty() {
                return children.start;
            }
        }
        let wins = self.rollout(current);
        self.backpropagate(current, wins, u64::from(self.params.simulations.max(1)));
        0
    }

    /// Credit for the player who moved into `index`: 1 per win, 0.5 per draw.
    fn rollout(&mut self, index: usize) -> f64 {
        let start = self.nodes[index].position;
        let mut moves = Vec::with_capacity(256);
        let mut wins = 0.0;
        for _ in 0..self.params.simulations.max(1) {
            let mut position = start;
            let mut plies = 0;
            let credit = loop {
                if position.is_win() {
                    // The side to move lost: the previous mover reached its goal row.
                    break if position.side_to_move() == start.side_to_move() { 1.0 } else { 0.0 };
                }
                if position.is_draw() || plies >= self.params.max_rollout_plies {
                    break 0.5;
                }
                moves.clear();
                position.legal_moves_into(&mut moves);
                let Some(&mv) = moves.choose(&mut self.rng) else {
                    // Stalemated side loses.
                    break if position.side_to_move() == start.side_to_move() { 1.0 } else { 0.0 };
                };
                position.play(mv);
                plies += 1;
            };
            wins += credit;
        }
        self.rollouts += 1;
        wins
    }

    fn backpropagate(&mut self, index: usize, wins: f64, visits: u64) {
        let mut current = Some(index);
        let mut credit = wins;
        while let Some(i) = current {
            let node = &mut self.nodes[i];
            node.visits += visits;
            node.wins += credit;
            credit = visits as f64 - credit;
            current = node.parent;
        }
    }

    /// Iterates until the deadline has passed and at least one rollout finished.
    pub fn run(&mut self, deadline: Instant) {
        if self.root_moves.is_empty() {
            return;
        }
        let mut current = 0;
        loop {
            current = self.step(current);
            if self.rollouts > 0 && Instant::now() > deadline {
                break;
            }
        }
    }

    pub fn root_visits(&self) -> Vec<u64> {
        self.nodes[0].children.clone().map(|c| self.nodes[c].visits).collect()
    }

    pub fn root_moves(&self) -> &[Move] {
        &self.root_moves
    }
}

fn make_rng(seed: Option<u64>, worker: usize) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(worker as u64)),
        None => SmallRng::from_entropy(),
    }
}

/// Most visited root move over `params.threads` independent trees.
pub fn search_mcts(position: &Position, params: MctsParams) -> MctsResult {
    let start = Instant::now();
    let deadline = start + params.movetime;
    let moves = position.legal_moves();
    if moves.is_empty() {
        debug!("mcts: no legal move");
        return MctsResult { elapsed: start.elapsed(), ..MctsResult::default() };
    }

    let threads = params.threads.max(1);
    let trees: Vec<(Vec<u64>, u64, usize)> = (0..threads)
        .into_par_iter()
        .map(|worker| {
            let mut tree = Tree::new(position, params, make_rng(params.seed, worker));
            tree.run(deadline);
            debug!("mcts worker {worker}: {} rollouts, {} nodes", tree.rollouts(), tree.len());
            (tree.root_visits(), tree.rollouts(), tree.len())
        })
        .collect();

    let mut totals = vec![0u64; moves.len()];
    let mut rollouts = 0;
    let mut nodes = 0;
    for (visits, r, n) in &trees {
        for (total, v) in totals.iter_mut().zip(visits) {
            *total += v;
        }
        rollouts += r;
        nodes += n;
    }

    let mut best = 0;
    for (i, &v) in totals.iter().enumerate() {
        if v > totals[best] {
            best = i;
        }
    }
    let bestmove = moves[best];
    let elapsed = start.elapsed();
    info!("mcts bestmove {bestmove} visits {} rollouts {rollouts} nodes {nodes} time {}ms", totals[best], elapsed.as_millis());

    MctsResult { bestmove: Some(bestmove), visits: moves.into_iter().zip(totals).collect(), rollouts, nodes, elapsed }
}

/// Time-bounded MCTS with default settings.
pub fn search_by_mcts(position: &Position, budget: Duration, simulations: u32) -> Option<Move> {
    search_mcts(position, MctsParams { movetime: budget, simulations, ..MctsParams::default() }).bestmove
}
