use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::{Move, Player, Position};
use crate::error::{EngineError, EngineResult};
use crate::mcts::{search_mcts, MctsParams};
use crate::search::alphabeta::{SearchParams, Searcher};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveSource {
    Random,
    AlphaBeta,
    Mcts,
}

#[derive(Clone, Debug)]
pub struct SelfPlayParams {
    pub games: usize,
    pub max_plies: usize,
    /// Search threads per game; games themselves run in parallel.
    pub threads: usize,
    pub source: MoveSource,
    pub depth: u32,
    pub movetime_ms: Option<u64>,
    pub seed: u64,
    /// Uniformly random opening plies before the engine takes over.
    pub random_plies: usize,
    pub mcts_simulations: u32,
}

impl Default for SelfPlayParams {
    fn default() -> Self {
        SelfPlayParams {
            games: 10,
            max_plies: 200,
            threads: 1,
            source: MoveSource::AlphaBeta,
            depth: 2,
            movetime_ms: None,
            seed: 42,
            random_plies: 4,
            mcts_simulations: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Moves as (start, mid, end) index triples, 255 for no mid.
    pub moves: Vec<[u8; 3]>,
    /// 1 white win, 0 draw or unfinished, -1 black win.
    pub result: i8,
}

impl GameRecord {
    /// Every position of the game, the start position included.
    pub fn replay(&self) -> EngineResult<Vec<Position>> {
        let mut position = Position::start();
        let mut positions = vec![position];
        for (ply, &triple) in self.moves.iter().enumerate() {
            let mv = Move::from_triple(triple);
            if !position.is_move_legal(mv) {
                return Err(EngineError::InvalidPosition(format!("illegal move {mv} at ply {ply}")));
            }
            position.play(mv);
            positions.push(position);
        }
        Ok(positions)
    }
}

fn game_result(position: &Position) -> i8 {
    match position.winner() {
        Some(Player::White) => 1,
        Some(Player::Black) => -1,
        None => 0,
    }
}

fn game_seed(seed: u64, game: usize) -> u64 {
    seed ^ (game as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn select_move(position: &Position, params: &SelfPlayParams, ply: usize, rng: &mut SmallRng, searcher: &mut Searcher) -> Option<Move> {
    if ply < params.random_plies || params.source == MoveSource::Random {
        return position.random_move(rng);
    }
    let movetime = params.movetime_ms.map(Duration::from_millis);
    match params.source {
        MoveSource::Mcts => {
            let mcts = MctsParams {
                movetime: movetime.unwrap_or(Duration::from_millis(100)),
                simulations: params.mcts_simulations,
                threads: params.threads,
                seed: Some(rng.gen()),
                ..MctsParams::default()
            };
            search_mcts(position, mcts).bestmove
        }
        _ => {
            let search = SearchParams {
                depth: params.depth,
                movetime,
                threads: params.threads,
                randomize: true,
                seed: Some(rng.gen()),
                ..SearchParams::default()
            };
            searcher.search_with_params(position, search).bestmove
        }
    }
}

fn play_game(params: &SelfPlayParams, index: usize) -> GameRecord {
    let mut rng = SmallRng::seed_from_u64(game_seed(params.seed, index));
    let mut searcher = Searcher::default();
    let mut position = Position::start();
    let mut record = GameRecord { moves: Vec::new(), result: 0 };
    while record.moves.len() < params.max_plies && !position.is_win() && !position.is_draw() {
        let Some(mv) = select_move(&position, params, record.moves.len(), &mut rng, &mut searcher) else {
            break;
        };
        record.moves.push(mv.to_triple());
        position.play(mv);
    }
    record.result = game_result(&position);
    debug!("game {index}: {} plies, result {}", record.moves.len(), record.result);
    record
}

pub fn generate_games(params: &SelfPlayParams) -> Vec<GameRecord> {
    generate_games_with_progress(params, |_| {})
}

/// Plays games in parallel; `on_game` runs once per finished game.
pub fn generate_games_with_progress<F>(params: &SelfPlayParams, on_game: F) -> Vec<GameRecord>
where
    F: Fn(&GameRecord) + Sync,
{
    (0..params.games)
        .into_par_iter()
        .map(|index| {
            let record = play_game(params, index);
            on_game(&record);
            record
        })
        .collect()
}

/// One JSON object per line.
pub fn write_games<P: AsRef<Path>>(games: &[GameRecord], path: P) -> EngineResult<()> {
    let path = path.as_ref();
    let io_err = |source| EngineError::Io { path: path.to_path_buf(), source };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir).map_err(io_err)?;
    }
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    for game in games {
        serde_json::to_writer(&mut writer, game)?;
        writer.write_all(b"\n").map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(())
}

pub fn read_games<P: AsRef<Path>>(path: P) -> EngineResult<Vec<GameRecord>> {
    let path = path.as_ref();
    let io_err = |source| EngineError::Io { path: path.to_path_buf(), source };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let mut games = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        games.push(serde_json::from_str(&line)?);
    }
    Ok(games)
}
