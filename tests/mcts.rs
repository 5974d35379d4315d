use pijersi_engine::board::Player;
use pijersi_engine::{MctsParams, Position};
use std::time::Duration;

#[test]
fn mcts_returns_legal_move_within_budget() {
    use pijersi_engine::search_mcts;
    let p = Position::start();
    let mut params = MctsParams::default();
    params.movetime = Duration::from_millis(100);
    params.threads = 2;
    params.seed = Some(5);
    let r = search_mcts(&p, params);
    let mv = r.bestmove.expect("no move");
    assert!(p.is_move_legal(mv));
    assert!(r.rollouts >= 1);
    assert_eq!(r.visits.len(), 182);
    assert!(r.elapsed < Duration::from_millis(2000));
    let best = r.visits.iter().find(|&&(m, _)| m == mv).map(|&(_, v)| v).unwrap();
    assert!(r.visits.iter().all(|&(_, v)| v <= best));
}

#[test]
fn mcts_with_no_moves_gives_none() {
    use pijersi_engine::search_mcts;
    let mut cells = [0u8; 45];
    cells[22] = 15;
    let p = Position::from_cells(cells, Player::White);
    let r = search_mcts(&p, MctsParams { movetime: Duration::from_millis(10), ..MctsParams::default() });
    assert!(r.bestmove.is_none());
    assert_eq!(r.rollouts, 0);
}

#[test]
fn mcts_prefers_immediate_win() {
    use pijersi_engine::search_by_mcts;
    let mut cells = [0u8; 45];
    cells[8] = 9;
    cells[40] = 15;
    let p = Position::from_cells(cells, Player::White);
    let mv = search_by_mcts(&p, Duration::from_millis(200), 4).expect("no move");
    assert!(p.is_move_win(mv), "{mv} does not win");
}

#[test]
fn several_simulations_per_rollout() {
    use pijersi_engine::search_mcts;
    let p = Position::start();
    let mut params = MctsParams::default();
    params.movetime = Duration::from_millis(50);
    params.simulations = 3;
    params.threads = 1;
    params.seed = Some(9);
    let r = search_mcts(&p, params);
    let total: u64 = r.visits.iter().map(|&(_, v)| v).sum();
    assert_eq!(total % 3, 0);
    assert!(r.nodes >= 183);
}
