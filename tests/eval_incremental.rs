use pijersi_engine::board::{Move, Player, Position};
use pijersi_engine::search::eval::{Breakdown, Evaluator};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const WHITE_ROCK: u8 = 9;
const BLACK_WISE: u8 = 15;

#[test]
fn startpos_is_balanced() {
    let eval = Evaluator::shared();
    assert_eq!(eval.evaluate(Position::start().cells()), 0);
    assert_eq!(pijersi_engine::evaluate(&Position::start()), 0);
}

#[test]
fn goal_row_piece_dominates() {
    let eval = Evaluator::shared();
    let mut cells = [0u8; 45];
    cells[2] = WHITE_ROCK;
    let p = Position::from_cells(cells, Player::Black);
    assert!(p.is_win());
    assert_eq!(eval.evaluate(&cells), 1920);
    cells[40] = BLACK_WISE;
    assert_eq!(eval.evaluate(&cells), 1912);
}

#[test]
fn incremental_matches_full_along_random_games() {
    let eval = Evaluator::shared();
    let mut rng = SmallRng::seed_from_u64(2024);
    for _game in 0..20 {
        let mut p = Position::start();
        let mut breakdown: Breakdown = [0; 45];
        let mut score = eval.evaluate_with_breakdown(p.cells(), &mut breakdown);
        for _ply in 0..100 {
            if p.is_over() {
                break;
            }
            let prev = *p.cells();
            let mut buffer = prev;
            for mv in p.legal_moves() {
                let patched = eval.evaluate_move_incremental(score, &breakdown, &prev, mv, &mut buffer);
                assert_eq!(patched, eval.evaluate(&buffer), "move {mv} from {prev:?}");
            }
            let mv: Move = p.random_move(&mut rng).unwrap();
            p.play(mv);
            let next = eval.evaluate_incremental(score, &breakdown, &prev, p.cells());
            score = eval.evaluate_with_breakdown(p.cells(), &mut breakdown);
            assert_eq!(next, score);
        }
    }
}
