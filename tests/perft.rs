use pijersi_engine::perft::{perft, perft_parallel, perft_split};
use pijersi_engine::Position;

#[test]
fn perft_startpos_small_depths() {
    let p = Position::start();
    assert_eq!(perft(&p, 0), 1);
    assert_eq!(perft(&p, 1), 182);
    assert_eq!(perft(&p, 2), 32590);
}

#[test]
#[ignore = "six million leaves, run with --release --ignored"]
fn perft_startpos_depth_three() {
    let p = Position::start();
    assert_eq!(perft_parallel(&p, 3), 6033666);
}

#[test]
fn perft_split_sums_to_total() {
    let p = Position::start();
    let split = perft_split(&p, 2);
    assert_eq!(split.len(), 182);
    assert_eq!(split.iter().map(|&(_, n)| n).sum::<u64>(), 32590);
    assert_eq!(perft_parallel(&p, 2), 32590);
}

#[test]
fn perft_of_won_position_is_zero() {
    let mut cells = [0u8; 45];
    cells[2] = 9; // white rock on its goal row
    cells[40] = 15; // black wise
    let p = Position::from_cells(cells, pijersi_engine::Player::Black);
    assert_eq!(perft(&p, 2), 0);
    assert!(perft_split(&p, 2).is_empty());
}
