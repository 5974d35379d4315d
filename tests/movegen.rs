//! Cross-checks the generator against a step-by-step action simulator.

use std::collections::BTreeSet;

use pijersi_engine::board::neighbours::{neighbours, neighbours2};
use pijersi_engine::board::{apply_move, Cells, Player, Position};
use pretty_assertions::assert_eq;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn occupied(c: u8) -> bool {
    c != 0
}

fn white(c: u8) -> bool {
    c & 2 == 0
}

fn kind(c: u8) -> u8 {
    (c >> 2) & 3
}

fn beats(attacker: u8, defender: u8) -> bool {
    // 0 scissors, 1 paper, 2 rock, 3 wise
    matches!((kind(attacker), kind(defender)), (0, 1) | (1, 2) | (2, 0))
}

fn can_enter(b: &Cells, top: u8, to: usize) -> bool {
    let t = b[to];
    !occupied(t) || (white(t) != white(top) && beats(top, t))
}

fn can_join(b: &Cells, top: u8, to: usize) -> bool {
    let t = b[to];
    occupied(t) && white(t) == white(top) && t < 16 && (kind(top) != 3 || kind(t) == 3)
}

/// Whole unit to a 1-range or clear 2-range destination.
fn unit_destinations(b: &Cells, from: usize) -> Vec<usize> {
    let unit = b[from];
    let top = unit & 15;
    let mut out: Vec<usize> = neighbours(from).iter().map(|&n| n as usize).filter(|&to| can_enter(b, top, to)).collect();
    if unit >= 16 {
        out.extend(
            neighbours2(from)
                .iter()
                .map(|&n| n as usize)
                .filter(|&to| !occupied(b[(from + to) / 2]) && can_enter(b, top, to)),
        );
    }
    out
}

fn relocate(b: &Cells, from: usize, to: usize) -> Cells {
    let mut n = *b;
    n[to] = n[from];
    n[from] = 0;
    n
}

fn drop_top(b: &Cells, from: usize, to: usize, join: bool) -> Cells {
    let mut n = *b;
    let unit = n[from];
    n[from] = unit >> 4;
    n[to] = if join { (unit & 15) | (n[to] << 4) } else { unit & 15 };
    n
}

/// Every board reachable in one turn by the unit on `s`.
fn simulated_results(b: &Cells, s: usize) -> BTreeSet<Cells> {
    let mut out = BTreeSet::new();
    let unit = b[s];
    let top = unit & 15;

    // Stack then move the new stack.
    for m in neighbours(s).iter().map(|&n| n as usize) {
        if can_join(b, top, m) {
            let joined = drop_top(b, s, m, true);
            out.insert(joined);
            for e in unit_destinations(&joined, m) {
                out.insert(relocate(&joined, m, e));
            }
        }
    }

    if unit < 16 {
        for to in unit_destinations(b, s) {
            out.insert(relocate(b, s, to));
        }
        return out;
    }

    // Unstack only.
    for e in neighbours(s).iter().map(|&n| n as usize) {
        if can_enter(b, top, e) {
            out.insert(drop_top(b, s, e, false));
        }
    }
    // Move the stack, then optionally unstack or join an ally.
    for m in unit_destinations(b, s) {
        let moved = relocate(b, s, m);
        out.insert(moved);
        for e in neighbours(m).iter().map(|&n| n as usize) {
            if can_enter(&moved, top, e) {
                out.insert(drop_top(&moved, m, e, false));
            } else if can_join(&moved, top, e) {
                out.insert(drop_top(&moved, m, e, true));
            }
        }
    }
    out
}

fn check_position(position: &Position) {
    let cells = position.cells();
    let colour_white = position.side_to_move() == Player::White;
    let generated: BTreeSet<Cells> = position.legal_moves().into_iter().map(|mv| apply_move(cells, mv)).collect();
    let mut simulated = BTreeSet::new();
    for s in 0..45 {
        if occupied(cells[s]) && white(cells[s]) == colour_white {
            simulated.extend(simulated_results(cells, s));
        }
    }
    assert_eq!(generated, simulated, "move sets differ for {:?}", cells);
}

#[test]
fn startpos_moves_match_simulation() {
    let p = Position::start();
    assert_eq!(p.legal_moves().len(), 182);
    assert!(!p.is_win());
    check_position(&p);
}

#[test]
fn random_walks_match_simulation() {
    let mut rng = SmallRng::seed_from_u64(0x5EED);
    for _game in 0..12 {
        let mut p = Position::start();
        for _ply in 0..80 {
            if p.is_win() {
                break;
            }
            check_position(&p);
            let Some(mv) = p.random_move(&mut rng) else { break };
            assert!(p.is_move_legal(mv));
            p.play(mv);
        }
    }
}

#[test]
fn generated_moves_are_unique_and_keep_stacks_monochrome() {
    let mut rng = SmallRng::seed_from_u64(99);
    let mut p = Position::start();
    for _ in 0..60 {
        if p.is_over() {
            break;
        }
        let moves = p.legal_moves();
        let unique: BTreeSet<u32> = moves.iter().map(|m| m.raw()).collect();
        assert_eq!(unique.len(), moves.len());
        for &mv in &moves {
            let next = apply_move(p.cells(), mv);
            for &c in next.iter().filter(|&&c| c >= 16) {
                assert_eq!(c & 2, (c >> 4) & 2, "mixed stack after {mv}");
            }
        }
        let Some(mv) = p.random_move(&mut rng) else { break };
        p.play(mv);
    }
}

#[test]
fn win_prediction_matches_played_board() {
    let mut rng = SmallRng::seed_from_u64(404);
    for _game in 0..30 {
        let mut p = Position::start();
        for _ply in 0..120 {
            if p.is_over() {
                break;
            }
            for mv in p.legal_moves() {
                assert_eq!(p.is_move_win(mv), p.played(mv).is_win(), "{mv} on {:?}", p.cells());
            }
            let Some(mv) = p.random_move(&mut rng) else { break };
            p.play(mv);
        }
    }
}
