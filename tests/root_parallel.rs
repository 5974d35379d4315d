use pijersi_engine::Position;

#[test]
fn root_parallel_matches_single_thread() {
    use pijersi_engine::search::alphabeta::{SearchParams, Searcher};
    let mut p = Position::start();
    for mv in [0usize, 5, 17] {
        let moves = p.legal_moves();
        p.play(moves[mv % moves.len()]);
    }

    let mut p1 = SearchParams::default();
    p1.depth = 3;
    p1.threads = 1;
    let r1 = Searcher::default().search_with_params(&p, p1);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    let mut p4 = p1;
    p4.threads = 4;
    let r4 = pool.install(|| Searcher::default().search_with_params(&p, p4));

    assert_eq!(r4.score, r1.score, "score differs between single and multi-thread at fixed depth");
    assert_eq!(r4.bestmove, r1.bestmove);
}

#[test]
fn root_parallel_returns_move_with_movetime() {
    use pijersi_engine::search::alphabeta::{SearchParams, Searcher};
    use std::time::Duration;
    let p = Position::start();
    let mut params = SearchParams::default();
    params.depth = 10;
    params.threads = 4;
    params.movetime = Some(Duration::from_millis(5));
    let r = Searcher::default().search_with_params(&p, params);
    assert!(r.bestmove.is_some(), "no move returned under movetime with threads");
    assert!(r.depth >= 1);
}
