use pijersi_engine::Position;
use std::time::{Duration, Instant};

#[test]
fn movetime_returns_quickly_with_move() {
    use pijersi_engine::search::alphabeta::{SearchParams, Searcher};
    let p = Position::start();
    let mut searcher = Searcher::default();
    let mut params = SearchParams::default();
    params.depth = 20;
    params.movetime = Some(Duration::from_millis(50));
    let t0 = Instant::now();
    let res = searcher.search_with_params(&p, params);
    let elapsed = t0.elapsed();
    assert!(res.bestmove.is_some(), "no bestmove under movetime");
    assert!(elapsed < Duration::from_millis(1000), "search exceeded time: {:?}", elapsed);
}

#[test]
fn abort_flag_keeps_first_iteration() {
    use pijersi_engine::search::alphabeta::{SearchParams, Searcher};
    use std::sync::atomic::Ordering;
    use std::thread;
    let p = Position::start();
    let mut searcher = Searcher::default();
    let abort = searcher.abort_handle();
    let mut params = SearchParams::default();
    params.depth = 30;
    params.threads = 1;
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        abort.store(true, Ordering::Relaxed);
    });
    let res = searcher.search_with_params(&p, params);
    stopper.join().unwrap();
    assert!(res.bestmove.is_some());
    assert!(res.depth >= 1 && res.depth < 30);
}

#[test]
fn search_by_time_helper() {
    let p = Position::start();
    let mv = pijersi_engine::search_by_time(&p, Duration::from_millis(20), true);
    assert!(p.is_move_legal(mv.expect("no move")));
}
