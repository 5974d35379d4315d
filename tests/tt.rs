use pijersi_engine::search::tt::{Bound, Entry, Tt};

fn entry(key: u64) -> Entry {
    Entry { key, depth: 2, score: key as i32, best: None, bound: Bound::Exact }
}

#[test]
fn tt_capacity_enforced() {
    let tt = Tt::new(8);
    for i in 0..64u64 {
        tt.put(entry(i));
    }
    assert!(tt.len() <= 8, "tt size {} exceeds capacity", tt.len());
    assert_eq!(tt.capacity(), 8);
    assert!(tt.get(63).is_some());
}

#[test]
fn least_recently_used_is_evicted() {
    let tt = Tt::with_shards(2, 1);
    tt.put(entry(1));
    tt.put(entry(2));
    assert_eq!(tt.get(1).map(|e| e.score), Some(1));
    tt.put(entry(3));
    assert!(tt.get(2).is_none(), "stale entry survived");
    assert!(tt.get(1).is_some());
    assert!(tt.get(3).is_some());
}

#[test]
fn put_replaces_existing_key() {
    let tt = Tt::with_shards(4, 1);
    tt.put(entry(5));
    tt.put(Entry { score: -7, bound: Bound::Lower, ..entry(5) });
    assert_eq!(tt.len(), 1);
    let e = tt.get(5).unwrap();
    assert_eq!((e.score, e.bound), (-7, Bound::Lower));
}

#[test]
fn clear_empties_every_shard() {
    let tt = Tt::new(4096);
    for i in 0..1000u64 {
        tt.put(entry(i.wrapping_mul(0x9E37_79B9_7F4A_7C15)));
    }
    assert!(!tt.is_empty());
    tt.clear();
    assert!(tt.is_empty());
}

#[test]
fn cache_does_not_change_search_result() {
    use pijersi_engine::search::alphabeta::{SearchParams, Searcher};
    use pijersi_engine::Position;
    let p = Position::start();
    let mut with = SearchParams::default();
    with.depth = 3;
    with.threads = 1;
    let mut without = with;
    without.use_tt = false;
    let a = Searcher::from_params(&with).search_with_params(&p, with);
    let b = Searcher::from_params(&without).search_with_params(&p, without);
    assert_eq!(a.score, b.score);
    assert_eq!(a.bestmove, b.bestmove);
}

#[test]
fn search_fills_the_cache() {
    use pijersi_engine::search::alphabeta::Searcher;
    use pijersi_engine::Position;
    let mut s = Searcher::default();
    s.set_tt_capacity(1 << 12);
    s.search_depth(&Position::start(), 3);
    assert!(!s.tt().is_empty());
    assert!(s.tt().len() <= s.tt().capacity());
}
