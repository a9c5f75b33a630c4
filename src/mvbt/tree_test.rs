use super::*;

#[test]
fn test_historical_read_scenario() {
    let mut t = Mvbt::new(Config::default());
    t.insert(1, 100, 1000); // (v=1, k=100, id=A=1000)
    t.insert(2, 200, 2000); // (v=2, k=200, id=B=2000)
    t.erase(3, 100, 1000).unwrap();

    assert_eq!(t.query_key_timestamp(100, 2), vec![1000]);
    assert_eq!(t.query_key_timestamp(100, 3), Vec::<i64>::new());
    assert_eq!(t.query_key_timestamp(200, 3), vec![2000]);
}

#[test]
fn test_insert_then_erase_identity() {
    let mut t = Mvbt::new(Config::default());
    t.insert(1, 10, 1);
    t.erase(5, 10, 1).unwrap();

    assert_eq!(t.query_key_timestamp(10, 1), vec![1]);
    assert_eq!(t.query_key_timestamp(10, 4), vec![1]);
    assert_eq!(t.query_key_timestamp(10, 5), Vec::<i64>::new());
    assert_eq!(t.query_key_timestamp(10, 100), Vec::<i64>::new());
}

#[test]
fn test_erase_of_unknown_id_is_not_found() {
    let mut t = Mvbt::new(Config::default());
    t.insert(1, 10, 1);
    let err = t.erase(2, 10, 999).unwrap_err();
    match err {
        Error::NotFound(_) => {}
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_empty_tree_query_returns_empty() {
    let t = Mvbt::new(Config::default());
    assert_eq!(t.query_key_timestamp(10, 0), Vec::<i64>::new());
    assert_eq!(t.query_range_timestamp(0, 1000, 0), Vec::<i64>::new());
}

#[test]
fn test_root_growth_on_overflow() {
    // fanout=4 forces a split well before 40 keys are inserted.
    let cfg = Config::new(4);
    let mut t = Mvbt::new(cfg);
    for k in 0..40 {
        t.insert(1, k, k);
    }
    assert!(t.num_historical_roots() >= 1, "expected at least one historical root after growth");
    for k in 0..40 {
        assert_eq!(t.query_key_timestamp(k, 1), vec![k], "key {} missing after split", k);
    }
}

#[test]
fn test_range_timestamp_after_split() {
    let cfg = Config::new(4);
    let mut t = Mvbt::new(cfg);
    for k in 0..20 {
        t.insert(1, k, k);
    }
    let mut ids = t.query_range_timestamp(5, 10, 1);
    ids.sort();
    assert_eq!(ids, vec![5, 6, 7, 8, 9, 10]);
}

#[test]
fn test_range_lifespan_reduce_xor() {
    let mut t = Mvbt::new(Config::default());
    t.insert(1, 0, 3);
    t.insert(1, 10, 5);
    t.erase(2, 0, 3).unwrap();

    // at v=1, both 3 and 5 are alive over key range [0,10]
    let xor_v1 = t.query_range_lifespan(0, 10, 1, 1, Reduce::Xor);
    assert_eq!(xor_v1, 3 ^ 5);

    // at v=2, id 3 was erased: only 5 remains alive
    let xor_v2 = t.query_range_lifespan(0, 10, 2, 2, Reduce::Xor);
    assert_eq!(xor_v2, 5);
}

#[test]
fn test_copy_entry_with_segment_preserves_query_results() {
    // segmenting entries at a key split changes how the successor's own
    // copies are dated internally, not what a query sees: the same
    // insert/query sequence must come back identical with the toggle on.
    let cfg = Config::new(4).set_copy_entry_with_segment(true);
    let mut t = Mvbt::new(cfg);
    for k in 0..40 {
        t.insert(1, k, k);
    }
    for k in 0..40 {
        assert_eq!(t.query_key_timestamp(k, 1), vec![k], "key {} missing after segmented split", k);
    }
    let mut ids = t.query_range_timestamp(5, 10, 1);
    ids.sort();
    assert_eq!(ids, vec![5, 6, 7, 8, 9, 10]);
}

#[test]
fn test_sparse_keys_survive_a_split() {
    // a gapped, non-contiguous key set -- unlike the 0..N runs used
    // elsewhere in this file -- forces a node whose recorded keyrange
    // must cover gaps no entry actually occupies. With fanout=4 the 5th
    // insert overflows the single root leaf and triggers a key split.
    let cfg = Config::new(4);
    let mut t = Mvbt::new(cfg);
    let keys = [0, 100, 5, 200, 50];
    for &k in &keys {
        t.insert(1, k, k);
    }
    assert!(t.num_historical_roots() >= 1, "expected a split to have grown the root");
    for &k in &keys {
        assert_eq!(t.query_key_timestamp(k, 1), vec![k], "key {} unreachable after split", k);
    }
}

#[test]
fn test_version_must_be_non_decreasing() {
    let mut t = Mvbt::new(Config::default());
    t.insert(5, 1, 1);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        t.insert(4, 2, 2);
    }));
    assert!(result.is_err());
}
