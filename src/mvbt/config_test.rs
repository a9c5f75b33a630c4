use super::*;

#[test]
fn test_default_degenerates_to_plain_btree() {
    let cfg = Config::new(64);
    assert_eq!(cfg.min_alive(), 0);
    assert_eq!(cfg.strong_max_alive(), 64);
    assert_eq!(cfg.strong_min_alive(), 0);
}

#[test]
fn test_nonzero_d_enables_underflow_guards() {
    let cfg = Config::new(64).set_thresholds(0.25, 1.0);
    assert_eq!(cfg.min_alive(), 16);
    assert_eq!(cfg.strong_max_alive(), 48);
    assert_eq!(cfg.strong_min_alive(), 32);
}
