//! End-to-end scenarios exercised against the public API rather than a
//! module's internals: four through the driver's `S`/`E`/`Q` dispatch, one
//! against the timeline index directly, one against the multiversion tree
//! directly (the driver never routes queries through it, see DESIGN.md).

use tempindex::driver::{Driver, DriverConfig};
use tempindex::live_index::BackendKind;
use tempindex::mvbt::{Config, Mvbt};
use tempindex::timeline::TimelineIndex;
use tempindex::types::Reduce;

fn new_driver() -> Driver {
    Driver::new(DriverConfig::new(BackendKind::Map))
}

#[test]
fn scenario_1_start_then_query_covering() {
    let mut d = new_driver();
    d.apply_line("S 7 100 0 0").unwrap();
    assert_eq!(d.apply_line("Q 50 150 0 0").unwrap(), Some(7));

    let mut d = Driver::new(DriverConfig::new(BackendKind::Map).set_reduce(Reduce::Count));
    d.apply_line("S 7 100 0 0").unwrap();
    assert_eq!(d.apply_line("Q 50 150 0 0").unwrap(), Some(1));
}

#[test]
fn scenario_2_start_end_query_covering() {
    let mut d = new_driver();
    d.apply_line("S 7 100 0 0").unwrap();
    d.apply_line("E 7 200 0 0").unwrap();
    assert_eq!(d.apply_line("Q 150 250 0 0").unwrap(), Some(7));
}

#[test]
fn scenario_3_start_end_query_disjoint() {
    let mut d = new_driver();
    d.apply_line("S 7 100 0 0").unwrap();
    d.apply_line("E 7 200 0 0").unwrap();
    assert_eq!(d.apply_line("Q 300 400 0 0").unwrap(), Some(0));
}

#[test]
fn scenario_4_two_overlapping_intervals() {
    let mut d = new_driver();
    d.apply_line("S 3 0").unwrap();
    d.apply_line("S 5 10").unwrap();
    d.apply_line("E 3 20").unwrap();
    d.apply_line("E 5 30").unwrap();
    assert_eq!(d.apply_line("Q 5 25").unwrap(), Some(3 ^ 5));
}

#[test]
fn scenario_5_timeline_checkpoint_boundary() {
    let mut tl = TimelineIndex::new(10);
    tl.insert(1, 5, true);
    tl.insert(1, 15, false);
    tl.insert(2, 15, true);

    assert_eq!(tl.num_checkpoints(), 1);
    assert_eq!(tl.execute_pure_time_travel(10, 12, Reduce::Xor), 1);
}

#[test]
fn scenario_6_mvbt_historical_read() {
    let mut t = Mvbt::new(Config::default());
    t.insert(1, 100, 1000); // v=1, k=100, id=A
    t.insert(2, 200, 2000); // v=2, k=200, id=B
    t.erase(3, 100, 1000).unwrap();

    assert_eq!(t.query_key_timestamp(100, 2), vec![1000]);
    assert_eq!(t.query_key_timestamp(100, 3), Vec::<i64>::new());
    assert_eq!(t.query_key_timestamp(200, 3), vec![2000]);
}
