use super::*;

#[test]
fn test_insert_then_remove_returns_start() {
    let mut li = LiveIndex::new(BackendKind::Map, BoundMode::Unbounded);
    let flushed = li.insert(7, 100, None, 100);
    assert!(flushed.is_empty());
    assert_eq!(li.remove(7).unwrap(), (100, None));
    assert!(li.remove(7).is_err());
}

#[test]
fn test_capacity_bound_flushes_oldest() {
    let mut li = LiveIndex::new(BackendKind::Vector, BoundMode::Capacity(2));
    li.insert(1, 10, None, 10);
    li.insert(2, 20, None, 20);
    let flushed = li.insert(3, 30, None, 30);
    assert_eq!(flushed.len(), 1);
    assert_eq!(flushed[0].id, 1);
    assert_eq!(flushed[0].start, 10);
    assert_eq!(flushed[0].end, 30);
    assert_eq!(li.size(), 2);
}

#[test]
fn test_duration_bound_flushes_stale_entries() {
    let mut li = LiveIndex::new(BackendKind::Map, BoundMode::Duration(50));
    li.insert(1, 0, None, 0);
    let flushed = li.insert(2, 40, None, 40);
    assert!(flushed.is_empty(), "id 1 is only 40 old, under the 50 bound");

    let flushed = li.insert(3, 60, None, 60);
    assert_eq!(flushed.len(), 1);
    assert_eq!(flushed[0].id, 1);
}

#[test]
fn test_pure_time_travel_over_open_records() {
    let mut li = LiveIndex::new(BackendKind::EnhancedHashMap, BoundMode::Unbounded);
    li.insert(1, 10, None, 10);
    li.insert(2, 100, None, 100);

    let mut ids = li.execute_pure_time_travel(50);
    ids.sort();
    assert_eq!(ids, vec![1]);
}

#[test]
fn test_range_time_travel_secondary_attr_filter() {
    let mut li = LiveIndex::new(BackendKind::Map, BoundMode::Unbounded);
    li.insert(1, 10, Some(5.0), 10);
    li.insert(2, 10, Some(50.0), 10);

    let ids = li.execute_range_time_travel(0, 100, Some(0.0), Some(10.0));
    assert_eq!(ids, vec![1]);
}

#[test]
fn test_backend_kind_parse() {
    assert_eq!(BackendKind::parse("map").unwrap(), BackendKind::Map);
    assert_eq!(BackendKind::parse("VECTOR").unwrap(), BackendKind::Vector);
    assert_eq!(BackendKind::parse("EnhancedHashMap").unwrap(), BackendKind::EnhancedHashMap);
    assert!(BackendKind::parse("bogus").is_err());
}
