use super::*;

#[test]
fn test_overlap_query() {
    let mut idx = ClosedIntervalIndex::new();
    idx.insert(Record::new(3, 0, 20));
    idx.insert(Record::new(5, 10, 30));

    let mut ids = idx.query(5, 25, None, None);
    ids.sort();
    assert_eq!(ids, vec![3, 5]);
}

#[test]
fn test_disjoint_query_excludes_record() {
    let mut idx = ClosedIntervalIndex::new();
    idx.insert(Record::new(7, 100, 200));

    assert_eq!(idx.query(300, 400, None, None), Vec::<i64>::new());
}

#[test]
fn test_secondary_attribute_predicate() {
    let mut idx = ClosedIntervalIndex::new();
    idx.insert(Record::with_secondary(1, 0, 10, 5.0));
    idx.insert(Record::with_secondary(2, 0, 10, 50.0));

    let ids = idx.query(0, 10, Some(0.0), Some(10.0));
    assert_eq!(ids, vec![1]);
}
