use super::*;

#[test]
fn test_insert_and_get() {
    let mut t: BTree<i64, &str> = BTree::new(4);
    for k in [10, 20, 30, 40, 50, 60, 70] {
        t.insert(k, "v");
    }
    assert_eq!(t.len(), 7);
    assert_eq!(t.get(40), Some(&"v"));
    assert_eq!(t.get(45), None);
}

#[test]
fn test_floor_predecessor() {
    let mut t: BTree<i64, i64> = BTree::new(4);
    for k in [1, 5, 10, 20, 50] {
        t.insert(k, k * 10);
    }
    assert_eq!(t.floor(0), None);
    assert_eq!(t.floor(1), Some((&1, &10)));
    assert_eq!(t.floor(7), Some((&5, &50)));
    assert_eq!(t.floor(100), Some((&50, &500)));
}

#[test]
fn test_splits_preserve_order_over_many_inserts() {
    let mut t: BTree<i64, i64> = BTree::new(3);
    for k in 0..200 {
        t.insert(k, k);
    }
    for k in 0..200 {
        assert_eq!(t.get(k), Some(&k));
    }
    assert_eq!(t.floor(199), Some((&199, &199)));
}

#[test]
#[should_panic(expected = "strictly increasing")]
fn test_non_increasing_insert_panics() {
    let mut t: BTree<i64, i64> = BTree::new(4);
    t.insert(5, 1);
    t.insert(5, 2);
}
