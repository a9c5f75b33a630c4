use super::*;

#[test]
fn test_insert_remove_roundtrip() {
    let mut h = EnhancedHashMapBackend::with_buckets(4);
    h.insert(1, 100, None);
    h.insert(5, 50, None); // collides with id=1 under 4 buckets
    assert_eq!(h.len(), 2);
    assert_eq!(h.remove(1), Some((100, None)));
    assert_eq!(h.len(), 1);
    assert_eq!(h.remove(5), Some((50, None)));
}

#[test]
fn test_negative_id_bucket_index_in_range() {
    let h = EnhancedHashMapBackend::with_buckets(4);
    assert!(h.bucket_of(-7) < 4);
}

#[test]
fn test_oldest_across_buckets() {
    let mut h = EnhancedHashMapBackend::with_buckets(8);
    h.insert(1, 30, None);
    h.insert(2, 10, None);
    h.insert(3, 20, None);
    assert_eq!(h.oldest(), Some((2, 10)));
}
