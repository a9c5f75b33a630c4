use super::*;

#[test]
fn test_insert_remove_roundtrip() {
    let mut m = MapBackend::new();
    m.insert(1, 100, None);
    m.insert(2, 50, None);
    assert_eq!(m.len(), 2);
    assert_eq!(m.oldest(), Some((2, 50)));
    assert_eq!(m.remove(2), Some((50, None)));
    assert_eq!(m.len(), 1);
    assert_eq!(m.remove(99), None);
}

#[test]
fn test_oldest_tracks_minimum_start() {
    let mut m = MapBackend::new();
    m.insert(1, 30, None);
    m.insert(2, 10, None);
    m.insert(3, 20, None);
    assert_eq!(m.oldest().map(|(_, s)| s), Some(10));
    m.remove(2);
    assert_eq!(m.oldest().map(|(_, s)| s), Some(20));
}
