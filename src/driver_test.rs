use super::*;

fn new_driver() -> Driver {
    Driver::new(DriverConfig::new(BackendKind::Map))
}

#[test]
fn test_scenario_start_then_query_covering() {
    let mut d = new_driver();
    assert_eq!(d.apply_line("S 7 100 0 0").unwrap(), None);
    assert_eq!(d.apply_line("Q 50 150 0 0").unwrap(), Some(7));
    assert_eq!(d.stats().queries, 1);
}

#[test]
fn test_scenario_start_end_query_covering() {
    let mut d = new_driver();
    d.apply_line("S 7 100 0 0").unwrap();
    d.apply_line("E 7 200 0 0").unwrap();
    assert_eq!(d.apply_line("Q 150 250 0 0").unwrap(), Some(7));
}

#[test]
fn test_scenario_start_end_query_disjoint() {
    let mut d = new_driver();
    d.apply_line("S 7 100 0 0").unwrap();
    d.apply_line("E 7 200 0 0").unwrap();
    assert_eq!(d.apply_line("Q 300 400 0 0").unwrap(), Some(0));
}

#[test]
fn test_scenario_two_overlapping_intervals() {
    let mut d = new_driver();
    d.apply_line("S 3 0").unwrap();
    d.apply_line("S 5 10").unwrap();
    d.apply_line("E 3 20").unwrap();
    d.apply_line("E 5 30").unwrap();
    assert_eq!(d.apply_line("Q 5 25").unwrap(), Some(3 ^ 5));
}

#[test]
fn test_end_of_unknown_id_reports_not_found() {
    let mut d = new_driver();
    let err = d.apply_line("E 99 10 0 0").unwrap_err();
    match err {
        Error::NotFound(_) => {}
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_count_reduction_report_tag() {
    let mut d = Driver::new(DriverConfig::new(BackendKind::Vector).set_reduce(Reduce::Count));
    d.apply_line("S 1 0 0 0").unwrap();
    d.apply_line("S 2 5 0 0").unwrap();
    d.apply_line("Q 0 100 0 0").unwrap();
    assert!(d.report().contains("[COUNT]"));
}

#[test]
fn test_malformed_line_is_invalid_event() {
    let mut d = new_driver();
    assert!(d.apply_line("X 1 2").is_err());
    assert!(d.apply_line("S notanumber 2").is_err());
}

#[test]
fn test_blank_line_is_ignored() {
    let mut d = new_driver();
    assert_eq!(d.apply_line("   ").unwrap(), None);
}
