use crate::parsers::counts;

#[test]
fn test_leading_count_strips_thousands() {
    assert_eq!(counts::leading_count("12,345 students"), Some(12345));
    assert_eq!(counts::leading_count("500 students"), Some(500));
    assert_eq!(counts::leading_count("students: 12"), None);
}

#[test]
fn test_parenthesized_count() {
    assert_eq!(counts::parenthesized_count("4.6 (1,234 ratings)"), Some(1234));
    assert_eq!(counts::parenthesized_count("(0 ratings)"), Some(0));
    assert_eq!(counts::parenthesized_count("4.6 ratings"), None);
}

#[test]
fn test_rating_label() {
    assert_eq!(counts::rating_label("Rating: 4.5 out of 5"), "4.5 out of 5");
    assert_eq!(counts::rating_label("5 out of 5"), "5 out of 5");
}

#[test]
fn test_curriculum_stats() {
    assert_eq!(
        counts::curriculum_stats("23 sections • 120 lectures • 10h 5m total length"),
        Some(("120 lectures".to_string(), "10h 5m".to_string()))
    );
    assert_eq!(counts::curriculum_stats("120 lectures"), None);
}
