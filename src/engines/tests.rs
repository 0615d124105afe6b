use super::body_excerpt;

#[test]
fn test_body_excerpt_handles_empty_and_long_bodies() {
    assert_eq!(body_excerpt("  \n"), "empty response body");
    assert_eq!(body_excerpt(" short "), "short");

    let long = "é".repeat(250);
    let excerpt = body_excerpt(&long);
    assert!(excerpt.ends_with("..."));
    assert_eq!(excerpt.chars().count(), 203);
}
