use campus_domain::constants::{COUNTER, COURSE, ENROLLMENT, STUDENT};

#[test]
fn table_names_match_store_schema() {
    assert_eq!(STUDENT, "student");
    assert_eq!(COURSE, "course");
    assert_eq!(ENROLLMENT, "enrollment");
    assert_eq!(COUNTER, "counter");
}
