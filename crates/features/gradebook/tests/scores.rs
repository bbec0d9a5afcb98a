use campus_gradebook::{GradebookError, ScoreTable};
use std::io::Write;

fn write_scores(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write scores");
    file
}

#[test]
fn reports_are_computed_from_a_file() {
    let file = write_scores("Student id, Course id, Marks\n1, 10, 80\n1, 20, 90\n2, 10, 70\n");
    let table = ScoreTable::load(file.path()).expect("load");
    assert_eq!(table.len(), 3);

    let student = table.student_report("1").expect("student 1");
    assert_eq!(student.total, 170);
    assert_eq!(
        student.rows.iter().map(|r| r.course_id.as_str()).collect::<Vec<_>>(),
        ["10", "20"]
    );

    let course = table.course_report("10").expect("course 10");
    assert!((course.average - 75.0).abs() < f64::EPSILON);
    assert_eq!(course.maximum, 80);
}

#[test]
fn student_ids_match_exactly() {
    let file = write_scores("s,c,m\n1,10,80\n11,10,60\n");
    let table = ScoreTable::load(file.path()).expect("load");
    assert_eq!(table.student_report("1").expect("student 1").rows.len(), 1);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = ScoreTable::load(dir.path().join("data.csv")).unwrap_err();
    assert!(matches!(err, GradebookError::Io { .. }));
    assert!(err.to_string().contains("data.csv"));
}

#[test]
fn malformed_rows_are_not_reported_as_not_found() {
    let file = write_scores("s,c,m\n1,10,80\n2,10,\n");
    let err = ScoreTable::load(file.path()).unwrap_err();
    assert!(matches!(err, GradebookError::Malformed { .. }));
}
