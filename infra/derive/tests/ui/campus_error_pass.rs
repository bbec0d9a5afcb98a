use campus_derive::campus_error;
use std::borrow::Cow;

#[campus_error]
pub enum ReportError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Student {student_id} not found")]
    NotFound { student_id: String },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read(path: &str) -> Result<String, ReportError> {
    std::fs::read_to_string(path).context("Reading score table")
}

fn main() {
    let missing = read("/definitely/not/here.csv");
    assert!(matches!(missing, Err(ReportError::Io { context: Some(_), .. })));

    let internal: ReportError = "boom".into();
    assert_eq!(internal.to_string(), "Internal error: boom");

    let not_found = ReportError::NotFound { student_id: "7".to_owned() };
    assert_eq!(not_found.to_string(), "Student 7 not found");
}
