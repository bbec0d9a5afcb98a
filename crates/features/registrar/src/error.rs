use std::borrow::Cow;

/// Stable codes carried into JSON error bodies as `error_code`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::IntoStaticStr,
)]
pub enum ErrorCode {
    #[strum(serialize = "COURSE001")]
    CourseNameRequired,
    #[strum(serialize = "COURSE002")]
    CourseCodeRequired,
    #[strum(serialize = "STUDENT001")]
    RollNumberRequired,
    #[strum(serialize = "STUDENT002")]
    FirstNameRequired,
    #[strum(serialize = "ENROLLMENT001")]
    CourseMissing,
    #[strum(serialize = "ENROLLMENT002")]
    StudentMissing,
}

impl ErrorCode {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::CourseNameRequired => "Course Name is required",
            Self::CourseCodeRequired => "Course Code is required",
            Self::RollNumberRequired => "Roll Number required",
            Self::FirstNameRequired => "First Name is required",
            Self::CourseMissing => "Course does not exist",
            Self::StudentMissing => "Student does not exist",
        }
    }
}

/// A specialized [`RegistrarError`] enum of this crate.
#[campus_derive::campus_error]
pub enum RegistrarError {
    /// A required field is blank.
    #[error("Validation error [{code}]{}: {message}", format_context(.context))]
    Validation { code: ErrorCode, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A roll number or course code is already taken.
    #[error("Duplicate key{}: {message}", format_context(.context))]
    DuplicateKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The addressed row, or a row it references, does not exist.
    #[error("Not found{}: {message}", format_context(.context))]
    NotFound {
        code: Option<ErrorCode>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Store error{}: {source}", format_context(.context))]
    Store { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal registrar error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl RegistrarError {
    pub(crate) const fn invalid(code: ErrorCode) -> Self {
        Self::Validation { code, message: Cow::Borrowed(code.message()), context: None }
    }

    pub(crate) const fn not_found(message: &'static str) -> Self {
        Self::NotFound { code: None, message: Cow::Borrowed(message), context: None }
    }

    pub(crate) const fn missing(code: ErrorCode) -> Self {
        Self::NotFound { code: Some(code), message: Cow::Borrowed(code.message()), context: None }
    }

    pub(crate) const fn duplicate(message: &'static str) -> Self {
        Self::DuplicateKey { message: Cow::Borrowed(message), context: None }
    }

    /// Maps a store failure, recognising unique index violations.
    pub(crate) fn from_store(source: surrealdb::Error) -> Self {
        if source.to_string().contains("already contains") {
            Self::DuplicateKey { message: source.to_string().into(), context: None }
        } else {
            Self::Store { source, context: None }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_render_as_wire_strings() {
        assert_eq!(ErrorCode::CourseNameRequired.to_string(), "COURSE001");
        assert_eq!(ErrorCode::StudentMissing.to_string(), "ENROLLMENT002");

        let wire: Vec<&'static str> = ErrorCode::iter().map(Into::into).collect();
        assert_eq!(
            wire,
            ["COURSE001", "COURSE002", "STUDENT001", "STUDENT002", "ENROLLMENT001", "ENROLLMENT002"]
        );
    }

    #[test]
    fn validation_display_carries_code_and_message() {
        let err = RegistrarError::invalid(ErrorCode::RollNumberRequired);
        assert_eq!(err.to_string(), "Validation error [STUDENT001]: Roll Number required");
    }
}
