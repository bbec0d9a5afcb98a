use std::borrow::Cow;

/// A specialized [`GradebookError`] enum of this crate.
#[campus_derive::campus_error]
pub enum GradebookError {
    /// No score row matches the requested id.
    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A score row or a requested id cannot be interpreted.
    #[error("Malformed input{}: {message}", format_context(.context))]
    Malformed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("CSV error{}: {source}", format_context(.context))]
    Csv { source: csv::Error, context: Option<Cow<'static, str>> },

    #[error("Template error{}: {source}", format_context(.context))]
    Template { source: minijinja::Error, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal gradebook error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl GradebookError {
    pub(crate) fn malformed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Malformed { message: message.into(), context: None }
    }

    pub(crate) fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }

    /// `true` for failures caused by the request rather than the environment.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Malformed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_rendered_in_display() {
        let err = Err::<(), _>(GradebookError::malformed("marks is not an integer"))
            .context("line 3")
            .unwrap_err();
        assert_eq!(err.to_string(), "Malformed input (line 3): marks is not an integer");
        assert!(err.is_user_error());
    }

    #[test]
    fn io_errors_convert_and_are_not_user_errors() {
        let err: GradebookError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "data.csv").into();
        assert!(matches!(err, GradebookError::Io { .. }));
        assert!(!err.is_user_error());
    }
}
