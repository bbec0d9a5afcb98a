use crate::error::RegistrarError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use minijinja::{Environment, context};
use serde::Serialize;
use std::borrow::Cow;
use std::sync::LazyLock;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("add_student.html", include_str!("../../templates/add_student.html")),
    ("update_student.html", include_str!("../../templates/update_student.html")),
    ("student_details.html", include_str!("../../templates/student_details.html")),
    ("courses.html", include_str!("../../templates/courses.html")),
    ("add_course.html", include_str!("../../templates/add_course.html")),
    ("update_course.html", include_str!("../../templates/update_course.html")),
    ("course_details.html", include_str!("../../templates/course_details.html")),
    ("error.html", include_str!("../../templates/error.html")),
];

static VIEWS: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_loader(|name| {
        Ok(TEMPLATES.iter().find(|(n, _)| *n == name).map(|(_, source)| (*source).to_owned()))
    });
    env
});

/// Renders a page template; `.html` templates auto-escape their input.
pub(super) fn render<S: Serialize>(name: &str, ctx: S) -> Result<Html<String>, PageError> {
    Ok(Html(VIEWS.get_template(name)?.render(ctx)?))
}

/// Failure of an HTML route, shown through `error.html` with a matching status.
#[derive(Debug)]
pub(super) struct PageError {
    status: StatusCode,
    message: Cow<'static, str>,
}

impl PageError {
    pub(super) fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }

    fn internal() -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: "Something went wrong.".into() }
    }
}

impl From<RegistrarError> for PageError {
    fn from(err: RegistrarError) -> Self {
        match err {
            RegistrarError::Validation { message, .. } => Self::bad_request(message),
            RegistrarError::DuplicateKey { message, .. } => {
                Self { status: StatusCode::CONFLICT, message }
            },
            RegistrarError::NotFound { message, .. } => {
                Self { status: StatusCode::NOT_FOUND, message }
            },
            other => {
                tracing::error!(error = %other, "Page request failed");
                Self::internal()
            },
        }
    }
}

impl From<minijinja::Error> for PageError {
    fn from(err: minijinja::Error) -> Self {
        tracing::error!(error = %err, "Template rendering failed");
        Self::internal()
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let page = VIEWS
            .get_template("error.html")
            .and_then(|t| t.render(context! { message => self.message.as_ref() }));

        match page {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Error page rendering failed");
                (self.status, self.message.into_owned()).into_response()
            },
        }
    }
}
