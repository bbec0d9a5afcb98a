//! `/report`: the score table behind an HTML form.

use crate::render::{self, Chart};
use crate::{DEFAULT_BINS, Gradebook, GradebookError, GradebookInner, Histogram};
use axum::Router;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use campus_kernel::server::{ApiState, FormFields};

const BACK: Option<&str> = Some("/report");

pub fn page_router() -> Router<ApiState> {
    Router::new().route("/report", get(form).post(submit))
}

impl FromRef<ApiState> for Gradebook {
    fn from_ref(state: &ApiState) -> Self {
        state.get_slice::<Self>().cloned().unwrap_or_else(|| {
            Self::new(GradebookInner { data_file: state.config.report.data_file.clone() })
        })
    }
}

#[derive(Debug)]
struct ReportError(GradebookError);

impl From<GradebookError> for ReportError {
    fn from(err: GradebookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GradebookError::NotFound { .. } => StatusCode::NOT_FOUND,
            GradebookError::Malformed { .. } => StatusCode::BAD_REQUEST,
            other => {
                tracing::error!(error = %other, "Report request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            },
        };
        let detail = self.0.is_user_error().then(|| self.0.to_string());

        match render::error_page(detail.as_deref(), BACK) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Error page rendering failed");
                (status, "Something went wrong").into_response()
            },
        }
    }
}

async fn form() -> Result<Html<String>, ReportError> {
    Ok(Html(render::form_page()?))
}

async fn submit(
    State(gradebook): State<Gradebook>,
    form: FormFields,
) -> Result<Html<String>, ReportError> {
    let id_value = form.text("id_value");

    let html = match form.text("ID") {
        "student_id" => {
            let report = gradebook.scores()?.student_report(id_value)?;
            render::student_page(&report, BACK)?
        },
        "course_id" => {
            let report = gradebook.scores()?.course_report(id_value)?;
            let svg = render::histogram_svg(&Histogram::from_marks(&report.marks, DEFAULT_BINS))?;
            render::course_page(&report, Chart::Inline(&svg), BACK)?
        },
        other => {
            return Err(GradebookError::Malformed {
                message: "ID must be student_id or course_id".into(),
                context: Some(format!("got '{other}'").into()),
            }
            .into());
        },
    };
    Ok(Html(html))
}
