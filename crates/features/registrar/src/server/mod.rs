//! HTTP surfaces of the registrar: server-rendered pages and the JSON API.

mod api;
mod pages;
mod views;

use crate::error::RegistrarError;
use crate::{EnrollmentManager, Registrar, RegistrarInner};
use axum::Router;
use axum::extract::FromRef;
use axum::routing::get;
use campus_kernel::server::{ApiError, ApiState};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// JSON endpoints under `/api`, documented through `OpenAPI`.
pub fn api_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(api::create_course))
        .routes(routes!(api::read_course, api::amend_course, api::delete_course))
        .routes(routes!(api::create_student))
        .routes(routes!(api::read_student, api::amend_student, api::delete_student))
        .routes(routes!(api::list_enrollments, api::enroll))
        .routes(routes!(api::withdraw))
}

/// Server-rendered pages for browsing and editing students and courses.
pub fn page_router() -> Router<ApiState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/student/create", get(pages::create_student_form).post(pages::create_student))
        .route("/student/{id}", get(pages::student_details))
        .route(
            "/student/{id}/update",
            get(pages::update_student_form).post(pages::update_student),
        )
        .route("/student/{id}/delete", get(pages::delete_student))
        .route("/student/{id}/withdraw/{course_id}", get(pages::withdraw))
        .route("/courses", get(pages::courses))
        .route("/course/create", get(pages::create_course_form).post(pages::create_course))
        .route("/course/{id}", get(pages::course_details))
        .route("/course/{id}/update", get(pages::update_course_form).post(pages::update_course))
        .route("/course/{id}/delete", get(pages::delete_course))
}

impl FromRef<ApiState> for Registrar {
    fn from_ref(state: &ApiState) -> Self {
        state.get_slice::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!("Registrar slice not registered, serving from the state database");
            Self::new(RegistrarInner { manager: EnrollmentManager::new(state.database.clone()) })
        })
    }
}

impl From<RegistrarError> for ApiError {
    fn from(err: RegistrarError) -> Self {
        match err {
            RegistrarError::Validation { code, message, .. } => {
                Self::BadRequest { code: code.to_string().into(), message }
            },
            RegistrarError::DuplicateKey { .. } => Self::Conflict,
            RegistrarError::NotFound { code, message, .. } => {
                Self::NotFound { code: code.map(|c| c.to_string().into()), message }
            },
            other => Self::Internal { message: other.to_string().into() },
        }
    }
}
