use crate::Registrar;
use crate::model::{Course, CoursePatch, Enrollment, NewCourse, NewStudent, Student, StudentPatch};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use campus_derive::{api_handler, api_model};
use campus_domain::constants::{COURSES_TAG, ENROLLMENTS_TAG, STUDENTS_TAG};
use campus_kernel::server::{ApiError, ApiResult, ErrorBody, MessageBody};

/// New course; missing fields are reported as validation errors.
#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
pub(crate) struct CourseBody {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub course_description: Option<String>,
}

/// New student; missing fields are reported as validation errors.
#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
pub(crate) struct StudentBody {
    pub roll_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
pub(crate) struct EnrollBody {
    pub course_id: i64,
}

fn deleted() -> Json<MessageBody> {
    Json(MessageBody::new("Successfully deleted"))
}

// --- Courses ---

#[api_handler(
    post,
    path = "/api/course",
    request_body = CourseBody,
    responses(
        (status = CREATED, description = "Course created", body = Course),
        (status = BAD_REQUEST, description = "Missing name or code", body = ErrorBody),
        (status = CONFLICT, description = "Course code already exists"),
    ),
    tag = COURSES_TAG,
)]
pub(super) async fn create_course(
    State(registrar): State<Registrar>,
    Json(body): Json<CourseBody>,
) -> ApiResult<(StatusCode, Json<Course>)> {
    let course = registrar
        .manager
        .create_course(NewCourse {
            course_code: body.course_code.unwrap_or_default(),
            course_name: body.course_name.unwrap_or_default(),
            course_description: body.course_description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[api_handler(
    get,
    path = "/api/course/{course_id}",
    params(("course_id" = i64, Path, description = "Course id")),
    responses(
        (status = OK, body = Course),
        (status = NOT_FOUND, body = MessageBody),
    ),
    tag = COURSES_TAG,
)]
pub(super) async fn read_course(
    State(registrar): State<Registrar>,
    Path(course_id): Path<i64>,
) -> ApiResult<Json<Course>> {
    Ok(Json(registrar.manager.course(course_id).await?))
}

#[api_handler(
    put,
    path = "/api/course/{course_id}",
    params(("course_id" = i64, Path, description = "Course id")),
    request_body = CoursePatch,
    responses(
        (status = OK, body = Course),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = NOT_FOUND, body = MessageBody),
        (status = CONFLICT, description = "Course code already exists"),
    ),
    tag = COURSES_TAG,
)]
pub(super) async fn amend_course(
    State(registrar): State<Registrar>,
    Path(course_id): Path<i64>,
    Json(patch): Json<CoursePatch>,
) -> ApiResult<Json<Course>> {
    Ok(Json(registrar.manager.amend_course(course_id, patch).await?))
}

#[api_handler(
    delete,
    path = "/api/course/{course_id}",
    params(("course_id" = i64, Path, description = "Course id")),
    responses(
        (status = OK, body = MessageBody),
        (status = NOT_FOUND, body = MessageBody),
    ),
    tag = COURSES_TAG,
)]
pub(super) async fn delete_course(
    State(registrar): State<Registrar>,
    Path(course_id): Path<i64>,
) -> ApiResult<Json<MessageBody>> {
    registrar.manager.delete_course(course_id).await?;
    Ok(deleted())
}

// --- Students ---

#[api_handler(
    post,
    path = "/api/student",
    request_body = StudentBody,
    responses(
        (status = CREATED, description = "Student created", body = Student),
        (status = BAD_REQUEST, description = "Missing roll number or first name", body = ErrorBody),
        (status = CONFLICT, description = "Roll number already exists"),
    ),
    tag = STUDENTS_TAG,
)]
pub(super) async fn create_student(
    State(registrar): State<Registrar>,
    Json(body): Json<StudentBody>,
) -> ApiResult<(StatusCode, Json<Student>)> {
    let student = registrar
        .manager
        .create_student(NewStudent {
            roll_number: body.roll_number.unwrap_or_default(),
            first_name: body.first_name.unwrap_or_default(),
            last_name: body.last_name,
            course_ids: Vec::new(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[api_handler(
    get,
    path = "/api/student/{student_id}",
    params(("student_id" = i64, Path, description = "Student id")),
    responses(
        (status = OK, body = Student),
        (status = NOT_FOUND, body = MessageBody),
    ),
    tag = STUDENTS_TAG,
)]
pub(super) async fn read_student(
    State(registrar): State<Registrar>,
    Path(student_id): Path<i64>,
) -> ApiResult<Json<Student>> {
    Ok(Json(registrar.manager.student(student_id).await?))
}

#[api_handler(
    put,
    path = "/api/student/{student_id}",
    params(("student_id" = i64, Path, description = "Student id")),
    request_body = StudentPatch,
    responses(
        (status = OK, body = Student),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = NOT_FOUND, body = MessageBody),
        (status = CONFLICT, description = "Roll number already exists"),
    ),
    tag = STUDENTS_TAG,
)]
pub(super) async fn amend_student(
    State(registrar): State<Registrar>,
    Path(student_id): Path<i64>,
    Json(patch): Json<StudentPatch>,
) -> ApiResult<Json<Student>> {
    Ok(Json(registrar.manager.amend_student(student_id, patch).await?))
}

#[api_handler(
    delete,
    path = "/api/student/{student_id}",
    params(("student_id" = i64, Path, description = "Student id")),
    responses(
        (status = OK, body = MessageBody),
        (status = NOT_FOUND, body = MessageBody),
    ),
    tag = STUDENTS_TAG,
)]
pub(super) async fn delete_student(
    State(registrar): State<Registrar>,
    Path(student_id): Path<i64>,
) -> ApiResult<Json<MessageBody>> {
    registrar.manager.delete_student(student_id).await?;
    Ok(deleted())
}

// --- Enrollments ---

#[api_handler(
    get,
    path = "/api/student/{student_id}/course",
    params(("student_id" = i64, Path, description = "Student id")),
    responses(
        (status = OK, body = Vec<Enrollment>),
        (status = NOT_FOUND, description = "No enrollments", body = MessageBody),
    ),
    tag = ENROLLMENTS_TAG,
)]
pub(super) async fn list_enrollments(
    State(registrar): State<Registrar>,
    Path(student_id): Path<i64>,
) -> ApiResult<Json<Vec<Enrollment>>> {
    let enrollments = registrar.manager.enrollments(student_id).await?;
    if enrollments.is_empty() {
        return Err(ApiError::NotFound { code: None, message: "Enrollment not found".into() });
    }
    Ok(Json(enrollments))
}

#[api_handler(
    post,
    path = "/api/student/{student_id}/course",
    params(("student_id" = i64, Path, description = "Student id")),
    request_body = EnrollBody,
    responses(
        (status = CREATED, body = Vec<Enrollment>),
        (status = NOT_FOUND, description = "Unknown student or course", body = ErrorBody),
    ),
    tag = ENROLLMENTS_TAG,
)]
pub(super) async fn enroll(
    State(registrar): State<Registrar>,
    Path(student_id): Path<i64>,
    Json(body): Json<EnrollBody>,
) -> ApiResult<(StatusCode, Json<Vec<Enrollment>>)> {
    let enrollment = registrar.manager.enroll(student_id, body.course_id).await?;
    Ok((StatusCode::CREATED, Json(vec![enrollment])))
}

#[api_handler(
    delete,
    path = "/api/student/{student_id}/course/{course_id}",
    params(
        ("student_id" = i64, Path, description = "Student id"),
        ("course_id" = i64, Path, description = "Course id"),
    ),
    responses(
        (status = OK, body = MessageBody),
        (status = NOT_FOUND, body = MessageBody),
    ),
    tag = ENROLLMENTS_TAG,
)]
pub(super) async fn withdraw(
    State(registrar): State<Registrar>,
    Path((student_id, course_id)): Path<(i64, i64)>,
) -> ApiResult<Json<MessageBody>> {
    if registrar.manager.withdraw(student_id, course_id).await? {
        Ok(deleted())
    } else {
        Err(ApiError::NotFound { code: None, message: "Enrollment not found".into() })
    }
}
