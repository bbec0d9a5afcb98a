use campus_derive::api_model;
use surrealdb::types::SurrealValue;

#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq, SurrealValue)]
pub struct Student {
    pub student_id: i64,
    pub roll_number: String,
    pub first_name: String,
    pub last_name: Option<String>,
}

#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq, SurrealValue)]
pub struct Course {
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub course_description: Option<String>,
}

/// One link between a student and a course. The same pair may appear more than once.
#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
#[derive(Clone, Copy, PartialEq, Eq, SurrealValue)]
pub struct Enrollment {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub course_id: i64,
}

/// Input of [`create_student`](crate::EnrollmentManager::create_student).
#[derive(Debug, Clone, Default)]
pub struct NewStudent {
    pub roll_number: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub course_ids: Vec<i64>,
}

/// Input of [`create_course`](crate::EnrollmentManager::create_course).
#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    pub course_code: String,
    pub course_name: String,
    pub course_description: Option<String>,
}

/// Partial student update; `None` keeps the stored value.
#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
#[derive(Clone, Default)]
pub struct StudentPatch {
    pub roll_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Partial course update; `None` keeps the stored value.
#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
#[derive(Clone, Default)]
pub struct CoursePatch {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub course_description: Option<String>,
}

/// Trims a required field; blank input yields an empty string.
pub(crate) fn required(value: &str) -> String {
    value.trim().to_owned()
}

/// Trims an optional field; blank input yields `None`.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

/// Drops repeated ids, keeping first occurrences in order.
pub(crate) fn distinct(ids: &[i64]) -> Vec<i64> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}
