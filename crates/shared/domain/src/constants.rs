//! Table names and OpenAPI tags used across slices.

pub const STUDENT: &str = "student";
pub const COURSE: &str = "course";
pub const ENROLLMENT: &str = "enrollment";
pub const COUNTER: &str = "counter";

pub const STUDENTS_TAG: &str = "Students";
pub const COURSES_TAG: &str = "Courses";
pub const ENROLLMENTS_TAG: &str = "Enrollments";
pub const SYSTEM_TAG: &str = "System";
