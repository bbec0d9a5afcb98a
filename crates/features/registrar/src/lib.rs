//! Enrollment feature slice.
//!
//! Students, courses and the many-to-many enrollments between them, stored in
//! `SurrealDB`. The [`EnrollmentManager`] owns every consistency rule; the
//! optional `server` feature adds the HTML pages and the JSON API on top.

mod error;
mod manager;
mod model;
mod seed;
#[cfg(feature = "server")]
pub mod server;

pub use crate::error::{ErrorCode, RegistrarError, RegistrarErrorExt};
pub use crate::manager::EnrollmentManager;
pub use crate::model::{
    Course, CoursePatch, Enrollment, NewCourse, NewStudent, Student, StudentPatch,
};

use campus_database::{Database, Migration};
use campus_kernel::domain::registry::InitializedSlice;

pub const SLICE: &str = "registrar";

/// Schema of the `student`, `course`, `enrollment` and `counter` tables.
pub const MIGRATIONS: [Migration; 1] =
    [Migration::new(SLICE, "0001", include_str!("../migrations/0001_schema.surql"))];

/// Registrar feature state.
#[campus_derive::campus_slice]
pub struct Registrar {
    pub manager: EnrollmentManager,
}

/// Initialize the registrar feature over an open database.
///
/// # Errors
/// None at present: the slice only wraps the already connected database.
pub fn init(database: &Database) -> Result<InitializedSlice, RegistrarError> {
    let manager = EnrollmentManager::new(database.clone());
    let slice = Registrar::new(RegistrarInner { manager });
    tracing::info!("Registrar slice initialized");
    Ok(InitializedSlice::new(slice))
}
