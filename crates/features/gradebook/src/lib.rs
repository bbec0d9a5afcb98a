//! Score report feature slice.
//!
//! Reads a flat `(student_id, course_id, marks)` CSV table and answers two
//! questions about it: every row and the total of one student, and the
//! average, maximum and distribution of one course. The `report` binary
//! writes the answers to files; the optional `server` feature serves them
//! under `/report`.

mod error;
pub mod render;
mod report;
mod scores;
#[cfg(feature = "server")]
pub mod server;

pub use crate::error::{GradebookError, GradebookErrorExt};
pub use crate::report::{Bin, CourseReport, DEFAULT_BINS, Histogram, StudentReport};
pub use crate::scores::{ScoreRecord, ScoreTable};

use campus_kernel::domain::config::ApiConfig;
use campus_kernel::domain::registry::InitializedSlice;
use std::path::PathBuf;

/// Gradebook feature state.
#[campus_derive::campus_slice]
pub struct Gradebook {
    /// CSV file read on every request.
    pub data_file: PathBuf,
}

impl Gradebook {
    /// Loads the current contents of the score file.
    ///
    /// # Errors
    /// See [`ScoreTable::load`].
    pub fn scores(&self) -> Result<ScoreTable, GradebookError> {
        ScoreTable::load(&self.data_file)
    }
}

/// Initialize the gradebook feature from the `[report]` configuration.
///
/// A missing data file is not an error here; it surfaces on the first report.
///
/// # Errors
/// None at present: the data file is opened per report, not here.
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, GradebookError> {
    let data_file = config.report.data_file.clone();
    if !data_file.exists() {
        tracing::warn!(path = %data_file.display(), "Score file does not exist yet");
    }
    let slice = Gradebook::new(GradebookInner { data_file });
    tracing::info!("Gradebook slice initialized");
    Ok(InitializedSlice::new(slice))
}
