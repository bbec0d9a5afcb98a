//! Flat score table loaded from CSV.
//!
//! The first row is a header. Every field is trimmed, so `1, 10, 80` and
//! `1,10,80` read the same. Rows are kept in file order.

use crate::error::{GradebookError, GradebookErrorExt};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// One `(student_id, course_id, marks)` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRecord {
    pub student_id: String,
    pub course_id: String,
    pub marks: i64,
}

/// All rows of a score file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable {
    records: Vec<ScoreRecord>,
}

impl ScoreTable {
    #[must_use]
    pub const fn new(records: Vec<ScoreRecord>) -> Self {
        Self { records }
    }

    /// Reads the table from a file.
    ///
    /// # Errors
    /// * [`GradebookError::Io`] if the file cannot be opened.
    /// * [`GradebookError::Malformed`] for a short row or a non-integer mark.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GradebookError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .context(format!("Failed to open score file: {}", path.display()))?;
        let table = Self::from_reader(file)?;
        tracing::debug!(path = %path.display(), rows = table.len(), "Score table loaded");
        Ok(table)
    }

    /// Reads the table from any CSV source.
    ///
    /// # Errors
    /// * [`GradebookError::Csv`] if the input is not valid CSV.
    /// * [`GradebookError::Malformed`] for a short row or a non-integer mark.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GradebookError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(parse_row(&row)?);
        }
        Ok(Self { records })
    }

    #[must_use]
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_row(row: &StringRecord) -> Result<ScoreRecord, GradebookError> {
    let line = row.position().map_or(0, csv::Position::line);
    let (Some(student_id), Some(course_id), Some(marks)) = (row.get(0), row.get(1), row.get(2))
    else {
        return Err(GradebookError::Malformed {
            message: format!("expected 3 fields, found {}", row.len()).into(),
            context: Some(format!("line {line}").into()),
        });
    };

    let marks = marks.parse::<i64>().map_err(|_| GradebookError::Malformed {
        message: format!("marks '{marks}' is not an integer").into(),
        context: Some(format!("line {line}").into()),
    })?;

    Ok(ScoreRecord { student_id: student_id.to_owned(), course_id: course_id.to_owned(), marks })
}
