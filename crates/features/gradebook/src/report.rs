use crate::error::GradebookError;
use crate::scores::{ScoreRecord, ScoreTable};
use serde::Serialize;

/// Bin count used when a chart is drawn without an explicit choice.
pub const DEFAULT_BINS: usize = 10;

/// All rows of one student and the sum of their marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentReport {
    pub student_id: String,
    pub rows: Vec<ScoreRecord>,
    pub total: i64,
}

/// Average and maximum marks of one course, with the marks they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseReport {
    pub course_id: i64,
    pub average: f64,
    pub maximum: i64,
    pub marks: Vec<i64>,
}

impl ScoreTable {
    /// Rows whose `student_id` equals the trimmed `student_id`.
    ///
    /// # Errors
    /// * [`GradebookError::NotFound`] if no row matches.
    /// * [`GradebookError::Malformed`] if the total does not fit in an `i64`.
    pub fn student_report(&self, student_id: &str) -> Result<StudentReport, GradebookError> {
        let student_id = student_id.trim();
        let rows: Vec<ScoreRecord> =
            self.records().iter().filter(|r| r.student_id == student_id).cloned().collect();

        if rows.is_empty() {
            return Err(GradebookError::not_found(format!("Student ID {student_id} not found")));
        }

        let total = rows
            .iter()
            .try_fold(0_i64, |total, r| total.checked_add(r.marks))
            .ok_or_else(|| {
                GradebookError::malformed(format!("Total marks of student {student_id} overflow"))
            })?;
        Ok(StudentReport { student_id: student_id.to_owned(), rows, total })
    }

    /// Statistics over rows whose `course_id` is numerically equal to `course_id`.
    /// Rows with a non-numeric `course_id` never match.
    ///
    /// # Errors
    /// * [`GradebookError::Malformed`] if `course_id` is not an integer.
    /// * [`GradebookError::NotFound`] if no row matches.
    pub fn course_report(&self, course_id: &str) -> Result<CourseReport, GradebookError> {
        let raw = course_id.trim();
        let course_id = raw
            .parse::<i64>()
            .map_err(|_| GradebookError::malformed(format!("Course ID '{raw}' is not a number")))?;

        let marks: Vec<i64> = self
            .records()
            .iter()
            .filter(|r| r.course_id.parse::<i64>().is_ok_and(|id| id == course_id))
            .map(|r| r.marks)
            .collect();

        let Some(&maximum) = marks.iter().max() else {
            return Err(GradebookError::not_found(format!("Course ID {course_id} not found")));
        };
        let sum: i128 = marks.iter().copied().map(i128::from).sum();
        let average = sum as f64 / marks.len() as f64;

        Ok(CourseReport { course_id, average, maximum, marks })
    }
}

/// One histogram bar covering `[lower, upper)`; the last bar also includes `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width frequency distribution of a marks list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Splits `[min, max]` of `marks` into `bins` equal-width bins.
    ///
    /// When every mark is the same value `v` the range becomes `[v - 0.5, v + 0.5]`.
    /// No marks or zero bins yield an empty histogram.
    #[must_use]
    pub fn from_marks(marks: &[i64], bins: usize) -> Self {
        let (Some(&min), Some(&max)) = (marks.iter().min(), marks.iter().max()) else {
            return Self::default();
        };
        if bins == 0 {
            return Self::default();
        }

        let (low, high) = if min == max {
            (min as f64 - 0.5, max as f64 + 0.5)
        } else {
            (min as f64, max as f64)
        };
        let width = (high - low) / bins as f64;

        let mut counts = vec![0_usize; bins];
        for &mark in marks {
            let offset = ((mark as f64 - low) / width).floor();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = (offset.max(0.0) as usize).min(bins - 1);
            counts[index] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                lower: width.mul_add(i as f64, low),
                upper: width.mul_add((i + 1) as f64, low),
                count,
            })
            .collect();
        Self { bins }
    }

    /// Height of the tallest bar.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ScoreTable {
        let rows = [("1", "10", 80), ("1", "20", 90), ("2", "10", 70)];
        ScoreTable::new(
            rows.into_iter()
                .map(|(s, c, m)| ScoreRecord {
                    student_id: s.into(),
                    course_id: c.into(),
                    marks: m,
                })
                .collect(),
        )
    }

    #[test]
    fn student_report_sums_all_and_only_matching_rows() {
        let report = table().student_report(" 1 ").expect("student 1");
        assert_eq!(report.rows.len(), 2);
        assert!(report.rows.iter().all(|r| r.student_id == "1"));
        assert_eq!(report.total, 170);
    }

    #[test]
    fn course_report_computes_average_and_maximum() {
        let report = table().course_report("10").expect("course 10");
        assert!((report.average - 75.0).abs() < f64::EPSILON);
        assert_eq!(report.maximum, 80);
        assert_eq!(report.marks, vec![80, 70]);
    }

    #[test]
    fn course_ids_compare_numerically() {
        let report = table().course_report("010").expect("same course");
        assert_eq!(report.course_id, 10);
    }

    #[test]
    fn absent_ids_are_not_found() {
        assert!(matches!(table().student_report("3"), Err(GradebookError::NotFound { .. })));
        assert!(matches!(table().course_report("30"), Err(GradebookError::NotFound { .. })));
    }

    #[test]
    fn non_numeric_course_id_is_malformed() {
        assert!(matches!(table().course_report("abc"), Err(GradebookError::Malformed { .. })));
    }

    #[test]
    fn extreme_marks_do_not_overflow() {
        let table = ScoreTable::new(vec![
            ScoreRecord { student_id: "1".into(), course_id: "10".into(), marks: i64::MAX },
            ScoreRecord { student_id: "1".into(), course_id: "10".into(), marks: 1 },
        ]);

        assert!(matches!(table.student_report("1"), Err(GradebookError::Malformed { .. })));

        let report = table.course_report("10").expect("course 10");
        assert_eq!(report.maximum, i64::MAX);
        assert!((report.average - i64::MAX as f64 / 2.0).abs() / report.average < 1e-12);
    }

    #[test]
    fn histogram_counts_every_mark_once() {
        let histogram = Histogram::from_marks(&[0, 5, 10, 55, 99, 100], DEFAULT_BINS);
        assert_eq!(histogram.bins.len(), 10);
        assert_eq!(histogram.bins.iter().map(|b| b.count).sum::<usize>(), 6);
        assert_eq!(histogram.bins[0].count, 2);
        assert_eq!(histogram.bins[9].count, 2);
        assert!((histogram.bins[0].lower - 0.0).abs() < f64::EPSILON);
        assert!((histogram.bins[9].upper - 100.0).abs() < f64::EPSILON);
        assert_eq!(histogram.peak(), 2);
    }

    #[test]
    fn identical_marks_widen_the_range() {
        let histogram = Histogram::from_marks(&[70, 70, 70], 10);
        assert!((histogram.bins[0].lower - 69.5).abs() < 1e-9);
        assert!((histogram.bins[9].upper - 70.5).abs() < 1e-9);
        assert_eq!(histogram.bins[5].count, 3);
    }

    #[test]
    fn empty_input_gives_empty_histogram() {
        assert!(Histogram::from_marks(&[], 10).bins.is_empty());
        assert!(Histogram::from_marks(&[1, 2], 0).bins.is_empty());
    }
}
