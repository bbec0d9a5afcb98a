//! # Campus Report
//!
//! One-shot score report: `report -s <student_id>` or `report -c <course_id>`
//! reads the CSV table and writes an HTML page (and, for a course, an SVG
//! histogram next to it). Every failure is written to the same page, so the
//! process never signals errors through its exit code.

use campus_gradebook::render::{self, Chart};
use campus_gradebook::{DEFAULT_BINS, GradebookError, GradebookErrorExt, Histogram, ScoreTable};
use clap::{ArgGroup, Parser};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Page written when no `--output` is given.
pub const DEFAULT_OUTPUT: &str = "output.html";

#[derive(Debug, Parser)]
#[command(name = "report")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Score report for one student or one course")]
#[command(group(ArgGroup::new("target").required(true).args(["student", "course"])))]
pub struct Cli {
    /// Lists every row of the student and their total marks
    #[arg(short = 's', value_name = "STUDENT_ID")]
    pub student: Option<String>,

    /// Average and maximum marks of the course, with a histogram
    #[arg(short = 'c', value_name = "COURSE_ID")]
    pub course: Option<String>,

    /// CSV score table (header row, then student_id, course_id, marks)
    #[arg(long, value_name = "FILE", default_value = "data.csv")]
    pub data: PathBuf,

    /// HTML page to write
    #[arg(long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Histogram image to write for course reports
    #[arg(long, value_name = "FILE", default_value = "image.svg")]
    pub image: PathBuf,
}

/// What a report is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Student(&'a str),
    Course(&'a str),
}

impl Cli {
    #[must_use]
    pub fn target(&self) -> Option<Target<'_>> {
        self.student
            .as_deref()
            .map(Target::Student)
            .or_else(|| self.course.as_deref().map(Target::Course))
    }
}

/// Page the user asked for in `args`, even when the rest of them failed to parse.
///
/// Accepts `--output FILE` and `--output=FILE`; the last occurrence wins.
#[must_use]
pub fn requested_output<I>(args: I) -> PathBuf
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut requested = None;
    let mut args = args.into_iter().map(Into::into);
    while let Some(arg) = args.next() {
        if arg == "--output" {
            if let Some(value) = args.next() {
                requested = Some(value);
            }
        } else if let Some(value) = arg.strip_prefix("--output=") {
            requested = Some(value.to_owned());
        }
    }
    requested
        .filter(|path| !path.is_empty() && !path.starts_with('-'))
        .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from)
}

/// Writes the report page, or the error page if anything goes wrong.
pub fn execute(cli: &Cli) {
    match generate(cli) {
        Ok(()) => info!(output = %cli.output.display(), "Report written"),
        Err(err) => {
            if err.is_user_error() {
                warn!(error = %err, "Report input rejected");
            } else {
                error!(error = %err, "Report generation failed");
            }
            let detail = err.is_user_error().then(|| err.to_string());
            write_error_page(&cli.output, detail.as_deref());
        },
    }
}

/// Writes the error page to `output`; failures are only logged.
pub fn write_error_page(output: &Path, detail: Option<&str>) {
    let written = render::error_page(detail, None)
        .and_then(|html| write(output, &html, "Failed to write error page"));
    if let Err(err) = written {
        error!(error = %err, output = %output.display(), "Error page could not be written");
    }
}

/// Builds the report and writes its files.
///
/// # Errors
/// Any [`GradebookError`]: unreadable or malformed data, unknown ids, failed writes.
pub fn generate(cli: &Cli) -> Result<(), GradebookError> {
    let target = cli.target().ok_or_else(|| GradebookError::Malformed {
        message: "either -s or -c is required".into(),
        context: None,
    })?;
    let table = ScoreTable::load(&cli.data)?;

    let html = match target {
        Target::Student(student_id) => {
            render::student_page(&table.student_report(student_id)?, None)?
        },
        Target::Course(course_id) => {
            let report = table.course_report(course_id)?;
            let svg = render::histogram_svg(&Histogram::from_marks(&report.marks, DEFAULT_BINS))?;
            write(&cli.image, &svg, "Failed to write histogram")?;
            render::course_page(&report, Chart::Image(&image_src(&cli.output, &cli.image)), None)?
        },
    };

    write(&cli.output, &html, "Failed to write report")
}

fn write(path: &Path, contents: &str, what: &str) -> Result<(), GradebookError> {
    fs::write(path, contents).context(format!("{what}: {}", path.display()))
}

/// Image reference as seen from the page: the bare file name when both share a directory.
fn image_src(output: &Path, image: &Path) -> String {
    let dir = |path: &Path| path.parent().unwrap_or(Path::new("")).to_owned();
    let same_dir = dir(output) == dir(image);
    match image.file_name() {
        Some(name) if same_dir => name.to_string_lossy().into_owned(),
        _ => image.display().to_string(),
    }
}
