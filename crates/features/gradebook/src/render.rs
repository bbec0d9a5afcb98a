//! HTML pages and the SVG histogram for score reports.

use crate::error::GradebookError;
use crate::report::{CourseReport, Histogram, StudentReport};
use minijinja::{Environment, context};
use serde::Serialize;
use std::sync::LazyLock;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("form.html", include_str!("../templates/form.html")),
    ("student_details.html", include_str!("../templates/student_details.html")),
    ("course_details.html", include_str!("../templates/course_details.html")),
    ("error.html", include_str!("../templates/error.html")),
    ("histogram.svg", include_str!("../templates/histogram.svg")),
];

static PAGES: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_loader(|name| {
        Ok(TEMPLATES.iter().find(|(n, _)| *n == name).map(|(_, source)| (*source).to_owned()))
    });
    env
});

const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 48.0;

/// How a course page shows its histogram.
#[derive(Debug, Clone, Copy)]
pub enum Chart<'a> {
    /// `<img>` pointing at a separately written file.
    Image(&'a str),
    /// SVG markup placed directly in the page.
    Inline(&'a str),
}

/// Where the "Go Back" link of a page points, if anywhere.
pub type BackLink<'a> = Option<&'a str>;

fn render<S: Serialize>(name: &str, ctx: S) -> Result<String, GradebookError> {
    Ok(PAGES.get_template(name)?.render(ctx)?)
}

/// The student/course selection form.
///
/// # Errors
/// Template failures only.
pub fn form_page() -> Result<String, GradebookError> {
    render("form.html", context! {})
}

/// # Errors
/// Template failures only.
pub fn student_page(report: &StudentReport, back: BackLink<'_>) -> Result<String, GradebookError> {
    render("student_details.html", context! { report, back })
}

/// # Errors
/// Template failures only.
pub fn course_page(
    report: &CourseReport,
    chart: Chart<'_>,
    back: BackLink<'_>,
) -> Result<String, GradebookError> {
    let (chart_src, chart_svg) = match chart {
        Chart::Image(src) => (Some(src), None),
        Chart::Inline(svg) => (None, Some(svg)),
    };
    render("course_details.html", context! { report, chart_src, chart_svg, back })
}

/// Generic "Wrong Inputs" page, with an optional detail line.
///
/// # Errors
/// Template failures only.
pub fn error_page(message: Option<&str>, back: BackLink<'_>) -> Result<String, GradebookError> {
    render("error.html", context! { message, back })
}

#[derive(Debug, Serialize)]
struct Bar {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    count: usize,
}

#[derive(Debug, Serialize)]
struct Tick {
    position: f64,
    label: String,
}

/// Draws the histogram as a standalone SVG document.
///
/// # Errors
/// Template failures only.
pub fn histogram_svg(histogram: &Histogram) -> Result<String, GradebookError> {
    let (left, right) = (MARGIN_LEFT, CHART_WIDTH - MARGIN_RIGHT);
    let (top, bottom) = (MARGIN_TOP, CHART_HEIGHT - MARGIN_BOTTOM);
    let peak = histogram.peak().max(1);
    let slot = (right - left) / histogram.bins.len().max(1) as f64;
    let scale = (bottom - top) / peak as f64;

    let bars: Vec<Bar> = histogram
        .bins
        .iter()
        .enumerate()
        .map(|(i, bin)| {
            let height = bin.count as f64 * scale;
            Bar {
                x: round(slot.mul_add(i as f64, left)),
                y: round(bottom - height),
                width: round(slot),
                height: round(height),
                count: bin.count,
            }
        })
        .collect();

    let mut x_ticks: Vec<Tick> = histogram
        .bins
        .iter()
        .enumerate()
        .map(|(i, bin)| Tick {
            position: round(slot.mul_add(i as f64, left)),
            label: label(bin.lower),
        })
        .collect();
    if let Some(last) = histogram.bins.last() {
        x_ticks.push(Tick { position: round(right), label: label(last.upper) });
    }

    let step = peak.div_ceil(5);
    let y_ticks: Vec<Tick> = (0..=peak)
        .step_by(step)
        .map(|count| Tick {
            position: round(bottom - count as f64 * scale),
            label: count.to_string(),
        })
        .collect();

    render(
        "histogram.svg",
        context! {
            width => CHART_WIDTH,
            height => CHART_HEIGHT,
            left, right, top, bottom,
            bars, x_ticks, y_ticks,
        },
    )
}

fn round(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn label(edge: f64) -> String {
    if (edge - edge.round()).abs() < 1e-9 { format!("{edge:.0}") } else { format!("{edge:.1}") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::DEFAULT_BINS;
    use crate::scores::{ScoreRecord, ScoreTable};

    fn table() -> ScoreTable {
        ScoreTable::new(vec![
            ScoreRecord { student_id: "1".into(), course_id: "10".into(), marks: 80 },
            ScoreRecord { student_id: "1".into(), course_id: "20".into(), marks: 90 },
            ScoreRecord { student_id: "<b>2</b>".into(), course_id: "10".into(), marks: 70 },
        ])
    }

    #[test]
    fn every_template_parses() {
        for (name, _) in TEMPLATES {
            assert!(PAGES.get_template(name).is_ok(), "{name} should compile");
        }
    }

    #[test]
    fn student_page_lists_rows_and_total() {
        let report = table().student_report("1").expect("report");
        let html = student_page(&report, None).expect("page");
        assert!(html.contains("<td>20</td>"));
        assert!(html.contains("<td>170</td>"));
        assert!(!html.contains("Go Back"));
    }

    #[test]
    fn student_ids_are_escaped() {
        let report = table().student_report("<b>2</b>").expect("report");
        let html = student_page(&report, Some("/report")).expect("page");
        assert!(html.contains("&lt;b&gt;2&lt;/b&gt;"));
        assert!(html.contains("Go Back"));
    }

    #[test]
    fn course_page_links_or_inlines_the_chart() {
        let report = table().course_report("10").expect("report");
        let html = course_page(&report, Chart::Image("image.svg"), None).expect("page");
        assert!(html.contains("<td>75.0</td>"));
        assert!(html.contains("<td>80</td>"));
        assert!(html.contains("src=\"image.svg\""));

        let svg = histogram_svg(&Histogram::from_marks(&report.marks, DEFAULT_BINS)).expect("svg");
        let html = course_page(&report, Chart::Inline(&svg), None).expect("page");
        assert!(html.contains("<svg"));
        assert!(!html.contains("&lt;svg"));
    }

    #[test]
    fn svg_has_one_bar_per_bin() {
        let svg = histogram_svg(&Histogram::from_marks(&[10, 20, 20, 30], 4)).expect("svg");
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("fill=\"#1f77b4\"").count(), 4);
        assert!(svg.contains(">Frequency<"));
    }

    #[test]
    fn error_page_has_fixed_heading() {
        let html = error_page(Some("Student ID 9 not found"), None).expect("page");
        assert!(html.contains("Wrong Inputs"));
        assert!(html.contains("Student ID 9 not found"));
    }
}
