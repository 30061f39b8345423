mod fonts;

use crate::model::leave_request::LeaveRequest;
use crate::model::user::User;
use chrono::NaiveDate;
use fonts::Metrics;
use genpdf::elements::{Break, Paragraph};
use genpdf::style::Style;
use genpdf::{Alignment, Document, Element as _, Margins, PaperSize, SimplePageDecorator};
use thiserror::Error;
use ttf_parser::FaceParsingError;

const TITLE_SIZE: u8 = 20;
const BODY_SIZE: u8 = 12;

const PAGE_WIDTH_MM: f64 = 215.9; // US Letter
const MARGIN_MM: f64 = 25.0;
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Usable line width in points. A little narrower than the printable area so
/// the renderer never has to re-wrap a line this module already broke.
pub const TEXT_WIDTH_PT: f64 = (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) * PT_PER_MM - 4.0;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("font metrics unavailable: {0}")]
    Font(#[from] FaceParsingError),
    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] genpdf::error::Error),
}

/// One laid-out row of the report, already wrapped to [`TEXT_WIDTH_PT`].
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Title(String),
    Body(String),
    Gap,
}

/// e.g. `Mon Jan 01 2024`
fn display_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Greedy word wrap. Words wider than the whole line are split between
/// characters.
fn wrap(text: &str, metrics: &Metrics, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if metrics.width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for c in word.chars() {
            current.push(c);
            if current.chars().count() > 1 && metrics.width(&current, size) > max_width {
                current.pop();
                lines.push(std::mem::replace(&mut current, c.to_string()));
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Title for the teacher, then a `From/To/Reason/Status` block per leave.
pub fn layout(teacher: &User, leaves: &[LeaveRequest]) -> Result<Vec<Line>, ReportError> {
    let bold = Metrics::bold()?;
    let regular = Metrics::regular()?;
    let body_size = f64::from(BODY_SIZE);

    let mut lines: Vec<Line> = wrap(
        &format!("Leave Report for {}", teacher.name),
        &bold,
        f64::from(TITLE_SIZE),
        TEXT_WIDTH_PT,
    )
    .into_iter()
    .map(Line::Title)
    .collect();
    lines.push(Line::Gap);

    for leave in leaves {
        let fields = [
            format!("From: {}", display_date(leave.start_date)),
            format!("To: {}", display_date(leave.end_date)),
            format!("Reason: {}", leave.reason),
            format!("Status: {}", leave.status),
        ];
        for field in &fields {
            lines.extend(
                wrap(field, &regular, body_size, TEXT_WIDTH_PT)
                    .into_iter()
                    .map(Line::Body),
            );
        }
        lines.push(Line::Gap);
    }

    Ok(lines)
}

/// Whole document in memory, so a failure never leaves a half-sent body.
pub fn render_leave_report(teacher: &User, leaves: &[LeaveRequest]) -> Result<Vec<u8>, ReportError> {
    let lines = layout(teacher, leaves)?;

    let mut doc = Document::new(fonts::family()?);
    doc.set_title(format!("Leave Report for {}", teacher.name));
    doc.set_paper_size(PaperSize::Letter);
    doc.set_font_size(BODY_SIZE);

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(Margins::all(MARGIN_MM));
    doc.set_page_decorator(decorator);

    for line in lines {
        match line {
            Line::Title(text) => doc.push(
                Paragraph::new(text)
                    .aligned(Alignment::Center)
                    .styled(Style::new().bold().with_font_size(TITLE_SIZE)),
            ),
            Line::Body(text) => doc.push(Paragraph::new(text)),
            Line::Gap => doc.push(Break::new(1)),
        }
    }

    let mut pdf = Vec::new();
    doc.render(&mut pdf)?;
    Ok(pdf)
}

/// `leave-report-<name>.pdf`, with anything that could upset a header or a
/// file system replaced by `_`.
pub fn attachment_filename(teacher_name: &str) -> String {
    let safe: String = teacher_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("leave-report-{}.pdf", safe.trim())
}
