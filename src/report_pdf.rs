//! PDF rendering for evaluation reports.
//!
//! Two document shapes: the results report (title block, metrics table,
//! labeled confusion matrix) and the clinical report (free-text narrative,
//! word-wrapped and paginated). Both return finished PDF bytes; callers own
//! naming and persistence. Tables are set in a monospaced builtin face so
//! columns align without drawing machinery.

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, TextItem,
};

use crate::analysis::AnalysisResult;
use crate::export::percent;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_PT: f32 = 14.0;
const LINES_PER_PAGE: usize = 50;

/// Column at which clinical narrative lines wrap.
pub const WRAP_COLUMNS: usize = 90;

struct Line {
    text: String,
    font: BuiltinFont,
    size: f32,
}

fn heading(text: impl Into<String>, size: f32) -> Line {
    Line {
        text: text.into(),
        font: BuiltinFont::HelveticaBold,
        size,
    }
}

fn body(text: impl Into<String>) -> Line {
    Line {
        text: text.into(),
        font: BuiltinFont::Helvetica,
        size: 12.0,
    }
}

fn table(text: impl Into<String>) -> Line {
    Line {
        text: text.into(),
        font: BuiltinFont::Courier,
        size: 11.0,
    }
}

fn blank() -> Line {
    body("")
}

/// Renders the results report: title block, two-column metrics table and
/// the labeled 2x2 confusion matrix.
pub fn results_document(result: &AnalysisResult, dataset_name: &str) -> Vec<u8> {
    let mut lines = vec![
        heading("Evaluation Results", 20.0),
        blank(),
        body(format!("Dataset: {dataset_name}")),
        body(format!("Algorithm: {}", result.algorithm_label)),
        blank(),
        heading("Metrics", 14.0),
        table(format!("{:<12}{:>10}", "Metric", "Value")),
    ];
    for (label, value) in result.headline_metrics() {
        lines.push(table(format!("{label:<12}{:>10}", percent(value))));
    }
    lines.push(blank());
    lines.push(heading("Confusion Matrix", 14.0));
    let [[tp, fp], [fn_, tn]] = result.confusion.rows();
    lines.push(table(format!(
        "{:<14}{:>20}{:>20}",
        "", "Predicted Positive", "Predicted Negative"
    )));
    lines.push(table(format!("{:<14}{tp:>20}{fp:>20}", "Real Positive")));
    lines.push(table(format!("{:<14}{fn_:>20}{tn:>20}", "Real Negative")));
    render("Evaluation Results", lines)
}

/// Renders the clinical narrative as a word-wrapped, paginated document.
pub fn clinical_document(report: &str) -> Vec<u8> {
    let mut lines = vec![heading("Clinical Report", 16.0), blank()];
    for raw_line in report.lines() {
        if raw_line.trim().is_empty() {
            lines.push(blank());
            continue;
        }
        for wrapped in wrap_text(raw_line, WRAP_COLUMNS) {
            lines.push(Line {
                text: wrapped,
                font: BuiltinFont::Helvetica,
                size: 11.0,
            });
        }
    }
    render("Clinical Report", lines)
}

/// Greedy word wrap. A single word longer than `max` stays on its own line.
fn wrap_text(line: &str, max: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn render(title: &str, lines: Vec<Line>) -> Vec<u8> {
    let mut doc = PdfDocument::new(title);
    let pages: Vec<PdfPage> = lines
        .chunks(LINES_PER_PAGE)
        .map(|chunk| PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), page_ops(chunk)))
        .collect();
    doc.with_pages(pages)
        .save(&PdfSaveOptions::default(), &mut Vec::new())
}

fn page_ops(lines: &[Line]) -> Vec<Op> {
    let mut ops = vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point {
                x: Mm(MARGIN_MM).into(),
                y: Mm(PAGE_HEIGHT_MM - MARGIN_MM).into(),
            },
        },
        Op::SetLineHeight {
            lh: Pt(LINE_HEIGHT_PT),
        },
    ];
    for line in lines {
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(line.size),
            font: line.font,
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(line.text.clone())],
            font: line.font,
        });
        ops.push(Op::AddLineBreak);
    }
    ops.push(Op::EndTextSection);
    ops
}
