//! Text encoders for analysis results: CSV and ARFF, plus the shared
//! percentage formatter and the dated artifact naming every export uses.
//!
//! All encoders are pure functions over [`AnalysisResult`] and are
//! deterministic for identical input. Field joining is bare commas with no
//! quoting; values containing commas would split on re-parse.

use time::macros::format_description;
use time::Date;

use crate::analysis::AnalysisResult;

/// Formats a fractional metric as a percentage with exactly two decimals.
///
/// Every encoder goes through here so all artifacts round identically
/// (rounding, never truncation).
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Deterministic artifact name: `<stem>-<YYYY-MM-DD>.<ext>`.
pub fn artifact_filename(stem: &str, date: Date, extension: &str) -> String {
    let format = format_description!("[year]-[month]-[day]");
    let date_str = date.format(&format).unwrap_or_default();
    format!("{stem}-{date_str}.{extension}")
}

/// Encodes a result as CSV text: a metric/value section, a blank line, then
/// the labeled confusion-matrix section.
pub fn results_csv(result: &AnalysisResult) -> String {
    let mut out = String::from("Metric,Value\n");
    for (label, value) in result.headline_metrics() {
        out.push_str(&format!("{label},{}\n", percent(value)));
    }
    out.push('\n');
    out.push_str("Confusion Matrix\n");
    out.push_str(",Predicted Positive,Predicted Negative\n");
    let [[tp, fp], [fn_, tn]] = result.confusion.rows();
    out.push_str(&format!("Real Positive,{tp},{fp}\n"));
    out.push_str(&format!("Real Negative,{fn_},{tn}\n"));
    out
}

/// Encodes a result as ARFF text: a relation header, four numeric attribute
/// declarations and exactly one `@DATA` row of the raw fractional values.
pub fn results_arff(result: &AnalysisResult) -> String {
    format!(
        "% {} evaluation results\n\
         @RELATION results\n\
         \n\
         @ATTRIBUTE precision NUMERIC\n\
         @ATTRIBUTE recall NUMERIC\n\
         @ATTRIBUTE f1score NUMERIC\n\
         @ATTRIBUTE rocauc NUMERIC\n\
         \n\
         @DATA\n\
         {},{},{},{}\n",
        result.algorithm_label,
        result.accuracy,
        result.metrics.recall,
        result.metrics.f1,
        result.metrics.roc_auc,
    )
}
