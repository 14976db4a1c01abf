//! HTML result page generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use examsim_core::report::{ExamSummary, ReportEntry};
use examsim_core::scoring::ScoreCard;
use examsim_core::session::FinishReason;
use examsim_core::timer::format_clock;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate the result page for a finished exam.
pub fn generate_html(summary: &ExamSummary) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Exam result — {:.2}%</title>\n",
        summary.score.percentage
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    let verdict_class = if summary.score.passed { "pass" } else { "fail" };
    html.push_str("<header>\n");
    html.push_str("<h1>Exam result</h1>\n");
    html.push_str(&format!(
        "<p class=\"score\">Score: <strong>{:.2}%</strong> ({}/{} correct, pass mark {:.0}%)</p>\n",
        summary.score.percentage,
        summary.score.correct,
        summary.score.total,
        summary.score.pass_threshold
    ));
    html.push_str(&format!(
        "<p class=\"verdict {verdict_class}\">{}</p>\n",
        html_escape(summary.verdict())
    ));
    let ending = match summary.reason {
        FinishReason::TimeExpired => "Time expired".to_string(),
        FinishReason::Manual => {
            format!("Finished with {} left", format_clock(summary.remaining_secs))
        }
    };
    html.push_str(&format!(
        "<p class=\"meta\">{} | started {} | session {}</p>\n",
        ending,
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        summary.session_id
    ));
    html.push_str(&generate_score_bar(&summary.score));
    html.push_str("</header>\n");

    // Per-question breakdown
    html.push_str("<section class=\"answers\">\n");
    html.push_str("<h2>Answers</h2>\n");
    html.push_str(
        "<label><input type=\"checkbox\" id=\"only-wrong\" onchange=\"filterWrong(this.checked)\"> Show incorrect only</label>\n",
    );
    html.push_str("<ol id=\"entries\">\n");
    for entry in &summary.entries {
        html.push_str(&entry_html(entry));
    }
    html.push_str("</ol>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(summary)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the result page to a file.
pub fn write_html_report(summary: &ExamSummary, path: &Path) -> Result<()> {
    let html = generate_html(summary);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn entry_html(entry: &ReportEntry) -> String {
    let class = if entry.correct { "correct" } else { "incorrect" };
    let mut li = format!("<li class=\"{class}\" value=\"{}\">\n", entry.number);
    li.push_str(&format!(
        "  <strong>Question {}:</strong> {}<br>\n",
        entry.number,
        html_escape(&entry.question)
    ));
    li.push_str(&format!(
        "  <strong>Chosen:</strong> {}<br>\n",
        html_escape(&entry.selected_display())
    ));
    if let Some(expected) = entry.expected_display() {
        li.push_str(&format!(
            "  <strong>Correct:</strong> {}<br>\n",
            html_escape(&expected)
        ));
    }
    li.push_str("</li>\n");
    li
}

fn generate_score_bar(score: &ScoreCard) -> String {
    let max_width = 400.0;
    let height = 24;
    let width = score.percentage / 100.0 * max_width;
    let threshold_x = score.pass_threshold / 100.0 * max_width;
    let color = if score.passed { "#22c55e" } else { "#ef4444" };

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        max_width + 60.0,
        height + 8
    );
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"4\" width=\"{max_width}\" height=\"{height}\" fill=\"var(--border)\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"4\" width=\"{width:.1}\" height=\"{height}\" fill=\"{color}\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <line x1=\"{threshold_x:.1}\" y1=\"0\" x2=\"{threshold_x:.1}\" y2=\"{}\" stroke=\"currentColor\" stroke-width=\"2\"/>\n",
        height + 8
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
        max_width + 8.0,
        4 + height / 2,
        score.percentage
    ));
    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { font-size: 1.25rem; }
.verdict { padding: 0.5rem 1rem; border-radius: 8px; display: inline-block; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
ol li { border: 1px solid var(--border); border-radius: 8px; padding: 0.75rem 1rem; margin: 0.5rem 0; }
li.correct { background: var(--pass); }
li.incorrect { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function filterWrong(onlyWrong) {
  document.querySelectorAll('#entries li').forEach(li => {
    li.style.display = onlyWrong && li.classList.contains('correct') ? 'none' : '';
  });
}
"#;
