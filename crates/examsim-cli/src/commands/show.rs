//! The `examsim show` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use comfy_table::{Cell, Table};

use examsim_core::report::ExamSummary;
use examsim_core::timer::format_clock;
use examsim_core::FinishReason;

pub fn execute(summary_path: PathBuf, format: String) -> Result<()> {
    let summary = ExamSummary::load_json(&summary_path)?;

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", summary.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        _ => print_text(&summary),
    }

    Ok(())
}

fn print_text(summary: &ExamSummary) {
    println!(
        "Exam {} taken {}",
        summary.session_id,
        summary
            .started_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );
    match summary.reason {
        FinishReason::TimeExpired => println!("Ended: time expired"),
        FinishReason::Manual => println!(
            "Ended: finished with {} left",
            format_clock(summary.remaining_secs)
        ),
    }

    let wrong: Vec<_> = summary.entries.iter().filter(|e| !e.correct).collect();
    if !wrong.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["#", "Question", "Chosen", "Correct"]);
        for entry in wrong {
            table.add_row(vec![
                Cell::new(entry.number),
                Cell::new(&entry.question),
                Cell::new(entry.selected_display()),
                Cell::new(entry.expected_display().unwrap_or_default()),
            ]);
        }
        println!("\n{table}");
    }

    println!(
        "\nScore: {:.2}% ({}/{} correct)",
        summary.score.percentage, summary.score.correct, summary.score.total
    );
    println!("{}", summary.verdict());
}
