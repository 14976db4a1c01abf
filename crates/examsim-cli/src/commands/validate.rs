//! The `examsim validate` command.

use std::path::PathBuf;

use anyhow::Result;

use examsim_core::bank::{load_bank, validate_bank};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let records = load_bank(&bank_path)?;

    let multiple = records.iter().filter(|r| r.multiple).count();
    println!(
        "Question bank: {} ({} questions, {} multiple-answer)",
        bank_path.display(),
        records.len(),
        multiple
    );

    let warnings = validate_bank(&records);
    for w in &warnings {
        let prefix = w
            .question
            .map(|n| format!("  [question {n}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
