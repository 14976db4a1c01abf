//! The `examsim take` command.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

use examsim_core::config::{load_config_from, ExamConfig};
use examsim_core::engine::{start_session, ExamCommand, ExamDriver, ExamObserver};
use examsim_core::report::ExamSummary;
use examsim_core::session::QuestionView;
use examsim_core::timer::format_clock;
use examsim_core::ExamError;
use examsim_report::html::write_html_report;
use examsim_sources::create_source;

const HELP: &str = "Commands: option numbers to select (e.g. `1 3`), <enter> or n next, \
p previous, g N go to question N, c clear, f finish";

/// Command-line values that take precedence over the config file.
pub struct Overrides {
    pub bank: Option<String>,
    pub count: Option<usize>,
    pub duration: Option<u64>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
}

impl Overrides {
    fn apply(self, config: &mut ExamConfig) {
        if let Some(bank) = self.bank {
            config.bank = Some(bank);
        }
        if let Some(count) = self.count {
            config.question_count = count;
        }
        if let Some(duration) = self.duration {
            config.duration_secs = duration;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
    }
}

/// Prints questions to stdout and status to stderr.
struct ConsoleObserver;

impl ExamObserver for ConsoleObserver {
    fn on_question(&self, view: &QuestionView<'_>) {
        println!(
            "\nQuestion {}/{}  [{} left]",
            view.number(),
            view.total,
            format_clock(view.remaining_secs)
        );
        println!("{}", view.question.question);
        if let Some(instruction) = view.question.instruction() {
            println!("({instruction})");
        }
        for (i, option) in view.question.options.iter().enumerate() {
            let mark = if view.selected[i] { "x" } else { " " };
            println!("  [{mark}] {}. {}", i + 1, option.text);
        }
        if view.is_last {
            println!("Last question: enter f to finish.");
        }
    }

    fn on_tick(&self, remaining_secs: u64) {
        if remaining_secs % 300 == 0 || remaining_secs <= 10 {
            eprintln!("  {} left", format_clock(remaining_secs));
        }
    }

    fn on_rejected(&self, error: &ExamError) {
        eprintln!("  Rejected: {error}");
    }

    fn on_finished(&self, summary: &ExamSummary) {
        if summary.reason == examsim_core::FinishReason::TimeExpired {
            println!("\nTime is up!");
        }
    }
}

pub async fn execute(
    overrides: Overrides,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    overrides.apply(&mut config);
    config.validate()?;

    let location = config
        .bank
        .clone()
        .context("no question bank given; pass --bank or set `bank` in examsim.toml")?;

    let source = create_source(&location)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let session = start_session(source.as_ref(), &config, &mut rng).await?;

    eprintln!(
        "Starting exam: {} questions, {} on the clock",
        session.len(),
        format_clock(config.duration_secs)
    );
    eprintln!("{HELP}");

    let (tx, rx) = mpsc::channel(16);
    // Blocking reads. The thread is abandoned if the timer ends the exam first.
    std::thread::spawn(move || read_commands(tx));

    let summary = ExamDriver::new(&config)
        .run(session, rx, &ConsoleObserver)
        .await;

    print_summary(&summary);
    save_outputs(&summary, &config, &format)?;

    Ok(())
}

fn read_commands(tx: mpsc::Sender<ExamCommand>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        match parse_command(&line) {
            Ok(command) => {
                let finish = command == ExamCommand::Finish;
                if tx.blocking_send(command).is_err() || finish {
                    break;
                }
            }
            Err(msg) => eprintln!("  {msg}. {HELP}"),
        }
    }
}

/// Parse one line of user input. Option and question numbers are one-based.
fn parse_command(line: &str) -> Result<ExamCommand, String> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" | "n" | "next" => return Ok(ExamCommand::Next),
        "p" | "prev" | "previous" => return Ok(ExamCommand::Previous),
        "f" | "finish" | "q" | "quit" => return Ok(ExamCommand::Finish),
        "c" | "clear" => return Ok(ExamCommand::Select(Vec::new())),
        _ => {}
    }

    if let Some(rest) = line.strip_prefix('g').or_else(|| line.strip_prefix('G')) {
        let number = one_based(rest.trim())?;
        return Ok(ExamCommand::Jump(number));
    }

    let indices = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(one_based)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ExamCommand::Select(indices))
}

fn one_based(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("not a valid number: '{s}'")),
    }
}

fn print_summary(summary: &ExamSummary) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Chosen", "Correct", "Result"]);

    for entry in &summary.entries {
        table.add_row(vec![
            Cell::new(entry.number),
            Cell::new(&entry.question),
            Cell::new(entry.selected_display()),
            Cell::new(entry.expected_display().unwrap_or_default()),
            Cell::new(if entry.correct { "OK" } else { "WRONG" }),
        ]);
    }

    println!("\n{table}");
    println!(
        "Score: {:.2}% ({}/{} correct)",
        summary.score.percentage, summary.score.correct, summary.score.total
    );
    println!("{}", summary.verdict());
}

fn save_outputs(summary: &ExamSummary, config: &ExamConfig, format: &str) -> Result<()> {
    let formats: Vec<&str> = match format {
        "none" => return Ok(()),
        "all" => vec!["json", "html", "markdown"],
        other => other.split(',').map(|s| s.trim()).collect(),
    };

    let output = &config.output_dir;
    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let timestamp = summary.finished_at.format("%Y-%m-%dT%H%M%S");

    for fmt in formats {
        match fmt {
            "json" => {
                let path = output.join(format!("summary-{timestamp}.json"));
                summary.save_json(&path)?;
                eprintln!("JSON summary: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("result-{timestamp}.html"));
                write_html_report(summary, &path)?;
                eprintln!("HTML result: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("result-{timestamp}.md"));
                std::fs::write(&path, summary.to_markdown())?;
                eprintln!("Markdown result: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}
