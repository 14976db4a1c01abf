//! The `examsim init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("examsim.toml").exists() {
        println!("examsim.toml already exists, skipping.");
    } else {
        std::fs::write("examsim.toml", SAMPLE_CONFIG)?;
        println!("Created examsim.toml");
    }

    std::fs::create_dir_all("banks")?;
    let bank_path = Path::new("banks/sample.json");
    if bank_path.exists() {
        println!("banks/sample.json already exists, skipping.");
    } else {
        std::fs::write(bank_path, SAMPLE_BANK)?;
        println!("Created banks/sample.json");
    }

    println!("\nNext steps:");
    println!("  1. Add your own questions to banks/sample.json");
    println!("  2. Run: examsim validate --bank banks/sample.json");
    println!("  3. Run: examsim take");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examsim configuration

# JSON file path or http(s) URL. ${VAR} references are expanded.
bank = "banks/sample.json"

question_count = 65
pass_threshold = 70.0
duration_secs = 5400
tick_interval_ms = 1000
output_dir = "./examsim-results"

# Fix the question order for a repeatable exam.
# seed = 42
"#;

const SAMPLE_BANK: &str = r#"[
  {
    "question": "Which AWS service provides object storage?",
    "options": ["Amazon EC2", "Amazon S3", "Amazon RDS", "AWS Lambda"],
    "correctAnswer": [1],
    "multiple": false
  },
  {
    "question": "Which services let you run code without managing servers?",
    "options": ["AWS Lambda", "Amazon EC2", "AWS Fargate", "Amazon EBS"],
    "correctAnswer": [0, 2],
    "multiple": true
  },
  {
    "question": "Which pillar of the Well-Architected Framework covers recovering from failures?",
    "options": ["Cost Optimization", "Reliability", "Performance Efficiency"],
    "correctAnswer": [1],
    "multiple": false
  }
]
"#;
