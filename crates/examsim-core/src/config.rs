//! Exam configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default number of questions per exam.
pub const DEFAULT_QUESTION_COUNT: usize = 65;
/// Default minimum percentage needed to pass.
pub const DEFAULT_PASS_THRESHOLD: f64 = 70.0;
/// Default exam duration (90 minutes).
pub const DEFAULT_DURATION_SECS: u64 = 5400;
/// Default timer tick interval.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Top-level examsim configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamConfig {
    /// Question bank location: a file path or an http(s) URL.
    #[serde(default)]
    pub bank: Option<String>,
    /// How many questions to draw from the bank.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Minimum percentage needed to pass.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
    /// Exam duration in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: u64,
    /// Timer tick interval in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Fixed RNG seed for reproducible exams.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Output directory for exported results.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}
fn default_pass_threshold() -> f64 {
    DEFAULT_PASS_THRESHOLD
}
fn default_duration() -> u64 {
    DEFAULT_DURATION_SECS
}
fn default_tick_interval() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./examsim-results")
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            bank: None,
            question_count: default_question_count(),
            pass_threshold: default_pass_threshold(),
            duration_secs: default_duration(),
            tick_interval_ms: default_tick_interval(),
            seed: None,
            output_dir: default_output_dir(),
        }
    }
}

impl ExamConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check that the values describe a runnable exam.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.question_count >= 1, "question_count must be at least 1");
        anyhow::ensure!(
            (0.0..=100.0).contains(&self.pass_threshold),
            "pass_threshold must be between 0 and 100"
        );
        anyhow::ensure!(
            self.tick_interval_ms >= 1,
            "tick_interval_ms must be at least 1"
        );
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `examsim.toml` in the current directory
/// 2. `~/.config/examsim/config.toml`
///
/// `EXAMSIM_BANK` overrides the bank location.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examsim.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => ExamConfig::default(),
    };

    if let Ok(bank) = std::env::var("EXAMSIM_BANK") {
        config.bank = Some(bank);
    }
    config.bank = config.bank.as_deref().map(resolve_env_vars);

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config_str(content: &str) -> Result<ExamConfig> {
    let config: ExamConfig = toml::from_str(content)?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examsim"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EXAMSIM_TEST_VAR", "bank.json");
        assert_eq!(resolve_env_vars("${_EXAMSIM_TEST_VAR}"), "bank.json");
        assert_eq!(
            resolve_env_vars("/data/${_EXAMSIM_TEST_VAR}?v=1"),
            "/data/bank.json?v=1"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_EXAMSIM_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = ExamConfig::default();
        assert_eq!(config.question_count, 65);
        assert_eq!(config.pass_threshold, 70.0);
        assert_eq!(config.duration_secs, 5400);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config_str(
            r#"
bank = "questions.json"
question_count = 10
seed = 7
"#,
        )
        .unwrap();
        assert_eq!(config.bank.as_deref(), Some("questions.json"));
        assert_eq!(config.question_count, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.duration_secs, DEFAULT_DURATION_SECS);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = ExamConfig {
            question_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.question_count = 5;
        config.pass_threshold = 120.0;
        assert!(config.validate().is_err());

        config.pass_threshold = 70.0;
        config.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/examsim.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examsim.toml");
        std::fs::write(&path, "duration_secs = 60\npass_threshold = 80.0\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.duration_secs, 60);
        assert_eq!(config.pass_threshold, 80.0);
    }
}
