//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// JobAudit - LLM-powered bias auditor for job descriptions
///
/// Analyze job descriptions for discriminatory language using a local
/// AI model, record feedback on suggested replacements, and build
/// improvement reports from accumulated feedback.
///
/// Examples:
///   jobaudit "We need a young, energetic ninja to crush targets"
///   jobaudit --file descriptions.txt --feedback helpful
///   jobaudit --report --min-responses 3
///   jobaudit --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Job descriptions to analyze (as quoted strings)
    #[arg(value_name = "DESCRIPTION")]
    pub descriptions: Vec<String>,

    /// File containing job descriptions (one per line)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Ollama model to use for analysis
    ///
    /// Can also be set via JOBAUDIT_MODEL env var or .jobaudit.toml config.
    #[arg(
        short,
        long,
        default_value = "llama3.2:latest",
        env = "JOBAUDIT_MODEL"
    )]
    pub model: String,

    /// Ollama API endpoint URL
    #[arg(long, default_value = "http://localhost:11434", env = "OLLAMA_URL")]
    pub ollama_url: String,

    /// Temperature for LLM responses (0.0 - 1.0)
    ///
    /// Lower values produce more consistent/deterministic output
    #[arg(long, default_value = "0.1")]
    pub temperature: f32,

    /// Request timeout in seconds
    ///
    /// How long to wait for the LLM to respond. Default: from config or 300s.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to the feedback database
    ///
    /// Default: from config or feedback.db in the current directory.
    #[arg(long, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Directory to store analysis reports
    ///
    /// Default: from config or bias_analysis_reports.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Record feedback on every suggestion from this run
    ///
    /// Writes one feedback row per flagged term for each analysis.
    /// Values: helpful, unhelpful
    #[arg(long, value_name = "VERDICT")]
    pub feedback: Option<FeedbackVerdict>,

    /// Print the improvement report built from stored feedback and exit
    ///
    /// No provider call is made in this mode.
    #[arg(long)]
    pub report: bool,

    /// Trailing window in days for the improvement report
    #[arg(long, value_name = "DAYS", requires = "report")]
    pub report_window: Option<i64>,

    /// Minimum responses before a suggestion appears in the report
    #[arg(long, value_name = "COUNT", requires = "report")]
    pub min_responses: Option<u64>,

    /// Output format for saved analysis reports (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .jobaudit.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: list what would be analyzed without calling the LLM
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .jobaudit.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for saved analysis reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain-text report (default)
    #[default]
    Text,
    /// Serialized judgement as JSON
    Json,
}

/// User verdict recorded for every suggestion in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FeedbackVerdict {
    Helpful,
    Unhelpful,
}

impl FeedbackVerdict {
    pub fn is_helpful(&self) -> bool {
        matches!(self, FeedbackVerdict::Helpful)
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Modes that need no descriptions
        if self.init_config || self.report {
            if let Some(window) = self.report_window {
                if window < 0 {
                    return Err("Report window must be a non-negative number of days".to_string());
                }
            }
            return Ok(());
        }

        // Analysis mode needs at least one input source
        if self.descriptions.is_empty() && self.file.is_none() {
            return Err(
                "No job descriptions provided. Pass them as arguments or use --file".to_string(),
            );
        }

        // Validate Ollama URL format (not needed for dry-run)
        if !self.dry_run
            && !self.ollama_url.starts_with("http://")
            && !self.ollama_url.starts_with("https://")
        {
            return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
        }

        // Validate temperature range
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err("Temperature must be between 0.0 and 1.0".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Validate input file if provided
        if let Some(ref file) = self.file {
            if !file.exists() {
                return Err(format!("Input file does not exist: {}", file.display()));
            }
            if !file.is_file() {
                return Err(format!("Input path is not a file: {}", file.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            descriptions: vec!["We need a young ninja".to_string()],
            file: None,
            model: "test".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            temperature: 0.1,
            timeout: None,
            db: None,
            output_dir: None,
            feedback: None,
            report: false,
            report_window: None,
            min_responses: None,
            format: OutputFormat::Text,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_requires_input() {
        let mut args = make_args();
        args.descriptions.clear();
        assert!(args.validate().is_err());

        // Report mode needs no descriptions.
        args.report = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.ollama_url = "localhost:11434".to_string();
        assert!(args.validate().is_err());

        // Dry run skips the URL check.
        args.dry_run = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_negative_report_window() {
        let mut args = make_args();
        args.report = true;
        args.report_window = Some(-5);
        assert!(args.validate().is_err());

        args.report_window = Some(0);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_temperature_range() {
        let mut args = make_args();
        args.temperature = 1.5;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_feedback_verdict() {
        assert!(FeedbackVerdict::Helpful.is_helpful());
        assert!(!FeedbackVerdict::Unhelpful.is_helpful());
    }
}
