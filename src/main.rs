//! JobAudit - AI-powered job description bias analyzer
//!
//! A CLI tool that uses an Ollama-compatible model to analyze job
//! descriptions for discriminatory language, record feedback on the
//! suggested replacements, and build improvement reports from that
//! feedback.
//!
//! Exit codes:
//!   0 - Success (at least one analysis succeeded, or nothing to do)
//!   1 - Runtime error, or every requested analysis failed

mod analysis;
mod cli;
mod config;
mod detector;
mod error;
mod models;
mod report;
mod store;

use analysis::{normalize, FeedbackAggregator};
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, FeedbackVerdict, OutputFormat};
use config::Config;
use detector::{merge_terms, BiasDetector, ProviderConfig};
use indicatif::{ProgressBar, ProgressStyle};
use models::{FeedbackRecord, Judgement};
use std::path::Path;
use std::time::Duration;
use store::FeedbackStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("JobAudit v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Audit failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .jobaudit.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".jobaudit.toml");

    if path.exists() {
        eprintln!("⚠️  .jobaudit.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .jobaudit.toml")?;

    println!("✅ Created .jobaudit.toml with default settings.");
    println!("   Edit it to customize model, extra terms, report thresholds, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the requested workflow. Returns an exit code.
async fn run(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Improvement report mode: read the store, render, done.
    if args.report {
        return handle_report(&config);
    }

    let descriptions = collect_descriptions(&args)?;
    info!("{} description(s) to analyze", descriptions.len());

    // Handle --dry-run: list inputs and exit
    if args.dry_run {
        return handle_dry_run(&descriptions);
    }

    std::fs::create_dir_all(&config.general.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.general.output_dir
        )
    })?;

    // The store is optional at analysis time: a broken database must not
    // block the analysis itself, only the feedback capture.
    let store = match FeedbackStore::open(&config.general.db_path) {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Feedback storage unavailable: {}", e);
            eprintln!("Warning: feedback storage may not be available");
            None
        }
    };

    let terms = merge_terms(&config.analysis.terms);
    let detector = BiasDetector::new(
        ProviderConfig {
            base_url: config.model.ollama_url.clone(),
            model: config.model.name.clone(),
            temperature: config.model.temperature,
            timeout_seconds: config.model.timeout_seconds,
        },
        &terms,
    );

    println!("🤖 Analyzing with model: {}", config.model.name);
    println!("   Ollama: {}", config.model.ollama_url);
    println!("   Timeout: {}s", config.model.timeout_seconds);

    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for (index, description) in descriptions.iter().enumerate() {
        let label = index + 1;
        println!("\n🔬 Analysis {}/{}", label, descriptions.len());

        let spinner = make_spinner(args.quiet);
        let raw = detector.analyze(description).await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let judgement = match raw.and_then(|text| normalize(text)) {
            Ok(judgement) => judgement,
            Err(e) => {
                warn!("Analysis {} failed: {}", label, e);
                eprintln!("⚠️  Analysis unavailable for description {}: {}", label, e);
                failed += 1;
                continue;
            }
        };

        println!();
        print!("{}", report::render_term_summary(&judgement));

        let report_path = save_report(&config, &args.format, &judgement, label)?;
        println!("\n📝 Report saved to: {}", report_path);

        if let Some(verdict) = args.feedback {
            record_feedback(store.as_ref(), &judgement, verdict);
        }

        succeeded += 1;
    }

    println!(
        "\n✅ Done: {} succeeded, {} failed",
        succeeded, failed
    );

    // A failed analysis never blocks the next one; only a run where
    // nothing succeeded counts as a failure overall.
    if succeeded == 0 && failed > 0 {
        return Ok(1);
    }
    Ok(0)
}

/// Handle --report: render the improvement report from stored feedback.
fn handle_report(config: &Config) -> Result<i32> {
    let store = FeedbackStore::open(&config.general.db_path)
        .with_context(|| format!("Cannot open feedback database: {}", config.general.db_path))?;

    let aggregator = FeedbackAggregator::new(&store);
    let output = report::render_improvement_report(
        &aggregator,
        Some(config.report.min_responses),
        Some(config.report.window_days),
    )?;

    println!("{}", output);
    Ok(0)
}

/// Handle --dry-run: list what would be analyzed, no LLM call, no writes.
fn handle_dry_run(descriptions: &[String]) -> Result<i32> {
    println!("\n🔍 Dry run: no LLM calls will be made.\n");
    println!("   {} description(s) would be analyzed:\n", descriptions.len());

    for (index, description) in descriptions.iter().enumerate() {
        let preview: String = description.chars().take(60).collect();
        let ellipsis = if description.chars().count() > 60 { "…" } else { "" };
        println!("     {}. {}{}", index + 1, preview, ellipsis);
    }

    println!("\n✅ Dry run complete.");
    Ok(0)
}

/// Gather descriptions from --file (one per line) and positional args.
fn collect_descriptions(args: &Args) -> Result<Vec<String>> {
    let mut descriptions = Vec::new();

    if let Some(ref file) = args.file {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Error reading file {}", file.display()))?;
        descriptions.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    }

    descriptions.extend(args.descriptions.iter().cloned());

    Ok(descriptions)
}

/// Spinner shown while the provider call is in flight.
fn make_spinner(quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Waiting for analysis...");
    pb.enable_steady_tick(Duration::from_millis(120));
    Some(pb)
}

/// Write the full analysis report for one description to the output dir.
fn save_report(
    config: &Config,
    format: &OutputFormat,
    judgement: &Judgement,
    label: usize,
) -> Result<String> {
    let (file_name, content) = match format {
        OutputFormat::Text => (
            format!("job_analysis_report_{}.txt", label),
            report::render_analysis_report(judgement),
        ),
        OutputFormat::Json => (
            format!("job_analysis_report_{}.json", label),
            serde_json::to_string_pretty(judgement).context("Failed to serialize judgement")?,
        ),
    };

    let path = Path::new(&config.general.output_dir).join(file_name);
    std::fs::write(&path, &content)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(path.display().to_string())
}

/// Append one feedback row per flagged term.
///
/// A failed write is reported but never invalidates the analysis that was
/// already rendered.
fn record_feedback(store: Option<&FeedbackStore>, judgement: &Judgement, verdict: FeedbackVerdict) {
    let Some(store) = store else {
        eprintln!("Feedback not recorded: storage is unavailable");
        return;
    };

    if !judgement.has_findings() {
        debug!("No flagged terms; nothing to record");
        return;
    }

    let now = Utc::now();
    let mut written = 0usize;

    for term in &judgement.flagged_terms {
        let context = serde_json::to_string(term).unwrap_or_default();
        let record = FeedbackRecord {
            term: term.term.clone(),
            original_suggestion: term.suggestion.clone(),
            is_helpful: verdict.is_helpful(),
            timestamp: now,
            context,
        };

        match store.append(&record) {
            Ok(_) => written += 1,
            Err(e) => {
                warn!("Feedback write failed for '{}': {}", term.term, e);
                eprintln!("Failed to store feedback for '{}'", term.term);
            }
        }
    }

    if written > 0 {
        println!("💬 Recorded feedback for {} term(s). Thank you!", written);
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .jobaudit.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
