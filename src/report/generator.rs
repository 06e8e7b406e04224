//! Plain-text report generation.
//!
//! This module renders judgements and aggregated feedback as terminal-
//! friendly text. Everything here is presentation: the only arithmetic is
//! counting context entries.

use crate::analysis::FeedbackAggregator;
use crate::error::Result;
use crate::models::Judgement;

const WIDE_RULE: &str =
    "================================================================================";
const RULE: &str = "----------------------------------------";

/// Generate the full analysis report for one job description.
pub fn render_analysis_report(judgement: &Judgement) -> String {
    let mut output = String::new();

    output.push_str("Job Description Bias Analysis Report\n");
    output.push_str(WIDE_RULE);
    output.push_str("\n\n");

    output.push_str(&metrics_section(judgement));
    output.push_str(&categories_section(judgement));
    output.push_str(&term_detail_section(judgement));
    output.push_str(&free_text_section(
        "COMPOUNDING EFFECTS SUMMARY",
        &judgement.compounding_effects_summary,
    ));
    output.push_str(&free_text_section(
        "RISK ASSESSMENT",
        &judgement.overall_risk_assessment,
    ));
    output.push_str(&free_text_section(
        "IMPROVED JOB DESCRIPTION",
        &judgement.improved_description,
    ));

    output
}

fn metrics_section(judgement: &Judgement) -> String {
    let mut section = String::new();

    section.push_str("OVERALL METRICS\n");
    section.push_str(RULE);
    section.push('\n');
    section.push_str(&format!(
        "Discrimination Score: {}/10\n",
        judgement.discrimination_score
    ));
    section.push_str(&format!(
        "Confidence Level: {:.1}%\n\n",
        judgement.confidence_level * 100.0
    ));

    section
}

fn categories_section(judgement: &Judgement) -> String {
    if judgement.discrimination_categories.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("DISCRIMINATION CATEGORIES ANALYSIS\n");
    section.push_str(RULE);
    section.push('\n');

    for (category, stats) in &judgement.discrimination_categories {
        section.push_str(&format!("\n{}:\n", title_case(category)));
        section.push_str(&format!("  Instances: {}\n", stats.count));
        section.push_str(&format!("  Average Severity: {}/5\n", stats.average_severity));
        section.push_str(&format!(
            "  Problematic Terms: {}\n",
            stats.terms.join(", ")
        ));
    }
    section.push('\n');

    section
}

fn term_detail_section(judgement: &Judgement) -> String {
    if judgement.flagged_terms.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("DETAILED TERM ANALYSIS\n");
    section.push_str(RULE);
    section.push('\n');

    for term in &judgement.flagged_terms {
        section.push_str(&format!("\nFlagged Term: {}\n", term.term));
        section.push_str(&format!("Categories: {}\n", term.categories.join(", ")));
        section.push_str(&format!("Context: \"{}\"\n", term.context));
        section.push_str(&format!("Severity: {}/5\n", term.severity));
        section.push_str(&format!("Explanation: {}\n", term.explanation));
        section.push_str(&format!(
            "Compounding Effects: {}\n",
            term.compounding_effects
        ));
        section.push_str(&format!("Suggested Replacement: {}\n", term.suggestion));
    }
    section.push('\n');

    section
}

fn free_text_section(heading: &str, body: &str) -> String {
    if body.is_empty() {
        return String::new();
    }

    format!("{heading}\n{RULE}\n{body}\n\n")
}

/// Generate the short terminal summary shown right after an analysis.
pub fn render_term_summary(judgement: &Judgement) -> String {
    let mut output = String::new();

    output.push_str("Analysis Results:\n");
    output.push_str(RULE);
    output.push('\n');
    output.push_str(&format!(
        "Discrimination Score: {}/10\n",
        judgement.discrimination_score
    ));

    if !judgement.has_findings() {
        output.push_str("\nNo biased terms detected.\n");
        return output;
    }

    output.push_str("\nFlagged Terms:\n");
    for term in &judgement.flagged_terms {
        output.push('\n');
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!("Term: {}\n", term.term));
        output.push_str(&format!(
            "Severity: {} ({}/5)\n",
            term.severity_dots(),
            term.severity
        ));
        output.push_str(&format!("Suggestion: {}\n", term.suggestion));
        output.push_str("Explanation:\n");
        output.push_str(&wrap_text(&term.explanation, 60));
        output.push('\n');
    }

    output
}

/// Generate the improvement report from aggregated feedback.
///
/// Each failing suggestion additionally gets a context analysis: how many
/// contexts were recorded for the term and in how many of them the
/// suggestion was marked helpful.
pub fn render_improvement_report(
    aggregator: &FeedbackAggregator<'_>,
    min_responses: Option<u64>,
    window_days: Option<i64>,
) -> Result<String> {
    let report = aggregator.build_improvement_report(min_responses, window_days)?;

    let mut output = String::new();

    output.push_str("Bias Detection Model Improvement Report\n");
    output.push_str("==================================================\n");

    output.push_str("\nTerms Needing Improvement:\n");
    for item in &report.needs_improvement {
        output.push_str(&format!("\n- Term: {}\n", item.term));
        output.push_str(&format!("  Current suggestion: {}\n", item.suggestion));
        output.push_str(&format!(
            "  Helpful ratio: {:.1}%\n",
            item.helpful_ratio * 100.0
        ));
        output.push_str(&format!("  Total responses: {}\n", item.total_responses));

        let contexts = aggregator.context_breakdown(&item.term)?;
        let helpful = contexts.iter().filter(|c| c.is_helpful).count();
        output.push_str("\n  Context Analysis:\n");
        output.push_str(&format!(
            "  - Total contexts analyzed: {}\n",
            contexts.len()
        ));
        output.push_str(&format!("  - Helpful in: {helpful} contexts\n"));
    }

    output.push_str("\nSuccessful Suggestions:\n");
    for item in &report.successful_suggestions {
        output.push_str(&format!("\n- Term: {}\n", item.term));
        output.push_str(&format!("  Suggestion: {}\n", item.suggestion));
        output.push_str(&format!(
            "  Helpful ratio: {:.1}%\n",
            item.helpful_ratio * 100.0
        ));
        output.push_str(&format!("  Total responses: {}\n", item.total_responses));
    }

    Ok(output)
}

/// `age_discrimination` -> `Age Discrimination`.
fn title_case(raw: &str) -> String {
    raw.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Greedy word wrap at the given width.
fn wrap_text(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FeedbackAggregator;
    use crate::models::{CategoryStats, FeedbackRecord, FlaggedTerm};
    use crate::store::FeedbackStore;
    use chrono::Utc;

    fn sample_judgement() -> Judgement {
        Judgement {
            discrimination_score: 7.0,
            confidence_level: 0.9,
            flagged_terms: vec![FlaggedTerm {
                term: "young".to_string(),
                categories: vec!["age discrimination".to_string()],
                context: "We want a young team.".to_string(),
                explanation: "Discourages older applicants from applying at all.".to_string(),
                suggestion: "motivated".to_string(),
                severity: 4,
                compounding_effects: "Stacks with energetic.".to_string(),
            }],
            discrimination_categories: [(
                "age_discrimination".to_string(),
                CategoryStats {
                    count: 1,
                    average_severity: 4.0,
                    terms: vec!["young".to_string()],
                },
            )]
            .into_iter()
            .collect(),
            compounding_effects_summary: "Terms reinforce each other.".to_string(),
            overall_risk_assessment: "High legal exposure.".to_string(),
            improved_description: "We want a motivated team.".to_string(),
        }
    }

    #[test]
    fn test_render_analysis_report() {
        let report = render_analysis_report(&sample_judgement());

        assert!(report.contains("Job Description Bias Analysis Report"));
        assert!(report.contains("Discrimination Score: 7/10"));
        assert!(report.contains("Confidence Level: 90.0%"));
        assert!(report.contains("Age Discrimination:"));
        assert!(report.contains("Flagged Term: young"));
        assert!(report.contains("Suggested Replacement: motivated"));
        assert!(report.contains("IMPROVED JOB DESCRIPTION"));
        assert!(report.contains("We want a motivated team."));
    }

    #[test]
    fn test_render_term_summary() {
        let summary = render_term_summary(&sample_judgement());

        assert!(summary.contains("Discrimination Score: 7/10"));
        assert!(summary.contains("Term: young"));
        assert!(summary.contains("●●●●○ (4/5)"));
        assert!(summary.contains("Suggestion: motivated"));
    }

    #[test]
    fn test_render_term_summary_clean_description() {
        let judgement = Judgement {
            discrimination_score: 0.0,
            confidence_level: 1.0,
            flagged_terms: vec![],
            discrimination_categories: Default::default(),
            compounding_effects_summary: String::new(),
            overall_risk_assessment: String::new(),
            improved_description: String::new(),
        };

        let summary = render_term_summary(&judgement);
        assert!(summary.contains("No biased terms detected."));
    }

    #[test]
    fn test_render_improvement_report() {
        let store = FeedbackStore::in_memory().unwrap();
        let now = Utc::now();

        for (helpful, ctx) in [
            (true, "c1"),
            (false, "c2"),
            (false, "c3"),
            (false, "c4"),
            (false, "c5"),
        ] {
            store
                .append(&FeedbackRecord {
                    term: "young".to_string(),
                    original_suggestion: "motivated".to_string(),
                    is_helpful: helpful,
                    timestamp: now,
                    context: ctx.to_string(),
                })
                .unwrap();
        }
        for i in 0..6 {
            store
                .append(&FeedbackRecord {
                    term: "energetic".to_string(),
                    original_suggestion: "enthusiastic".to_string(),
                    is_helpful: i < 4,
                    timestamp: now,
                    context: format!("e{i}"),
                })
                .unwrap();
        }

        let aggregator = FeedbackAggregator::new(&store);
        let output = render_improvement_report(&aggregator, None, None).unwrap();

        assert!(output.contains("Bias Detection Model Improvement Report"));
        assert!(output.contains("Terms Needing Improvement:"));
        assert!(output.contains("- Term: young"));
        assert!(output.contains("Current suggestion: motivated"));
        assert!(output.contains("Helpful ratio: 20.0%"));
        assert!(output.contains("Total responses: 5"));
        assert!(output.contains("Total contexts analyzed: 5"));
        assert!(output.contains("Helpful in: 1 contexts"));
        assert!(output.contains("Successful Suggestions:"));
        assert!(output.contains("- Term: energetic"));
        assert!(output.contains("Helpful ratio: 66.7%"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("age_discrimination"), "Age Discrimination");
        assert_eq!(title_case("work_life_balance"), "Work Life Balance");
    }

    #[test]
    fn test_wrap_text() {
        let wrapped = wrap_text("one two three four five", 9);
        assert_eq!(wrapped, "one two\nthree\nfour five");
    }
}
