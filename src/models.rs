//! Data models for the bias auditor.
//!
//! This module contains the core data structures used throughout the
//! application for representing judgements, feedback, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single problematic phrase identified in a job description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedTerm {
    /// The exact phrase that was flagged.
    pub term: String,
    /// Discrimination categories the phrase falls under.
    #[serde(default)]
    pub categories: Vec<String>,
    /// The sentence containing the phrase.
    #[serde(default)]
    pub context: String,
    /// Why the phrase is problematic.
    #[serde(default)]
    pub explanation: String,
    /// Suggested replacement text.
    #[serde(default)]
    pub suggestion: String,
    /// Severity on a 1-5 scale; 0 when the provider omitted it.
    #[serde(default)]
    pub severity: u8,
    /// How the phrase combines with other flagged language.
    #[serde(default)]
    pub compounding_effects: String,
}

impl FlaggedTerm {
    /// Renders severity as filled/empty dots out of 5, e.g. `●●●○○`.
    pub fn severity_dots(&self) -> String {
        let filled = usize::from(self.severity.min(5));
        format!("{}{}", "●".repeat(filled), "○".repeat(5 - filled))
    }
}

/// Per-category statistics within a judgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Number of flagged instances in this category.
    #[serde(default)]
    pub count: u64,
    /// Average severity across the category's terms (1-5 scale).
    #[serde(default, alias = "severity")]
    pub average_severity: f64,
    /// The terms contributing to this category.
    #[serde(default)]
    pub terms: Vec<String>,
}

/// A structured bias-analysis result for one job description.
///
/// Only `flagged_terms` and `discrimination_score` are guaranteed by the
/// provider; every other field is tolerated as absent since the response
/// shape drifts between models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Judgement {
    /// Overall discrimination score, 0-10.
    pub discrimination_score: f64,
    /// Provider confidence, 0-1.
    #[serde(default)]
    pub confidence_level: f64,
    /// Flagged phrases, in the order the provider reported them.
    pub flagged_terms: Vec<FlaggedTerm>,
    /// Statistics keyed by discrimination category name.
    #[serde(default)]
    pub discrimination_categories: BTreeMap<String, CategoryStats>,
    /// How multiple biased terms interact.
    #[serde(default)]
    pub compounding_effects_summary: String,
    /// Legal and ethical risk analysis.
    #[serde(default)]
    pub overall_risk_assessment: String,
    /// Rewritten description with biased language removed.
    #[serde(default)]
    pub improved_description: String,
}

impl Judgement {
    /// Whether the analysis flagged anything at all.
    pub fn has_findings(&self) -> bool {
        !self.flagged_terms.is_empty()
    }
}

/// One feedback row: a user's verdict on a single suggested replacement.
///
/// Rows are append-only; once written they are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// The flagged phrase the suggestion was offered for.
    pub term: String,
    /// The replacement proposed at analysis time (may be empty).
    pub original_suggestion: String,
    /// Whether the user found the suggestion helpful.
    pub is_helpful: bool,
    /// When the feedback was recorded.
    pub timestamp: DateTime<Utc>,
    /// Snapshot of the flagged-term judgement, preserved verbatim.
    pub context: String,
}

/// Aggregated feedback for one `(term, suggestion)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub term: String,
    pub original_suggestion: String,
    pub total_responses: u64,
    pub helpful_count: u64,
    /// `helpful_count / total_responses`; groups always hold at least one
    /// record so this is never NaN.
    pub helpful_ratio: f64,
}

impl AggregateRow {
    /// Builds a row, deriving the ratio from the two counts.
    pub fn new(term: String, original_suggestion: String, total: u64, helpful: u64) -> Self {
        Self {
            term,
            original_suggestion,
            total_responses: total,
            helpful_count: helpful,
            helpful_ratio: helpful as f64 / total as f64,
        }
    }
}

/// A `(context, verdict)` pair for drilling into one term's feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextEntry {
    pub context: String,
    pub is_helpful: bool,
}

/// One classified `(term, suggestion)` outcome in an improvement report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionOutcome {
    pub term: String,
    pub suggestion: String,
    pub helpful_ratio: f64,
    pub total_responses: u64,
}

impl From<&AggregateRow> for SuggestionOutcome {
    fn from(row: &AggregateRow) -> Self {
        Self {
            term: row.term.clone(),
            suggestion: row.original_suggestion.clone(),
            helpful_ratio: row.helpful_ratio,
            total_responses: row.total_responses,
        }
    }
}

/// Classification of aggregated feedback into actionable buckets.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImprovementReport {
    /// Suggestions users found unhelpful (ratio below 0.25).
    pub needs_improvement: Vec<SuggestionOutcome>,
    /// Suggestions users endorsed (ratio above 0.5).
    pub successful_suggestions: Vec<SuggestionOutcome>,
    /// Reserved bucket; nothing is routed here under the current policy,
    /// kept in the shape so downstream consumers see a stable field.
    pub improvement_opportunities: Vec<SuggestionOutcome>,
}
