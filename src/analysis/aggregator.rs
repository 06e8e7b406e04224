//! Feedback aggregation and statistics.
//!
//! This module owns every read query against the feedback store: windowed
//! helpfulness summaries per `(term, suggestion)` pair, per-term context
//! breakdowns, and the classified improvement report built from both.

use crate::error::{Error, Result};
use crate::models::{AggregateRow, ContextEntry, ImprovementReport, SuggestionOutcome};
use crate::store::FeedbackStore;
use chrono::{Duration, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Trailing window applied when the caller does not supply one.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Minimum responses a group needs before it can appear in a report.
pub const DEFAULT_MIN_RESPONSES: u64 = 5;

/// Suggestions below this helpfulness ratio need rework.
const NEEDS_IMPROVEMENT_BELOW: f64 = 0.25;

/// Suggestions above this helpfulness ratio are considered working.
const SUCCESSFUL_ABOVE: f64 = 0.5;

/// Read-side aggregation over the feedback store.
pub struct FeedbackAggregator<'a> {
    store: &'a FeedbackStore,
}

impl<'a> FeedbackAggregator<'a> {
    pub fn new(store: &'a FeedbackStore) -> Self {
        Self { store }
    }

    /// Groups feedback within the trailing window by `(term, suggestion)`
    /// and returns the groups sorted by helpfulness ratio, highest first.
    ///
    /// Ties keep the order in which groups were first seen (stable sort
    /// over insertion order), so equal-ratio groups stay deterministic.
    pub fn summarize(&self, window_days: Option<i64>) -> Result<Vec<AggregateRow>> {
        let days = window_days.unwrap_or(DEFAULT_WINDOW_DAYS);
        if days < 0 {
            return Err(Error::InvalidArgument(format!(
                "window must be a non-negative number of days, got {days}"
            )));
        }

        let cutoff = Utc::now() - Duration::days(days);
        let records = self.store.records_since(cutoff)?;

        // Group in first-seen order: the Vec keeps discovery order, the
        // map only locates the slot for each key.
        let mut order: Vec<(String, String)> = Vec::new();
        let mut counts: HashMap<(String, String), (u64, u64)> = HashMap::new();

        for record in records {
            let key = (record.term.clone(), record.original_suggestion.clone());
            let entry = counts.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                (0, 0)
            });
            entry.0 += 1;
            if record.is_helpful {
                entry.1 += 1;
            }
        }

        let mut rows: Vec<AggregateRow> = order
            .into_iter()
            .map(|(term, suggestion)| {
                let (total, helpful) = counts[&(term.clone(), suggestion.clone())];
                AggregateRow::new(term, suggestion, total, helpful)
            })
            .collect();

        rows.sort_by(|a, b| {
            b.helpful_ratio
                .partial_cmp(&a.helpful_ratio)
                .unwrap_or(Ordering::Equal)
        });

        Ok(rows)
    }

    /// Every `(context, is_helpful)` pair recorded for an exact term, in
    /// storage order and unbounded in time. Meant for human inspection.
    pub fn context_breakdown(&self, term: &str) -> Result<Vec<ContextEntry>> {
        let records = self.store.records_for_term(term)?;

        Ok(records
            .into_iter()
            .map(|r| ContextEntry {
                context: r.context,
                is_helpful: r.is_helpful,
            })
            .collect())
    }

    /// Classifies windowed feedback (default: the last 30 days) into
    /// improvement buckets, skipping groups with fewer than
    /// `min_responses` responses.
    ///
    /// The thresholds are strict on both sides: a ratio of exactly 0.25 or
    /// exactly 0.5 lands in neither bucket, and the whole [0.25, 0.5] band
    /// is deliberately reported nowhere. `improvement_opportunities` stays
    /// empty; the field survives for consumers that expect it.
    pub fn build_improvement_report(
        &self,
        min_responses: Option<u64>,
        window_days: Option<i64>,
    ) -> Result<ImprovementReport> {
        let min_responses = min_responses.unwrap_or(DEFAULT_MIN_RESPONSES);
        let summary = self.summarize(Some(window_days.unwrap_or(DEFAULT_WINDOW_DAYS)))?;

        let mut report = ImprovementReport::default();

        for row in summary
            .iter()
            .filter(|row| row.total_responses >= min_responses)
        {
            if row.helpful_ratio < NEEDS_IMPROVEMENT_BELOW {
                report.needs_improvement.push(SuggestionOutcome::from(row));
            } else if row.helpful_ratio > SUCCESSFUL_ABOVE {
                report
                    .successful_suggestions
                    .push(SuggestionOutcome::from(row));
            }
        }

        Ok(report)
    }
}
