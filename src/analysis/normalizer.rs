//! Judgement normalization.
//!
//! Providers return either structured JSON or free text that merely
//! contains JSON, frequently wrapped in markdown code fences. This module
//! converts any of those shapes into a canonical [`Judgement`] or fails
//! with a typed error.

use crate::error::{Error, Result};
use crate::models::Judgement;
use serde_json::Value;

/// Raw provider output before normalization.
#[derive(Debug, Clone)]
pub enum RawJudgement {
    /// Already-structured response (e.g. from a JSON-mode provider).
    Structured(Value),
    /// Plain assistant text that should contain a JSON object.
    Text(String),
}

impl From<Value> for RawJudgement {
    fn from(value: Value) -> Self {
        RawJudgement::Structured(value)
    }
}

impl From<String> for RawJudgement {
    fn from(text: String) -> Self {
        RawJudgement::Text(text)
    }
}

impl From<&str> for RawJudgement {
    fn from(text: &str) -> Self {
        RawJudgement::Text(text.to_string())
    }
}

/// Converts raw provider output into a canonical judgement.
///
/// Text input gets two parse attempts: a strict parse of the trimmed
/// string, then one retry with code-fence markers stripped. Both attempts
/// failing reports the *first* parser's message, which points at the
/// original response rather than the mangled retry.
pub fn normalize(raw: impl Into<RawJudgement>) -> Result<Judgement> {
    let value = match raw.into() {
        RawJudgement::Structured(value) => value,
        RawJudgement::Text(text) => parse_text(&text)?,
    };

    serde_json::from_value(value).map_err(|e| Error::MalformedJudgement(e.to_string()))
}

/// Two-attempt JSON extraction from assistant text.
fn parse_text(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::MalformedJudgement("empty input".to_string()));
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let stripped = strip_code_fences(trimmed);
            serde_json::from_str(stripped)
                .map_err(|_| Error::MalformedJudgement(first_err.to_string()))
        }
    }
}

/// Removes a leading ``` fence (with optional language hint) and a
/// trailing ``` fence.
fn strip_code_fences(text: &str) -> &str {
    let mut out = text.trim();

    if let Some(rest) = out.strip_prefix("```") {
        // The opening fence may carry a language hint (```json); drop
        // everything up to the end of that line.
        out = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest,
        };
    }

    if let Some(rest) = out.strip_suffix("```") {
        out = rest;
    }

    out.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{"flagged_terms": [], "discrimination_score": 3}"#;

    #[test]
    fn test_normalize_plain_json() {
        let judgement = normalize(MINIMAL).unwrap();
        assert_eq!(judgement.discrimination_score, 3.0);
        assert!(judgement.flagged_terms.is_empty());
    }

    #[test]
    fn test_normalize_fenced_matches_unfenced() {
        let fenced = format!("```json\n{}\n```", MINIMAL);

        let from_fenced = normalize(fenced.as_str()).unwrap();
        let from_plain = normalize(MINIMAL).unwrap();

        assert_eq!(
            serde_json::to_value(&from_fenced).unwrap(),
            serde_json::to_value(&from_plain).unwrap()
        );
    }

    #[test]
    fn test_normalize_fence_without_language_hint() {
        let fenced = format!("```\n{}\n```", MINIMAL);
        let judgement = normalize(fenced.as_str()).unwrap();
        assert_eq!(judgement.discrimination_score, 3.0);
    }

    #[test]
    fn test_normalize_structured_value() {
        let value: Value = serde_json::from_str(MINIMAL).unwrap();
        let judgement = normalize(value).unwrap();
        assert_eq!(judgement.discrimination_score, 3.0);
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let err = normalize("").unwrap_err();
        assert!(matches!(err, Error::MalformedJudgement(msg) if msg == "empty input"));

        let err = normalize("   \n\t  ").unwrap_err();
        assert!(matches!(err, Error::MalformedJudgement(msg) if msg == "empty input"));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = normalize("{not json").unwrap_err();
        assert!(matches!(err, Error::MalformedJudgement(_)));
    }

    #[test]
    fn test_second_failure_reports_first_parser_error() {
        // Neither the raw text nor the fence-stripped text parses; the
        // surfaced message comes from the attempt on the raw text.
        let raw = "```json\n{still not json\n```";
        let expected = serde_json::from_str::<Value>(raw).unwrap_err().to_string();

        match normalize(raw).unwrap_err() {
            Error::MalformedJudgement(msg) => assert_eq!(msg, expected),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_required_fields_is_malformed() {
        let err = normalize(r#"{"flagged_terms": []}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedJudgement(_)));

        let err = normalize(r#"{"discrimination_score": 5}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedJudgement(_)));
    }

    #[test]
    fn test_full_provider_payload() {
        let raw = r#"```json
{
    "flagged_terms": [
        {
            "term": "young",
            "categories": ["age discrimination"],
            "context": "We want a young team.",
            "explanation": "Discourages older applicants.",
            "suggestion": "motivated",
            "severity": 4,
            "compounding_effects": "Reinforces the energetic phrasing."
        }
    ],
    "discrimination_score": 7,
    "confidence_level": 0.9,
    "discrimination_categories": {
        "age_discrimination": {"count": 1, "severity": 4.0, "terms": ["young"]}
    },
    "overall_risk_assessment": "High legal exposure."
}
```"#;

        let judgement = normalize(raw).unwrap();
        assert_eq!(judgement.flagged_terms.len(), 1);
        assert_eq!(judgement.flagged_terms[0].term, "young");
        assert_eq!(judgement.flagged_terms[0].severity, 4);
        assert_eq!(judgement.confidence_level, 0.9);
        let stats = &judgement.discrimination_categories["age_discrimination"];
        assert_eq!(stats.average_severity, 4.0);
    }
}
