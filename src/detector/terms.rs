//! Known problematic terms.
//!
//! The built-in dictionary seeds the provider prompt with phrases that are
//! already understood to be discriminatory, together with a replacement
//! hint and a rationale. Config files can layer additional terms on top.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dictionary entry for a phrase known to be problematic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownTerm {
    /// Discrimination categories the phrase falls under.
    pub categories: Vec<String>,
    /// Suggested replacement wording.
    pub replacement: String,
    /// Why the phrase is problematic.
    pub explanation: String,
}

/// The built-in term dictionary.
///
/// A `BTreeMap` keeps prompt rendering deterministic across runs.
pub fn builtin_terms() -> BTreeMap<String, KnownTerm> {
    let entries = [
        (
            "young",
            &["age discrimination", "direct discrimination"][..],
            "motivated",
            "Directly discriminates against older workers and violates age discrimination laws",
        ),
        (
            "energetic",
            &["age discrimination", "indirect discrimination"][..],
            "enthusiastic",
            "Often used as coded language for age discrimination and may discourage older applicants",
        ),
        (
            "ninja",
            &["unprofessional language", "cultural appropriation"][..],
            "skilled professional",
            "Uses casual language that may be inappropriate and culturally insensitive",
        ),
        (
            "crush targets",
            &["aggressive language", "toxic culture"][..],
            "achieve sales goals",
            "Promotes aggressive behavior and may indicate toxic work environment",
        ),
        (
            "long hours",
            &["work-life balance", "indirect discrimination"][..],
            "flexible schedule based on project needs",
            "May discriminate against caregivers and promote unhealthy work-life balance",
        ),
    ];

    entries
        .into_iter()
        .map(|(term, categories, replacement, explanation)| {
            (
                term.to_string(),
                KnownTerm {
                    categories: categories.iter().map(|c| c.to_string()).collect(),
                    replacement: replacement.to_string(),
                    explanation: explanation.to_string(),
                },
            )
        })
        .collect()
}

/// Merges extra terms over the built-ins; extras win on collision.
pub fn merge_terms(
    extra: &BTreeMap<String, KnownTerm>,
) -> BTreeMap<String, KnownTerm> {
    let mut terms = builtin_terms();
    for (term, entry) in extra {
        terms.insert(term.clone(), entry.clone());
    }
    terms
}

/// Renders the dictionary as indented JSON for inclusion in the prompt.
pub fn render_terms_json(terms: &BTreeMap<String, KnownTerm>) -> String {
    serde_json::to_string_pretty(terms).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_terms_content() {
        let terms = builtin_terms();
        assert_eq!(terms.len(), 5);

        let young = &terms["young"];
        assert_eq!(young.replacement, "motivated");
        assert!(young
            .categories
            .contains(&"age discrimination".to_string()));
    }

    #[test]
    fn test_merge_terms_extra_wins() {
        let mut extra = BTreeMap::new();
        extra.insert(
            "young".to_string(),
            KnownTerm {
                categories: vec!["age discrimination".to_string()],
                replacement: "driven".to_string(),
                explanation: "Custom override".to_string(),
            },
        );
        extra.insert(
            "rockstar".to_string(),
            KnownTerm {
                categories: vec!["unprofessional language".to_string()],
                replacement: "expert".to_string(),
                explanation: "Casual jargon".to_string(),
            },
        );

        let merged = merge_terms(&extra);
        assert_eq!(merged.len(), 6);
        assert_eq!(merged["young"].replacement, "driven");
        assert_eq!(merged["rockstar"].replacement, "expert");
        assert_eq!(merged["ninja"].replacement, "skilled professional");
    }

    #[test]
    fn test_render_terms_json_is_valid_json() {
        let rendered = render_terms_json(&builtin_terms());
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert!(parsed["young"]["replacement"].is_string());
    }
}
