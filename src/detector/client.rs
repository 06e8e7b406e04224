//! Analysis Provider client.
//!
//! Sends job-description text to an Ollama-compatible chat endpoint and
//! returns the raw assistant text. Each call is stateless: the system
//! prompt carries the full term dictionary and response format, so no
//! conversation transcript accumulates between analyses.

use crate::detector::terms::{render_terms_json, KnownTerm};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the provider client.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:latest".to_string(),
            temperature: 0.1,
            timeout_seconds: 300,
        }
    }
}

/// Message in a chat request.
#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Ollama chat API request.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama chat API response.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// The bias-analysis provider client.
pub struct BiasDetector {
    config: ProviderConfig,
    http_client: reqwest::Client,
    system_prompt: String,
}

impl BiasDetector {
    /// Create a detector that prompts with the given term dictionary.
    pub fn new(config: ProviderConfig, terms: &BTreeMap<String, KnownTerm>) -> Self {
        info!(
            "Initializing detector with model {} at {}",
            config.model, config.base_url
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        let system_prompt = build_system_prompt(terms);

        Self {
            config,
            http_client,
            system_prompt,
        }
    }

    /// Analyze one job description. Returns the raw assistant text; the
    /// caller normalizes it into a structured judgement.
    pub async fn analyze(&self, description: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.config.base_url);

        let request = OllamaChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: analysis_prompt(description),
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        debug!("Sending analysis request ({} chars)", description.len());

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Provider(format!(
                        "request timed out after {}s",
                        self.config.timeout_seconds
                    ))
                } else if e.is_connect() {
                    Error::Provider(format!(
                        "cannot connect to Ollama at {}",
                        self.config.base_url
                    ))
                } else {
                    Error::Provider(format!("failed to send request: {e}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!("Ollama API error {status}: {body}")));
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("failed to parse Ollama response: {e}")))?;

        Ok(chat_response.message.content)
    }
}

/// System prompt: the task, the known-terms dictionary, and the exact
/// response shape the normalizer expects.
fn build_system_prompt(terms: &BTreeMap<String, KnownTerm>) -> String {
    format!(
        r#"You are a job description analyzer specialized in detecting discriminatory language.
You will analyze job descriptions using these predefined problematic terms and categories:

{}

For each job description, provide analysis in this JSON format:
{{
    "flagged_terms": [
        {{
            "term": "exact problematic phrase",
            "categories": ["list", "of", "discrimination", "categories"],
            "context": "full sentence containing the term",
            "explanation": "detailed explanation of why this is problematic",
            "suggestion": "specific replacement text",
            "severity": 3,
            "compounding_effects": "explanation of how this term combines with others"
        }}
    ],
    "discrimination_score": 5,
    "confidence_level": 0.9,
    "discrimination_categories": {{
        "age_discrimination": {{"count": 1, "severity": 3.0, "terms": ["list of terms"]}}
    }},
    "compounding_effects_summary": "explanation of how multiple biased terms interact",
    "overall_risk_assessment": "analysis of legal and ethical risks",
    "improved_description": "rewritten job description removing all biased language"
}}

Severity is an integer from 1 to 5 where 5 is most severe. The
discrimination score is a number from 0 to 10 and the confidence level a
number from 0 to 1. Only output valid JSON, no explanations or markdown."#,
        render_terms_json(terms)
    )
}

/// User prompt for a single description.
fn analysis_prompt(description: &str) -> String {
    format!(
        "Analyze this job description for discriminatory language:\n\n\
         Job Description:\n{description}\n\n\
         Provide your analysis in the specified JSON format."
    )
}
