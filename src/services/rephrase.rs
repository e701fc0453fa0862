//! Question rephrasing through an external LLM. Providers sit behind one
//! trait so Ollama and Gemini stay interchangeable; every failure path
//! degrades to the original question so the learner is never blocked on a
//! model being down. Outbound calls are made exactly once, no retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::sanitize::{apply_replacements, HeuristicSanitizer, ResponseSanitizer};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Everything the prompt builder knows about the learner and the question.
#[derive(Debug, Clone, Default)]
pub struct RephraseContext {
    pub question: String,
    pub options: Vec<String>,
    pub neuro_flags: Vec<String>,
    pub confusion_detected: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("llm request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("llm response missing text")]
    EmptyResponse,
}

#[async_trait]
pub trait RephraseProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Outcome handed to the route layer. `simplified == original` when the
/// provider was unreachable or produced nothing usable.
#[derive(Debug, Clone)]
pub struct RephraseOutcome {
    pub simplified: String,
    pub provider: &'static str,
    pub used_fallback: bool,
}

pub struct RephraseGateway {
    provider: Option<Box<dyn RephraseProvider>>,
    sanitizer: Box<dyn ResponseSanitizer>,
}

impl RephraseGateway {
    pub fn new(provider: Option<Box<dyn RephraseProvider>>) -> Self {
        Self {
            provider,
            sanitizer: Box::new(HeuristicSanitizer),
        }
    }

    /// Picks a provider from the environment: `USE_OLLAMA=true` selects
    /// Ollama, otherwise `LLM_API_KEY` enables Gemini, otherwise the gateway
    /// runs in rule-based fallback mode only.
    pub fn from_env(client: reqwest::Client) -> Self {
        let use_ollama = std::env::var("USE_OLLAMA")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let provider: Option<Box<dyn RephraseProvider>> = if use_ollama {
            let base_url = std::env::var("OLLAMA_URL")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
            let model = std::env::var("OLLAMA_MODEL")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string());
            Some(Box::new(OllamaProvider::new(client, base_url, model)))
        } else if let Ok(api_key) = std::env::var("LLM_API_KEY") {
            let model = std::env::var("LLM_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
            Some(Box::new(GeminiProvider::new(client, api_key, model)))
        } else {
            None
        };

        match &provider {
            Some(p) => debug!(provider = p.name(), "rephrase provider configured"),
            None => debug!("no rephrase provider configured, using rule-based fallback"),
        }
        Self::new(provider)
    }

    pub async fn rephrase(&self, ctx: &RephraseContext) -> RephraseOutcome {
        let Some(provider) = &self.provider else {
            return self.rule_based(ctx);
        };

        let prompt = build_prompt(ctx);
        match provider.generate(&prompt).await {
            Ok(raw) => match self.sanitizer.sanitize(&ctx.question, &raw) {
                Some(simplified) => RephraseOutcome {
                    simplified,
                    provider: provider.name(),
                    used_fallback: false,
                },
                None => {
                    debug!(provider = provider.name(), "llm output unusable, keeping original");
                    RephraseOutcome {
                        simplified: ctx.question.clone(),
                        provider: provider.name(),
                        used_fallback: true,
                    }
                }
            },
            Err(err) => {
                warn!(provider = provider.name(), error = %err, "rephrase call failed");
                RephraseOutcome {
                    simplified: ctx.question.clone(),
                    provider: provider.name(),
                    used_fallback: true,
                }
            }
        }
    }

    fn rule_based(&self, ctx: &RephraseContext) -> RephraseOutcome {
        RephraseOutcome {
            simplified: apply_replacements(&ctx.question),
            provider: "rule_based",
            used_fallback: true,
        }
    }
}

fn neurotype_guidance(flags: &[String]) -> &'static str {
    for flag in flags {
        match flag.to_lowercase().as_str() {
            "dyslexia" => {
                return "Use short common words. Avoid words that look alike. \
                        Keep sentences under 8 words."
            }
            "adhd" => {
                return "Be direct and action-oriented. Start with the action verb. \
                        One instruction only."
            }
            "asd" | "autism" => {
                return "Be literal and concrete. No idioms or figures of speech. \
                        State exactly what to do."
            }
            _ => {}
        }
    }
    "Use simple, clear language a young child understands."
}

fn build_prompt(ctx: &RephraseContext) -> String {
    let mut prompt = String::from(
        "You simplify questions for children with learning differences.\n",
    );
    prompt.push_str(neurotype_guidance(&ctx.neuro_flags));
    prompt.push('\n');
    if ctx.confusion_detected {
        prompt.push_str(
            "The child is confused by the current wording. Make it much simpler.\n",
        );
    }
    prompt.push_str("\nOriginal question: ");
    prompt.push_str(&ctx.question);
    prompt.push('\n');
    if !ctx.options.is_empty() {
        prompt.push_str("Answer options:\n");
        for (i, option) in ctx.options.iter().enumerate() {
            let letter = (b'A' + (i % 26) as u8) as char;
            prompt.push_str(&format!("{letter}. {option}\n"));
        }
        prompt.push_str("Do not reveal which option is correct.\n");
    }
    prompt.push_str(
        "\nSimplified question (write ONLY the simplified version, nothing else):",
    );
    prompt
}

pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(client: reqwest::Client, base_url: String, model: String) -> Self {
        Self { client, base_url, model }
    }
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[async_trait]
impl RephraseProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let body = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let value: Value = response.json().await?;
        value
            .get("response")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client, api_key: String, model: String) -> Self {
        Self { client, api_key, model }
    }
}

#[async_trait]
impl RephraseProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header("X-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let value: Value = response.json().await?;
        value
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}
