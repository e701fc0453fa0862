//! Free-text feedback scoring. A remote classifier can be configured; the
//! keyword counter is always available as the fallback and implements the
//! same output contract: score in [-1, 1], confusion below -0.3.

use serde::Deserialize;
use tracing::warn;

/// Sentiment below this threshold flags likely learner confusion.
pub const CONFUSION_THRESHOLD: f64 = -0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentResult {
    pub score: f64,
    pub confusion: bool,
}

impl SentimentResult {
    fn from_score(score: f64) -> Self {
        Self {
            score,
            confusion: score < CONFUSION_THRESHOLD,
        }
    }

    fn neutral() -> Self {
        Self {
            score: 0.0,
            confusion: false,
        }
    }
}

#[async_trait::async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> SentimentResult;
}

const NEGATIVE_WORDS: &[&str] = &[
    "confus",
    "difficult",
    "hard",
    "don't understand",
    "unclear",
    "frustrated",
    "impossible",
    "wrong",
    "bad",
    "hate",
    "terrible",
    "not clear",
    "too hard",
    "can't",
    "cannot",
];

const POSITIVE_WORDS: &[&str] = &[
    "easy", "fun", "like", "good", "great", "understand", "clear", "enjoy", "love", "helpful",
    "excellent", "perfect",
];

/// Rule-based scorer: (positive - negative) / (positive + negative) over
/// substring matches. No matches means neutral.
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    pub fn score(text: &str) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::neutral();
        }

        let lower = text.to_lowercase();
        let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(**w)).count() as f64;
        let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(**w)).count() as f64;

        if positive + negative == 0.0 {
            return SentimentResult::neutral();
        }

        SentimentResult::from_score((positive - negative) / (positive + negative))
    }
}

#[async_trait::async_trait]
impl SentimentAnalyzer for KeywordAnalyzer {
    async fn analyze(&self, text: &str) -> SentimentResult {
        Self::score(text)
    }
}

#[derive(Debug, Deserialize)]
struct RemoteScore {
    score: f64,
}

/// Calls an external classifier endpoint; any failure falls back to the
/// keyword rule. No retries: one attempt, then degrade.
pub struct RemoteAnalyzer {
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteAnalyzer {
    pub fn new(endpoint: String, client: reqwest::Client) -> Self {
        Self { endpoint, client }
    }

    /// Remote analyzer when `SENTIMENT_API_URL` is set, keyword fallback
    /// otherwise.
    pub fn from_env(client: reqwest::Client) -> Box<dyn SentimentAnalyzer> {
        match std::env::var("SENTIMENT_API_URL") {
            Ok(endpoint) if !endpoint.trim().is_empty() => {
                Box::new(Self::new(endpoint, client))
            }
            _ => Box::new(KeywordAnalyzer),
        }
    }
}

#[async_trait::async_trait]
impl SentimentAnalyzer for RemoteAnalyzer {
    async fn analyze(&self, text: &str) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::neutral();
        }

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(std::time::Duration::from_secs(5))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => match resp.json::<RemoteScore>().await {
                Ok(body) => SentimentResult::from_score(body.score.clamp(-1.0, 1.0)),
                Err(err) => {
                    warn!(error = %err, "sentiment response decode failed, using keyword fallback");
                    KeywordAnalyzer::score(text)
                }
            },
            Ok(resp) => {
                warn!(status = %resp.status(), "sentiment service error, using keyword fallback");
                KeywordAnalyzer::score(text)
            }
            Err(err) => {
                warn!(error = %err, "sentiment service unreachable, using keyword fallback");
                KeywordAnalyzer::score(text)
            }
        }
    }
}
