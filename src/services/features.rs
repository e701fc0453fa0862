//! Aggregates a user's recent interaction history into the fixed-length
//! numeric summary consumed by the recommender.

use serde::{Deserialize, Serialize};

use crate::db::interactions::InteractionRecord;

/// How many of the newest interactions feed the averages.
pub const HISTORY_WINDOW: i64 = 50;

const DEFAULT_TIME_TAKEN: f64 = 30.0;
const DEFAULT_RATING: f64 = 3.0;
const DEFAULT_ATTENTION: f64 = 0.8;

/// Seven running averages over the recent history. Fields a record does not
/// carry are skipped from that field's mean rather than zero-filled; an
/// empty history yields the documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    pub avg_accuracy: f64,
    pub avg_time: f64,
    pub avg_difficulty_rating: f64,
    pub avg_focus_rating: f64,
    pub avg_attention_score: f64,
    pub avg_sentiment: f64,
    pub confusion_rate: f64,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            avg_accuracy: 0.0,
            avg_time: DEFAULT_TIME_TAKEN,
            avg_difficulty_rating: DEFAULT_RATING,
            avg_focus_rating: DEFAULT_RATING,
            avg_attention_score: DEFAULT_ATTENTION,
            avg_sentiment: 0.0,
            confusion_rate: 0.0,
        }
    }
}

pub fn build_features(logs: &[InteractionRecord]) -> FeatureVector {
    if logs.is_empty() {
        return FeatureVector::default();
    }

    let total = logs.len() as f64;
    let correct = logs.iter().filter(|log| log.is_correct).count() as f64;

    let times: Vec<f64> = logs
        .iter()
        .map(|log| log.time_taken)
        .filter(|time| *time > 0.0)
        .collect();
    let difficulty: Vec<f64> = logs
        .iter()
        .filter_map(|log| log.difficulty_rating)
        .map(|rating| rating as f64)
        .collect();
    let focus: Vec<f64> = logs
        .iter()
        .filter_map(|log| log.focus_rating)
        .map(|rating| rating as f64)
        .collect();
    let attention: Vec<f64> = logs.iter().filter_map(|log| log.attention_score).collect();
    let sentiment: Vec<f64> = logs.iter().filter_map(|log| log.sentiment_score).collect();
    let confused = logs
        .iter()
        .filter(|log| log.confusion_flag.unwrap_or(false))
        .count() as f64;

    FeatureVector {
        avg_accuracy: correct / total,
        avg_time: mean_or(&times, DEFAULT_TIME_TAKEN),
        avg_difficulty_rating: mean_or(&difficulty, DEFAULT_RATING),
        avg_focus_rating: mean_or(&focus, DEFAULT_RATING),
        avg_attention_score: mean_or(&attention, DEFAULT_ATTENTION),
        avg_sentiment: mean_or(&sentiment, 0.0),
        confusion_rate: confused / total,
    }
}

fn mean_or(values: &[f64], default: f64) -> f64 {
    if values.is_empty() {
        default
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_correct: bool, time_taken: f64) -> InteractionRecord {
        InteractionRecord {
            id: "i1".to_string(),
            user_id: Some("u1".to_string()),
            activity_id: "M1_L1_Q1".to_string(),
            answer: "A".to_string(),
            is_correct,
            time_taken,
            difficulty_rating: None,
            focus_rating: None,
            feedback_text: None,
            sentiment_score: None,
            confusion_flag: None,
            attention_score: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn empty_history_yields_defaults() {
        let features = build_features(&[]);
        assert_eq!(features, FeatureVector::default());
        assert_eq!(features.avg_time, 30.0);
        assert_eq!(features.avg_attention_score, 0.8);
    }

    #[test]
    fn accuracy_and_time_are_simple_means() {
        let logs = vec![record(true, 10.0), record(false, 20.0), record(true, 30.0)];
        let features = build_features(&logs);
        assert!((features.avg_accuracy - 2.0 / 3.0).abs() < 1e-9);
        assert!((features.avg_time - 20.0).abs() < 1e-9);
    }

    #[test]
    fn absent_fields_fall_back_to_defaults_not_zero() {
        // records with no ratings at all: means come from the defaults
        let logs = vec![record(true, 12.0)];
        let features = build_features(&logs);
        assert_eq!(features.avg_difficulty_rating, 3.0);
        assert_eq!(features.avg_focus_rating, 3.0);
        assert_eq!(features.avg_attention_score, 0.8);
    }

    #[test]
    fn sparse_fields_average_only_present_values() {
        let mut with_rating = record(true, 10.0);
        with_rating.difficulty_rating = Some(5);
        with_rating.sentiment_score = Some(-0.5);
        with_rating.confusion_flag = Some(true);
        let without = record(false, 10.0);

        let features = build_features(&[with_rating, without]);
        assert_eq!(features.avg_difficulty_rating, 5.0);
        assert_eq!(features.avg_sentiment, -0.5);
        // confusion rate divides by the whole window, not present values
        assert_eq!(features.confusion_rate, 0.5);
    }

    #[test]
    fn zero_time_taken_is_treated_as_missing() {
        let logs = vec![record(true, 0.0), record(true, 40.0)];
        let features = build_features(&logs);
        assert_eq!(features.avg_time, 40.0);
    }
}
