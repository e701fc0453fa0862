//! Pluggable recommendation strategy: feature vector in, coarse
//! (topic, difficulty, modality) triple out. The default implementation is
//! a fixed threshold rule; a trained model can be swapped in behind the
//! trait without touching callers.

use serde::{Deserialize, Serialize};

use crate::catalog::{ActivityItem, ActivityType, Catalog, Difficulty};
use crate::services::features::FeatureVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Reading,
    Math,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Audio,
    Visual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub modality: Modality,
}

impl Recommendation {
    /// Content filter: which activity type serves this (topic, modality)
    /// pair.
    pub fn activity_type(&self) -> ActivityType {
        match (self.topic, self.modality) {
            (Topic::Reading, Modality::Audio) => ActivityType::OneStepInstruction,
            (Topic::Math, Modality::Text) => ActivityType::Counting,
            (Topic::Math, Modality::Visual) => ActivityType::VisualAddition,
            (Topic::Reading, _) => ActivityType::ImageToWord,
            (Topic::Math, Modality::Audio) => ActivityType::Counting,
        }
    }
}

pub trait Recommender: Send + Sync {
    fn recommend(&self, features: &FeatureVector) -> Recommendation;
}

/// Threshold rule standing in for the trained classifiers. The difficulty
/// cut points match the rule the synthetic training data encoded.
pub struct ThresholdRecommender;

impl Recommender for ThresholdRecommender {
    fn recommend(&self, features: &FeatureVector) -> Recommendation {
        let difficulty = if features.avg_accuracy < 0.4 {
            Difficulty::Easy
        } else if features.avg_accuracy < 0.75 {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        };

        // struggling or confused learners go back to reading basics;
        // low attention favors audio, otherwise visual math
        let (topic, modality) = if features.avg_accuracy < 0.4 || features.confusion_rate > 0.3 {
            (Topic::Reading, Modality::Text)
        } else if features.avg_attention_score < 0.5 {
            (Topic::Reading, Modality::Audio)
        } else {
            (Topic::Math, Modality::Visual)
        };

        Recommendation {
            topic,
            difficulty,
            modality,
        }
    }
}

/// Pick a concrete activity for a recommendation: first catalog item whose
/// type and difficulty match, else rotate deterministically through the
/// whole catalog by interaction count.
pub fn choose_activity<'a>(
    catalog: &'a Catalog,
    reco: &Recommendation,
    interaction_count: i64,
) -> Option<&'a ActivityItem> {
    if catalog.is_empty() {
        return None;
    }

    let wanted_type = reco.activity_type();
    let exact = catalog
        .all()
        .iter()
        .find(|item| item.activity_type == wanted_type && item.difficulty == reco.difficulty);
    if let Some(item) = exact {
        return Some(item);
    }

    let idx = (interaction_count.max(0) as usize) % catalog.len();
    catalog.all().get(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(accuracy: f64, attention: f64, confusion: f64) -> FeatureVector {
        FeatureVector {
            avg_accuracy: accuracy,
            avg_attention_score: attention,
            confusion_rate: confusion,
            ..FeatureVector::default()
        }
    }

    #[test]
    fn difficulty_follows_accuracy_thresholds() {
        let reco = ThresholdRecommender;
        assert_eq!(reco.recommend(&features(0.2, 0.8, 0.0)).difficulty, Difficulty::Easy);
        assert_eq!(reco.recommend(&features(0.5, 0.8, 0.0)).difficulty, Difficulty::Medium);
        assert_eq!(reco.recommend(&features(0.9, 0.8, 0.0)).difficulty, Difficulty::Hard);
    }

    #[test]
    fn low_accuracy_routes_to_reading_text() {
        let reco = ThresholdRecommender.recommend(&features(0.1, 0.9, 0.0));
        assert_eq!(reco.topic, Topic::Reading);
        assert_eq!(reco.modality, Modality::Text);
        assert_eq!(reco.activity_type(), ActivityType::ImageToWord);
    }

    #[test]
    fn low_attention_routes_to_audio() {
        let reco = ThresholdRecommender.recommend(&features(0.6, 0.3, 0.0));
        assert_eq!(reco.topic, Topic::Reading);
        assert_eq!(reco.modality, Modality::Audio);
    }

    #[test]
    fn confident_learners_get_visual_math() {
        let reco = ThresholdRecommender.recommend(&features(0.8, 0.9, 0.0));
        assert_eq!(reco.topic, Topic::Math);
        assert_eq!(reco.modality, Modality::Visual);
        assert_eq!(reco.activity_type(), ActivityType::VisualAddition);
    }

    #[test]
    fn choose_activity_prefers_exact_type_and_difficulty() {
        let catalog = Catalog::builtin();
        let reco = Recommendation {
            topic: Topic::Math,
            difficulty: Difficulty::Hard,
            modality: Modality::Visual,
        };
        let chosen = choose_activity(&catalog, &reco, 0).unwrap();
        assert_eq!(chosen.activity_type, ActivityType::VisualAddition);
        assert_eq!(chosen.difficulty, Difficulty::Hard);
    }

    #[test]
    fn choose_activity_rotates_when_nothing_matches() {
        let catalog = Catalog::builtin();
        // no hard one_step_instruction exists in the builtin set
        let reco = Recommendation {
            topic: Topic::Reading,
            difficulty: Difficulty::Hard,
            modality: Modality::Audio,
        };
        let len = catalog.len() as i64;
        let a = choose_activity(&catalog, &reco, 0).unwrap();
        let b = choose_activity(&catalog, &reco, 1).unwrap();
        let wrapped = choose_activity(&catalog, &reco, len).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id, wrapped.id);
    }

    #[test]
    fn empty_catalog_yields_none() {
        let empty = Catalog::new(Vec::new());
        let reco = ThresholdRecommender.recommend(&FeatureVector::default());
        assert!(choose_activity(&empty, &reco, 3).is_none());
    }
}
