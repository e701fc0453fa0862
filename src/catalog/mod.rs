mod items;
pub mod sequencer;

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "easy")]
    Easy,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "hard")]
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    ImageToWord,
    OneStepInstruction,
    TwoStepSequence,
    Counting,
    VisualAddition,
    Pattern,
    Comparison,
    LogicChoice,
    SequenceOrdering,
    FocusFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityOption {
    pub id: String,
    pub label: String,
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityAccessibility {
    pub recommended_for: Vec<String>,
    pub enable_tts_on_hover: bool,
    pub show_progress_bar: bool,
    pub avoid_metaphors: bool,
    pub consistent_feedback: bool,
}

/// Immutable content record. Authored once, never mutated at runtime.
/// The id encodes the owning module as a prefix ("M1_L1_Q1"); the
/// sequencer relies on ids being unique across the whole catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: String,
    pub module_id: String,
    pub lesson_id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction_tts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stimulus_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stimulus_image_alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stimulus_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stimulus_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    pub options: Vec<ActivityOption>,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_category: Option<String>,
    pub accessibility: ActivityAccessibility,
}

/// Read-only activity catalog, loaded once at startup and shared behind an
/// `Arc`. Concurrent reads need no locking.
#[derive(Debug)]
pub struct Catalog {
    items: Vec<ActivityItem>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(items: Vec<ActivityItem>) -> Self {
        let by_id = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.id.clone(), idx))
            .collect();
        Self { items, by_id }
    }

    /// Built-in content set shipped with the service.
    pub fn builtin() -> Self {
        Self::new(items::builtin_activities())
    }

    pub fn all(&self) -> &[ActivityItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn by_id(&self, activity_id: &str) -> Option<&ActivityItem> {
        self.by_id.get(activity_id).map(|&idx| &self.items[idx])
    }

    pub fn by_module(&self, module_id: &str) -> Vec<&ActivityItem> {
        self.items
            .iter()
            .filter(|item| item.module_id == module_id)
            .collect()
    }

    pub fn by_lesson(&self, module_id: &str, lesson_id: &str) -> Vec<&ActivityItem> {
        self.items
            .iter()
            .filter(|item| item.module_id == module_id && item.lesson_id == lesson_id)
            .collect()
    }

    pub fn module_total(&self, module_id: &str) -> usize {
        self.items
            .iter()
            .filter(|item| item.module_id == module_id)
            .count()
    }

    /// Module ids in ascending order, derived from the content itself.
    pub fn module_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| item.module_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Module owning an activity id, via the `M<n>_` prefix encoding.
    pub fn module_of(&self, activity_id: &str) -> Option<&str> {
        self.by_id(activity_id).map(|item| item.module_id.as_str())
    }
}
