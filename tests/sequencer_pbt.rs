//! Property-based tests for the activity sequencer.
//!
//! Invariants checked:
//! - A full walk visits every activity in the module exactly once
//! - The walk always terminates with a final None
//! - Visit order follows (numeric lesson id, activity id)
//! - An unknown last activity restarts from the beginning

use proptest::prelude::*;

use neuropath_backend::catalog::sequencer::next_in_sequence;
use neuropath_backend::catalog::{
    ActivityAccessibility, ActivityItem, ActivityType, Catalog, Difficulty,
};

fn item(id: String, module_id: &str, lesson_id: String) -> ActivityItem {
    ActivityItem {
        id,
        module_id: module_id.to_string(),
        lesson_id,
        activity_type: ActivityType::ImageToWord,
        instruction: "Pick the right answer.".to_string(),
        instruction_tts: None,
        stimulus_image_url: None,
        stimulus_image_alt: None,
        stimulus_emoji: None,
        stimulus_description: None,
        steps: None,
        options: Vec::new(),
        difficulty: Difficulty::Easy,
        max_time_seconds: None,
        target_category: None,
        accessibility: ActivityAccessibility {
            recommended_for: Vec::new(),
            enable_tts_on_hover: false,
            show_progress_bar: false,
            avoid_metaphors: true,
            consistent_feedback: true,
        },
    }
}

fn arb_lesson_id() -> impl Strategy<Value = String> {
    (1u32..=4, prop::option::of(0u32..=12)).prop_map(|(major, minor)| match minor {
        Some(minor) => format!("{major}.{minor}"),
        None => major.to_string(),
    })
}

/// Catalog with 1..=15 uniquely-identified activities spread over random
/// lessons of one module.
fn arb_module_catalog() -> impl Strategy<Value = Catalog> {
    prop::collection::vec(arb_lesson_id(), 1..=15).prop_map(|lessons| {
        let items = lessons
            .into_iter()
            .enumerate()
            .map(|(idx, lesson_id)| item(format!("ACT_{idx:03}"), "M1", lesson_id))
            .collect();
        Catalog::new(items)
    })
}

fn walk(catalog: &Catalog, module_id: &str) -> Vec<String> {
    let mut visited = Vec::new();
    let mut last: Option<(String, String)> = None;
    loop {
        let next = next_in_sequence(
            catalog,
            module_id,
            last.as_ref().map(|(id, _)| id.as_str()),
            last.as_ref().map(|(_, lesson)| lesson.as_str()),
        );
        match next {
            Some(activity) => {
                assert!(
                    visited.len() <= catalog.len(),
                    "walk exceeded catalog size"
                );
                visited.push(activity.id.clone());
                last = Some((activity.id.clone(), activity.lesson_id.clone()));
            }
            None => return visited,
        }
    }
}

fn lesson_key(lesson_id: &str) -> f64 {
    lesson_id.parse::<f64>().unwrap_or(f64::MAX)
}

proptest! {
    #[test]
    fn walk_visits_every_activity_exactly_once(catalog in arb_module_catalog()) {
        let visited = walk(&catalog, "M1");

        prop_assert_eq!(visited.len(), catalog.len());
        let mut deduped = visited.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), catalog.len());
    }

    #[test]
    fn walk_order_follows_lesson_then_id(catalog in arb_module_catalog()) {
        let visited = walk(&catalog, "M1");

        for pair in visited.windows(2) {
            let a = catalog.by_id(&pair[0]).unwrap();
            let b = catalog.by_id(&pair[1]).unwrap();
            let key_a = (lesson_key(&a.lesson_id), a.id.as_str());
            let key_b = (lesson_key(&b.lesson_id), b.id.as_str());
            prop_assert!(
                key_a.0 < key_b.0 || (key_a.0 == key_b.0 && key_a.1 < key_b.1),
                "{} served before {} out of order",
                a.id,
                b.id
            );
        }
    }

    #[test]
    fn unknown_last_activity_restarts_from_first(catalog in arb_module_catalog()) {
        let first = next_in_sequence(&catalog, "M1", None, None).unwrap().id.clone();
        let resumed = next_in_sequence(&catalog, "M1", Some("NO_SUCH_ACTIVITY"), None)
            .unwrap()
            .id
            .clone();
        prop_assert_eq!(first, resumed);
    }

    #[test]
    fn unknown_module_always_yields_none(catalog in arb_module_catalog()) {
        prop_assert!(next_in_sequence(&catalog, "M99", None, None).is_none());
    }
}
