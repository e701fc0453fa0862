//! Deterministic activity sequencing within a module.
//!
//! Activities are totally ordered by (lesson id as a decimal number, id
//! lexicographically). Walking the order from the last completed activity
//! yields the next one; the end of a module is a normal terminal state,
//! never an error, and there is no wraparound.

use super::{ActivityItem, Catalog};

/// Activities of a module in (lesson, id) order. Unknown modules yield an
/// empty vector so callers degrade to "no next activity".
pub fn ordered_module_activities<'a>(
    catalog: &'a Catalog,
    module_id: &str,
) -> Vec<&'a ActivityItem> {
    let mut activities = catalog.by_module(module_id);
    activities.sort_by(|a, b| {
        lesson_sort_key(&a.lesson_id)
            .total_cmp(&lesson_sort_key(&b.lesson_id))
            .then_with(|| a.id.cmp(&b.id))
    });
    activities
}

/// Next activity a learner should see in `module_id`.
///
/// - no `last_activity_id`: the first activity in order;
/// - `last_activity_id` found: the one after it, or `None` at the end;
/// - unknown `last_activity_id` with a `last_lesson_id`: the activity after
///   the first activity of that lesson;
/// - otherwise: treat as a fresh start and return the first activity.
///
/// Pure read over the catalog; safe to call from concurrent requests.
pub fn next_in_sequence<'a>(
    catalog: &'a Catalog,
    module_id: &str,
    last_activity_id: Option<&str>,
    last_lesson_id: Option<&str>,
) -> Option<&'a ActivityItem> {
    let ordered = ordered_module_activities(catalog, module_id);
    if ordered.is_empty() {
        return None;
    }

    let Some(last_id) = last_activity_id else {
        return Some(ordered[0]);
    };

    if let Some(pos) = ordered.iter().position(|item| item.id == last_id) {
        return ordered.get(pos + 1).copied();
    }

    if let Some(lesson) = last_lesson_id {
        if let Some(pos) = ordered.iter().position(|item| item.lesson_id == lesson) {
            return ordered.get(pos + 1).copied();
        }
    }

    Some(ordered[0])
}

/// "1.2" sorts as 1.2; malformed lesson ids sink to the end of the order.
fn lesson_sort_key(lesson_id: &str) -> f64 {
    lesson_id.parse::<f64>().unwrap_or(f64::MAX)
}
