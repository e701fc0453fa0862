//! Per-module completion derived from the interaction log. Never stored:
//! recomputed on demand from distinct correct answers.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::db::{interactions, Database};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub module_id: String,
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
}

/// Completion percentage for every module the catalog knows about.
/// Anonymous users get zeros without a store read.
pub async fn module_progress(
    db: &Database,
    catalog: &Catalog,
    user_id: Option<&str>,
) -> Result<Vec<ModuleProgress>, sqlx::Error> {
    let Some(user_id) = user_id else {
        return Ok(zero_progress(catalog));
    };

    let correct_ids = interactions::distinct_correct_activity_ids(db, user_id).await?;

    Ok(catalog
        .module_ids()
        .into_iter()
        .map(|module_id| {
            let total = catalog.module_total(&module_id);
            let completed = correct_ids
                .iter()
                .filter(|id| catalog.module_of(id) == Some(module_id.as_str()))
                .count()
                // retried or stale ids can overshoot; completion never does
                .min(total);
            ModuleProgress {
                percent: percent(completed, total),
                module_id,
                completed,
                total,
            }
        })
        .collect())
}

/// All-zero progress for every module. Serves anonymous users and the
/// degraded path when the store cannot be read.
pub fn zero_progress(catalog: &Catalog) -> Vec<ModuleProgress> {
    catalog
        .module_ids()
        .into_iter()
        .map(|module_id| empty_progress(catalog, module_id))
        .collect()
}

fn empty_progress(catalog: &Catalog, module_id: String) -> ModuleProgress {
    let total = catalog.module_total(&module_id);
    ModuleProgress {
        module_id,
        completed: 0,
        total,
        percent: 0.0,
    }
}

/// min(100, completed / total * 100), rounded to one decimal.
fn percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = (completed as f64 / total as f64) * 100.0;
    (raw.min(100.0) * 10.0).round() / 10.0
}
