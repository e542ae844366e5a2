//! Refitting the predictor from completed-task history.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::keyword::{tokenize, KeywordModel};
use crate::task::Priority;

/// Training is skipped until at least this many completed tasks exist.
pub const MIN_TRAINING_SAMPLES: usize = 30;

/// One completed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub task_name: String,
    pub priority: Priority,
    pub actual_duration_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrainStatus {
    TrainingComplete,
    SkippedTraining,
    TrainingFailed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainOutcome {
    pub status: RetrainStatus,
    pub message: String,
}

impl RetrainOutcome {
    fn new(status: RetrainStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Refit the model from `history` and store it at `store`.
///
/// Below `min_samples` items nothing is written. Malformed history or a
/// failed write is reported as [`RetrainStatus::TrainingFailed`]; this
/// function never returns an error.
pub fn retrain(history: &[HistoryItem], store: &Path, min_samples: usize) -> RetrainOutcome {
    if history.len() < min_samples {
        return RetrainOutcome::new(
            RetrainStatus::SkippedTraining,
            format!(
                "Need at least {min_samples} completed tasks to train. Currently have {}.",
                history.len()
            ),
        );
    }

    if let Some(bad) = history.iter().find(|h| h.actual_duration_minutes == 0) {
        return RetrainOutcome::new(
            RetrainStatus::TrainingFailed,
            format!("history item '{}' has a zero duration", bad.task_name),
        );
    }
    if history.iter().all(|h| tokenize(&h.task_name).is_empty()) {
        return RetrainOutcome::new(
            RetrainStatus::TrainingFailed,
            "history contains no usable words in task names",
        );
    }

    tracing::info!(samples = history.len(), "retraining predictor");
    let model = KeywordModel::fit(
        history
            .iter()
            .map(|h| (h.task_name.as_str(), h.priority, h.actual_duration_minutes)),
    );

    match write_model(&model, store) {
        Ok(()) => RetrainOutcome::new(
            RetrainStatus::TrainingComplete,
            format!(
                "Model was successfully retrained with {} tasks.",
                history.len()
            ),
        ),
        Err(err) => {
            tracing::warn!(
                path = %store.display(),
                error = %err,
                "failed to store predictor model"
            );
            RetrainOutcome::new(RetrainStatus::TrainingFailed, err.to_string())
        }
    }
}

fn write_model(model: &KeywordModel, store: &Path) -> crate::error::Result<()> {
    if let Some(parent) = store.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(model)?;
    std::fs::write(store, json)?;
    Ok(())
}
