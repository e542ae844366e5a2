//! Priority and duration suggestions for new tasks.
//!
//! The scheduler only needs [`TaskPredictor`]; it asks for a suggestion when
//! a task arrives without a priority or a duration. Predictors never fail:
//! anything that goes wrong degrades to [`Prediction::default`].

mod history;
mod keyword;
mod retrain;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::task::Priority;

pub use history::{log_completed_task, HistoryStore, LoggedTask};
pub use keyword::{tokenize, KeywordModel};
pub use retrain::{retrain, HistoryItem, RetrainOutcome, RetrainStatus, MIN_TRAINING_SAMPLES};

/// Smallest duration a predictor may suggest (minutes).
pub const MIN_PREDICTED_MINUTES: u32 = 5;

/// Suggested attributes for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(alias = "predicted_priority")]
    pub priority: Priority,
    #[serde(alias = "predicted_duration")]
    pub duration_minutes: u32,
}

impl Default for Prediction {
    fn default() -> Self {
        Self {
            priority: Priority::Medium,
            duration_minutes: 30,
        }
    }
}

/// Anything that can suggest attributes from a task name.
pub trait TaskPredictor {
    fn predict(&self, task_name: &str) -> Prediction;
}

/// Always suggests `{medium, 30}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPredictor;

impl TaskPredictor for DefaultPredictor {
    fn predict(&self, _task_name: &str) -> Prediction {
        Prediction::default()
    }
}

/// Predictor backed by a persisted [`KeywordModel`].
///
/// Without a trained model it behaves like [`DefaultPredictor`].
#[derive(Debug, Clone, Default)]
pub struct ModelPredictor {
    model: Option<KeywordModel>,
}

impl ModelPredictor {
    pub fn new(model: KeywordModel) -> Self {
        Self { model: Some(model) }
    }

    /// Load the model stored at `path`.
    ///
    /// A missing file means "not trained yet"; an unreadable one is logged
    /// and treated the same way.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match read_model(path) {
            Ok(model) => {
                tracing::debug!(samples = model.samples(), "loaded predictor model");
                Self::new(model)
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "ignoring unreadable predictor model"
                );
                Self::default()
            }
        }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }
}

fn read_model(path: &Path) -> crate::error::Result<KeywordModel> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

impl TaskPredictor for ModelPredictor {
    fn predict(&self, task_name: &str) -> Prediction {
        match &self.model {
            Some(model) => model.predict(task_name),
            None => Prediction::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prediction() {
        assert_eq!(
            DefaultPredictor.predict("anything"),
            Prediction {
                priority: Priority::Medium,
                duration_minutes: 30
            }
        );
    }

    #[test]
    fn test_missing_model_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = ModelPredictor::load(&dir.path().join("absent.json"));
        assert!(!predictor.is_trained());
        assert_eq!(predictor.predict("Write report"), Prediction::default());
    }

    #[test]
    fn test_corrupt_model_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();
        let predictor = ModelPredictor::load(&path);
        assert!(!predictor.is_trained());
        assert_eq!(predictor.predict("Write report"), Prediction::default());
    }

    #[test]
    fn test_prediction_accepts_legacy_field_names() {
        let json = r#"{"predicted_priority":"high","predicted_duration":45}"#;
        let p: Prediction = serde_json::from_str(json).unwrap();
        assert_eq!(p.priority, Priority::High);
        assert_eq!(p.duration_minutes, 45);
    }
}
