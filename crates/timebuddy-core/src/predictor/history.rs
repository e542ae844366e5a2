//! Append-only log of completed tasks.
//!
//! Each entry is one JSON object on its own line. Whenever the log length
//! reaches a multiple of the training threshold the predictor is refit from
//! the whole log.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::retrain::{retrain, HistoryItem, RetrainOutcome};
use crate::error::{Result, ValidationError};

/// Completed-task history stored as JSON lines.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All logged items, oldest first. A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<HistoryItem>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut items = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            items.push(serde_json::from_str(&line)?);
        }
        Ok(items)
    }

    /// Append one item and return the new history length.
    pub fn append(&self, item: &HistoryItem) -> Result<usize> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(item)?)?;
        Ok(self.load()?.len())
    }
}

/// Result of logging one completed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedTask {
    /// History length after the append
    pub history_len: usize,
    /// Present when this entry triggered a retrain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrain: Option<RetrainOutcome>,
}

/// Record a completed task and retrain on every `min_samples`-th entry.
///
/// A rejected or unwritable entry is an error; the retrain itself never
/// fails, its status is carried in [`LoggedTask::retrain`].
pub fn log_completed_task(
    store: &HistoryStore,
    item: &HistoryItem,
    model_path: &Path,
    min_samples: usize,
) -> Result<LoggedTask> {
    if item.task_name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "task_name".into(),
            message: "must not be empty".into(),
        }
        .into());
    }
    if item.actual_duration_minutes == 0 {
        return Err(ValidationError::InvalidValue {
            field: "actual_duration_minutes".into(),
            message: "must be positive".into(),
        }
        .into());
    }

    let history_len = store.append(item)?;
    let outcome = if history_len % min_samples.max(1) == 0 {
        tracing::info!(
            history_len,
            path = %store.path().display(),
            "history reached retrain trigger"
        );
        Some(retrain(&store.load()?, model_path, min_samples))
    } else {
        None
    };

    Ok(LoggedTask {
        history_len,
        retrain: outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::{ModelPredictor, RetrainStatus};
    use crate::task::Priority;

    fn item(name: &str, priority: Priority, minutes: u32) -> HistoryItem {
        HistoryItem {
            task_name: name.to_string(),
            priority,
            actual_duration_minutes: minutes,
        }
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.jsonl"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nested").join("history.jsonl"));

        let first = item("Water plants", Priority::Low, 10);
        let second = item("File taxes", Priority::High, 90);
        assert_eq!(store.append(&first).unwrap(), 1);
        assert_eq!(store.append(&second).unwrap(), 2);

        let loaded = store.load().unwrap();
        assert_eq!(loaded[0].task_name, "Water plants");
        assert_eq!(loaded[1].priority, Priority::High);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
    }

    #[test]
    fn test_corrupt_line_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        std::fs::write(&path, "{ nope\n").unwrap();
        assert!(HistoryStore::new(path).load().is_err());
    }

    #[test]
    fn test_rejects_invalid_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.jsonl"));
        let model = dir.path().join("model.json");

        let blank = item("  ", Priority::Low, 10);
        assert!(log_completed_task(&store, &blank, &model, 3).is_err());
        let instant = item("Nap", Priority::Low, 0);
        assert!(log_completed_task(&store, &instant, &model, 3).is_err());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_retrains_on_every_threshold_multiple() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.jsonl"));
        let model = dir.path().join("model.json");
        let entries = [
            item("Prepare tax return", Priority::High, 90),
            item("Water plants", Priority::Low, 10),
            item("Team standup meeting", Priority::Medium, 15),
        ];

        let mut triggered = Vec::new();
        for (i, entry) in entries.iter().cycle().take(7).enumerate() {
            let logged = log_completed_task(&store, entry, &model, 3).unwrap();
            assert_eq!(logged.history_len, i + 1);
            if let Some(outcome) = logged.retrain {
                assert_eq!(outcome.status, RetrainStatus::TrainingComplete);
                triggered.push(logged.history_len);
            }
        }

        assert_eq!(triggered, vec![3, 6]);
        let predictor = ModelPredictor::load(&model);
        assert!(predictor.is_trained());
    }

    #[test]
    fn test_no_retrain_before_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.jsonl"));
        let model = dir.path().join("model.json");

        let entry = item("Water plants", Priority::Low, 10);
        let logged = log_completed_task(&store, &entry, &model, 30).unwrap();
        assert_eq!(logged.history_len, 1);
        assert_eq!(logged.retrain, None);
        assert!(!model.exists());
    }
}
