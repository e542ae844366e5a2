use timebuddy_core::{log_completed_task, Config, HistoryItem, HistoryStore, Priority};

/// Append a completed task to the history log, retraining when due.
pub fn run_log_task(
    name: String,
    priority: Priority,
    minutes: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = HistoryStore::new(config.history_path()?);
    let item = HistoryItem {
        task_name: name,
        priority,
        actual_duration_minutes: minutes,
    };

    let logged = log_completed_task(
        &store,
        &item,
        &config.model_path()?,
        config.predictor.min_training_samples,
    )?;
    println!("{}", serde_json::to_string_pretty(&logged)?);
    Ok(())
}
