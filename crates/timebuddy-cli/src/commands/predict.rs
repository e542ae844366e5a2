use std::path::Path;

use timebuddy_core::{retrain, Config, HistoryItem, HistoryStore, ModelPredictor, TaskPredictor};

pub fn run_predict(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    if name.trim().is_empty() {
        return Err("task name cannot be empty".into());
    }
    let config = Config::load_or_default();
    let predictor = ModelPredictor::load(&config.model_path()?);
    let prediction = predictor.predict(name);
    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}

/// Retrain from `history`, or from the logged history when no file is given.
pub fn run_retrain(history: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let items: Vec<HistoryItem> = match history {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => HistoryStore::new(config.history_path()?).load()?,
    };
    if items.is_empty() {
        return Err("history cannot be empty".into());
    }

    let outcome = retrain(
        &items,
        &config.model_path()?,
        config.predictor.min_training_samples,
    );
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
