use std::path::PathBuf;

use clap::Args;
use timebuddy_core::{plan_day, Config, ModelPredictor, ScheduleRequest};

#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to the request JSON (tasks, day_start, day_end)
    pub request: PathBuf,
    /// Seed for a reproducible plan
    #[arg(long)]
    pub seed: Option<u64>,
    /// Override the number of hill-climbing iterations
    #[arg(long)]
    pub iterations: Option<usize>,
    /// Override the neighbors sampled per iteration
    #[arg(long)]
    pub neighbors: Option<usize>,
}

pub fn run(args: ScheduleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&args.request)?;
    let request: ScheduleRequest = serde_json::from_str(&content)?;

    let config = Config::load_or_default();
    let mut scheduler = config.scheduler.clone();
    if let Some(seed) = args.seed {
        scheduler.seed = Some(seed);
    }
    if let Some(iterations) = args.iterations {
        scheduler.max_iterations = iterations;
    }
    if let Some(neighbors) = args.neighbors {
        scheduler.neighbors_per_iteration = neighbors;
    }

    let predictor = ModelPredictor::load(&config.model_path()?);
    let response = plan_day(&request, &predictor, &scheduler)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
