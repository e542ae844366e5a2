use clap::{Parser, Subcommand};
use timebuddy_core::Priority;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "timebuddy", version, about = "Time Buddy CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a day from a JSON request file
    Schedule(commands::schedule::ScheduleArgs),
    /// Suggest priority and duration for a task name
    Predict {
        /// Task name
        name: String,
    },
    /// Retrain the predictor from a JSON history file or the logged history
    Retrain {
        /// Path to a JSON array of completed tasks
        history: Option<std::path::PathBuf>,
    },
    /// Log a completed task; retrains every `min_training_samples` entries
    LogTask {
        /// Task name
        name: String,
        /// low, medium or high
        priority: Priority,
        /// Actual duration (minutes)
        minutes: u32,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Schedule(args) => commands::schedule::run(args),
        Commands::Predict { name } => commands::predict::run_predict(&name),
        Commands::Retrain { history } => commands::predict::run_retrain(history.as_deref()),
        Commands::LogTask {
            name,
            priority,
            minutes,
        } => commands::history::run_log_task(name, priority, minutes),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
