//! # Time Buddy Core Library
//!
//! This library provides the planning logic behind Time Buddy: it takes the
//! tasks a user wants to get through today and lays them out on a single
//! day's timeline, respecting fixed appointments, earliest-start bounds and
//! deadlines, while keeping lateness and unfinished work to a minimum.
//!
//! ## Architecture
//!
//! - **Chunking**: Splits work into 25-minute focus chunks with a
//!   small-remainder merge rule
//! - **Timeline**: Sorted, non-overlapping blocks with first-fit slot search
//! - **Scheduler**: Greedy initial placement followed by stochastic hill
//!   climbing over random block relocations
//! - **Predictor**: Suggests priority and duration for new tasks from their
//!   name, learned from completed-task history
//! - **Storage**: TOML-based configuration and the persisted predictor model
//!
//! ## Key Components
//!
//! - [`HillClimber`]: The optimizer driver
//! - [`InitialPlacer`]: Greedy first placement
//! - [`Timeline`]: Block storage and slot search
//! - [`TaskPredictor`]: Capability trait for attribute suggestions
//! - [`Config`]: Application configuration management

pub mod chunking;
pub mod error;
pub mod predictor;
pub mod request;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod timeline;

pub use chunking::{chunks_for, plan_chunks};
pub use error::{ConfigError, CoreError, SlotError, ValidationError};
pub use predictor::{
    log_completed_task, retrain, DefaultPredictor, HistoryItem, HistoryStore, KeywordModel,
    LoggedTask, ModelPredictor, Prediction, RetrainOutcome, RetrainStatus, TaskPredictor,
};
pub use request::{ScheduleRequest, ScheduleResponse, TaskInput, TaskSummary, TimelineEntry};
pub use scheduler::{
    plan_day, score, DayWindow, HillClimber, InitialPlacer, NeighborOperator, Optimization,
    SchedulerConfig, Snapshot,
};
pub use storage::{Config, PredictorConfig};
pub use task::{Priority, TaskId, TaskRecord, TaskState, TaskStatus};
pub use timeline::{Block, BlockOwner, Timeline};
