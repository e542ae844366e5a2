//! Day scheduler: greedy placement refined by stochastic hill climbing.
//!
//! This module lays a task set onto a single day:
//! - Places fixed tasks at their pinned times, flanked by short breaks
//! - Fills the remaining tasks in chunk by chunk, first-fit, in priority order
//! - Scores the result by lateness and unfinished work, weighted by priority
//! - Repeatedly relocates random blocks and keeps strictly better layouts

mod climber;
mod neighbor;
mod placer;
mod score;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::predictor::TaskPredictor;
use crate::request::{ScheduleRequest, ScheduleResponse};
use crate::task::{TaskId, TaskState};
use crate::timeline::Timeline;

pub use climber::{HillClimber, Optimization};
pub use neighbor::NeighborOperator;
pub use placer::InitialPlacer;
pub use score::score;

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Focus chunk length (minutes)
    #[serde(default = "default_chunk_minutes")]
    pub chunk_minutes: i64,
    /// Leftovers strictly shorter than this are merged into the last chunk (minutes)
    #[serde(default = "default_merge_threshold_minutes")]
    pub merge_threshold_minutes: i64,
    /// Break placed between chunks and around fixed tasks (minutes)
    #[serde(default = "default_break_minutes")]
    pub break_minutes: i64,
    /// Hill-climbing iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Neighbors sampled per iteration
    #[serde(default = "default_neighbors_per_iteration")]
    pub neighbors_per_iteration: usize,
    /// Random relocation starts are drawn from `[day_start, day_end - margin]` (minutes)
    #[serde(default = "default_neighbor_window_margin_minutes")]
    pub neighbor_window_margin_minutes: i64,
    /// Fixed seed for reproducible runs (None = entropy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_chunk_minutes() -> i64 {
    25
}
fn default_merge_threshold_minutes() -> i64 {
    10
}
fn default_break_minutes() -> i64 {
    5
}
fn default_max_iterations() -> usize {
    2000
}
fn default_neighbors_per_iteration() -> usize {
    10
}
fn default_neighbor_window_margin_minutes() -> i64 {
    60
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            chunk_minutes: default_chunk_minutes(),
            merge_threshold_minutes: default_merge_threshold_minutes(),
            break_minutes: default_break_minutes(),
            max_iterations: default_max_iterations(),
            neighbors_per_iteration: default_neighbors_per_iteration(),
            neighbor_window_margin_minutes: default_neighbor_window_margin_minutes(),
            seed: None,
        }
    }
}

/// Bounds of the scheduling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }
}

/// One schedule: a timeline plus the state of every task.
///
/// Cloning is a full deep copy; candidates never share state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub timeline: Timeline,
    pub states: BTreeMap<TaskId, TaskState>,
}

impl Snapshot {
    pub fn state(&self, id: TaskId) -> Option<&TaskState> {
        self.states.get(&id)
    }
}

/// Validate a request, fill missing attributes, optimize, and summarize.
pub fn plan_day(
    request: &ScheduleRequest,
    predictor: &dyn TaskPredictor,
    config: &SchedulerConfig,
) -> Result<ScheduleResponse> {
    let window = request.validate()?;
    let records = request.to_records(predictor);

    let outcome = HillClimber::with_config(config.clone()).optimize(&records, window);
    tracing::info!(
        tasks = records.len(),
        initial_score = outcome.initial_score,
        final_score = outcome.score,
        accepted = outcome.accepted_moves,
        "day planned"
    );
    if outcome.snapshot.timeline.has_overlaps() {
        tracing::warn!("pinned fixed tasks overlap each other or their breaks");
    }

    let response = ScheduleResponse::from_snapshot(&outcome.snapshot, &records, outcome.score);
    Ok(response)
}
