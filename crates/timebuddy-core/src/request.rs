//! Request and response contracts for day planning.
//!
//! Field aliases accept the payload shape used by the web front end
//! (`initialising_time`, `deadline_time`, `time_needed_minutes`, `in_one_go`).

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::predictor::TaskPredictor;
use crate::scheduler::{DayWindow, Snapshot};
use crate::task::{Priority, TaskId, TaskRecord, TaskStatus};
use crate::timeline::BlockOwner;

/// A task as submitted by the caller. Priority and duration may be left
/// out, in which case the predictor fills them in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    pub task_id: TaskId,
    pub name: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(alias = "initialising_time")]
    pub earliest_start: DateTime<Utc>,
    #[serde(alias = "deadline_time")]
    pub deadline: DateTime<Utc>,
    #[serde(default, alias = "time_needed_minutes")]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub fixed: bool,
    #[serde(default, alias = "in_one_go")]
    pub contiguous: bool,
}

/// A day to plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub tasks: Vec<TaskInput>,
    pub day_start: DateTime<Utc>,
    pub day_end: DateTime<Utc>,
}

impl ScheduleRequest {
    /// Check the request and return its window.
    pub fn validate(&self) -> Result<DayWindow, ValidationError> {
        let window = DayWindow::new(self.day_start, self.day_end)?;

        let mut seen = HashSet::new();
        for task in &self.tasks {
            if task.name.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: format!("tasks[{}].name", task.task_id),
                    message: "task name cannot be empty".to_string(),
                });
            }
            if !seen.insert(task.task_id) {
                return Err(ValidationError::DuplicateId(task.task_id));
            }
            if task.duration_minutes == Some(0) {
                return Err(ValidationError::InvalidValue {
                    field: format!("tasks[{}].duration_minutes", task.task_id),
                    message: "duration must be positive".to_string(),
                });
            }
        }

        Ok(window)
    }

    /// Convert inputs to records, asking `predictor` for anything missing.
    pub fn to_records(&self, predictor: &dyn TaskPredictor) -> Vec<TaskRecord> {
        self.tasks
            .iter()
            .map(|input| {
                let (priority, minutes) = match (input.priority, input.duration_minutes) {
                    (Some(p), Some(m)) => (p, m),
                    (p, m) => {
                        let prediction = predictor.predict(&input.name);
                        tracing::debug!(
                            task = input.task_id,
                            priority = %prediction.priority,
                            minutes = prediction.duration_minutes,
                            "filled missing attributes from predictor"
                        );
                        (
                            p.unwrap_or(prediction.priority),
                            m.unwrap_or(prediction.duration_minutes),
                        )
                    }
                };

                TaskRecord {
                    id: input.task_id,
                    name: input.name.clone(),
                    priority,
                    earliest_start: input.earliest_start,
                    deadline: input.deadline,
                    duration_needed: Duration::minutes(i64::from(minutes)),
                    fixed: input.fixed,
                    contiguous: input.contiguous,
                }
            })
            .collect()
    }
}

/// One placed block in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(flatten)]
    pub owner: BlockOwner,
    pub item_name: String,
}

/// Completion status of one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub task_id: TaskId,
    pub name: String,
    pub status: TaskStatus,
}

/// Outcome of planning a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub final_score: f64,
    pub timeline: Vec<TimelineEntry>,
    pub task_summary: Vec<TaskSummary>,
}

impl ScheduleResponse {
    /// Summarize `snapshot`, listing tasks in the order of `tasks`.
    pub fn from_snapshot(snapshot: &Snapshot, tasks: &[TaskRecord], final_score: f64) -> Self {
        let timeline = snapshot
            .timeline
            .blocks()
            .iter()
            .map(|b| TimelineEntry {
                start_time: b.start,
                end_time: b.end,
                owner: b.owner,
                item_name: b.label.clone(),
            })
            .collect();

        let task_summary = tasks
            .iter()
            .map(|t| TaskSummary {
                task_id: t.id,
                name: t.name.clone(),
                status: snapshot
                    .state(t.id)
                    .map_or(TaskStatus::Incomplete, |s| s.status()),
            })
            .collect();

        Self {
            final_score,
            timeline,
            task_summary,
        }
    }

    pub fn completed(&self) -> usize {
        self.task_summary
            .iter()
            .filter(|s| s.status == TaskStatus::Completed)
            .count()
    }
}
