//! Task records and their per-snapshot scheduling state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a task as supplied by the caller.
pub type TaskId = u64;

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Ordering rank used by the initial placer (higher goes first).
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    /// Penalty weight applied when a task of this priority is late or incomplete.
    pub fn weight(self) -> f64 {
        match self {
            Priority::Low => 100.0,
            Priority::Medium => 500.0,
            Priority::High => 2000.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// Immutable description of a task to be planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub name: String,
    pub priority: Priority,
    pub earliest_start: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub duration_needed: Duration,
    /// Pinned at `earliest_start`; never searched or moved.
    pub fixed: bool,
    /// Must run in a single unbroken block.
    pub contiguous: bool,
}

impl TaskRecord {
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        priority: Priority,
        earliest_start: DateTime<Utc>,
        deadline: DateTime<Utc>,
        duration_needed: Duration,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            priority,
            earliest_start,
            deadline,
            duration_needed,
            fixed: false,
            contiguous: false,
        }
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn contiguous(mut self) -> Self {
        self.contiguous = true;
        self
    }
}

/// Completion status reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Completed,
    Incomplete,
}

/// Mutable scheduling state of one task inside one snapshot.
///
/// Keeps `remaining == needed - sum(blocks)` at all times; every change to
/// the block set goes through [`TaskState::push_block`] or
/// [`TaskState::remove_block`].
#[derive(Debug, Clone, PartialEq)]
pub struct TaskState {
    pub remaining: Duration,
    pub scheduled_blocks: Vec<(DateTime<Utc>, DateTime<Utc>)>,
    pub finish_time: Option<DateTime<Utc>>,
}

impl TaskState {
    pub fn new(record: &TaskRecord) -> Self {
        Self {
            remaining: record.duration_needed,
            scheduled_blocks: Vec::new(),
            finish_time: None,
        }
    }

    pub fn is_fully_scheduled(&self) -> bool {
        self.remaining <= Duration::zero()
    }

    pub fn status(&self) -> TaskStatus {
        if self.is_fully_scheduled() {
            TaskStatus::Completed
        } else {
            TaskStatus::Incomplete
        }
    }

    pub fn scheduled_duration(&self) -> Duration {
        self.scheduled_blocks
            .iter()
            .fold(Duration::zero(), |acc, (start, end)| acc + (*end - *start))
    }

    /// Record a placed block and consume its duration.
    ///
    /// `finish_time` is set to this block's end, matching the placement
    /// order of the initial pass; use [`TaskState::refresh_finish_time`]
    /// after arbitrary edits.
    pub fn push_block(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.scheduled_blocks.push((start, end));
        self.remaining = self.remaining - (end - start);
        self.finish_time = Some(end);
    }

    /// Drop a block and give its duration back. Returns false if absent.
    pub fn remove_block(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        match self
            .scheduled_blocks
            .iter()
            .position(|&(s, e)| s == start && e == end)
        {
            Some(idx) => {
                self.scheduled_blocks.remove(idx);
                self.remaining = self.remaining + (end - start);
                true
            }
            None => false,
        }
    }

    pub fn refresh_finish_time(&mut self) {
        self.finish_time = self.scheduled_blocks.iter().map(|&(_, end)| end).max();
    }
}
