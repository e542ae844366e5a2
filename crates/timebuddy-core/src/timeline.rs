//! Day timeline: sorted blocks and first-fit slot search.
//!
//! Blocks are kept ordered by start time. Task chunks and breaks are both
//! plain occupants; a break belongs to no task.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SlotError;
use crate::task::TaskId;

/// Label given to break blocks.
pub const BREAK_LABEL: &str = "Break";

/// Who occupies a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "task_id")]
pub enum BlockOwner {
    Task(TaskId),
    Break,
}

/// A placed, time-bounded occupant of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub owner: BlockOwner,
    pub label: String,
}

impl Block {
    pub fn task(id: TaskId, name: &str, start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            end: start + duration,
            owner: BlockOwner::Task(id),
            label: name.to_string(),
        }
    }

    pub fn break_at(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            end: start + duration,
            owner: BlockOwner::Break,
            label: BREAK_LABEL.to_string(),
        }
    }

    /// Check if this block overlaps with a time range
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }
}

/// Ordered sequence of blocks for one day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    blocks: Vec<Block>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Insert keeping start order; equal starts keep insertion order.
    pub fn insert(&mut self, block: Block) {
        let idx = self.blocks.partition_point(|b| b.start <= block.start);
        self.blocks.insert(idx, block);
    }

    /// Remove the task block(s) owned by `id` that start at `start`.
    ///
    /// Returns how many blocks were removed.
    pub fn remove_task_block(&mut self, id: TaskId, start: DateTime<Utc>) -> usize {
        let before = self.blocks.len();
        self.blocks
            .retain(|b| !(b.start == start && b.owner == BlockOwner::Task(id)));
        before - self.blocks.len()
    }

    /// Blocks belonging to one task, in timeline order.
    pub fn task_blocks(&self, id: TaskId) -> impl Iterator<Item = &Block> {
        self.blocks
            .iter()
            .filter(move |b| b.owner == BlockOwner::Task(id))
    }

    /// Whether any two blocks intersect.
    pub fn has_overlaps(&self) -> bool {
        self.blocks.iter().enumerate().any(|(i, a)| {
            self.blocks[i + 1..]
                .iter()
                .any(|b| a.overlaps(b.start, b.end))
        })
    }

    /// Find the earliest gap at or after `max(search_from, earliest)` that
    /// holds `duration` and ends no later than `latest`.
    ///
    /// Gaps are scanned left to right and the first fit wins.
    pub fn find_slot(
        &self,
        search_from: DateTime<Utc>,
        duration: Duration,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, SlotError> {
        let cursor = search_from.max(earliest);
        let fits_window = |start: DateTime<Utc>| start + duration <= latest;

        let (first, last) = match (self.blocks.first(), self.blocks.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return if fits_window(cursor) {
                    Ok(cursor)
                } else {
                    Err(SlotError::NoSlotAvailable)
                };
            }
        };

        if cursor + duration <= first.start && fits_window(cursor) {
            return Ok(cursor);
        }

        for pair in self.blocks.windows(2) {
            let candidate = pair[0].end.max(cursor);
            if candidate + duration <= pair[1].start && fits_window(candidate) {
                return Ok(candidate);
            }
        }

        let candidate = last.end.max(cursor);
        if fits_window(candidate) {
            Ok(candidate)
        } else {
            Err(SlotError::NoSlotAvailable)
        }
    }
}
