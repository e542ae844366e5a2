//! Random single-block relocation.

use std::collections::HashMap;

use chrono::Duration;
use rand::Rng;

use super::{DayWindow, SchedulerConfig, Snapshot};
use crate::task::{TaskId, TaskRecord};
use crate::timeline::Block;

/// Produces perturbed copies of a snapshot.
pub struct NeighborOperator<'a> {
    records: HashMap<TaskId, &'a TaskRecord>,
    window: DayWindow,
    margin: Duration,
}

impl<'a> NeighborOperator<'a> {
    pub fn new(tasks: &'a [TaskRecord], window: DayWindow, config: &SchedulerConfig) -> Self {
        Self {
            records: tasks.iter().map(|t| (t.id, t)).collect(),
            window,
            margin: Duration::minutes(config.neighbor_window_margin_minutes),
        }
    }

    /// Ids of tasks that may be moved: not fixed, with at least one block.
    pub fn movable(&self, snapshot: &Snapshot) -> Vec<TaskId> {
        snapshot
            .states
            .iter()
            .filter(|(id, _)| self.records.get(id).is_some_and(|r| !r.fixed))
            .filter(|(_, state)| !state.scheduled_blocks.is_empty())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Copy `snapshot` and move one random block of one random movable task.
    ///
    /// The block is lifted off the timeline and re-placed first-fit from a
    /// random point of the day. If nothing fits, the block stays removed and
    /// its time counts as unscheduled again.
    pub fn neighbor<R: Rng>(&self, snapshot: &Snapshot, rng: &mut R) -> Snapshot {
        let mut next = snapshot.clone();
        let movable = self.movable(&next);
        if movable.is_empty() {
            return next;
        }

        let id = movable[rng.gen_range(0..movable.len())];
        let Some(record) = self.records.get(&id).copied() else {
            return next;
        };
        let Some(state) = next.states.get_mut(&id) else {
            return next;
        };

        let (start, end) = state.scheduled_blocks[rng.gen_range(0..state.scheduled_blocks.len())];
        let duration = end - start;
        next.timeline.remove_task_block(id, start);
        state.remove_block(start, end);

        let from = self.random_start(rng);
        let (earliest, deadline) = (record.earliest_start, record.deadline);
        match next.timeline.find_slot(from, duration, earliest, deadline) {
            Ok(slot) => {
                let block = Block::task(id, &record.name, slot, duration);
                next.timeline.insert(block);
                state.push_block(slot, slot + duration);
            }
            Err(_) => {
                tracing::trace!(task = id, %start, "relocated block found no slot");
            }
        }
        state.refresh_finish_time();

        next
    }

    /// Uniform whole-minute offset in `[day_start, day_end - margin]`.
    fn random_start<R: Rng>(&self, rng: &mut R) -> chrono::DateTime<chrono::Utc> {
        let span = (self.window.end - self.window.start - self.margin).num_minutes();
        let offset = if span > 0 { rng.gen_range(0..=span) } else { 0 };
        self.window.start + Duration::minutes(offset)
    }
}
