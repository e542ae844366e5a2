//! Greedy first placement.

use std::cmp::Reverse;

use chrono::Duration;

use super::{DayWindow, SchedulerConfig, Snapshot};
use crate::chunking::chunks_for;
use crate::task::{TaskRecord, TaskState};
use crate::timeline::Block;

/// Builds the starting snapshot for the optimizer.
pub struct InitialPlacer<'a> {
    config: &'a SchedulerConfig,
}

impl<'a> InitialPlacer<'a> {
    pub fn new(config: &'a SchedulerConfig) -> Self {
        Self { config }
    }

    /// Place every task once, in order: fixed first, then by priority, then
    /// by deadline.
    ///
    /// Fixed tasks are pinned unconditionally. Other tasks take first-fit
    /// slots chunk by chunk; a chunk that does not fit abandons the rest of
    /// that task.
    pub fn place(&self, tasks: &[TaskRecord], window: DayWindow) -> Snapshot {
        let mut snapshot = Snapshot {
            states: tasks.iter().map(|t| (t.id, TaskState::new(t))).collect(),
            ..Snapshot::default()
        };

        for task in sorted_for_placement(tasks) {
            if task.fixed {
                self.pin_fixed(&mut snapshot, task);
            } else {
                self.fill(&mut snapshot, task, window);
            }
        }

        snapshot
    }

    fn pin_fixed(&self, snapshot: &mut Snapshot, task: &TaskRecord) {
        let gap = Duration::minutes(self.config.break_minutes);
        let start = task.earliest_start;
        let end = start + task.duration_needed;

        snapshot.timeline.insert(Block::break_at(start - gap, gap));
        let block = Block::task(task.id, &task.name, start, task.duration_needed);
        snapshot.timeline.insert(block);
        snapshot.timeline.insert(Block::break_at(end, gap));

        if let Some(state) = snapshot.states.get_mut(&task.id) {
            state.push_block(start, end);
        }
    }

    fn fill(&self, snapshot: &mut Snapshot, task: &TaskRecord, window: DayWindow) {
        let gap = Duration::minutes(self.config.break_minutes);
        let Some(state) = snapshot.states.get_mut(&task.id) else {
            return;
        };
        let chunks = chunks_for(task, state.remaining, self.config);
        let mut cursor = window.start;

        for (i, chunk) in chunks.iter().enumerate() {
            let slot = match snapshot
                .timeline
                .find_slot(cursor, *chunk, task.earliest_start, task.deadline)
            {
                Ok(slot) => slot,
                Err(_) => {
                    tracing::debug!(
                        task = task.id,
                        placed = i,
                        total = chunks.len(),
                        "no slot left for chunk"
                    );
                    break;
                }
            };

            snapshot
                .timeline
                .insert(Block::task(task.id, &task.name, slot, *chunk));
            state.push_block(slot, slot + *chunk);
            cursor = slot + *chunk;

            if i + 1 < chunks.len() {
                snapshot.timeline.insert(Block::break_at(cursor, gap));
            }
        }
    }
}

/// Fixed tasks first, then higher priority, then earlier deadline.
fn sorted_for_placement(tasks: &[TaskRecord]) -> Vec<&TaskRecord> {
    let mut sorted: Vec<_> = tasks.iter().collect();
    sorted.sort_by_key(|t| (Reverse(t.fixed), Reverse(t.priority.rank()), t.deadline));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, TaskStatus};
    use crate::timeline::BlockOwner;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, h, m, 0).unwrap()
    }

    fn window() -> DayWindow {
        DayWindow::new(at(9, 0), at(17, 0)).unwrap()
    }

    fn task(id: u64, priority: Priority, minutes: i64, deadline: DateTime<Utc>) -> TaskRecord {
        TaskRecord::new(
            id,
            format!("Task {id}"),
            priority,
            at(9, 0),
            deadline,
            Duration::minutes(minutes),
        )
    }

    #[test]
    fn test_sort_order() {
        let tasks = vec![
            task(1, Priority::Low, 25, at(12, 0)),
            task(2, Priority::High, 25, at(16, 0)),
            task(3, Priority::High, 25, at(11, 0)),
            task(4, Priority::Low, 25, at(10, 0)).fixed(),
        ];
        let order: Vec<_> = sorted_for_placement(&tasks).iter().map(|t| t.id).collect();
        assert_eq!(order, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_fixed_task_flanked_by_breaks() {
        let cfg = SchedulerConfig::default();
        let tasks = vec![TaskRecord {
            earliest_start: at(10, 0),
            ..task(1, Priority::Medium, 45, at(17, 0)).fixed()
        }];
        let snap = InitialPlacer::new(&cfg).place(&tasks, window());

        let blocks = snap.timeline.blocks();
        let layout: Vec<_> = blocks.iter().map(|b| (b.start, b.end, b.owner)).collect();
        assert_eq!(
            layout,
            vec![
                (at(9, 55), at(10, 0), BlockOwner::Break),
                (at(10, 0), at(10, 45), BlockOwner::Task(1)),
                (at(10, 45), at(10, 50), BlockOwner::Break),
            ]
        );

        let state = snap.state(1).unwrap();
        assert_eq!(state.status(), TaskStatus::Completed);
        assert_eq!(state.finish_time, Some(at(10, 45)));
    }

    #[test]
    fn test_chunks_separated_by_breaks() {
        let cfg = SchedulerConfig::default();
        let tasks = vec![task(1, Priority::High, 60, at(17, 0))];
        let snap = InitialPlacer::new(&cfg).place(&tasks, window());

        let layout: Vec<_> = snap
            .timeline
            .blocks()
            .iter()
            .map(|b| (b.start, b.end, b.owner))
            .collect();
        assert_eq!(
            layout,
            vec![
                (at(9, 0), at(9, 25), BlockOwner::Task(1)),
                (at(9, 25), at(9, 30), BlockOwner::Break),
                (at(9, 30), at(9, 55), BlockOwner::Task(1)),
                (at(9, 55), at(10, 0), BlockOwner::Break),
                (at(10, 0), at(10, 10), BlockOwner::Task(1)),
            ]
        );
        assert_eq!(snap.state(1).unwrap().finish_time, Some(at(10, 10)));
    }

    #[test]
    fn test_partial_placement_abandons_rest() {
        let cfg = SchedulerConfig::default();
        // Only 40 minutes before the deadline: one 25-minute chunk fits, the
        // second would end at 9:55 > 9:40.
        let tasks = vec![task(1, Priority::Low, 50, at(9, 40))];
        let snap = InitialPlacer::new(&cfg).place(&tasks, window());

        let state = snap.state(1).unwrap();
        assert_eq!(state.scheduled_blocks.len(), 1);
        assert_eq!(state.remaining, Duration::minutes(25));
        assert_eq!(state.status(), TaskStatus::Incomplete);
    }

    #[test]
    fn test_priority_gets_earlier_slots() {
        let cfg = SchedulerConfig::default();
        let tasks = vec![
            task(1, Priority::Low, 25, at(17, 0)),
            task(2, Priority::High, 25, at(17, 0)),
        ];
        let snap = InitialPlacer::new(&cfg).place(&tasks, window());
        assert_eq!(snap.state(2).unwrap().scheduled_blocks[0].0, at(9, 0));
        assert_eq!(snap.state(1).unwrap().scheduled_blocks[0].0, at(9, 25));
    }

    #[test]
    fn test_contiguous_single_block() {
        let cfg = SchedulerConfig::default();
        let tasks = vec![task(1, Priority::Medium, 80, at(17, 0)).contiguous()];
        let snap = InitialPlacer::new(&cfg).place(&tasks, window());
        assert_eq!(snap.timeline.len(), 1);
        assert_eq!(
            snap.state(1).unwrap().scheduled_blocks,
            vec![(at(9, 0), at(10, 20))]
        );
    }
}
