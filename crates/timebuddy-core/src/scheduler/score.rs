//! Penalty of a snapshot; lower is better, zero is perfect.

use super::Snapshot;
use crate::task::TaskRecord;

/// Sum of per-task penalties.
///
/// A finished task that ends after its deadline costs its priority weight
/// plus one point per minute late. An unfinished task costs the unplaced
/// fraction of its weight. Finished, on-time tasks cost nothing.
pub fn score(snapshot: &Snapshot, tasks: &[TaskRecord]) -> f64 {
    tasks
        .iter()
        .filter_map(|task| snapshot.state(task.id).map(|state| (task, state)))
        .map(|(task, state)| {
            let weight = task.priority.weight();
            if state.is_fully_scheduled() {
                match state.finish_time {
                    Some(finish) if finish > task.deadline => {
                        weight + (finish - task.deadline).num_seconds() as f64 / 60.0
                    }
                    _ => 0.0,
                }
            } else {
                let needed = task.duration_needed.num_seconds() as f64;
                if needed > 0.0 {
                    state.remaining.num_seconds() as f64 / needed * weight
                } else {
                    0.0
                }
            }
        })
        .sum()
}
