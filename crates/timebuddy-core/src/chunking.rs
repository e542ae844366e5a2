//! Splitting task time into focus-sized chunks.
//!
//! Work is cut into units of `chunk_minutes` (25 by default). A leftover
//! shorter than `merge_threshold_minutes` is folded into the last full unit
//! instead of becoming a tiny chunk of its own; a leftover of exactly the
//! threshold stays separate.

use chrono::Duration;

use crate::scheduler::SchedulerConfig;
use crate::task::TaskRecord;

/// Split `duration` into ordered chunks summing exactly to it.
///
/// Returns an empty vector for non-positive durations.
pub fn plan_chunks(duration: Duration, config: &SchedulerConfig) -> Vec<Duration> {
    if duration <= Duration::zero() {
        return Vec::new();
    }

    let unit = Duration::minutes(config.chunk_minutes);
    let threshold = Duration::minutes(config.merge_threshold_minutes);
    if unit <= Duration::zero() {
        return vec![duration];
    }

    let unit_secs = unit.num_seconds();
    let total_secs = duration.num_seconds();
    let num = (total_secs / unit_secs) as usize;
    let rem = duration - Duration::seconds(num as i64 * unit_secs);

    let mut chunks = Vec::with_capacity(num + 1);
    if num > 0 && rem > Duration::zero() && rem < threshold {
        chunks.extend(std::iter::repeat(unit).take(num - 1));
        chunks.push(unit + rem);
    } else {
        chunks.extend(std::iter::repeat(unit).take(num));
        if rem > Duration::zero() {
            chunks.push(rem);
        }
    }
    chunks
}

/// Chunks still to place for a task with `remaining` time left.
///
/// Contiguous tasks are never split.
pub fn chunks_for(
    record: &TaskRecord,
    remaining: Duration,
    config: &SchedulerConfig,
) -> Vec<Duration> {
    if record.contiguous {
        if remaining > Duration::zero() {
            vec![remaining]
        } else {
            Vec::new()
        }
    } else {
        plan_chunks(remaining, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn minutes(chunks: &[Duration]) -> Vec<i64> {
        chunks.iter().map(|c| c.num_minutes()).collect()
    }

    fn plan(m: i64) -> Vec<i64> {
        let cfg = SchedulerConfig::default();
        minutes(&plan_chunks(Duration::minutes(m), &cfg))
    }

    #[test]
    fn test_exact_multiples() {
        assert_eq!(plan(25), vec![25]);
        assert_eq!(plan(50), vec![25, 25]);
        assert_eq!(plan(100), vec![25, 25, 25, 25]);
    }

    #[test]
    fn test_small_remainder_merges_into_last_unit() {
        assert_eq!(plan(30), vec![30]);
        assert_eq!(plan(59), vec![25, 34]);
    }

    #[test]
    fn test_remainder_at_threshold_stays_separate() {
        assert_eq!(plan(35), vec![25, 10]);
        assert_eq!(plan(45), vec![25, 20]);
    }

    #[test]
    fn test_short_tasks_single_chunk() {
        assert_eq!(plan(5), vec![5]);
        assert_eq!(plan(24), vec![24]);
    }

    #[test]
    fn test_non_positive_is_empty() {
        assert!(plan(0).is_empty());
        assert!(plan(-10).is_empty());
    }

    #[test]
    fn test_contiguous_bypasses_chunking() {
        let day = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let cfg = SchedulerConfig::default();
        let rec = TaskRecord::new(
            7,
            "Deep work",
            Priority::High,
            day,
            day + Duration::hours(8),
            Duration::minutes(90),
        )
        .contiguous();
        let whole = chunks_for(&rec, rec.duration_needed, &cfg);
        assert_eq!(minutes(&whole), vec![90]);

        let split = TaskRecord {
            contiguous: false,
            ..rec
        };
        let chunks = chunks_for(&split, split.duration_needed, &cfg);
        assert_eq!(minutes(&chunks), vec![25, 25, 25, 15]);
    }

    proptest! {
        #[test]
        fn prop_chunks_sum_to_duration(secs in 1i64..(24 * 3600)) {
            let d = Duration::seconds(secs);
            let chunks = plan_chunks(d, &SchedulerConfig::default());
            let total = chunks.iter().fold(Duration::zero(), |acc, c| acc + *c);
            prop_assert_eq!(total, d);
            if chunks.len() > 1 {
                prop_assert!(chunks.iter().all(|c| *c >= Duration::minutes(10)));
            }
        }
    }
}
