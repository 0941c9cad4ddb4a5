//! Temporal bucketing.
//!
//! Partitions a task collection into overdue/today/upcoming/future by
//! due-date proximity, each bucket sorted by descending urgency.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::entities::Task;

use super::urgency::sort_by_urgency;

/// Length of the "upcoming" window in days
const UPCOMING_WINDOW_DAYS: i64 = 7;

/// A partition of tasks by due-date proximity
#[derive(Debug, Default, Serialize)]
pub struct DueBuckets {
    /// Due before today
    pub overdue: Vec<Task>,
    /// Due today
    pub today: Vec<Task>,
    /// Due within the next seven days
    pub upcoming: Vec<Task>,
    /// No due date, or due beyond the upcoming window
    pub future: Vec<Task>,
}

impl DueBuckets {
    /// Total number of tasks across all buckets
    pub fn total(&self) -> usize {
        self.overdue.len() + self.today.len() + self.upcoming.len() + self.future.len()
    }

    /// Whether all buckets are empty
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Partition tasks by due-date proximity relative to `today` (the local
/// calendar day).
///
/// Every input task lands in exactly one bucket; each bucket is sorted by
/// descending urgency with the priority-weight tie-break. Status filtering is
/// the caller's concern; the partition is total over its input.
pub fn bucket_by_due_date(tasks: Vec<Task>, today: NaiveDate) -> DueBuckets {
    let horizon = today + Duration::days(UPCOMING_WINDOW_DAYS);
    let mut buckets = DueBuckets::default();

    for task in tasks {
        match task.due_date {
            Some(due) if due < today => buckets.overdue.push(task),
            Some(due) if due == today => buckets.today.push(task),
            Some(due) if due <= horizon => buckets.upcoming.push(task),
            // No date, or beyond the window
            _ => buckets.future.push(task),
        }
    }

    for bucket in [
        &mut buckets.overdue,
        &mut buckets.today,
        &mut buckets.upcoming,
        &mut buckets.future,
    ] {
        sort_by_urgency(bucket, today);
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TaskPriority;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, due: Option<NaiveDate>) -> Task {
        let mut t = Task::new(id, id, "");
        t.due_date = due;
        t
    }

    #[test]
    fn test_bucket_assignment() {
        let today = date(2024, 6, 10);
        let tasks = vec![
            task("overdue", Some(date(2024, 6, 9))),
            task("today", Some(date(2024, 6, 10))),
            task("upcoming-near", Some(date(2024, 6, 11))),
            task("upcoming-edge", Some(date(2024, 6, 17))),
            task("future-dated", Some(date(2024, 6, 18))),
            task("future-undated", None),
        ];

        let buckets = bucket_by_due_date(tasks, today);

        assert_eq!(buckets.overdue.len(), 1);
        assert_eq!(buckets.overdue[0].id, "overdue");
        assert_eq!(buckets.today.len(), 1);
        assert_eq!(buckets.today[0].id, "today");
        assert_eq!(buckets.upcoming.len(), 2);
        assert_eq!(buckets.future.len(), 2);
    }

    #[test]
    fn test_partition_is_total() {
        let today = date(2024, 6, 10);
        let tasks: Vec<Task> = (0..30)
            .map(|i| {
                let due = if i % 5 == 0 {
                    None
                } else {
                    Some(date(2024, 6, 1) + Duration::days(i))
                };
                task(&format!("t{i}"), due)
            })
            .collect();
        let input_ids: std::collections::BTreeSet<String> =
            tasks.iter().map(|t| t.id.clone()).collect();

        let buckets = bucket_by_due_date(tasks, today);

        let mut output_ids = std::collections::BTreeSet::new();
        for bucket in [
            &buckets.overdue,
            &buckets.today,
            &buckets.upcoming,
            &buckets.future,
        ] {
            for t in bucket {
                // Pairwise disjoint: no id may appear twice.
                assert!(output_ids.insert(t.id.clone()), "duplicate id {}", t.id);
            }
        }
        assert_eq!(output_ids, input_ids);
    }

    #[test]
    fn test_buckets_sorted_by_urgency() {
        let today = date(2024, 6, 10);

        let mut low = task("low", Some(date(2024, 6, 11)));
        low.priority = TaskPriority::Low;
        let mut high = task("high", Some(date(2024, 6, 11)));
        high.priority = TaskPriority::High;

        let buckets = bucket_by_due_date(vec![low, high], today);
        assert_eq!(buckets.upcoming.len(), 2);
        assert_eq!(buckets.upcoming[0].id, "high");
    }

    #[test]
    fn test_empty_input() {
        let buckets = bucket_by_due_date(Vec::new(), date(2024, 6, 10));
        assert!(buckets.is_empty());
        assert_eq!(buckets.total(), 0);
    }
}
