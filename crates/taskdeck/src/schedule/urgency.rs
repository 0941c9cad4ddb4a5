//! Urgency scoring.
//!
//! A deterministic 0-10 score combining due-date proximity and stated
//! priority, recomputed on every read relative to "today", never persisted
//! as authoritative state.

use std::cmp::Reverse;

use chrono::{Local, NaiveDate};

use crate::entities::{Task, TaskPriority};

/// Score for tasks with no due date
const NO_DUE_DATE_SCORE: u8 = 1;

/// Score ceiling
const MAX_SCORE: u8 = 10;

/// The local calendar day, i.e. "now" normalized to local midnight.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

fn priority_bonus(priority: TaskPriority) -> u8 {
    match priority {
        TaskPriority::Critical | TaskPriority::High => 2,
        TaskPriority::Medium => 1,
        TaskPriority::Low | TaskPriority::Backburner => 0,
    }
}

/// Compute the urgency score for a priority/due-date pair.
///
/// Pure and deterministic; `today` is the local calendar day of the caller's
/// reference "now".
pub fn urgency_score(
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    today: NaiveDate,
) -> u8 {
    let Some(due) = due_date else {
        return NO_DUE_DATE_SCORE;
    };

    let bonus = priority_bonus(priority);
    let day_delta = due.signed_duration_since(today).num_days();

    let score = match day_delta {
        d if d < 0 => MAX_SCORE,
        0 => 8 + bonus,
        1 => 5 + bonus,
        2..=3 => 4 + bonus,
        4..=7 => 3,
        _ => 1,
    };

    score.min(MAX_SCORE)
}

/// Compute the urgency score for a task.
pub fn compute_urgency(task: &Task, today: NaiveDate) -> u8 {
    urgency_score(task.priority, task.due_date, today)
}

/// Sort tasks by descending urgency, breaking ties on the fixed priority
/// weight (Critical first).
pub fn sort_by_urgency(tasks: &mut [Task], today: NaiveDate) {
    tasks.sort_by_key(|t| (Reverse(compute_urgency(t, today)), Reverse(t.priority.weight())));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_due_date_scores_one() {
        let today = date(2024, 6, 10);
        assert_eq!(urgency_score(TaskPriority::Critical, None, today), 1);
        assert_eq!(urgency_score(TaskPriority::Backburner, None, today), 1);
    }

    #[test]
    fn test_overdue_scores_ten_regardless_of_priority() {
        let today = date(2024, 6, 10);
        for priority in [
            TaskPriority::Critical,
            TaskPriority::High,
            TaskPriority::Medium,
            TaskPriority::Low,
            TaskPriority::Backburner,
        ] {
            assert_eq!(urgency_score(priority, Some(date(2024, 6, 9)), today), 10);
            assert_eq!(urgency_score(priority, Some(date(2023, 1, 1)), today), 10);
        }
    }

    #[test]
    fn test_due_today() {
        let today = date(2024, 6, 10);
        let due = Some(today);
        assert_eq!(urgency_score(TaskPriority::High, due, today), 10);
        assert_eq!(urgency_score(TaskPriority::Critical, due, today), 10);
        assert_eq!(urgency_score(TaskPriority::Medium, due, today), 9);
        assert_eq!(urgency_score(TaskPriority::Low, due, today), 8);
    }

    #[test]
    fn test_due_tomorrow() {
        let today = date(2024, 6, 10);
        let due = Some(date(2024, 6, 11));
        assert_eq!(urgency_score(TaskPriority::High, due, today), 7);
        assert_eq!(urgency_score(TaskPriority::Medium, due, today), 6);
        assert_eq!(urgency_score(TaskPriority::Backburner, due, today), 5);
    }

    #[test]
    fn test_due_in_two_to_three_days() {
        let today = date(2024, 6, 10);
        assert_eq!(
            urgency_score(TaskPriority::High, Some(date(2024, 6, 12)), today),
            6
        );
        assert_eq!(
            urgency_score(TaskPriority::Low, Some(date(2024, 6, 13)), today),
            4
        );
    }

    #[test]
    fn test_due_within_week_flattens_priority() {
        let today = date(2024, 6, 10);
        for priority in [TaskPriority::Critical, TaskPriority::Backburner] {
            assert_eq!(urgency_score(priority, Some(date(2024, 6, 14)), today), 3);
            assert_eq!(urgency_score(priority, Some(date(2024, 6, 17)), today), 3);
        }
    }

    #[test]
    fn test_due_beyond_week() {
        let today = date(2024, 6, 10);
        assert_eq!(
            urgency_score(TaskPriority::Critical, Some(date(2024, 6, 18)), today),
            1
        );
    }

    #[test]
    fn test_reference_scenario_ordering() {
        // Reference date 2024-06-10: A (High, due 06-09), B (Medium, due
        // 06-10), C (Low, due 06-17) must sort A, B, C.
        let today = date(2024, 6, 10);

        let mut a = Task::new("a", "A", "");
        a.priority = TaskPriority::High;
        a.due_date = Some(date(2024, 6, 9));

        let mut b = Task::new("b", "B", "");
        b.priority = TaskPriority::Medium;
        b.due_date = Some(date(2024, 6, 10));

        let mut c = Task::new("c", "C", "");
        c.priority = TaskPriority::Low;
        c.due_date = Some(date(2024, 6, 17));

        assert_eq!(compute_urgency(&a, today), 10);
        assert_eq!(compute_urgency(&b, today), 9);
        assert_eq!(compute_urgency(&c, today), 3);

        let mut tasks = vec![c, a, b];
        sort_by_urgency(&mut tasks, today);
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_priority_weight_breaks_ties() {
        let today = date(2024, 6, 10);

        // Both due today with bonus 2: same score, Critical sorts first.
        let mut high = Task::new("h", "H", "");
        high.priority = TaskPriority::High;
        high.due_date = Some(today);

        let mut critical = Task::new("c", "C", "");
        critical.priority = TaskPriority::Critical;
        critical.due_date = Some(today);

        let mut tasks = vec![high, critical];
        sort_by_urgency(&mut tasks, today);
        assert_eq!(tasks[0].id, "c");
    }
}
