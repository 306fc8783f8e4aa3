//! Calendar day-expansion.
//!
//! The engine behind month/week/day calendar views: maps each calendar day
//! to the tasks active (spanning) that day. Only tasks with a valid date
//! range participate; tasks missing a bound or with `end < start` are
//! silently excluded, matching the uniform inverted-range rule in
//! `cronograma-core`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use cronograma_core::{Task, TaskId};

/// Expand tasks into per-day buckets over their inclusive `[start, end]`
/// ranges.
///
/// Within a day, task order follows input order (stable). The map iterates
/// in ascending date order, so callers can render ranges directly.
pub fn expand_by_day(tasks: &[Task]) -> BTreeMap<NaiveDate, Vec<TaskId>> {
    let mut days: BTreeMap<NaiveDate, Vec<TaskId>> = BTreeMap::new();

    for task in tasks {
        let Some((start, end)) = task.valid_range() else {
            continue;
        };
        let mut day = start;
        loop {
            days.entry(day).or_default().push(task.id.clone());
            if day >= end {
                break;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
    }

    days
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn inclusive_range_one_entry_per_day() {
        let tasks = vec![Task::new("t1").dates(date(2024, 1, 2), date(2024, 1, 4))];
        let days = expand_by_day(&tasks);

        assert_eq!(days.len(), 3);
        assert_eq!(days[&date(2024, 1, 2)], vec!["t1"]);
        assert_eq!(days[&date(2024, 1, 3)], vec!["t1"]);
        assert_eq!(days[&date(2024, 1, 4)], vec!["t1"]);
    }

    #[test]
    fn single_day_task() {
        let tasks = vec![Task::new("t1").dates(date(2024, 1, 2), date(2024, 1, 2))];
        let days = expand_by_day(&tasks);

        assert_eq!(days.len(), 1);
        assert_eq!(days[&date(2024, 1, 2)], vec!["t1"]);
    }

    #[test]
    fn tasks_without_valid_range_are_skipped() {
        let tasks = vec![
            Task::new("no-dates"),
            Task::new("no-start").ends(date(2024, 1, 5)),
            Task::new("inverted").dates(date(2024, 1, 9), date(2024, 1, 2)),
            Task::new("ok").dates(date(2024, 1, 2), date(2024, 1, 2)),
        ];
        let days = expand_by_day(&tasks);

        assert_eq!(days.len(), 1);
        assert_eq!(days[&date(2024, 1, 2)], vec!["ok"]);
    }

    #[test]
    fn per_day_order_follows_input_order() {
        let tasks = vec![
            Task::new("b").dates(date(2024, 1, 2), date(2024, 1, 3)),
            Task::new("a").dates(date(2024, 1, 3), date(2024, 1, 4)),
        ];
        let days = expand_by_day(&tasks);

        assert_eq!(days[&date(2024, 1, 3)], vec!["b", "a"]);
    }

    #[test]
    fn no_leakage_between_task_ranges() {
        let tasks = vec![
            Task::new("jan").dates(date(2024, 1, 1), date(2024, 1, 3)),
            Task::new("mar").dates(date(2024, 3, 1), date(2024, 3, 2)),
        ];
        let days = expand_by_day(&tasks);

        // Nothing in February, nothing outside either task's own range
        assert_eq!(days.len(), 5);
        for (day, ids) in &days {
            for id in ids {
                let task = tasks.iter().find(|t| &t.id == id).unwrap();
                let (start, end) = task.valid_range().unwrap();
                assert!(*day >= start && *day <= end);
            }
        }
    }

    #[test]
    fn reordering_input_only_permutes_day_lists() {
        let forward = vec![
            Task::new("x").dates(date(2024, 1, 2), date(2024, 1, 4)),
            Task::new("y").dates(date(2024, 1, 3), date(2024, 1, 5)),
        ];
        let reversed: Vec<Task> = forward.iter().rev().cloned().collect();

        let a = expand_by_day(&forward);
        let b = expand_by_day(&reversed);

        let keys_a: Vec<_> = a.keys().collect();
        let keys_b: Vec<_> = b.keys().collect();
        assert_eq!(keys_a, keys_b);

        for (day, ids) in &a {
            let mut sorted_a = ids.clone();
            sorted_a.sort();
            let mut sorted_b = b[day].clone();
            sorted_b.sort();
            assert_eq!(sorted_a, sorted_b);
        }
    }

    #[test]
    fn empty_input_empty_map() {
        assert!(expand_by_day(&[]).is_empty());
    }
}
