use chrono::NaiveDate;
use learnpath_core::{DailyTask, Okr, TaskStatus};
use tracing::{debug, info};

use super::{GeneratedTask, GeneratedTasks};
use crate::progress::{fallback_contribution, EARLY_STAGE_LIMIT, MID_STAGE_LIMIT};

/// Upper bound on the fallback plan.
pub const FALLBACK_TASK_LIMIT: usize = 4;

const MIN_TASKS_BEFORE_PLANNING: usize = 3;
const TITLE_PREFIX_CHARS: usize = 20;
const KEY_RESULT_MINUTES: i64 = 60;
const PLANNING_MINUTES: i64 = 45;
const PLANNING_PRIORITY: i64 = 2;
const PLANNING_CONTRIBUTION: i64 = 5;

/// Deterministic task list for the first (primary) OKR.
///
/// One task per key result, framed by how far along it is, plus a planning
/// task when there would otherwise be fewer than three.
pub fn fallback_tasks(okrs: &[Okr]) -> GeneratedTasks {
    let Some(okr) = okrs.first() else {
        return GeneratedTasks::default();
    };

    let mut tasks: Vec<GeneratedTask> = okr
        .key_results
        .iter()
        .enumerate()
        .map(|(index, kr)| {
            let progress = kr.progress;
            let (verb, lead, priority) = match progress.value() {
                p if p < EARLY_STAGE_LIMIT => ("Start", "Begin working on key result", 1),
                p if p < MID_STAGE_LIMIT => ("Continue", "Keep pushing key result", 2),
                _ => ("Polish", "Refine and round off key result", 3),
            };
            GeneratedTask {
                title: format!("{verb}: {}...", truncate_chars(&kr.text, TITLE_PREFIX_CHARS)),
                description: Some(format!("{lead}: {}", kr.text)),
                priority: Some(priority),
                estimated_duration: Some(KEY_RESULT_MINUTES),
                related_kr_index: Some(index as i64),
                okr_id: Some(okr.id.clone()),
                progress_contribution: Some(i64::from(fallback_contribution(progress))),
            }
        })
        .collect();

    if tasks.len() < MIN_TASKS_BEFORE_PLANNING {
        tasks.push(GeneratedTask {
            title: format!("Plan: {}", okr.objective),
            description: Some(format!(
                "Draft a detailed study plan for reaching: {}",
                okr.objective
            )),
            priority: Some(PLANNING_PRIORITY),
            estimated_duration: Some(PLANNING_MINUTES),
            related_kr_index: None,
            okr_id: Some(okr.id.clone()),
            progress_contribution: Some(PLANNING_CONTRIBUTION),
        });
    }

    tasks.truncate(FALLBACK_TASK_LIMIT);
    debug!(okr_id = %okr.id, count = tasks.len(), "built fallback tasks");
    GeneratedTasks { tasks }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Fail the previous day's unfinished tasks once a new day's plan exists.
///
/// Returns the ids of tasks that were moved to `failed`.
pub fn fail_stale_tasks(tasks: &mut [DailyTask], today: NaiveDate) -> Vec<i64> {
    let Some(yesterday) = today.pred_opt() else {
        return Vec::new();
    };
    let failed: Vec<i64> = tasks
        .iter_mut()
        .filter(|t| t.task_date == yesterday)
        .filter(|t| matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress))
        .filter_map(|t| t.fail_stale().ok().map(|_| t.id))
        .collect();
    if !failed.is_empty() {
        info!(count = failed.len(), %yesterday, "failed unfinished tasks");
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnpath_core::KeyResult;

    fn okr(krs: &[(&str, i64)]) -> Okr {
        krs.iter().fold(Okr::new("okr-1", "Learn Rust"), |o, (text, p)| {
            o.with_key_result(KeyResult::new(*text).with_progress(*p))
        })
    }

    #[test]
    fn no_okr_means_no_tasks() {
        assert!(fallback_tasks(&[]).is_empty());
    }

    #[test]
    fn tasks_are_framed_by_progress_band() {
        let tasks = fallback_tasks(&[okr(&[
            ("Read the book", 10),
            ("Write a CLI", 50),
            ("Publish a crate", 90),
        ])])
        .tasks;
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].title, "Start: Read the book...");
        assert_eq!(tasks[0].priority, Some(1));
        assert_eq!(tasks[0].progress_contribution, Some(15));
        assert_eq!(tasks[1].title, "Continue: Write a CLI...");
        assert_eq!(tasks[1].priority, Some(2));
        assert_eq!(tasks[1].progress_contribution, Some(10));
        assert_eq!(tasks[2].title, "Polish: Publish a crate...");
        assert_eq!(tasks[2].priority, Some(3));
        assert_eq!(tasks[2].progress_contribution, Some(5));
        assert!(tasks.iter().all(|t| t.estimated_duration == Some(60)));
        assert_eq!(tasks[1].related_kr_index, Some(1));
    }

    #[test]
    fn long_key_results_are_cut_to_twenty_chars() {
        let tasks = fallback_tasks(&[okr(&[(
            "Complete all exercises of the ownership chapter",
            0,
        )])])
        .tasks;
        assert_eq!(tasks[0].title, "Start: Complete all exercis...");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("日本語のテキストを読む練習をする二十文字以上の目標", 3), "日本語");
        assert_eq!(truncate_chars("short", 20), "short");
    }

    #[test]
    fn planning_task_added_below_three() {
        let tasks = fallback_tasks(&[okr(&[("Read the book", 10)])]).tasks;
        assert_eq!(tasks.len(), 2);
        let plan = &tasks[1];
        assert_eq!(plan.title, "Plan: Learn Rust");
        assert_eq!(plan.priority, Some(2));
        assert_eq!(plan.estimated_duration, Some(45));
        assert_eq!(plan.related_kr_index, None);
        assert_eq!(plan.progress_contribution, Some(5));
    }

    #[test]
    fn capped_at_four() {
        let krs: Vec<(&str, i64)> = vec![("a", 0), ("b", 0), ("c", 0), ("d", 0), ("e", 0)];
        assert_eq!(fallback_tasks(&[okr(&krs)]).len(), 4);
    }

    #[test]
    fn only_primary_okr_is_used() {
        let second = Okr::new("okr-2", "Other").with_key_result(KeyResult::new("x"));
        let tasks = fallback_tasks(&[okr(&[("Read the book", 10)]), second]).tasks;
        assert!(tasks.iter().all(|t| t.okr_id.as_deref() == Some("okr-1")));
    }

    #[test]
    fn stale_sweep_only_touches_yesterday_open_tasks() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let mut tasks = vec![
            DailyTask::new("okr-1", "pending", yesterday),
            DailyTask::new("okr-1", "done", yesterday),
            DailyTask::new("okr-1", "today", today),
            DailyTask::new("okr-1", "blocked", yesterday),
        ];
        for (i, t) in tasks.iter_mut().enumerate() {
            t.id = i as i64 + 1;
        }
        tasks[1].complete(chrono::Utc::now()).unwrap();
        tasks[3].block().unwrap();

        let failed = fail_stale_tasks(&mut tasks, today);
        assert_eq!(failed, vec![1]);
        assert_eq!(tasks[0].status, TaskStatus::Failed);
        assert_eq!(tasks[1].status, TaskStatus::Completed);
        assert_eq!(tasks[2].status, TaskStatus::Pending);
        assert_eq!(tasks[3].status, TaskStatus::Blocked);
    }
}
