use chrono::NaiveDate;
use learnpath_core::{
    DailyTask, GeneratedBy, Okr, Priority, TaskStatus, TaskType, DEFAULT_TASK_MINUTES,
};
use tracing::warn;

use super::GeneratedTasks;
use crate::progress::fallback_contribution;

const DEFAULT_CONTRIBUTION: u8 = 10;

/// Bind generated tasks to OKRs and a date, filling gaps in the model output.
///
/// Unknown `okrId`s fall back to the first OKR. A `relatedKRIndex` outside that
/// OKR's key results is dropped. With no OKRs nothing can be bound and the
/// result is empty.
pub fn materialize_tasks(
    generated: &GeneratedTasks,
    okrs: &[Okr],
    task_date: NaiveDate,
    task_type: TaskType,
) -> Vec<DailyTask> {
    let Some(primary) = okrs.first() else {
        return Vec::new();
    };

    generated
        .tasks
        .iter()
        .map(|task| {
            let okr = task
                .okr_id
                .as_deref()
                .and_then(|id| okrs.iter().find(|o| o.id == id))
                .unwrap_or(primary);

            let key_result_index = task.related_kr_index.and_then(|raw| {
                let index = usize::try_from(raw)
                    .ok()
                    .filter(|&i| i < okr.key_results.len());
                if index.is_none() {
                    warn!(okr_id = %okr.id, index = raw, title = %task.title, "dropping unknown key result index");
                }
                index
            });

            let progress_contribution = match task.progress_contribution.filter(|&c| c > 0) {
                Some(c) => c.min(100) as u8,
                None => key_result_index
                    .map(|i| fallback_contribution(okr.key_results[i].progress))
                    .unwrap_or(DEFAULT_CONTRIBUTION),
            };

            DailyTask {
                id: 0,
                okr_id: okr.id.clone(),
                key_result_index,
                title: task.title.clone(),
                description: task.description.clone(),
                task_type,
                status: TaskStatus::Pending,
                priority: task
                    .priority
                    .filter(|&p| p != 0)
                    .map(Priority::new)
                    .unwrap_or_default(),
                task_date,
                estimated_duration: task
                    .estimated_duration
                    .filter(|&d| d > 0)
                    .and_then(|d| u32::try_from(d).ok())
                    .unwrap_or(DEFAULT_TASK_MINUTES),
                progress_contribution,
                completed_at: None,
                generated_by: GeneratedBy::Ai,
                created_at: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::GeneratedTask;
    use learnpath_core::KeyResult;

    fn okrs() -> Vec<Okr> {
        vec![
            Okr::new("okr-1", "Learn Rust")
                .with_key_result(KeyResult::new("Book").with_progress(10))
                .with_key_result(KeyResult::new("CLI").with_progress(80)),
            Okr::new("okr-2", "Learn SQL").with_key_result(KeyResult::new("Joins").with_progress(50)),
        ]
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn generated(tasks: Vec<GeneratedTask>) -> GeneratedTasks {
        GeneratedTasks { tasks }
    }

    #[test]
    fn resolves_okr_by_id_with_fallback_to_first() {
        let tasks = materialize_tasks(
            &generated(vec![
                GeneratedTask {
                    title: "a".into(),
                    okr_id: Some("okr-2".into()),
                    ..Default::default()
                },
                GeneratedTask {
                    title: "b".into(),
                    okr_id: Some("missing".into()),
                    ..Default::default()
                },
            ]),
            &okrs(),
            date(),
            TaskType::Daily,
        );
        assert_eq!(tasks[0].okr_id, "okr-2");
        assert_eq!(tasks[1].okr_id, "okr-1");
        assert!(tasks.iter().all(|t| t.generated_by == GeneratedBy::Ai));
        assert!(tasks.iter().all(|t| t.task_date == date()));
    }

    #[test]
    fn fills_defaults_and_clamps_priority() {
        let tasks = materialize_tasks(
            &generated(vec![
                GeneratedTask {
                    title: "no fields".into(),
                    ..Default::default()
                },
                GeneratedTask {
                    title: "too low".into(),
                    priority: Some(9),
                    estimated_duration: Some(25),
                    ..Default::default()
                },
            ]),
            &okrs(),
            date(),
            TaskType::Weekly,
        );
        assert_eq!(tasks[0].priority.value(), 3);
        assert_eq!(tasks[0].estimated_duration, 60);
        assert_eq!(tasks[0].progress_contribution, 10);
        assert_eq!(tasks[0].key_result_index, None);
        assert_eq!(tasks[1].priority.value(), 5);
        assert_eq!(tasks[1].estimated_duration, 25);
        assert_eq!(tasks[1].task_type, TaskType::Weekly);
    }

    #[test]
    fn contribution_derived_from_key_result_progress() {
        let tasks = materialize_tasks(
            &generated(vec![
                GeneratedTask {
                    title: "early".into(),
                    related_kr_index: Some(0),
                    ..Default::default()
                },
                GeneratedTask {
                    title: "late".into(),
                    related_kr_index: Some(1),
                    ..Default::default()
                },
                GeneratedTask {
                    title: "explicit".into(),
                    related_kr_index: Some(1),
                    progress_contribution: Some(18),
                    ..Default::default()
                },
            ]),
            &okrs(),
            date(),
            TaskType::Daily,
        );
        assert_eq!(tasks[0].progress_contribution, 15);
        assert_eq!(tasks[1].progress_contribution, 5);
        assert_eq!(tasks[2].progress_contribution, 18);
    }

    #[test]
    fn invalid_key_result_index_is_dropped() {
        let tasks = materialize_tasks(
            &generated(vec![GeneratedTask {
                title: "ghost".into(),
                related_kr_index: Some(7),
                ..Default::default()
            }]),
            &okrs(),
            date(),
            TaskType::Daily,
        );
        assert_eq!(tasks[0].key_result_index, None);
        assert_eq!(tasks[0].progress_contribution, 10);
        assert!(tasks[0].completion_event().is_none());
    }

    #[test]
    fn no_okrs_no_tasks() {
        let tasks = materialize_tasks(
            &generated(vec![GeneratedTask {
                title: "orphan".into(),
                ..Default::default()
            }]),
            &[],
            date(),
            TaskType::Daily,
        );
        assert!(tasks.is_empty());
    }
}
