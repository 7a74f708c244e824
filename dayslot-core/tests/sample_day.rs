use dayslot_core::{Schedule, ScheduleEvent, Scheduler, SchedulerError, Task, TaskId, TaskStatus};
use std::collections::HashMap;

fn sample_day() -> Vec<Task> {
    serde_json::from_str(include_str!("../../demos/seoul_day.json")).unwrap()
}

fn completion_index(schedule: &Schedule) -> HashMap<TaskId, usize> {
    schedule
        .completion_order()
        .into_iter()
        .enumerate()
        .map(|(i, id)| (id, i))
        .collect()
}

/// Sum of slot lengths: single tasks count their duration, merged pairs
/// count the shared slot once.
fn slot_minutes(schedule: &Schedule) -> u32 {
    schedule
        .events
        .iter()
        .map(|e| match e {
            ScheduleEvent::TaskStarted { duration, .. } => *duration,
            ScheduleEvent::MultitaskStarted { total_duration, .. } => *total_duration,
            _ => 0,
        })
        .sum()
}

/// Full-day regression: the sample plan runs start to finish from 8:00am.
#[test]
fn sample_day_runs_to_completion() {
    let tasks = sample_day();
    let mut scheduler = Scheduler::new(tasks).unwrap();
    let schedule = scheduler.run_schedule(480).unwrap();

    assert_eq!(
        schedule.completion_order(),
        vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, 16]
    );
    assert_eq!(schedule.total_elapsed(), Some(470));
    assert_eq!(schedule.end_time(), Some(950));
    assert!(scheduler.tasks().iter().all(|t| t.status == TaskStatus::Completed));
}

#[test]
fn sample_day_respects_dependencies() {
    let planned_tasks = sample_day();
    let mut scheduler = Scheduler::new(planned_tasks.clone()).unwrap();
    let schedule = scheduler.run_schedule(480).unwrap();
    let position = completion_index(&schedule);

    for task in &planned_tasks {
        for dep in &task.dependencies {
            assert!(
                position[dep] < position[&task.id],
                "task {} completed before its dependency {}",
                task.id,
                dep
            );
        }
    }

    // Every task completes exactly once.
    assert_eq!(position.len(), planned_tasks.len());
    assert_eq!(schedule.completion_order().len(), planned_tasks.len());
}

#[test]
fn sample_day_elapsed_counts_each_slot_once() {
    let planned_tasks = sample_day();
    let mut scheduler = Scheduler::new(planned_tasks.clone()).unwrap();
    let schedule = scheduler.run_schedule(480).unwrap();

    let elapsed = schedule.total_elapsed().unwrap();
    assert_eq!(elapsed, slot_minutes(&schedule));

    // Merged pairs save exactly the shorter task's minutes.
    let durations: HashMap<TaskId, u32> = planned_tasks.iter().map(|t| (t.id, t.duration)).collect();
    let saved: u32 = schedule
        .events
        .iter()
        .filter_map(|e| match e {
            ScheduleEvent::MultitaskStarted { task_a, .. } => Some(durations[task_a]),
            _ => None,
        })
        .sum();
    let planned: u32 = durations.values().sum();
    assert_eq!(elapsed, planned - saved);
}

#[test]
fn sample_day_pairs_only_multitask_tasks() {
    let planned_tasks = sample_day();
    let multitask: HashMap<TaskId, bool> = planned_tasks.iter().map(|t| (t.id, t.multitask)).collect();
    let mut scheduler = Scheduler::new(planned_tasks).unwrap();
    let schedule = scheduler.run_schedule(480).unwrap();

    let pairs: Vec<(TaskId, TaskId, u32)> = schedule
        .events
        .iter()
        .filter_map(|e| match e {
            ScheduleEvent::MultitaskStarted {
                task_a,
                task_b,
                total_duration,
                ..
            } => Some((*task_a, *task_b, *total_duration)),
            _ => None,
        })
        .collect();

    assert_eq!(pairs, vec![(8, 9, 10), (15, 14, 20)]);
    for (a, b, _) in pairs {
        assert!(multitask[&a] && multitask[&b]);
    }
}

#[test]
fn completed_events_never_go_back_in_time() {
    let mut scheduler = Scheduler::new(sample_day()).unwrap();
    let schedule = scheduler.run_schedule(480).unwrap();
    let times: Vec<u32> = schedule.completions().into_iter().map(|(_, t)| t).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
    assert!(times.iter().all(|&t| t >= 480));
}

#[test]
fn unknown_dependency_in_sample_fails_instead_of_spinning() {
    let mut tasks = sample_day();
    tasks.push(Task::new(17, "call home", 15).with_dependencies([999]));
    let mut scheduler = Scheduler::new(tasks).unwrap();

    match scheduler.run_schedule(480) {
        Err(SchedulerError::UnresolvableDependency { time, blocked }) => {
            assert_eq!(time, 950);
            assert_eq!(blocked.len(), 1);
            assert_eq!(blocked[0].task_id, 17);
            assert_eq!(blocked[0].waiting_on, vec![999]);
        }
        other => panic!("expected unresolvable dependency, got {other:?}"),
    }
}
