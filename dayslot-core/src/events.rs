//! Schedule events: the structured output of a scheduling run.
//!
//! Formatting is left to consumers; times are minutes from midnight.

use crate::task::{Minutes, Priority, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScheduleEvent {
    /// Two multitask tasks share one slot. `task_a` is the shorter one and
    /// completes first.
    MultitaskStarted {
        time: Minutes,
        task_a: TaskId,
        task_b: TaskId,
        total_duration: Minutes,
    },
    TaskStarted {
        time: Minutes,
        task_id: TaskId,
        duration: Minutes,
    },
    TaskCompleted {
        time: Minutes,
        task_id: TaskId,
        description: String,
        /// Priority the task was selected with.
        priority: Priority,
    },
    ScheduleFinished {
        total_elapsed_minutes: Minutes,
    },
}

/// Consumer of events as the scheduler produces them.
pub trait EventSink {
    fn emit(&mut self, event: ScheduleEvent);
}

impl EventSink for Vec<ScheduleEvent> {
    fn emit(&mut self, event: ScheduleEvent) {
        self.push(event);
    }
}

impl<F: FnMut(ScheduleEvent)> EventSink for F {
    fn emit(&mut self, event: ScheduleEvent) {
        self(event)
    }
}

/// A finished run, collected in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub starting_time: Minutes,
    pub events: Vec<ScheduleEvent>,
}

impl Schedule {
    pub fn total_elapsed(&self) -> Option<Minutes> {
        self.events.iter().rev().find_map(|e| match e {
            ScheduleEvent::ScheduleFinished {
                total_elapsed_minutes,
            } => Some(*total_elapsed_minutes),
            _ => None,
        })
    }

    /// `(task_id, time)` for each completion, in order.
    pub fn completions(&self) -> Vec<(TaskId, Minutes)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ScheduleEvent::TaskCompleted { task_id, time, .. } => Some((*task_id, *time)),
                _ => None,
            })
            .collect()
    }

    pub fn completion_order(&self) -> Vec<TaskId> {
        self.completions().into_iter().map(|(id, _)| id).collect()
    }

    pub fn end_time(&self) -> Option<Minutes> {
        self.total_elapsed().map(|e| self.starting_time + e)
    }
}
