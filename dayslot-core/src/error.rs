//! Error types for the scheduling engine.
//!
//! Every variant is a contract violation or an unsatisfiable input; none is
//! transient, so nothing here is retried.

use crate::task::{Minutes, Priority, TaskId, ValueDimensions};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A task left waiting when the scheduler could make no further progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedTask {
    pub task_id: TaskId,
    pub waiting_on: Vec<TaskId>,
}

impl fmt::Display for BlockedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {} waiting on {:?}", self.task_id, self.waiting_on)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("priority queue is empty")]
    EmptyQueue,

    #[error("cannot lower priority of task {task_id} from {current} to {requested}")]
    PriorityOrderingViolation {
        task_id: TaskId,
        current: Priority,
        requested: Priority,
    },

    #[error("queue index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no task can become ready at minute {time}: {}", format_blocked(.blocked))]
    UnresolvableDependency { time: Minutes, blocked: Vec<BlockedTask> },

    #[error("duplicate task id {0}")]
    DuplicateTaskId(TaskId),

    #[error("task {task_id} has invalid value dimensions {dimensions:?} (weights must be 0 or 1)")]
    InvalidValueDimensions {
        task_id: TaskId,
        dimensions: ValueDimensions,
    },

    #[error("task {task_id} ({duration} min) starting at minute {time} runs past the end of the clock")]
    ClockOverflow {
        task_id: TaskId,
        time: Minutes,
        duration: Minutes,
    },

    #[error("unknown task id {0}")]
    UnknownTask(TaskId),
}

fn format_blocked(blocked: &[BlockedTask]) -> String {
    blocked
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
