//! Task model for the day scheduler.
//!
//! A task carries its own scoring inputs (`ValueDimensions`); the derived
//! `priority` is recomputed by the scheduler on every tick via
//! [`compute_priority`], which is pure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stable task identifier, used as the dependency-reference key.
pub type TaskId = u32;

/// Minutes. Clock values are minutes from midnight.
pub type Minutes = u32;

pub type Priority = i32;

/// Priority pinned on a task once its strict start time has been reached.
pub const STRICT_START_PRIORITY: Priority = 10;

/// Priority given to a multitask partner so it is popped next.
pub const PROMOTED_PRIORITY: Priority = 11;

/// Weights applied to `w1..w4` of the value dimensions.
const WEIGHTS: [Priority; 4] = [3, 2, 3, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InQueue,
    Completed,
}

/// `[strict_start, w1, w2, w3, w4]`.
///
/// `strict_start` is minutes from midnight (0 = unset). The four weights are
/// binary flags; anything else is rejected when the scheduler is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueDimensions(pub [i32; 5]);

impl ValueDimensions {
    pub fn new(strict_start: Minutes, w1: i32, w2: i32, w3: i32, w4: i32) -> Self {
        // Out of i32 range maps to -1, which `is_valid` rejects.
        let strict_start = i32::try_from(strict_start).unwrap_or(-1);
        Self([strict_start, w1, w2, w3, w4])
    }

    pub fn strict_start(&self) -> Option<Minutes> {
        match self.0[0] {
            s if s > 0 => Some(s as Minutes),
            _ => None,
        }
    }

    pub fn weights(&self) -> [i32; 4] {
        [self.0[1], self.0[2], self.0[3], self.0[4]]
    }

    /// `3*w1 + 2*w2 + 3*w3 + 1*w4`.
    pub fn weighted_score(&self) -> Priority {
        self.weights()
            .iter()
            .zip(WEIGHTS)
            .map(|(w, k)| w * k)
            .sum()
    }

    pub fn is_valid(&self) -> bool {
        self.0[0] >= 0 && self.weights().iter().all(|w| (0..=1).contains(w))
    }
}

/// Priority of a task with the given dimensions at `now`.
pub fn compute_priority(dims: &ValueDimensions, now: Minutes) -> Priority {
    match dims.strict_start() {
        Some(start) if now >= start => STRICT_START_PRIORITY,
        _ => dims.weighted_score(),
    }
}

/// A unit of work in the day plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,

    /// Remaining minutes. Reduced when this task absorbs a shorter
    /// multitask partner.
    pub duration: Minutes,

    /// Ids that must be completed first. Only the scheduler removes from it.
    #[serde(default)]
    pub dependencies: BTreeSet<TaskId>,

    #[serde(default)]
    pub value_dimensions: ValueDimensions,

    #[serde(default)]
    pub multitask: bool,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    pub fn new(id: TaskId, description: impl Into<String>, duration: Minutes) -> Self {
        Self {
            id,
            description: description.into(),
            duration,
            dependencies: BTreeSet::new(),
            value_dimensions: ValueDimensions::default(),
            multitask: false,
            priority: 0,
            status: TaskStatus::NotStarted,
        }
    }

    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = deps.into_iter().collect();
        self
    }

    pub fn with_value_dimensions(mut self, dims: ValueDimensions) -> Self {
        self.value_dimensions = dims;
        self
    }

    pub fn with_multitask(mut self, multitask: bool) -> Self {
        self.multitask = multitask;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Recompute `priority` for `now`. Touches nothing else.
    pub fn update_priority(&mut self, now: Minutes) -> Priority {
        self.priority = compute_priority(&self.value_dimensions, now);
        self.priority
    }

    /// NotStarted with nothing left to wait on.
    pub fn is_ready(&self) -> bool {
        self.status == TaskStatus::NotStarted && self.dependencies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_score_uses_fixed_weights() {
        let dims = ValueDimensions::new(0, 1, 1, 1, 1);
        assert_eq!(dims.weighted_score(), 9);
        let dims = ValueDimensions::new(0, 0, 1, 0, 1);
        assert_eq!(dims.weighted_score(), 3);
    }

    #[test]
    fn strict_start_pins_priority_once_reached() {
        let dims = ValueDimensions::new(600, 1, 0, 0, 1);
        assert_eq!(compute_priority(&dims, 599), 4);
        assert_eq!(compute_priority(&dims, 600), STRICT_START_PRIORITY);
        assert_eq!(compute_priority(&dims, 900), STRICT_START_PRIORITY);
    }

    #[test]
    fn zero_strict_start_is_unset() {
        let dims = ValueDimensions::new(0, 0, 0, 0, 0);
        assert_eq!(dims.strict_start(), None);
        assert_eq!(compute_priority(&dims, 0), 0);
    }

    #[test]
    fn rejects_non_binary_weights() {
        assert!(ValueDimensions::new(480, 1, 0, 1, 0).is_valid());
        assert!(!ValueDimensions([0, 2, 0, 0, 0]).is_valid());
        assert!(!ValueDimensions([-5, 0, 0, 0, 0]).is_valid());
    }

    #[test]
    fn strict_start_beyond_i32_is_invalid_not_wrapped() {
        let dims = ValueDimensions::new(u32::MAX, 0, 0, 0, 0);
        assert!(!dims.is_valid());
        assert_eq!(dims.strict_start(), None);
        assert_eq!(ValueDimensions::new(i32::MAX as u32, 0, 0, 0, 0).strict_start(), Some(i32::MAX as u32));
    }

    #[test]
    fn task_deserializes_with_defaults() {
        let t: Task = serde_json::from_str(
            r#"{"id": 3, "description": "enjoy breakfast", "duration": 10, "dependencies": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(t.status, TaskStatus::NotStarted);
        assert!(!t.multitask);
        assert_eq!(t.dependencies.len(), 2);
        assert_eq!(t.value_dimensions, ValueDimensions::default());
    }

    #[test]
    fn update_priority_leaves_dependencies_alone() {
        let mut t = Task::new(1, "a", 5)
            .with_dependencies([7])
            .with_value_dimensions(ValueDimensions::new(0, 1, 1, 0, 0));
        assert_eq!(t.update_priority(480), 5);
        assert_eq!(t.dependencies.len(), 1);
        assert!(!t.is_ready());
    }
}
