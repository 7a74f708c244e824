//! dayslot-core: single-day task scheduling engine.
//!
//! Tasks become ready as their dependencies complete, are picked by a
//! dynamic priority score, and multitask-capable tasks may share a slot.
//! The engine emits structured [`ScheduleEvent`]s; presentation is left to
//! callers.

pub mod config;
pub mod error;
pub mod events;
pub mod queue;
pub mod scheduler;
pub mod task;
pub mod time;

pub use config::{DEFAULT_STARTING_TIME, SchedulerConfig};
pub use error::{BlockedTask, SchedulerError};
pub use events::{EventSink, Schedule, ScheduleEvent};
pub use queue::{QueueEntry, TaskQueue};
pub use scheduler::{MultitaskSlot, Scheduler};
pub use task::{
    Minutes, PROMOTED_PRIORITY, Priority, STRICT_START_PRIORITY, Task, TaskId, TaskStatus,
    ValueDimensions, compute_priority,
};
pub use time::{format_clock, format_elapsed, parse_clock};
