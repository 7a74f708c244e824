//! Engine configuration.

use crate::task::Minutes;
use serde::{Deserialize, Serialize};

/// 8:00am.
pub const DEFAULT_STARTING_TIME: Minutes = 480;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Minutes from midnight at which the first task may start.
    #[serde(default = "default_starting_time")]
    pub starting_time: Minutes,
}

fn default_starting_time() -> Minutes {
    DEFAULT_STARTING_TIME
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            starting_time: DEFAULT_STARTING_TIME,
        }
    }
}

impl SchedulerConfig {
    pub fn with_starting_time(mut self, starting_time: Minutes) -> Self {
        self.starting_time = starting_time;
        self
    }
}
