use anyhow::{Context, Result};
use dayslot_core::Task;

use crate::loader::parse_tasks_json;

const SAMPLE_DAY: &str = include_str!("../../demos/seoul_day.json");

/// A sightseeing day in Seoul: breakfast, a museum visit, lunch, photos and
/// an evening meeting.
pub fn sample_day() -> Result<Vec<Task>> {
    parse_tasks_json(SAMPLE_DAY).context("parsing bundled sample day")
}
