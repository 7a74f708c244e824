use dayslot_core::{EventSink, ScheduleEvent, format_clock, format_elapsed};

use crate::config::OutputFormat;

pub fn render_text(event: &ScheduleEvent) -> String {
    match event {
        ScheduleEvent::MultitaskStarted {
            time,
            task_a,
            task_b,
            total_duration,
        } => format!(
            "{:>8}  multitasking task {task_a} and task {task_b} ({total_duration} min total)",
            format_clock(*time)
        ),
        ScheduleEvent::TaskStarted {
            time,
            task_id,
            duration,
        } => format!(
            "{:>8}  started task {task_id} ({duration} min)",
            format_clock(*time)
        ),
        ScheduleEvent::TaskCompleted {
            time,
            task_id,
            description,
            priority,
        } => format!(
            "{:>8}  completed task {task_id} '{description}' (priority {priority})",
            format_clock(*time)
        ),
        ScheduleEvent::ScheduleFinished {
            total_elapsed_minutes,
        } => format!(
            "\nCompleted all planned tasks in {}",
            format_elapsed(*total_elapsed_minutes)
        ),
    }
}

/// Prints events to stdout as they are produced.
#[derive(Debug)]
pub struct Printer {
    format: OutputFormat,
}

impl Printer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl EventSink for Printer {
    fn emit(&mut self, event: ScheduleEvent) {
        match self.format {
            OutputFormat::Text => println!("{}", render_text(&event)),
            OutputFormat::Json => match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!("failed to encode event: {e}"),
            },
        }
    }
}
