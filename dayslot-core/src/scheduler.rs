//! Scheduler: drives the day plan to completion.
//!
//! Each tick recomputes priorities, moves dependency-free tasks into the
//! queue, pops the best task and advances the clock. A multitask task pulls
//! the best other multitask task into the same slot; the shorter one's time
//! is absorbed into the longer one's.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::SchedulerConfig;
use crate::error::{BlockedTask, Result, SchedulerError};
use crate::events::{EventSink, Schedule, ScheduleEvent};
use crate::queue::{QueueEntry, TaskQueue};
use crate::task::{Minutes, Task, TaskId, TaskStatus};

/// Outcome of netting two multitask durations against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultitaskSlot {
    /// Wall-clock length of the shared slot.
    pub total_duration: Minutes,
    pub shorter: TaskId,
    pub longer: TaskId,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
    // dependency id -> tasks waiting on it
    dependents: HashMap<TaskId, Vec<TaskId>>,
    queue: TaskQueue,
}

impl Scheduler {
    /// Build a scheduler over `tasks`.
    ///
    /// Tasks seeded as `Completed` are discharged up front. A task seeded as
    /// `InQueue` is reset to `NotStarted`, since the queue starts empty.
    pub fn new(tasks: Vec<Task>) -> Result<Self> {
        let mut index = HashMap::with_capacity(tasks.len());
        let mut dependents: HashMap<TaskId, Vec<TaskId>> = HashMap::new();

        for (i, t) in tasks.iter().enumerate() {
            if !t.value_dimensions.is_valid() {
                return Err(SchedulerError::InvalidValueDimensions {
                    task_id: t.id,
                    dimensions: t.value_dimensions,
                });
            }
            if index.insert(t.id, i).is_some() {
                return Err(SchedulerError::DuplicateTaskId(t.id));
            }
            for dep in &t.dependencies {
                dependents.entry(*dep).or_default().push(t.id);
            }
        }

        let mut scheduler = Self {
            tasks,
            index,
            dependents,
            queue: TaskQueue::new(),
        };

        let mut completed = Vec::new();
        for t in scheduler.tasks.iter_mut() {
            match t.status {
                TaskStatus::InQueue => t.status = TaskStatus::NotStarted,
                TaskStatus::Completed => completed.push(t.id),
                TaskStatus::NotStarted => {}
            }
        }
        for id in completed {
            scheduler.discharge(id);
        }

        Ok(scheduler)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.index.get(&id).map(|&i| &self.tasks[i])
    }

    pub fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    /// True while any task has not yet entered the queue.
    pub fn has_unscheduled_tasks(&self) -> bool {
        self.tasks.iter().any(|t| t.status == TaskStatus::NotStarted)
    }

    /// Recompute every priority for `now` and queue every ready task.
    ///
    /// A queued task whose priority rose (its strict start arrived) has its
    /// queue key raised through `promote`. Returns how many tasks were queued.
    pub fn refresh_ready(&mut self, now: Minutes) -> Result<usize> {
        let mut queued = 0;
        for task in self.tasks.iter_mut() {
            let priority = task.update_priority(now);
            match task.status {
                TaskStatus::InQueue => {
                    let Some(idx) = self.queue.position_of(task.id) else { continue };
                    if self.queue.get(idx).is_some_and(|e| priority > e.priority) {
                        debug!(task_id = task.id, priority, "raising queued priority");
                        self.queue.promote(idx, priority)?;
                    }
                }
                TaskStatus::NotStarted if task.dependencies.is_empty() => {
                    task.status = TaskStatus::InQueue;
                    self.queue.push(QueueEntry::new(task.id, priority));
                    queued += 1;
                    debug!(task_id = task.id, priority, time = now, "task ready");
                }
                _ => {}
            }
        }
        Ok(queued)
    }

    /// Run the plan from `starting_time`, streaming events into `sink`.
    /// Returns the total elapsed minutes.
    pub fn run(&mut self, starting_time: Minutes, sink: &mut impl EventSink) -> Result<Minutes> {
        let mut now = starting_time;
        info!(tasks = self.tasks.len(), starting_time, "schedule started");

        while self.has_unscheduled_tasks() || !self.queue.is_empty() {
            self.refresh_ready(now)?;

            if self.queue.is_empty() {
                let blocked = self.blocked_tasks();
                warn!(time = now, blocked = blocked.len(), "no task can become ready");
                return Err(SchedulerError::UnresolvableDependency { time: now, blocked });
            }

            let first = self.queue.pop_max()?;
            debug!(task_id = first.task_id, priority = first.priority, time = now, "popped");

            now = match self.multitask_partner(first.task_id)? {
                Some(idx) => self.run_multitask(first, idx, now, sink)?,
                None => self.run_single(first, now, sink)?,
            };
        }

        let elapsed = now - starting_time;
        info!(elapsed, "schedule finished");
        sink.emit(ScheduleEvent::ScheduleFinished {
            total_elapsed_minutes: elapsed,
        });
        Ok(elapsed)
    }

    /// Run the plan and collect every event.
    pub fn run_schedule(&mut self, starting_time: Minutes) -> Result<Schedule> {
        let mut events = Vec::new();
        self.run(starting_time, &mut events)?;
        Ok(Schedule {
            starting_time,
            events,
        })
    }

    pub fn run_with_config(&mut self, config: &SchedulerConfig) -> Result<Schedule> {
        self.run_schedule(config.starting_time)
    }

    /// Net the shorter task's duration against the longer one's.
    ///
    /// On equal durations `a` is taken as the longer task.
    pub fn merge_durations(&mut self, a: TaskId, b: TaskId) -> Result<MultitaskSlot> {
        let (ia, ib) = (self.slot(a)?, self.slot(b)?);
        let (shorter, longer) = if self.tasks[ia].duration >= self.tasks[ib].duration {
            (ib, ia)
        } else {
            (ia, ib)
        };

        let total_duration = self.tasks[longer].duration;
        let absorbed = self.tasks[shorter].duration;
        self.tasks[longer].duration -= absorbed;

        Ok(MultitaskSlot {
            total_duration,
            shorter: self.tasks[shorter].id,
            longer: self.tasks[longer].id,
        })
    }

    /// Remove `completed` from every dependent's dependency set.
    pub fn discharge(&mut self, completed: TaskId) {
        let Some(waiting) = self.dependents.get(&completed) else { return };
        for id in waiting {
            if let Some(&i) = self.index.get(id) {
                self.tasks[i].dependencies.remove(&completed);
            }
        }
    }

    fn slot(&self, id: TaskId) -> Result<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(SchedulerError::UnknownTask(id))
    }

    /// Queue index of the best-ranked multitask entry, if `first` can multitask.
    fn multitask_partner(&self, first: TaskId) -> Result<Option<usize>> {
        if !self.tasks[self.slot(first)?].multitask {
            return Ok(None);
        }
        let partner = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, e)| self.task(e.task_id).is_some_and(|t| t.multitask))
            .max_by_key(|(_, e)| **e)
            .map(|(i, _)| i);
        Ok(partner)
    }

    fn run_single(
        &mut self,
        entry: QueueEntry,
        now: Minutes,
        sink: &mut impl EventSink,
    ) -> Result<Minutes> {
        let duration = self.tasks[self.slot(entry.task_id)?].duration;
        sink.emit(ScheduleEvent::TaskStarted {
            time: now,
            task_id: entry.task_id,
            duration,
        });
        let now = advance(now, entry.task_id, duration)?;
        self.complete(entry, now, sink)?;
        Ok(now)
    }

    fn run_multitask(
        &mut self,
        first: QueueEntry,
        partner_idx: usize,
        now: Minutes,
        sink: &mut impl EventSink,
    ) -> Result<Minutes> {
        self.queue.promote_to_max(partner_idx)?;
        let partner = self.queue.pop_max()?;

        let slot = self.merge_durations(first.task_id, partner.task_id)?;
        let (shorter, longer) = if slot.shorter == first.task_id {
            (first, partner)
        } else {
            (partner, first)
        };

        info!(
            time = now,
            shorter = slot.shorter,
            longer = slot.longer,
            total = slot.total_duration,
            "multitasking"
        );
        sink.emit(ScheduleEvent::MultitaskStarted {
            time: now,
            task_a: slot.shorter,
            task_b: slot.longer,
            total_duration: slot.total_duration,
        });

        let shorter_minutes = self.tasks[self.slot(shorter.task_id)?].duration;
        let now = advance(now, shorter.task_id, shorter_minutes)?;
        self.complete(shorter, now, sink)?;
        let longer_minutes = self.tasks[self.slot(longer.task_id)?].duration;
        let now = advance(now, longer.task_id, longer_minutes)?;
        self.complete(longer, now, sink)?;
        Ok(now)
    }

    fn complete(&mut self, entry: QueueEntry, now: Minutes, sink: &mut impl EventSink) -> Result<()> {
        let i = self.slot(entry.task_id)?;
        let task = &mut self.tasks[i];
        task.status = TaskStatus::Completed;
        task.priority = entry.priority;

        info!(task_id = task.id, time = now, priority = entry.priority, "task completed");
        sink.emit(ScheduleEvent::TaskCompleted {
            time: now,
            task_id: task.id,
            description: task.description.clone(),
            priority: entry.priority,
        });

        self.discharge(entry.task_id);
        Ok(())
    }

    fn blocked_tasks(&self) -> Vec<BlockedTask> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::NotStarted)
            .map(|t| BlockedTask {
                task_id: t.id,
                waiting_on: t.dependencies.iter().copied().collect(),
            })
            .collect()
    }
}

fn advance(now: Minutes, task_id: TaskId, duration: Minutes) -> Result<Minutes> {
    now.checked_add(duration)
        .ok_or(SchedulerError::ClockOverflow {
            task_id,
            time: now,
            duration,
        })
}
