//! In-memory task list with copy-on-write snapshots.
//!
//! Every effective mutation publishes a fresh `Snapshot`; a published
//! snapshot is never modified. Consumers detect change with `Rc::ptr_eq`.
//! Lookups by id that find nothing leave the current snapshot in place.

use std::rc::Rc;

use crate::error::StoreError;
use crate::models::{Task, TaskId};

pub type Snapshot = Rc<[Task]>;

type Observer = Box<dyn FnMut(&Snapshot)>;

/// Produces candidate ids. The store bumps a candidate that is not greater
/// than the last id handed out, so sources only need to be roughly increasing.
pub trait IdSource {
    fn next_candidate(&mut self) -> i64;
}

/// Wall-clock milliseconds since the Unix epoch.
pub struct ClockIds;

impl IdSource for ClockIds {
    fn next_candidate(&mut self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

impl<F: FnMut() -> i64> IdSource for F {
    fn next_candidate(&mut self) -> i64 {
        self()
    }
}

pub struct TaskStore {
    tasks: Snapshot,
    ids: Box<dyn IdSource>,
    last_id: Option<i64>,
    observers: Vec<Observer>,
}

impl Default for TaskStore {
    fn default() -> Self {
        TaskStore::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        TaskStore::with_id_source(ClockIds)
    }

    pub fn with_id_source(ids: impl IdSource + 'static) -> Self {
        TaskStore {
            tasks: Rc::from(Vec::new()),
            ids: Box::new(ids),
            last_id: None,
            observers: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Rc::clone(&self.tasks)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Registers a callback run after every snapshot replacement.
    pub fn subscribe(&mut self, observer: impl FnMut(&Snapshot) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn publish(&mut self, tasks: Vec<Task>) -> Snapshot {
        self.tasks = Rc::from(tasks);
        let snapshot = Rc::clone(&self.tasks);
        for observer in self.observers.iter_mut() {
            observer(&snapshot);
        }
        snapshot
    }

    fn fresh_id(&mut self) -> TaskId {
        let candidate = self.ids.next_candidate();
        let id = match self.last_id {
            Some(last) if candidate <= last => last + 1,
            _ => candidate,
        };
        self.last_id = Some(id);
        TaskId(id)
    }

    /// Appends a new task unless one with the exact same title exists.
    pub fn add(&mut self, title: &str) -> Result<Snapshot, StoreError> {
        if self.tasks.iter().any(|task| task.title == title) {
            log::debug!("rejected duplicate task title {:?}", title);
            return Err(StoreError::DuplicateTitle {
                title: title.to_string(),
            });
        }

        let task = Task::new(self.fresh_id(), title);
        log::info!("added task {}", task.id);
        let mut tasks = self.tasks.to_vec();
        tasks.push(task);
        Ok(self.publish(tasks))
    }

    pub fn toggle_done(&mut self, id: TaskId) -> Snapshot {
        let Some(index) = self.position(id) else {
            log::debug!("toggle_done: no task with id {}", id);
            return self.snapshot();
        };

        let mut tasks = self.tasks.to_vec();
        tasks[index].done = !tasks[index].done;
        log::info!("task {} marked done={}", id, tasks[index].done);
        self.publish(tasks)
    }

    /// Replaces the title. Unlike `add`, no uniqueness or emptiness check.
    pub fn edit_title(&mut self, id: TaskId, new_title: &str) -> Snapshot {
        let Some(index) = self.position(id) else {
            log::debug!("edit_title: no task with id {}", id);
            return self.snapshot();
        };

        let mut tasks = self.tasks.to_vec();
        tasks[index].title = new_title.to_string();
        log::info!("task {} retitled", id);
        self.publish(tasks)
    }

    /// Callers are expected to have confirmed the removal with the user.
    pub fn remove(&mut self, id: TaskId) -> Snapshot {
        if self.position(id).is_none() {
            log::debug!("remove: no task with id {}", id);
            return self.snapshot();
        }

        let tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| task.id != id)
            .cloned()
            .collect();
        log::info!("removed task {}", id);
        self.publish(tasks)
    }
}
