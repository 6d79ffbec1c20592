use std::fmt;

use crate::editor::LineEditor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub done: bool,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Task {
            id,
            title: title.into(),
            done: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupMode {
    None,
    DuplicateNotice(String),
    ConfirmRemove(TaskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    List,
}

/// Per-row state. Only the row being edited carries a buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum RowMode {
    View,
    Editing { id: TaskId, buffer: LineEditor },
}

impl RowMode {
    pub fn editing_id(&self) -> Option<TaskId> {
        match self {
            RowMode::Editing { id, .. } => Some(*id),
            RowMode::View => None,
        }
    }
}
