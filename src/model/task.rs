use serde::{Deserialize, Serialize};

/// A single to-do item.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: u32,
    text: String,
    #[serde(default)]
    completed: bool,
}

impl Task {
    pub fn new(id: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
    }
}

/// The persisted shape of the to-do list:
///
/// ```json
/// {
///   "tasks": [{ "id": 1, "text": "buy milk", "completed": false }],
///   "next_id": 2
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub(crate) tasks: Vec<Task>,
    #[serde(default = "first_id")]
    pub(crate) next_id: u32,
}

impl Default for TaskList {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: first_id(),
        }
    }
}

impl TaskList {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }
}

fn first_id() -> u32 {
    1
}
