use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a field, reading JSON `null` as the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A task or subtask. Subtasks share the same shape and nest to any depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier, unique across the whole state
    pub id: String,
    /// Task text (never empty once stored)
    pub text: String,
    /// Completion flag
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: bool,
    /// Child subtasks, in display order
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtasks: Vec<Task>,
    /// Owning list; only set on top-level tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
}

impl Task {
    /// Create a top-level task owned by `list_id`
    pub fn new(id: String, text: String, list_id: String) -> Self {
        Self {
            id,
            text,
            done: false,
            subtasks: Vec::new(),
            list_id: Some(list_id),
        }
    }

    /// Create a subtask (no owning list)
    pub fn new_subtask(id: String, text: String) -> Self {
        Self {
            id,
            text,
            done: false,
            subtasks: Vec::new(),
            list_id: None,
        }
    }

    /// Append a subtask at the end
    pub fn add_subtask(&mut self, subtask: Task) {
        self.subtasks.push(subtask);
    }

    /// Remove a direct subtask by ID
    pub fn remove_subtask(&mut self, subtask_id: &str) -> Option<Task> {
        let idx = self.subtasks.iter().position(|st| st.id == subtask_id)?;
        Some(self.subtasks.remove(idx))
    }

    /// Number of descendants at every depth
    pub fn descendant_count(&self) -> usize {
        self.subtasks
            .iter()
            .map(|st| 1 + st.descendant_count())
            .sum()
    }

    /// Whether this task or any descendant has the given ID
    pub fn contains_id(&self, id: &str) -> bool {
        self.id == id || self.subtasks.iter().any(|st| st.contains_id(id))
    }
}

/// Depth-first search for a task by ID at any depth
pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task(&task.subtasks, id) {
            return Some(found);
        }
    }
    None
}

/// Mutable variant of [`find_task`]
pub fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    for task in tasks.iter_mut() {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task_mut(&mut task.subtasks, id) {
            return Some(found);
        }
    }
    None
}

/// Find the immediate parent whose direct subtasks contain `subtask_id`.
/// Returns `None` for top-level IDs and unknown IDs.
pub fn find_parent_task<'a>(tasks: &'a [Task], subtask_id: &str) -> Option<&'a Task> {
    for task in tasks {
        if task.subtasks.iter().any(|st| st.id == subtask_id) {
            return Some(task);
        }
        if let Some(parent) = find_parent_task(&task.subtasks, subtask_id) {
            return Some(parent);
        }
    }
    None
}

/// Mutable variant of [`find_parent_task`]
pub fn find_parent_task_mut<'a>(tasks: &'a mut [Task], subtask_id: &str) -> Option<&'a mut Task> {
    for task in tasks.iter_mut() {
        if task.subtasks.iter().any(|st| st.id == subtask_id) {
            return Some(task);
        }
        if let Some(parent) = find_parent_task_mut(&mut task.subtasks, subtask_id) {
            return Some(parent);
        }
    }
    None
}

/// Remove a nested subtask from whichever parent holds it
pub fn remove_nested(tasks: &mut [Task], subtask_id: &str) -> Option<Task> {
    find_parent_task_mut(tasks, subtask_id)?.remove_subtask(subtask_id)
}
