use crate::domain::{
    find_task, find_task_mut, null_as_default, remove_nested, IdGenerator, List, Task,
    LIST_PREFIX, SUBTASK_PREFIX, TASK_PREFIX,
};
use crate::error::TodoError;
use crate::persistence::Settings;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where a task lives in the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    /// Top-level task of `lists[list]`, at `index`
    Active { list: usize, index: usize },
    /// Entry of `archived`, at `index`
    Archived { index: usize },
    /// Subtask somewhere below a live or archived task
    Nested,
}

/// What a done-flag change did to the task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Top-level task moved from its list to the archive
    Archived,
    /// Archive entry moved back to the front of its list
    Restored,
    /// Archive entry left the archive but its list no longer exists
    Dropped,
    /// Only the flag changed (subtasks, already-archived or already-open tasks)
    Flagged,
}

/// Result of editing a task's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Updated,
    /// Text was blank, so the task was deleted
    Deleted,
}

/// What the presentation layer should show
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    Archive(&'a [Task]),
    List(&'a List),
    /// No list selected
    Empty,
}

/// Main application state: lists, archive and view selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default, deserialize_with = "null_as_default")]
    pub lists: Vec<List>,
    #[serde(default)]
    pub current_list_id: Option<String>,
    /// Archived top-level tasks, most recent first
    #[serde(default, deserialize_with = "null_as_default")]
    pub archived: Vec<Task>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub viewing_archived: bool,

    #[serde(skip)]
    ids: IdGenerator,
    #[serde(skip)]
    settings: Settings,
}

impl AppState {
    /// Empty state with no lists
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// First-run state: a single default list, selected
    pub fn with_default_list(settings: Settings, ids: IdGenerator) -> Self {
        let mut state = Self::new(settings).with_ids(ids);
        let name = state.settings.default_list_name.clone();
        state.create_list(&name);
        state
    }

    /// Replace the identifier generator
    pub fn with_ids(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the settings (used after deserializing)
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Generate an ID not yet used anywhere in the state
    pub fn fresh_id(&mut self, prefix: &str) -> String {
        loop {
            let id = self.ids.generate(prefix);
            if !self.contains_id(&id) {
                return id;
            }
        }
    }

    /// Whether any list, task, subtask or archive entry uses this ID
    pub fn contains_id(&self, id: &str) -> bool {
        self.lists
            .iter()
            .any(|l| l.id == id || l.tasks.iter().any(|t| t.contains_id(id)))
            || self.archived.iter().any(|t| t.contains_id(id))
    }

    pub fn list(&self, list_id: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    fn list_index(&self, list_id: &str) -> Option<usize> {
        self.lists.iter().position(|l| l.id == list_id)
    }

    fn list_mut(&mut self, list_id: &str) -> Result<&mut List, TodoError> {
        self.lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| TodoError::ListNotFound(list_id.to_string()))
    }

    /// The selected list, if any
    pub fn current_list(&self) -> Option<&List> {
        self.current_list_id.as_deref().and_then(|id| self.list(id))
    }

    /// Find a task at any depth, in the lists first and then in the archive
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.lists
            .iter()
            .find_map(|l| find_task(&l.tasks, task_id))
            .or_else(|| find_task(&self.archived, task_id))
    }

    /// Mutable variant of [`AppState::task`]
    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        for list in self.lists.iter_mut() {
            if let Some(task) = find_task_mut(&mut list.tasks, task_id) {
                return Some(task);
            }
        }
        find_task_mut(&mut self.archived, task_id)
    }

    pub fn is_archived(&self, task_id: &str) -> bool {
        self.archived.iter().any(|t| t.id == task_id)
    }

    fn locate(&self, task_id: &str) -> Option<Location> {
        for (list, l) in self.lists.iter().enumerate() {
            if let Some(index) = l.position(task_id) {
                return Some(Location::Active { list, index });
            }
        }
        if let Some(index) = self.archived.iter().position(|t| t.id == task_id) {
            return Some(Location::Archived { index });
        }
        self.task(task_id).map(|_| Location::Nested)
    }

    /// What should currently be displayed
    pub fn view(&self) -> View<'_> {
        if self.viewing_archived {
            return View::Archive(&self.archived);
        }
        match self.current_list() {
            Some(list) => View::List(list),
            None => View::Empty,
        }
    }

    // ------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------

    /// Append a new list and select it. A blank name gets the fallback name.
    pub fn create_list(&mut self, name: &str) -> &List {
        let name = match name.trim() {
            "" => self.settings.fallback_list_name.clone(),
            trimmed => trimmed.to_string(),
        };
        let id = self.fresh_id(LIST_PREFIX);
        debug!(list_id = %id, name = %name, "create list");

        let list = List::new(id.clone(), name, self.settings.default_emoji.clone());
        self.lists.push(list);
        self.current_list_id = Some(id);
        self.viewing_archived = false;
        &self.lists[self.lists.len() - 1]
    }

    /// Rename a list. Returns `Ok(false)` and keeps the old name when the new one is blank.
    pub fn rename_list(&mut self, list_id: &str, new_name: &str) -> Result<bool, TodoError> {
        let list = self.list_mut(list_id)?;
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }
        debug!(list_id, from = %list.name, to = trimmed, "rename list");
        list.name = trimmed.to_string();
        Ok(true)
    }

    /// Delete a list, its tasks, and archive entries that came from it.
    /// Unknown IDs are ignored (returns false).
    pub fn delete_list(&mut self, list_id: &str) -> bool {
        let Some(index) = self.list_index(list_id) else {
            return false;
        };

        let removed = self.lists.remove(index);
        let archived_before = self.archived.len();
        self.archived
            .retain(|t| t.list_id.as_deref() != Some(list_id));
        debug!(
            list_id,
            tasks = removed.tasks.len(),
            archived = archived_before - self.archived.len(),
            "delete list"
        );

        if self.current_list_id.as_deref() == Some(list_id) {
            self.current_list_id = self.lists.first().map(|l| l.id.clone());
        }
        true
    }

    /// Replace a list's emoji
    pub fn set_emoji(&mut self, list_id: &str, emoji: &str) -> Result<(), TodoError> {
        self.list_mut(list_id)?.emoji = emoji.to_string();
        Ok(())
    }

    /// Select a list and leave the archive view
    pub fn select_list(&mut self, list_id: &str) -> Result<(), TodoError> {
        if self.list_index(list_id).is_none() {
            return Err(TodoError::ListNotFound(list_id.to_string()));
        }
        self.current_list_id = Some(list_id.to_string());
        self.viewing_archived = false;
        Ok(())
    }

    /// Switch to the archive view (the selected list is kept)
    pub fn view_archive(&mut self) {
        self.viewing_archived = true;
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// Add a task to the front of a list
    pub fn add_task(&mut self, list_id: &str, text: &str) -> Result<&Task, TodoError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TodoError::EmptyText);
        }
        let index = self
            .list_index(list_id)
            .ok_or_else(|| TodoError::ListNotFound(list_id.to_string()))?;

        let id = self.fresh_id(TASK_PREFIX);
        debug!(task_id = %id, list_id, "add task");
        let list = &mut self.lists[index];
        list.tasks
            .insert(0, Task::new(id, text.to_string(), list.id.clone()));
        Ok(&list.tasks[0])
    }

    /// Add a task to the selected list
    pub fn add_task_to_current(&mut self, text: &str) -> Result<&Task, TodoError> {
        if text.trim().is_empty() {
            return Err(TodoError::EmptyText);
        }
        let list_id = self
            .current_list()
            .map(|l| l.id.clone())
            .ok_or(TodoError::NoListSelected)?;
        self.add_task(&list_id, text)
    }

    /// Append a subtask to any task (top-level or nested, live or archived)
    pub fn add_subtask(&mut self, parent_task_id: &str, text: &str) -> Result<&Task, TodoError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TodoError::EmptyText);
        }
        if self.task(parent_task_id).is_none() {
            return Err(TodoError::TaskNotFound(parent_task_id.to_string()));
        }

        let id = self.fresh_id(SUBTASK_PREFIX);
        debug!(subtask_id = %id, parent_task_id, "add subtask");
        let parent = self
            .task_mut(parent_task_id)
            .ok_or_else(|| TodoError::TaskNotFound(parent_task_id.to_string()))?;
        parent.add_subtask(Task::new_subtask(id, text.to_string()));
        let last = parent.subtasks.len() - 1;
        Ok(&parent.subtasks[last])
    }

    /// Set a task's done flag, moving top-level tasks in and out of the archive
    pub fn set_done(&mut self, task_id: &str, done: bool) -> Result<Transition, TodoError> {
        let location = self
            .locate(task_id)
            .ok_or_else(|| TodoError::TaskNotFound(task_id.to_string()))?;

        let transition = match location {
            Location::Active { list, index } => {
                if !done || self.is_archived(task_id) {
                    self.lists[list].tasks[index].done = done;
                    Transition::Flagged
                } else {
                    let mut task = self.lists[list].tasks.remove(index);
                    task.done = true;
                    task.list_id = Some(self.lists[list].id.clone());
                    self.archived.insert(0, task);
                    Transition::Archived
                }
            }
            Location::Archived { index } => {
                if done {
                    self.archived[index].done = true;
                    Transition::Flagged
                } else {
                    let mut task = self.archived.remove(index);
                    task.done = false;
                    let target = task.list_id.as_deref().and_then(|id| self.list_index(id));
                    match target {
                        Some(list) => {
                            self.lists[list].tasks.insert(0, task);
                            Transition::Restored
                        }
                        None => {
                            warn!(task_id, list_id = ?task.list_id, "origin list is gone, dropping archived task");
                            Transition::Dropped
                        }
                    }
                }
            }
            Location::Nested => {
                if let Some(task) = self.task_mut(task_id) {
                    task.done = done;
                }
                Transition::Flagged
            }
        };

        debug!(task_id, done, ?transition, "set done");
        Ok(transition)
    }

    /// Replace a task's text. Blank text deletes the task instead.
    pub fn edit_task_text(&mut self, task_id: &str, new_text: &str) -> Result<Edit, TodoError> {
        let trimmed = new_text.trim();
        if trimmed.is_empty() {
            return if self.delete_task(task_id) {
                Ok(Edit::Deleted)
            } else {
                Err(TodoError::TaskNotFound(task_id.to_string()))
            };
        }

        let task = self
            .task_mut(task_id)
            .ok_or_else(|| TodoError::TaskNotFound(task_id.to_string()))?;
        task.text = trimmed.to_string();
        Ok(Edit::Updated)
    }

    /// Delete a task wherever it lives. Top-level tasks are also removed from
    /// the archive. Unknown IDs are ignored (returns false).
    pub fn delete_task(&mut self, task_id: &str) -> bool {
        let deleted = match self.locate(task_id) {
            Some(Location::Active { list, index }) => {
                self.lists[list].tasks.remove(index);
                self.archived.retain(|t| t.id != task_id);
                true
            }
            Some(Location::Archived { index }) => {
                self.archived.remove(index);
                true
            }
            Some(Location::Nested) => self.remove_nested_anywhere(task_id).is_some(),
            None => false,
        };
        if deleted {
            debug!(task_id, "delete task");
        }
        deleted
    }

    fn remove_nested_anywhere(&mut self, subtask_id: &str) -> Option<Task> {
        for list in self.lists.iter_mut() {
            if let Some(task) = remove_nested(&mut list.tasks, subtask_id) {
                return Some(task);
            }
        }
        remove_nested(&mut self.archived, subtask_id)
    }

    /// Remove a direct subtask of `parent_task_id`; anything else is ignored
    pub fn delete_subtask(&mut self, parent_task_id: &str, subtask_id: &str) -> bool {
        self.task_mut(parent_task_id)
            .and_then(|parent| parent.remove_subtask(subtask_id))
            .is_some()
    }

    /// Remove the done top-level tasks of a list. Returns how many were removed.
    pub fn clear_completed(&mut self, list_id: &str) -> Result<usize, TodoError> {
        let list = self.list_mut(list_id)?;
        let before = list.tasks.len();
        list.tasks.retain(|t| !t.done);
        let removed = before - list.tasks.len();
        debug!(list_id, removed, "clear completed");
        Ok(removed)
    }

    /// [`AppState::clear_completed`] on the selected list; nothing happens without one
    pub fn clear_completed_current(&mut self) -> usize {
        match self.current_list_id.clone() {
            Some(list_id) => self.clear_completed(&list_id).unwrap_or(0),
            None => 0,
        }
    }

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    /// Fix references a hand-edited or stale payload may break.
    /// Returns true when anything changed.
    pub fn repair(&mut self) -> bool {
        let mut changed = false;

        if self.current_list_id.is_some() && self.current_list().is_none() {
            warn!(list_id = ?self.current_list_id, "selected list does not exist");
            self.current_list_id = self.lists.first().map(|l| l.id.clone());
            changed = true;
        }

        for list in &mut self.lists {
            for task in &mut list.tasks {
                if task.list_id.as_deref() != Some(list.id.as_str()) {
                    task.list_id = Some(list.id.clone());
                    changed = true;
                }
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_app() -> AppState {
        AppState::with_default_list(Settings::default(), IdGenerator::sequential())
    }

    fn inbox_id(app: &AppState) -> String {
        app.lists[0].id.clone()
    }

    #[test]
    fn test_default_state() {
        let app = create_test_app();
        assert_eq!(app.lists.len(), 1);
        assert_eq!(app.lists[0].name, "Inbox");
        assert_eq!(app.lists[0].emoji, "📌");
        assert_eq!(app.current_list_id.as_deref(), Some("l_1"));
        assert!(app.archived.is_empty());
        assert!(!app.viewing_archived);
    }

    #[test]
    fn test_create_list_selects_and_trims() {
        let mut app = create_test_app();
        app.view_archive();

        let id = app.create_list("  Work  ").id.clone();
        assert_eq!(app.list(&id).unwrap().name, "Work");
        assert_eq!(app.current_list_id.as_deref(), Some(id.as_str()));
        assert!(!app.viewing_archived);
    }

    #[test]
    fn test_create_list_blank_name_uses_fallback() {
        let mut app = create_test_app();
        let list = app.create_list("   ");
        assert_eq!(list.name, "List");
    }

    #[test]
    fn test_rename_list() {
        let mut app = create_test_app();
        let id = inbox_id(&app);

        assert_eq!(app.rename_list(&id, " Home "), Ok(true));
        assert_eq!(app.lists[0].name, "Home");

        assert_eq!(app.rename_list(&id, "   "), Ok(false));
        assert_eq!(app.lists[0].name, "Home");

        assert_eq!(
            app.rename_list("l_missing", "x"),
            Err(TodoError::ListNotFound("l_missing".to_string()))
        );
    }

    #[test]
    fn test_set_emoji_unconditional() {
        let mut app = create_test_app();
        let id = inbox_id(&app);
        app.set_emoji(&id, "not-an-emoji").unwrap();
        assert_eq!(app.lists[0].emoji, "not-an-emoji");
    }

    #[test]
    fn test_select_list_and_view_archive() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        app.create_list("Work");

        app.view_archive();
        assert!(app.viewing_archived);
        assert!(matches!(app.view(), View::Archive(_)));

        app.select_list(&inbox).unwrap();
        assert_eq!(app.current_list_id.as_deref(), Some(inbox.as_str()));
        assert!(!app.viewing_archived);
        assert!(matches!(app.view(), View::List(l) if l.id == inbox));

        assert!(app.select_list("l_missing").is_err());
        assert_eq!(app.current_list_id.as_deref(), Some(inbox.as_str()));
    }

    #[test]
    fn test_view_archive_keeps_current_list() {
        let mut app = create_test_app();
        app.view_archive();
        assert_eq!(app.current_list_id.as_deref(), Some("l_1"));
    }

    #[test]
    fn test_add_task_newest_first() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        app.add_task(&inbox, "First").unwrap();
        let task = app.add_task(&inbox, "  Second ").unwrap().clone();

        assert_eq!(task.text, "Second");
        assert!(!task.done);
        assert!(task.subtasks.is_empty());
        assert_eq!(task.list_id.as_deref(), Some(inbox.as_str()));

        let texts: Vec<&str> = app.lists[0].tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Second", "First"]);
    }

    #[test]
    fn test_add_task_validation() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);

        assert_eq!(app.add_task(&inbox, "   ").unwrap_err(), TodoError::EmptyText);
        assert_eq!(
            app.add_task("l_missing", "Task").unwrap_err(),
            TodoError::ListNotFound("l_missing".to_string())
        );
        assert!(app.lists[0].tasks.is_empty());
    }

    #[test]
    fn test_add_subtask_appends() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let parent = app.add_task(&inbox, "Parent").unwrap().id.clone();

        app.add_subtask(&parent, "One").unwrap();
        let two = app.add_subtask(&parent, "Two").unwrap().id.clone();
        assert!(two.starts_with("st_"));

        let nested = app.add_subtask(&two, "Deep").unwrap().clone();
        assert!(nested.list_id.is_none());

        let parent_task = app.task(&parent).unwrap();
        assert_eq!(parent_task.subtasks[0].text, "One");
        assert_eq!(parent_task.subtasks[1].text, "Two");
        assert_eq!(parent_task.subtasks[1].subtasks[0].text, "Deep");
    }

    #[test]
    fn test_add_subtask_validation() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let parent = app.add_task(&inbox, "Parent").unwrap().id.clone();

        assert_eq!(app.add_subtask(&parent, " ").unwrap_err(), TodoError::EmptyText);
        assert!(matches!(
            app.add_subtask("t_missing", "Child"),
            Err(TodoError::TaskNotFound(_))
        ));
        assert!(app.task(&parent).unwrap().subtasks.is_empty());
    }

    #[test]
    fn test_done_archives_and_undone_restores() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let id = app.add_task(&inbox, "Parent").unwrap().id.clone();
        app.add_subtask(&id, "Child").unwrap();
        let before = app.task(&id).unwrap().clone();

        assert_eq!(app.set_done(&id, true), Ok(Transition::Archived));
        assert!(app.lists[0].tasks.is_empty());
        assert_eq!(app.archived.len(), 1);
        assert!(app.archived[0].done);
        assert_eq!(app.archived[0].list_id.as_deref(), Some(inbox.as_str()));

        assert_eq!(app.set_done(&id, false), Ok(Transition::Restored));
        assert!(app.archived.is_empty());
        assert_eq!(app.lists[0].tasks, vec![before]);
    }

    #[test]
    fn test_archive_is_most_recent_first() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let a = app.add_task(&inbox, "A").unwrap().id.clone();
        let b = app.add_task(&inbox, "B").unwrap().id.clone();

        app.set_done(&a, true).unwrap();
        app.set_done(&b, true).unwrap();
        let ids: Vec<&str> = app.archived.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![b.as_str(), a.as_str()]);
    }

    #[test]
    fn test_archiving_is_idempotent() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let id = app.add_task(&inbox, "Once").unwrap().id.clone();

        app.set_done(&id, true).unwrap();
        assert_eq!(app.set_done(&id, true), Ok(Transition::Flagged));
        assert_eq!(app.archived.len(), 1);
    }

    #[test]
    fn test_archiving_guard_with_duplicate_live_copy() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let id = app.add_task(&inbox, "Dup").unwrap().id.clone();
        let copy = app.lists[0].tasks[0].clone();
        app.set_done(&id, true).unwrap();

        // A stale payload may hold the same task in both places
        app.lists[0].tasks.push(copy);
        assert_eq!(app.set_done(&id, true), Ok(Transition::Flagged));
        assert_eq!(app.archived.len(), 1);
    }

    #[test]
    fn test_restore_into_missing_list_drops_entry() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let id = app.add_task(&inbox, "Orphan").unwrap().id.clone();
        app.set_done(&id, true).unwrap();
        app.archived[0].list_id = Some("l_gone".to_string());

        assert_eq!(app.set_done(&id, false), Ok(Transition::Dropped));
        assert!(app.archived.is_empty());
        assert!(app.task(&id).is_none());
    }

    #[test]
    fn test_subtask_done_never_archives() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let parent = app.add_task(&inbox, "Parent").unwrap().id.clone();
        let child = app.add_subtask(&parent, "Child").unwrap().id.clone();

        assert_eq!(app.set_done(&child, true), Ok(Transition::Flagged));
        assert!(app.archived.is_empty());
        assert!(app.task(&child).unwrap().done);

        app.set_done(&child, false).unwrap();
        assert!(!app.task(&child).unwrap().done);
    }

    #[test]
    fn test_subtask_of_archived_task_can_be_toggled() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let parent = app.add_task(&inbox, "Parent").unwrap().id.clone();
        let child = app.add_subtask(&parent, "Child").unwrap().id.clone();
        app.set_done(&parent, true).unwrap();

        app.set_done(&child, true).unwrap();
        assert_eq!(app.archived.len(), 1);

        // Edits made while archived come back with the task
        app.set_done(&parent, false).unwrap();
        assert!(app.lists[0].tasks[0].subtasks[0].done);
    }

    #[test]
    fn test_set_done_unknown_task() {
        let mut app = create_test_app();
        assert_eq!(
            app.set_done("t_missing", true),
            Err(TodoError::TaskNotFound("t_missing".to_string()))
        );
    }

    #[test]
    fn test_edit_task_text() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let id = app.add_task(&inbox, "Old").unwrap().id.clone();

        assert_eq!(app.edit_task_text(&id, "  New "), Ok(Edit::Updated));
        assert_eq!(app.task(&id).unwrap().text, "New");
    }

    #[test]
    fn test_edit_to_blank_deletes_task() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let id = app.add_task(&inbox, "Doomed").unwrap().id.clone();

        assert_eq!(app.edit_task_text(&id, " \t "), Ok(Edit::Deleted));
        assert!(app.task(&id).is_none());
        assert!(app.lists[0].tasks.is_empty());

        assert!(app.edit_task_text(&id, "").is_err());
    }

    #[test]
    fn test_edit_nested_subtask_to_blank_deletes_it() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let parent = app.add_task(&inbox, "Parent").unwrap().id.clone();
        let child = app.add_subtask(&parent, "Child").unwrap().id.clone();
        let grandchild = app.add_subtask(&child, "Grandchild").unwrap().id.clone();

        assert_eq!(app.edit_task_text(&grandchild, ""), Ok(Edit::Deleted));
        assert!(app.task(&child).unwrap().subtasks.is_empty());
        assert_eq!(app.task(&parent).unwrap().subtasks.len(), 1);
    }

    #[test]
    fn test_delete_task_removes_from_list_and_archive() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let live = app.add_task(&inbox, "Live").unwrap().id.clone();
        let archived = app.add_task(&inbox, "Archived").unwrap().id.clone();
        app.set_done(&archived, true).unwrap();

        assert!(app.delete_task(&live));
        assert!(app.delete_task(&archived));
        assert!(app.lists[0].tasks.is_empty());
        assert!(app.archived.is_empty());

        // Unknown IDs are harmless
        assert!(!app.delete_task("t_missing"));
    }

    #[test]
    fn test_delete_subtask_direct_children_only() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let parent = app.add_task(&inbox, "Parent").unwrap().id.clone();
        let child = app.add_subtask(&parent, "Child").unwrap().id.clone();
        let grandchild = app.add_subtask(&child, "Grandchild").unwrap().id.clone();

        assert!(!app.delete_subtask(&parent, &grandchild));
        assert!(app.task(&grandchild).is_some());

        assert!(app.delete_subtask(&child, &grandchild));
        assert!(app.task(&grandchild).is_none());
        assert!(app.delete_subtask(&parent, &child));
        assert!(app.task(&parent).unwrap().subtasks.is_empty());
    }

    #[test]
    fn test_delete_list_cascades_to_archive() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let work = app.create_list("Work").id.clone();

        let keep = app.add_task(&inbox, "Keep").unwrap().id.clone();
        app.set_done(&keep, true).unwrap();
        let a = app.add_task(&work, "A").unwrap().id.clone();
        app.add_task(&work, "B").unwrap();
        app.set_done(&a, true).unwrap();

        assert!(app.delete_list(&work));
        assert!(app.list(&work).is_none());
        assert!(app.archived.iter().all(|t| t.list_id.as_deref() != Some(work.as_str())));
        assert_eq!(app.archived.len(), 1);
        assert_eq!(app.archived[0].id, keep);

        // Current list moved to the first remaining list
        assert_eq!(app.current_list_id.as_deref(), Some(inbox.as_str()));
    }

    #[test]
    fn test_delete_other_list_keeps_selection() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let work = app.create_list("Work").id.clone();

        app.delete_list(&inbox);
        assert_eq!(app.current_list_id.as_deref(), Some(work.as_str()));
        assert!(!app.delete_list("l_missing"));
    }

    #[test]
    fn test_delete_only_list_blocks_add_to_current() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        app.delete_list(&inbox);

        assert!(app.current_list_id.is_none());
        assert!(matches!(app.view(), View::Empty));
        assert_eq!(
            app.add_task_to_current("Task").unwrap_err(),
            TodoError::NoListSelected
        );
    }

    #[test]
    fn test_clear_completed() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let parent = app.add_task(&inbox, "Parent").unwrap().id.clone();
        let child = app.add_subtask(&parent, "Child").unwrap().id.clone();
        app.set_done(&child, true).unwrap();
        let stale = app.add_task(&inbox, "Stale").unwrap().id.clone();
        app.task_mut(&stale).unwrap().done = true;
        let archived = app.add_task(&inbox, "Archived").unwrap().id.clone();
        app.set_done(&archived, true).unwrap();

        assert_eq!(app.clear_completed(&inbox), Ok(1));
        assert_eq!(app.lists[0].tasks.len(), 1);
        // Subtask flags and the archive are untouched
        assert!(app.task(&child).unwrap().done);
        assert_eq!(app.archived.len(), 1);
    }

    #[test]
    fn test_clear_completed_current_without_list() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        app.delete_list(&inbox);
        assert_eq!(app.clear_completed_current(), 0);
    }

    #[test]
    fn test_ids_unique_across_state() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let parent = app.add_task(&inbox, "Parent").unwrap().id.clone();
        app.add_subtask(&parent, "Child").unwrap();
        app.set_done(&parent, true).unwrap();

        // A generator restarted from 1 must still skip used IDs
        app = app.with_ids(IdGenerator::sequential());
        assert!(app.contains_id("l_1"));
        assert_eq!(app.fresh_id(LIST_PREFIX), "l_2");
    }

    #[test]
    fn test_repair_dangling_references() {
        let mut app = create_test_app();
        let inbox = inbox_id(&app);
        let id = app.add_task(&inbox, "Task").unwrap().id.clone();
        app.task_mut(&id).unwrap().list_id = None;
        app.current_list_id = Some("l_gone".to_string());

        assert!(app.repair());
        assert_eq!(app.current_list_id.as_deref(), Some(inbox.as_str()));
        assert_eq!(app.task(&id).unwrap().list_id.as_deref(), Some(inbox.as_str()));
        assert!(!app.repair());
    }
}
