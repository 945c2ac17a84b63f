/// Recoverable failure of a state mutation. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    #[error("text is empty")]
    EmptyText,
    #[error("list not found: {0}")]
    ListNotFound(String),
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("no list selected")]
    NoListSelected,
}
