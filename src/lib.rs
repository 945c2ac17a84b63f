//! A small to-do list manager: named lists of tasks with nested subtasks,
//! an archive for completed tasks, and JSON persistence in a key-value store.

pub mod app;
pub mod domain;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod session;

pub use app::{AppState, Edit, Transition, View};
pub use error::TodoError;
pub use session::Session;
