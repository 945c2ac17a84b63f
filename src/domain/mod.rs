pub mod ids;
pub mod list;
pub mod task;
pub mod views;

pub use ids::{IdGenerator, LIST_PREFIX, SUBTASK_PREFIX, TASK_PREFIX};
pub use list::{List, DEFAULT_EMOJI, POPULAR_EMOJIS};
pub(crate) use task::null_as_default;
pub use task::{find_parent_task, find_parent_task_mut, find_task, find_task_mut, remove_nested, Task};
pub use views::{checkbox, flatten_tasks, render_tasks, tree_connector, FlatRow};
