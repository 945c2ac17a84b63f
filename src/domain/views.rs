use super::task::Task;

/// A flattened row for rendering a task tree
#[derive(Debug, Clone)]
pub struct FlatRow<'a> {
    /// Depth in the tree (0 = top-level task)
    pub depth: usize,
    /// Whether this is the last child of its parent
    pub is_last: bool,
    /// Tree connectors of each ancestor level, for drawing guides
    pub ancestors_last: Vec<bool>,
    pub task: &'a Task,
}

/// Flatten a task tree depth-first into a linear list for rendering
pub fn flatten_tasks(tasks: &[Task]) -> Vec<FlatRow<'_>> {
    let mut rows = Vec::new();
    push_rows(tasks, 0, &mut Vec::new(), &mut rows);
    rows
}

fn push_rows<'a>(
    tasks: &'a [Task],
    depth: usize,
    ancestors_last: &mut Vec<bool>,
    rows: &mut Vec<FlatRow<'a>>,
) {
    let count = tasks.len();
    for (idx, task) in tasks.iter().enumerate() {
        let is_last = idx + 1 == count;
        rows.push(FlatRow {
            depth,
            is_last,
            ancestors_last: ancestors_last.clone(),
            task,
        });

        if !task.subtasks.is_empty() {
            // Top-level tasks don't draw a guide column
            if depth > 0 {
                ancestors_last.push(is_last);
            }
            push_rows(&task.subtasks, depth + 1, ancestors_last, rows);
            if depth > 0 {
                ancestors_last.pop();
            }
        }
    }
}

/// Get tree connector for subtasks
pub fn tree_connector(is_last: bool) -> &'static str {
    if is_last {
        "└─"
    } else {
        "├─"
    }
}

/// Checkbox for a task's done flag
pub fn checkbox(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Render one row as a line of text (without trailing newline)
pub fn render_row(row: &FlatRow<'_>) -> String {
    let mut line = String::new();
    if row.depth > 0 {
        for &last in &row.ancestors_last {
            line.push_str(if last { "   " } else { "│  " });
        }
        line.push_str(tree_connector(row.is_last));
        line.push(' ');
    }
    line.push_str(&format!("{} {}  ({})", checkbox(row.task.done), row.task.text, row.task.id));
    line
}

/// Render a whole task tree, one task per line
pub fn render_tasks(tasks: &[Task]) -> String {
    flatten_tasks(tasks)
        .iter()
        .map(|row| render_row(row) + "\n")
        .collect()
}
