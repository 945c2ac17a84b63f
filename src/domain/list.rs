use super::task::{null_as_default, Task};
use serde::{Deserialize, Deserializer, Serialize};

/// Emoji given to new lists and to stored lists missing one
pub const DEFAULT_EMOJI: &str = "📌";

/// Emoji palette offered when picking a list emoji
pub const POPULAR_EMOJIS: &[&str] = &[
    "👨‍💼", "👮", "🔒", "📌", "🚨", "⭐", "🪙", "💵", "📂", "💼", "✒️", "📈", "⚖️", "✈️",
    "📚", "👥", "🗓️", "📦", "🍌", "🏚️", "🏢", "🏨", "🏦", "💧", "🚰", "💡", "🌱",
];

fn default_emoji() -> String {
    DEFAULT_EMOJI.to_string()
}

fn emoji_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_emoji))
}

/// A named, emoji-tagged list of top-level tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
    #[serde(default = "default_emoji", deserialize_with = "emoji_or_default")]
    pub emoji: String,
    /// Top-level tasks, newest first
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Task>,
}

impl List {
    pub fn new(id: String, name: String, emoji: String) -> Self {
        Self {
            id,
            name,
            emoji,
            tasks: Vec::new(),
        }
    }

    /// Index of a top-level task
    pub fn position(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    /// Number of open (not done) top-level tasks
    pub fn open_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.done).count()
    }

    /// Heading shown above the list's tasks
    pub fn title(&self) -> String {
        format!("{} {}", self.emoji, self.name)
    }
}
