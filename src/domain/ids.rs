use uuid::Uuid;

/// Prefix for list IDs
pub const LIST_PREFIX: &str = "l";
/// Prefix for top-level task IDs
pub const TASK_PREFIX: &str = "t";
/// Prefix for subtask IDs
pub const SUBTASK_PREFIX: &str = "st";

/// Length of the random suffix taken from a v4 UUID
const RANDOM_SUFFIX_LEN: usize = 8;

/// Source of `<prefix>_<suffix>` identifiers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdGenerator {
    /// Short suffix cut from a random v4 UUID
    #[default]
    Random,
    /// Monotonic counter, for deterministic output
    Sequential { next: u64 },
}

impl IdGenerator {
    /// Sequential generator starting at 1
    pub fn sequential() -> Self {
        Self::Sequential { next: 1 }
    }

    /// Produce the next identifier with the given prefix
    pub fn generate(&mut self, prefix: &str) -> String {
        match self {
            Self::Random => {
                let uuid = Uuid::new_v4().simple().to_string();
                format!("{}_{}", prefix, &uuid[..RANDOM_SUFFIX_LEN])
            }
            Self::Sequential { next } => {
                let id = format!("{}_{}", prefix, next);
                *next += 1;
                id
            }
        }
    }
}
