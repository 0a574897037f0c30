//! The migration script value type.

use serde::{Deserialize, Serialize};

/// A named unit of SQL changes to be applied once.
///
/// The `name` is the script's unique identifier within a repository and
/// doubles as its history-table key once applied. Names are expected to
/// carry a sortable prefix (zero-padded sequence number or ISO timestamp),
/// since pending scripts are applied in ascending name order.
///
/// Content is immutable once the script is constructed.
///
/// # Examples
///
/// ```
/// use script_migrate_core::Script;
///
/// let script = Script::new("001_init.sql", "CREATE TABLE users (id INTEGER);");
/// assert_eq!(script.name, "001_init.sql");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Unique identifier, typically the source file name.
    pub name: String,
    /// Raw SQL text.
    pub content: String,
}

impl Script {
    /// Creates a script from a name and raw SQL content.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_string_and_str() {
        let a = Script::new("001.sql", "SELECT 1;");
        let b = Script::new("001.sql".to_string(), "SELECT 1;".to_string());
        assert_eq!(a, b);
    }
}
