//! In-memory collection of discovered migration scripts.

use crate::error::{CoreError, Result};
use crate::script::Script;

/// Holds the set of migration scripts awaiting reconciliation and
/// application.
///
/// Script names are unique within a repository. The two removal forms
/// deliberately carry different miss policies:
///
/// - [`remove_named`](Self::remove_named) is a hard error when the name is
///   absent,
/// - [`remove`](Self::remove) is a silent no-op when the script is absent
///   (set-style "remove if present").
///
/// The engine prunes this repository during reconciliation, so after a
/// `needs_updating` call its contents represent exactly the work remaining.
///
/// # Examples
///
/// ```
/// use script_migrate_core::{Script, ScriptRepository};
///
/// let mut repo = ScriptRepository::new();
/// repo.add(Script::new("001_init.sql", "CREATE TABLE a (id INTEGER);"));
/// repo.add(Script::new("002_cols.sql", "ALTER TABLE a ADD name TEXT;"));
/// assert_eq!(repo.len(), 2);
///
/// repo.remove_named("001_init.sql").unwrap();
/// assert!(!repo.contains("001_init.sql"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptRepository {
    scripts: Vec<Script>,
}

impl ScriptRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a script unless one with the same name already exists.
    ///
    /// A duplicate name is a silent no-op: the original content is kept,
    /// never overwritten.
    pub fn add(&mut self, script: Script) {
        if !self.contains(&script.name) {
            self.scripts.push(script);
        }
    }

    /// Removes the given script if present.
    ///
    /// Removing a script that is not in the repository is a no-op.
    pub fn remove(&mut self, script: &Script) {
        self.scripts.retain(|s| s != script);
    }

    /// Removes and returns the script with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ScriptNotFound`] if no script with that name
    /// exists.
    pub fn remove_named(&mut self, name: &str) -> Result<Script> {
        match self.scripts.iter().position(|s| s.name == name) {
            Some(idx) => Ok(self.scripts.remove(idx)),
            None => Err(CoreError::ScriptNotFound(name.to_string())),
        }
    }

    /// Returns whether a script with the given name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.scripts.iter().any(|s| s.name == name)
    }

    /// Returns a snapshot copy of the current scripts.
    ///
    /// Mutating the returned vector does not affect the repository.
    pub fn scripts(&self) -> Vec<Script> {
        self.scripts.clone()
    }

    /// Number of scripts currently held.
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Returns whether the repository holds no scripts.
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl FromIterator<Script> for ScriptRepository {
    fn from_iter<I: IntoIterator<Item = Script>>(iter: I) -> Self {
        let mut repo = Self::new();
        for script in iter {
            repo.add(script);
        }
        repo
    }
}
