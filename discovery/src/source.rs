//! Loading migration scripts from a directory or static pairs.

use std::path::{Path, PathBuf};

use script_migrate_core::{Script, ScriptRepository};
use tracing::debug;

use crate::error::{DiscoveryError, Result};

/// Describes where a [`ScriptSet`] was loaded from.
#[derive(Debug, Clone)]
pub enum ScriptOrigin {
    /// Loaded from a directory of `.sql` files.
    Directory(PathBuf),
    /// Built from in-memory (name, content) pairs.
    Static,
}

/// An ordered collection of migration scripts loaded from a source.
///
/// This is the supplier side of the migration pipeline: it turns raw
/// script text into [`Script`] values, which are then handed to the engine
/// via [`into_repository`](Self::into_repository).
///
/// # Examples
///
/// ```no_run
/// use script_migrate_discovery::ScriptSet;
///
/// let set = ScriptSet::from_dir("migrations/").unwrap();
/// println!("found {} scripts", set.len());
///
/// let repo = set.into_repository();
/// ```
#[derive(Debug)]
pub struct ScriptSet {
    scripts: Vec<Script>,
    origin: ScriptOrigin,
}

impl ScriptSet {
    /// Loads every `.sql` file in the given directory.
    ///
    /// The extension match is ASCII case-insensitive (`.sql`, `.SQL`, …).
    /// Each script's name is its file name and its content is the file
    /// text with surrounding whitespace trimmed. Subdirectories are not
    /// descended into.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NotADirectory`] if the path is not a
    /// directory, or [`DiscoveryError::Io`] if the directory or any
    /// matching file cannot be read.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(DiscoveryError::NotADirectory(path.to_path_buf()));
        }

        let mut scripts = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let file_path = entry.path();
            let is_sql = file_path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("sql"));
            if !is_sql || !file_path.is_file() {
                continue;
            }

            let Some(name) = file_path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let content = std::fs::read_to_string(&file_path)?;
            debug!(script = %name, bytes = content.len(), "Loaded migration script");
            scripts.push(Script::new(name, content.trim()));
        }

        // read_dir order is platform-dependent; sort for deterministic
        // loading (the engine re-sorts before applying regardless).
        scripts.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            scripts,
            origin: ScriptOrigin::Directory(path.to_path_buf()),
        })
    }

    /// Builds a script set from in-memory (name, content) pairs.
    ///
    /// Useful for scripts embedded in the binary or generated at runtime.
    /// Content is trimmed the same way as for directory loading.
    pub fn from_pairs<N, C>(pairs: impl IntoIterator<Item = (N, C)>) -> Self
    where
        N: Into<String>,
        C: AsRef<str>,
    {
        let scripts = pairs
            .into_iter()
            .map(|(name, content)| Script::new(name, content.as_ref().trim()))
            .collect();
        Self {
            scripts,
            origin: ScriptOrigin::Static,
        }
    }

    /// Converts the set into a [`ScriptRepository`].
    ///
    /// Duplicate names follow repository add semantics: the first
    /// occurrence wins.
    pub fn into_repository(self) -> ScriptRepository {
        self.scripts.into_iter().collect()
    }

    /// Where this set was loaded from.
    pub fn origin(&self) -> &ScriptOrigin {
        &self.origin
    }

    /// Names of the loaded scripts, in load order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scripts.iter().map(|s| s.name.as_str())
    }

    /// Number of loaded scripts.
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Returns whether no scripts were loaded.
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_dir_loads_sql_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("001_init.sql"), "CREATE TABLE a (id int);").unwrap();
        fs::write(dir.path().join("002_cols.SQL"), "ALTER TABLE a ADD x int;").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a script").unwrap();

        let set = ScriptSet::from_dir(dir.path()).unwrap();
        let names: Vec<_> = set.names().collect();
        assert_eq!(names, vec!["001_init.sql", "002_cols.SQL"]);
    }

    #[test]
    fn test_from_dir_trims_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("001.sql"), "\n  SELECT 1;  \n").unwrap();

        let set = ScriptSet::from_dir(dir.path()).unwrap();
        let repo = set.into_repository();
        assert_eq!(repo.scripts()[0].content, "SELECT 1;");
    }

    #[test]
    fn test_from_dir_missing_path_is_error() {
        let err = ScriptSet::from_dir("/definitely/not/here").unwrap_err();
        assert!(matches!(err, DiscoveryError::NotADirectory(_)));
    }

    #[test]
    fn test_from_pairs_and_into_repository() {
        let set = ScriptSet::from_pairs([
            ("001.sql", "SELECT 1;"),
            ("002.sql", "SELECT 2;"),
            ("001.sql", "SELECT 99;"),
        ]);
        assert!(matches!(set.origin(), ScriptOrigin::Static));

        let repo = set.into_repository();
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.scripts()[0].content, "SELECT 1;");
    }

    #[test]
    fn test_empty_dir_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let set = ScriptSet::from_dir(dir.path()).unwrap();
        assert!(set.is_empty());
    }
}
