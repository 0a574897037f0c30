//! Discovery and loading of SQL migration scripts.
//!
//! This crate is the supplier of named script bodies for the migration
//! engine. [`ScriptSet`] loads `.sql` files from a directory (or accepts
//! static (name, content) pairs) and converts them into a
//! [`ScriptRepository`](script_migrate_core::ScriptRepository) ready for
//! reconciliation.
//!
//! # Example
//!
//! ```no_run
//! use script_migrate_discovery::ScriptSet;
//!
//! let repo = ScriptSet::from_dir("migrations/").unwrap().into_repository();
//! assert!(!repo.is_empty());
//! ```

mod error;
mod source;

pub use error::{DiscoveryError, Result};
pub use source::{ScriptOrigin, ScriptSet};
