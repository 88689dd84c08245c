// repo.rs — Abstract repository snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// In-memory snapshot of a repository's relevant files.
///
/// `files` maps repository-root-relative, forward-slash paths to full
/// file contents. The snapshot is not necessarily the whole physical
/// repository — a platform adapter may supply only the subset relevant
/// to the goal.
///
/// A `BTreeMap` keeps both maps ordered by key, so every textual
/// rendering of a Repo is deterministic without an extra sort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repo {
    /// Repository name or identifier. The workspace manager uses this to
    /// decide whether an existing sandbox can be reused.
    pub name: String,

    /// Relative file path → complete content.
    pub files: BTreeMap<String, String>,

    /// Free-form metadata (platform, source path, etc.).
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Repo {
    /// Create an empty repository snapshot.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Insert a file and return self (builder pattern, mostly for tests).
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Insert a metadata entry and return self.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
