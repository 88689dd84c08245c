// changeset.rs — Proposed complete new contents for a set of files.
//
// A ChangeSet is the engine's output and the unit the retry loop
// validates. Files carry complete replacement content, not diffs — the
// model regenerates whole files, and whole files are what the workspace
// writes to disk.

use serde::{Deserialize, Serialize};

/// One file's path and full content.
///
/// Used both to describe current repository state and proposed new state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileSnapshot {
    /// Repository-root-relative path, forward-slash normalized.
    pub path: String,

    /// Complete file content.
    pub content: String,

    /// Whether the file currently exists. `false` signals "to be created".
    #[serde(default = "default_exists")]
    pub exists: bool,
}

fn default_exists() -> bool {
    true
}

impl FileSnapshot {
    /// Snapshot of an existing file.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            exists: true,
        }
    }

    /// Snapshot of a file that does not exist yet.
    pub fn created(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            exists: false,
        }
    }
}

/// Platform-agnostic representation of changes to make.
///
/// The accepted ChangeSet is handed back to the caller, who turns it
/// into a real-world side effect (local file writes, a pull request).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeSet {
    /// Brief summary of the changes.
    pub summary: String,

    /// Detailed description of the changes.
    pub description: String,

    /// Complete file contents after changes, one entry per touched file.
    pub files: Vec<FileSnapshot>,

    /// Suggested branch name. May be empty.
    #[serde(default)]
    pub branch_name: String,

    /// Optional test command suggested by the model for validating these
    /// changes. The engine runs its configured harness regardless; this
    /// is surfaced to the operator.
    #[serde(default)]
    pub test_command: Option<String>,
}

impl ChangeSet {
    /// True when the changeset proposes no file changes at all.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths of all touched files, in changeset order.
    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exists_defaults_to_true() {
        let snap: FileSnapshot =
            serde_json::from_str(r#"{"path": "a.txt", "content": "x"}"#).unwrap();
        assert!(snap.exists);
    }

    #[test]
    fn created_snapshot_marks_nonexistent() {
        let snap = FileSnapshot::created("new.rs", "pub fn f() {}");
        assert!(!snap.exists);
    }

    #[test]
    fn changeset_deserializes_from_model_output() {
        let json = r#"{
            "summary": "Fix login",
            "description": "Return the token instead of None",
            "files": [{"path": "auth.py", "content": "def login(): return True"}],
            "branch_name": "mend/fix-login"
        }"#;
        let cs: ChangeSet = serde_json::from_str(json).unwrap();
        assert!(!cs.is_empty());
        assert_eq!(cs.paths(), vec!["auth.py"]);
        assert!(cs.test_command.is_none());
    }

    #[test]
    fn empty_changeset_detected() {
        let cs = ChangeSet {
            summary: "nothing".into(),
            description: String::new(),
            files: Vec::new(),
            branch_name: String::new(),
            test_command: None,
        };
        assert!(cs.is_empty());
    }
}
