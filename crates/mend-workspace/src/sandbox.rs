// sandbox.rs — Persistent sandbox directory mirroring a logical Repo.
//
// Key design:
// - One workspace instance owns one temporary directory, exclusively
// - Full materialization happens once; afterwards only deltas are written
// - Applying a candidate changeset is a transient overlay: tracked state
//   is NOT updated, so the next synchronize against the original repo
//   snapshot erases the overlay
// - Teardown never raises: cleanup must not block the caller

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use mend_model::{ChangeSet, Repo};
use tracing::{debug, warn};

use crate::error::WorkspaceError;

/// A persistent on-disk sandbox mirroring a logical repository.
///
/// Reusing one directory across retry attempts avoids re-materializing
/// the full repository when only a few files differ per attempt — the
/// dominant cost in repositories with many unchanged files.
#[derive(Debug, Default)]
pub struct Workspace {
    /// Sandbox root. `None` until `initialize` succeeds.
    root: Option<PathBuf>,

    /// What the sandbox currently reflects, path → content.
    tracked: BTreeMap<String, String>,

    /// Name of the logical repo the sandbox mirrors.
    source: String,

    initialized: bool,
}

impl Workspace {
    /// Create an empty, uninitialized workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The sandbox root directory, if initialized.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Whether the workspace has been initialized and not torn down.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Guarantee a usable workspace mirroring `repo`.
    ///
    /// Performs a full teardown-then-initialize when no workspace exists,
    /// the root vanished from disk, or the tracked repository identity
    /// differs from `repo.name`. Otherwise synchronizes incrementally.
    pub fn ensure_ready(&mut self, repo: &Repo) -> Result<(), WorkspaceError> {
        let needs_init = !self.initialized
            || self.root.as_ref().is_none_or(|r| !r.exists())
            || self.source != repo.name;

        if needs_init {
            self.teardown();
            self.initialize(repo)
        } else {
            self.synchronize(repo)
        }
    }

    /// Allocate a fresh uniquely named directory and write every file in
    /// `repo.files` under it.
    ///
    /// On any failure the partially created directory is torn down before
    /// the error propagates; the workspace is never left half-initialized.
    pub fn initialize(&mut self, repo: &Repo) -> Result<(), WorkspaceError> {
        let dir = tempfile::Builder::new()
            .prefix("mend-workspace-")
            .tempdir()
            .map_err(|source| WorkspaceError::Io {
                path: std::env::temp_dir(),
                source,
            })?;
        // The workspace owns the directory's lifecycle from here on.
        self.root = Some(dir.keep());

        for (path, content) in &repo.files {
            if let Err(err) = self.write_relative(path, content) {
                self.teardown();
                return Err(err);
            }
        }

        self.tracked = repo.files.clone();
        self.source = repo.name.clone();
        self.initialized = true;

        debug!(
            root = %self.root.as_ref().map(|r| r.display().to_string()).unwrap_or_default(),
            files = repo.files.len(),
            "initialized workspace"
        );
        Ok(())
    }

    /// Incrementally bring the sandbox in line with `repo.files`.
    ///
    /// Writes files that are new or whose content differs from the tracked
    /// state, deletes files the repo no longer contains, then records
    /// `repo.files` as the new tracked state. A second call with the same
    /// repo performs no writes at all.
    pub fn synchronize(&mut self, repo: &Repo) -> Result<(), WorkspaceError> {
        if !self.initialized {
            return Err(WorkspaceError::NotInitialized);
        }

        let mut changed = 0usize;

        for (path, content) in &repo.files {
            if self.tracked.get(path) != Some(content) {
                self.write_relative(path, content)?;
                changed += 1;
            }
        }

        for path in self.tracked.keys() {
            if !repo.files.contains_key(path) {
                let full = self.resolve(path)?;
                if full.exists() {
                    fs::remove_file(&full).map_err(|source| WorkspaceError::Io {
                        path: full,
                        source,
                    })?;
                    changed += 1;
                }
            }
        }

        self.tracked = repo.files.clone();

        if changed > 0 {
            debug!(changed, "synchronized workspace");
        }
        Ok(())
    }

    /// Overlay a candidate changeset onto the sandbox.
    ///
    /// Each file is compared against its current on-disk content (absent
    /// files count as empty) and written only when different. Tracked
    /// state is deliberately not updated: the overlay is transient, and
    /// the next `ensure_ready` with the original repo snapshot will
    /// synchronize it away.
    pub fn apply(&self, changeset: &ChangeSet) -> Result<(), WorkspaceError> {
        if !self.initialized {
            return Err(WorkspaceError::NotInitialized);
        }

        let mut applied = 0usize;

        for file in &changeset.files {
            let full = self.resolve(&file.path)?;
            let current = match fs::read_to_string(&full) {
                Ok(content) => content,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
                Err(source) => return Err(WorkspaceError::Io { path: full, source }),
            };

            if current != file.content {
                self.write_relative(&file.path, &file.content)?;
                applied += 1;
            }
        }

        if applied > 0 {
            debug!(applied, "applied changeset overlay");
        }
        Ok(())
    }

    /// Remove the sandbox directory and reset all tracked state.
    ///
    /// Removal errors are logged and swallowed: cleanup must never block
    /// the caller. State is reset unconditionally.
    pub fn teardown(&mut self) {
        if let Some(root) = self.root.take() {
            if root.exists() {
                match fs::remove_dir_all(&root) {
                    Ok(()) => debug!(root = %root.display(), "removed workspace"),
                    Err(err) => {
                        warn!(root = %root.display(), %err, "failed to remove workspace")
                    }
                }
            }
        }
        self.tracked.clear();
        self.source.clear();
        self.initialized = false;
    }

    /// Resolve a relative path to an absolute path under the root.
    /// Rejects absolute paths and any `..` component.
    fn resolve(&self, relative: &str) -> Result<PathBuf, WorkspaceError> {
        let root = self.root.as_ref().ok_or(WorkspaceError::NotInitialized)?;

        let rel = Path::new(relative);
        let escapes = rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if escapes {
            return Err(WorkspaceError::PathTraversal {
                path: relative.to_string(),
            });
        }

        Ok(root.join(rel))
    }

    /// Write one file under the root, creating parent directories.
    fn write_relative(&self, relative: &str, content: &str) -> Result<(), WorkspaceError> {
        let full = self.resolve(relative)?;

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|source| WorkspaceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&full, content).map_err(|source| WorkspaceError::Io { path: full, source })
    }
}

impl Drop for Workspace {
    /// Deterministic resource release: the sandbox directory disappears
    /// when the owning engine goes out of scope, on all exit paths.
    fn drop(&mut self) {
        self.teardown();
    }
}
