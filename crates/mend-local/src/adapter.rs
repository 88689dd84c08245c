// adapter.rs — Load goals and repositories from disk, write changesets back.
//
// The loader snapshots text files only: the engine regenerates whole file
// contents as strings, so binary assets are left out of the Repo rather
// than round-tripped lossily.

use std::fs;
use std::path::{Component, Path};

use mend_model::{ChangeSet, Goal, Repo};
use tracing::{debug, info};

use crate::error::LocalError;

/// Directories never worth snapshotting.
const SKIP_DIRS: &[&str] = &["target", "node_modules", "dist", "build", "__pycache__"];

/// How many leading bytes the binary probe inspects.
const PROBE_BYTES: usize = 8192;

/// Load a goal from a text file: the whole file is the description.
pub fn load_goal(path: &Path) -> Result<Goal, LocalError> {
    let content = fs::read_to_string(path).map_err(|source| LocalError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let description = content.trim();
    if description.is_empty() {
        return Err(LocalError::EmptyGoal {
            path: path.to_path_buf(),
        });
    }

    Ok(Goal::new(description)
        .with_context(format!("Local goal file: {}", path.display()))
        .with_tag("local"))
}

/// Snapshot a directory into a Repo.
///
/// Hidden entries, the directories in [`SKIP_DIRS`] and non-text files
/// are skipped. The repo name is the directory's file name; metadata
/// records the platform and source path.
pub fn load_repo(dir: &Path) -> Result<Repo, LocalError> {
    if !dir.is_dir() {
        return Err(LocalError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "repository".to_string());

    let mut repo = Repo::new(name)
        .with_metadata("platform", "local")
        .with_metadata("source_path", dir.display().to_string());

    walk(dir, dir, &mut repo)?;

    info!(repo = %repo.name, files = repo.files.len(), "loaded local repository");
    Ok(repo)
}

/// Write an accepted changeset into a real directory, creating parent
/// directories as needed. Paths attempting to escape `dir` are rejected.
pub fn apply_changeset(dir: &Path, changeset: &ChangeSet) -> Result<(), LocalError> {
    for file in &changeset.files {
        let rel = Path::new(&file.path);
        let escapes = rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if escapes {
            return Err(LocalError::PathTraversal {
                path: file.path.clone(),
            });
        }

        let full = dir.join(rel);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|source| LocalError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&full, &file.content).map_err(|source| LocalError::Io {
            path: full.clone(),
            source,
        })?;

        debug!(path = %file.path, "applied change");
    }

    info!(files = changeset.files.len(), "changeset applied");
    Ok(())
}

fn walk(dir: &Path, root: &Path, repo: &mut Repo) -> Result<(), LocalError> {
    let entries = fs::read_dir(dir).map_err(|source| LocalError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| LocalError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            if !SKIP_DIRS.contains(&name.as_str()) {
                walk(&path, root, repo)?;
            }
            continue;
        }

        if let Some(content) = read_text(&path) {
            if let Ok(rel) = path.strip_prefix(root) {
                repo.files.insert(relative_key(rel), content);
            }
        }
    }

    Ok(())
}

/// Forward-slash normalized relative path, regardless of platform.
fn relative_key(rel: &Path) -> String {
    rel.iter()
        .map(|c| c.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read a file as text. Returns `None` for binary content (null byte in
/// the first probe window) or invalid UTF-8 — unreadable files are
/// skipped, not fatal.
fn read_text(path: &Path) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    if bytes.iter().take(PROBE_BYTES).any(|&b| b == 0) {
        return None;
    }
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mend_model::FileSnapshot;
    use tempfile::tempdir;

    #[test]
    fn load_goal_reads_description_and_tags() {
        let dir = tempdir().unwrap();
        let goal_file = dir.path().join("goal.txt");
        fs::write(&goal_file, "Fix login bug\n\nUsers cannot sign in.\n").unwrap();

        let goal = load_goal(&goal_file).unwrap();
        assert_eq!(goal.description, "Fix login bug\n\nUsers cannot sign in.");
        assert!(goal.context.contains("goal.txt"));
        assert_eq!(goal.tags, vec!["local".to_string()]);
    }

    #[test]
    fn load_goal_rejects_empty_file() {
        let dir = tempdir().unwrap();
        let goal_file = dir.path().join("goal.txt");
        fs::write(&goal_file, "  \n").unwrap();

        assert!(matches!(
            load_goal(&goal_file),
            Err(LocalError::EmptyGoal { .. })
        ));
    }

    #[test]
    fn load_repo_snapshots_nested_text_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/deep")).unwrap();
        fs::write(dir.path().join("README.md"), "# demo").unwrap();
        fs::write(dir.path().join("src/deep/mod.rs"), "pub fn f() {}").unwrap();

        let repo = load_repo(dir.path()).unwrap();
        assert_eq!(repo.files.get("README.md").unwrap(), "# demo");
        assert_eq!(repo.files.get("src/deep/mod.rs").unwrap(), "pub fn f() {}");
        assert_eq!(repo.metadata.get("platform").unwrap(), "local");
    }

    #[test]
    fn load_repo_skips_hidden_build_and_binary_entries() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("target/debug")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("target/debug/out.txt"), "artifact").unwrap();
        fs::write(dir.path().join(".git/config"), "[core]").unwrap();
        fs::write(dir.path().join(".hidden"), "secret").unwrap();
        fs::write(dir.path().join("logo.bin"), [0u8, 159, 146, 150]).unwrap();
        fs::write(dir.path().join("keep.txt"), "kept").unwrap();

        let repo = load_repo(dir.path()).unwrap();
        assert_eq!(repo.files.len(), 1);
        assert!(repo.files.contains_key("keep.txt"));
    }

    #[test]
    fn load_repo_rejects_non_directories() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        assert!(matches!(
            load_repo(&file),
            Err(LocalError::NotADirectory { .. })
        ));
    }

    #[test]
    fn apply_changeset_writes_nested_files() {
        let dir = tempdir().unwrap();
        let changeset = ChangeSet {
            summary: "add module".into(),
            description: String::new(),
            files: vec![FileSnapshot::created("src/new/widget.rs", "pub struct W;")],
            branch_name: String::new(),
            test_command: None,
        };

        apply_changeset(dir.path(), &changeset).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("src/new/widget.rs")).unwrap(),
            "pub struct W;"
        );
    }

    #[test]
    fn apply_changeset_rejects_traversal() {
        let dir = tempdir().unwrap();
        let changeset = ChangeSet {
            summary: "escape".into(),
            description: String::new(),
            files: vec![FileSnapshot::new("../outside.txt", "nope")],
            branch_name: String::new(),
            test_command: None,
        };

        assert!(matches!(
            apply_changeset(dir.path(), &changeset),
            Err(LocalError::PathTraversal { .. })
        ));
    }
}
