// context.rs — Deterministic textual renderings fed to the LLM port.
//
// Everything here must be reproducible for the same inputs: repo context
// iterates ordered maps, and the attempt summary serializes through
// serde_json's sorted object keys.

use std::collections::BTreeMap;

use mend_model::{ChangeSet, Repo};
use serde_json::{json, Map, Value};
use tracing::warn;

/// How many characters of a changed file the retry context previews.
const PREVIEW_CHARS: usize = 500;

/// How many changed files the retry context previews.
const PREVIEW_FILES: usize = 3;

/// Render a repository for analysis: name, metadata, and the file listing
/// with content lengths (paths only — full contents would blow the prompt).
pub fn render_repo_context(repo: &Repo) -> String {
    let mut context = format!("Repository: {}\n\n", repo.name);

    if !repo.metadata.is_empty() {
        context.push_str("Metadata:\n");
        for (key, value) in &repo.metadata {
            context.push_str(&format!("  {key}: {value}\n"));
        }
        context.push('\n');
    }

    context.push_str("Files:\n");
    for (path, content) in &repo.files {
        context.push_str(&format!("  {path} ({} chars)\n", content.chars().count()));
    }

    context
}

/// Gather the current contents of exactly the analysis-selected files.
///
/// Files absent from the snapshot come back as the empty string ("does
/// not yet exist"). Contents longer than `max_chars` are truncated with a
/// marker, and a warning is logged — this bounds prompt size.
pub fn relevant_files(
    repo: &Repo,
    paths: &[String],
    max_chars: usize,
) -> BTreeMap<String, String> {
    let mut contents = BTreeMap::new();

    for path in paths {
        match repo.files.get(path) {
            Some(content) => match clip(content, max_chars) {
                Some(clipped) => {
                    warn!(%path, max_chars, "file truncated for prompt");
                    contents.insert(path.clone(), clipped);
                }
                None => {
                    contents.insert(path.clone(), content.clone());
                }
            },
            // File doesn't exist yet — it will be created.
            None => {
                contents.insert(path.clone(), String::new());
            }
        }
    }

    contents
}

/// Bounded JSON summary of a rejected attempt for the next prompt:
/// summary, description, file count and paths, plus a short content
/// preview of the first few changed files.
pub fn render_attempt(changeset: &ChangeSet) -> String {
    let mut info = Map::new();
    info.insert("summary".into(), json!(changeset.summary));
    info.insert("description".into(), json!(changeset.description));
    info.insert("files_changed".into(), json!(changeset.files.len()));
    info.insert("file_paths".into(), json!(changeset.paths()));

    for file in changeset.files.iter().take(PREVIEW_FILES) {
        let mut preview: String = file.content.chars().take(PREVIEW_CHARS).collect();
        if file.content.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        info.insert(format!("content_preview_{}", file.path), json!(preview));
    }

    serde_json::to_string_pretty(&Value::Object(info)).unwrap_or_default()
}

/// Truncate to `limit` characters plus a marker. `None` means the content
/// already fits (a length of exactly `limit` is kept whole).
fn clip(content: &str, limit: usize) -> Option<String> {
    content
        .char_indices()
        .nth(limit)
        .map(|(cut, _)| format!("{}\n... (truncated)", &content[..cut]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mend_model::FileSnapshot;

    #[test]
    fn repo_context_lists_files_in_sorted_order_with_lengths() {
        let repo = Repo::new("demo")
            .with_file("src/main.rs", "fn main() {}")
            .with_file("Cargo.toml", "[package]")
            .with_metadata("platform", "local");

        let context = render_repo_context(&repo);

        assert!(context.starts_with("Repository: demo\n"));
        assert!(context.contains("Metadata:\n  platform: local\n"));
        let cargo_pos = context.find("Cargo.toml (9 chars)").unwrap();
        let main_pos = context.find("src/main.rs (12 chars)").unwrap();
        assert!(cargo_pos < main_pos);
    }

    #[test]
    fn repo_context_omits_metadata_block_when_empty() {
        let repo = Repo::new("demo").with_file("a.txt", "x");
        assert!(!render_repo_context(&repo).contains("Metadata:"));
    }

    #[test]
    fn relevant_files_supplies_missing_paths_as_empty() {
        let repo = Repo::new("demo").with_file("auth.py", "def login(): pass");
        let contents = relevant_files(
            &repo,
            &["auth.py".to_string(), "new_module.py".to_string()],
            50_000,
        );

        assert_eq!(contents.get("auth.py").unwrap(), "def login(): pass");
        assert_eq!(contents.get("new_module.py").unwrap(), "");
    }

    #[test]
    fn relevant_files_truncates_oversized_content() {
        let repo = Repo::new("demo").with_file("big.txt", "abcdefghijklmnop");
        let contents = relevant_files(&repo, &["big.txt".to_string()], 10);

        assert_eq!(
            contents.get("big.txt").unwrap(),
            "abcdefghij\n... (truncated)"
        );
    }

    #[test]
    fn relevant_files_keeps_content_at_exactly_the_ceiling() {
        let repo = Repo::new("demo").with_file("edge.txt", "0123456789");
        let contents = relevant_files(&repo, &["edge.txt".to_string()], 10);
        assert_eq!(contents.get("edge.txt").unwrap(), "0123456789");
    }

    #[test]
    fn clip_respects_multibyte_boundaries() {
        let clipped = clip("héllo wörld", 5).unwrap();
        assert!(clipped.starts_with("héllo"));
        assert!(clipped.ends_with("... (truncated)"));
    }

    #[test]
    fn attempt_summary_previews_at_most_three_files() {
        let files: Vec<FileSnapshot> = (0..5)
            .map(|i| FileSnapshot::new(format!("f{i}.txt"), "x".repeat(600)))
            .collect();
        let changeset = ChangeSet {
            summary: "try harder".into(),
            description: "second pass".into(),
            files,
            branch_name: String::new(),
            test_command: None,
        };

        let rendered = render_attempt(&changeset);
        let parsed: Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed["summary"], "try harder");
        assert_eq!(parsed["files_changed"], 5);
        assert_eq!(parsed["file_paths"].as_array().unwrap().len(), 5);
        assert!(parsed.get("content_preview_f2.txt").is_some());
        assert!(parsed.get("content_preview_f3.txt").is_none());

        // Long content is cut to the preview length plus an ellipsis.
        let preview = parsed["content_preview_f0.txt"].as_str().unwrap();
        assert_eq!(preview.chars().count(), 503);
        assert!(preview.ends_with("..."));
    }
}
