// prompt.rs — Prompt construction and response extraction.
//
// The JSON shapes requested here mirror the serde representations of
// AnalysisResult and ChangeSet exactly, so responses decode without any
// intermediate schema.

use std::collections::BTreeMap;
use std::fmt::Write;

use mend_model::{AnalysisResult, Goal};

pub(crate) const ANALYSIS_SYSTEM_PROMPT: &str = "\
You are Mend, an automated code maintenance agent. Analyze the provided \
goal against the repository and respond with a single JSON object, no \
prose, with these fields:\n\
  \"summary\": brief summary of the problem\n\
  \"problem_type\": one of \"bug\", \"feature\", \"documentation\", \"enhancement\", \"other\"\n\
  \"suggested_approach\": detailed approach to solve the goal\n\
  \"files_to_modify\": list of file paths that likely need modification\n\
  \"confidence\": your confidence between 0.0 and 1.0\n\
Be precise and focused in your analysis.";

pub(crate) const GENERATION_SYSTEM_PROMPT: &str = "\
You are Mend, an automated code maintenance agent. Generate a complete \
solution for the goal and respond with a single JSON object, no prose, \
with these fields:\n\
  \"summary\": brief summary of the changes\n\
  \"description\": detailed description of the changes\n\
  \"files\": list of objects {\"path\", \"content\", \"exists\"} where \
\"content\" is the COMPLETE new file content (never a diff) and \
\"exists\" is false for files being created\n\
  \"branch_name\": suggested branch name (format: mend/short-description)\n\
  \"test_command\": optional command to validate the changes, or null\n\
IMPORTANT:\n\
- Provide complete file content, not just diffs\n\
- Ensure all changes are consistent and work together\n\
- Follow the existing code style and patterns\n\
- Add tests if appropriate";

/// User prompt for the analysis call.
pub(crate) fn analysis_prompt(goal: &Goal, repo_context: &str) -> String {
    format!(
        "GOAL TO ANALYZE:\n\
         Description: {}\n\
         Context: {}\n\
         Priority: {}\n\
         Tags: {}\n\n\
         REPOSITORY CONTEXT:\n{}",
        goal.description,
        goal.context,
        goal.priority,
        goal.tags.join(", "),
        repo_context
    )
}

/// User prompt for the generation call, including retry context from a
/// rejected previous attempt when present.
pub(crate) fn generation_prompt(
    goal: &Goal,
    analysis: &AnalysisResult,
    file_contents: &BTreeMap<String, String>,
    previous_attempt: Option<&str>,
    previous_error: Option<&str>,
) -> String {
    let mut files_context = String::new();
    for (path, content) in file_contents {
        let _ = write!(files_context, "\n--- {path} ---\n{content}\n");
    }

    let mut retry_context = String::new();
    if let Some(error) = previous_error {
        retry_context.push_str("\nPREVIOUS ATTEMPT FAILED:\n");
        if let Some(attempt) = previous_attempt {
            let _ = write!(
                retry_context,
                "The previous solution failed validation. Here was the previous attempt:\n\
                 {attempt}\n\n"
            );
        }
        let _ = write!(
            retry_context,
            "FAILURE:\n{error}\n\n\
             Please fix the issues and provide a corrected solution.\n"
        );
    }

    format!(
        "GOAL:\n\
         Description: {}\n\
         Context: {}\n\n\
         ANALYSIS:\n{}\n\n\
         CURRENT FILES:\n{}\n\
         {}",
        goal.description, goal.context, analysis.suggested_approach, files_context, retry_context
    )
}

/// Pull the JSON payload out of a model response, stripping a markdown
/// code fence or surrounding prose when present.
pub(crate) fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(end) = rest.rfind("```") {
            return rest[..end].trim();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return trimmed[start..=end].trim();
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use mend_model::ProblemType;

    fn sample_analysis() -> AnalysisResult {
        AnalysisResult {
            summary: "login broken".into(),
            problem_type: ProblemType::Bug,
            suggested_approach: "return the token".into(),
            files_to_modify: vec!["auth.py".into()],
            confidence: 0.9,
        }
    }

    #[test]
    fn analysis_prompt_carries_goal_fields() {
        let goal = Goal::new("Fix login bug")
            .with_context("auth module")
            .with_tag("bug");
        let prompt = analysis_prompt(&goal, "Repository: demo\n");

        assert!(prompt.contains("Description: Fix login bug"));
        assert!(prompt.contains("Context: auth module"));
        assert!(prompt.contains("Priority: normal"));
        assert!(prompt.contains("Tags: bug"));
        assert!(prompt.contains("REPOSITORY CONTEXT:\nRepository: demo"));
    }

    #[test]
    fn generation_prompt_without_retry_context() {
        let goal = Goal::new("Fix login bug");
        let mut files = BTreeMap::new();
        files.insert("auth.py".to_string(), "def login(): pass".to_string());

        let prompt = generation_prompt(&goal, &sample_analysis(), &files, None, None);

        assert!(prompt.contains("--- auth.py ---\ndef login(): pass"));
        assert!(prompt.contains("ANALYSIS:\nreturn the token"));
        assert!(!prompt.contains("PREVIOUS ATTEMPT FAILED"));
    }

    #[test]
    fn generation_prompt_includes_retry_context() {
        let goal = Goal::new("Fix login bug");
        let files = BTreeMap::new();

        let prompt = generation_prompt(
            &goal,
            &sample_analysis(),
            &files,
            Some("{\"summary\": \"first try\"}"),
            Some("TESTS FAILED (return code: 1)"),
        );

        assert!(prompt.contains("PREVIOUS ATTEMPT FAILED"));
        assert!(prompt.contains("{\"summary\": \"first try\"}"));
        assert!(prompt.contains("TESTS FAILED (return code: 1)"));
    }

    #[test]
    fn generation_prompt_carries_error_without_attempt_summary() {
        let goal = Goal::new("Fix login bug");
        let files = BTreeMap::new();

        let prompt = generation_prompt(
            &goal,
            &sample_analysis(),
            &files,
            None,
            Some("no changes generated"),
        );

        assert!(prompt.contains("PREVIOUS ATTEMPT FAILED"));
        assert!(prompt.contains("FAILURE:\nno changes generated"));
        assert!(!prompt.contains("previous attempt:"));
    }

    #[test]
    fn extract_json_passes_through_bare_objects() {
        assert_eq!(extract_json("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_strips_fences() {
        assert_eq!(extract_json("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(extract_json("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_tolerates_surrounding_prose() {
        let raw = "Here is the result:\n{\"a\": 1}\nLet me know!";
        assert_eq!(extract_json(raw), "{\"a\": 1}");
    }
}
