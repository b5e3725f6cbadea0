//! Prompt loader.
//!
//! Workspace files in `.grounded/prompts/<id>.yml` take precedence over the
//! built-in definitions of the same ID.

use crate::defaults::{builtin_prompt, ANSWER_PROMPT_ID, BUILTIN_PROMPT_IDS, REFUSAL_ANSWER};
use crate::types::PromptDefinition;
use grounded_core::config::STATE_DIR;
use grounded_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(STATE_DIR).join("prompts")
}

/// Load a prompt definition by ID.
///
/// # Arguments
/// * `workspace_path` - Root workspace directory containing `.grounded/`
/// * `prompt_id` - Prompt identifier (e.g., "rag.answer")
///
/// # Example
/// ```no_run
/// use grounded_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "rag.answer")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    if !prompt_file.exists() {
        return builtin_prompt(prompt_id).ok_or_else(|| {
            AppError::Prompt(format!(
                "Prompt '{}' is not built in and {:?} does not exist",
                prompt_id, prompt_file
            ))
        });
    }

    tracing::debug!("Loading prompt override from: {:?}", prompt_file);

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    if definition.id != prompt_id {
        return Err(AppError::Prompt(format!(
            "Prompt file {:?} declares id '{}', expected '{}'",
            prompt_file, definition.id, prompt_id
        )));
    }

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// List all available prompt IDs: built-ins plus workspace files, sorted.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let mut prompt_ids: Vec<String> = BUILTIN_PROMPT_IDS.iter().map(|s| s.to_string()).collect();

    let dir = prompts_dir(workspace_path);
    if dir.exists() {
        for entry in walkdir::WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    prompt_ids.push(stem.to_string());
                }
            }
        }
    }

    prompt_ids.sort();
    prompt_ids.dedup();
    Ok(prompt_ids)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    // Overrides must still consume every variable the built-in receives.
    if let Some(builtin) = builtin_prompt(&def.id) {
        for var in &builtin.required_variables {
            if !def.template.contains(&format!("{{{{{}}}}}", var)) {
                return Err(AppError::Prompt(format!(
                    "Prompt '{}' template must reference {{{{{}}}}}",
                    def.id, var
                )));
            }
        }
    }

    if def.id == ANSWER_PROMPT_ID {
        let keeps_refusal = def
            .system
            .as_deref()
            .is_some_and(|system| system.contains(REFUSAL_ANSWER));
        if !keeps_refusal {
            return Err(AppError::Prompt(format!(
                "Prompt '{}' system message must contain the refusal text \"{}\"",
                def.id, REFUSAL_ANSWER
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, file_id: &str, content: &str) -> PathBuf {
        let prompts_dir = dir.join(".grounded/prompts");
        fs::create_dir_all(&prompts_dir).unwrap();
        let file_path = prompts_dir.join(format!("{}.yml", file_id));
        fs::write(&file_path, content).unwrap();
        file_path
    }

    #[test]
    fn test_falls_back_to_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = load_prompt(temp_dir.path(), ANSWER_PROMPT_ID).unwrap();
        assert_eq!(prompt, builtin_prompt(ANSWER_PROMPT_ID).unwrap());
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_prompt(temp_dir.path(), "nonexistent").is_err());
    }

    #[test]
    fn test_workspace_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(
            temp_dir.path(),
            "eval.relevance",
            r#"
id: eval.relevance
title: "Strict relevance"
apiVersion: "1.1"
template: "Q: {{question}}\nA: {{answer}}\nRelevant? Yes or No"
"#,
        );

        let prompt = load_prompt(temp_dir.path(), "eval.relevance").unwrap();
        assert_eq!(prompt.title, "Strict relevance");
        assert_eq!(prompt.api_version, "1.1");
    }

    #[test]
    fn test_answer_override_must_keep_refusal() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(
            temp_dir.path(),
            "rag.answer",
            r#"
id: rag.answer
title: "Loose answer"
apiVersion: "1.0"
system: "Answer however you like."
template: "{{context}} {{question}}"
"#,
        );

        let err = load_prompt(temp_dir.path(), "rag.answer").unwrap_err();
        assert!(err.to_string().contains("refusal text"));
    }

    #[test]
    fn test_override_missing_variable_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(
            temp_dir.path(),
            "eval.faithfulness",
            r#"
id: eval.faithfulness
title: "No context"
apiVersion: "1.0"
template: "Q: {{question}} A: {{answer}}"
"#,
        );

        let err = load_prompt(temp_dir.path(), "eval.faithfulness").unwrap_err();
        assert!(err.to_string().contains("{{context}}"));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "invalid", "invalid: yaml: content:");
        assert!(load_prompt(temp_dir.path(), "invalid").is_err());
    }

    #[test]
    fn test_list_prompts_merges_builtins_and_files() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "custom.summary", "id: custom.summary");
        write_prompt(temp_dir.path(), "eval.relevance", "id: eval.relevance");

        let prompts = list_prompts(temp_dir.path()).unwrap();
        assert_eq!(
            prompts,
            vec![
                "custom.summary".to_string(),
                "eval.faithfulness".to_string(),
                "eval.relevance".to_string(),
                "rag.answer".to_string(),
            ]
        );
    }
}
