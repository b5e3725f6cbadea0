//! Prompts command handler.

use clap::Args;
use grounded_core::config::{AppConfig, STATE_DIR};
use grounded_core::AppResult;
use grounded_prompt::{builtin_prompt, list_prompts};
use serde::Serialize;
use std::path::Path;

/// List the prompts available in this workspace
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// One listed prompt and where it comes from.
#[derive(Debug, Serialize, PartialEq)]
pub struct PromptEntry {
    pub id: String,
    pub builtin: bool,
    pub overridden: bool,
}

impl PromptsCommand {
    /// Execute the prompts command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing prompts command");

        let entries = prompt_entries(&config.workspace)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        for entry in &entries {
            let origin = match (entry.builtin, entry.overridden) {
                (true, true) => "built-in, overridden",
                (true, false) => "built-in",
                (false, _) => "workspace",
            };
            println!("  {:<20} ({})", entry.id, origin);
        }

        Ok(())
    }
}

/// Every prompt id with its origin, in id order.
pub fn prompt_entries(workspace: &Path) -> AppResult<Vec<PromptEntry>> {
    let prompts_dir = workspace.join(STATE_DIR).join("prompts");

    Ok(list_prompts(workspace)?
        .into_iter()
        .map(|id| {
            let builtin = builtin_prompt(&id).is_some();
            let overridden = builtin && prompts_dir.join(format!("{}.yml", id)).is_file();
            PromptEntry {
                id,
                builtin,
                overridden,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grounded_prompt::ANSWER_PROMPT_ID;
    use tempfile::TempDir;

    #[test]
    fn test_builtins_only() {
        let temp = TempDir::new().unwrap();
        let entries = prompt_entries(temp.path()).unwrap();

        assert!(!entries.is_empty());
        assert!(entries.iter().all(|e| e.builtin && !e.overridden));
        assert!(entries.iter().any(|e| e.id == ANSWER_PROMPT_ID));
    }

    #[test]
    fn test_workspace_files_are_marked() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".grounded").join("prompts");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{}.yml", ANSWER_PROMPT_ID)), "id: x").unwrap();
        std::fs::write(dir.join("summarize.yml"), "id: summarize").unwrap();

        let entries = prompt_entries(temp.path()).unwrap();

        let answer = entries.iter().find(|e| e.id == ANSWER_PROMPT_ID).unwrap();
        assert!(answer.builtin && answer.overridden);

        let custom = entries.iter().find(|e| e.id == "summarize").unwrap();
        assert_eq!(
            custom,
            &PromptEntry {
                id: "summarize".to_string(),
                builtin: false,
                overridden: false,
            }
        );
    }
}
