//! Init command handler.

use clap::Args;
use grounded_core::{config::AppConfig, AppError, AppResult};
use grounded_knowledge::config::get_config_path;
use grounded_knowledge::{save_config, KnowledgeConfig};
use std::path::{Path, PathBuf};

/// Write the default knowledge settings to .grounded/knowledge.yaml
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Overwrite an existing settings file
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    /// Execute the init command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing init command");

        config.ensure_grounded_dir()?;
        let path = write_default_settings(&config.workspace, self.force)?;

        println!("Wrote {}", path.display());
        Ok(())
    }
}

/// Save the default [`KnowledgeConfig`], refusing to clobber an existing
/// file unless `force` is set.
pub fn write_default_settings(workspace: &Path, force: bool) -> AppResult<PathBuf> {
    let path = get_config_path(workspace);

    if path.exists() && !force {
        return Err(AppError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    save_config(workspace, &KnowledgeConfig::default())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grounded_knowledge::load_config;
    use tempfile::TempDir;

    #[test]
    fn test_writes_loadable_defaults() {
        let temp = TempDir::new().unwrap();

        let path = write_default_settings(temp.path(), false).unwrap();

        assert!(path.ends_with(".grounded/knowledge.yaml"));
        assert!(path.is_file());
        assert_eq!(load_config(temp.path()).unwrap(), KnowledgeConfig::default());
    }

    #[test]
    fn test_existing_file_needs_force() {
        let temp = TempDir::new().unwrap();
        let path = write_default_settings(temp.path(), false).unwrap();
        std::fs::write(&path, "retrieval:\n  topK: 9\n").unwrap();

        let err = write_default_settings(temp.path(), false).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(std::fs::read_to_string(&path).unwrap().contains("topK: 9"));

        write_default_settings(temp.path(), true).unwrap();
        assert_eq!(load_config(temp.path()).unwrap(), KnowledgeConfig::default());
    }
}
