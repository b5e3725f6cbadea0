//! Eval command handler.

use crate::runtime::Runtime;
use clap::Args;
use grounded_core::{config::AppConfig, AppResult};
use grounded_knowledge::eval::{default_eval_path, load_eval_set, run_eval, Judge};
use grounded_prompt::{load_prompt, FAITHFULNESS_PROMPT_ID, RELEVANCE_PROMPT_ID};
use std::path::PathBuf;

/// Score answers on an eval set with an LLM judge
#[derive(Args, Debug)]
pub struct EvalCommand {
    /// Eval set JSON file (default: <workspace>/eval/eval_set.json)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Judge model (default: the generation model)
    #[arg(long)]
    pub judge_model: Option<String>,

    /// Output the full report as JSON
    #[arg(long)]
    pub json: bool,
}

impl EvalCommand {
    /// Execute the eval command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing eval command");

        let path = self
            .file
            .clone()
            .unwrap_or_else(|| default_eval_path(&config.workspace));
        let items = load_eval_set(&path)?;

        let runtime = Runtime::build(config).await?;
        let judge_model = self
            .judge_model
            .clone()
            .unwrap_or_else(|| runtime.engine.config().model.clone());
        let judge = Judge::new(runtime.llm.clone(), judge_model)?.with_prompts(
            load_prompt(&config.workspace, FAITHFULNESS_PROMPT_ID)?,
            load_prompt(&config.workspace, RELEVANCE_PROMPT_ID)?,
        );

        let total = items.len();
        if !self.json {
            println!("Running eval on {} questions...\n", total);
        }

        let quiet = self.json;
        let report = run_eval(&runtime.engine, &judge, &items, |i, record| {
            if !quiet {
                let status = if record.passed() { "✓" } else { "✗" };
                let preview: String = record.question.chars().take(50).collect();
                println!("  [{}/{}] {} {}...", i + 1, total, status, preview);
            }
        })
        .await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        let summary = &report.summary;
        println!("\n{}", "=".repeat(60));
        println!("EVAL SUMMARY");
        println!("{}", "=".repeat(60));
        println!("  Total questions:       {}", summary.total);
        println!(
            "  Answered (LLM used):   {} ({:.0}%)",
            summary.answered, summary.answered_pct
        );
        println!(
            "  Faithfulness:          {}/{} ({:.0}%)",
            summary.faithful, summary.answered, summary.faithful_pct
        );
        println!(
            "  Relevance:             {}/{} ({:.0}%)",
            summary.relevant, summary.answered, summary.relevant_pct
        );
        println!("{}", "=".repeat(60));

        Ok(())
    }
}
