//! Ask command handler.

use crate::runtime::Runtime;
use clap::Args;
use grounded_core::{config::AppConfig, AppResult};
use grounded_knowledge::{AnswerOptions, AnswerResult};

/// Answer one question from the indexed documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Output the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Include the context block sent to the model
    #[arg(long)]
    pub show_context: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let runtime = Runtime::build(config).await?;
        let options = AnswerOptions {
            return_context: self.show_context,
        };
        let result = runtime.engine.answer_with(&self.question, options).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_result(&result);
        }

        Ok(())
    }
}

/// Human-readable rendering shared with the chat loop.
pub fn print_result(result: &AnswerResult) {
    println!("{}", result.answer);

    if let Some(context) = result.context.as_deref().filter(|c| !c.is_empty()) {
        println!("\nContext:\n{}", context);
    }

    if !result.citations.is_empty() {
        println!("\nSources:");
        for citation in &result.citations {
            println!(
                "  [{}] {} (distance {:.3})",
                citation.rank, citation.source, citation.score
            );
        }
    }

    println!("\nConfidence: {:.0}%", result.confidence * 100.0);
}
