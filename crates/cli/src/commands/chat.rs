//! Interactive question loop.

use crate::commands::ask::print_result;
use crate::runtime::Runtime;
use clap::Args;
use grounded_core::{config::AppConfig, AppResult};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Ask questions interactively until `exit`
#[derive(Args, Debug)]
pub struct ChatCommand {}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let runtime = Runtime::build(config).await?;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("\nAsk a question (or 'exit'): ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let question = line.trim();
            if question.eq_ignore_ascii_case("exit") {
                break;
            }

            match runtime.engine.answer(question).await {
                Ok(result) => {
                    println!();
                    print_result(&result);
                }
                Err(e) => {
                    tracing::error!("Failed to answer: {}", e);
                    eprintln!("Error: {}", e);
                }
            }
        }

        Ok(())
    }
}
