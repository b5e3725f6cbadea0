//! Command handlers for the Grounded CLI.

pub mod ask;
pub mod chat;
pub mod eval;
pub mod init;
pub mod prompts;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use eval::EvalCommand;
pub use init::InitCommand;
pub use prompts::PromptsCommand;
