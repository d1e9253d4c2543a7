//! CLI commands

mod changes;
mod completions;
mod deploy;

pub use changes::ChangesCommand;
pub use completions::CompletionsCommand;
pub use deploy::DeployCommand;
