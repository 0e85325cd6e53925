//! CLI module - command-line arguments
//!
//! The bridge takes no flags: every argument is a word of the task.

use clap::Parser;

/// Run a natural-language browser task and print a JSON envelope
#[derive(Parser, Debug)]
#[command(name = "act-bridge")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Free-form task words, joined with spaces
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub words: Vec<String>,
}

impl Args {
    /// The task string, or `default` when no words were given
    pub fn task(&self, default: &str) -> String {
        let joined = self.words.join(" ");
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            default.to_string()
        } else {
            trimmed.to_string()
        }
    }
}
