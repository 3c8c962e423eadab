//! Completions command implementation

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Write;

use crate::cli::{Cli, CompletionsArgs};

/// Write the completion script for `shell` to `out`
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
}

/// Handle `tripdesk completions`
pub fn handle_completions(args: &CompletionsArgs) {
    write_completions(args.shell, &mut std::io::stdout());
}
