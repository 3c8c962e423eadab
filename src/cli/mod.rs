//! CLI module for tripdesk
//!
//! Every command loads the desk file, runs against a desk service and, for
//! mutating commands given `--write`, saves the resulting desk back.
//!
//! # Commands
//!
//! - `recommend` - Rank staff for a query without assigning
//! - `assign` - Manually assign a query
//! - `auto-assign` - Run the rule pipeline over pending queries
//! - `start` / `complete` - Move a query through its lifecycle
//! - `staff`, `queries` - Inspect the roster
//! - `rules` - List, enable or disable rules
//! - `sequence` - Manage the round-robin order
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! tripdesk config init
//! tripdesk auto-assign --write
//! tripdesk queries list --status assigned
//! ```

pub mod assign;
pub mod completions;
pub mod config;
pub mod output;
pub mod roster;
pub mod rules;
pub mod sequence;
pub mod session;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// tripdesk - assign travel inquiries to back-office staff
#[derive(Parser, Debug)]
#[command(
    name = "tripdesk",
    version,
    about = "Rule-based assignment of travel inquiries to staff"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank candidate staff for a query
    Recommend(RecommendArgs),
    /// Assign a query to a staff member by hand
    Assign(AssignArgs),
    /// Auto-assign queries using the enabled rules
    AutoAssign(AutoAssignArgs),
    /// Mark an assigned query as in progress
    Start(QueryActionArgs),
    /// Complete a query and release its staff member
    Complete(QueryActionArgs),
    /// Inspect staff
    #[command(subcommand)]
    Staff(StaffCommands),
    /// Inspect queries
    #[command(subcommand)]
    Queries(QueriesCommands),
    /// Manage assignment rules
    #[command(subcommand)]
    Rules(RulesCommands),
    /// Manage the round-robin sequence
    #[command(subcommand)]
    Sequence(SequenceCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that opens a desk file
#[derive(Args, Debug, Clone)]
pub struct DeskArgs {
    /// Path to the desk file
    #[arg(short, long, default_value = "tripdesk.toml", env = "TRIPDESK_CONFIG")]
    pub config: PathBuf,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Query ID
    pub query: String,

    #[command(flatten)]
    pub desk: DeskArgs,
}

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Query ID
    pub query: String,

    /// Staff member ID
    pub staff: String,

    /// Save the updated desk back to the desk file
    #[arg(short, long)]
    pub write: bool,

    #[command(flatten)]
    pub desk: DeskArgs,
}

#[derive(Args, Debug)]
pub struct AutoAssignArgs {
    /// Queries to assign, in this order (default: every new query)
    pub queries: Vec<String>,

    /// Save the updated desk back to the desk file
    #[arg(short, long)]
    pub write: bool,

    #[command(flatten)]
    pub desk: DeskArgs,
}

#[derive(Args, Debug)]
pub struct QueryActionArgs {
    /// Query ID
    pub query: String,

    /// Save the updated desk back to the desk file
    #[arg(short, long)]
    pub write: bool,

    #[command(flatten)]
    pub desk: DeskArgs,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub desk: DeskArgs,
}

#[derive(Subcommand, Debug)]
pub enum StaffCommands {
    /// List staff with their load
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
pub enum QueriesCommands {
    /// List queries in arrival order
    List(QueriesListArgs),
}

#[derive(Args, Debug)]
pub struct QueriesListArgs {
    /// Filter by status (new, assigned, in-progress, completed)
    #[arg(short, long)]
    pub status: Option<String>,

    #[command(flatten)]
    pub desk: DeskArgs,
}

#[derive(Subcommand, Debug)]
pub enum RulesCommands {
    /// List rules in evaluation order
    List(ListArgs),
    /// Enable a rule
    Enable(RuleToggleArgs),
    /// Disable a rule
    Disable(RuleToggleArgs),
}

#[derive(Args, Debug)]
pub struct RuleToggleArgs {
    /// Rule ID
    pub id: String,

    /// Save the updated desk back to the desk file
    #[arg(short, long)]
    pub write: bool,

    #[command(flatten)]
    pub desk: DeskArgs,
}

#[derive(Subcommand, Debug)]
pub enum SequenceCommands {
    /// Show the round-robin order
    Show(ListArgs),
    /// Append a staff member to the sequence
    Add(SequenceArgs),
    /// Take a staff member out of the sequence
    Remove(SequenceArgs),
    /// Move a staff member one place earlier
    Up(SequenceArgs),
    /// Move a staff member one place later
    Down(SequenceArgs),
}

#[derive(Args, Debug)]
pub struct SequenceArgs {
    /// Staff member ID
    pub staff: String,

    /// Save the updated desk back to the desk file
    #[arg(short, long)]
    pub write: bool,

    #[command(flatten)]
    pub desk: DeskArgs,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new desk file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "tripdesk.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
