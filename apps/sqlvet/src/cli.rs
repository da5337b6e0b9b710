//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sqlvet",
    version,
    about = "Static validation for Snowflake SQL scripts",
    long_about = "sqlvet — split SQL scripts into statements and check them for known Snowflake anti-patterns without connecting to a warehouse.\n\nConfiguration precedence: CLI > sqlvet.toml > defaults.",
    after_help = "Examples:\n  sqlvet check\n  sqlvet check IMCUST/MANUAL_01_discovery.sql --output json\n  sqlvet check --disable unbalanced-quote\n  sqlvet split IMSDLC/AUTOMATED_migration_procedure.sql",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, short, global = true, action = clap::ArgAction::SetTrue, help = "Enable debug logging on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current sqlvet version.")]
    Version,
    /// Validate scripts
    #[command(
        about = "Validate SQL scripts",
        long_about = "Run every enabled rule over the given scripts, or over the scripts matched by `scripts` in sqlvet.toml. Exits 1 when any error-severity finding exists.",
        after_help = "Examples:\n  sqlvet check\n  sqlvet check a.sql b.sql --output json"
    )]
    Check {
        #[arg(help = "Scripts to validate (default: `scripts` patterns from config)")]
        files: Vec<String>,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long = "disable", value_name = "CODE", help = "Disable a rule by code (repeatable)")]
        disable: Vec<String>,
    },
    /// Print the statements of a script
    #[command(
        about = "Split a script into statements",
        long_about = "Strip comments and print the statements a script would be executed as, with their kind."
    )]
    Split {
        #[arg(help = "Script to split")]
        file: String,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// List rule codes
    #[command(about = "List rules", long_about = "List every rule code with a short description.")]
    Rules,
}
