//! sqlvet core library.
//!
//! Static validation of Snowflake SQL scripts: segmentation into statements
//! and a fixed battery of anti-pattern rules, with no warehouse connection.
//!
//! High-level modules:
//! - `lexer`: State machine for literals, comments and `$$` bodies.
//! - `segment`: Statement segmentation.
//! - `checks`: The rule catalog and statement classification.
//! - `engine`: Runs rules per script with fault isolation; builds reports.
//! - `loader`: Script loading and glob discovery.
//! - `models`: Scripts, statements, findings and the validation report.
//! - `config`: Discovery and effective configuration resolution.
//! - `output`: Human/JSON printers.
//! - `cli`: CLI argument parsing (binary uses this).
pub mod checks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod lexer;
pub mod loader;
pub mod models;
pub mod output;
pub mod segment;
pub mod utils;

pub use engine::Engine;
pub use models::{Finding, Location, RuleCode, Script, Severity, Statement, ValidationReport};
pub use segment::{split, Segmentation};
