//! sqlvet CLI binary entry point.
//! Resolves configuration, runs the engine and prints results.

use clap::Parser;
use sqlvet::cli::{Cli, Commands};
use sqlvet::config::{self, OutputFormat};
use sqlvet::models::RuleCode;
use sqlvet::utils::{error_prefix, info_prefix, note_prefix};
use sqlvet::{loader, output, segment, Engine, Script};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Commands::Rules => {
            for code in RuleCode::ALL {
                println!("{:<24} {}", code.as_str(), code.describe());
            }
            ExitCode::SUCCESS
        }
        Commands::Check {
            files,
            repo_root,
            output,
            disable,
        } => run_check(files, repo_root.as_deref(), output.as_deref(), &disable),
        Commands::Split { file, output } => run_split(&file, output.as_deref()),
    }
}

/// Logs go to stderr so JSON on stdout stays clean. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "sqlvet=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_check(
    files: Vec<String>,
    repo_root: Option<&str>,
    output: Option<&str>,
    disable: &[String],
) -> ExitCode {
    let eff = match config::resolve_effective(repo_root, output, disable) {
        Ok(eff) => eff,
        Err(e) => {
            eprintln!("{} {}", error_prefix(), e);
            return ExitCode::from(2);
        }
    };
    match eff.config_path.as_ref() {
        Some(p) => tracing::debug!(config = %p.display(), "loaded config"),
        None if eff.output == OutputFormat::Human => {
            eprintln!("{} No sqlvet.toml found; using defaults.", note_prefix());
        }
        None => {}
    }
    for name in &eff.unknown_rules {
        eprintln!(
            "{} Ignoring unknown rule '{}' in disable list (see `sqlvet rules`).",
            note_prefix(),
            name
        );
    }

    let paths: Vec<PathBuf> = if files.is_empty() {
        match loader::discover(&eff.repo_root, &eff.scripts) {
            Ok(found) => found,
            Err(e) => {
                eprintln!("{} {}", error_prefix(), e);
                return ExitCode::from(2);
            }
        }
    } else {
        files.iter().map(|f| config::absolutize(Path::new(f))).collect()
    };
    if paths.is_empty() {
        eprintln!(
            "{} No scripts matched {:?} under {}.",
            error_prefix(),
            eff.scripts,
            eff.repo_root.display()
        );
        return ExitCode::from(2);
    }
    if eff.output == OutputFormat::Human {
        eprintln!("{} Validating {} script(s).", info_prefix(), paths.len());
    }

    let engine = Engine::with_disabled(&eff.disabled);
    let report = engine.validate_all(&eff.repo_root, &paths);
    output::print_report(&report, eff.output);
    if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn run_split(file: &str, output: Option<&str>) -> ExitCode {
    let format = match OutputFormat::parse(output.unwrap_or("human")) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{} {}", error_prefix(), e);
            return ExitCode::from(2);
        }
    };
    let script = match Script::load(Path::new(file), file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{} {}", error_prefix(), e);
            return ExitCode::from(2);
        }
    };
    let seg = segment::split(script.content());
    if let Some(line) = seg.unterminated_body {
        eprintln!(
            "{} {}:{}: $$ body never closed; the last statement is best effort.",
            error_prefix(),
            file,
            line
        );
    }
    if let Some(line) = seg.unterminated_literal {
        eprintln!(
            "{} {}:{}: quote never closed; later statement boundaries are best effort.",
            error_prefix(),
            file,
            line
        );
    }
    output::print_statements(script.path(), &seg.statements, format);
    if seg.unterminated_body.is_some() || seg.unterminated_literal.is_some() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
