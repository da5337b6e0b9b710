//! Configuration discovery and effective settings resolution.
//!
//! sqlvet reads `sqlvet.toml|yaml|yml` from the repository root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `scripts`: `["**/*.sql"]`
//! - `output`: `human`
//! - `rules.disable`: empty
//!
//! Overrides precedence: CLI > config file > defaults. Disabled rules are the
//! union of both sources.

use crate::error::ConfigError;
use crate::models::RuleCode;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILES: [&str; 3] = ["sqlvet.toml", "sqlvet.yaml", "sqlvet.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `sqlvet.toml|yaml`.
pub struct SqlvetConfig {
    pub scripts: Option<Vec<String>>,
    pub output: Option<String>,
    #[serde(default)]
    pub rules: Option<RulesCfg>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Rule selection under `[rules]`.
pub struct RulesCfg {
    #[serde(default)]
    pub disable: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::Output(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub scripts: Vec<String>,
    pub output: OutputFormat,
    pub disabled: Vec<RuleCode>,
    /// Entries of `disable` that name no configurable rule.
    pub unknown_rules: Vec<String>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `sqlvet.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Anchor a relative path at the current directory so that root detection
/// can walk real parents.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) if path == Path::new(".") => cwd,
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// Load `SqlvetConfig` from the first config file present under `root`.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, SqlvetConfig)>, ConfigError> {
    let Some(path) = CONFIG_FILES
        .iter()
        .map(|f| root.join(f))
        .find(|p| p.exists())
    else {
        return Ok(None);
    };
    let s = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let cfg = if path.extension().is_some_and(|e| e == "toml") {
        toml::from_str(&s).map_err(|source| ConfigError::Toml {
            path: path.clone(),
            source,
        })?
    } else {
        serde_yaml::from_str(&s).map_err(|source| ConfigError::Yaml {
            path: path.clone(),
            source,
        })?
    };
    Ok(Some((path, cfg)))
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_disable: &[String],
) -> Result<Effective, ConfigError> {
    let start = absolutize(Path::new(cli_repo_root.unwrap_or(".")));
    let repo_root = detect_repo_root(&start);
    let (config_path, cfg) = match load_config(&repo_root)? {
        Some((p, c)) => (Some(p), c),
        None => (None, SqlvetConfig::default()),
    };

    let scripts = cfg
        .scripts
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| vec!["**/*.sql".to_string()]);

    let output = OutputFormat::parse(
        cli_output
            .map(|s| s.to_string())
            .or(cfg.output)
            .as_deref()
            .unwrap_or("human"),
    )?;

    let mut disabled = Vec::new();
    let mut unknown_rules = Vec::new();
    let from_cfg = cfg.rules.map(|r| r.disable).unwrap_or_default();
    for name in from_cfg.iter().chain(cli_disable.iter()) {
        match name.parse::<RuleCode>() {
            Ok(code) if code.is_configurable() => {
                if !disabled.contains(&code) {
                    disabled.push(code);
                }
            }
            _ => unknown_rules.push(name.clone()),
        }
    }

    Ok(Effective {
        repo_root,
        config_path,
        scripts,
        output,
        disabled,
        unknown_rules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_config() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let eff = resolve_effective(dir.path().to_str(), None, &[]).unwrap();
        assert!(eff.config_path.is_none());
        assert_eq!(eff.scripts, vec!["**/*.sql".to_string()]);
        assert_eq!(eff.output, OutputFormat::Human);
        assert!(eff.disabled.is_empty());
    }

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("sqlvet.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
scripts = ["IMCUST/*.sql", "IMSDLC/*.sql"]
output = "json"
[rules]
disable = ["unbalanced-quote"]
    "#
        )
        .unwrap();
        fs::create_dir_all(root.join("IMCUST")).unwrap();

        // Resolution from a subdirectory walks up to the config file.
        let sub = root.join("IMCUST");
        let eff = resolve_effective(sub.to_str(), None, &[]).unwrap();
        assert_eq!(eff.repo_root, root);
        assert_eq!(eff.scripts.len(), 2);
        assert_eq!(eff.output, OutputFormat::Json);
        assert_eq!(eff.disabled, vec![RuleCode::UnbalancedQuote]);
    }

    #[test]
    fn test_load_yaml_and_cli_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("sqlvet.yaml"),
            "output: json\nrules:\n  disable:\n    - catalog-column\n    - file-unreadable\n    - nope\n",
        )
        .unwrap();
        let eff = resolve_effective(
            root.to_str(),
            Some("human"),
            &["catalog-column".into(), "identifier-argument".into()],
        )
        .unwrap();
        assert_eq!(eff.output, OutputFormat::Human);
        assert_eq!(
            eff.disabled,
            vec![RuleCode::CatalogColumn, RuleCode::IdentifierArgument]
        );
        assert_eq!(eff.unknown_rules, vec!["file-unreadable".to_string(), "nope".to_string()]);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("sqlvet.toml"), "scripts = [").unwrap();
        let err = resolve_effective(dir.path().to_str(), None, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn test_unknown_output_mode() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let err = resolve_effective(dir.path().to_str(), Some("xml"), &[]).unwrap_err();
        assert!(matches!(err, ConfigError::Output(_)));
    }
}
