//! Script loading and discovery.

use crate::error::{ConfigError, LoadError};
use crate::models::Script;
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};

impl Script {
    /// Read a script from disk; `id` is the identifier findings will carry.
    pub fn load(path: &Path, id: impl Into<String>) -> Result<Script, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Script::new(id, content))
    }
}

/// Expand glob patterns relative to `root`; sorted and de-duplicated.
pub fn discover(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, ConfigError> {
    let mut out = Vec::new();
    for pat in patterns {
        let pattern = root.join(pat).to_string_lossy().to_string();
        let entries = glob(&pattern).map_err(|source| ConfigError::Pattern {
            pattern: pat.clone(),
            source,
        })?;
        for entry in entries.flatten() {
            if entry.is_file() {
                out.push(entry);
            }
        }
    }
    out.sort();
    out.dedup();
    tracing::debug!(count = out.len(), "discovered scripts");
    Ok(out)
}

/// Display identifier for `path`: relative to `root` when it lives below it.
pub fn identify(root: &Path, path: &Path) -> String {
    match pathdiff::diff_paths(path, root) {
        Some(rel) if !rel.starts_with("..") && !rel.as_os_str().is_empty() => {
            rel.to_string_lossy().to_string()
        }
        _ => path.to_string_lossy().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_discover_sorted_and_deduped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("b/2.sql"), "SELECT 2;").unwrap();
        fs::write(root.join("a.sql"), "SELECT 1;").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();

        let found = discover(root, &["**/*.sql".into(), "a.sql".into()]).unwrap();
        let ids: Vec<_> = found.iter().map(|p| identify(root, p)).collect();
        assert_eq!(ids, vec!["a.sql".to_string(), format!("b{}2.sql", std::path::MAIN_SEPARATOR)]);
    }

    #[test]
    fn test_bad_pattern_is_config_error() {
        let dir = tempdir().unwrap();
        let err = discover(dir.path(), &["[".into()]).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.sql");
        let err = Script::load(&path, "missing.sql").unwrap_err();
        assert!(err.to_string().contains("missing.sql"));
    }

    #[test]
    fn test_identify_outside_root_keeps_path() {
        let root = Path::new("/repo");
        assert_eq!(identify(root, Path::new("/repo/x/y.sql")), "x/y.sql");
        assert_eq!(identify(root, Path::new("/elsewhere/y.sql")), "/elsewhere/y.sql");
    }
}
