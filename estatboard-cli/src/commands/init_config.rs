use anyhow::{Context, Result};
use estatboard::config::{default_config_path, expand_tilde};
use estatboard::Config;
use std::path::{Path, PathBuf};

/// Write the default configuration, refusing to clobber an existing file
/// unless `force` is set.
pub fn run_init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let path = resolve(path)?;
    write_default(&path, force)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn resolve(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => expand_tilde(path),
        None => Ok(default_config_path()),
    }
}

fn write_default(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }
    Config::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_loadable_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default(&path, false).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.aggregation.cutoff, 4);
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://stats.local/api\"\n").unwrap();

        assert!(write_default(&path, false).is_err());
        write_default(&path, true).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000/api");
    }
}
