//! Build-tools configuration stored in `build-tools.toml` at the project root.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

/// File name looked up in the working directory by both binaries.
pub const CONFIG_FILE_NAME: &str = "build-tools.toml";

/// Build-tools configuration (TOML).
///
/// Every field is optional; a missing file or section yields the commands the
/// build pipeline has always run.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildToolsConfig {
    pub lfs: LfsConfig,
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LfsConfig {
    /// LFS tool prefix; `version` and `pull` are appended (e.g. `["git","lfs"]`).
    pub command: Vec<String>,

    /// Kill the probe or pull after this many seconds. Unset waits forever.
    pub timeout_secs: Option<u64>,
}

impl Default for LfsConfig {
    fn default() -> Self {
        Self {
            command: vec!["git".to_string(), "lfs".to_string()],
            timeout_secs: None,
        }
    }
}

impl LfsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Full generator argv, run from the project root.
    pub command: Vec<String>,

    /// Kill the generator after this many seconds. Unset waits forever.
    pub timeout_secs: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: vec![
                "node".to_string(),
                "scripts/generate-content-lists.js".to_string(),
            ],
            timeout_secs: None,
        }
    }
}

impl GeneratorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl BuildToolsConfig {
    pub fn validate(&self) -> Result<()> {
        validate_command("lfs.command", &self.lfs.command)?;
        validate_timeout("lfs.timeout_secs", self.lfs.timeout_secs)?;
        validate_command("generator.command", &self.generator.command)?;
        validate_timeout("generator.timeout_secs", self.generator.timeout_secs)?;
        Ok(())
    }
}

fn validate_command(name: &str, command: &[String]) -> Result<()> {
    match command.first() {
        Some(program) if !program.trim().is_empty() => Ok(()),
        _ => Err(anyhow!("{name} must be a non-empty array")),
    }
}

fn validate_timeout(name: &str, secs: Option<u64>) -> Result<()> {
    if secs == Some(0) {
        return Err(anyhow!("{name} must be > 0"));
    }
    Ok(())
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `BuildToolsConfig::default()`.
pub fn load_config(path: &Path) -> Result<BuildToolsConfig> {
    if !path.exists() {
        return Ok(BuildToolsConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: BuildToolsConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Load `build-tools.toml` from `root`.
pub fn load_project_config(root: &Path) -> Result<BuildToolsConfig> {
    load_config(&root.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, BuildToolsConfig::default());
        assert_eq!(cfg.lfs.command, vec!["git", "lfs"]);
        assert_eq!(
            cfg.generator.command,
            vec!["node", "scripts/generate-content-lists.js"]
        );
        assert_eq!(cfg.lfs.timeout(), None);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[generator]\ncommand = [\"python3\", \"gen.py\"]\ntimeout_secs = 30\n",
        )
        .expect("write");
        let cfg = load_project_config(temp.path()).expect("load");
        assert_eq!(cfg.lfs, LfsConfig::default());
        assert_eq!(cfg.generator.command, vec!["python3", "gen.py"]);
        assert_eq!(cfg.generator.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_empty_command() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[lfs]\ncommand = []\n").expect("write");
        let err = load_config(&path).expect_err("empty command");
        assert!(format!("{err:#}").contains("lfs.command must be a non-empty array"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut cfg = BuildToolsConfig::default();
        cfg.generator.timeout_secs = Some(0);
        let err = cfg.validate().expect_err("zero timeout");
        assert!(err.to_string().contains("generator.timeout_secs"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[lfs]\ncomand = [\"git\", \"lfs\"]\n").expect("write");
        assert!(load_config(&path).is_err());
    }
}
