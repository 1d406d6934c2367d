use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use cloudkeep_alarms::config::{load_from_file, ReconcilerConfig};
use std::path::{Path, PathBuf};

pub fn default_config_path() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        return dir.join("cloudkeep").join("alarms.yml");
    }
    PathBuf::from("/etc/cloudkeep/alarms.yml")
}

/// Explicit path must exist; the default path is optional and falls back to
/// built-in defaults.
pub fn load_config(config_path: Option<&str>) -> Result<ReconcilerConfig> {
    if let Some(path) = config_path {
        return load_from_file(Path::new(path))
            .with_context(|| format!("loading config from {path}"));
    }

    let path = default_config_path();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ReconcilerConfig::default());
    }
    load_from_file(&path).with_context(|| format!("loading config from {}", path.display()))
}

pub async fn aws_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}

/// `data` is either a path to a JSON file or inline JSON.
pub fn parse_json_data(data: &str) -> Result<serde_json::Value> {
    let path = Path::new(data);
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        return serde_json::from_str(&content)
            .with_context(|| format!("parsing JSON from {}", path.display()));
    }
    serde_json::from_str(data).context("parsing inline JSON")
}
