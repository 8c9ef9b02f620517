pub mod schema;
pub mod watcher;

pub use schema::{
    ChartConfig, DashConfig, DashboardConfig, DatasetConfig, DatasetKind, GlobalConfig,
    GridConfig, LinkConfig, MapConfig, Section, SidebarConfig, ThemeConfig, MAX_CAPACITY,
    MAX_INTERVAL_SECS,
};
pub use watcher::ConfigWatcher;

use dash_core::{DashError, Result};
use std::path::{Path, PathBuf};

/// Load and validate configuration from a TOML file.  Returns
/// `DashConfig::default()` if the file doesn't exist so the dashboard always
/// has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<DashConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(DashConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| DashError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Re-read the config after a change on disk.
///
/// Unlike [`load`], a missing file yields `None`: editors often replace the
/// file in two steps, and the running settings must survive the gap.
pub fn reload(path: impl AsRef<Path>) -> Result<Option<DashConfig>> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(raw) => parse(&raw).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DashError::Config(format!("cannot read '{}': {e}", path.display()))),
    }
}

/// Parse and validate a TOML document.
pub fn parse(raw: &str) -> Result<DashConfig> {
    let config: DashConfig =
        toml::from_str(raw).map_err(|e| DashError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Return the config path: `$DASH_CONFIG` if set, else
/// `$XDG_CONFIG_HOME/dash/dash.toml`.
pub fn default_path() -> PathBuf {
    if let Ok(explicit) = std::env::var("DASH_CONFIG") {
        return PathBuf::from(explicit);
    }
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("dash").join("dash.toml")
}
