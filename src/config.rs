//! Configuration surface and startup capability checks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Fixed suffix appended to the configuration name when no explicit
/// report destination is configured. Kept for compatibility with
/// historical report locations.
pub const REPORT_SUFFIX: &str = "_statistics.html";

/// Which chart rendering collaborator to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RendererKind {
    /// Google Image Charts URL construction.
    #[default]
    GoogleImageCharts,
    /// No renderer available; report generation fails fast.
    Disabled,
}

/// Process configuration. All paths are explicit values handed to
/// component constructors; defaults derive from `config_name` only.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Logical name of this process configuration.
    #[serde(default = "default_config_name")]
    pub config_name: String,

    /// Statistics database path. Default: `<config_name>.db`.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Report destination path. Default: `<config_name>_statistics.html`.
    #[serde(default)]
    pub report_path: Option<PathBuf>,

    #[serde(default)]
    pub renderer: RendererKind,
}

fn default_config_name() -> String {
    "fetchstat".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_name: default_config_name(),
            db_path: None,
            report_path: None,
            renderer: RendererKind::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Effective database path.
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.db", self.config_name)))
    }

    /// Effective report destination.
    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}{}", self.config_name, REPORT_SUFFIX)))
    }
}

/// Typed availability flags, probed once at startup. Replaces call-time
/// dependency sniffing: entrypoints consult these and fail fast.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub storage: bool,
    pub renderer: bool,
}

impl Capabilities {
    /// Probe the configured collaborators. The storage check opens (and
    /// immediately drops) a pool so schema problems surface at startup
    /// rather than mid-run.
    pub fn probe(config: &Config) -> Self {
        let db_path = config.db_path();
        let storage = match crate::storage::open_pool(&db_path) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(db = %db_path.display(), %err, "statistics store unavailable");
                false
            }
        };

        let renderer = config.renderer != RendererKind::Disabled;
        if !renderer {
            tracing::warn!("chart renderer disabled; report generation will fail fast");
        }

        Self { storage, renderer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_derive_from_config_name() {
        let config = Config {
            config_name: "anime".to_string(),
            ..Config::default()
        };
        assert_eq!(config.db_path(), PathBuf::from("anime.db"));
        assert_eq!(config.report_path(), PathBuf::from("anime_statistics.html"));
    }

    #[test]
    fn test_explicit_paths_win() {
        let config = Config {
            config_name: "anime".to_string(),
            db_path: Some(PathBuf::from("/var/lib/stats.db")),
            report_path: Some(PathBuf::from("/srv/www/stats.html")),
            renderer: RendererKind::GoogleImageCharts,
        };
        assert_eq!(config.db_path(), PathBuf::from("/var/lib/stats.db"));
        assert_eq!(config.report_path(), PathBuf::from("/srv/www/stats.html"));
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            config_name = "tv"
            renderer = "disabled"
            "#,
        )
        .unwrap();
        assert_eq!(config.config_name, "tv");
        assert_eq!(config.renderer, RendererKind::Disabled);
    }

    #[test]
    fn test_probe_flags_disabled_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            config_name: "probe".to_string(),
            db_path: Some(dir.path().join("probe.db")),
            renderer: RendererKind::Disabled,
            ..Config::default()
        };
        let caps = Capabilities::probe(&config);
        assert!(caps.storage);
        assert!(!caps.renderer);
    }
}
