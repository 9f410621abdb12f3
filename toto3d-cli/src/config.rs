use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use toto3d_db::db::db_path;
use toto3d_db::models::Market;

pub const DEFAULT_CONFIG: &str = "toto3d.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: PathBuf,
    pub default_market: Market,
    pub show_backtest_steps: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: db_path(),
            default_market: Market::HongkongPools,
            show_backtest_steps: true,
        }
    }
}

/// File yang tidak ada bukan kesalahan: nilai bawaan dipakai.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(?path, "file konfigurasi tidak ada, memakai bawaan");
        return Ok(AppConfig::default());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Tidak bisa membaca konfigurasi {:?}", path))?;
    let config: AppConfig = serde_json::from_str(&json)
        .with_context(|| format!("Konfigurasi {:?} tidak valid", path))?;
    Ok(config)
}

pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .with_context(|| format!("Tidak bisa menulis konfigurasi {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("toto3d-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config(&temp_path("tidak-ada")).unwrap();
        assert_eq!(config.default_market, Market::HongkongPools);
        assert!(config.show_backtest_steps);
        assert!(config.database.ends_with("toto3d.db"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, r#"{ "default_market": "sydney_lotto" }"#).unwrap();
        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.default_market, Market::SydneyLotto);
        assert!(config.show_backtest_steps);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let config = AppConfig {
            database: PathBuf::from("/tmp/pasaran.db"),
            default_market: Market::SydneyPools,
            show_backtest_steps: false,
        };
        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.database, PathBuf::from("/tmp/pasaran.db"));
        assert_eq!(loaded.default_market, Market::SydneyPools);
        assert!(!loaded.show_backtest_steps);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let path = temp_path("invalid");
        std::fs::write(&path, "{ bukan json").unwrap();
        let result = load_config(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
