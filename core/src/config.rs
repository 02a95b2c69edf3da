use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "HEATLOG_DIR";
const DATA_DIR_NAME: &str = ".heatlog";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub trend_days: usize,
    pub trend_weeks: usize,
    pub breakdown_days: usize,
    pub stats_days: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            trend_days: 30,
            trend_weeks: 12,
            breakdown_days: 30,
            stats_days: 30,
        }
    }
}

impl Config {
    /// Resolves the data dir (explicit, then `HEATLOG_DIR`, then `~/.heatlog`)
    /// and reads `config.json` from it when present.
    pub fn load(explicit_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = resolve_data_dir(explicit_dir)?;
        Self::load_from(&data_dir)
    }

    pub fn load_from(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str::<Config>(&content)
                .with_context(|| format!("Malformed config file {}", path.display()))?
        } else {
            Config::default()
        };
        config.data_dir = data_dir.to_path_buf();
        Ok(config)
    }
}

pub fn resolve_data_dir(explicit_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit_dir {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(DATA_DIR_NAME))
}
