use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_TTL_SECS;
use crate::center::CenterStrategy;
use crate::error::{Error, Result};
use crate::grid::{GRID_SIZE, MAX_GRID_SIZE};
use crate::tooltip::TooltipPlacer;

/// Runtime settings, read from an optional JSON file. Missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid_size: usize,
    pub strategy: CenterStrategy,
    pub tooltip: TooltipPlacer,
    pub cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            strategy: CenterStrategy::Density,
            tooltip: TooltipPlacer::default(),
            cache_ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p,
        None => return Ok(Config::default()),
    };
    let contents = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&contents).map_err(|e| {
        Error::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    })?;
    if config.grid_size == 0 || config.grid_size > MAX_GRID_SIZE {
        return Err(Error::Config {
            path: path.display().to_string(),
            reason: format!("grid_size must be between 1 and {}", MAX_GRID_SIZE),
        });
    }
    Ok(config)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("mapview-{}-{}.json", name, std::process::id()));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn no_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.tooltip.padding, 16.0);
        assert_eq!(config.cache_ttl_secs, 86_400);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let path = write_temp("partial", r#"{"strategy": "largest-cluster", "tooltip": {"gap": 8}}"#);
        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.strategy, CenterStrategy::LargestCluster);
        assert_eq!(config.tooltip.gap, 8.0);
        assert_eq!(config.tooltip.padding, 16.0);
        assert_eq!(config.grid_size, 20);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_bad_files() {
        let path = write_temp("bad", r#"{"grid_size": 0}"#);
        assert!(matches!(load_config(Some(path.as_path())), Err(Error::Config { .. })));
        let _ = fs::remove_file(&path);
        let path = write_temp("huge", r#"{"grid_size": 8589934592}"#);
        assert!(matches!(load_config(Some(path.as_path())), Err(Error::Config { .. })));
        let _ = fs::remove_file(&path);
        let path = write_temp("garbage", "grid_size = 3");
        assert!(matches!(load_config(Some(path.as_path())), Err(Error::Config { .. })));
        let _ = fs::remove_file(path);
        assert!(matches!(load_config(Some(Path::new("/nonexistent/mapview.json"))),
                         Err(Error::Io(_))));
    }
}
