use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Optional configuration file looked up in the root directory.
pub const CONFIG_FILE: &str = "spectradb.json";

// ---------------------------------------------------------------------------
// Process-wide configuration, resolved once at startup
// ---------------------------------------------------------------------------

/// What to do when an object resource fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnMalformed {
    /// Abort the whole run; nothing is persisted. The original behavior.
    #[default]
    Abort,
    /// Log a warning and continue with the remaining objects.
    Skip,
}

/// Resource locations and policies, fixed for the whole run. Defaults match
/// the historical layout: `filters/` and `objects/` under the working
/// directory, output to `data.csv`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub root: PathBuf,
    pub filters: String,
    pub objects: String,
    pub output: String,
    pub on_malformed: OnMalformed,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root: PathBuf::from("."),
            filters: "filters".to_string(),
            objects: "objects".to_string(),
            output: "data.csv".to_string(),
            on_malformed: OnMalformed::default(),
        }
    }
}

impl Config {
    /// Resolve the configuration for `root`: defaults, overridden by an
    /// optional `spectradb.json` in that directory.
    pub fn resolve(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        let mut config = if path.is_file() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        } else {
            Config::default()
        };
        config.root = root.to_path_buf();
        Ok(config)
    }

    pub fn filter_dir(&self) -> PathBuf {
        self.root.join(&self.filters)
    }

    pub fn object_dir(&self) -> PathBuf {
        self.root.join(&self.objects)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output)
    }
}
