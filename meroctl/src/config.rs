use crate::output::OutputFormat;
use anyhow::{Context, Result, anyhow};
use libmero::view::SortOrder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::{
    fs::{File, create_dir_all, read_to_string},
    io::AsyncWriteExt,
};
use tracing::debug;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// The sort order used for listings when none is given on the command line
    pub(crate) default_sort: SortOrder,
    /// The output format used when none is given on the command line
    pub(crate) output: OutputFormat,
    /// Whether a new session starts out with the example sample
    pub(crate) seed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_sort: SortOrder::default(),
            output: OutputFormat::default(),
            seed: true,
        }
    }
}

impl Config {
    fn parse(contents: String) -> Result<Self> {
        serde_json::from_str(&contents).with_context(|| "Couldn't parse json string")
    }

    pub(crate) fn format(&self) -> Result<String> {
        serde_json::to_string_pretty(self).with_context(|| "Couldn't convert config to json")
    }

    pub(crate) async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        debug!(?p, "Trying to load config");
        let contents = read_to_string(path).await?;
        Self::parse(contents)
    }

    /// Load the configuration file, falling back to the defaults if it doesn't exist
    pub(crate) async fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match Self::load_from_file(path).await {
            Ok(cfg) => Ok(cfg),
            Err(e) => match e.downcast_ref::<std::io::Error>() {
                Some(ioerr) if ioerr.kind() == std::io::ErrorKind::NotFound => {
                    debug!(?path, "No config file found, using defaults");
                    Ok(Self::default())
                }
                _ => Err(e.context(format!("Failed to load config from {}", path.display()))),
            },
        }
    }

    pub(crate) async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!(?path, "Saving config");
        if let Some(dir) = path.parent() {
            create_dir_all(dir).await?;
        }
        let mut file = File::create(path).await?;
        let serialized = self.format()?;
        file.write_all(serialized.as_bytes())
            .await
            .with_context(|| "Failed to write config file")?;
        Ok(())
    }
}

/// The default location of the configuration file
pub(crate) fn config_file() -> Result<PathBuf> {
    directories::ProjectDirs::from("org", "merobase", "meroctl")
        .map(|dirs| dirs.config_dir().join("config.json"))
        .ok_or_else(|| anyhow!("Unable to determine the configuration directory"))
}
