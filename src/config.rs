//! Configuration file handling for handy.
//!
//! The configuration file is stored at `$HANDY_HOME/config.json`. Every setting has a default, so
//! a missing file is not an error: commands run with the defaults until `handy init` writes a file
//! that can be edited.

use crate::organize::CategoryTable;
use crate::{utils, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "handy";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const TODO_JSON: &str = "tareas.json";
const TOP_PRODUCTS: usize = 5;
const WEB_PORT: u16 = 5000;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$HANDY_HOME` and from there it loads `$HANDY_HOME/config.json`, if present. It
/// resolves the paths of the files the tools read and write.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory and writes a `config.json` with default settings. An existing
    /// config file is left untouched and loaded instead.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or an existing config file is invalid.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the handy home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = if utils::is_file(&config_path).await? {
            debug!("Keeping existing config file {}", config_path.display());
            ConfigFile::load(&config_path).await?
        } else {
            let config_file = ConfigFile::default();
            config_file.save(&config_path).await?;
            config_file
        };

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// Loads `$HANDY_HOME/config.json`. When the file does not exist the defaults are used and
    /// nothing is written. The home directory itself does not need to exist.
    pub async fn load(handy_home: impl Into<PathBuf>) -> Result<Self> {
        let root = handy_home.into();
        let config_path = root.join(CONFIG_JSON);
        let config_file = if utils::is_file(&config_path).await? {
            ConfigFile::load(&config_path).await?
        } else {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            ConfigFile::default()
        };
        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The JSON file holding the to-do list. Defaults to `$HANDY_HOME/tareas.json`.
    pub fn todo_file(&self) -> PathBuf {
        self.resolve(
            self.config_file
                .todo_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(TODO_JSON)),
        )
    }

    /// Where sales charts are written when `--out` is not given. `None` means the current
    /// directory.
    pub fn sales_output_dir(&self) -> Option<PathBuf> {
        self.config_file
            .sales_output_dir
            .clone()
            .map(|p| self.resolve(p))
    }

    pub fn top_products(&self) -> usize {
        self.config_file.top_products
    }

    pub fn web_port(&self) -> u16 {
        self.config_file.web_port
    }

    /// The organizer's category table, or the built-in one if the config has none.
    pub fn categories(&self) -> CategoryTable {
        self.config_file.categories.clone().unwrap_or_default()
    }

    /// Checks if `p` is relative, and if so, resolves it against the home directory. Returns it
    /// unchanged if it is absolute.
    fn resolve(&self, p: PathBuf) -> PathBuf {
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "handy",
///   "config_version": 1,
///   "todo_file": "tareas.json",
///   "sales_output_dir": "reports",
///   "top_products": 5,
///   "web_port": 5000
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "handy"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the to-do JSON file (optional, relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    todo_file: Option<PathBuf>,

    /// Default output directory for sales charts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sales_output_dir: Option<PathBuf>,

    /// How many products the sales report ranks
    #[serde(default = "default_top_products")]
    top_products: usize,

    /// Port for `handy todo serve`
    #[serde(default = "default_web_port")]
    web_port: u16,

    /// Replaces the built-in organizer categories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    categories: Option<CategoryTable>,
}

fn default_top_products() -> usize {
    TOP_PRODUCTS
}

fn default_web_port() -> u16 {
    WEB_PORT
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            todo_file: None,
            sales_output_dir: None,
            top_products: TOP_PRODUCTS,
            web_port: WEB_PORT,
            categories: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if `app_name` is not "handy".
    async fn load(path: &Path) -> Result<Self> {
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Unable to load the config file")?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    async fn save(&self, path: &Path) -> Result<()> {
        utils::serialize(path, self)
            .await
            .context("Unable to write config file")
    }
}
