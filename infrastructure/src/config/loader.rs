//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["quizsolver.toml", ".quizsolver.toml"];
const ENV_PREFIX: &str = "QUIZSOLVER_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. `QUIZSOLVER_SOLVER__MAX_EPOCHS` style environment variables
    /// 3. Project root: `./quizsolver.toml` or `./.quizsolver.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/quizsolver/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load a single file on top of the defaults, ignoring every other source
    pub fn load_file(path: &Path) -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/quizsolver/config.toml if set,
    /// otherwise the platform's configuration directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("quizsolver").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        if let Some(path) = config_path {
            let found = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{found:^7}] Explicit: {}", path.display());
        }

        println!("  [       ] Environment: {ENV_PREFIX}<SECTION>__<KEY>");

        match Self::project_config_path() {
            Some(path) => println!("  [ FOUND ] Project: {}", path.display()),
            None => println!("  [       ] Project: ./quizsolver.toml or ./.quizsolver.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            let found = if path.exists() { " FOUND " } else { "       " };
            println!("  [{found}] Global:  {}", path.display());
        }

        println!("  [       ] Default: built-in defaults");
    }
}
