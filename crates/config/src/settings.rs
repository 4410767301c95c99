use crate::Options;
use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

const APPLICATION: &str = "file-metadata";
const ENV_PREFIX: &str = "FILE_METADATA_";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APPLICATION)
}

/// Process-wide settings shared by every file handle.
///
/// Loaded from (later sources win):
/// 1. built-in defaults,
/// 2. `config.toml`, `config.yaml` and `config.json` in the user config
///    directory,
/// 3. `FILE_METADATA_*` environment variables, using `__` to reach nested
///    keys (`FILE_METADATA_OPTIONS__RASTER_DPI=150`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Where downloaded auxiliary files (models, jars) are kept.
    pub data_dir: PathBuf,
    /// Option overrides applied on top of every variant's defaults.
    #[serde(default)]
    pub options: Options,
}
impl Default for Settings {
    fn default() -> Self {
        let data_dir = match project_dirs() {
            Some(dirs) => dirs.data_dir().to_path_buf(),
            None => {
                let fallback = std::env::temp_dir().join(APPLICATION);
                tracing::warn!(fallback = %fallback.display(), "No home directory found; using temporary data directory");
                fallback
            },
        };
        Self { data_dir, options: Options::new() }
    }
}
impl Settings {
    /// Load settings from the user's config directory and environment.
    #[instrument]
    pub fn load() -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(dirs) = project_dirs() {
            let dir = dirs.config_dir();
            tracing::debug!(dir = %dir.display(), "Reading settings files");
            figment = figment
                .merge(Toml::file(dir.join("config.toml")))
                .merge(Yaml::file(dir.join("config.yaml")))
                .merge(Json::file(dir.join("config.json")));
        }
        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        figment.extract().or_raise(|| ErrorKind::Load)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// A path inside the data directory.
    ///
    /// The data directory itself is created if missing; `relative` is only
    /// joined, never created.
    pub fn data_path(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.data_dir).or_raise(|| ErrorKind::DataDirectory(self.data_dir.clone()))?;
        Ok(self.data_dir.join(relative))
    }

    /// A sub-directory of the data directory, created if missing.
    pub fn data_subdir(&self, name: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = self.data_path(name)?;
        std::fs::create_dir_all(&dir).or_raise(|| ErrorKind::DataDirectory(dir.clone()))?;
        Ok(dir)
    }
}
