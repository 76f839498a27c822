//! Persisted injection settings.
//!
//! Settings live in `config.json` beside the executable and hold, for each
//! gametype, the address of the script pointer the game dereferences and the
//! address of the buffer reserved for injected bytecode. A missing or corrupt
//! file is never an error: defaults are generated, written back, and used.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::gametype::Gametype;

/// Settings file name
pub const CONFIG_FILE: &str = "config.json";

/// Built-in multiplayer addresses
const DEFAULT_MP_POINTER: u32 = 0x01CB_0F20;
const DEFAULT_MP_BUFFER: u32 = 0x1004_0000;

/// Built-in zombies addresses
const DEFAULT_ZM_POINTER: u32 = 0x01CB_5A30;
const DEFAULT_ZM_BUFFER: u32 = 0x1004_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Defaults {
    /// Known-good location of the pointer the game follows to its script
    pub pointer_address: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customs {
    /// Writable region reserved for the injected script
    pub buffer_address: u32,
}

/// Addresses used to deploy into one gametype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GametypeProfile {
    pub defaults: Defaults,
    pub customs: Customs,
}

impl GametypeProfile {
    pub const fn new(pointer_address: u32, buffer_address: u32) -> Self {
        Self {
            defaults: Defaults { pointer_address },
            customs: Customs { buffer_address },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "MP")]
    pub mp: GametypeProfile,
    #[serde(rename = "ZM")]
    pub zm: GametypeProfile,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            mp: GametypeProfile::new(DEFAULT_MP_POINTER, DEFAULT_MP_BUFFER),
            zm: GametypeProfile::new(DEFAULT_ZM_POINTER, DEFAULT_ZM_BUFFER),
        }
    }
}

impl Configuration {
    pub fn profile(&self, gametype: Gametype) -> &GametypeProfile {
        match gametype {
            Gametype::Mp => &self.mp,
            Gametype::Zm => &self.zm,
        }
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// Defaults were generated because the file could not be used
    Generated { reason: String },
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Generated { reason } => write!(f, "generated defaults ({})", reason),
        }
    }
}

/// Loads and persists [`Configuration`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Store for `config.json` in the directory of the running executable.
    ///
    /// Falls back to the working directory when the executable path is unknown.
    pub fn beside_executable() -> Self {
        let dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        match dir {
            Some(dir) => Self::new(dir.join(CONFIG_FILE)),
            None => {
                warn!("Could not resolve executable directory, using working directory");
                Self::new(CONFIG_FILE)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, regenerating defaults on any failure.
    pub fn load(&self) -> Configuration {
        self.load_with_source().0
    }

    /// Load settings and report whether defaults had to be generated.
    pub fn load_with_source(&self) -> (Configuration, ConfigSource) {
        match self.read() {
            Ok(config) => {
                debug!("Loaded settings from {}", self.path.display());
                (config, ConfigSource::File)
            }
            Err(reason) => {
                info!(
                    "Could not read settings from {} ({}), generating defaults",
                    self.path.display(),
                    reason
                );
                let config = Configuration::default();
                if let Err(e) = self.save(&config) {
                    warn!(
                        "Failed to write default settings to {}: {}",
                        self.path.display(),
                        e
                    );
                }
                (config, ConfigSource::Generated { reason })
            }
        }
    }

    fn read(&self) -> Result<Configuration, String> {
        let content = fs::read_to_string(&self.path).map_err(|e| e.to_string())?;
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }

    /// Write settings through a temporary file so a partial write never
    /// replaces the previous file.
    pub fn save(&self, config: &Configuration) -> std::io::Result<()> {
        let content = serde_json::to_string_pretty(config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
