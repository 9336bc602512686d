/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::path::Path;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::message::SfdsError;
use crate::topology::Topology;

/// Configuration for the SFDS signal system
///
/// Loaded from TOML files in XDG-compliant directories. Every section is
/// optional; missing values take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SfdsConfig {
    /// Topology used when the builder is not given one
    pub topology: Topology,
    /// Limits and capacity configuration
    pub limits: LimitsConfig,
    /// Default ids used by the shorthand send/receive calls
    pub defaults: DefaultsConfig,
    /// Behavioral configuration switches
    pub behavior: BehaviorConfig,
}

/// Limits and capacity configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Registration cap recorded on every topology channel; `0` is unlimited
    pub registration_cap: usize,
}

/// Default values configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Session id used by `Generator::send` and `Receiver::receive`
    pub session_id: String,
    /// Channel id used by `Generator::send` and `Receiver::receive`; blank selects the first channel
    pub channel_id: String,
}

/// Behavioral configuration switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Report session supersession at info level instead of trace
    pub log_supersession: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            log_supersession: true,
        }
    }
}

impl SfdsConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SfdsError::Config`] when the text is not valid TOML or does
    /// not match the configuration schema.
    pub fn from_toml_str(text: &str) -> Result<Self, SfdsError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SfdsError::Config`] when the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SfdsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load configuration from XDG-compliant locations
    ///
    /// Looks for `sfds/config.toml` under `$XDG_CONFIG_HOME` (falling back to
    /// `~/.config`) and the XDG config dirs.
    ///
    /// If no configuration file is found, returns the default configuration.
    /// If a configuration file exists but is malformed, logs an error and uses defaults.
    pub fn load() -> Self {
        use tracing::{error, info};

        let xdg_dirs = match xdg::BaseDirectories::with_prefix("sfds") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        let Some(path) = xdg_dirs.find_config_file("config.toml") else {
            info!("No configuration file found, using defaults");
            return Self::default();
        };

        info!("Loading configuration from: {}", path.display());
        match Self::from_path(&path) {
            Ok(config) => {
                info!("Successfully loaded configuration");
                config
            }
            Err(e) => {
                error!("Failed to load configuration file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations
    pub static ref CONFIG: SfdsConfig = SfdsConfig::load();
}
