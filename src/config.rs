//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Plix.
//! The Plix project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! Registry configuration: hosts, plug-in search paths and log level.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::errors::{PlixError, Result};

/// Environment variable read for extra plug-in search paths.
pub const PLIX_PLUGIN_PATH_ENV: &str = "PLIX_PLUGIN_PATH";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlixConfig {
    pub hosts: Vec<String>,
    pub plugin_paths: Vec<PathBuf>,
    /// Variable holding extra search paths, split with the platform path
    /// separator. `None` disables environment seeding.
    pub path_env: Option<String>,
    pub log_level: String,
}

impl Default for PlixConfig {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            plugin_paths: Vec::new(),
            path_env: Some(PLIX_PLUGIN_PATH_ENV.to_string()),
            log_level: "info".to_string(),
        }
    }
}

impl PlixConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: &str) -> Self {
        self.hosts.push(host.to_string());
        self
    }

    pub fn plugin_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.plugin_paths.push(path.into());
        self
    }

    pub fn path_env(mut self, name: Option<&str>) -> Self {
        self.path_env = name.map(str::to_string);
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    /// Loads a configuration file, choosing YAML for `.yaml`/`.yml` and JSON
    /// otherwise.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&text)?),
            _ => Ok(serde_json::from_str(&text)?),
        }
    }

    /// Paths from the configured environment variable, in order.
    pub fn env_plugin_paths(&self) -> Vec<PathBuf> {
        let Some(name) = self.path_env.as_deref() else {
            return Vec::new();
        };
        match env::var_os(name) {
            Some(value) => env::split_paths(&value)
                .filter(|path| !path.as_os_str().is_empty())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Configured paths followed by environment paths.
    pub fn resolved_plugin_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.plugin_paths.clone();
        paths.extend(self.env_plugin_paths());
        paths
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| PlixError::validation(format!("unknown log level: {}", self.log_level)))
    }

    /// Caps the `log` facade at the configured level.
    pub fn apply_log_level(&self) -> Result<()> {
        log::set_max_level(self.level_filter()?);
        Ok(())
    }
}
