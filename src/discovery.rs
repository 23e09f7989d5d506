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

//! # Plug-in Discovery
//!
//! Scans plug-in search paths for definition files.
//!
//! ## Scan Rules
//!
//! - Each path is listed non-recursively; files are visited in file-name
//!   order, paths in registration order.
//! - Files whose name starts with `_` are hidden and skipped.
//! - Only `.json`, `.yaml` and `.yml` files are read.
//! - A file that cannot be read or parsed is skipped with a warning; one bad
//!   file never fails the scan.
//!
//! Every scan reads the disk again. Nothing from a previous scan is reused,
//! so a deleted or renamed file can never leave a stale definition behind.

pub mod factory;
pub(crate) mod package;

use std::fs;
use std::path::{Path, PathBuf};

pub use factory::{PlixBodyFactory, PlixFactoryRegistry};
pub use package::load_plugin_definitions;

use crate::plugin::PlixPluginDefinition;

/// Prefix marking a definition file as hidden.
pub const PLIX_HIDDEN_PREFIX: char = '_';

/// Definition files found directly inside `dir`, sorted by file name.
pub fn definition_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!(
                "plix.discover.path_unreadable: skipping plugin path - path={}, error={}",
                dir.display(),
                err
            );
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| !name.starts_with(PLIX_HIDDEN_PREFIX))
                .unwrap_or(false)
        })
        .filter(|path| package::is_definition_file(path))
        .collect();
    files.sort();
    files
}

/// Loads every definition found under `paths`, in scan order.
pub fn discover_definitions(
    paths: &[PathBuf],
    factories: &PlixFactoryRegistry,
) -> Vec<PlixPluginDefinition> {
    let mut definitions = Vec::new();
    for dir in paths {
        for file in definition_files(dir) {
            match load_plugin_definitions(&file, factories) {
                Ok(found) => {
                    log::debug!(
                        "plix.discover.file: loaded definitions - path={}, count={}",
                        file.display(),
                        found.len()
                    );
                    definitions.extend(found);
                }
                Err(err) => {
                    log::warn!(
                        "plix.discover.file_skipped: could not load definitions - path={}, error={}",
                        file.display(),
                        err
                    );
                }
            }
        }
    }
    definitions
}
