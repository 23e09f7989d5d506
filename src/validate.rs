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

//! Compatibility gate applied before a plug-in enters the registry.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. the plug-in is invocable (not abstract)
//! 2. `hosts`, `families` and `requires` were declared in a usable shape
//! 3. `hosts` is the wildcard or names one of the registered hosts
//! 4. the running engine version satisfies `requires`

use crate::errors::{PlixError, Result};
use crate::plugin::PlixPlugin;
use crate::version::engine_version;

/// Validates `plugin` against the registered `hosts`.
pub fn validate_plugin(plugin: &PlixPlugin, hosts: &[String]) -> Result<()> {
    if plugin.is_abstract() {
        return Err(PlixError::NotInvocable(plugin.name().to_string()));
    }

    if !plugin.problems().is_empty() {
        return Err(PlixError::malformed(plugin.name(), plugin.problems().join("; ")));
    }

    if !plugin.hosts().intersects(hosts) {
        return Err(PlixError::UnsupportedHost {
            plugin: plugin.name().to_string(),
            hosts: hosts.to_vec(),
        });
    }

    if let Some(requirement) = plugin.requires() {
        let running = engine_version();
        if !requirement.matches(&running) {
            return Err(PlixError::UnsupportedVersion {
                plugin: plugin.name().to_string(),
                requirement: requirement.to_string(),
                running: running.to_string(),
            });
        }
    }

    Ok(())
}
