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

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::{PlixError, Result};
use crate::plugin::PlixEntryPoint;

fn _entries(config: &Value, factory: &str) -> Result<Map<String, Value>> {
    config
        .as_object()
        .ok_or_else(|| PlixError::validation(format!("{factory} config must be object")))?
        .get("entries")
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| PlixError::validation(format!("{factory} requires object 'entries'")))
}

/// Copies `entries` into the context's data.
pub fn context_set_factory(config: &Value) -> Result<PlixEntryPoint> {
    let entries = _entries(config, "context.set")?;
    Ok(PlixEntryPoint::context(move |context, log| {
        for (key, value) in &entries {
            context.data.insert(key.clone(), value.clone());
        }
        log.debug(format!("set {} context key(s)", entries.len()));
        Ok(())
    }))
}

#[derive(Clone, Debug, Deserialize)]
struct InstanceEntry {
    name: String,
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct InstanceCreateConfig {
    instances: Vec<InstanceEntry>,
}

/// Creates one instance per entry of `instances`.
pub fn instance_create_factory(config: &Value) -> Result<PlixEntryPoint> {
    let parsed: InstanceCreateConfig = serde_json::from_value(config.clone())?;
    let entries = parsed.instances;
    Ok(PlixEntryPoint::context(move |context, log| {
        for entry in &entries {
            let instance = match &entry.family {
                Some(family) => context.create_asset(&entry.name, family),
                None => context.create_instance(&entry.name),
            };
            for (key, value) in &entry.data {
                instance.data.insert(key.clone(), value.clone());
            }
            log.info(format!("collected instance '{}'", entry.name));
        }
        Ok(())
    }))
}

/// Copies `entries` into the instance's data.
pub fn instance_set_factory(config: &Value) -> Result<PlixEntryPoint> {
    let entries = _entries(config, "instance.set")?;
    Ok(PlixEntryPoint::instance(move |instance, _log| {
        for (key, value) in &entries {
            instance.data.insert(key.clone(), value.clone());
        }
        Ok(())
    }))
}

/// Fails the invocation when any of `keys` is missing from the instance.
pub fn instance_require_factory(config: &Value) -> Result<PlixEntryPoint> {
    let keys = config
        .as_object()
        .ok_or_else(|| PlixError::validation("instance.require config must be object"))?
        .get("keys")
        .and_then(Value::as_array)
        .ok_or_else(|| PlixError::validation("instance.require requires array 'keys'"))?
        .iter()
        .map(|v| {
            v.as_str()
                .ok_or_else(|| PlixError::validation("keys must be strings"))
                .map(|s| s.to_string())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PlixEntryPoint::instance(move |instance, _log| {
        let missing: Vec<&str> = keys
            .iter()
            .filter(|key| !instance.data.contains_key(key.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            anyhow::bail!(
                "instance '{}' is missing required key(s): {}",
                instance.name(),
                missing.join(", ")
            );
        }
        Ok(())
    }))
}
