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

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::discovery::factory::PlixFactoryRegistry;
use crate::errors::{PlixError, Result};
use crate::plugin::{
    PlixAction, PlixContextFn, PlixEntryPoint, PlixInstanceFn, PlixPluginDefinition,
};

#[derive(Debug, Deserialize)]
struct PlixBodyFile {
    factory: String,
    #[serde(default)]
    config: Value,
}

impl PlixBodyFile {
    fn into_entry(self, factories: &PlixFactoryRegistry) -> Result<PlixEntryPoint> {
        factories.build(&self.factory, &self.config)
    }

    fn into_context_fn(self, factories: &PlixFactoryRegistry, slot: &str) -> Result<PlixContextFn> {
        let factory = self.factory.clone();
        match self.into_entry(factories)? {
            PlixEntryPoint::Context(body) => Ok(body),
            other => Err(PlixError::validation(format!(
                "{slot} needs a context body, factory '{factory}' builds {:?}",
                other.signature()
            ))),
        }
    }

    fn into_instance_fn(
        self,
        factories: &PlixFactoryRegistry,
        slot: &str,
    ) -> Result<PlixInstanceFn> {
        let factory = self.factory.clone();
        match self.into_entry(factories)? {
            PlixEntryPoint::Instance(body) => Ok(body),
            other => Err(PlixError::validation(format!(
                "{slot} needs an instance body, factory '{factory}' builds {:?}",
                other.signature()
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlixActionFile {
    name: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    on: Option<String>,
    #[serde(default)]
    process: Option<PlixBodyFile>,
}

impl PlixActionFile {
    fn into_runtime(self, factories: &PlixFactoryRegistry) -> Result<PlixAction> {
        let mut action = match self.kind.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("action") => PlixAction::new(self.name),
            Some("category") => PlixAction::category(self.name),
            Some("separator") => PlixAction::separator(),
            Some(other) => {
                return Err(PlixError::validation(format!("unknown action kind: {}", other)));
            }
        };
        if let Some(label) = self.label {
            action = action.label(label);
        }
        if let Some(icon) = self.icon {
            action = action.icon(icon);
        }
        if let Some(on) = self.on {
            action = action.on(&on);
        }
        if let Some(body) = self.process {
            action = action.with_entry(body.into_context_fn(factories, "action process")?);
        }
        Ok(action)
    }
}

#[derive(Debug, Deserialize)]
struct PlixPluginFile {
    name: String,
    #[serde(default = "default_kind")]
    kind: String,
    #[serde(default)]
    order: Option<f64>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    hosts: Option<Value>,
    #[serde(default)]
    families: Option<Value>,
    #[serde(default)]
    requires: Option<Value>,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
    #[serde(default)]
    process: Option<PlixBodyFile>,
    #[serde(default)]
    repair: Option<PlixBodyFile>,
    #[serde(default)]
    process_context: Option<PlixBodyFile>,
    #[serde(default)]
    process_instance: Option<PlixBodyFile>,
    #[serde(default)]
    repair_context: Option<PlixBodyFile>,
    #[serde(default)]
    repair_instance: Option<PlixBodyFile>,
    #[serde(default)]
    actions: Vec<PlixActionFile>,
}

fn default_kind() -> String {
    "plugin".to_string()
}

impl PlixPluginFile {
    fn into_definition(
        self,
        factories: &PlixFactoryRegistry,
        source: &Path,
    ) -> Result<PlixPluginDefinition> {
        let name = self.name;
        let mut definition = match self.kind.to_ascii_lowercase().as_str() {
            "plugin" => PlixPluginDefinition::new(name),
            "context" | "contextplugin" => PlixPluginDefinition::context_plugin(name),
            "instance" | "instanceplugin" => PlixPluginDefinition::instance_plugin(name),
            "selector" => PlixPluginDefinition::selector(name),
            "collector" => PlixPluginDefinition::collector(name),
            "validator" => PlixPluginDefinition::validator(name),
            "extractor" => PlixPluginDefinition::extractor(name),
            "integrator" => PlixPluginDefinition::integrator(name),
            "conformer" => PlixPluginDefinition::conformer(name),
            other => {
                return Err(PlixError::validation(format!("unknown plugin kind: {}", other)));
            }
        };

        definition = definition.source(source);
        if let Some(order) = self.order {
            definition = definition.order(order);
        }
        if let Some(label) = self.label {
            definition = definition.label(label);
        }
        if let Some(hosts) = self.hosts {
            definition = definition.hosts_value(hosts);
        }
        if let Some(families) = self.families {
            definition = definition.families_value(families);
        }
        if let Some(requires) = self.requires {
            definition = definition.requires_value(requires);
        }
        if self.is_abstract {
            definition = definition.abstract_plugin();
        }

        if let Some(body) = self.process {
            definition = definition.process(body.into_entry(factories)?);
        }
        if let Some(body) = self.repair {
            definition = definition.repair(body.into_entry(factories)?);
        }

        let mut legacy = crate::legacy::PlixLegacyMethods::default();
        if let Some(body) = self.process_context {
            legacy.process_context = Some(body.into_context_fn(factories, "process_context")?);
        }
        if let Some(body) = self.process_instance {
            legacy.process_instance = Some(body.into_instance_fn(factories, "process_instance")?);
        }
        if let Some(body) = self.repair_context {
            legacy.repair_context = Some(body.into_context_fn(factories, "repair_context")?);
        }
        if let Some(body) = self.repair_instance {
            legacy.repair_instance = Some(body.into_instance_fn(factories, "repair_instance")?);
        }
        definition = definition.legacy(legacy);

        for action in self.actions {
            definition = definition.action(action.into_runtime(factories)?);
        }

        Ok(definition)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlixPluginFileRoot {
    Many { plugins: Vec<PlixPluginFile> },
    One(PlixPluginFile),
}

/// Whether `path` has an extension definition files may use.
pub(crate) fn is_definition_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("json") | Some("yaml") | Some("yml")
    )
}

/// Reads every plug-in definition declared in the file at `path`.
pub fn load_plugin_definitions(
    path: &Path,
    factories: &PlixFactoryRegistry,
) -> Result<Vec<PlixPluginDefinition>> {
    let text = fs::read_to_string(path)?;
    let root: PlixPluginFileRoot = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
        _ => serde_json::from_str(&text)?,
    };
    let files = match root {
        PlixPluginFileRoot::Many { plugins } => plugins,
        PlixPluginFileRoot::One(file) => vec![file],
    };
    files
        .into_iter()
        .map(|file| file.into_definition(factories, path))
        .collect()
}
