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

//! # Plix Registry Module
//!
//! [`PlixRegistry`] holds everything a run needs to know before it starts:
//! registered hosts, explicitly registered plug-ins, plug-in search paths,
//! callback handlers and the body factories used by discovery.
//!
//! ## Lifecycle
//!
//! A registry is created empty (apart from the built-in body factories) with
//! [`PlixRegistry::new`] or seeded from configuration with
//! [`PlixRegistry::from_config`]. [`PlixRegistry::reset`] returns it to the
//! freshly created state. The registry is a plain value: it is passed by
//! reference to the processor and to publish, and callers that share one
//! across threads must serialize access themselves.
//!
//! ## Discovery
//!
//! [`PlixRegistry::discover`] rebuilds the plug-in list from disk on every
//! call and swaps the result in as the latest snapshot:
//!
//! 1. definitions are loaded from every search path
//! 2. a name seen twice keeps its first definition
//! 3. plug-ins that fail validation are dropped with a warning
//! 4. explicitly registered plug-ins replace discovered ones of the same name
//! 5. the list is sorted by order; equal orders keep registered plug-ins
//!    first, in registration order, then discovered ones in scan order

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::callback::{
    PlixCallback, PlixCallbackBus, PlixSignalArgs, PLIX_SIGNAL_PLUGIN_REGISTERED,
};
use crate::config::PlixConfig;
use crate::discovery::{discover_definitions, PlixBodyFactory, PlixFactoryRegistry};
use crate::errors::{PlixError, Result};
use crate::plugin::{sort_plugins, PlixPlugin};
use crate::result::PlixFailure;
use crate::validate::validate_plugin;

#[derive(Debug)]
pub struct PlixRegistry {
    hosts: Vec<String>,
    plugins: Vec<Arc<PlixPlugin>>,
    paths: Vec<PathBuf>,
    callbacks: PlixCallbackBus,
    factories: PlixFactoryRegistry,
    discovered: Vec<Arc<PlixPlugin>>,
}

impl Default for PlixRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PlixRegistry {
    pub fn new() -> Self {
        PlixRegistry {
            hosts: Vec::new(),
            plugins: Vec::new(),
            paths: Vec::new(),
            callbacks: PlixCallbackBus::new(),
            factories: PlixFactoryRegistry::with_builtins(),
            discovered: Vec::new(),
        }
    }

    /// Builds a registry with the configured hosts and search paths,
    /// including paths taken from the configured environment variable.
    pub fn from_config(config: &PlixConfig) -> Self {
        let mut registry = Self::new();
        for host in &config.hosts {
            registry.register_host(host);
        }
        for path in config.resolved_plugin_paths() {
            registry.register_plugin_path(path);
        }
        registry
    }

    /// Restores the freshly created state.
    pub fn reset(&mut self) {
        *self = Self::new();
        log::debug!("plix.registry.reset: registry restored to empty state");
    }

    // =============================================================================
    // Hosts
    // =============================================================================

    pub fn register_host(&mut self, host: &str) {
        if !self.hosts.iter().any(|known| known == host) {
            self.hosts.push(host.to_string());
        }
    }

    pub fn deregister_host(&mut self, host: &str) -> Result<()> {
        let index = self
            .hosts
            .iter()
            .position(|known| known == host)
            .ok_or_else(|| PlixError::not_found("host", host))?;
        self.hosts.remove(index);
        Ok(())
    }

    pub fn registered_hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Most recently registered host, if any.
    pub fn current_host(&self) -> Option<&str> {
        self.hosts.last().map(String::as_str)
    }

    // =============================================================================
    // Plug-ins
    // =============================================================================

    /// Validates and registers `plugin`. Registering the same descriptor
    /// twice is a no-op.
    pub fn register_plugin(&mut self, plugin: Arc<PlixPlugin>) -> Result<()> {
        validate_plugin(&plugin, &self.hosts)?;

        if self.plugins.iter().any(|known| known.id() == plugin.id()) {
            log::debug!(
                "plix.plugin.register: plugin already registered - plugin={}, id={}",
                plugin.name(),
                plugin.id()
            );
            return Ok(());
        }

        log::info!(
            "plix.plugin.register: plugin registered - plugin={}, id={}, order={}, dispatch={:?}",
            plugin.name(),
            plugin.id(),
            plugin.order(),
            plugin.dispatch_mode()
        );

        let args = _plugin_args(&plugin);
        self.plugins.push(plugin);
        self.emit(PLIX_SIGNAL_PLUGIN_REGISTERED, &args);
        Ok(())
    }

    pub fn deregister_plugin(&mut self, plugin: &PlixPlugin) -> Result<()> {
        let index = self
            .plugins
            .iter()
            .position(|known| known.id() == plugin.id())
            .ok_or_else(|| PlixError::not_found("plugin", plugin.name()))?;
        self.plugins.remove(index);
        log::info!(
            "plix.plugin.deregister: plugin removed - plugin={}, id={}",
            plugin.name(),
            plugin.id()
        );
        Ok(())
    }

    pub fn deregister_all_plugins(&mut self) {
        self.plugins.clear();
    }

    /// Explicitly registered plug-ins, in registration order.
    pub fn registered_plugins(&self) -> &[Arc<PlixPlugin>] {
        &self.plugins
    }

    // =============================================================================
    // Search paths
    // =============================================================================

    pub fn register_plugin_path(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if !self.paths.iter().any(|known| known == path) {
            self.paths.push(path.to_path_buf());
        }
    }

    pub fn deregister_plugin_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let index = self
            .paths
            .iter()
            .position(|known| known == path)
            .ok_or_else(|| PlixError::not_found("plugin path", path.display().to_string()))?;
        self.paths.remove(index);
        Ok(())
    }

    pub fn deregister_all_paths(&mut self) {
        self.paths.clear();
    }

    pub fn registered_paths(&self) -> &[PathBuf] {
        &self.paths
    }

    // =============================================================================
    // Callbacks
    // =============================================================================

    pub fn register_callback(
        &mut self,
        signal: &str,
        handler: impl Into<Option<PlixCallback>>,
    ) -> Result<()> {
        self.callbacks.register_callback(signal, handler)
    }

    pub fn deregister_callback(&mut self, signal: &str, handler: &PlixCallback) -> Result<()> {
        self.callbacks.deregister_callback(signal, handler)
    }

    pub fn deregister_all_callbacks(&mut self) {
        self.callbacks.deregister_all_callbacks();
    }

    pub fn registered_callbacks(&self) -> &std::collections::BTreeMap<String, Vec<PlixCallback>> {
        self.callbacks.registered_callbacks()
    }

    /// Runs every handler of `signal`; failures are logged, never returned
    /// as errors.
    pub fn emit(&self, signal: &str, args: &PlixSignalArgs) -> Vec<PlixFailure> {
        self.callbacks.emit(signal, args)
    }

    // =============================================================================
    // Discovery
    // =============================================================================

    pub fn register_factory(&mut self, name: &str, factory: PlixBodyFactory) {
        self.factories.register(name, factory);
    }

    pub fn factories(&self) -> &PlixFactoryRegistry {
        &self.factories
    }

    /// Scans the search paths and returns every usable plug-in, sorted.
    pub fn discover(&mut self) -> Vec<Arc<PlixPlugin>> {
        let definitions = discover_definitions(&self.paths, &self.factories);

        let mut seen = HashSet::new();
        let mut plugins: Vec<Arc<PlixPlugin>> = Vec::with_capacity(definitions.len());
        for definition in definitions {
            if !seen.insert(definition.name().to_string()) {
                log::warn!(
                    "plix.discover.duplicate: keeping first definition - plugin={}",
                    definition.name()
                );
                continue;
            }
            let plugin = definition.build();
            if let Err(err) = validate_plugin(&plugin, &self.hosts) {
                log::warn!(
                    "plix.discover.rejected: plugin skipped - plugin={}, error={}",
                    plugin.name(),
                    err
                );
                continue;
            }
            plugins.push(plugin);
        }

        plugins.retain(|found| {
            !self
                .plugins
                .iter()
                .any(|registered| registered.name() == found.name())
        });
        let mut plugins: Vec<Arc<PlixPlugin>> =
            self.plugins.iter().cloned().chain(plugins).collect();
        sort_plugins(&mut plugins);

        log::info!(
            "plix.discover.complete: discovery finished - paths={}, plugins={}",
            self.paths.len(),
            plugins.len()
        );

        self.discovered = plugins.clone();
        plugins
    }

    /// Result of the latest [`Self::discover`] call.
    pub fn discovered(&self) -> &[Arc<PlixPlugin>] {
        &self.discovered
    }
}

fn _plugin_args(plugin: &PlixPlugin) -> PlixSignalArgs {
    let mut args = Map::new();
    args.insert("plugin".to_string(), Value::from(plugin.name()));
    args.insert("id".to_string(), Value::from(plugin.id()));
    args.insert("order".to_string(), json!(plugin.order()));
    args
}
