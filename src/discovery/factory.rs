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

//! # Body Factory Registry
//!
//! Definition files cannot carry code, so every `process`, `repair` or action
//! body they declare names a factory. A factory receives the body's JSON
//! `config` and returns a ready entry point.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::errors::{PlixError, Result};
use crate::plugin::PlixEntryPoint;

/// Builds an entry point from its JSON configuration.
pub type PlixBodyFactory = fn(&Value) -> Result<PlixEntryPoint>;

/// Registry mapping factory names to their constructors.
#[derive(Clone, Default)]
pub struct PlixFactoryRegistry {
    inner: HashMap<String, PlixBodyFactory>,
}

impl PlixFactoryRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        PlixFactoryRegistry {
            inner: HashMap::new(),
        }
    }

    /// A registry seeded with the bodies shipped in [`crate::plugins`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::plugins::register_builtin_factories(&mut registry);
        registry
    }

    /// Adds or replaces the factory registered under `name`.
    pub fn register(&mut self, name: &str, factory: PlixBodyFactory) {
        self.inner.insert(name.to_string(), factory);
    }

    pub fn get(&self, name: &str) -> Result<PlixBodyFactory> {
        self.inner
            .get(name)
            .copied()
            .ok_or_else(|| PlixError::not_found("factory", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Registered factory names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolves `name` and builds the entry point from `config`.
    pub fn build(&self, name: &str, config: &Value) -> Result<PlixEntryPoint> {
        let factory = self.get(name)?;
        factory(config)
    }
}

impl fmt::Debug for PlixFactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
