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

//! # Plix Context Module
//!
//! The shared workspace plug-ins read and write during one processing run.
//!
//! ## Ownership
//!
//! - [`PlixContext`] owns an ordered list of [`PlixInstance`] values and the
//!   append-only list of results produced by the run.
//! - Instances are created only through [`PlixContext::create_instance`]. An
//!   instance remembers the id of its context; that back-reference is used
//!   for lookup only and never reassigned.
//! - Membership in the context is the only existence check for an instance.
//!
//! ## Data
//!
//! Both the context and its instances carry a [`PlixData`] store: a plain JSON
//! map with subscript access (`data["key"]`) and call-style reads
//! (`data.value("key")`, `data.snapshot()`).
//!
//! A context's data starts out with a `results` list. Every recorded
//! [`PlixResult`] is appended to it as a JSON transcript, so bodies that only
//! see the data store can still read earlier outcomes.

use std::ops::{Deref, DerefMut, Index, IndexMut};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ident::next_id;
use crate::result::PlixResult;

/// Context data key holding one JSON transcript per recorded result.
pub const PLIX_RESULTS_KEY: &str = "results";

/// Key/value store shared by contexts and instances.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlixData(Map<String, Value>);

impl PlixData {
    pub fn new() -> Self {
        PlixData(Map::new())
    }

    /// Call-style read of a single key.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Reads a key as a string slice.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Inserts `value` under `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns a copy of the full mapping.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.0.clone()
    }
}

impl Deref for PlixData {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PlixData {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Index<&str> for PlixData {
    type Output = Value;

    /// Missing keys read as `null`, like indexing a `serde_json::Value`.
    fn index(&self, key: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.0.get(key).unwrap_or(&NULL)
    }
}

impl IndexMut<&str> for PlixData {
    /// Missing keys are inserted as `null` before being handed out.
    fn index_mut(&mut self, key: &str) -> &mut Value {
        self.0.entry(key.to_string()).or_insert(Value::Null)
    }
}

impl From<Map<String, Value>> for PlixData {
    fn from(map: Map<String, Value>) -> Self {
        PlixData(map)
    }
}

impl PartialEq<Map<String, Value>> for PlixData {
    fn eq(&self, other: &Map<String, Value>) -> bool {
        &self.0 == other
    }
}

/// One unit of work collected during a run.
#[derive(Clone, Debug)]
pub struct PlixInstance {
    id: String,
    name: String,
    context_id: String,
    pub data: PlixData,
}

impl PlixInstance {
    fn new(name: &str, context_id: &str) -> Self {
        let mut data = PlixData::new();
        data.set("name", name);
        PlixInstance {
            id: next_id('i'),
            name: name.to_string(),
            context_id: context_id.to_string(),
            data,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the context that created this instance.
    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Primary family, read from `data["family"]`.
    pub fn family(&self) -> Option<&str> {
        self.data.str("family")
    }

    /// Primary family followed by any additional `data["families"]`.
    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = self.family().map(str::to_string).into_iter().collect();
        if let Some(Value::Array(extra)) = self.data.value("families") {
            for family in extra.iter().filter_map(Value::as_str) {
                if !families.iter().any(|known| known == family) {
                    families.push(family.to_string());
                }
            }
        }
        families
    }

    /// Whether the instance is enabled for publishing (`data["publish"]`,
    /// defaulting to `true`).
    pub fn is_publishable(&self) -> bool {
        self.data
            .value("publish")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

/// Root workspace for one processing run.
#[derive(Debug)]
pub struct PlixContext {
    id: String,
    pub data: PlixData,
    pub(crate) instances: Vec<PlixInstance>,
    results: Vec<PlixResult>,
}

impl Default for PlixContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PlixContext {
    pub fn new() -> Self {
        let mut data = PlixData::new();
        data.set(PLIX_RESULTS_KEY, Value::Array(Vec::new()));
        PlixContext {
            id: next_id('c'),
            data,
            instances: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creates a new instance owned by this context and returns it for
    /// further population.
    pub fn create_instance(&mut self, name: &str) -> &mut PlixInstance {
        let instance = PlixInstance::new(name, &self.id);
        self.instances.push(instance);
        let last = self.instances.len() - 1;
        &mut self.instances[last]
    }

    /// Creates an instance of the given family.
    pub fn create_asset(&mut self, name: &str, family: &str) -> &mut PlixInstance {
        let instance = self.create_instance(name);
        instance.data.set("family", family);
        instance
    }

    pub fn instances(&self) -> &[PlixInstance] {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut [PlixInstance] {
        &mut self.instances
    }

    pub fn instance(&self, id: &str) -> Option<&PlixInstance> {
        self.instances.iter().find(|instance| instance.id == id)
    }

    pub fn instance_mut(&mut self, id: &str) -> Option<&mut PlixInstance> {
        self.instances.iter_mut().find(|instance| instance.id == id)
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.instances.iter().position(|instance| instance.id == id)
    }

    /// Membership test, the equivalent of `instance in context`.
    pub fn contains(&self, instance: &PlixInstance) -> bool {
        instance.context_id == self.id && self.position(&instance.id).is_some()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlixInstance> {
        self.instances.iter()
    }

    /// Results of every invocation so far, in invocation order.
    pub fn results(&self) -> &[PlixResult] {
        &self.results
    }

    /// Records `result` in the typed list and appends its transcript to
    /// `data["results"]`.
    pub(crate) fn push_result(&mut self, result: PlixResult) {
        match self.data.get_mut(PLIX_RESULTS_KEY) {
            Some(Value::Array(transcripts)) => transcripts.push(result.to_json()),
            _ => log::warn!(
                "plix.context.results_replaced: data[\"{}\"] is no longer a list - context={}, plugin={}",
                PLIX_RESULTS_KEY,
                self.id,
                result.plugin.name()
            ),
        }
        self.results.push(result);
    }
}

impl<'a> IntoIterator for &'a PlixContext {
    type Item = &'a PlixInstance;
    type IntoIter = std::slice::Iter<'a, PlixInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.iter()
    }
}
