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

//! # Plix Processor Module
//!
//! Runs one plug-in (or one of its actions) against a context and records a
//! [`PlixResult`] per invocation.
//!
//! ## Dispatch
//!
//! - With an action name, the action's body runs once against the context.
//!   The owning plug-in's hosts and families are not consulted.
//! - **ContextLevel** plug-ins run once against the whole context; any
//!   instance argument is ignored.
//! - **InstanceLevel** plug-ins run against the given instance, or else once
//!   per instance whose families match and whose `publish` flag is not
//!   `false`, in the context's insertion order. No match means no result.
//! - **Legacy** plug-ins run `process_context` once and then
//!   `process_instance` per matching instance. With an explicit instance only
//!   `process_instance` runs, when the plug-in has one.
//! - [`PlixProcessor::process_skipping`] behaves like an implicit run but
//!   leaves out the given instance ids from every per-instance body.
//!
//! ## Fault Boundary
//!
//! Every body runs inside [`std::panic::catch_unwind`]. A returned error or a
//! panic becomes the result's `error`, the result is marked unsuccessful and
//! the caller moves on. A body whose signature contradicts the plug-in's base
//! is never invoked; a single failed result records the mismatch.
//!
//! Each result is appended to the context, returned to the caller and
//! announced through the `plugin-processed` signal.
//!
//! Unknown action names, unknown instance ids and non-invocable actions are
//! caller mistakes and come back as [`PlixError`].

use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::callback::PLIX_SIGNAL_PLUGIN_PROCESSED;
use crate::context::PlixContext;
use crate::errors::{PlixError, Result};
use crate::log::PlixPluginLog;
use crate::plugin::{
    PlixAction, PlixDispatchMode, PlixEntryPoint, PlixPlugin, PlixPluginDefinition, PlixSignature,
};
use crate::registry::PlixRegistry;
use crate::result::{PlixFailure, PlixInstanceRef, PlixResult};

/// Instances an instance-level body is offered.
#[derive(Clone, Copy)]
enum Targets<'a> {
    /// Every publishable instance the plug-in accepts.
    Matching,
    /// One instance chosen by the caller, by index.
    Only(usize),
    /// Like `Matching`, minus the instances with these ids.
    Excluding(&'a HashSet<String>),
}

impl Targets<'_> {
    fn from_index(index: Option<usize>) -> Self {
        index.map_or(Targets::Matching, Targets::Only)
    }
}

/// Executes plug-ins, emitting signals through the registry's callbacks.
#[derive(Clone, Copy, Debug)]
pub struct PlixProcessor<'r> {
    registry: &'r PlixRegistry,
}

impl<'r> PlixProcessor<'r> {
    pub fn new(registry: &'r PlixRegistry) -> Self {
        PlixProcessor { registry }
    }

    /// Runs `plugin` (or its `action`) against `context`, optionally limited
    /// to the instance with id `instance`.
    pub fn process(
        &self,
        plugin: &Arc<PlixPlugin>,
        context: &mut PlixContext,
        instance: Option<&str>,
        action: Option<&str>,
    ) -> Result<Vec<PlixResult>> {
        if let Some(name) = action {
            let action = plugin
                .action(name)
                .ok_or_else(|| PlixError::not_found("action", name))?;
            return self.run_action(plugin, action, context).map(|result| vec![result]);
        }

        let target = self.resolve_instance(context, instance)?;

        if let Some(reason) = plugin.signature_mismatch() {
            return Ok(vec![self.record_mismatch(plugin, context, None, reason)]);
        }

        Ok(self.dispatch(plugin, context, Targets::from_index(target)))
    }

    /// Runs `plugin` like [`Self::process`] without an instance, except that
    /// instance-level bodies, legacy `process_instance` included, skip the
    /// instances whose ids are in `skipped`. A signature mismatch still
    /// yields a single failed result.
    pub fn process_skipping(
        &self,
        plugin: &Arc<PlixPlugin>,
        context: &mut PlixContext,
        skipped: &HashSet<String>,
    ) -> Vec<PlixResult> {
        if let Some(reason) = plugin.signature_mismatch() {
            return vec![self.record_mismatch(plugin, context, None, reason)];
        }
        self.dispatch(plugin, context, Targets::Excluding(skipped))
    }

    fn dispatch(
        &self,
        plugin: &Arc<PlixPlugin>,
        context: &mut PlixContext,
        targets: Targets<'_>,
    ) -> Vec<PlixResult> {
        match plugin.dispatch_mode() {
            PlixDispatchMode::Legacy => self.run_legacy(plugin, context, targets),
            mode => self.run_entry(plugin, plugin.process(), mode, context, targets),
        }
    }

    /// Runs the plug-in's `repair` body with the same targeting rules as
    /// [`Self::process`]. The dispatch mode follows the repair body's
    /// signature.
    pub fn repair(
        &self,
        plugin: &Arc<PlixPlugin>,
        context: &mut PlixContext,
        instance: Option<&str>,
    ) -> Result<Vec<PlixResult>> {
        let target = self.resolve_instance(context, instance)?;
        let mode = match plugin.repair().map(PlixEntryPoint::signature) {
            Some(PlixSignature::Instance) | Some(PlixSignature::ContextInstance) => {
                PlixDispatchMode::InstanceLevel
            }
            _ => PlixDispatchMode::ContextLevel,
        };
        Ok(self.run_entry(plugin, plugin.repair(), mode, context, Targets::from_index(target)))
    }

    /// Runs an action that is not attached to any registered plug-in.
    pub fn process_action(&self, action: &PlixAction, context: &mut PlixContext) -> Result<PlixResult> {
        let owner = PlixPluginDefinition::context_plugin(action.name())
            .label(action.display_label())
            .action(action.clone())
            .build();
        self.run_action(&owner, action, context)
    }

    fn resolve_instance(&self, context: &PlixContext, instance: Option<&str>) -> Result<Option<usize>> {
        match instance {
            Some(id) => context
                .position(id)
                .map(Some)
                .ok_or_else(|| PlixError::not_found("instance", id)),
            None => Ok(None),
        }
    }

    /// Instances an instance-level body runs against.
    fn targets(&self, plugin: &PlixPlugin, context: &PlixContext, targets: Targets<'_>) -> Vec<usize> {
        let skipped = match targets {
            Targets::Only(index) => return vec![index],
            Targets::Matching => None,
            Targets::Excluding(ids) => Some(ids),
        };
        context
            .instances()
            .iter()
            .enumerate()
            .filter(|(_, instance)| instance.is_publishable() && plugin.accepts(instance))
            .filter(|(_, instance)| skipped.map_or(true, |ids| !ids.contains(instance.id())))
            .map(|(index, _)| index)
            .collect()
    }

    fn run_action(
        &self,
        plugin: &Arc<PlixPlugin>,
        action: &PlixAction,
        context: &mut PlixContext,
    ) -> Result<PlixResult> {
        if !action.is_invocable() {
            return Err(PlixError::NotInvocable(action.name().to_string()));
        }
        let entry = action.entry().cloned();
        Ok(self.invoke(plugin, Some(action.name()), None, context, |context, log| {
            match &entry {
                Some(body) => body(context, log),
                None => Ok(()),
            }
        }))
    }

    fn run_entry(
        &self,
        plugin: &Arc<PlixPlugin>,
        entry: Option<&PlixEntryPoint>,
        mode: PlixDispatchMode,
        context: &mut PlixContext,
        targets: Targets<'_>,
    ) -> Vec<PlixResult> {
        if mode != PlixDispatchMode::InstanceLevel {
            return vec![self.invoke_context(plugin, entry, context)];
        }

        let mut results = Vec::new();
        for index in self.targets(plugin, context, targets) {
            results.push(self.invoke_instance(plugin, entry, context, index));
        }
        results
    }

    fn run_legacy(
        &self,
        plugin: &Arc<PlixPlugin>,
        context: &mut PlixContext,
        targets: Targets<'_>,
    ) -> Vec<PlixResult> {
        let mut results = Vec::new();

        let run_context =
            !matches!(targets, Targets::Only(_)) || plugin.legacy_process_instance().is_none();
        if let (true, Some(body)) = (run_context, plugin.legacy_process_context()) {
            let body = Arc::clone(body);
            results.push(self.invoke(plugin, None, None, context, |context, log| body(context, log)));
        }

        if let Some(body) = plugin.legacy_process_instance() {
            for index in self.targets(plugin, context, targets) {
                let body = Arc::clone(body);
                let instance = _instance_ref(context, index);
                results.push(self.invoke(plugin, None, instance, context, move |context, log| {
                    let instance = context
                        .instances
                        .get_mut(index)
                        .ok_or_else(|| anyhow::anyhow!("instance #{index} is no longer in the context"))?;
                    body(instance, log)
                }));
            }
        }

        results
    }

    fn invoke_context(
        &self,
        plugin: &Arc<PlixPlugin>,
        entry: Option<&PlixEntryPoint>,
        context: &mut PlixContext,
    ) -> PlixResult {
        match entry {
            Some(PlixEntryPoint::Context(body)) => {
                let body = Arc::clone(body);
                self.invoke(plugin, None, None, context, |context, log| body(context, log))
            }
            None => self.invoke(plugin, None, None, context, |_, _| Ok(())),
            Some(other) => {
                let reason = format!(
                    "'{}' runs once per context but its body expects {:?}",
                    plugin.name(),
                    other.signature()
                );
                self.record_mismatch(plugin, context, None, reason)
            }
        }
    }

    fn invoke_instance(
        &self,
        plugin: &Arc<PlixPlugin>,
        entry: Option<&PlixEntryPoint>,
        context: &mut PlixContext,
        index: usize,
    ) -> PlixResult {
        let instance = _instance_ref(context, index);
        match entry {
            Some(PlixEntryPoint::Instance(body)) => {
                let body = Arc::clone(body);
                self.invoke(plugin, None, instance, context, move |context, log| {
                    let instance = context
                        .instances
                        .get_mut(index)
                        .ok_or_else(|| anyhow::anyhow!("instance #{index} is no longer in the context"))?;
                    body(instance, log)
                })
            }
            Some(PlixEntryPoint::ContextInstance(body)) => {
                let body = Arc::clone(body);
                self.invoke(plugin, None, instance, context, move |context, log| {
                    let instance = context
                        .instances
                        .get_mut(index)
                        .ok_or_else(|| anyhow::anyhow!("instance #{index} is no longer in the context"))?;
                    body(&mut context.data, instance, log)
                })
            }
            None => self.invoke(plugin, None, instance, context, |_, _| Ok(())),
            Some(PlixEntryPoint::Context(_)) => {
                let reason = format!(
                    "'{}' runs once per instance but its body expects the context",
                    plugin.name()
                );
                self.record_mismatch(plugin, context, instance, reason)
            }
        }
    }

    fn invoke<F>(
        &self,
        plugin: &Arc<PlixPlugin>,
        action: Option<&str>,
        instance: Option<PlixInstanceRef>,
        context: &mut PlixContext,
        body: F,
    ) -> PlixResult
    where
        F: FnOnce(&mut PlixContext, &PlixPluginLog) -> anyhow::Result<()>,
    {
        let log = PlixPluginLog::new(action.unwrap_or_else(|| plugin.name()));
        let started = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| body(context, &log)));
        let duration = started.elapsed();

        let error = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(PlixFailure::from_error(&err)),
            Err(payload) => Some(PlixFailure::from_panic(payload)),
        };

        let result = PlixResult {
            success: error.is_none(),
            plugin: Arc::clone(plugin),
            action: action.map(str::to_string),
            instance,
            error,
            records: log.into_records(),
            duration,
        };
        self.record(context, result)
    }

    fn record_mismatch(
        &self,
        plugin: &Arc<PlixPlugin>,
        context: &mut PlixContext,
        instance: Option<PlixInstanceRef>,
        reason: String,
    ) -> PlixResult {
        let result = PlixResult {
            success: false,
            plugin: Arc::clone(plugin),
            action: None,
            instance,
            error: Some(PlixFailure::signature_mismatch(reason)),
            records: Vec::new(),
            duration: Duration::ZERO,
        };
        self.record(context, result)
    }

    fn record(&self, context: &mut PlixContext, result: PlixResult) -> PlixResult {
        match &result.error {
            None => log::debug!(
                "plix.process.result: plugin processed - plugin={}, instance={}, success=true, duration_ms={:.3}",
                result.plugin.name(),
                result.instance.as_ref().map(|i| i.name.as_str()).unwrap_or("-"),
                result.duration.as_secs_f64() * 1000.0
            ),
            Some(error) => log::warn!(
                "plix.process.failed: plugin failed - plugin={}, instance={}, kind={:?}, error={}",
                result.plugin.name(),
                result.instance.as_ref().map(|i| i.name.as_str()).unwrap_or("-"),
                error.kind,
                error
            ),
        }

        context.push_result(result.clone());
        if let serde_json::Value::Object(args) = result.to_json() {
            self.registry.emit(PLIX_SIGNAL_PLUGIN_PROCESSED, &args);
        }
        result
    }
}

fn _instance_ref(context: &PlixContext, index: usize) -> Option<PlixInstanceRef> {
    context.instances().get(index).map(|instance| PlixInstanceRef {
        id: instance.id().to_string(),
        name: instance.name().to_string(),
    })
}
