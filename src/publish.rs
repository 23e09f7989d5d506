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

//! # Publish Orchestration
//!
//! Runs a whole list of plug-ins through the [`PlixProcessor`] in ascending
//! order and hands back the populated context.
//!
//! Without an explicit plug-in list the registry's [`PlixRegistry::discover`]
//! supplies one. An explicit list is sorted by order, keeping the caller's
//! order for ties.
//!
//! ## Validation Failures
//!
//! Whether a failed validator keeps later plug-ins from running is decided
//! by [`PlixPublishPolicy`]. A plug-in belongs to the validation band when
//! its order lies within half a step of [`PLIX_VALIDATOR_ORDER`].
//!
//! ## Band Runners
//!
//! [`collect`], [`validate`], [`extract`] and [`integrate`] run every plug-in
//! up to the end of the named band, so `validate` runs collectors and
//! validators.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::callback::PLIX_SIGNAL_PUBLISHED;
use crate::context::PlixContext;
use crate::errors::Result;
use crate::plugin::{
    sort_plugins, PlixPlugin, PLIX_COLLECTOR_ORDER, PLIX_EXTRACTOR_ORDER,
    PLIX_INTEGRATOR_ORDER, PLIX_VALIDATOR_ORDER,
};
use crate::processor::PlixProcessor;
use crate::registry::PlixRegistry;

/// What a failed validator does to the rest of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlixPublishPolicy {
    /// Every plug-in runs regardless of earlier failures.
    #[default]
    RunAll,
    /// Plug-ins after the validation band skip instances that failed
    /// validation. This covers instance-level bodies and legacy
    /// `process_instance` methods; context bodies still run once.
    SkipInvalidInstances,
    /// No plug-in after the validation band runs once any validator failed.
    HaltOnValidationFailure,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlixPublishOptions {
    pub policy: PlixPublishPolicy,
    /// Only plug-ins with an order below this bound run.
    pub until: Option<f64>,
}

impl PlixPublishOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(mut self, policy: PlixPublishPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn until(mut self, order: f64) -> Self {
        self.until = Some(order);
        self
    }
}

fn _in_validation_band(order: f64) -> bool {
    (order - PLIX_VALIDATOR_ORDER).abs() < 0.5
}

fn _after_validation_band(order: f64) -> bool {
    order >= PLIX_VALIDATOR_ORDER + 0.5
}

/// Runs `plugins` (or the discovered set) against `context` (or a fresh one)
/// with the default options.
pub fn publish(
    registry: &mut PlixRegistry,
    context: Option<PlixContext>,
    plugins: Option<Vec<Arc<PlixPlugin>>>,
) -> Result<PlixContext> {
    publish_with(registry, context, plugins, &PlixPublishOptions::default())
}

pub fn publish_with(
    registry: &mut PlixRegistry,
    context: Option<PlixContext>,
    plugins: Option<Vec<Arc<PlixPlugin>>>,
    options: &PlixPublishOptions,
) -> Result<PlixContext> {
    let plugins = match plugins {
        Some(mut plugins) => {
            sort_plugins(&mut plugins);
            plugins
        }
        None => registry.discover(),
    };
    let mut context = context.unwrap_or_default();
    let processor = PlixProcessor::new(registry);

    log::info!(
        "plix.publish.start: publishing - context={}, plugins={}, policy={:?}",
        context.id(),
        plugins.len(),
        options.policy
    );

    let mut invalid: HashSet<String> = HashSet::new();
    let mut validation_failed = false;

    for plugin in &plugins {
        if let Some(until) = options.until {
            if plugin.order() >= until {
                break;
            }
        }

        let after_validation = _after_validation_band(plugin.order());
        if after_validation
            && validation_failed
            && options.policy == PlixPublishPolicy::HaltOnValidationFailure
        {
            log::warn!(
                "plix.publish.halted: validation failed, stopping before plugin={}",
                plugin.name()
            );
            break;
        }

        let results = if after_validation
            && !invalid.is_empty()
            && options.policy == PlixPublishPolicy::SkipInvalidInstances
        {
            processor.process_skipping(plugin, &mut context, &invalid)
        } else {
            processor.process(plugin, &mut context, None, None)?
        };

        if _in_validation_band(plugin.order()) {
            for result in results.iter().filter(|result| !result.success) {
                validation_failed = true;
                if let Some(id) = result.instance_id() {
                    invalid.insert(id.to_string());
                }
            }
        }
    }

    let failed = context.results().iter().filter(|result| !result.success).count();
    log::info!(
        "plix.publish.complete: published - context={}, results={}, failed={}",
        context.id(),
        context.results().len(),
        failed
    );

    let mut args = Map::new();
    args.insert("context".to_string(), Value::from(context.id()));
    args.insert("results".to_string(), Value::from(context.results().len()));
    args.insert("failed".to_string(), Value::from(failed));
    registry.emit(PLIX_SIGNAL_PUBLISHED, &args);

    Ok(context)
}

/// Runs selectors and collectors.
pub fn collect(
    registry: &mut PlixRegistry,
    context: Option<PlixContext>,
    plugins: Option<Vec<Arc<PlixPlugin>>>,
) -> Result<PlixContext> {
    let options = PlixPublishOptions::new().until(PLIX_COLLECTOR_ORDER + 0.5);
    publish_with(registry, context, plugins, &options)
}

/// Runs everything up to and including validators.
pub fn validate(
    registry: &mut PlixRegistry,
    context: Option<PlixContext>,
    plugins: Option<Vec<Arc<PlixPlugin>>>,
) -> Result<PlixContext> {
    let options = PlixPublishOptions::new().until(PLIX_VALIDATOR_ORDER + 0.5);
    publish_with(registry, context, plugins, &options)
}

/// Runs everything up to and including extractors.
pub fn extract(
    registry: &mut PlixRegistry,
    context: Option<PlixContext>,
    plugins: Option<Vec<Arc<PlixPlugin>>>,
) -> Result<PlixContext> {
    let options = PlixPublishOptions::new().until(PLIX_EXTRACTOR_ORDER + 0.5);
    publish_with(registry, context, plugins, &options)
}

/// Runs everything up to and including integrators.
pub fn integrate(
    registry: &mut PlixRegistry,
    context: Option<PlixContext>,
    plugins: Option<Vec<Arc<PlixPlugin>>>,
) -> Result<PlixContext> {
    let options = PlixPublishOptions::new().until(PLIX_INTEGRATOR_ORDER + 0.5);
    publish_with(registry, context, plugins, &options)
}
