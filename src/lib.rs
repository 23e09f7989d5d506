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

//! # Plix
//!
//! Plix is a plug-in pipeline engine. Plug-ins are small processing units
//! with an order, the hosts and instance families they apply to, and an
//! optional engine version requirement. Plix discovers and validates them,
//! sorts them, and runs them against a shared [`PlixContext`] holding the
//! instances collected during the run. Every invocation leaves a
//! [`PlixResult`] with its log records, its timing and any failure.
//!
//! ## Module Overview
//!
//! - **context**: the shared workspace and its instances
//! - **plugin**: plug-in definitions, descriptors, entry points and actions
//! - **legacy**: normalization of superseded method names
//! - **validate**: host, version and shape checks applied at registration
//! - **registry**: hosts, plug-ins, search paths, callbacks and discovery
//! - **discovery**: definition files and the body factories they name
//! - **processor**: dispatch of one plug-in with per-invocation fault capture
//! - **publish**: ordered runs over a whole plug-in list
//! - **callback**: named signals for observers
//! - **plugins**: built-in bodies usable from definition files
//! - **config**: registry configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use plix::{publish, PlixEntryPoint, PlixPluginDefinition, PlixRegistry};
//!
//! let mut registry = PlixRegistry::new();
//! registry.register_host("python");
//!
//! let collect = PlixPluginDefinition::collector("CollectShot")
//!     .process(PlixEntryPoint::context(|context, _log| {
//!         context.create_asset("shot010", "render");
//!         Ok(())
//!     }))
//!     .build();
//! let validate = PlixPluginDefinition::validator("ValidateFrames")
//!     .families(["render"])
//!     .process(PlixEntryPoint::instance(|instance, log| {
//!         log.info(format!("checking {}", instance.name()));
//!         Ok(())
//!     }))
//!     .build();
//!
//! registry.register_plugin(collect).unwrap();
//! registry.register_plugin(validate).unwrap();
//!
//! let context = publish(&mut registry, None, None).unwrap();
//! assert_eq!(context.results().len(), 2);
//! ```
//!
//! ## Error Handling
//!
//! Registration and configuration mistakes return [`PlixError`]. Failures
//! inside plug-in bodies never do: they are recorded on the invocation's
//! result and the run continues.

pub mod callback;
pub mod config;
pub mod context;
pub mod discovery;
pub mod errors;
pub(crate) mod ident;
pub mod legacy;
pub mod log;
pub mod plugin;
pub mod plugins;
pub mod processor;
pub mod publish;
pub mod registry;
pub mod result;
pub mod validate;
pub mod version;

pub use callback::{
    callback, PlixCallback, PlixCallbackBus, PlixSignalArgs, PLIX_SIGNAL_PLUGIN_PROCESSED,
    PLIX_SIGNAL_PLUGIN_REGISTERED, PLIX_SIGNAL_PUBLISHED,
};
pub use config::{PlixConfig, PLIX_PLUGIN_PATH_ENV};
pub use context::{PlixContext, PlixData, PlixInstance, PLIX_RESULTS_KEY};
pub use discovery::{PlixBodyFactory, PlixFactoryRegistry};
pub use errors::{PlixError, Result};
pub use legacy::PlixLegacyMethods;
pub use crate::log::{PlixLogRecord, PlixPluginLog, PLIX_PLUGIN_LOG_TARGET};
pub use plugin::{
    context_fn, context_instance_fn, instance_fn, sort_plugins, PlixAction, PlixActionKind,
    PlixActionOn, PlixContextFn, PlixContextInstanceFn, PlixDispatchMode, PlixEntryPoint,
    PlixFilter, PlixInstanceFn, PlixPlugin, PlixPluginBase, PlixPluginDefinition, PlixSignature,
    PLIX_COLLECTOR_ORDER, PLIX_EXTRACTOR_ORDER, PLIX_INTEGRATOR_ORDER, PLIX_PLUGIN_ORDER,
    PLIX_VALIDATOR_ORDER,
};
pub use processor::PlixProcessor;
pub use publish::{publish, publish_with, PlixPublishOptions, PlixPublishPolicy};
pub use registry::PlixRegistry;
pub use result::{PlixFailure, PlixFailureKind, PlixInstanceRef, PlixResult};
pub use validate::validate_plugin;
pub use version::{engine_version, PlixVersionRequirement, PLIX_VERSION};
