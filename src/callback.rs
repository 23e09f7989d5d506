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

//! # Callback Bus
//!
//! Synchronous named-signal registry used to notify observers of registry and
//! processing events.
//!
//! - Handlers for a signal run in registration order.
//! - A handler that returns an error or panics is reported through
//!   `log::error!` and the remaining handlers still run; the emitter never
//!   sees the failure.
//! - Deregistering the last handler of a signal keeps the signal's (now
//!   empty) entry; [`PlixCallbackBus::deregister_all_callbacks`] clears every
//!   entry.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::errors::{PlixError, Result};
use crate::result::PlixFailure;

/// Emitted after a plug-in is added to the registry.
pub const PLIX_SIGNAL_PLUGIN_REGISTERED: &str = "plugin-registered";
/// Emitted after every recorded result.
pub const PLIX_SIGNAL_PLUGIN_PROCESSED: &str = "plugin-processed";
/// Emitted once a publish run has finished.
pub const PLIX_SIGNAL_PUBLISHED: &str = "published";

/// Keyword arguments passed to handlers.
pub type PlixSignalArgs = Map<String, Value>;

/// Registered handler.
pub type PlixCallback = Arc<dyn Fn(&PlixSignalArgs) -> anyhow::Result<()> + Send + Sync>;

/// Wraps a closure as a [`PlixCallback`].
pub fn callback<F>(handler: F) -> PlixCallback
where
    F: Fn(&PlixSignalArgs) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(handler)
}

#[derive(Clone, Default)]
pub struct PlixCallbackBus {
    handlers: BTreeMap<String, Vec<PlixCallback>>,
}

impl PlixCallbackBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to `signal`. A missing handler is rejected with
    /// [`PlixError::InvalidCallback`].
    pub fn register_callback(
        &mut self,
        signal: &str,
        handler: impl Into<Option<PlixCallback>>,
    ) -> Result<()> {
        let handler = handler
            .into()
            .ok_or_else(|| PlixError::InvalidCallback(signal.to_string()))?;
        self.handlers
            .entry(signal.to_string())
            .or_default()
            .push(handler);
        log::debug!("plix.callback.register: callback registered - signal={}", signal);
        Ok(())
    }

    /// Removes the first registration of `handler` under `signal`.
    pub fn deregister_callback(&mut self, signal: &str, handler: &PlixCallback) -> Result<()> {
        let handlers = self
            .handlers
            .get_mut(signal)
            .ok_or_else(|| PlixError::not_found("signal", signal))?;
        let index = handlers
            .iter()
            .position(|known| Arc::ptr_eq(known, handler))
            .ok_or_else(|| PlixError::not_found("callback", signal))?;
        handlers.remove(index);
        Ok(())
    }

    pub fn deregister_all_callbacks(&mut self) {
        self.handlers.clear();
    }

    pub fn registered_callbacks(&self) -> &BTreeMap<String, Vec<PlixCallback>> {
        &self.handlers
    }

    /// Invokes every handler of `signal` in registration order and returns
    /// the failures that were reported.
    pub fn emit(&self, signal: &str, args: &PlixSignalArgs) -> Vec<PlixFailure> {
        let Some(handlers) = self.handlers.get(signal) else {
            return Vec::new();
        };

        let mut failures = Vec::new();
        for handler in handlers {
            let outcome = catch_unwind(AssertUnwindSafe(|| handler(args)));
            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => PlixFailure::from_error(&err),
                Err(payload) => PlixFailure::from_panic(payload),
            };
            log::error!(
                "plix.callback.failed: callback raised - signal={}, error={}",
                signal,
                failure
            );
            failures.push(failure);
        }
        failures
    }
}

impl std::fmt::Debug for PlixCallbackBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(signal, handlers)| (signal.as_str(), handlers.len()))
            .collect();
        f.debug_struct("PlixCallbackBus").field("handlers", &counts).finish()
    }
}
