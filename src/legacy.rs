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

//! # Legacy Adapter
//!
//! Plug-ins written before explicit dispatch existed expose separately named
//! methods instead of a single `process` entry point:
//!
//! | superseded name     | current contract                            |
//! |---------------------|---------------------------------------------|
//! | `process_context`   | called once with the context (Legacy mode)  |
//! | `process_instance`  | called per matching instance (Legacy mode)  |
//! | `repair_context`    | republished as `repair` (context signature) |
//! | `repair_instance`   | republished as `repair` (instance signature)|
//!
//! [`adapt`] is applied exactly once, when a definition is turned into a
//! [`crate::plugin::PlixPlugin`]. It is a pure transformation: the resulting
//! descriptor exposes `repair` and the legacy process pair, and no longer
//! carries the superseded repair names.

use crate::plugin::{PlixContextFn, PlixEntryPoint, PlixInstanceFn};

/// Methods a definition declared under their superseded names.
#[derive(Clone, Default)]
pub struct PlixLegacyMethods {
    pub process_context: Option<PlixContextFn>,
    pub process_instance: Option<PlixInstanceFn>,
    pub repair_context: Option<PlixContextFn>,
    pub repair_instance: Option<PlixInstanceFn>,
}

impl PlixLegacyMethods {
    pub fn is_empty(&self) -> bool {
        self.process_context.is_none()
            && self.process_instance.is_none()
            && self.repair_context.is_none()
            && self.repair_instance.is_none()
    }
}

/// Entry points after legacy names have been normalized.
#[derive(Clone, Default)]
pub(crate) struct PlixAdaptedEntries {
    pub process: Option<PlixEntryPoint>,
    pub repair: Option<PlixEntryPoint>,
    pub process_context: Option<PlixContextFn>,
    pub process_instance: Option<PlixInstanceFn>,
    pub is_legacy: bool,
}

impl PlixAdaptedEntries {
    /// Whether the plug-in must be dispatched through the legacy pair.
    pub fn uses_legacy_dispatch(&self) -> bool {
        self.process_context.is_some() || self.process_instance.is_some()
    }
}

/// Rewrites superseded method names into the current dispatch contract.
///
/// An explicit `repair` always wins over a superseded repair name; when both
/// `repair_context` and `repair_instance` are present the context variant is
/// kept.
pub(crate) fn adapt(
    process: Option<PlixEntryPoint>,
    repair: Option<PlixEntryPoint>,
    legacy: PlixLegacyMethods,
) -> PlixAdaptedEntries {
    let is_legacy = !legacy.is_empty();

    let repair = repair
        .or_else(|| legacy.repair_context.map(PlixEntryPoint::Context))
        .or_else(|| legacy.repair_instance.map(PlixEntryPoint::Instance));

    PlixAdaptedEntries {
        process,
        repair,
        process_context: legacy.process_context,
        process_instance: legacy.process_instance,
        is_legacy,
    }
}
