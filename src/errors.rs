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

//! # Plix Error Module
//!
//! This module defines the contract-violation errors raised by Plix at
//! registration and configuration time.
//!
//! ## Two Failure Channels
//!
//! Plix separates failures into two channels:
//!
//! - **Contract violations**: a malformed descriptor, an unsupported host or
//!   version, a non-invocable registration target or an unknown callback.
//!   These are programmer mistakes and are returned immediately as
//!   [`PlixError`].
//! - **Runtime failures**: a plug-in body returning an error or panicking.
//!   These never surface as `PlixError`; the processor records them on the
//!   invocation's [`crate::result::PlixResult`] and the run continues.
//!
//! ## Usage
//!
//! ```rust
//! use plix::errors::{PlixError, Result};
//!
//! fn example(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(PlixError::validation("name cannot be empty"));
//!     }
//!     Ok(())
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Plix.
pub type Result<T> = std::result::Result<T, PlixError>;

/// Canonical error enumeration for Plix.
#[derive(Debug, Error, Serialize, Deserialize, PartialEq)]
pub enum PlixError {
    /// A descriptor declared `hosts`, `families`, `requires` or actions in a
    /// shape the engine cannot interpret.
    #[error("malformed plug-in '{plugin}': {message}")]
    MalformedDescriptor { plugin: String, message: String },

    /// None of the registered hosts appear in the plug-in's `hosts`.
    #[error("plug-in '{plugin}' does not support the current host(s) {hosts:?}")]
    UnsupportedHost { plugin: String, hosts: Vec<String> },

    /// The running engine version does not satisfy `requires`.
    #[error("plug-in '{plugin}' requires '{requirement}', running {running}")]
    UnsupportedVersion {
        plugin: String,
        requirement: String,
        running: String,
    },

    /// The registration target is an abstract placeholder.
    #[error("'{0}' is not an invocable plug-in")]
    NotInvocable(String),

    /// A callback handler that cannot be invoked.
    #[error("invalid callback for signal '{0}'")]
    InvalidCallback(String),

    /// Lookup of a host, plug-in, path, callback, instance or action failed.
    #[error("{kind} not found: {name}")]
    NotFound { kind: String, name: String },

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<io::Error> for PlixError {
    fn from(err: io::Error) -> Self {
        PlixError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PlixError {
    fn from(err: serde_json::Error) -> Self {
        PlixError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for PlixError {
    fn from(err: serde_yaml::Error) -> Self {
        PlixError::Serde(err.to_string())
    }
}

impl PlixError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        PlixError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct malformed-descriptor errors.
    pub fn malformed(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        PlixError::MalformedDescriptor {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// Helper to construct lookup failures.
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        PlixError::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }
}
