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

//! Structured outcome of a single plug-in or action invocation.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use crate::log::PlixLogRecord;
use crate::plugin::PlixPlugin;

/// How an invocation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlixFailureKind {
    /// The body returned an error.
    Error,
    /// The body panicked, typically a failed assertion.
    Panic,
    /// The body's signature contradicts the plug-in's dispatch mode; the body
    /// was never invoked.
    SignatureMismatch,
}

/// Failure captured by the fault boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct PlixFailure {
    pub kind: PlixFailureKind,
    pub message: String,
    /// Underlying causes, outermost first.
    pub causes: Vec<String>,
}

impl PlixFailure {
    pub fn from_error(err: &anyhow::Error) -> Self {
        PlixFailure {
            kind: PlixFailureKind::Error,
            message: err.to_string(),
            causes: err.chain().skip(1).map(|cause| cause.to_string()).collect(),
        }
    }

    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "plug-in panicked".to_string()
        };
        PlixFailure {
            kind: PlixFailureKind::Panic,
            message,
            causes: Vec::new(),
        }
    }

    pub fn signature_mismatch(message: impl Into<String>) -> Self {
        PlixFailure {
            kind: PlixFailureKind::SignatureMismatch,
            message: message.into(),
            causes: Vec::new(),
        }
    }
}

impl fmt::Display for PlixFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for cause in &self.causes {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

/// Instance an invocation ran against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlixInstanceRef {
    pub id: String,
    pub name: String,
}

/// Record of one invocation.
#[derive(Clone, Debug)]
pub struct PlixResult {
    pub success: bool,
    pub plugin: Arc<PlixPlugin>,
    /// Name of the action when an action ran instead of the plug-in body.
    pub action: Option<String>,
    /// `None` for whole-context invocations.
    pub instance: Option<PlixInstanceRef>,
    pub error: Option<PlixFailure>,
    pub records: Vec<PlixLogRecord>,
    pub duration: Duration,
}

impl PlixResult {
    pub fn instance_id(&self) -> Option<&str> {
        self.instance.as_ref().map(|instance| instance.id.as_str())
    }

    /// Summary suitable for transcripts and callbacks.
    pub fn to_json(&self) -> Value {
        json!({
            "success": self.success,
            "plugin": self.plugin.name(),
            "action": self.action,
            "instance": self.instance.as_ref().map(|instance| instance.name.clone()),
            "error": self.error.as_ref().map(|error| error.to_string()),
            "records": self.records.iter().map(PlixLogRecord::to_json).collect::<Vec<_>>(),
            "duration_ms": self.duration.as_secs_f64() * 1000.0,
        })
    }
}
