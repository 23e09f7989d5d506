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

//! Per-invocation logging channel handed to plug-in bodies.
//!
//! Every invocation gets its own [`PlixPluginLog`]. Records written to it are
//! kept for the invocation's result and forwarded to the `log` facade under
//! the `plix::plugin` target, so hosts that install a logger still see them.

use std::cell::RefCell;
use std::fmt;

use chrono::{DateTime, Utc};
use log::Level;
use serde_json::{json, Value};

/// Target used when forwarding plug-in records to the `log` facade.
pub const PLIX_PLUGIN_LOG_TARGET: &str = "plix::plugin";

/// One message emitted by a plug-in during an invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct PlixLogRecord {
    pub level: Level,
    pub message: String,
    /// Name of the plug-in or action that emitted the record.
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl PlixLogRecord {
    pub fn to_json(&self) -> Value {
        json!({
            "level": self.level.as_str(),
            "message": self.message,
            "source": self.source,
            "timestamp": self.timestamp.to_rfc3339(),
        })
    }
}

impl fmt::Display for PlixLogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.level, self.source, self.message)
    }
}

/// Logger unique to a single plug-in invocation.
#[derive(Debug)]
pub struct PlixPluginLog {
    source: String,
    records: RefCell<Vec<PlixLogRecord>>,
}

impl PlixPluginLog {
    pub fn new(source: impl Into<String>) -> Self {
        PlixPluginLog {
            source: source.into(),
            records: RefCell::new(Vec::new()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        let message = message.into();
        log::log!(target: PLIX_PLUGIN_LOG_TARGET, level, "{}: {}", self.source, message);
        self.records.borrow_mut().push(PlixLogRecord {
            level,
            message,
            source: self.source.clone(),
            timestamp: Utc::now(),
        });
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    /// Number of records captured so far.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn into_records(self) -> Vec<PlixLogRecord> {
        self.records.into_inner()
    }
}
