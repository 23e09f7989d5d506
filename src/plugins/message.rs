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

use std::str::FromStr;

use log::Level;
use serde_json::Value;

use crate::errors::{PlixError, Result};
use crate::plugin::PlixEntryPoint;

/// Writes a fixed message to the invocation log.
pub fn log_message_factory(config: &Value) -> Result<PlixEntryPoint> {
    let obj = config
        .as_object()
        .ok_or_else(|| PlixError::validation("log.message config must be object"))?;

    let message = obj
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| PlixError::validation("log.message requires string 'message'"))?
        .to_string();

    let level = match obj.get("level").and_then(Value::as_str) {
        // "warning" is accepted alongside the `log` crate's own "warn".
        Some("warning") => Level::Warn,
        Some(text) => Level::from_str(text)
            .map_err(|_| PlixError::validation(format!("unknown log level: {}", text)))?,
        None => Level::Info,
    };

    Ok(PlixEntryPoint::context(move |_context, log| {
        log.log(level, message.clone());
        Ok(())
    }))
}
