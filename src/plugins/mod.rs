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

//! # Built-in Plug-in Bodies
//!
//! Bodies that definition files can reference by factory name.
//!
//! | factory            | signature | config                                       |
//! |--------------------|-----------|----------------------------------------------|
//! | `context.set`      | context   | `{"entries": {key: value, ...}}`             |
//! | `instance.create`  | context   | `{"instances": [{"name", "family", "data"}]}`|
//! | `instance.set`     | instance  | `{"entries": {key: value, ...}}`             |
//! | `instance.require` | instance  | `{"keys": [key, ...]}`                       |
//! | `log.message`      | context   | `{"level": "info", "message": "..."}`        |

pub mod data;
pub mod message;

use crate::discovery::PlixFactoryRegistry;

/// Registers every built-in body factory.
pub fn register_builtin_factories(registry: &mut PlixFactoryRegistry) {
    registry.register("context.set", data::context_set_factory);
    registry.register("instance.create", data::instance_create_factory);
    registry.register("instance.set", data::instance_set_factory);
    registry.register("instance.require", data::instance_require_factory);
    registry.register("log.message", message::log_message_factory);
}
