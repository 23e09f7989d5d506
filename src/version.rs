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

//! Engine version and plug-in version requirements.
//!
//! A plug-in may declare the engine versions it works with through `requires`.
//! Two shapes are accepted:
//!
//! - a list of up to three integers, read as a minimum (`[1, 1, 0]` means
//!   `>=1.1.0`)
//! - a requirement string with an optional package prefix, e.g. `"plix>=1"`,
//!   `"plix==1.1.0"` or `">=1.0, <2"`; a bare version is read as a minimum

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use semver::{Version, VersionReq};
use serde_json::Value;

/// Version of the running engine, as published in `Cargo.toml`.
pub const PLIX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the running engine version.
pub fn engine_version() -> Version {
    Version::parse(PLIX_VERSION).unwrap_or_else(|_| Version::new(0, 0, 0))
}

/// Parsed `requires` declaration of a plug-in.
#[derive(Clone, Debug, PartialEq)]
pub struct PlixVersionRequirement {
    raw: String,
    req: VersionReq,
}

impl PlixVersionRequirement {
    /// Parses a requirement string such as `"plix>=1.0"` or `"==0"`.
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let expression = _strip_package_prefix(text.trim());
        if expression.is_empty() {
            return Err(format!("empty version requirement '{text}'"));
        }

        let normalized = expression
            .split(',')
            .map(|part| {
                let part = part.trim();
                if let Some(rest) = part.strip_prefix("==") {
                    format!("={}", rest.trim())
                } else if part.starts_with(|c: char| c.is_ascii_digit()) {
                    format!(">={part}")
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let req = VersionReq::parse(&normalized)
            .map_err(|err| format!("invalid version requirement '{text}': {err}"))?;
        Ok(PlixVersionRequirement {
            raw: text.to_string(),
            req,
        })
    }

    /// Builds a minimum-version requirement from `(major, minor, patch)`.
    pub fn minimum(major: u64, minor: u64, patch: u64) -> Self {
        let version = Version::new(major, minor, patch);
        PlixVersionRequirement {
            raw: format!(">={version}"),
            req: VersionReq {
                comparators: vec![semver::Comparator {
                    op: semver::Op::GreaterEq,
                    major,
                    minor: Some(minor),
                    patch: Some(patch),
                    pre: semver::Prerelease::EMPTY,
                }],
            },
        }
    }

    /// Interprets a declared `requires` value.
    pub fn from_value(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::String(text) => Self::parse(text),
            Value::Array(parts) if !parts.is_empty() && parts.len() <= 3 => {
                let mut numbers = [0u64; 3];
                for (slot, part) in numbers.iter_mut().zip(parts) {
                    *slot = part
                        .as_u64()
                        .ok_or_else(|| format!("version component {part} is not an integer"))?;
                }
                Ok(Self::minimum(numbers[0], numbers[1], numbers[2]))
            }
            other => Err(format!(
                "requires must be a string or a list of up to three integers, got {other}"
            )),
        }
    }

    /// Returns whether `version` satisfies this requirement.
    pub fn matches(&self, version: &Version) -> bool {
        self.req.matches(version)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PlixVersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn _strip_package_prefix(text: &str) -> &str {
    static PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    let prefix = PREFIX.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*").ok());
    match prefix.as_ref().and_then(|re| re.find(text)) {
        Some(found) => text[found.end()..].trim_start(),
        None => text,
    }
}
