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

//! # Plix Plug-in Descriptor Model
//!
//! A plug-in is authored as a [`PlixPluginDefinition`] and frozen into an
//! immutable [`PlixPlugin`] descriptor by [`PlixPluginDefinition::build`].
//!
//! ## Authoring Bases
//!
//! - **Plugin**: the implicit, pre-1.1 base. Its dispatch mode follows the
//!   signature of its entry point: a context-only body runs once, a body that
//!   takes an instance runs once per matching instance. `Selector`,
//!   `Collector`, `Validator`, `Extractor`, `Integrator` and `Conformer` are
//!   this base with a conventional order.
//! - **ContextPlugin**: always runs once against the whole context.
//! - **InstancePlugin**: always runs once per matching instance.
//!
//! ## Dispatch Mode
//!
//! The mode is computed once, when the descriptor is built, and cached on it:
//!
//! ```text
//! legacy process_* methods present   -> Legacy
//! ContextPlugin                      -> ContextLevel
//! InstancePlugin                     -> InstanceLevel
//! Plugin + Instance/ContextInstance  -> InstanceLevel
//! Plugin + Context or no body        -> ContextLevel
//! ```
//!
//! A body whose signature contradicts an explicit base (an `InstancePlugin`
//! whose body expects the context, say) is not rejected at build time; the
//! processor refuses to invoke it and records a failed result instead.
//!
//! ## Declared Shapes
//!
//! `hosts`, `families` and `requires` are accepted as raw JSON so that
//! definitions loaded from disk can be checked the same way as definitions
//! built in code. Shapes that cannot be interpreted are remembered as
//! problems and reported by the compatibility validator at registration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::context::{PlixContext, PlixData, PlixInstance};
use crate::ident::next_id;
use crate::legacy::{adapt, PlixLegacyMethods};
use crate::log::PlixPluginLog;
use crate::version::PlixVersionRequirement;

/// Default order of the implicit `Plugin` base.
pub const PLIX_PLUGIN_ORDER: f64 = -1.0;
pub const PLIX_COLLECTOR_ORDER: f64 = 0.0;
pub const PLIX_VALIDATOR_ORDER: f64 = 1.0;
pub const PLIX_EXTRACTOR_ORDER: f64 = 2.0;
pub const PLIX_INTEGRATOR_ORDER: f64 = 3.0;

/// Body taking the whole context.
pub type PlixContextFn =
    Arc<dyn Fn(&mut PlixContext, &PlixPluginLog) -> anyhow::Result<()> + Send + Sync>;

/// Body taking a single instance.
pub type PlixInstanceFn =
    Arc<dyn Fn(&mut PlixInstance, &PlixPluginLog) -> anyhow::Result<()> + Send + Sync>;

/// Body taking the context's data store together with one instance.
pub type PlixContextInstanceFn = Arc<
    dyn Fn(&mut PlixData, &mut PlixInstance, &PlixPluginLog) -> anyhow::Result<()> + Send + Sync,
>;

/// Wraps a closure as a [`PlixContextFn`].
pub fn context_fn<F>(body: F) -> PlixContextFn
where
    F: Fn(&mut PlixContext, &PlixPluginLog) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(body)
}

/// Wraps a closure as a [`PlixInstanceFn`].
pub fn instance_fn<F>(body: F) -> PlixInstanceFn
where
    F: Fn(&mut PlixInstance, &PlixPluginLog) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(body)
}

/// Wraps a closure as a [`PlixContextInstanceFn`].
pub fn context_instance_fn<F>(body: F) -> PlixContextInstanceFn
where
    F: Fn(&mut PlixData, &mut PlixInstance, &PlixPluginLog) -> anyhow::Result<()>
        + Send
        + Sync
        + 'static,
{
    Arc::new(body)
}

/// Arguments an entry point expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlixSignature {
    Context,
    Instance,
    ContextInstance,
}

/// A processing entry point together with its signature.
#[derive(Clone)]
pub enum PlixEntryPoint {
    Context(PlixContextFn),
    Instance(PlixInstanceFn),
    ContextInstance(PlixContextInstanceFn),
}

impl PlixEntryPoint {
    pub fn context<F>(body: F) -> Self
    where
        F: Fn(&mut PlixContext, &PlixPluginLog) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        PlixEntryPoint::Context(Arc::new(body))
    }

    pub fn instance<F>(body: F) -> Self
    where
        F: Fn(&mut PlixInstance, &PlixPluginLog) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        PlixEntryPoint::Instance(Arc::new(body))
    }

    pub fn context_instance<F>(body: F) -> Self
    where
        F: Fn(&mut PlixData, &mut PlixInstance, &PlixPluginLog) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        PlixEntryPoint::ContextInstance(Arc::new(body))
    }

    pub fn signature(&self) -> PlixSignature {
        match self {
            PlixEntryPoint::Context(_) => PlixSignature::Context,
            PlixEntryPoint::Instance(_) => PlixSignature::Instance,
            PlixEntryPoint::ContextInstance(_) => PlixSignature::ContextInstance,
        }
    }
}

impl fmt::Debug for PlixEntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlixEntryPoint::{:?}", self.signature())
    }
}

/// Base a definition was authored against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlixPluginBase {
    Plugin,
    ContextPlugin,
    InstancePlugin,
}

/// How the processor invokes a plug-in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlixDispatchMode {
    Legacy,
    ContextLevel,
    InstanceLevel,
}

/// Wildcard-or-names filter used for `hosts` and `families`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlixFilter {
    Wildcard,
    Names(Vec<String>),
}

impl PlixFilter {
    /// Interprets a declared shape: `"*"`, or a list of strings where a `"*"`
    /// entry widens the filter to the wildcard.
    pub fn from_value(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::String(text) if text == "*" => Ok(PlixFilter::Wildcard),
            Value::Array(items) => {
                let mut names = Vec::with_capacity(items.len());
                for item in items {
                    let name = item
                        .as_str()
                        .ok_or_else(|| format!("expected a list of strings, found {item}"))?;
                    if name == "*" {
                        return Ok(PlixFilter::Wildcard);
                    }
                    names.push(name.to_string());
                }
                Ok(PlixFilter::Names(names))
            }
            other => Err(format!("expected \"*\" or a list of strings, found {other}")),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, PlixFilter::Wildcard)
    }

    pub fn names(&self) -> &[String] {
        match self {
            PlixFilter::Wildcard => &[],
            PlixFilter::Names(names) => names,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            PlixFilter::Wildcard => true,
            PlixFilter::Names(names) => names.iter().any(|candidate| candidate == name),
        }
    }

    /// Whether any of `names` passes the filter.
    pub fn intersects<S: AsRef<str>>(&self, names: &[S]) -> bool {
        match self {
            PlixFilter::Wildcard => true,
            PlixFilter::Names(_) => names.iter().any(|name| self.matches(name.as_ref())),
        }
    }
}

/// Result states an action is offered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlixActionOn {
    All,
    NotProcessed,
    Processed,
    Failed,
    Succeeded,
    Warning,
}

impl PlixActionOn {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "all" => Some(PlixActionOn::All),
            "notProcessed" => Some(PlixActionOn::NotProcessed),
            "processed" => Some(PlixActionOn::Processed),
            "failed" => Some(PlixActionOn::Failed),
            "succeeded" => Some(PlixActionOn::Succeeded),
            "warning" => Some(PlixActionOn::Warning),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlixActionOn::All => "all",
            PlixActionOn::NotProcessed => "notProcessed",
            PlixActionOn::Processed => "processed",
            PlixActionOn::Failed => "failed",
            PlixActionOn::Succeeded => "succeeded",
            PlixActionOn::Warning => "warning",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlixActionKind {
    Action,
    /// Menu heading; never invoked.
    Category,
    /// Menu divider; never invoked.
    Separator,
}

/// Plug-in shaped unit run on demand rather than during the main pass.
#[derive(Clone)]
pub struct PlixAction {
    id: String,
    name: String,
    label: Option<String>,
    icon: Option<String>,
    on: PlixActionOn,
    kind: PlixActionKind,
    entry: Option<PlixContextFn>,
    error: Option<String>,
}

impl PlixAction {
    pub fn new(name: impl Into<String>) -> Self {
        PlixAction {
            id: next_id('a'),
            name: name.into(),
            label: None,
            icon: None,
            on: PlixActionOn::All,
            kind: PlixActionKind::Action,
            entry: None,
            error: None,
        }
    }

    pub fn category(label: impl Into<String>) -> Self {
        let label = label.into();
        let mut action = Self::new(label.clone());
        action.label = Some(label);
        action.kind = PlixActionKind::Category;
        action
    }

    pub fn separator() -> Self {
        let mut action = Self::new("Separator");
        action.kind = PlixActionKind::Separator;
        action
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the trigger. An unknown trigger is recorded in [`Self::error`]
    /// and the action keeps its previous trigger.
    pub fn on(mut self, trigger: &str) -> Self {
        match PlixActionOn::parse(trigger) {
            Some(on) => self.on = on,
            None => {
                self.error = Some(format!(
                    "'{}' is not a valid trigger for action '{}'",
                    trigger, self.name
                ));
            }
        }
        self
    }

    pub fn process<F>(self, body: F) -> Self
    where
        F: Fn(&mut PlixContext, &PlixPluginLog) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.with_entry(Arc::new(body))
    }

    pub fn with_entry(mut self, entry: PlixContextFn) -> Self {
        self.entry = Some(entry);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn icon_name(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn trigger(&self) -> PlixActionOn {
        self.on
    }

    pub fn kind(&self) -> PlixActionKind {
        self.kind
    }

    pub fn entry(&self) -> Option<&PlixContextFn> {
        self.entry.as_ref()
    }

    /// Problem found while the action was declared, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_invocable(&self) -> bool {
        self.kind == PlixActionKind::Action
    }
}

impl fmt::Display for PlixAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for PlixAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PlixAction").field(&self.name).finish()
    }
}

/// User-supplied plug-in definition, before normalization.
#[derive(Clone)]
pub struct PlixPluginDefinition {
    name: String,
    label: Option<String>,
    base: PlixPluginBase,
    order: f64,
    hosts: Value,
    families: Value,
    requires: Option<Value>,
    actions: Vec<PlixAction>,
    process: Option<PlixEntryPoint>,
    repair: Option<PlixEntryPoint>,
    legacy: PlixLegacyMethods,
    is_abstract: bool,
    source: Option<PathBuf>,
}

impl PlixPluginDefinition {
    /// Definition on the implicit `Plugin` base.
    pub fn new(name: impl Into<String>) -> Self {
        PlixPluginDefinition {
            name: name.into(),
            label: None,
            base: PlixPluginBase::Plugin,
            order: PLIX_PLUGIN_ORDER,
            hosts: Value::from("*"),
            families: Value::from("*"),
            requires: None,
            actions: Vec::new(),
            process: None,
            repair: None,
            legacy: PlixLegacyMethods::default(),
            is_abstract: false,
            source: None,
        }
    }

    pub fn context_plugin(name: impl Into<String>) -> Self {
        Self::new(name).base(PlixPluginBase::ContextPlugin)
    }

    pub fn instance_plugin(name: impl Into<String>) -> Self {
        Self::new(name).base(PlixPluginBase::InstancePlugin)
    }

    pub fn selector(name: impl Into<String>) -> Self {
        Self::new(name).order(PLIX_COLLECTOR_ORDER)
    }

    pub fn collector(name: impl Into<String>) -> Self {
        Self::new(name).order(PLIX_COLLECTOR_ORDER)
    }

    pub fn validator(name: impl Into<String>) -> Self {
        Self::new(name).order(PLIX_VALIDATOR_ORDER)
    }

    pub fn extractor(name: impl Into<String>) -> Self {
        Self::new(name).order(PLIX_EXTRACTOR_ORDER)
    }

    pub fn integrator(name: impl Into<String>) -> Self {
        Self::new(name).order(PLIX_INTEGRATOR_ORDER)
    }

    pub fn conformer(name: impl Into<String>) -> Self {
        Self::new(name).order(PLIX_INTEGRATOR_ORDER)
    }

    pub fn base(mut self, base: PlixPluginBase) -> Self {
        self.base = base;
        self
    }

    pub fn order(mut self, order: f64) -> Self {
        self.order = order;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn hosts<I, S>(self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts_value(_string_list(hosts))
    }

    /// Declares `hosts` from a raw shape, as read from a definition file.
    pub fn hosts_value(mut self, hosts: Value) -> Self {
        self.hosts = hosts;
        self
    }

    pub fn families<I, S>(self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.families_value(_string_list(families))
    }

    pub fn families_value(mut self, families: Value) -> Self {
        self.families = families;
        self
    }

    /// Declares the engine versions the plug-in works with, e.g. `"plix>=1.1"`.
    pub fn requires(self, requirement: &str) -> Self {
        self.requires_value(Value::from(requirement))
    }

    pub fn requires_value(mut self, requirement: Value) -> Self {
        self.requires = Some(requirement);
        self
    }

    pub fn action(mut self, action: PlixAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn process(mut self, entry: PlixEntryPoint) -> Self {
        self.process = Some(entry);
        self
    }

    pub fn repair(mut self, entry: PlixEntryPoint) -> Self {
        self.repair = Some(entry);
        self
    }

    pub fn legacy_process_context<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut PlixContext, &PlixPluginLog) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.legacy.process_context = Some(Arc::new(body));
        self
    }

    pub fn legacy_process_instance<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut PlixInstance, &PlixPluginLog) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.legacy.process_instance = Some(Arc::new(body));
        self
    }

    pub fn legacy_repair_context<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut PlixContext, &PlixPluginLog) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.legacy.repair_context = Some(Arc::new(body));
        self
    }

    pub fn legacy_repair_instance<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut PlixInstance, &PlixPluginLog) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.legacy.repair_instance = Some(Arc::new(body));
        self
    }

    /// Replaces every superseded method at once.
    pub fn legacy(mut self, legacy: PlixLegacyMethods) -> Self {
        self.legacy = legacy;
        self
    }

    /// Marks the definition as an abstract placeholder that cannot be
    /// registered.
    pub fn abstract_plugin(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalizes the definition into an immutable descriptor.
    pub fn build(self) -> Arc<PlixPlugin> {
        Arc::new(PlixPlugin::from_definition(self))
    }
}

/// Immutable descriptor of a processing unit.
pub struct PlixPlugin {
    id: String,
    name: String,
    label: Option<String>,
    base: PlixPluginBase,
    order: f64,
    hosts: PlixFilter,
    families: PlixFilter,
    requires: Option<PlixVersionRequirement>,
    actions: Vec<PlixAction>,
    dispatch_mode: PlixDispatchMode,
    is_legacy: bool,
    process: Option<PlixEntryPoint>,
    repair: Option<PlixEntryPoint>,
    process_context: Option<PlixContextFn>,
    process_instance: Option<PlixInstanceFn>,
    is_abstract: bool,
    source: Option<PathBuf>,
    problems: Vec<String>,
}

impl PlixPlugin {
    fn from_definition(definition: PlixPluginDefinition) -> Self {
        let mut problems = Vec::new();

        if !definition.order.is_finite() {
            problems.push(format!("order must be a finite number, got {}", definition.order));
        }

        let hosts = PlixFilter::from_value(&definition.hosts).unwrap_or_else(|err| {
            problems.push(format!("hosts: {err}"));
            PlixFilter::Names(Vec::new())
        });
        let families = PlixFilter::from_value(&definition.families).unwrap_or_else(|err| {
            problems.push(format!("families: {err}"));
            PlixFilter::Names(Vec::new())
        });
        let requires = match &definition.requires {
            Some(value) => match PlixVersionRequirement::from_value(value) {
                Ok(requirement) => Some(requirement),
                Err(err) => {
                    problems.push(format!("requires: {err}"));
                    None
                }
            },
            None => None,
        };

        let entries = adapt(definition.process, definition.repair, definition.legacy);
        let dispatch_mode = if entries.uses_legacy_dispatch() {
            PlixDispatchMode::Legacy
        } else {
            match definition.base {
                PlixPluginBase::ContextPlugin => PlixDispatchMode::ContextLevel,
                PlixPluginBase::InstancePlugin => PlixDispatchMode::InstanceLevel,
                PlixPluginBase::Plugin => match entries.process.as_ref().map(PlixEntryPoint::signature) {
                    Some(PlixSignature::Instance) | Some(PlixSignature::ContextInstance) => {
                        PlixDispatchMode::InstanceLevel
                    }
                    _ => PlixDispatchMode::ContextLevel,
                },
            }
        };

        PlixPlugin {
            id: next_id('p'),
            name: definition.name,
            label: definition.label,
            base: definition.base,
            order: definition.order,
            hosts,
            families,
            requires,
            actions: definition.actions,
            dispatch_mode,
            is_legacy: entries.is_legacy,
            process: entries.process,
            repair: entries.repair,
            process_context: entries.process_context,
            process_instance: entries.process_instance,
            is_abstract: definition.is_abstract,
            source: definition.source,
            problems,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn base(&self) -> PlixPluginBase {
        self.base
    }

    pub fn order(&self) -> f64 {
        self.order
    }

    pub fn hosts(&self) -> &PlixFilter {
        &self.hosts
    }

    pub fn families(&self) -> &PlixFilter {
        &self.families
    }

    pub fn requires(&self) -> Option<&PlixVersionRequirement> {
        self.requires.as_ref()
    }

    pub fn actions(&self) -> &[PlixAction] {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&PlixAction> {
        self.actions.iter().find(|action| action.name() == name)
    }

    pub fn dispatch_mode(&self) -> PlixDispatchMode {
        self.dispatch_mode
    }

    /// Whether the definition used any superseded method name.
    pub fn is_legacy(&self) -> bool {
        self.is_legacy
    }

    pub fn process(&self) -> Option<&PlixEntryPoint> {
        self.process.as_ref()
    }

    pub fn repair(&self) -> Option<&PlixEntryPoint> {
        self.repair.as_ref()
    }

    pub fn legacy_process_context(&self) -> Option<&PlixContextFn> {
        self.process_context.as_ref()
    }

    pub fn legacy_process_instance(&self) -> Option<&PlixInstanceFn> {
        self.process_instance.as_ref()
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Definition file the plug-in was discovered in.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Shape problems recorded while the descriptor was built.
    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    /// Whether the plug-in applies to an instance with the given families.
    /// An instance without any family only matches a wildcard filter.
    pub fn accepts(&self, instance: &PlixInstance) -> bool {
        self.families.intersects(&instance.families())
    }

    /// Explains why the body cannot be invoked under the declared base.
    pub fn signature_mismatch(&self) -> Option<String> {
        let signature = self.process.as_ref().map(PlixEntryPoint::signature)?;
        match (self.base, signature) {
            (PlixPluginBase::ContextPlugin, PlixSignature::Context) => None,
            (PlixPluginBase::ContextPlugin, other) => Some(format!(
                "'{}' is a ContextPlugin but its process entry expects {:?}",
                self.name, other
            )),
            (PlixPluginBase::InstancePlugin, PlixSignature::Instance) => None,
            (PlixPluginBase::InstancePlugin, other) => Some(format!(
                "'{}' is an InstancePlugin but its process entry expects {:?}",
                self.name, other
            )),
            (PlixPluginBase::Plugin, _) => None,
        }
    }
}

impl fmt::Display for PlixPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for PlixPluginDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlixPluginDefinition")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("order", &self.order)
            .field("hosts", &self.hosts)
            .field("families", &self.families)
            .finish()
    }
}

impl fmt::Debug for PlixPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlixPlugin")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("order", &self.order)
            .field("dispatch_mode", &self.dispatch_mode)
            .field("hosts", &self.hosts)
            .field("families", &self.families)
            .finish()
    }
}

/// Sorts plug-ins by ascending order, keeping the given order for ties.
pub fn sort_plugins(plugins: &mut [Arc<PlixPlugin>]) {
    plugins.sort_by(|left, right| left.order().total_cmp(&right.order()));
}

fn _string_list<I, S>(items: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Array(items.into_iter().map(|item| Value::String(item.into())).collect())
}
