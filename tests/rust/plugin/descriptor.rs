//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Plix.
//! The Plix project belongs to the Dunimd Team.

use plix::{
    PlixAction, PlixActionKind, PlixActionOn, PlixDispatchMode, PlixEntryPoint, PlixFilter,
    PlixPluginBase, PlixPluginDefinition, PlixSignature, PLIX_COLLECTOR_ORDER,
    PLIX_EXTRACTOR_ORDER, PLIX_INTEGRATOR_ORDER, PLIX_PLUGIN_ORDER, PLIX_VALIDATOR_ORDER,
};

#[test]
fn test_order_bands() {
    assert_eq!(PlixPluginDefinition::new("P").build().order(), PLIX_PLUGIN_ORDER);
    assert_eq!(PlixPluginDefinition::selector("S").build().order(), PLIX_COLLECTOR_ORDER);
    assert_eq!(PlixPluginDefinition::collector("C").build().order(), PLIX_COLLECTOR_ORDER);
    assert_eq!(PlixPluginDefinition::validator("V").build().order(), PLIX_VALIDATOR_ORDER);
    assert_eq!(PlixPluginDefinition::extractor("E").build().order(), PLIX_EXTRACTOR_ORDER);
    assert_eq!(PlixPluginDefinition::integrator("I").build().order(), PLIX_INTEGRATOR_ORDER);
    assert_eq!(PlixPluginDefinition::conformer("F").build().order(), PLIX_INTEGRATOR_ORDER);
    assert_eq!(PlixPluginDefinition::validator("V").order(1.25).build().order(), 1.25);
}

#[test]
fn test_defaults_are_wildcards() {
    let plugin = PlixPluginDefinition::new("Defaults").build();
    assert!(plugin.hosts().is_wildcard());
    assert!(plugin.families().is_wildcard());
    assert!(plugin.requires().is_none());
    assert!(plugin.process().is_none());
    assert!(plugin.repair().is_none());
    assert!(!plugin.is_legacy());
    assert_eq!(plugin.label(), "Defaults");
    assert_eq!(plugin.to_string(), "Defaults");
}

#[test]
fn test_explicit_bases_fix_the_dispatch_mode() {
    let context = PlixPluginDefinition::context_plugin("Context")
        .process(PlixEntryPoint::context(|_, _| Ok(())))
        .build();
    let instance = PlixPluginDefinition::instance_plugin("Instance")
        .process(PlixEntryPoint::instance(|_, _| Ok(())))
        .build();
    let bare = PlixPluginDefinition::instance_plugin("Bare").build();

    assert_eq!(context.base(), PlixPluginBase::ContextPlugin);
    assert_eq!(context.dispatch_mode(), PlixDispatchMode::ContextLevel);
    assert_eq!(instance.dispatch_mode(), PlixDispatchMode::InstanceLevel);
    assert_eq!(bare.dispatch_mode(), PlixDispatchMode::InstanceLevel);
    assert!(context.signature_mismatch().is_none());
    assert!(instance.signature_mismatch().is_none());
}

#[test]
fn test_implicit_plugins_follow_their_signature() {
    let per_instance = PlixPluginDefinition::validator("PerInstance")
        .process(PlixEntryPoint::instance(|_, _| Ok(())))
        .build();
    let per_context = PlixPluginDefinition::collector("PerContext")
        .process(PlixEntryPoint::context(|_, _| Ok(())))
        .build();
    assert_eq!(per_instance.dispatch_mode(), PlixDispatchMode::InstanceLevel);
    assert_eq!(per_context.dispatch_mode(), PlixDispatchMode::ContextLevel);
    assert_eq!(
        per_instance.process().map(PlixEntryPoint::signature),
        Some(PlixSignature::Instance)
    );
}

#[test]
fn test_contradicting_signatures_are_flagged() {
    let wrong_instance = PlixPluginDefinition::instance_plugin("WrongInstance")
        .process(PlixEntryPoint::context_instance(|_, _, _| Ok(())))
        .build();
    let wrong_context = PlixPluginDefinition::context_plugin("WrongContext")
        .process(PlixEntryPoint::instance(|_, _| Ok(())))
        .build();
    assert!(wrong_instance.signature_mismatch().is_some());
    assert!(wrong_context.signature_mismatch().is_some());
}

#[test]
fn test_repair_context_is_republished_as_repair() {
    let plugin = PlixPluginDefinition::validator("ValidateInstances")
        .legacy_repair_context(|_, _| Ok(()))
        .build();
    assert!(plugin.is_legacy());
    assert_eq!(
        plugin.repair().map(PlixEntryPoint::signature),
        Some(PlixSignature::Context)
    );
    assert!(plugin.legacy_process_context().is_none());
    assert_eq!(plugin.dispatch_mode(), PlixDispatchMode::ContextLevel);
}

#[test]
fn test_legacy_process_methods_select_legacy_dispatch() {
    let plugin = PlixPluginDefinition::new("Old")
        .legacy_process_context(|_, _| Ok(()))
        .legacy_process_instance(|_, _| Ok(()))
        .build();
    assert!(plugin.is_legacy());
    assert_eq!(plugin.dispatch_mode(), PlixDispatchMode::Legacy);
}

#[test]
fn test_family_filters() {
    let plugin = PlixPluginDefinition::instance_plugin("Filtered")
        .families(["F"])
        .build();
    assert_eq!(plugin.families(), &PlixFilter::Names(vec!["F".to_string()]));
    assert!(plugin.families().matches("F"));
    assert!(!plugin.families().matches("G"));
    assert!(plugin.families().intersects(&["G", "F"]));
    assert!(!plugin.families().intersects::<&str>(&[]));
}

#[test]
fn test_actions() {
    let plugin = PlixPluginDefinition::context_plugin("WithActions")
        .action(PlixAction::category("Tools"))
        .action(PlixAction::new("Open").label("Open file").icon("folder").on("failed"))
        .action(PlixAction::separator())
        .build();

    let names: Vec<&str> = plugin.actions().iter().map(PlixAction::name).collect();
    assert_eq!(names, vec!["Tools", "Open", "Separator"]);

    let open = plugin.action("Open").unwrap();
    assert_eq!(open.display_label(), "Open file");
    assert_eq!(open.icon_name(), Some("folder"));
    assert_eq!(open.trigger(), PlixActionOn::Failed);
    assert!(open.is_invocable());
    assert!(open.error().is_none());

    assert_eq!(plugin.actions()[0].kind(), PlixActionKind::Category);
    assert!(!plugin.actions()[0].is_invocable());
    assert_eq!(plugin.actions()[2].kind(), PlixActionKind::Separator);
    assert!(!plugin.actions()[2].is_invocable());
}

#[test]
fn test_action_error_checking() {
    let valid = PlixAction::new("MyActionValid").on("all");
    let invalid = PlixAction::new("MyActionInvalid").on("invalid");
    assert!(valid.error().is_none());
    assert!(invalid.error().is_some());
    assert_eq!(invalid.trigger(), PlixActionOn::All);
}

#[test]
fn test_action_printing() {
    let action = PlixAction::new("MyAction");
    assert_eq!(action.to_string(), "MyAction");
    assert_eq!(format!("{:?}", action), "PlixAction(\"MyAction\")");
}

#[test]
fn test_action_triggers_round_trip_their_names() {
    for name in ["all", "notProcessed", "processed", "failed", "succeeded", "warning"] {
        assert_eq!(PlixActionOn::parse(name).map(|on| on.as_str()), Some(name));
    }
    assert!(PlixActionOn::parse("sometimes").is_none());
}
