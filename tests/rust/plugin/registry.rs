//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Plix.
//! The Plix project belongs to the Dunimd Team.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use plix::{
    callback, PlixCallback, PlixConfig, PlixError, PlixPluginDefinition, PlixRegistry,
    PlixSignalArgs, PLIX_SIGNAL_PLUGIN_REGISTERED,
};
use serde_json::json;

fn counting_callback(count: &Arc<AtomicUsize>) -> PlixCallback {
    let count = Arc::clone(count);
    callback(move |_| {
        count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

#[test]
fn test_register_unsupported_hosts() {
    let mut registry = PlixRegistry::new();
    registry.register_host("python");
    let plugin = PlixPluginDefinition::collector("MayaCollector")
        .hosts(["maya"])
        .build();

    let err = registry.register_plugin(plugin).unwrap_err();
    assert!(matches!(err, PlixError::UnsupportedHost { .. }));
    assert!(registry.registered_plugins().is_empty());
}

#[test]
fn test_register_supported_hosts() {
    let mut registry = PlixRegistry::new();
    registry.register_host("python");
    registry.register_host("maya");
    let plugin = PlixPluginDefinition::collector("MayaCollector")
        .hosts(["maya"])
        .build();
    registry.register_plugin(plugin).unwrap();
    assert_eq!(registry.registered_plugins().len(), 1);
}

#[test]
fn test_register_unsupported_version() {
    let mut registry = PlixRegistry::new();
    let plugin = PlixPluginDefinition::collector("Future")
        .requires("plix>=999.0.0")
        .build();
    let err = registry.register_plugin(plugin).unwrap_err();
    assert!(matches!(err, PlixError::UnsupportedVersion { .. }));
    assert!(registry.registered_plugins().is_empty());

    let plugin = PlixPluginDefinition::collector("Exact")
        .requires("plix==0")
        .build();
    assert!(matches!(
        registry.register_plugin(plugin),
        Err(PlixError::UnsupportedVersion { .. })
    ));
}

#[test]
fn test_register_compatible_version() {
    let mut registry = PlixRegistry::new();
    let plugin = PlixPluginDefinition::collector("Current")
        .requires(&format!("plix>={}", plix::PLIX_VERSION))
        .build();
    registry.register_plugin(plugin).unwrap();

    let listed = PlixPluginDefinition::collector("Listed")
        .requires_value(json!([1, 0, 0]))
        .build();
    registry.register_plugin(listed).unwrap();
    assert_eq!(registry.registered_plugins().len(), 2);
}

#[test]
fn test_register_malformed() {
    let mut registry = PlixRegistry::new();
    let bad_families = PlixPluginDefinition::collector("BadFamilies")
        .families_value(json!(true))
        .build();
    let bad_hosts = PlixPluginDefinition::collector("BadHosts")
        .hosts_value(json!([1, 2]))
        .build();
    let bad_requires = PlixPluginDefinition::collector("BadRequires")
        .requires_value(json!({"min": 1}))
        .build();

    for plugin in [bad_families, bad_hosts, bad_requires] {
        assert!(matches!(
            registry.register_plugin(plugin),
            Err(PlixError::MalformedDescriptor { .. })
        ));
    }
    assert!(registry.registered_plugins().is_empty());
}

#[test]
fn test_register_abstract_plugin() {
    let mut registry = PlixRegistry::new();
    let plugin = PlixPluginDefinition::new("NotValid").abstract_plugin().build();
    assert_eq!(
        registry.register_plugin(plugin),
        Err(PlixError::NotInvocable("NotValid".to_string()))
    );
}

#[test]
fn test_register_is_idempotent() {
    let mut registry = PlixRegistry::new();
    let count = Arc::new(AtomicUsize::new(0));
    registry
        .register_callback(PLIX_SIGNAL_PLUGIN_REGISTERED, counting_callback(&count))
        .unwrap();

    let plugin = PlixPluginDefinition::collector("Once").build();
    registry.register_plugin(Arc::clone(&plugin)).unwrap();
    registry.register_plugin(Arc::clone(&plugin)).unwrap();

    assert_eq!(registry.registered_plugins().len(), 1);
    assert_eq!(count.load(Ordering::SeqCst), 1);

    registry.deregister_plugin(&plugin).unwrap();
    assert!(registry.registered_plugins().is_empty());
    assert!(matches!(
        registry.deregister_plugin(&plugin),
        Err(PlixError::NotFound { .. })
    ));
}

#[test]
fn test_plugin_registered_signal_carries_the_name() {
    let mut registry = PlixRegistry::new();
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    registry
        .register_callback(
            PLIX_SIGNAL_PLUGIN_REGISTERED,
            callback(move |args: &PlixSignalArgs| {
                let name = args["plugin"].as_str().unwrap_or_default().to_string();
                sink.lock().unwrap().push(name);
                Ok(())
            }),
        )
        .unwrap();
    registry
        .register_plugin(PlixPluginDefinition::collector("Announced").build())
        .unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["Announced".to_string()]);
}

#[test]
fn test_current_host() {
    let mut registry = PlixRegistry::new();
    registry.register_host("myhost");
    assert_eq!(registry.current_host(), Some("myhost"));
    assert!(matches!(
        registry.deregister_host("notExist"),
        Err(PlixError::NotFound { .. })
    ));
}

#[test]
fn test_register_host() {
    let mut registry = PlixRegistry::new();
    registry.register_host("myhost");
    assert!(registry.registered_hosts().iter().any(|host| host == "myhost"));
    registry.deregister_host("myhost").unwrap();
    assert!(!registry.registered_hosts().iter().any(|host| host == "myhost"));
}

#[test]
fn test_plugin_paths_are_ordered_and_unique() {
    let mut registry = PlixRegistry::new();
    registry.register_plugin_path("/b");
    registry.register_plugin_path("/a");
    registry.register_plugin_path("/b");
    assert_eq!(
        registry.registered_paths(),
        &[std::path::PathBuf::from("/b"), std::path::PathBuf::from("/a")]
    );
    registry.deregister_plugin_path("/b").unwrap();
    assert!(matches!(
        registry.deregister_plugin_path("/b"),
        Err(PlixError::NotFound { .. })
    ));
}

#[test]
fn test_registry_from_config() {
    let config = PlixConfig::new()
        .host("python")
        .plugin_path("/studio/plugins")
        .path_env(None);
    let registry = PlixRegistry::from_config(&config);
    assert_eq!(registry.registered_hosts(), &["python".to_string()]);
    assert_eq!(
        registry.registered_paths(),
        &[std::path::PathBuf::from("/studio/plugins")]
    );
}

#[test]
fn test_register_callback() {
    let mut registry = PlixRegistry::new();
    let my_callback = callback(|_| Ok(()));
    let other_callback = callback(|_| Ok(()));

    registry.register_callback("mySignal", Arc::clone(&my_callback)).unwrap();
    let callbacks = registry.registered_callbacks();
    assert_eq!(callbacks.len(), 1);
    assert!(Arc::ptr_eq(&callbacks["mySignal"][0], &my_callback));

    registry.deregister_callback("mySignal", &my_callback).unwrap();
    let callbacks = registry.registered_callbacks();
    assert_eq!(callbacks.len(), 1);
    assert!(callbacks["mySignal"].is_empty());

    registry.register_callback("mySignal", Arc::clone(&my_callback)).unwrap();
    registry.register_callback("otherSignal", other_callback).unwrap();
    registry.deregister_all_callbacks();
    assert!(registry.registered_callbacks().is_empty());
}

#[test]
fn test_emit_invokes_handler_once() {
    let mut registry = PlixRegistry::new();
    let count = Arc::new(AtomicUsize::new(0));
    registry.register_callback("S", counting_callback(&count)).unwrap();
    let failures = registry.emit("S", &PlixSignalArgs::new());
    assert!(failures.is_empty());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_emit_signal_wrongly() {
    let mut registry = PlixRegistry::new();
    let count = Arc::new(AtomicUsize::new(0));
    registry
        .register_callback("otherSignal", callback(|_| anyhow::bail!("wrong keyword")))
        .unwrap();
    registry
        .register_callback("otherSignal", counting_callback(&count))
        .unwrap();

    let mut args = PlixSignalArgs::new();
    args.insert("akeyword".to_string(), json!(""));
    let failures = registry.emit("otherSignal", &args);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].message, "wrong keyword");
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_registering_invalid_callback() {
    let mut registry = PlixRegistry::new();
    assert_eq!(
        registry.register_callback("invalid", None::<PlixCallback>),
        Err(PlixError::InvalidCallback("invalid".to_string()))
    );
}

#[test]
fn test_deregistering_nonexisting_callback() {
    let mut registry = PlixRegistry::new();
    let handler = callback(|_| Ok(()));
    assert!(matches!(
        registry.deregister_callback("invalid", &handler),
        Err(PlixError::NotFound { .. })
    ));

    registry.register_callback("valid", callback(|_| Ok(()))).unwrap();
    assert!(matches!(
        registry.deregister_callback("valid", &handler),
        Err(PlixError::NotFound { .. })
    ));
}

#[test]
fn test_reset_restores_empty_state() {
    let mut registry = PlixRegistry::new();
    registry.register_host("python");
    registry.register_callback("S", callback(|_| Ok(()))).unwrap();
    registry.reset();
    assert!(registry.registered_hosts().is_empty());
    assert!(registry.registered_callbacks().is_empty());
    assert_eq!(registry.current_host(), None);
}
