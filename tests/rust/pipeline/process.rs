//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Plix.
//! The Plix project belongs to the Dunimd Team.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use plix::{
    callback, publish, publish_with, PlixAction, PlixContext, PlixEntryPoint, PlixError,
    PlixFailureKind, PlixPlugin, PlixPluginDefinition, PlixProcessor, PlixPublishOptions,
    PlixPublishPolicy, PlixRegistry, PLIX_SIGNAL_PLUGIN_PROCESSED, PLIX_SIGNAL_PUBLISHED,
};
use serde_json::{json, Value};

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

fn names(context: &PlixContext) -> Vec<String> {
    context
        .results()
        .iter()
        .map(|result| result.plugin.name().to_string())
        .collect()
}

/// Collector, passing validator, failing validator and extractor, each adding
/// a distinct power of ten to `count`.
fn counting_pipeline(count: &Arc<AtomicUsize>) -> Vec<Arc<PlixPlugin>> {
    let add = |amount: usize, fail: bool| {
        let count = Arc::clone(count);
        PlixEntryPoint::context(move |_, _| {
            count.fetch_add(amount, Ordering::SeqCst);
            if fail {
                anyhow::bail!("validation failed");
            }
            Ok(())
        })
    };
    vec![
        PlixPluginDefinition::extractor("Extract").process(add(1000, false)).build(),
        PlixPluginDefinition::collector("Collect").process(add(1, false)).build(),
        PlixPluginDefinition::validator("ValidatePass").process(add(10, false)).build(),
        PlixPluginDefinition::validator("ValidateFail").process(add(100, true)).build(),
    ]
}

#[test]
fn test_unique_logger() {
    let registry = PlixRegistry::new();
    let processor = PlixProcessor::new(&registry);
    let plugin = PlixPluginDefinition::instance_plugin("LogEach")
        .process(PlixEntryPoint::instance(|instance, log| {
            log.info(format!("hello from {}", instance.name()));
            Ok(())
        }))
        .build();

    let mut context = PlixContext::new();
    context.create_instance("first");
    context.create_instance("second");
    let results = processor.process(&plugin, &mut context, None, None).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].records.len(), 1);
    assert_eq!(results[1].records.len(), 1);
    assert_eq!(results[0].records[0].message, "hello from first");
    assert_eq!(results[1].records[0].message, "hello from second");
    assert_eq!(results[0].records[0].source, "LogEach");
    assert_eq!(results[0].records[0].level, log::Level::Info);
}

#[test]
fn test_explicit_plugins_run_all() {
    let count = counter();
    let mut registry = PlixRegistry::new();
    let context = publish(&mut registry, None, Some(counting_pipeline(&count))).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1111);
    assert_eq!(
        names(&context),
        vec!["Collect", "ValidatePass", "ValidateFail", "Extract"]
    );
    assert_eq!(context.results().iter().filter(|result| !result.success).count(), 1);
}

#[test]
fn test_halt_on_validation_failure() {
    let count = counter();
    let mut registry = PlixRegistry::new();
    let options = PlixPublishOptions::new().policy(PlixPublishPolicy::HaltOnValidationFailure);
    let context =
        publish_with(&mut registry, None, Some(counting_pipeline(&count)), &options).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 111);
    assert_eq!(context.results().len(), 3);
}

#[test]
fn test_context_plugin_with_wrong_arguments() {
    let count = counter();
    let invoked = Arc::clone(&count);
    let plugin = PlixPluginDefinition::context_plugin("Wrong")
        .process(PlixEntryPoint::instance(move |_, _| {
            invoked.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))
        .build();

    let mut registry = PlixRegistry::new();
    let mut context = PlixContext::new();
    context.create_instance("instance");
    let context = publish(&mut registry, Some(context), Some(vec![plugin])).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(context.results().len(), 1);
    let result = &context.results()[0];
    assert!(!result.success);
    assert_eq!(
        result.error.as_ref().map(|error| error.kind),
        Some(PlixFailureKind::SignatureMismatch)
    );
}

#[test]
fn test_explicit_action() {
    let plugin = PlixPluginDefinition::context_plugin("WithAction")
        .action(PlixAction::new("Act").process(|context, log| {
            context.data.set("acted", true);
            log.info("acting");
            Ok(())
        }))
        .action(PlixAction::category("Tools"))
        .build();

    let registry = PlixRegistry::new();
    let processor = PlixProcessor::new(&registry);
    let mut context = PlixContext::new();

    let results = processor
        .process(&plugin, &mut context, None, Some("Act"))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].action.as_deref(), Some("Act"));
    assert_eq!(results[0].records[0].source, "Act");
    assert_eq!(context.data["acted"], json!(true));

    assert_eq!(
        processor
            .process(&plugin, &mut context, None, Some("Tools"))
            .unwrap_err(),
        PlixError::NotInvocable("Tools".to_string())
    );
    assert!(matches!(
        processor.process(&plugin, &mut context, None, Some("Missing")),
        Err(PlixError::NotFound { .. })
    ));
}

#[test]
fn test_standalone_action() {
    let registry = PlixRegistry::new();
    let processor = PlixProcessor::new(&registry);
    let mut context = PlixContext::new();
    let action = PlixAction::new("Standalone").process(|context, _| {
        context.create_instance("made by action");
        Ok(())
    });

    let result = processor.process_action(&action, &mut context).unwrap();
    assert!(result.success);
    assert_eq!(result.plugin.name(), "Standalone");
    assert_eq!(context.len(), 1);

    let category = PlixAction::category("Nothing");
    assert!(matches!(
        processor.process_action(&category, &mut context),
        Err(PlixError::NotInvocable(_))
    ));
}

#[test]
fn test_explicit_results() {
    let plugin = PlixPluginDefinition::collector("Logged")
        .process(PlixEntryPoint::context(|_, log| {
            log.info("logged");
            Ok(())
        }))
        .build();

    let mut registry = PlixRegistry::new();
    let context = publish(&mut registry, None, Some(vec![plugin])).unwrap();
    let result = &context.results()[0];
    assert!(result.success);
    assert!(result.error.is_none());
    assert_eq!(result.records[0].message, "logged");
    assert_eq!(result.to_json()["records"][0]["message"], json!("logged"));

    let transcripts = context.data.value("results").and_then(Value::as_array).unwrap();
    assert_eq!(transcripts.len(), 1);
    assert_eq!(transcripts[0]["plugin"], json!("Logged"));
    assert_eq!(transcripts[0]["records"][0]["message"], json!("logged"));
}

#[test]
fn test_earlier_results_are_visible_in_context_data() {
    let plugins = vec![
        PlixPluginDefinition::collector("Collect")
            .process(PlixEntryPoint::context(|context, _| {
                context.create_asset("shot", "render");
                Ok(())
            }))
            .build(),
        PlixPluginDefinition::validator("CountEarlier")
            .process(PlixEntryPoint::context_instance(|data, instance, _| {
                let earlier = data["results"].as_array().map(Vec::len).unwrap_or_default();
                instance.data.set("earlier", earlier);
                Ok(())
            }))
            .build(),
    ];

    let mut registry = PlixRegistry::new();
    let context = publish(&mut registry, None, Some(plugins)).unwrap();

    assert_eq!(context.instances()[0].data["earlier"], json!(1));
    let transcripts = context.data["results"].as_array().unwrap();
    assert_eq!(transcripts.len(), context.results().len());
    assert_eq!(transcripts[1]["plugin"], json!("CountEarlier"));
    assert_eq!(transcripts[1]["instance"], json!("shot"));
}

#[test]
fn test_records_survive_failures() {
    let plugins = vec![
        PlixPluginDefinition::collector("LogThenFail")
            .process(PlixEntryPoint::context(|_, log| {
                log.info("before error");
                anyhow::bail!("gave up")
            }))
            .build(),
        PlixPluginDefinition::validator("LogThenPanic")
            .process(PlixEntryPoint::context(|_, log| {
                log.warning("before panic");
                panic!("fell over")
            }))
            .build(),
    ];

    let mut registry = PlixRegistry::new();
    let context = publish(&mut registry, None, Some(plugins)).unwrap();
    let results = context.results();

    assert!(!results[0].success);
    assert_eq!(results[0].error.as_ref().map(|error| error.kind), Some(PlixFailureKind::Error));
    assert_eq!(results[0].records.len(), 1);
    assert_eq!(results[0].records[0].message, "before error");

    assert!(!results[1].success);
    assert_eq!(results[1].error.as_ref().map(|error| error.kind), Some(PlixFailureKind::Panic));
    assert_eq!(results[1].records.len(), 1);
    assert_eq!(results[1].records[0].message, "before panic");
    assert_eq!(results[1].records[0].level, log::Level::Warn);
}

#[test]
fn test_processing_families() {
    let collect = PlixPluginDefinition::collector("CollectFG")
        .process(PlixEntryPoint::context(|context, _| {
            context.create_asset("f", "F");
            context.create_asset("g", "G");
            Ok(())
        }))
        .build();
    let validate = PlixPluginDefinition::validator("ValidateF")
        .families(["F"])
        .process(PlixEntryPoint::instance(|instance, _| {
            instance.data.set("validated", true);
            Ok(())
        }))
        .build();

    let mut registry = PlixRegistry::new();
    let context = publish(&mut registry, None, Some(vec![validate, collect])).unwrap();

    let validated = context
        .results()
        .iter()
        .filter(|result| result.plugin.name() == "ValidateF")
        .count();
    assert_eq!(validated, 1);
    assert_eq!(context.results()[1].instance.as_ref().unwrap().name, "f");
    assert_eq!(context.instances()[0].data["validated"], json!(true));
    assert!(context.instances()[1].data["validated"].is_null());
}

#[test]
fn test_raising_plugin_does_not_stop_the_run() {
    let mut registry = PlixRegistry::new();
    let plugins = vec![
        PlixPluginDefinition::collector("Raises")
            .process(PlixEntryPoint::context(|_, _| {
                Err(anyhow::anyhow!("disk offline").context("reading scene"))
            }))
            .build(),
        PlixPluginDefinition::validator("Runs")
            .process(PlixEntryPoint::context(|context, _| {
                context.data.set("ran", true);
                Ok(())
            }))
            .build(),
    ];
    let context = publish(&mut registry, None, Some(plugins)).unwrap();

    let failure = context.results()[0].error.as_ref().unwrap();
    assert_eq!(failure.kind, PlixFailureKind::Error);
    assert_eq!(failure.message, "reading scene");
    assert_eq!(failure.causes, vec!["disk offline".to_string()]);
    assert_eq!(context.data["ran"], json!(true));
}

#[test]
fn test_panicking_plugin_is_captured() {
    let mut registry = PlixRegistry::new();
    let plugins = vec![
        PlixPluginDefinition::validator("Asserts")
            .process(PlixEntryPoint::context(|context, _| {
                assert!(context.data.value("frames").is_some(), "frames are missing");
                Ok(())
            }))
            .build(),
        PlixPluginDefinition::extractor("After").build(),
    ];
    let context = publish(&mut registry, None, Some(plugins)).unwrap();

    let first = &context.results()[0];
    assert!(!first.success);
    let failure = first.error.as_ref().unwrap();
    assert_eq!(failure.kind, PlixFailureKind::Panic);
    assert_eq!(failure.message, "frames are missing");
    assert!(context.results()[1].success);
}

#[test]
fn test_end_to_end_publish() {
    let mut registry = PlixRegistry::new();
    registry.register_host("python");
    registry
        .register_plugin(
            PlixPluginDefinition::collector("CollectShot")
                .process(PlixEntryPoint::context(|context, _| {
                    context.create_asset("shot010", "render").data.set("frames", 24);
                    Ok(())
                }))
                .build(),
        )
        .unwrap();
    registry
        .register_plugin(
            PlixPluginDefinition::validator("ValidateFrames")
                .families(["render"])
                .process(PlixEntryPoint::context_instance(|data, instance, _| {
                    let frames = instance.data["frames"].as_u64().unwrap_or_default();
                    data.set("frames_total", frames);
                    anyhow::ensure!(frames > 0, "no frames");
                    Ok(())
                }))
                .build(),
        )
        .unwrap();

    let context = publish(&mut registry, None, None).unwrap();
    assert_eq!(context.results().len(), 2);
    assert!(context.results().iter().all(|result| result.success));
    assert_eq!(context.data["frames_total"], json!(24));
}

#[test]
fn test_end_to_end_failing_validator_keeps_running() {
    let extracted = counter();
    let seen = Arc::clone(&extracted);
    let mut registry = PlixRegistry::new();
    registry
        .register_plugin(
            PlixPluginDefinition::collector("CollectEmpty")
                .process(PlixEntryPoint::context(|context, _| {
                    context.create_asset("shot020", "render");
                    Ok(())
                }))
                .build(),
        )
        .unwrap();
    registry
        .register_plugin(
            PlixPluginDefinition::validator("ValidateFrames")
                .families(["render"])
                .process(PlixEntryPoint::instance(|instance, _| {
                    anyhow::ensure!(instance.data.value("frames").is_some(), "no frames");
                    Ok(())
                }))
                .build(),
        )
        .unwrap();
    registry
        .register_plugin(
            PlixPluginDefinition::extractor("ExtractRender")
                .families(["render"])
                .process(PlixEntryPoint::instance(move |_, _| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }))
                .build(),
        )
        .unwrap();

    let context = publish(&mut registry, None, None).unwrap();
    assert_eq!(context.results().len(), 3);
    assert!(!context.results()[1].success);
    assert_eq!(
        context.results()[1].error.as_ref().map(|error| error.message.as_str()),
        Some("no frames")
    );
    assert_eq!(extracted.load(Ordering::SeqCst), 1);
}

#[test]
fn test_skip_invalid_instances() {
    let extracted: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&extracted);
    let plugins = vec![
        PlixPluginDefinition::collector("Collect")
            .process(PlixEntryPoint::context(|context, _| {
                context.create_asset("good", "render");
                context.create_asset("bad", "render");
                Ok(())
            }))
            .build(),
        PlixPluginDefinition::validator("Validate")
            .process(PlixEntryPoint::instance(|instance, _| {
                anyhow::ensure!(instance.name() != "bad", "bad instance");
                Ok(())
            }))
            .build(),
        PlixPluginDefinition::extractor("Extract")
            .process(PlixEntryPoint::instance(move |instance, _| {
                sink.lock().unwrap().push(instance.name().to_string());
                Ok(())
            }))
            .build(),
    ];

    let mut registry = PlixRegistry::new();
    let options = PlixPublishOptions::new().policy(PlixPublishPolicy::SkipInvalidInstances);
    publish_with(&mut registry, None, Some(plugins.clone()), &options).unwrap();
    assert_eq!(*extracted.lock().unwrap(), vec!["good".to_string()]);

    extracted.lock().unwrap().clear();
    publish(&mut registry, None, Some(plugins)).unwrap();
    assert_eq!(
        *extracted.lock().unwrap(),
        vec!["good".to_string(), "bad".to_string()]
    );
}

#[test]
fn test_legacy_dispatch() {
    let plugin = PlixPluginDefinition::new("Legacy")
        .legacy_process_context(|context, _| {
            context.data.set("context_ran", true);
            Ok(())
        })
        .legacy_process_instance(|instance, _| {
            instance.data.set("instance_ran", true);
            Ok(())
        })
        .build();

    let registry = PlixRegistry::new();
    let processor = PlixProcessor::new(&registry);
    let mut context = PlixContext::new();
    let first = context.create_instance("first").id().to_string();
    context.create_instance("second");

    let results = processor.process(&plugin, &mut context, None, None).unwrap();
    assert_eq!(results.len(), 3);
    assert!(results[0].instance.is_none());
    assert_eq!(context.data["context_ran"], json!(true));
    assert!(context.iter().all(|instance| instance.data["instance_ran"] == json!(true)));

    let results = processor
        .process(&plugin, &mut context, Some(first.as_str()), None)
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].instance_id(), Some(first.as_str()));
}

#[test]
fn test_repair() {
    let plugin = PlixPluginDefinition::validator("ValidateNames")
        .legacy_repair_instance(|instance, _| {
            instance.data.set("repaired", true);
            Ok(())
        })
        .build();

    let registry = PlixRegistry::new();
    let processor = PlixProcessor::new(&registry);
    let mut context = PlixContext::new();
    context.create_instance("broken");
    let results = processor.repair(&plugin, &mut context, None).unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(context.instances()[0].data["repaired"], json!(true));
}

#[test]
fn test_signals_during_publish() {
    let processed = counter();
    let published: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));

    let mut registry = PlixRegistry::new();
    let seen = Arc::clone(&processed);
    registry
        .register_callback(
            PLIX_SIGNAL_PLUGIN_PROCESSED,
            callback(move |args| {
                assert!(args.contains_key("success"));
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )
        .unwrap();
    let sink = Arc::clone(&published);
    registry
        .register_callback(
            PLIX_SIGNAL_PUBLISHED,
            callback(move |args| {
                *sink.lock().unwrap() = Some(Value::Object(args.clone()));
                Ok(())
            }),
        )
        .unwrap();

    let count = counter();
    let context = publish(&mut registry, None, Some(counting_pipeline(&count))).unwrap();

    assert_eq!(processed.load(Ordering::SeqCst), 4);
    let published = published.lock().unwrap().clone().unwrap();
    assert_eq!(published["context"], json!(context.id()));
    assert_eq!(published["results"], json!(4));
    assert_eq!(published["failed"], json!(1));
}

#[test]
fn test_band_runners() {
    let count = counter();
    let mut registry = PlixRegistry::new();
    let plugins = counting_pipeline(&count);

    let context = plix::publish::collect(&mut registry, None, Some(plugins.clone())).unwrap();
    assert_eq!(names(&context), vec!["Collect"]);

    let context = plix::publish::validate(&mut registry, None, Some(plugins.clone())).unwrap();
    assert_eq!(context.results().len(), 3);

    let context = plix::publish::extract(&mut registry, None, Some(plugins.clone())).unwrap();
    assert_eq!(context.results().len(), 4);

    let context = plix::publish::integrate(&mut registry, None, Some(plugins)).unwrap();
    assert_eq!(context.results().len(), 4);
}

#[test]
fn test_equal_orders_keep_the_given_order() {
    let plugins: Vec<Arc<PlixPlugin>> = ["B", "A", "C"]
        .into_iter()
        .map(|name| PlixPluginDefinition::validator(name).build())
        .collect();
    let mut registry = PlixRegistry::new();
    let context = publish(&mut registry, None, Some(plugins)).unwrap();
    assert_eq!(names(&context), vec!["B", "A", "C"]);
}

#[test]
fn test_publish_reuses_a_given_context() {
    let mut registry = PlixRegistry::new();
    let mut context = PlixContext::new();
    context.data.set("project", "demo");
    let id = context.id().to_string();

    let plugin = PlixPluginDefinition::collector("ReadProject")
        .process(PlixEntryPoint::context(|context, log| {
            let project = context.data.str("project").unwrap_or("none").to_string();
            log.info(project);
            Ok(())
        }))
        .build();
    let context = publish(&mut registry, Some(context), Some(vec![plugin])).unwrap();

    assert_eq!(context.id(), id);
    assert_eq!(context.results()[0].records[0].message, "demo");
}

/// Collector making `good` and `bad`, plus a validator failing `bad`.
fn good_and_bad() -> Vec<Arc<PlixPlugin>> {
    vec![
        PlixPluginDefinition::collector("Collect")
            .process(PlixEntryPoint::context(|context, _| {
                context.create_asset("good", "render");
                context.create_asset("bad", "render");
                Ok(())
            }))
            .build(),
        PlixPluginDefinition::validator("Validate")
            .process(PlixEntryPoint::instance(|instance, _| {
                anyhow::ensure!(instance.name() != "bad", "bad instance");
                Ok(())
            }))
            .build(),
    ]
}

#[test]
fn test_skip_invalid_instances_covers_legacy_plugins() {
    let extracted: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let contexts = counter();
    let sink = Arc::clone(&extracted);
    let seen = Arc::clone(&contexts);
    let mut plugins = good_and_bad();
    plugins.push(
        PlixPluginDefinition::extractor("LegacyExtract")
            .legacy_process_context(move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .legacy_process_instance(move |instance, _| {
                sink.lock().unwrap().push(instance.name().to_string());
                Ok(())
            })
            .build(),
    );

    let mut registry = PlixRegistry::new();
    let options = PlixPublishOptions::new().policy(PlixPublishPolicy::SkipInvalidInstances);
    let context = publish_with(&mut registry, None, Some(plugins), &options).unwrap();

    assert_eq!(*extracted.lock().unwrap(), vec!["good".to_string()]);
    assert_eq!(contexts.load(Ordering::SeqCst), 1);
    let legacy_results = context
        .results()
        .iter()
        .filter(|result| result.plugin.name() == "LegacyExtract")
        .count();
    assert_eq!(legacy_results, 2);
}

#[test]
fn test_skip_invalid_instances_reports_a_mismatch_once() {
    let mut plugins = good_and_bad();
    plugins.push(
        PlixPluginDefinition::instance_plugin("WrongExtract")
            .order(2.0)
            .process(PlixEntryPoint::context(|_, _| Ok(())))
            .build(),
    );

    let mut registry = PlixRegistry::new();
    let options = PlixPublishOptions::new().policy(PlixPublishPolicy::SkipInvalidInstances);
    let context = publish_with(&mut registry, None, Some(plugins), &options).unwrap();

    let mismatches: Vec<_> = context
        .results()
        .iter()
        .filter(|result| result.plugin.name() == "WrongExtract")
        .collect();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(
        mismatches[0].error.as_ref().map(|error| error.kind),
        Some(PlixFailureKind::SignatureMismatch)
    );
    assert!(mismatches[0].instance.is_none());
}
