//! End-to-end realization tests.
//!
//! Builder -> Realizer -> Instance -> pipeline -> handler, with real stages.

use parking_lot::Mutex;
use portico_core::fixtures::{catalog_contract, greeter_contract, say_hello};
use portico_core::{
    ContractBuilder, Introspect, MetadataKind, NamingPolicy, ParameterDescriptor, PorticoError,
    Signature, TypeToken,
};
use portico_intercept::stages::{LoggingInterceptor, MemorySink, Outcome, TimingInterceptor};
use portico_intercept::{Call, FnInterceptor};
use portico_runtime::{CallHandler, FnHandler, RealizeExt, Realizer};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

/// Handler that records every call it receives.
#[derive(Default)]
struct RecordingHandler {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl CallHandler for RecordingHandler {
    fn invoke(&self, operation: &str, arguments: &[Value]) -> Result<Value, PorticoError> {
        self.calls
            .lock()
            .push((operation.to_string(), arguments.to_vec()));
        Ok(json!(format!("Hello, {}", arguments[0].as_str().unwrap_or("?"))))
    }
}

fn timed_realizer(sink: Arc<MemorySink>) -> Realizer {
    Realizer::builder()
        .stage(TimingInterceptor::with_sink(sink))
        .stage(LoggingInterceptor::new())
        .build()
}

#[test]
fn test_greeter_scenario() {
    let sink = Arc::new(MemorySink::new());
    let realizer = timed_realizer(sink.clone());
    let handler = Arc::new(RecordingHandler::default());

    let instance = greeter_contract()
        .unwrap()
        .to_instance(&realizer, Arc::clone(&handler))
        .unwrap();

    let result = instance.invoke("sayHello", &[json!("hi")]).unwrap();

    assert_eq!(result, json!("Hello, hi"));
    assert_eq!(
        *handler.calls.lock(),
        vec![("sayHello".to_string(), vec![json!("hi")])]
    );
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.samples()[0].outcome, Outcome::Success);

    let service = &instance.type_metadata()[0];
    assert_eq!(service.kind(), MetadataKind::Service);
    assert_eq!(service.get_str("name"), Some("Greeter"));
    assert_eq!(service.get_str("targetNamespace"), Some("urn:demo"));
}

#[test]
fn test_handler_failure_is_timed_and_propagated() {
    let sink = Arc::new(MemorySink::new());
    let realizer = timed_realizer(sink.clone());

    let instance = greeter_contract()
        .unwrap()
        .to_instance(
            &realizer,
            FnHandler::new(|operation, _| {
                Err(PorticoError::invocation_with_source(
                    operation,
                    "backend unavailable",
                    refused(),
                ))
            }),
        )
        .unwrap();

    let err = instance.invoke("sayHello", &[json!("hi")]).unwrap_err();
    assert_eq!(err.code(), "INVOCATION_ERROR");
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(sink.samples()[0].outcome, Outcome::Error);
}

fn refused() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused")
}

#[test]
fn test_short_circuit_stage_skips_handler() {
    let handler = Arc::new(RecordingHandler::default());
    let realizer = Realizer::builder()
        .operation_stage(
            "sayHello",
            FnInterceptor::new("cache", |call: Call<'_>| {
                if call.arguments().len() == 2 {
                    return Ok(json!("cached"));
                }
                call.proceed()
            }),
        )
        .build();

    let instance = greeter_contract()
        .unwrap()
        .to_instance(&realizer, Arc::clone(&handler))
        .unwrap();

    assert_eq!(
        instance.invoke("sayHello", &[json!("hi"), json!(2)]).unwrap(),
        json!("cached")
    );
    assert!(handler.calls.lock().is_empty());

    instance.invoke("sayHello", &[json!("hi")]).unwrap();
    assert_eq!(handler.calls.lock().len(), 1);
}

#[test]
fn test_rest_contract_metadata_survives_realization() {
    let realizer = Realizer::new();
    let artifact = catalog_contract().unwrap().to_type(&realizer).unwrap();

    let path = artifact
        .type_metadata()
        .iter()
        .find(|record| record.kind() == MetadataKind::Path)
        .unwrap();
    assert_eq!(path.get_str("value"), Some("/items"));

    let get_item = Signature::new("getItem", vec![TypeToken::String]);
    let records = artifact.operation_metadata(&get_item).unwrap();
    assert!(records
        .iter()
        .any(|record| record.kind() == MetadataKind::HttpMethod
            && record.get_str("method") == Some("GET")));
}

#[test]
fn test_fixed_and_random_naming() {
    let realizer = Realizer::new();

    let mut first = greeter_contract().unwrap();
    first.with_naming_policy(NamingPolicy::fixed("X.Y.Z")).unwrap();
    first.to_type(&realizer).unwrap();

    let mut second = greeter_contract().unwrap();
    second.with_naming_policy(NamingPolicy::fixed("X.Y.Z")).unwrap();
    let err = second.to_type(&realizer).unwrap_err();
    assert!(matches!(err, PorticoError::Realization { .. }));

    let a = greeter_contract().unwrap().to_type(&realizer).unwrap();
    let b = greeter_contract().unwrap().to_type(&realizer).unwrap();
    assert_ne!(a.qualified_name(), b.qualified_name());
    assert_eq!(realizer.registry().len(), 3);
}

#[test]
fn test_concurrent_invocations() {
    let sink = Arc::new(MemorySink::new());
    let realizer = timed_realizer(sink.clone());
    let handler = Arc::new(RecordingHandler::default());
    let instance = Arc::new(
        greeter_contract()
            .unwrap()
            .to_instance(&realizer, Arc::clone(&handler))
            .unwrap(),
    );

    let threads: Vec<_> = (0..4)
        .map(|i| {
            let instance = Arc::clone(&instance);
            std::thread::spawn(move || {
                for _ in 0..10 {
                    instance
                        .invoke_signature(&say_hello(), &[json!(format!("t{i}"))])
                        .unwrap();
                }
            })
        })
        .collect();
    for thread in threads {
        thread.join().expect("thread panicked");
    }

    assert_eq!(handler.calls.lock().len(), 40);
    assert_eq!(sink.len(), 40);
}

proptest! {
    #[test]
    fn prop_each_call_reaches_handler_once(names in prop::collection::vec("[a-z]{1,12}", 1..20)) {
        let sink = Arc::new(MemorySink::new());
        let realizer = timed_realizer(sink.clone());
        let handler = Arc::new(RecordingHandler::default());
        let instance = greeter_contract()
            .unwrap()
            .to_instance(&realizer, Arc::clone(&handler))
            .unwrap();

        for name in &names {
            instance.invoke("sayHello", &[json!(name)]).unwrap();
        }

        let calls = handler.calls.lock();
        prop_assert_eq!(calls.len(), names.len());
        prop_assert_eq!(sink.len(), names.len());
        for (call, name) in calls.iter().zip(&names) {
            prop_assert_eq!(&call.1, &vec![json!(name)]);
        }
    }

    #[test]
    fn prop_mistyped_arguments_never_reach_handler(n in any::<i64>()) {
        let handler = Arc::new(RecordingHandler::default());
        let mut builder = ContractBuilder::new();
        builder
            .add_method(
                TypeToken::String,
                "echo",
                vec![ParameterDescriptor::new(TypeToken::String, "text")],
            )
            .unwrap();
        let instance = builder.to_instance(&Realizer::new(), Arc::clone(&handler)).unwrap();

        let result = instance.invoke("echo", &[json!(n)]);
        let is_mismatch = matches!(result, Err(PorticoError::ArgumentMismatch { .. }));
        prop_assert!(is_mismatch);
        prop_assert!(handler.calls.lock().is_empty());
    }
}
