//! End-to-end pipeline integration tests.
//!
//! These tests run the built-in stages together with custom stages:
//!
//! 1. Timing - one sample per call
//! 2. Logging - transparent to results
//! 3. Custom - guards and result rewriting

use parking_lot::Mutex;
use portico_core::{PorticoError, PorticoResult, Signature, TypeToken};
use portico_intercept::stages::{LoggingInterceptor, MemorySink, Outcome, TimingInterceptor};
use portico_intercept::{Call, FnInterceptor, Interceptor, Pipeline};
use serde_json::{json, Value};
use std::sync::Arc;

/// Rejects calls whose first argument is an empty string.
struct NonEmptyGuard;

impl Interceptor for NonEmptyGuard {
    fn name(&self) -> &'static str {
        "non_empty"
    }

    fn intercept(&self, call: Call<'_>) -> PorticoResult<Value> {
        if call.arguments().first().and_then(Value::as_str) == Some("") {
            return Err(PorticoError::invocation(call.operation(), "empty input"));
        }
        call.proceed()
    }
}

fn say_hello() -> Signature {
    Signature::new("sayHello", vec![TypeToken::String])
}

fn greet(_: &Signature, args: &[Value]) -> PorticoResult<Value> {
    let name = args[0].as_str().unwrap_or_default();
    Ok(json!(format!("Hello, {name}!")))
}

fn full_pipeline(sink: Arc<MemorySink>) -> Pipeline {
    Pipeline::builder()
        .stage(TimingInterceptor::with_sink(sink))
        .stage(LoggingInterceptor::new())
        .stage(NonEmptyGuard)
        .build()
}

#[test]
fn test_full_pipeline_success() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = full_pipeline(sink.clone());
    let sig = say_hello();

    let result = pipeline.execute(&sig, &[json!("Ada")], greet).unwrap();

    assert_eq!(result, json!("Hello, Ada!"));
    assert_eq!(pipeline.stage_names(), ["timing", "logging", "non_empty"]);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.samples()[0].outcome, Outcome::Success);
}

#[test]
fn test_guard_short_circuits_but_timing_still_reports() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = full_pipeline(sink.clone());
    let sig = say_hello();
    let handler_calls = Mutex::new(0usize);

    let err = pipeline
        .execute(&sig, &[json!("")], |sig, args| {
            *handler_calls.lock() += 1;
            greet(sig, args)
        })
        .unwrap_err();

    assert!(err.to_string().contains("empty input"));
    assert_eq!(*handler_calls.lock(), 0);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.samples()[0].outcome, Outcome::Error);
}

#[test]
fn test_stage_may_rewrite_result() {
    let shout = FnInterceptor::new("shout", |call: Call<'_>| {
        let value = call.proceed()?;
        Ok(json!(value.as_str().unwrap_or_default().to_uppercase()))
    });
    let pipeline = Pipeline::builder().stage(shout).build();
    let sig = say_hello();

    let result = pipeline.execute(&sig, &[json!("Ada")], greet).unwrap();
    assert_eq!(result, json!("HELLO, ADA!"));
}

#[test]
fn test_pipeline_is_shareable_across_threads() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = Arc::new(full_pipeline(sink.clone()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            std::thread::spawn(move || {
                let sig = say_hello();
                for _ in 0..25 {
                    pipeline
                        .execute(&sig, &[json!(format!("caller-{i}"))], greet)
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert_eq!(sink.len(), 100);
}
