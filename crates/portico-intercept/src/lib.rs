//! # Portico Intercept
//!
//! Interception pipeline for synthesized Portico operations.
//!
//! Every call to a synthesized operation flows through an ordered chain of
//! [`Interceptor`]s before reaching the call handler:
//!
//! ```text
//! Instance::invoke -> Timing -> Logging -> custom stages -> CallHandler
//!                                                              |
//! result <-------------------------------------------------------+
//! ```
//!
//! Each stage receives a [`Call`] and decides whether to [`Call::proceed`].
//! The chain is synchronous; there are no suspension points.
//!
//! ## Example
//!
//! ```
//! use portico_core::{Signature, TypeToken};
//! use portico_intercept::stages::{MemorySink, TimingInterceptor};
//! use portico_intercept::Pipeline;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let pipeline = Pipeline::builder()
//!     .stage(TimingInterceptor::with_sink(sink.clone()))
//!     .build();
//!
//! let sig = Signature::new("sayHello", vec![TypeToken::String]);
//! pipeline.execute(&sig, &[json!("hi")], |_, _| Ok(json!("hello"))).unwrap();
//! assert_eq!(sink.len(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/portico-intercept/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod interceptor;
pub mod pipeline;
pub mod stages;

pub use interceptor::{Call, FnInterceptor, Interceptor, Next};
pub use pipeline::{BoxedInterceptor, Pipeline, PipelineBuilder};
