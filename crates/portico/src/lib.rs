//! # Portico
//!
//! **Runtime synthesis of callable endpoint contracts**
//!
//! Portico turns a purely declarative description of a service into a
//! callable, introspectable contract:
//!
//! - **Descriptors**: service identity, fields, operations, parameter and
//!   result bindings
//! - **Metadata**: ordered, serializable records at type, field, operation
//!   and parameter scope
//! - **Interception**: every call runs through timing, logging and custom
//!   stages before reaching the call handler
//! - **Realization**: fresh qualified names, a backing type registry and
//!   handler-bound instances
//!
//! ## Quick Start
//!
//! ```
//! use portico::prelude::*;
//! use serde_json::{json, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let portico = Portico::new();
//!
//! let mut contract = portico.contract();
//! contract
//!     .with_service("Greeter", "urn:demo")?
//!     .add_method(
//!         TypeToken::String,
//!         "sayHello",
//!         vec![ParameterDescriptor::new(TypeToken::String, "text")],
//!     )?;
//!
//! let greeter = contract.to_instance(
//!     portico.realizer(),
//!     FnHandler::new(|_, args: &[Value]| Ok(json!(format!("Hello, {}", args[0])))),
//! )?;
//!
//! assert_eq!(greeter.invoke("sayHello", &[json!("Ada")])?, json!("Hello, \"Ada\""));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ContractBuilder ──seal──► ContractBlueprint ──► Realizer ──► TypeArtifact
//!                                                                 │
//!                                              instantiate(handler)
//!                                                                 ▼
//! invoke ──► Timing ──► Logging ──► custom stages ──► CallHandler (Instance)
//! ```

#![doc(html_root_url = "https://docs.rs/portico/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod toolkit;

pub use toolkit::{Portico, PorticoBuilder};

// Re-export descriptor model, builder and metadata
pub use portico_core as core;

// Re-export interception pipeline
pub use portico_intercept as intercept;

// Re-export realizer and instances
pub use portico_runtime as runtime;

// Re-export telemetry
pub use portico_telemetry as telemetry;

// Re-export configuration
pub use portico_config as config;

/// Prelude module for convenient imports.
///
/// ```
/// use portico::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Portico, PorticoBuilder};

    pub use portico_core::{
        AddressingResponses, BaseContract, BindingDescriptor, BuilderState, ContractBlueprint,
        ContractBuilder, FieldSpec, Introspect, MetadataKind, MetadataRecord, NamingPolicy,
        OperationDescriptor, ParameterDescriptor, ParameterMode, ParameterSource, PorticoError,
        PorticoResult, RestMapping, ResultDescriptor, ServiceDescriptor, ServiceMode, Signature,
        TypeToken, Visibility,
    };

    pub use portico_intercept::stages::{LoggingInterceptor, MemorySink, TimingInterceptor};
    pub use portico_intercept::{Call, FnInterceptor, Interceptor, Pipeline};

    pub use portico_runtime::{
        CallHandler, FnHandler, Instance, RealizeExt, Realizer, TypeArtifact,
    };

    pub use portico_config::{ConfigLoader, PorticoConfig};
}
