//! # Portico Core
//!
//! Descriptor model, contract builder and metadata synthesis for Portico.
//!
//! This crate provides the foundational types used throughout Portico:
//!
//! - [`ContractBuilder`] - Accumulates descriptors into a blueprint
//! - [`ContractBlueprint`] - Frozen description of a synthesized type
//! - [`NamingPolicy`] - Qualified name strategy for synthesized types
//! - [`SynthesizedMetadata`] - Type, field, operation and parameter records
//! - [`PorticoError`] - Standard error types

#![doc(html_root_url = "https://docs.rs/portico-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod blueprint;
pub mod builder;
pub mod descriptor;
mod error;
pub mod fixtures;
pub mod metadata;
pub mod naming;
pub mod types;

pub use blueprint::{BaseContract, ContractBlueprint};
pub use builder::{BuilderState, ContractBuilder};
pub use descriptor::{
    AddressingPolicy, AddressingResponses, BindingDescriptor, FieldSpec, HandlerChainDescriptor,
    OperationDescriptor, OperationEntry, ParameterBinding, ParameterDescriptor, ParameterMode,
    ParameterSource, ProviderDescriptor, RestMapping, ResultDescriptor, ServiceDescriptor,
    ServiceMode, Visibility,
};
pub use error::{ErrorCategory, PorticoError, PorticoResult};
pub use metadata::{
    synthesize, Introspect, MetadataKind, MetadataRecord, MetadataValue, OperationMetadata,
    SynthesizedMetadata,
};
pub use naming::NamingPolicy;
pub use types::{Signature, TypeToken};
