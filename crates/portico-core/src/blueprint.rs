//! Contract blueprints.
//!
//! A [`ContractBlueprint`] is the accumulated, not-yet-realized description of
//! a synthesized type. It is produced by
//! [`ContractBuilder`](crate::builder::ContractBuilder) and consumed by a
//! realizer; nothing outside the builder can mutate it.

use crate::descriptor::{
    AddressingPolicy, BindingDescriptor, FieldSpec, HandlerChainDescriptor, OperationEntry,
    ProviderDescriptor, ServiceDescriptor, ServiceMode,
};
use crate::naming::NamingPolicy;
use crate::types::Signature;
use serde::{Deserialize, Serialize};

/// Name of the default base contract.
pub const ENDPOINT_API: &str = "EndpointApi";

/// Marker capability every endpoint contract carries.
pub const ENDPOINT_CAPABILITY: &str = "endpoint";

/// The capability set a synthesized type conforms to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseContract {
    name: String,
    capabilities: Vec<String>,
}

impl BaseContract {
    /// Creates a base contract with the given simple name and no capabilities.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: Vec::new(),
        }
    }

    /// The default `EndpointApi` base with the `endpoint` marker capability.
    #[must_use]
    pub fn endpoint() -> Self {
        Self::new(ENDPOINT_API).capability(ENDPOINT_CAPABILITY)
    }

    /// Adds a capability.
    #[must_use]
    pub fn capability(mut self, capability: impl Into<String>) -> Self {
        let capability = capability.into();
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    /// Returns the simple name the naming policy qualifies.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Returns `true` if the contract carries the capability.
    #[must_use]
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

impl Default for BaseContract {
    fn default() -> Self {
        Self::endpoint()
    }
}

/// Accumulated description of a synthesized type.
#[derive(Debug, Clone)]
pub struct ContractBlueprint {
    pub(crate) base: BaseContract,
    pub(crate) naming: NamingPolicy,
    pub(crate) service: Option<ServiceDescriptor>,
    pub(crate) provider: Option<ProviderDescriptor>,
    pub(crate) addressing: Option<AddressingPolicy>,
    pub(crate) service_mode: Option<ServiceMode>,
    pub(crate) handler_chain: Option<HandlerChainDescriptor>,
    pub(crate) path: Option<String>,
    pub(crate) binding: Option<BindingDescriptor>,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) operations: Vec<OperationEntry>,
}

impl ContractBlueprint {
    pub(crate) fn empty(base: BaseContract, naming: NamingPolicy) -> Self {
        Self {
            base,
            naming,
            service: None,
            provider: None,
            addressing: None,
            service_mode: None,
            handler_chain: None,
            path: None,
            binding: None,
            fields: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Returns the base contract.
    #[must_use]
    pub fn base_contract(&self) -> &BaseContract {
        &self.base
    }

    /// Returns the naming policy used at realization time.
    #[must_use]
    pub fn naming_policy(&self) -> &NamingPolicy {
        &self.naming
    }

    /// Draws a qualified name for one realization of this blueprint.
    #[must_use]
    pub fn draw_name(&self) -> String {
        self.naming.name(self.base.name())
    }

    /// Returns the service descriptor, if attached.
    #[must_use]
    pub fn service(&self) -> Option<&ServiceDescriptor> {
        self.service.as_ref()
    }

    /// Returns the provider descriptor, if attached.
    #[must_use]
    pub fn provider(&self) -> Option<&ProviderDescriptor> {
        self.provider.as_ref()
    }

    /// Returns the addressing policy, if attached.
    #[must_use]
    pub fn addressing(&self) -> Option<&AddressingPolicy> {
        self.addressing.as_ref()
    }

    /// Returns the service mode, if attached.
    #[must_use]
    pub fn service_mode(&self) -> Option<ServiceMode> {
        self.service_mode
    }

    /// Returns the handler chain, if attached.
    #[must_use]
    pub fn handler_chain(&self) -> Option<&HandlerChainDescriptor> {
        self.handler_chain.as_ref()
    }

    /// Returns the type-level path, if attached.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the type-level binding, if attached.
    #[must_use]
    pub fn binding(&self) -> Option<&BindingDescriptor> {
        self.binding.as_ref()
    }

    /// Returns the declared fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Returns the declared operations in insertion order.
    #[must_use]
    pub fn operations(&self) -> &[OperationEntry] {
        &self.operations
    }

    /// Returns the signatures of all operations in insertion order.
    #[must_use]
    pub fn signatures(&self) -> Vec<Signature> {
        self.operations.iter().map(OperationEntry::signature).collect()
    }

    /// Looks up an operation by signature.
    #[must_use]
    pub fn operation(&self, signature: &Signature) -> Option<&OperationEntry> {
        self.operations.iter().find(|op| &op.signature() == signature)
    }

    /// Returns `true` if nothing has been attached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.service.is_none()
            && self.provider.is_none()
            && self.addressing.is_none()
            && self.service_mode.is_none()
            && self.handler_chain.is_none()
            && self.path.is_none()
            && self.binding.is_none()
            && self.fields.is_empty()
            && self.operations.is_empty()
    }
}
