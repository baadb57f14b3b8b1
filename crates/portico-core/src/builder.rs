//! Contract builder.
//!
//! [`ContractBuilder`] accumulates descriptors into a [`ContractBlueprint`].
//! Every mutation validates its input immediately and fails at the call that
//! breaks an invariant, so a builder never holds a half-valid blueprint.
//!
//! # Lifecycle
//!
//! ```text
//! Empty -> Accumulating -> Built -> Realized
//!              ^             |
//!              +-- mutate ---+
//! ```
//!
//! [`ContractBuilder::build`] snapshots the blueprint and may be called any
//! number of times. [`ContractBuilder::seal`] hands the blueprint off for
//! realization; after that every call returns
//! [`PorticoError::AlreadyRealized`].
//!
//! # Example
//!
//! ```
//! use portico_core::builder::ContractBuilder;
//! use portico_core::descriptor::ParameterDescriptor;
//! use portico_core::types::TypeToken;
//!
//! # fn main() -> Result<(), portico_core::PorticoError> {
//! let mut builder = ContractBuilder::new();
//! builder
//!     .with_service("Greeter", "urn:demo")?
//!     .add_method(
//!         TypeToken::String,
//!         "sayHello",
//!         vec![ParameterDescriptor::new(TypeToken::String, "text")],
//!     )?;
//!
//! let blueprint = builder.build()?;
//! assert_eq!(blueprint.operations().len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::blueprint::{BaseContract, ContractBlueprint};
use crate::descriptor::{
    AddressingPolicy, AddressingResponses, BindingDescriptor, FieldSpec, HandlerChainDescriptor,
    OperationDescriptor, OperationEntry, ParameterDescriptor, ProviderDescriptor,
    ResultDescriptor, ServiceDescriptor, ServiceMode,
};
use crate::error::{PorticoError, PorticoResult};
use crate::naming::NamingPolicy;
use crate::types::TypeToken;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Lifecycle state of a [`ContractBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuilderState {
    /// Nothing attached yet.
    Empty,
    /// At least one mutation since construction or the last build.
    Accumulating,
    /// A snapshot was taken and nothing changed since.
    Built,
    /// The blueprint was handed to a realizer.
    Realized,
}

impl fmt::Display for BuilderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Empty => "empty",
            Self::Accumulating => "accumulating",
            Self::Built => "built",
            Self::Realized => "realized",
        };
        f.write_str(s)
    }
}

/// Accumulates descriptors into a [`ContractBlueprint`].
#[derive(Debug)]
pub struct ContractBuilder {
    blueprint: ContractBlueprint,
    state: BuilderState,
}

impl ContractBuilder {
    /// Creates a builder for the default `EndpointApi` base with a randomized
    /// naming policy.
    #[must_use]
    pub fn new() -> Self {
        Self::for_contract(BaseContract::default(), NamingPolicy::default())
    }

    /// Creates a builder for a specific base contract and naming policy.
    #[must_use]
    pub fn for_contract(base: BaseContract, naming: NamingPolicy) -> Self {
        Self {
            blueprint: ContractBlueprint::empty(base, naming),
            state: BuilderState::Empty,
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Returns the number of operations declared so far.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.blueprint.operations.len()
    }

    /// Returns the number of fields declared so far.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.blueprint.fields.len()
    }

    /// Replaces the naming policy.
    pub fn with_naming_policy(&mut self, naming: NamingPolicy) -> PorticoResult<&mut Self> {
        self.begin_mutation()?;
        debug!(policy = ?naming, "Naming policy set");
        self.blueprint.naming = naming;
        Ok(self)
    }

    /// Sets the type-level service identity. Last write wins.
    pub fn with_service_descriptor(
        &mut self,
        service: ServiceDescriptor,
    ) -> PorticoResult<&mut Self> {
        self.begin_mutation()?;
        debug!(
            name = service.name_value().unwrap_or_default(),
            target_namespace = service.target_namespace_value().unwrap_or_default(),
            "Service descriptor attached"
        );
        self.blueprint.service = Some(service);
        Ok(self)
    }

    /// Sets the service name and target namespace.
    pub fn with_service(
        &mut self,
        name: impl Into<String>,
        target_namespace: impl Into<String>,
    ) -> PorticoResult<&mut Self> {
        self.with_service_descriptor(
            ServiceDescriptor::new()
                .name(name)
                .target_namespace(target_namespace),
        )
    }

    /// Attaches provider metadata. May coexist with a service descriptor.
    pub fn with_service_provider(
        &mut self,
        wsdl_location: impl Into<String>,
        service_name: impl Into<String>,
        target_namespace: impl Into<String>,
        port_name: impl Into<String>,
    ) -> PorticoResult<&mut Self> {
        self.begin_mutation()?;
        let provider = ProviderDescriptor {
            wsdl_location: Some(wsdl_location.into()),
            service_name: Some(service_name.into()),
            target_namespace: Some(target_namespace.into()),
            port_name: Some(port_name.into()),
        };
        debug!(service_name = ?provider.service_name, "Service provider attached");
        self.blueprint.provider = Some(provider);
        Ok(self)
    }

    /// Sets the addressing policy.
    pub fn with_addressing(
        &mut self,
        enabled: bool,
        required: bool,
        responses: AddressingResponses,
    ) -> PorticoResult<&mut Self> {
        self.begin_mutation()?;
        debug!(enabled, required, responses = responses.as_str(), "Addressing set");
        self.blueprint.addressing = Some(AddressingPolicy {
            enabled,
            required,
            responses,
        });
        Ok(self)
    }

    /// Sets the dispatch mode marker.
    pub fn with_service_mode(&mut self, mode: ServiceMode) -> PorticoResult<&mut Self> {
        self.begin_mutation()?;
        debug!(mode = mode.as_str(), "Service mode set");
        self.blueprint.service_mode = Some(mode);
        Ok(self)
    }

    /// References a handler chain by name and configuration file.
    pub fn with_handler_chain(
        &mut self,
        name: impl Into<String>,
        file: impl Into<String>,
    ) -> PorticoResult<&mut Self> {
        self.begin_mutation()?;
        let chain = HandlerChainDescriptor {
            name: Some(name.into()),
            file: Some(file.into()),
        };
        debug!(name = ?chain.name, "Handler chain attached");
        self.blueprint.handler_chain = Some(chain);
        Ok(self)
    }

    /// Sets the type-level base path for REST operations.
    pub fn with_path(&mut self, path: impl Into<String>) -> PorticoResult<&mut Self> {
        self.begin_mutation()?;
        let path = path.into();
        debug!(path = %path, "Base path set");
        self.blueprint.path = Some(path);
        Ok(self)
    }

    /// Attaches opaque bound data to the type.
    ///
    /// # Errors
    ///
    /// Returns [`PorticoError::InvalidDescriptor`] if the uid is blank.
    pub fn with_binding(&mut self, binding: BindingDescriptor) -> PorticoResult<&mut Self> {
        self.begin_mutation()?;
        validate_binding(&binding)?;
        debug!(uid = binding.uid(), "Type binding attached");
        self.blueprint.binding = Some(binding);
        Ok(self)
    }

    /// Attaches bound data from a uid and a serialized payload.
    pub fn with_bound(
        &mut self,
        uid: impl Into<String>,
        json: impl Into<String>,
    ) -> PorticoResult<&mut Self> {
        self.with_binding(BindingDescriptor::new(uid, json))
    }

    /// Declares a protected field.
    ///
    /// # Errors
    ///
    /// Returns [`PorticoError::DuplicateField`] if the name is taken and
    /// [`PorticoError::InvalidDescriptor`] if it is blank.
    pub fn add_field(
        &mut self,
        declared_type: TypeToken,
        name: impl Into<String>,
        initial_value: Value,
    ) -> PorticoResult<&mut Self> {
        self.add_field_spec(FieldSpec::new(declared_type, name, initial_value))
    }

    /// Declares a field with full control over its visibility.
    pub fn add_field_spec(&mut self, field: FieldSpec) -> PorticoResult<&mut Self> {
        self.begin_mutation()?;
        if field.name.trim().is_empty() {
            return Err(PorticoError::invalid_descriptor("field name must not be blank"));
        }
        if self.blueprint.fields.iter().any(|f| f.name == field.name) {
            return Err(PorticoError::duplicate_field(field.name));
        }
        debug!(
            field = %field.name,
            declared_type = %field.declared_type,
            visibility = field.visibility.as_str(),
            "Field declared"
        );
        self.blueprint.fields.push(field);
        Ok(self)
    }

    /// Declares an operation.
    ///
    /// # Errors
    ///
    /// - [`PorticoError::InvalidDescriptor`] if the operation name is blank,
    ///   the binding uid is blank, or a parameter that needs a name has none
    /// - [`PorticoError::DuplicateOperationSignature`] if an operation with
    ///   the same name and parameter types exists
    pub fn add_operation(
        &mut self,
        result: ResultDescriptor,
        operation: OperationDescriptor,
        binding: Option<BindingDescriptor>,
        parameters: Vec<ParameterDescriptor>,
    ) -> PorticoResult<&mut Self> {
        self.begin_mutation()?;

        if operation.operation_name().trim().is_empty() {
            return Err(PorticoError::invalid_descriptor(
                "operation name must not be blank",
            ));
        }
        if let Some(binding) = &binding {
            validate_binding(binding)?;
        }
        for (position, parameter) in parameters.iter().enumerate() {
            if parameter.requires_name() && parameter.name().trim().is_empty() {
                return Err(PorticoError::invalid_descriptor(format!(
                    "parameter {position} of '{}' must have a name",
                    operation.operation_name()
                )));
            }
        }

        let entry = OperationEntry {
            operation,
            result,
            binding,
            parameters,
        };
        let signature = entry.signature();
        if self
            .blueprint
            .operations
            .iter()
            .any(|existing| existing.signature() == signature)
        {
            return Err(PorticoError::duplicate_signature(signature));
        }

        debug!(
            signature = %signature,
            return_type = %entry.result.return_type(),
            "Operation declared"
        );
        self.blueprint.operations.push(entry);
        Ok(self)
    }

    /// Declares an operation from a return type, a name and parameters.
    pub fn add_method(
        &mut self,
        return_type: TypeToken,
        name: impl Into<String>,
        parameters: Vec<ParameterDescriptor>,
    ) -> PorticoResult<&mut Self> {
        self.add_operation(
            ResultDescriptor::new(return_type),
            OperationDescriptor::new(name),
            None,
            parameters,
        )
    }

    /// Declares an operation carrying bound data.
    pub fn add_bound_method(
        &mut self,
        return_type: TypeToken,
        name: impl Into<String>,
        binding: BindingDescriptor,
        parameters: Vec<ParameterDescriptor>,
    ) -> PorticoResult<&mut Self> {
        self.add_operation(
            ResultDescriptor::new(return_type),
            OperationDescriptor::new(name),
            Some(binding),
            parameters,
        )
    }

    /// Returns a snapshot of the accumulated blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`PorticoError::AlreadyRealized`] after [`seal`](Self::seal).
    pub fn build(&mut self) -> PorticoResult<ContractBlueprint> {
        self.ensure_open()?;
        self.state = BuilderState::Built;
        debug!(
            fields = self.blueprint.fields.len(),
            operations = self.blueprint.operations.len(),
            "Blueprint built"
        );
        Ok(self.blueprint.clone())
    }

    /// Hands the blueprint off for realization and closes the builder.
    ///
    /// # Errors
    ///
    /// Returns [`PorticoError::AlreadyRealized`] if already sealed.
    pub fn seal(&mut self) -> PorticoResult<ContractBlueprint> {
        self.ensure_open()?;
        let empty = ContractBlueprint::empty(
            self.blueprint.base.clone(),
            self.blueprint.naming.clone(),
        );
        self.state = BuilderState::Realized;
        debug!("Builder sealed");
        Ok(std::mem::replace(&mut self.blueprint, empty))
    }

    fn ensure_open(&self) -> PorticoResult<()> {
        if self.state == BuilderState::Realized {
            return Err(PorticoError::AlreadyRealized);
        }
        Ok(())
    }

    fn begin_mutation(&mut self) -> PorticoResult<()> {
        self.ensure_open()?;
        self.state = BuilderState::Accumulating;
        Ok(())
    }
}

impl Default for ContractBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_binding(binding: &BindingDescriptor) -> PorticoResult<()> {
    if binding.uid().trim().is_empty() {
        return Err(PorticoError::invalid_descriptor(
            "binding uid must not be blank",
        ));
    }
    Ok(())
}
