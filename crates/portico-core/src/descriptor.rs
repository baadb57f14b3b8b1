//! Descriptor model.
//!
//! Descriptors are immutable value objects describing one piece of
//! declarative metadata: the service identity, an operation, its result, its
//! parameters, or opaque bound data. They carry no behavior beyond accessors;
//! validation and blank-string normalization happen in the builder and the
//! metadata synthesizer.
//!
//! # Example
//!
//! ```
//! use portico_core::descriptor::{ParameterDescriptor, ParameterMode, ServiceDescriptor};
//! use portico_core::types::TypeToken;
//!
//! let service = ServiceDescriptor::new()
//!     .name("Greeter")
//!     .target_namespace("urn:demo");
//!
//! let param = ParameterDescriptor::soap(TypeToken::String, "text", ParameterMode::Out)
//!     .part_name("body");
//!
//! assert_eq!(service.name_value(), Some("Greeter"));
//! assert_eq!(param.name(), "text");
//! ```

use crate::types::{Signature, TypeToken};
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type-level service identity.
///
/// All fields are optional. Blank values synthesize to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    name: Option<String>,
    target_namespace: Option<String>,
    service_name: Option<String>,
    port_name: Option<String>,
    wsdl_location: Option<String>,
    endpoint_interface: Option<String>,
}

impl ServiceDescriptor {
    /// Creates an empty service descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service (port type) name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the target namespace.
    #[must_use]
    pub fn target_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.target_namespace = Some(namespace.into());
        self
    }

    /// Sets the published service name.
    #[must_use]
    pub fn service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    /// Sets the port name.
    #[must_use]
    pub fn port_name(mut self, port_name: impl Into<String>) -> Self {
        self.port_name = Some(port_name.into());
        self
    }

    /// Sets the location of the service description document.
    #[must_use]
    pub fn wsdl_location(mut self, location: impl Into<String>) -> Self {
        self.wsdl_location = Some(location.into());
        self
    }

    /// Sets the endpoint interface name.
    #[must_use]
    pub fn endpoint_interface(mut self, interface: impl Into<String>) -> Self {
        self.endpoint_interface = Some(interface.into());
        self
    }

    /// Returns the service name, if set.
    #[must_use]
    pub fn name_value(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the target namespace, if set.
    #[must_use]
    pub fn target_namespace_value(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    /// Returns the published service name, if set.
    #[must_use]
    pub fn service_name_value(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    /// Returns the port name, if set.
    #[must_use]
    pub fn port_name_value(&self) -> Option<&str> {
        self.port_name.as_deref()
    }

    /// Returns the description document location, if set.
    #[must_use]
    pub fn wsdl_location_value(&self) -> Option<&str> {
        self.wsdl_location.as_deref()
    }

    /// Returns the endpoint interface, if set.
    #[must_use]
    pub fn endpoint_interface_value(&self) -> Option<&str> {
        self.endpoint_interface.as_deref()
    }
}

/// Type-level provider metadata, an alternative to [`ServiceDescriptor`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Location of the service description document.
    pub wsdl_location: Option<String>,
    /// Service name.
    pub service_name: Option<String>,
    /// Target namespace for the service.
    pub target_namespace: Option<String>,
    /// Port name.
    pub port_name: Option<String>,
}

/// Which responses an addressing-enabled endpoint accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressingResponses {
    /// Both anonymous and non-anonymous responses.
    #[default]
    All,
    /// Only anonymous responses.
    Anonymous,
    /// Only non-anonymous responses.
    NonAnonymous,
}

impl AddressingResponses {
    /// Returns the attribute value used in metadata records.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Anonymous => "ANONYMOUS",
            Self::NonAnonymous => "NON_ANONYMOUS",
        }
    }
}

/// Type-level addressing policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressingPolicy {
    /// Whether addressing is enabled.
    pub enabled: bool,
    /// Whether addressing headers are required.
    pub required: bool,
    /// Accepted response kinds.
    pub responses: AddressingResponses,
}

/// Type-level dispatch mode marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceMode {
    /// The handler works on the message payload only.
    #[default]
    Payload,
    /// The handler works on the whole message.
    Message,
}

impl ServiceMode {
    /// Returns the attribute value used in metadata records.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Payload => "PAYLOAD",
            Self::Message => "MESSAGE",
        }
    }
}

/// Type-level handler chain reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerChainDescriptor {
    /// Chain name.
    pub name: Option<String>,
    /// Chain configuration file.
    pub file: Option<String>,
}

/// Opaque data bound to a contract or to one operation.
///
/// The uid is a caller-chosen correlation key and must not be blank; the json
/// payload is attached verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingDescriptor {
    uid: String,
    json: Option<String>,
}

impl BindingDescriptor {
    /// Creates a binding with a payload.
    #[must_use]
    pub fn new(uid: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            json: Some(json.into()),
        }
    }

    /// Creates a binding without a payload.
    #[must_use]
    pub fn uid_only(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            json: None,
        }
    }

    /// Returns the correlation key.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Returns the serialized payload, if any.
    #[must_use]
    pub fn json(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

/// REST mapping of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestMapping {
    #[serde(with = "http_method_serde")]
    method: Method,
    path: Option<String>,
    produces: Vec<String>,
    consumes: Vec<String>,
}

impl RestMapping {
    /// Creates a mapping for the given HTTP method.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            path: None,
            produces: Vec::new(),
            consumes: Vec::new(),
        }
    }

    /// Sets the operation path, relative to the type-level path.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Adds a produced media type.
    #[must_use]
    pub fn produces(mut self, media_type: impl Into<String>) -> Self {
        self.produces.push(media_type.into());
        self
    }

    /// Adds a consumed media type.
    #[must_use]
    pub fn consumes(mut self, media_type: impl Into<String>) -> Self {
        self.consumes.push(media_type.into());
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the operation path, if set.
    #[must_use]
    pub fn path_value(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the produced media types.
    #[must_use]
    pub fn produced(&self) -> &[String] {
        &self.produces
    }

    /// Returns the consumed media types.
    #[must_use]
    pub fn consumed(&self) -> &[String] {
        &self.consumes
    }
}

/// One callable member of the synthesized contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    operation_name: String,
    action: Option<String>,
    exclude: bool,
    rest: Option<RestMapping>,
}

impl OperationDescriptor {
    /// Creates an operation descriptor.
    #[must_use]
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            action: None,
            exclude: false,
            rest: None,
        }
    }

    /// Sets the action URI.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Marks the operation as excluded from the published contract.
    #[must_use]
    pub fn exclude(mut self, exclude: bool) -> Self {
        self.exclude = exclude;
        self
    }

    /// Attaches a REST mapping.
    #[must_use]
    pub fn rest(mut self, mapping: RestMapping) -> Self {
        self.rest = Some(mapping);
        self
    }

    /// Returns the operation name.
    #[must_use]
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    /// Returns the action, if set.
    #[must_use]
    pub fn action_value(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Returns whether the operation is excluded.
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        self.exclude
    }

    /// Returns the REST mapping, if any.
    #[must_use]
    pub fn rest_mapping(&self) -> Option<&RestMapping> {
        self.rest.as_ref()
    }
}

/// Return contract of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDescriptor {
    return_type: TypeToken,
    name: Option<String>,
    part_name: Option<String>,
    target_namespace: Option<String>,
    header: bool,
}

impl ResultDescriptor {
    /// Creates a result descriptor for the given return type.
    #[must_use]
    pub fn new(return_type: TypeToken) -> Self {
        Self {
            return_type,
            name: None,
            part_name: None,
            target_namespace: None,
            header: false,
        }
    }

    /// Sets the result name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the message part name.
    #[must_use]
    pub fn part_name(mut self, part_name: impl Into<String>) -> Self {
        self.part_name = Some(part_name.into());
        self
    }

    /// Sets the target namespace.
    #[must_use]
    pub fn target_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.target_namespace = Some(namespace.into());
        self
    }

    /// Sets whether the result travels in a header.
    #[must_use]
    pub fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Returns the return type.
    #[must_use]
    pub fn return_type(&self) -> &TypeToken {
        &self.return_type
    }

    /// Returns the result name, if set.
    #[must_use]
    pub fn name_value(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the part name, if set.
    #[must_use]
    pub fn part_name_value(&self) -> Option<&str> {
        self.part_name.as_deref()
    }

    /// Returns the target namespace, if set.
    #[must_use]
    pub fn target_namespace_value(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    /// Returns whether the result travels in a header.
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.header
    }
}

/// Direction of a SOAP-style parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterMode {
    /// Input only.
    #[default]
    In,
    /// Output only.
    Out,
    /// Input and output.
    InOut,
}

impl ParameterMode {
    /// Returns the attribute value used in metadata records.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
            Self::InOut => "INOUT",
        }
    }
}

/// Where a REST-style parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterSource {
    /// Aggregate bean populated from several sources.
    Bean,
    /// Cookie value.
    Cookie,
    /// Form field.
    Form,
    /// Request header.
    Header,
    /// Matrix parameter.
    Matrix,
    /// Path segment.
    Path,
    /// Query string.
    Query,
}

impl ParameterSource {
    /// Returns the source name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bean => "bean",
            Self::Cookie => "cookie",
            Self::Form => "form",
            Self::Header => "header",
            Self::Matrix => "matrix",
            Self::Path => "path",
            Self::Query => "query",
        }
    }

    /// Returns `true` if parameters from this source must carry a name.
    #[must_use]
    pub const fn requires_name(&self) -> bool {
        !matches!(self, Self::Bean)
    }
}

/// How a parameter is bound to the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum ParameterBinding {
    /// SOAP-style message part.
    Soap {
        /// Parameter direction.
        mode: ParameterMode,
        /// Target namespace of the part.
        target_namespace: Option<String>,
    },
    /// REST-style request value.
    Rest {
        /// Where the value is read from.
        source: ParameterSource,
    },
}

/// One parameter of an operation. Order is call-signature order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    type_token: TypeToken,
    name: String,
    binding: ParameterBinding,
    default_value: Option<String>,
    header: bool,
    part_name: Option<String>,
}

impl ParameterDescriptor {
    /// Creates an IN-mode SOAP parameter.
    #[must_use]
    pub fn new(type_token: TypeToken, name: impl Into<String>) -> Self {
        Self::soap(type_token, name, ParameterMode::In)
    }

    /// Creates a SOAP parameter with the given mode.
    #[must_use]
    pub fn soap(type_token: TypeToken, name: impl Into<String>, mode: ParameterMode) -> Self {
        Self {
            type_token,
            name: name.into(),
            binding: ParameterBinding::Soap {
                mode,
                target_namespace: None,
            },
            default_value: None,
            header: false,
            part_name: None,
        }
    }

    /// Creates a REST parameter read from the given source.
    #[must_use]
    pub fn rest(type_token: TypeToken, name: impl Into<String>, source: ParameterSource) -> Self {
        Self {
            type_token,
            name: name.into(),
            binding: ParameterBinding::Rest { source },
            default_value: None,
            header: false,
            part_name: None,
        }
    }

    /// Creates a REST bean parameter, which carries no name.
    #[must_use]
    pub fn bean(type_token: TypeToken) -> Self {
        Self::rest(type_token, "", ParameterSource::Bean)
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets whether the parameter travels in a header.
    #[must_use]
    pub fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Sets the message part name.
    #[must_use]
    pub fn part_name(mut self, part_name: impl Into<String>) -> Self {
        self.part_name = Some(part_name.into());
        self
    }

    /// Sets the target namespace of a SOAP parameter. No effect on REST parameters.
    #[must_use]
    pub fn target_namespace(mut self, namespace: impl Into<String>) -> Self {
        if let ParameterBinding::Soap {
            target_namespace, ..
        } = &mut self.binding
        {
            *target_namespace = Some(namespace.into());
        }
        self
    }

    /// Returns the declared type.
    #[must_use]
    pub fn type_token(&self) -> &TypeToken {
        &self.type_token
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the wire binding.
    #[must_use]
    pub fn binding(&self) -> &ParameterBinding {
        &self.binding
    }

    /// Returns the default value, if set.
    #[must_use]
    pub fn default_value_str(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Returns whether the parameter travels in a header.
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.header
    }

    /// Returns the part name, if set.
    #[must_use]
    pub fn part_name_value(&self) -> Option<&str> {
        self.part_name.as_deref()
    }

    /// Returns `true` if this parameter kind requires a name.
    #[must_use]
    pub fn requires_name(&self) -> bool {
        match &self.binding {
            ParameterBinding::Soap { .. } => true,
            ParameterBinding::Rest { source } => source.requires_name(),
        }
    }
}

/// Field visibility on the synthesized type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Readable by any consumer.
    Public,
    /// Readable by the type and its extensions.
    #[default]
    Protected,
    /// Readable by the type only.
    Private,
}

impl Visibility {
    /// Returns the visibility name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

/// A field declared on the synthesized type, independent of operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, unique within a blueprint.
    pub name: String,
    /// Declared type.
    pub declared_type: TypeToken,
    /// Visibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Initial value.
    pub initial_value: Value,
}

impl FieldSpec {
    /// Creates a protected field.
    #[must_use]
    pub fn new(declared_type: TypeToken, name: impl Into<String>, initial_value: Value) -> Self {
        Self {
            name: name.into(),
            declared_type,
            visibility: Visibility::Protected,
            initial_value,
        }
    }

    /// Sets the visibility.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// One declared operation as accumulated by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationEntry {
    /// Operation identity.
    pub operation: OperationDescriptor,
    /// Result contract.
    pub result: ResultDescriptor,
    /// Operation-level bound data.
    pub binding: Option<BindingDescriptor>,
    /// Ordered parameters.
    pub parameters: Vec<ParameterDescriptor>,
}

impl OperationEntry {
    /// Returns the signature (name and parameter types) of this operation.
    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature::new(
            self.operation.operation_name(),
            self.parameters
                .iter()
                .map(|p| p.type_token().clone())
                .collect(),
        )
    }
}

/// Serde support for HTTP methods.
mod http_method_serde {
    use http::Method;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(method: &Method, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(method.as_str())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Method, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
