//! Metadata synthesis.
//!
//! [`synthesize`] translates a [`ContractBlueprint`] into [`MetadataRecord`]s
//! scoped to the type, its fields, its operations, and each parameter
//! position. Synthesis is a pure function of the blueprint: it never fails
//! and produces the same records for the same input.
//!
//! Every optional string synthesizes to `""` when absent or blank, so
//! consumers never need to distinguish "unset" from "empty".
//!
//! # Example
//!
//! ```
//! use portico_core::builder::ContractBuilder;
//! use portico_core::metadata::{synthesize, Introspect, MetadataKind};
//!
//! # fn main() -> Result<(), portico_core::PorticoError> {
//! let mut builder = ContractBuilder::new();
//! builder.with_service("Greeter", "urn:demo")?;
//!
//! let metadata = synthesize(&builder.build()?);
//! let service = metadata.type_record(MetadataKind::Service).unwrap();
//! assert_eq!(service.get_str("name"), Some("Greeter"));
//! assert_eq!(service.get_str("wsdlLocation"), Some(""));
//! # Ok(())
//! # }
//! ```

use crate::blueprint::ContractBlueprint;
use crate::descriptor::{
    FieldSpec, OperationEntry, ParameterBinding, ParameterDescriptor, ParameterSource,
    RestMapping,
};
use crate::types::Signature;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Media type emitted when an operation consumes nothing in particular.
pub const ANY_MEDIA_TYPE: &str = "*/*";

/// Kind of a metadata record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataKind {
    /// Service identity.
    Service,
    /// Provider identity.
    ServiceProvider,
    /// Addressing policy.
    Addressing,
    /// Dispatch mode.
    ServiceMode,
    /// Handler chain reference.
    HandlerChain,
    /// Type-level or operation-level REST path.
    Path,
    /// Opaque bound data.
    Binding,
    /// Declared field.
    Field,
    /// Operation identity.
    Operation,
    /// Result contract.
    Result,
    /// REST method.
    HttpMethod,
    /// Produced media types.
    Produces,
    /// Consumed media types.
    Consumes,
    /// SOAP-style parameter.
    Parameter,
    /// REST bean parameter.
    BeanParam,
    /// REST cookie parameter.
    CookieParam,
    /// REST form parameter.
    FormParam,
    /// REST header parameter.
    HeaderParam,
    /// REST matrix parameter.
    MatrixParam,
    /// REST path parameter.
    PathParam,
    /// REST query parameter.
    QueryParam,
    /// Parameter default value.
    DefaultValue,
}

impl MetadataKind {
    /// Returns the record kind name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::ServiceProvider => "service_provider",
            Self::Addressing => "addressing",
            Self::ServiceMode => "service_mode",
            Self::HandlerChain => "handler_chain",
            Self::Path => "path",
            Self::Binding => "binding",
            Self::Field => "field",
            Self::Operation => "operation",
            Self::Result => "result",
            Self::HttpMethod => "http_method",
            Self::Produces => "produces",
            Self::Consumes => "consumes",
            Self::Parameter => "parameter",
            Self::BeanParam => "bean_param",
            Self::CookieParam => "cookie_param",
            Self::FormParam => "form_param",
            Self::HeaderParam => "header_param",
            Self::MatrixParam => "matrix_param",
            Self::PathParam => "path_param",
            Self::QueryParam => "query_param",
            Self::DefaultValue => "default_value",
        }
    }
}

/// One attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Text.
    String(String),
    /// Flag.
    Bool(bool),
    /// List of text values.
    List(Vec<String>),
}

impl MetadataValue {
    /// Returns the text value, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the flag, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the list, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// A structured record with ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    kind: MetadataKind,
    attributes: IndexMap<String, MetadataValue>,
}

impl MetadataRecord {
    /// Creates a record with no attributes.
    #[must_use]
    pub fn new(kind: MetadataKind) -> Self {
        Self {
            kind,
            attributes: IndexMap::new(),
        }
    }

    /// Appends an attribute.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns the record kind.
    #[must_use]
    pub fn kind(&self) -> MetadataKind {
        self.kind
    }

    /// Returns the attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &IndexMap<String, MetadataValue> {
        &self.attributes
    }

    /// Returns one attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.attributes.get(key)
    }

    /// Returns a string attribute.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetadataValue::as_str)
    }

    /// Returns a boolean attribute.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(MetadataValue::as_bool)
    }

    /// Returns a list attribute.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(MetadataValue::as_list)
    }
}

/// Metadata of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationMetadata {
    signature: Signature,
    records: Vec<MetadataRecord>,
    parameters: Vec<Vec<MetadataRecord>>,
}

impl OperationMetadata {
    /// Returns the operation signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Returns the operation-scope records.
    #[must_use]
    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    /// Returns the records of each parameter position.
    #[must_use]
    pub fn parameters(&self) -> &[Vec<MetadataRecord>] {
        &self.parameters
    }
}

/// The full metadata listing of a synthesized type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizedMetadata {
    #[serde(rename = "type")]
    type_records: Vec<MetadataRecord>,
    fields: IndexMap<String, MetadataRecord>,
    operations: Vec<OperationMetadata>,
}

impl SynthesizedMetadata {
    /// Returns the type-scope records in synthesis order.
    #[must_use]
    pub fn type_records(&self) -> &[MetadataRecord] {
        &self.type_records
    }

    /// Returns the first type-scope record of the given kind.
    #[must_use]
    pub fn type_record(&self, kind: MetadataKind) -> Option<&MetadataRecord> {
        self.type_records.iter().find(|r| r.kind() == kind)
    }

    /// Returns field records keyed by field name, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, MetadataRecord> {
        &self.fields
    }

    /// Returns operation metadata in declaration order.
    #[must_use]
    pub fn operations(&self) -> &[OperationMetadata] {
        &self.operations
    }

    /// Looks up one operation by signature.
    #[must_use]
    pub fn operation(&self, signature: &Signature) -> Option<&OperationMetadata> {
        self.operations.iter().find(|op| &op.signature == signature)
    }

    /// Serializes the listing to JSON for transport layers.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Read access to the metadata of a synthesized type.
pub trait Introspect {
    /// Returns the full metadata listing.
    fn metadata(&self) -> &SynthesizedMetadata;

    /// Returns the type-scope records.
    fn type_metadata(&self) -> &[MetadataRecord] {
        self.metadata().type_records()
    }

    /// Returns the field-scope records of one field.
    fn field_metadata(&self, name: &str) -> Option<&[MetadataRecord]> {
        self.metadata().fields().get(name).map(std::slice::from_ref)
    }

    /// Returns the operation-scope records of one operation.
    fn operation_metadata(&self, signature: &Signature) -> Option<&[MetadataRecord]> {
        self.metadata()
            .operation(signature)
            .map(OperationMetadata::records)
    }

    /// Returns the records of each parameter position of one operation.
    fn parameter_metadata(&self, signature: &Signature) -> Option<&[Vec<MetadataRecord>]> {
        self.metadata()
            .operation(signature)
            .map(OperationMetadata::parameters)
    }
}

impl Introspect for SynthesizedMetadata {
    fn metadata(&self) -> &SynthesizedMetadata {
        self
    }
}

/// Synthesizes the metadata listing of a blueprint.
#[must_use]
pub fn synthesize(blueprint: &ContractBlueprint) -> SynthesizedMetadata {
    SynthesizedMetadata {
        type_records: type_records(blueprint),
        fields: blueprint
            .fields()
            .iter()
            .map(|field| (field.name.clone(), field_record(field)))
            .collect(),
        operations: blueprint.operations().iter().map(operation_metadata).collect(),
    }
}

fn text(value: Option<&str>) -> MetadataValue {
    match value {
        Some(s) if !s.trim().is_empty() => MetadataValue::String(s.to_string()),
        _ => MetadataValue::String(String::new()),
    }
}

fn type_records(blueprint: &ContractBlueprint) -> Vec<MetadataRecord> {
    let mut records = Vec::new();

    if let Some(service) = blueprint.service() {
        records.push(
            MetadataRecord::new(MetadataKind::Service)
                .with("name", text(service.name_value()))
                .with("targetNamespace", text(service.target_namespace_value()))
                .with("serviceName", text(service.service_name_value()))
                .with("portName", text(service.port_name_value()))
                .with("wsdlLocation", text(service.wsdl_location_value()))
                .with("endpointInterface", text(service.endpoint_interface_value())),
        );
    }
    if let Some(provider) = blueprint.provider() {
        records.push(
            MetadataRecord::new(MetadataKind::ServiceProvider)
                .with("wsdlLocation", text(provider.wsdl_location.as_deref()))
                .with("serviceName", text(provider.service_name.as_deref()))
                .with("targetNamespace", text(provider.target_namespace.as_deref()))
                .with("portName", text(provider.port_name.as_deref())),
        );
    }
    if let Some(addressing) = blueprint.addressing() {
        records.push(
            MetadataRecord::new(MetadataKind::Addressing)
                .with("enabled", addressing.enabled)
                .with("required", addressing.required)
                .with("responses", addressing.responses.as_str()),
        );
    }
    if let Some(mode) = blueprint.service_mode() {
        records.push(MetadataRecord::new(MetadataKind::ServiceMode).with("value", mode.as_str()));
    }
    if let Some(chain) = blueprint.handler_chain() {
        records.push(
            MetadataRecord::new(MetadataKind::HandlerChain)
                .with("name", text(chain.name.as_deref()))
                .with("file", text(chain.file.as_deref())),
        );
    }
    if let Some(path) = blueprint.path() {
        records.push(MetadataRecord::new(MetadataKind::Path).with("value", text(Some(path))));
    }
    if let Some(binding) = blueprint.binding() {
        records.push(binding_record(binding.uid(), binding.json()));
    }

    records
}

fn binding_record(uid: &str, json: Option<&str>) -> MetadataRecord {
    MetadataRecord::new(MetadataKind::Binding)
        .with("uid", uid)
        .with("json", text(json))
}

fn field_record(field: &FieldSpec) -> MetadataRecord {
    MetadataRecord::new(MetadataKind::Field)
        .with("name", field.name.as_str())
        .with("type", field.declared_type.to_string())
        .with("visibility", field.visibility.as_str())
}

fn operation_metadata(entry: &OperationEntry) -> OperationMetadata {
    let operation = &entry.operation;
    let result = &entry.result;

    let mut records = vec![
        MetadataRecord::new(MetadataKind::Operation)
            .with("operationName", operation.operation_name())
            .with("action", text(operation.action_value()))
            .with("exclude", operation.is_excluded()),
        MetadataRecord::new(MetadataKind::Result)
            .with("name", text(result.name_value()))
            .with("partName", text(result.part_name_value()))
            .with("targetNamespace", text(result.target_namespace_value()))
            .with("header", result.is_header())
            .with("type", result.return_type().to_string()),
    ];
    if let Some(binding) = &entry.binding {
        records.push(binding_record(binding.uid(), binding.json()));
    }
    if let Some(mapping) = operation.rest_mapping() {
        records.extend(rest_records(mapping));
    }

    OperationMetadata {
        signature: entry.signature(),
        records,
        parameters: entry.parameters.iter().map(parameter_records).collect(),
    }
}

fn rest_records(mapping: &RestMapping) -> Vec<MetadataRecord> {
    let mut records =
        vec![MetadataRecord::new(MetadataKind::HttpMethod).with("method", mapping.method().as_str())];
    if let Some(path) = mapping.path_value() {
        records.push(MetadataRecord::new(MetadataKind::Path).with("value", text(Some(path))));
    }

    let produces = media_types(mapping.produced());
    let mut consumes = media_types(mapping.consumed());
    if consumes.is_empty() {
        consumes.push(ANY_MEDIA_TYPE.to_string());
    }
    records.push(MetadataRecord::new(MetadataKind::Produces).with("value", produces));
    records.push(MetadataRecord::new(MetadataKind::Consumes).with("value", consumes));
    records
}

fn media_types(values: &[String]) -> Vec<String> {
    values
        .iter()
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .collect()
}

fn parameter_records(parameter: &ParameterDescriptor) -> Vec<MetadataRecord> {
    let primary = match parameter.binding() {
        ParameterBinding::Soap {
            mode,
            target_namespace,
        } => MetadataRecord::new(MetadataKind::Parameter)
            .with("name", text(Some(parameter.name())))
            .with("targetNamespace", text(target_namespace.as_deref()))
            .with("mode", mode.as_str())
            .with("header", parameter.is_header())
            .with("partName", text(parameter.part_name_value())),
        ParameterBinding::Rest { source } => {
            let kind = match source {
                ParameterSource::Bean => MetadataKind::BeanParam,
                ParameterSource::Cookie => MetadataKind::CookieParam,
                ParameterSource::Form => MetadataKind::FormParam,
                ParameterSource::Header => MetadataKind::HeaderParam,
                ParameterSource::Matrix => MetadataKind::MatrixParam,
                ParameterSource::Path => MetadataKind::PathParam,
                ParameterSource::Query => MetadataKind::QueryParam,
            };
            let record = MetadataRecord::new(kind);
            if source.requires_name() {
                record.with("value", parameter.name())
            } else {
                record
            }
        }
    };

    let mut records = vec![primary];
    if let Some(default) = parameter
        .default_value_str()
        .filter(|v| !v.trim().is_empty())
    {
        records.push(MetadataRecord::new(MetadataKind::DefaultValue).with("value", default));
    }
    records
}
