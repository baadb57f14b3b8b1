//! Loaded synthesized types.
//!
//! A [`TypeArtifact`] is the result of realizing a blueprint: a qualified
//! name loaded in a [`TypeRegistry`], the synthesized metadata listing, and
//! one composed interception pipeline per declared operation. Artifacts are
//! cheap to clone and can be shared between threads.

use crate::handler::CallHandler;
use crate::instance::Instance;
use crate::registry::TypeRegistry;
use portico_core::types::value_type_name;
use portico_core::{
    BaseContract, ContractBlueprint, Introspect, PorticoError, PorticoResult, Signature,
    SynthesizedMetadata, TypeToken,
};
use portico_intercept::Pipeline;
use portico_telemetry::metrics::{record_realization, OUTCOME_ERROR, OUTCOME_SUCCESS};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One declared operation with its composed pipeline.
pub(crate) struct BoundOperation {
    pub(crate) signature: Signature,
    pub(crate) result_type: TypeToken,
    pub(crate) pipeline: Pipeline,
}

struct ArtifactInner {
    qualified_name: String,
    blueprint: ContractBlueprint,
    metadata: SynthesizedMetadata,
    operations: Vec<BoundOperation>,
    registry: Arc<TypeRegistry>,
}

/// A realized, loadable synthesized type.
#[derive(Clone)]
pub struct TypeArtifact {
    inner: Arc<ArtifactInner>,
}

impl TypeArtifact {
    pub(crate) fn new(
        qualified_name: String,
        blueprint: ContractBlueprint,
        metadata: SynthesizedMetadata,
        operations: Vec<BoundOperation>,
        registry: Arc<TypeRegistry>,
    ) -> Self {
        Self {
            inner: Arc::new(ArtifactInner {
                qualified_name,
                blueprint,
                metadata,
                operations,
                registry,
            }),
        }
    }

    /// Returns the qualified name drawn at realization.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.inner.qualified_name
    }

    /// Returns the base contract the type extends.
    #[must_use]
    pub fn base_contract(&self) -> &BaseContract {
        self.inner.blueprint.base_contract()
    }

    /// Returns the frozen blueprint this type was realized from.
    #[must_use]
    pub fn blueprint(&self) -> &ContractBlueprint {
        &self.inner.blueprint
    }

    /// Returns the declared signatures in declaration order.
    #[must_use]
    pub fn signatures(&self) -> Vec<Signature> {
        self.inner
            .operations
            .iter()
            .map(|op| op.signature.clone())
            .collect()
    }

    /// Returns the stage names of one operation's pipeline.
    #[must_use]
    pub fn stage_names(&self, signature: &Signature) -> Option<Vec<&'static str>> {
        self.bound(signature).map(|op| op.pipeline.stage_names())
    }

    /// Returns `true` while the type is loaded in its registry.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.registry.contains(&self.inner.qualified_name)
    }

    /// Constructs an instance whose operations forward to `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`PorticoError::HandlerBinding`] if the type has been unloaded.
    pub fn instantiate<H: CallHandler>(&self, handler: H) -> PorticoResult<Instance> {
        if !self.is_loaded() {
            record_realization("instance", OUTCOME_ERROR);
            return Err(PorticoError::handler_binding(format!(
                "type '{}' is not loaded",
                self.qualified_name()
            )));
        }

        let instance = Instance::new(self.clone(), Arc::new(handler));
        record_realization("instance", OUTCOME_SUCCESS);
        debug!(
            qualified_name = self.qualified_name(),
            instance_id = %instance.id(),
            "Instance bound"
        );
        Ok(instance)
    }

    pub(crate) fn registry(&self) -> &Arc<TypeRegistry> {
        &self.inner.registry
    }

    pub(crate) fn bound(&self, signature: &Signature) -> Option<&BoundOperation> {
        self.inner
            .operations
            .iter()
            .find(|op| &op.signature == signature)
    }

    /// Picks the first declared overload of `operation` accepting `arguments`.
    pub(crate) fn resolve(&self, operation: &str, arguments: &[Value]) -> PorticoResult<&BoundOperation> {
        let mut overloads = self
            .inner
            .operations
            .iter()
            .filter(|op| op.signature.name() == operation)
            .peekable();

        if overloads.peek().is_none() {
            return Err(PorticoError::argument_mismatch(
                operation,
                format!("no such operation on '{}'", self.qualified_name()),
            ));
        }

        overloads
            .find(|op| op.signature.accepts(arguments))
            .ok_or_else(|| {
                let received: Vec<_> = arguments.iter().map(value_type_name).collect();
                PorticoError::argument_mismatch(
                    operation,
                    format!("no overload accepts ({})", received.join(", ")),
                )
            })
    }
}

impl Introspect for TypeArtifact {
    fn metadata(&self) -> &SynthesizedMetadata {
        &self.inner.metadata
    }
}

impl fmt::Debug for TypeArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeArtifact")
            .field("qualified_name", &self.inner.qualified_name)
            .field("operations", &self.inner.operations.len())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::handler::FnHandler;
    use crate::realizer::Realizer;
    use portico_core::fixtures::{greeter_contract, say_hello};
    use portico_core::{Introspect, MetadataKind, PorticoError, Signature, TypeToken};
    use serde_json::json;

    #[test]
    fn test_artifact_exposes_metadata() {
        let realizer = Realizer::new();
        let blueprint = greeter_contract().unwrap().build().unwrap();
        let artifact = realizer.to_type(blueprint).unwrap();

        let service = artifact.type_metadata()[0].clone();
        assert_eq!(service.kind(), MetadataKind::Service);
        assert_eq!(service.get_str("name"), Some("Greeter"));
        assert!(artifact.field_metadata("uid").is_some());
        assert_eq!(artifact.parameter_metadata(&say_hello()).map(<[_]>::len), Some(1));
        assert_eq!(artifact.signatures().len(), 2);
    }

    #[test]
    fn test_resolution_prefers_first_declared() {
        let realizer = Realizer::new();
        let blueprint = greeter_contract().unwrap().build().unwrap();
        let artifact = realizer.to_type(blueprint).unwrap();

        let one = artifact.resolve("sayHello", &[json!("hi")]).unwrap();
        assert_eq!(one.signature, say_hello());

        let two = artifact.resolve("sayHello", &[json!("hi"), json!(2)]).unwrap();
        assert_eq!(two.signature.arity(), 2);

        let err = artifact.resolve("sayHello", &[json!(1)]).err().unwrap();
        assert!(matches!(err, PorticoError::ArgumentMismatch { .. }));
        assert!(err.to_string().contains("(integer)"));

        let err = artifact.resolve("missing", &[]).err().unwrap();
        assert!(err.to_string().contains("no such operation"));
    }

    #[test]
    fn test_instantiate_after_unload_fails() {
        let realizer = Realizer::new();
        let blueprint = greeter_contract().unwrap().build().unwrap();
        let artifact = realizer.to_type(blueprint).unwrap();
        assert!(artifact.is_loaded());

        assert!(realizer.unload(&artifact));
        assert!(!artifact.is_loaded());

        let err = artifact
            .instantiate(FnHandler::new(|_, _| Ok(json!(null))))
            .unwrap_err();
        assert!(matches!(err, PorticoError::HandlerBinding { .. }));
    }

    #[test]
    fn test_stage_names_for_unknown_signature() {
        let realizer = Realizer::new();
        let blueprint = greeter_contract().unwrap().build().unwrap();
        let artifact = realizer.to_type(blueprint).unwrap();

        let unknown = Signature::new("sayHello", vec![TypeToken::Boolean]);
        assert!(artifact.stage_names(&unknown).is_none());
        assert_eq!(artifact.stage_names(&say_hello()), Some(vec![]));
    }
}
