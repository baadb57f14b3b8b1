//! Blueprint realization.
//!
//! The [`Realizer`] turns a frozen [`ContractBlueprint`] into a loaded
//! [`TypeArtifact`] or a handler-bound [`Instance`]. Realization draws the
//! qualified name, checks the blueprint against the backing type system,
//! registers the name and composes one pipeline per operation: global stages
//! first, then the stages registered for that operation name.
//!
//! A failed realization registers nothing.
//!
//! # Example
//!
//! ```
//! use portico_core::fixtures::greeter_contract;
//! use portico_intercept::stages::LoggingInterceptor;
//! use portico_runtime::{FnHandler, Realizer};
//! use serde_json::json;
//!
//! let realizer = Realizer::builder().stage(LoggingInterceptor::new()).build();
//! let blueprint = greeter_contract().unwrap().build().unwrap();
//!
//! let instance = realizer
//!     .to_instance(blueprint, FnHandler::new(|_, args| Ok(args[0].clone())))
//!     .unwrap();
//! assert_eq!(instance.invoke("sayHello", &[json!("hi")]).unwrap(), json!("hi"));
//! ```

use crate::artifact::{BoundOperation, TypeArtifact};
use crate::handler::CallHandler;
use crate::instance::Instance;
use crate::registry::TypeRegistry;
use portico_core::types::value_type_name;
use portico_core::{synthesize, ContractBlueprint, PorticoError, PorticoResult};
use portico_intercept::{BoxedInterceptor, Interceptor, Pipeline, PipelineBuilder};
use portico_telemetry::metrics::{record_realization, OUTCOME_ERROR, OUTCOME_SUCCESS};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Realizes blueprints into loadable types and bound instances.
pub struct Realizer {
    registry: Arc<TypeRegistry>,
    global: Pipeline,
    per_operation: HashMap<String, Pipeline>,
}

impl Realizer {
    /// Creates a realizer with no stages and a private registry.
    ///
    /// Names are unique per registry: two realizers built this way may both
    /// load the same fixed name. Use [`shared`](Self::shared) or
    /// [`RealizerBuilder::global_registry`] for process-wide uniqueness.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a realizer with no stages backed by [`TypeRegistry::global`].
    #[must_use]
    pub fn shared() -> Self {
        Self::builder().global_registry().build()
    }

    /// Creates a new realizer builder.
    #[must_use]
    pub fn builder() -> RealizerBuilder {
        RealizerBuilder::new()
    }

    /// Returns the backing type registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Returns the global pipeline.
    #[must_use]
    pub fn global_pipeline(&self) -> &Pipeline {
        &self.global
    }

    /// Returns the composed pipeline for an operation name.
    #[must_use]
    pub fn pipeline_for(&self, operation: &str) -> Pipeline {
        match self.per_operation.get(operation) {
            Some(local) => self.global.then(local),
            None => self.global.clone(),
        }
    }

    /// Loads the blueprint as a new type.
    ///
    /// # Errors
    ///
    /// Returns [`PorticoError::Realization`] if the drawn name is already in
    /// use, a parameter or field is typed `void`, or a field's initial value
    /// does not match its declared type.
    pub fn to_type(&self, blueprint: ContractBlueprint) -> PorticoResult<TypeArtifact> {
        let result = self.realize(blueprint);
        let outcome = if result.is_ok() {
            OUTCOME_SUCCESS
        } else {
            OUTCOME_ERROR
        };
        record_realization("type", outcome);
        result
    }

    /// Loads the blueprint and binds it to `handler`.
    ///
    /// # Errors
    ///
    /// Same as [`to_type`](Self::to_type), plus
    /// [`PorticoError::HandlerBinding`] if the instance cannot be built.
    pub fn to_instance<H: CallHandler>(
        &self,
        blueprint: ContractBlueprint,
        handler: H,
    ) -> PorticoResult<Instance> {
        self.to_type(blueprint)?.instantiate(handler)
    }

    /// Releases an artifact's qualified name.
    ///
    /// Returns `false` if the artifact was not loaded by this realizer or was
    /// already unloaded. Existing instances keep working.
    pub fn unload(&self, artifact: &TypeArtifact) -> bool {
        if !Arc::ptr_eq(artifact.registry(), &self.registry) {
            return false;
        }
        let released = self.registry.unregister(artifact.qualified_name());
        if released {
            debug!(qualified_name = artifact.qualified_name(), "Type unloaded");
        }
        released
    }

    fn realize(&self, blueprint: ContractBlueprint) -> PorticoResult<TypeArtifact> {
        let qualified_name = blueprint.draw_name();

        if let Err(error) = check_blueprint(&blueprint, &qualified_name) {
            warn!(qualified_name = %qualified_name, error = %error, "Realization rejected");
            return Err(error);
        }
        self.registry.register(&qualified_name)?;

        let metadata = synthesize(&blueprint);
        let operations = blueprint
            .operations()
            .iter()
            .map(|entry| BoundOperation {
                signature: entry.signature(),
                result_type: entry.result.return_type().clone(),
                pipeline: self.pipeline_for(entry.operation.operation_name()),
            })
            .collect();

        debug!(
            qualified_name = %qualified_name,
            base = blueprint.base_contract().name(),
            fields = blueprint.fields().len(),
            operations = blueprint.operations().len(),
            "Type realized"
        );
        Ok(TypeArtifact::new(
            qualified_name,
            blueprint,
            metadata,
            operations,
            Arc::clone(&self.registry),
        ))
    }
}

fn check_blueprint(blueprint: &ContractBlueprint, qualified_name: &str) -> PorticoResult<()> {
    for entry in blueprint.operations() {
        for (position, parameter) in entry.parameters.iter().enumerate() {
            if !parameter.type_token().is_value_type() {
                return Err(PorticoError::realization(
                    qualified_name,
                    format!(
                        "parameter {position} of '{}' cannot be {}",
                        entry.signature(),
                        parameter.type_token()
                    ),
                ));
            }
        }
    }

    for field in blueprint.fields() {
        if !field.declared_type.is_value_type() {
            return Err(PorticoError::realization(
                qualified_name,
                format!("field '{}' cannot be {}", field.name, field.declared_type),
            ));
        }
        if !field.initial_value.is_null() && !field.declared_type.accepts(&field.initial_value) {
            return Err(PorticoError::realization(
                qualified_name,
                format!(
                    "field '{}' is declared {} but initialized with {}",
                    field.name,
                    field.declared_type,
                    value_type_name(&field.initial_value)
                ),
            ));
        }
    }
    Ok(())
}

impl Default for Realizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Realizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Realizer")
            .field("registry", &self.registry)
            .field("global", &self.global)
            .field("per_operation", &self.per_operation)
            .finish()
    }
}

/// Builder for constructing a [`Realizer`].
#[derive(Default)]
pub struct RealizerBuilder {
    registry: Option<Arc<TypeRegistry>>,
    global: PipelineBuilder,
    per_operation: HashMap<String, PipelineBuilder>,
}

impl RealizerBuilder {
    /// Creates a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares an existing registry instead of creating a private one.
    #[must_use]
    pub fn registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Backs the realizer with the process-wide registry.
    #[must_use]
    pub fn global_registry(self) -> Self {
        self.registry(TypeRegistry::global())
    }

    /// Appends a global stage, run for every operation.
    #[must_use]
    pub fn stage<I: Interceptor>(mut self, interceptor: I) -> Self {
        self.global = self.global.stage(interceptor);
        self
    }

    /// Appends an already shared global stage.
    #[must_use]
    pub fn shared_stage(mut self, interceptor: BoxedInterceptor) -> Self {
        self.global = self.global.shared_stage(interceptor);
        self
    }

    /// Appends a stage that runs only for operations named `operation`,
    /// after every global stage.
    #[must_use]
    pub fn operation_stage<I: Interceptor>(
        mut self,
        operation: impl Into<String>,
        interceptor: I,
    ) -> Self {
        let operation = operation.into();
        let stages = self.per_operation.remove(&operation).unwrap_or_default();
        self.per_operation
            .insert(operation, stages.stage(interceptor));
        self
    }

    /// Appends an already shared stage for operations named `operation`.
    #[must_use]
    pub fn shared_operation_stage(
        mut self,
        operation: impl Into<String>,
        interceptor: BoxedInterceptor,
    ) -> Self {
        let operation = operation.into();
        let stages = self.per_operation.remove(&operation).unwrap_or_default();
        self.per_operation
            .insert(operation, stages.shared_stage(interceptor));
        self
    }

    /// Builds the realizer.
    #[must_use]
    pub fn build(self) -> Realizer {
        Realizer {
            registry: self.registry.unwrap_or_default(),
            global: self.global.build(),
            per_operation: self
                .per_operation
                .into_iter()
                .map(|(operation, stages)| (operation, stages.build()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::FnHandler;
    use portico_core::fixtures::{greeter_contract, say_hello};
    use portico_core::{
        ContractBuilder, FieldSpec, NamingPolicy, ParameterDescriptor, TypeToken,
    };
    use portico_intercept::stages::{LoggingInterceptor, MemorySink, TimingInterceptor};
    use portico_intercept::{Call, FnInterceptor};
    use serde_json::json;

    fn fixed(name: &str) -> ContractBlueprint {
        let mut builder = greeter_contract().unwrap();
        builder.with_naming_policy(NamingPolicy::fixed(name)).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_fixed_name_collides_on_second_realization() {
        let realizer = Realizer::new();
        let first = realizer.to_type(fixed("X.Y.Z")).unwrap();
        assert_eq!(first.qualified_name(), "X.Y.Z");

        let err = realizer.to_type(fixed("X.Y.Z")).unwrap_err();
        assert!(matches!(err, PorticoError::Realization { .. }));
        assert_eq!(realizer.registry().len(), 1);
    }

    #[test]
    fn test_unload_releases_name() {
        let realizer = Realizer::new();
        let first = realizer.to_type(fixed("X.Y.Z")).unwrap();

        assert!(realizer.unload(&first));
        assert!(!realizer.unload(&first));
        assert!(realizer.to_type(fixed("X.Y.Z")).is_ok());
    }

    #[test]
    fn test_unload_ignores_foreign_artifacts() {
        let one = Realizer::new();
        let other = Realizer::new();
        let artifact = one.to_type(fixed("X.Y.Z")).unwrap();

        assert!(!other.unload(&artifact));
        assert!(artifact.is_loaded());
    }

    #[test]
    fn test_shared_registry_spans_realizers() {
        let registry = Arc::new(TypeRegistry::new());
        let one = Realizer::builder().registry(Arc::clone(&registry)).build();
        let other = Realizer::builder().registry(Arc::clone(&registry)).build();

        one.to_type(fixed("X.Y.Z")).unwrap();
        assert!(other.to_type(fixed("X.Y.Z")).is_err());
    }

    #[test]
    fn test_private_registries_are_independent() {
        let one = Realizer::new();
        let other = Realizer::new();

        one.to_type(fixed("X.Y.Z")).unwrap();
        assert!(other.to_type(fixed("X.Y.Z")).is_ok());
    }

    #[test]
    fn test_global_registry_spans_realizers() {
        let name = "portico.realizer.GlobalScope";
        let one = Realizer::shared();
        let other = Realizer::builder().global_registry().build();
        assert!(Arc::ptr_eq(one.registry(), other.registry()));

        let artifact = one.to_type(fixed(name)).unwrap();
        let err = other.to_type(fixed(name)).unwrap_err();
        assert!(matches!(err, PorticoError::Realization { ref qualified_name, .. } if qualified_name == name));

        assert!(other.unload(&artifact));
        assert!(!TypeRegistry::global().contains(name));
    }

    #[test]
    fn test_random_names_are_distinct() {
        let realizer = Realizer::new();
        let a = realizer.to_type(greeter_contract().unwrap().build().unwrap()).unwrap();
        let b = realizer.to_type(greeter_contract().unwrap().build().unwrap()).unwrap();

        assert_ne!(a.qualified_name(), b.qualified_name());
        assert!(a.qualified_name().starts_with("portico.endpoint.EndpointApi$"));
    }

    #[test]
    fn test_void_parameter_rejected() {
        let mut builder = ContractBuilder::new();
        builder
            .add_method(
                TypeToken::String,
                "broken",
                vec![ParameterDescriptor::new(TypeToken::Void, "nothing")],
            )
            .unwrap();

        let realizer = Realizer::new();
        let err = realizer.to_type(builder.build().unwrap()).unwrap_err();
        assert!(err.to_string().contains("cannot be void"));
        assert!(realizer.registry().is_empty());
    }

    #[test]
    fn test_void_field_rejected() {
        let mut builder = ContractBuilder::new();
        builder
            .add_field_spec(FieldSpec::new(TypeToken::Void, "nothing", json!(null)))
            .unwrap();

        let err = Realizer::new().to_type(builder.build().unwrap()).unwrap_err();
        assert!(matches!(err, PorticoError::Realization { .. }));
    }

    #[test]
    fn test_field_value_must_match_type() {
        let mut builder = ContractBuilder::new();
        builder
            .add_field(TypeToken::Integer, "count", json!("three"))
            .unwrap();

        let err = Realizer::new().to_type(builder.build().unwrap()).unwrap_err();
        assert!(err.to_string().contains("initialized with string"));
    }

    #[test]
    fn test_null_field_value_allowed() {
        let mut builder = ContractBuilder::new();
        builder.add_field(TypeToken::String, "label", json!(null)).unwrap();
        assert!(Realizer::new().to_type(builder.build().unwrap()).is_ok());
    }

    #[test]
    fn test_global_stages_run_before_operation_stages() {
        let sink = Arc::new(MemorySink::new());
        let realizer = Realizer::builder()
            .stage(TimingInterceptor::with_sink(sink.clone()))
            .stage(LoggingInterceptor::new())
            .operation_stage(
                "sayHello",
                FnInterceptor::new("exclaim", |call: Call<'_>| {
                    let value = call.proceed()?;
                    Ok(json!(format!("{}!", value.as_str().unwrap_or_default())))
                }),
            )
            .build();

        assert_eq!(realizer.pipeline_for("sayHello").stage_names(), ["timing", "logging", "exclaim"]);
        assert_eq!(realizer.pipeline_for("other").stage_names(), ["timing", "logging"]);

        let artifact = realizer.to_type(greeter_contract().unwrap().build().unwrap()).unwrap();
        assert_eq!(
            artifact.stage_names(&say_hello()),
            Some(vec!["timing", "logging", "exclaim"])
        );

        let instance = artifact
            .instantiate(FnHandler::new(|_, args| Ok(args[0].clone())))
            .unwrap();
        assert_eq!(instance.invoke("sayHello", &[json!("hi")]).unwrap(), json!("hi!"));
        assert_eq!(sink.len(), 1);
    }
}
