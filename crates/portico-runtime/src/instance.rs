//! Bound instances.
//!
//! An [`Instance`] pairs a [`TypeArtifact`] with a [`CallHandler`]. Every call
//! is resolved to one declared signature, then runs through that operation's
//! pipeline before the handler sees it:
//!
//! ```text
//! invoke(name, args)
//!   -> resolve overload (first declared that accepts args)
//!   -> pipeline: global stages, operation stages
//!   -> handler.invoke(name, args)
//!   -> result checked against the declared return type
//! ```

use crate::artifact::{BoundOperation, TypeArtifact};
use crate::handler::SharedHandler;
use portico_core::types::value_type_name;
use portico_core::{
    Introspect, PorticoError, PorticoResult, Signature, SynthesizedMetadata, TypeToken,
};
use portico_telemetry::metrics::InFlightGuard;
use serde_json::Value;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// A synthesized type bound to a call handler.
pub struct Instance {
    id: Uuid,
    artifact: TypeArtifact,
    handler: SharedHandler,
}

impl Instance {
    pub(crate) fn new(artifact: TypeArtifact, handler: SharedHandler) -> Self {
        Self {
            id: Uuid::now_v7(),
            artifact,
            handler,
        }
    }

    /// Returns the instance ID, used to correlate log events.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the qualified name of the instance's type.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        self.artifact.qualified_name()
    }

    /// Returns the type this instance was created from.
    #[must_use]
    pub fn artifact(&self) -> &TypeArtifact {
        &self.artifact
    }

    /// Reads a declared field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.artifact
            .blueprint()
            .fields()
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.initial_value)
    }

    /// Calls an operation by name.
    ///
    /// The first declared overload whose arity and parameter types accept
    /// `arguments` is chosen.
    ///
    /// # Errors
    ///
    /// Returns [`PorticoError::ArgumentMismatch`] if no overload fits, or
    /// whatever the pipeline or handler returns.
    pub fn invoke(&self, operation: &str, arguments: &[Value]) -> PorticoResult<Value> {
        let bound = self.artifact.resolve(operation, arguments)?;
        self.dispatch(bound, arguments)
    }

    /// Calls the operation with exactly this signature.
    ///
    /// # Errors
    ///
    /// Returns [`PorticoError::ArgumentMismatch`] if the signature is not
    /// declared or the arguments do not match it.
    pub fn invoke_signature(
        &self,
        signature: &Signature,
        arguments: &[Value],
    ) -> PorticoResult<Value> {
        let bound = self.artifact.bound(signature).ok_or_else(|| {
            PorticoError::argument_mismatch(
                signature.name(),
                format!("'{signature}' is not declared"),
            )
        })?;

        if !signature.accepts(arguments) {
            let received: Vec<_> = arguments.iter().map(value_type_name).collect();
            return Err(PorticoError::argument_mismatch(
                signature.name(),
                format!("'{signature}' does not accept ({})", received.join(", ")),
            ));
        }

        self.dispatch(bound, arguments)
    }

    fn dispatch(&self, bound: &BoundOperation, arguments: &[Value]) -> PorticoResult<Value> {
        let _in_flight = InFlightGuard::new();
        debug!(
            instance_id = %self.id,
            qualified_name = self.qualified_name(),
            signature = %bound.signature,
            "Dispatching operation"
        );

        let handler = &self.handler;
        let result_type = &bound.result_type;
        bound
            .pipeline
            .execute(&bound.signature, arguments, move |signature, arguments| {
                let value = handler.invoke(signature.name(), arguments)?;
                check_result(signature, result_type, value)
            })
    }
}

fn check_result(signature: &Signature, result_type: &TypeToken, value: Value) -> PorticoResult<Value> {
    match result_type {
        TypeToken::Void => Ok(Value::Null),
        _ if value.is_null() || result_type.accepts(&value) => Ok(value),
        _ => Err(PorticoError::invocation(
            signature.name(),
            format!(
                "handler returned {} where {result_type} is declared",
                value_type_name(&value)
            ),
        )),
    }
}

impl Introspect for Instance {
    fn metadata(&self) -> &SynthesizedMetadata {
        self.artifact.metadata()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("qualified_name", &self.qualified_name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::FnHandler;
    use crate::realizer::Realizer;
    use parking_lot::Mutex;
    use portico_core::fixtures::{greeter_contract, say_hello};
    use portico_core::{ContractBuilder, ParameterDescriptor, ResultDescriptor};
    use serde_json::json;
    use std::sync::Arc;

    fn greeter(calls: Arc<Mutex<Vec<(String, Vec<Value>)>>>) -> Instance {
        let realizer = Realizer::new();
        let blueprint = greeter_contract().unwrap().build().unwrap();
        realizer
            .to_instance(
                blueprint,
                FnHandler::new(move |operation, args| {
                    calls.lock().push((operation.to_string(), args.to_vec()));
                    Ok(json!(format!("{operation}/{}", args.len())))
                }),
            )
            .unwrap()
    }

    #[test]
    fn test_invoke_routes_to_handler() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let instance = greeter(calls.clone());

        let result = instance.invoke("sayHello", &[json!("hi")]).unwrap();

        assert_eq!(result, json!("sayHello/1"));
        assert_eq!(
            *calls.lock(),
            vec![("sayHello".to_string(), vec![json!("hi")])]
        );
    }

    #[test]
    fn test_invoke_picks_overload_by_arguments() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let instance = greeter(calls);

        let result = instance.invoke("sayHello", &[json!("hi"), json!(3)]).unwrap();
        assert_eq!(result, json!("sayHello/2"));
    }

    #[test]
    fn test_mismatch_never_reaches_handler() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let instance = greeter(calls.clone());

        let err = instance.invoke("sayHello", &[json!(true)]).unwrap_err();
        assert!(matches!(err, PorticoError::ArgumentMismatch { .. }));

        let err = instance
            .invoke_signature(&say_hello(), &[json!("a"), json!("b")])
            .unwrap_err();
        assert!(matches!(err, PorticoError::ArgumentMismatch { .. }));

        assert!(calls.lock().is_empty());
    }

    #[test]
    fn test_invoke_signature() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let instance = greeter(calls);

        let result = instance.invoke_signature(&say_hello(), &[json!("hi")]).unwrap();
        assert_eq!(result, json!("sayHello/1"));

        let undeclared = Signature::new("sayGoodbye", vec![]);
        assert!(instance.invoke_signature(&undeclared, &[]).is_err());
    }

    #[test]
    fn test_field_reads() {
        let instance = greeter(Arc::new(Mutex::new(Vec::new())));
        assert_eq!(instance.field("uid"), Some(&json!("greeter-1")));
        assert_eq!(instance.field("missing"), None);
    }

    #[test]
    fn test_result_type_is_checked() {
        let mut builder = ContractBuilder::new();
        builder
            .add_method(TypeToken::Integer, "count", vec![])
            .unwrap()
            .add_method(TypeToken::Void, "reset", vec![])
            .unwrap();
        let instance = Realizer::new()
            .to_instance(
                builder.build().unwrap(),
                FnHandler::new(|_, _| Ok(json!("not a number"))),
            )
            .unwrap();

        let err = instance.invoke("count", &[]).unwrap_err();
        assert!(err.to_string().contains("handler returned string"));

        assert_eq!(instance.invoke("reset", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_null_result_is_accepted() {
        let mut builder = ContractBuilder::new();
        builder
            .add_operation(
                ResultDescriptor::new(TypeToken::String),
                portico_core::OperationDescriptor::new("lookup"),
                None,
                vec![ParameterDescriptor::new(TypeToken::String, "key")],
            )
            .unwrap();
        let instance = Realizer::new()
            .to_instance(builder.build().unwrap(), FnHandler::new(|_, _| Ok(Value::Null)))
            .unwrap();

        assert_eq!(instance.invoke("lookup", &[json!("k")]).unwrap(), Value::Null);
    }

    #[test]
    fn test_instances_have_distinct_ids() {
        let a = greeter(Arc::new(Mutex::new(Vec::new())));
        let b = greeter(Arc::new(Mutex::new(Vec::new())));
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().get_version_num(), 7);
    }

    #[test]
    fn test_instance_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Instance>();
        assert_send_sync::<TypeArtifact>();
    }
}
