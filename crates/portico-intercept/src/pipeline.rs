//! Ordered interception pipeline.
//!
//! A [`Pipeline`] is an immutable, ordered list of interceptors. The realizer
//! composes one pipeline per operation at realization time: global stages
//! first, then the operation's own stages, then the call handler.
//!
//! ```text
//! call -> global[0] -> ... -> global[n] -> op[0] -> ... -> op[m] -> handler
//! ```
//!
//! # Example
//!
//! ```
//! use portico_core::{Signature, TypeToken};
//! use portico_intercept::{Call, FnInterceptor, Pipeline};
//! use serde_json::json;
//!
//! let pipeline = Pipeline::builder()
//!     .stage(FnInterceptor::new("passthrough", |call: Call<'_>| call.proceed()))
//!     .build();
//!
//! let sig = Signature::new("echo", vec![TypeToken::String]);
//! let result = pipeline
//!     .execute(&sig, &[json!("hi")], |_, args| Ok(args[0].clone()))
//!     .unwrap();
//! assert_eq!(result, json!("hi"));
//! ```

use crate::interceptor::{Interceptor, Next};
use portico_core::{PorticoResult, Signature};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A type-erased interceptor that can be shared between pipelines.
pub type BoxedInterceptor = Arc<dyn Interceptor>;

/// An immutable, ordered list of interceptors.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<BoxedInterceptor>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Creates a pipeline with no stages.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Runs a call through every stage, then the handler.
    ///
    /// The handler runs at most once. Errors from any stage or from the
    /// handler propagate unchanged.
    pub fn execute<'a, H>(
        &'a self,
        signature: &'a Signature,
        arguments: &'a [Value],
        handler: H,
    ) -> PorticoResult<Value>
    where
        H: FnOnce(&'a Signature, &'a [Value]) -> PorticoResult<Value> + 'a,
    {
        self.build_chain(handler).run(signature, arguments)
    }

    fn build_chain<'a, H>(&'a self, handler: H) -> Next<'a>
    where
        H: FnOnce(&'a Signature, &'a [Value]) -> PorticoResult<Value> + 'a,
    {
        let mut next = Next::handler(handler);
        for interceptor in self.stages.iter().rev() {
            next = Next::new(interceptor.as_ref(), next);
        }
        next
    }

    /// Returns a new pipeline running this pipeline's stages, then `other`'s.
    #[must_use]
    pub fn then(&self, other: &Pipeline) -> Pipeline {
        let mut stages = self.stages.clone();
        stages.extend(other.stages.iter().cloned());
        Pipeline { stages }
    }

    /// Returns the names of all stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the pipeline has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builder for constructing a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<BoxedInterceptor>,
}

impl PipelineBuilder {
    /// Creates a new, empty pipeline builder.
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends a stage.
    #[must_use]
    pub fn stage<I: Interceptor>(mut self, interceptor: I) -> Self {
        self.stages.push(Arc::new(interceptor));
        self
    }

    /// Appends an already shared stage.
    #[must_use]
    pub fn shared_stage(mut self, interceptor: BoxedInterceptor) -> Self {
        self.stages.push(interceptor);
        self
    }

    /// Appends every stage of an existing pipeline.
    #[must_use]
    pub fn extend(mut self, pipeline: &Pipeline) -> Self {
        self.stages.extend(pipeline.stages.iter().cloned());
        self
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::{Call, FnInterceptor};
    use parking_lot::Mutex;
    use portico_core::{PorticoError, TypeToken};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn signature() -> Signature {
        Signature::new("add", vec![TypeToken::Integer, TypeToken::Integer])
    }

    fn add(_: &Signature, args: &[Value]) -> PorticoResult<Value> {
        let a = args[0].as_i64().unwrap_or_default();
        let b = args[1].as_i64().unwrap_or_default();
        Ok(json!(a + b))
    }

    fn tagging(name: &'static str, log: Arc<Mutex<Vec<&'static str>>>) -> BoxedInterceptor {
        Arc::new(FnInterceptor::new(name, move |call: Call<'_>| {
            log.lock().push(name);
            call.proceed()
        }))
    }

    #[test]
    fn test_empty_pipeline_calls_handler() {
        let pipeline = Pipeline::empty();
        let sig = signature();
        let result = pipeline.execute(&sig, &[json!(2), json!(3)], add).unwrap();
        assert_eq!(result, json!(5));
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_stage_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .shared_stage(tagging("a", Arc::clone(&log)))
            .shared_stage(tagging("b", Arc::clone(&log)))
            .shared_stage(tagging("c", Arc::clone(&log)))
            .build();

        let sig = signature();
        pipeline.execute(&sig, &[json!(1), json!(1)], add).unwrap();

        assert_eq!(*log.lock(), ["a", "b", "c"]);
        assert_eq!(pipeline.stage_names(), ["a", "b", "c"]);
    }

    #[test]
    fn test_then_runs_global_stages_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let global = Pipeline::builder()
            .shared_stage(tagging("global", Arc::clone(&log)))
            .build();
        let local = Pipeline::builder()
            .shared_stage(tagging("local", Arc::clone(&log)))
            .build();

        let composed = global.then(&local);
        let sig = signature();
        composed.execute(&sig, &[json!(1), json!(2)], add).unwrap();

        assert_eq!(*log.lock(), ["global", "local"]);
        assert_eq!(composed.stage_count(), 2);
        assert_eq!(global.stage_count(), 1);
    }

    #[test]
    fn test_handler_runs_exactly_once() {
        let calls = AtomicUsize::new(0);
        let pipeline = Pipeline::builder()
            .stage(FnInterceptor::new("one", |call: Call<'_>| call.proceed()))
            .stage(FnInterceptor::new("two", |call: Call<'_>| call.proceed()))
            .build();

        let sig = signature();
        pipeline
            .execute(&sig, &[json!(1), json!(2)], |_, _| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_errors_propagate_unchanged() {
        let pipeline = Pipeline::builder()
            .stage(FnInterceptor::new("observe", |call: Call<'_>| call.proceed()))
            .build();

        let sig = signature();
        let err = pipeline
            .execute(&sig, &[json!(1), json!(2)], |sig, _| {
                Err(PorticoError::invocation(sig.name(), "boom"))
            })
            .unwrap_err();

        assert!(matches!(
            err,
            PorticoError::Invocation { ref operation, ref message, .. }
                if operation == "add" && message == "boom"
        ));
    }

    #[test]
    fn test_shared_stage_and_extend() {
        let shared: BoxedInterceptor =
            Arc::new(FnInterceptor::new("shared", |call: Call<'_>| call.proceed()));
        let base = Pipeline::builder().shared_stage(Arc::clone(&shared)).build();
        let extended = Pipeline::builder()
            .extend(&base)
            .stage(FnInterceptor::new("extra", |call: Call<'_>| call.proceed()))
            .build();

        assert_eq!(extended.stage_names(), ["shared", "extra"]);
        assert_eq!(format!("{extended:?}"), "Pipeline { stages: [\"shared\", \"extra\"] }");
    }
}
