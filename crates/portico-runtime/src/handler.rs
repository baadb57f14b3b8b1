//! Call handler contract.
//!
//! A [`CallHandler`] executes the logic behind every operation of a bound
//! [`Instance`](crate::Instance). It receives the operation name and the
//! positional arguments after the interception pipeline has run.

use portico_core::PorticoResult;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Executes the operations of a synthesized contract.
///
/// # Example
///
/// ```
/// use portico_core::PorticoResult;
/// use portico_runtime::CallHandler;
/// use serde_json::{json, Value};
///
/// struct Greeter;
///
/// impl CallHandler for Greeter {
///     fn invoke(&self, operation: &str, arguments: &[Value]) -> PorticoResult<Value> {
///         Ok(json!(format!("{operation}: {}", arguments.len())))
///     }
/// }
/// ```
pub trait CallHandler: Send + Sync + 'static {
    /// Handles one call to `operation`.
    fn invoke(&self, operation: &str, arguments: &[Value]) -> PorticoResult<Value>;
}

/// A shared, type-erased call handler.
pub type SharedHandler = Arc<dyn CallHandler>;

impl<H: CallHandler + ?Sized> CallHandler for Arc<H> {
    fn invoke(&self, operation: &str, arguments: &[Value]) -> PorticoResult<Value> {
        (**self).invoke(operation, arguments)
    }
}

/// A function-based call handler.
///
/// # Example
///
/// ```
/// use portico_runtime::{CallHandler, FnHandler};
/// use serde_json::json;
///
/// let handler = FnHandler::new(|operation, _args| Ok(json!(operation)));
/// assert_eq!(handler.invoke("ping", &[]).unwrap(), json!("ping"));
/// ```
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&str, &[Value]) -> PorticoResult<Value> + Send + Sync + 'static,
{
    /// Creates a new function handler.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> CallHandler for FnHandler<F>
where
    F: Fn(&str, &[Value]) -> PorticoResult<Value> + Send + Sync + 'static,
{
    fn invoke(&self, operation: &str, arguments: &[Value]) -> PorticoResult<Value> {
        (self.func)(operation, arguments)
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}
