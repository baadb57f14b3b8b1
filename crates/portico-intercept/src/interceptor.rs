//! Core interceptor trait and types.
//!
//! This module defines the [`Interceptor`] trait that every pipeline stage
//! implements. An interceptor receives a [`Call`], may inspect it, and either
//! calls [`Call::proceed`] to continue towards the handler or returns its own
//! result.
//!
//! # Example
//!
//! ```
//! use portico_core::PorticoResult;
//! use portico_intercept::{Call, Interceptor};
//! use serde_json::Value;
//!
//! struct Audit;
//!
//! impl Interceptor for Audit {
//!     fn name(&self) -> &'static str {
//!         "audit"
//!     }
//!
//!     fn intercept(&self, call: Call<'_>) -> PorticoResult<Value> {
//!         let operation = call.operation().to_string();
//!         let result = call.proceed();
//!         println!("{operation} -> {}", result.is_ok());
//!         result
//!     }
//! }
//! ```

use portico_core::{PorticoResult, Signature};
use serde_json::Value;

/// The core interceptor trait.
///
/// # Invariants
///
/// - Interceptors call [`Call::proceed`] at most once; the continuation is
///   consumed on use
/// - Errors returned by `proceed` are passed through unchanged
pub trait Interceptor: Send + Sync + 'static {
    /// Returns the name of this stage, used in logs and stage listings.
    fn name(&self) -> &'static str;

    /// Intercepts one operation call.
    fn intercept(&self, call: Call<'_>) -> PorticoResult<Value>;
}

/// One in-flight operation call, seen from an interceptor.
pub struct Call<'a> {
    signature: &'a Signature,
    arguments: &'a [Value],
    next: Next<'a>,
}

impl<'a> Call<'a> {
    pub(crate) fn new(signature: &'a Signature, arguments: &'a [Value], next: Next<'a>) -> Self {
        Self {
            signature,
            arguments,
            next,
        }
    }

    /// Returns the operation name.
    #[must_use]
    pub fn operation(&self) -> &'a str {
        self.signature.name()
    }

    /// Returns the resolved signature.
    #[must_use]
    pub fn signature(&self) -> &'a Signature {
        self.signature
    }

    /// Returns the call arguments.
    #[must_use]
    pub fn arguments(&self) -> &'a [Value] {
        self.arguments
    }

    /// Continues to the next stage, or to the handler after the last one.
    pub fn proceed(self) -> PorticoResult<Value> {
        self.next.run(self.signature, self.arguments)
    }
}

/// Continuation to the next stage in the chain.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

/// Terminal step of a chain.
pub type Terminal<'a> = Box<dyn FnOnce(&'a Signature, &'a [Value]) -> PorticoResult<Value> + 'a>;

enum NextInner<'a> {
    /// More interceptors to run
    Chain {
        interceptor: &'a dyn Interceptor,
        next: Box<Next<'a>>,
    },
    /// End of chain
    Handler(Terminal<'a>),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that runs the given interceptor.
    pub(crate) fn new(interceptor: &'a dyn Interceptor, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                interceptor,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal `Next` that invokes the handler.
    pub(crate) fn handler<F>(f: F) -> Self
    where
        F: FnOnce(&'a Signature, &'a [Value]) -> PorticoResult<Value> + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    pub(crate) fn run(self, signature: &'a Signature, arguments: &'a [Value]) -> PorticoResult<Value> {
        match self.inner {
            NextInner::Chain { interceptor, next } => {
                interceptor.intercept(Call::new(signature, arguments, *next))
            }
            NextInner::Handler(handler) => handler(signature, arguments),
        }
    }
}

/// An interceptor created from a closure.
///
/// # Example
///
/// ```
/// use portico_intercept::{Call, FnInterceptor};
///
/// let stage = FnInterceptor::new("passthrough", |call: Call<'_>| call.proceed());
/// ```
pub struct FnInterceptor<F> {
    name: &'static str,
    func: F,
}

impl<F> FnInterceptor<F>
where
    F: for<'c> Fn(Call<'c>) -> PorticoResult<Value> + Send + Sync + 'static,
{
    /// Creates a new closure-based interceptor.
    pub fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Interceptor for FnInterceptor<F>
where
    F: for<'c> Fn(Call<'c>) -> PorticoResult<Value> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn intercept(&self, call: Call<'_>) -> PorticoResult<Value> {
        (self.func)(call)
    }
}
