//! # Portico Runtime
//!
//! Realization of contract blueprints into loadable types and bound
//! instances.
//!
//! - [`Realizer`] - Draws names, checks blueprints, composes pipelines
//! - [`TypeRegistry`] - Backing type system of loaded qualified names
//! - [`TypeArtifact`] - A loaded synthesized type
//! - [`Instance`] - A type bound to a [`CallHandler`]
//! - [`RealizeExt`] - `to_type` / `to_instance` on the builder
//!
//! ## Example
//!
//! ```
//! use portico_core::fixtures::greeter_contract;
//! use portico_core::Introspect;
//! use portico_runtime::{FnHandler, RealizeExt, Realizer};
//! use serde_json::json;
//!
//! let realizer = Realizer::new();
//! let instance = greeter_contract()
//!     .unwrap()
//!     .to_instance(&realizer, FnHandler::new(|op, _| Ok(json!(op))))
//!     .unwrap();
//!
//! assert_eq!(instance.invoke("sayHello", &[json!("hi")]).unwrap(), json!("sayHello"));
//! assert_eq!(instance.type_metadata()[0].get_str("name"), Some("Greeter"));
//! ```

#![doc(html_root_url = "https://docs.rs/portico-runtime/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod artifact;
pub mod ext;
pub mod handler;
pub mod instance;
pub mod realizer;
pub mod registry;

pub use artifact::TypeArtifact;
pub use ext::RealizeExt;
pub use handler::{CallHandler, FnHandler, SharedHandler};
pub use instance::Instance;
pub use realizer::{Realizer, RealizerBuilder};
pub use registry::TypeRegistry;
