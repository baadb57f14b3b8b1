//! Realization directly from a [`ContractBuilder`].

use crate::artifact::TypeArtifact;
use crate::handler::CallHandler;
use crate::instance::Instance;
use crate::realizer::Realizer;
use portico_core::{ContractBuilder, PorticoResult};

/// Terminal realization calls on a builder.
///
/// Both methods seal the builder first, so any later mutation, `build()` or
/// realization fails with [`PorticoError::AlreadyRealized`], even when the
/// realization itself was rejected.
///
/// [`PorticoError::AlreadyRealized`]: portico_core::PorticoError::AlreadyRealized
///
/// # Example
///
/// ```
/// use portico_core::fixtures::greeter_contract;
/// use portico_runtime::{RealizeExt, Realizer};
///
/// let realizer = Realizer::new();
/// let mut builder = greeter_contract().unwrap();
/// let artifact = builder.to_type(&realizer).unwrap();
///
/// assert!(artifact.is_loaded());
/// assert!(builder.build().is_err());
/// ```
pub trait RealizeExt {
    /// Seals the builder and loads its blueprint as a new type.
    fn to_type(&mut self, realizer: &Realizer) -> PorticoResult<TypeArtifact>;

    /// Seals the builder, loads its blueprint and binds it to `handler`.
    fn to_instance<H: CallHandler>(
        &mut self,
        realizer: &Realizer,
        handler: H,
    ) -> PorticoResult<Instance>;
}

impl RealizeExt for ContractBuilder {
    fn to_type(&mut self, realizer: &Realizer) -> PorticoResult<TypeArtifact> {
        realizer.to_type(self.seal()?)
    }

    fn to_instance<H: CallHandler>(
        &mut self,
        realizer: &Realizer,
        handler: H,
    ) -> PorticoResult<Instance> {
        realizer.to_instance(self.seal()?, handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::FnHandler;
    use portico_core::fixtures::greeter_contract;
    use portico_core::{BuilderState, PorticoError, TypeToken};
    use serde_json::json;

    #[test]
    fn test_to_type_seals_builder() {
        let realizer = Realizer::new();
        let mut builder = greeter_contract().unwrap();
        builder.to_type(&realizer).unwrap();

        assert_eq!(builder.state(), BuilderState::Realized);
        let err = builder
            .add_field(TypeToken::String, "late", json!("x"))
            .unwrap_err();
        assert!(matches!(err, PorticoError::AlreadyRealized));
    }

    #[test]
    fn test_to_instance_seals_builder() {
        let realizer = Realizer::new();
        let mut builder = greeter_contract().unwrap();
        let instance = builder
            .to_instance(&realizer, FnHandler::new(|_, _| Ok(json!("hello"))))
            .unwrap();

        assert_eq!(instance.invoke("sayHello", &[json!("hi")]).unwrap(), json!("hello"));
        assert!(matches!(
            builder.to_type(&realizer).unwrap_err(),
            PorticoError::AlreadyRealized
        ));
    }

    #[test]
    fn test_rejected_realization_still_seals() {
        let realizer = Realizer::new();
        let mut builder = portico_core::ContractBuilder::new();
        builder
            .add_field(TypeToken::Integer, "count", json!("three"))
            .unwrap();

        assert!(builder.to_type(&realizer).is_err());
        assert_eq!(builder.state(), BuilderState::Realized);
    }
}
