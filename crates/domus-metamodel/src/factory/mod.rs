//! Facet factories
//!
//! A facet factory is a stateless rule that inspects a class, member or
//! parameter and contributes facets to its holder. Factories may also consume
//! methods (e.g. `hideName()` becomes a visibility facet and is no longer a
//! candidate action), which later factories and member discovery observe.
//!
//! # Architecture
//!
//! - Each factory implements [`FacetFactory`] and declares, in its
//!   [`FactoryMeta`], the feature types it applies to.
//! - The [`ProgrammingModel`] orders factories into [`ProcessingPhase`]s; each
//!   phase has `before`, main and `after` slots so extension modules can layer
//!   their factories relative to the built-in ones.
//! - The introspector (`spec::introspector`) walks a class and dispatches each
//!   feature to every applicable factory, in programming-model order.
//!
//! # Example
//!
//! ```ignore
//! struct HideOrderable;
//!
//! static META: FactoryMeta = FactoryMeta {
//!     name: "hide-orderable",
//!     description: "Hide classes marked Orderable",
//!     feature_types: FeatureTypes::CLASS,
//! };
//!
//! impl FacetFactory for HideOrderable {
//!     fn meta(&self) -> &FactoryMeta { &META }
//!
//!     fn process_class(&self, ctx: &mut ClassContext<'_>) -> Result<(), FacetFactoryError> {
//!         if ctx.class.find_marker("Orderable").is_some() {
//!             ctx.add_facet(Facet::new(
//!                 FacetKind::Visibility { hidden: true },
//!                 Precedence::Default,
//!             ));
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut model = ProgrammingModel::new();
//! model.add(ProcessingPhase::MemberModelling, Arc::new(HideOrderable));
//! ```

mod context;
pub mod factories;
mod programming_model;
mod remover;

pub use context::{ClassContext, MemberContext, ParameterContext};
pub use programming_model::{
    InsertionPoint, ProcessingPhase, ProgrammingModel, ProgrammingModelExtension,
};
pub use remover::{is_supporting_method, MethodRemover, SUPPORTING_PREFIXES};

use crate::error::FacetFactoryError;
use crate::feature::FeatureTypes;

/// Static metadata for a facet factory
pub struct FactoryMeta {
    /// Factory name, e.g. "supporting-methods"
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Feature types the factory is invoked for
    pub feature_types: FeatureTypes,
}

/// Trait that every facet factory implements
///
/// Default implementations contribute nothing, so a factory only overrides
/// the methods for the features it declares. Factories are shared across
/// threads and classes and must not keep state between invocations.
pub trait FacetFactory: Send + Sync {
    /// Static metadata for this factory
    fn meta(&self) -> &FactoryMeta;

    /// Process a class
    fn process_class(&self, _ctx: &mut ClassContext<'_>) -> Result<(), FacetFactoryError> {
        Ok(())
    }

    /// Process a property, collection or action
    fn process_member(&self, _ctx: &mut MemberContext<'_>) -> Result<(), FacetFactoryError> {
        Ok(())
    }

    /// Process an action parameter
    fn process_parameter(&self, _ctx: &mut ParameterContext<'_>) -> Result<(), FacetFactoryError> {
        Ok(())
    }
}
