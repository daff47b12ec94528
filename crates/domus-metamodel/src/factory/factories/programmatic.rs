//! Factory: programmatic
//!
//! Methods marked `Programmatic` belong to the code, not the metamodel.
//! They are consumed before member discovery so they never become members.

use crate::error::FacetFactoryError;
use crate::factory::{ClassContext, FacetFactory, FactoryMeta};
use crate::feature::FeatureTypes;

/// Removes methods marked `Programmatic`
pub struct Programmatic;

static META: FactoryMeta = FactoryMeta {
    name: "programmatic",
    description: "Exclude methods marked Programmatic",
    feature_types: FeatureTypes::CLASS,
};

impl FacetFactory for Programmatic {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) -> Result<(), FacetFactoryError> {
        let removed = ctx.remove_methods_where(|m| m.find_marker("Programmatic").is_some());
        if !removed.is_empty() {
            tracing::trace!(class = %ctx.class.name, count = removed.len(), "Excluded programmatic methods");
        }
        Ok(())
    }
}
