//! Factory: invocation
//!
//! Records which method an action invokes and what it returns.

use crate::error::FacetFactoryError;
use crate::facet::{Facet, FacetKind, Precedence};
use crate::factory::{FacetFactory, FactoryMeta, MemberContext};
use crate::feature::FeatureTypes;

/// Invocation facet for actions
pub struct Invocation;

static META: FactoryMeta = FactoryMeta {
    name: "invocation",
    description: "Method invoked by an action",
    feature_types: FeatureTypes::ACTION,
};

impl FacetFactory for Invocation {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) -> Result<(), FacetFactoryError> {
        let facet = Facet::new(
            FacetKind::ActionInvocation {
                method: ctx.method.name.clone(),
                returns: ctx.method.returns.to_string(),
            },
            Precedence::Default,
        );
        ctx.add_facet(facet);
        Ok(())
    }
}
