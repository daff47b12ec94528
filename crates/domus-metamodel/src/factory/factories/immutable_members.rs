//! Factory: immutable-members
//!
//! Associations of an immutable class are read-only, whatever their own
//! markers and supporting methods say.

use crate::error::FacetFactoryError;
use crate::facet::{Facet, FacetKind, FacetType, Precedence};
use crate::factory::{FacetFactory, FactoryMeta, MemberContext};
use crate::feature::FeatureTypes;

/// Read-only associations on immutable classes
pub struct ImmutableMembers;

static META: FactoryMeta = FactoryMeta {
    name: "immutable-members",
    description: "Associations of immutable classes are not editable",
    feature_types: FeatureTypes::ASSOCIATIONS,
};

impl FacetFactory for ImmutableMembers {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) -> Result<(), FacetFactoryError> {
        let Some(FacetKind::Immutable { reason }) = ctx.class_facets.kind(FacetType::Immutable) else {
            return Ok(());
        };
        let facet = Facet::new(
            FacetKind::Mutability {
                editable: false,
                reason: reason.clone(),
            },
            Precedence::High,
        );
        ctx.add_facet(facet);
        Ok(())
    }
}
