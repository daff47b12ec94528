//! Factory: accessor
//!
//! Associates a property with its getter and, if present, its `setX`
//! setter. `clearX` and `modifyX` are consumed too. A property without a
//! setter is derived and therefore read-only.

use crate::error::FacetFactoryError;
use crate::facet::{Facet, FacetKind, Precedence};
use crate::factory::{FacetFactory, FactoryMeta, MemberContext};
use crate::feature::{FeatureType, FeatureTypes};

/// Accessor and setter facets for associations
pub struct Accessor;

static META: FactoryMeta = FactoryMeta {
    name: "accessor",
    description: "Getter, setter and mutability of associations",
    feature_types: FeatureTypes::ASSOCIATIONS,
};

impl FacetFactory for Accessor {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) -> Result<(), FacetFactoryError> {
        ctx.add_facet(Facet::new(
            FacetKind::Accessor {
                method: ctx.method.name.clone(),
            },
            Precedence::Default,
        ));

        let cap = ctx.capitalized_id();
        for prefix in ["clear", "modify"] {
            ctx.remove_method(&format!("{}{}", prefix, cap));
        }

        if ctx.feature_type != FeatureType::Property {
            return Ok(());
        }

        let setter = format!("set{}", cap);
        if ctx.methods().find(&setter, Some(1)).is_some() {
            ctx.remove_method(&setter);
            ctx.add_facet(Facet::new(FacetKind::Setter { method: setter }, Precedence::Default));
        } else {
            ctx.add_facet(Facet::new(
                FacetKind::Mutability {
                    editable: false,
                    reason: Some("derived".to_string()),
                },
                Precedence::Inferred,
            ));
        }
        Ok(())
    }
}
