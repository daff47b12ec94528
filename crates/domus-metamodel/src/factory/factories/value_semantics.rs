//! Factory: value-semantics
//!
//! Scalar value types and enums are immutable. `DomainObject(editing)`
//! makes an entity immutable explicitly.

use crate::class::ClassKind;
use crate::error::FacetFactoryError;
use crate::facet::{Facet, FacetKind, Precedence};
use crate::factory::{ClassContext, FacetFactory, FactoryMeta};
use crate::feature::FeatureTypes;

use super::{enum_attr, str_attr, Editing, Toggle};

/// Value and immutability facets on classes
pub struct ValueSemantics;

static META: FactoryMeta = FactoryMeta {
    name: "value-semantics",
    description: "Value types and object-level immutability",
    feature_types: FeatureTypes::CLASS,
};

fn immutable(reason: &str, precedence: Precedence) -> Facet {
    Facet::new(
        FacetKind::Immutable {
            reason: Some(reason.to_string()),
        },
        precedence,
    )
}

impl FacetFactory for ValueSemantics {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) -> Result<(), FacetFactoryError> {
        match ctx.class.kind {
            ClassKind::Value => {
                ctx.add_facet(Facet::new(FacetKind::ValueSemantics, Precedence::Default));
                ctx.add_facet(immutable("value type", Precedence::Inferred));
            }
            ClassKind::Enum { .. } => {
                ctx.add_facet(immutable("enum", Precedence::Inferred));
            }
            ClassKind::Class | ClassKind::Abstract | ClassKind::Interface => {}
        }

        if let Some(marker) = ctx.class.find_marker("DomainObject") {
            if let Some(Editing(Toggle::Off)) = enum_attr::<Editing>(marker, "editing")? {
                let reason = str_attr(marker, "editingDisabledReason")?.unwrap_or("immutable");
                ctx.add_facet(immutable(reason, Precedence::Explicit));
            }
        }
        Ok(())
    }
}
