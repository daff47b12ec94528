//! Factory: layout
//!
//! `MemberOrder(sequence, name)` and `PropertyLayout(sequence, named)`.

use crate::class::{Marker, MarkerValue};
use crate::error::FacetFactoryError;
use crate::facet::{Facet, FacetKind, Precedence};
use crate::factory::{FacetFactory, FactoryMeta, MemberContext};
use crate::feature::{FeatureType, FeatureTypes};

use super::str_attr;

/// Member order and layout groups
pub struct Layout;

static META: FactoryMeta = FactoryMeta {
    name: "layout",
    description: "Member ordering and property layout hints",
    feature_types: FeatureTypes::MEMBERS,
};

/// `sequence` may be written as `"1.2"` or `3`
fn sequence(marker: &Marker) -> Result<Option<String>, FacetFactoryError> {
    match marker.get("sequence") {
        None => Ok(None),
        Some(MarkerValue::Str(s)) => Ok(Some(s.clone())),
        Some(MarkerValue::Int(i)) => Ok(Some(i.to_string())),
        Some(other) => Err(FacetFactoryError::InvalidAttribute {
            marker: marker.name.clone(),
            attribute: "sequence".to_string(),
            message: format!("expected a string or integer, got {}", other),
        }),
    }
}

impl FacetFactory for Layout {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) -> Result<(), FacetFactoryError> {
        let method = ctx.method;

        if let Some(marker) = method.find_marker("MemberOrder") {
            if let Some(sequence) = sequence(marker)? {
                let group = str_attr(marker, "name")?.map(str::to_string);
                ctx.add_facet(Facet::new(FacetKind::LayoutOrder { sequence, group }, Precedence::Explicit));
            }
        }

        if ctx.feature_type != FeatureType::Property {
            return Ok(());
        }
        if let Some(marker) = method.find_marker("PropertyLayout") {
            if let Some(sequence) = sequence(marker)? {
                ctx.add_facet(Facet::new(
                    FacetKind::LayoutOrder { sequence, group: None },
                    Precedence::Explicit,
                ));
            }
            if let Some(named) = str_attr(marker, "named")? {
                ctx.add_facet(Facet::new(FacetKind::Named { name: named.to_string() }, Precedence::Explicit));
            }
        }
        Ok(())
    }
}
