//! Factory: object-naming
//!
//! Reads `DomainObject(logicalTypeName, named)` on the class. Without an
//! explicit logical type name the fully qualified class name is used.

use crate::error::FacetFactoryError;
use crate::facet::{Facet, FacetKind, Precedence};
use crate::factory::{ClassContext, FacetFactory, FactoryMeta};
use crate::feature::FeatureTypes;

use super::str_attr;

/// Logical type name and explicit class name
pub struct ObjectNaming;

static META: FactoryMeta = FactoryMeta {
    name: "object-naming",
    description: "Logical type name and display name of a class",
    feature_types: FeatureTypes::CLASS,
};

impl FacetFactory for ObjectNaming {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) -> Result<(), FacetFactoryError> {
        let marker = ctx.class.find_marker("DomainObject");

        let logical = match marker {
            Some(m) => str_attr(m, "logicalTypeName")?,
            None => None,
        };
        let facet = match logical {
            Some(name) => Facet::new(FacetKind::LogicalType { name: name.to_string() }, Precedence::Explicit),
            None => Facet::new(
                FacetKind::LogicalType {
                    name: ctx.class.name.to_string(),
                },
                Precedence::Inferred,
            ),
        };
        ctx.add_facet(facet);

        if let Some(named) = marker.map(|m| str_attr(m, "named")).transpose()?.flatten() {
            ctx.add_facet(Facet::new(FacetKind::Named { name: named.to_string() }, Precedence::Explicit));
        }
        Ok(())
    }
}
