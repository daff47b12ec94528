//! Factory: title
//!
//! `title()` and `iconName()` supply the title and icon of an instance.

use crate::error::FacetFactoryError;
use crate::facet::{Facet, FacetKind, Precedence};
use crate::factory::{ClassContext, FacetFactory, FactoryMeta};
use crate::feature::FeatureTypes;

/// `title()` and `iconName()`
pub struct Title;

static META: FactoryMeta = FactoryMeta {
    name: "title",
    description: "Title and icon supplier methods",
    feature_types: FeatureTypes::CLASS,
};

impl FacetFactory for Title {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) -> Result<(), FacetFactoryError> {
        if ctx.methods().find("title", Some(0)).is_some() {
            ctx.remove_method("title");
            ctx.add_facet(Facet::new(FacetKind::Title { method: "title".to_string() }, Precedence::Explicit));
        }
        if ctx.methods().find("iconName", Some(0)).is_some() {
            ctx.remove_method("iconName");
            ctx.add_facet(Facet::new(FacetKind::Icon { method: "iconName".to_string() }, Precedence::Explicit));
        }
        Ok(())
    }
}
