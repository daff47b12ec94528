//! Persistence extension
//!
//! Layers persistence facets on top of the generic ones through the
//! programming-model extension SPI:
//!
//! - `Entity(table)` on a class → entity identity, with the id property
//!   taken from the accessor marked `Id`
//! - `Column(length, allowsNull)` on a property accessor → max length and
//!   optionality
//!
//! Both factories are inserted after the member-modelling phase, so an
//! explicit `Property(...)` marker contributed earlier is not trampled.

use std::sync::Arc;

use crate::error::FacetFactoryError;
use crate::facet::{Facet, FacetKind, Precedence};
use crate::factory::factories::{bool_attr, str_attr, uint_attr};
use crate::factory::{
    ClassContext, FacetFactory, FactoryMeta, InsertionPoint, MemberContext, ProcessingPhase,
    ProgrammingModel, ProgrammingModelExtension,
};
use crate::feature::{FeatureType, FeatureTypes};
use crate::spec::accessor_id;

/// Programming-model extension contributing persistence facets
pub struct PersistenceExtension;

impl ProgrammingModelExtension for PersistenceExtension {
    fn name(&self) -> &'static str {
        "persistence"
    }

    fn contribute(&self, model: &mut ProgrammingModel) {
        let point = InsertionPoint::After(ProcessingPhase::MemberModelling);
        model
            .insert(point, Arc::new(EntityIdentityFactory))
            .insert(point, Arc::new(ColumnFactory));
    }
}

/// `Entity(table)` → entity identity
pub struct EntityIdentityFactory;

static ENTITY_META: FactoryMeta = FactoryMeta {
    name: "persistence-entity",
    description: "Entity identity from Entity(table) and the Id accessor",
    feature_types: FeatureTypes::CLASS,
};

impl FacetFactory for EntityIdentityFactory {
    fn meta(&self) -> &FactoryMeta {
        &ENTITY_META
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) -> Result<(), FacetFactoryError> {
        let Some(marker) = ctx.class.find_marker("Entity") else {
            return Ok(());
        };
        let table = str_attr(marker, "table")?.map(str::to_string);
        let id_property = ctx
            .class
            .methods
            .iter()
            .find(|m| m.find_marker("Id").is_some())
            .and_then(accessor_id);

        ctx.add_facet(Facet::new(
            FacetKind::EntityIdentity { table, id_property },
            Precedence::Explicit,
        ));
        Ok(())
    }
}

/// `Column(length, allowsNull)` → max length and optionality
pub struct ColumnFactory;

static COLUMN_META: FactoryMeta = FactoryMeta {
    name: "persistence-column",
    description: "Max length and optionality from Column(length, allowsNull)",
    feature_types: FeatureTypes::PROPERTY,
};

impl FacetFactory for ColumnFactory {
    fn meta(&self) -> &FactoryMeta {
        &COLUMN_META
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) -> Result<(), FacetFactoryError> {
        if ctx.feature_type != FeatureType::Property {
            return Ok(());
        }
        let Some(marker) = ctx.method.find_marker("Column") else {
            return Ok(());
        };
        if let Some(length) = uint_attr(marker, "length")? {
            ctx.add_facet(Facet::new(FacetKind::MaxLength(length), Precedence::Explicit));
        }
        if let Some(allows_null) = bool_attr(marker, "allowsNull")? {
            ctx.add_facet(Facet::new(
                FacetKind::Mandatory {
                    required: !allows_null,
                },
                Precedence::Explicit,
            ));
        }
        Ok(())
    }
}
