//! Factory: digits
//!
//! `Digits(integer, fraction)` bounds the rendered length of a decimal:
//! integer digits, fraction digits and the separator.

use crate::class::find_marker;
use crate::error::FacetFactoryError;
use crate::facet::{Facet, FacetKind, Precedence};
use crate::factory::{FacetFactory, FactoryMeta, MemberContext, ParameterContext};
use crate::feature::{FeatureType, FeatureTypes};

use super::{invalid, uint_attr};

/// Max length inferred from `Digits(integer, fraction)`
pub struct Digits;

static META: FactoryMeta = FactoryMeta {
    name: "digits",
    description: "Maximum length derived from Digits(integer, fraction)",
    feature_types: FeatureTypes::PROPERTIES_AND_PARAMETERS,
};

fn max_length(markers: &[crate::class::Marker]) -> Result<Option<Facet>, FacetFactoryError> {
    let Some(marker) = find_marker(markers, "Digits") else {
        return Ok(None);
    };
    let integer = uint_attr(marker, "integer")?.unwrap_or(0);
    let fraction = uint_attr(marker, "fraction")?.unwrap_or(0);
    let separator = u32::from(fraction > 0);
    let length = integer
        .checked_add(fraction)
        .and_then(|len| len.checked_add(separator))
        .ok_or_else(|| {
            invalid(
                marker,
                "fraction",
                format!("{} integer and {} fraction digits overflow the maximum length", integer, fraction),
            )
        })?;
    Ok(Some(Facet::new(FacetKind::MaxLength(length), Precedence::Inferred)))
}

impl FacetFactory for Digits {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) -> Result<(), FacetFactoryError> {
        if ctx.feature_type != FeatureType::Property {
            return Ok(());
        }
        if let Some(facet) = max_length(&ctx.method.markers)? {
            ctx.add_facet(facet);
        }
        Ok(())
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) -> Result<(), FacetFactoryError> {
        if let Some(facet) = max_length(&ctx.param.markers)? {
            ctx.add_facet(facet);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::class::{ClassDescriptor, Marker, MethodDescriptor, TypeRef};
    use crate::error::{FacetFactoryError, MetaModelError};
    use crate::facet::{FacetType, Precedence};
    use crate::factory::factories::test_support::{load, try_load};

    #[test]
    fn test_digits_length() {
        let class = ClassDescriptor::new("Invoice").method(
            MethodDescriptor::new("getAmount")
                .returns(TypeRef::class("decimal"))
                .marker(Marker::new("Digits").with("integer", 10).with("fraction", 2)),
        );
        let spec = load(vec![class], "Invoice");
        let amount = spec.member("amount").unwrap();
        let facet = amount.facets().get(FacetType::MaxLength).unwrap();
        assert_eq!(amount.facets().max_length(), Some(13));
        assert_eq!(facet.precedence(), Precedence::Inferred);
    }

    #[test]
    fn test_explicit_length_wins() {
        let class = ClassDescriptor::new("Invoice").method(
            MethodDescriptor::new("getAmount")
                .returns(TypeRef::class("decimal"))
                .marker(Marker::new("Digits").with("integer", 10).with("fraction", 2))
                .marker(Marker::new("Property").with("maxLength", 8)),
        );
        let spec = load(vec![class], "Invoice");
        let amount = spec.member("amount").unwrap();
        assert_eq!(amount.facets().max_length(), Some(8));
        assert_eq!(amount.facets().rejected().len(), 1);
    }

    #[test]
    fn test_overflowing_digits_fail() {
        let class = ClassDescriptor::new("Invoice").method(
            MethodDescriptor::new("getAmount")
                .returns(TypeRef::class("decimal"))
                .marker(Marker::new("Digits").with("integer", u32::MAX as i64).with("fraction", 2)),
        );
        match try_load(vec![class], "Invoice") {
            Err(MetaModelError::PipelineFailure { factory, source, .. }) => {
                assert_eq!(factory, "digits");
                assert!(matches!(
                    source,
                    FacetFactoryError::InvalidAttribute { ref attribute, .. } if attribute == "fraction"
                ));
            }
            other => panic!("expected a pipeline failure, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_integer_digits_only() {
        let class = ClassDescriptor::new("Invoice").method(
            MethodDescriptor::new("getCount")
                .returns(TypeRef::class("int"))
                .marker(Marker::new("Digits").with("integer", u32::MAX as i64)),
        );
        let spec = load(vec![class], "Invoice");
        assert_eq!(spec.member("count").unwrap().facets().max_length(), Some(u32::MAX));
    }
}
