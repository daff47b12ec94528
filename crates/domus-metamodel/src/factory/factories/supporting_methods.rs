//! Factory: supporting-methods
//!
//! Interprets the supporting methods that accompany a member or parameter
//! by naming convention:
//!
//! | member `name`         | parameter `n` of action `place` | facet             |
//! |-----------------------|---------------------------------|-------------------|
//! | `hideName()`          | `hide{n}Place()`                | hide-method       |
//! | `disableName()`       | `disable{n}Place()`             | disable-method    |
//! | `choicesName()`       | `choices{n}Place()`             | choices-provider  |
//! | `autoCompleteName()`  | `autoComplete{n}Place()`        | auto-complete     |
//! | `defaultName()`       | `default{n}Place()`             | default-value     |
//! | `validateName()`      | `validate{n}Place()`            | validate-method   |
//!
//! Matched methods are consumed. The hide and disable methods are kept
//! apart from the declarative visibility and mutability facets, so a
//! `Hidden` marker and a `hideName()` method coexist.

use crate::class::MethodDescriptor;
use crate::error::FacetFactoryError;
use crate::facet::{ChoicesSource, Facet, FacetKind, Precedence};
use crate::factory::{FacetFactory, FactoryMeta, MemberContext, ParameterContext};
use crate::feature::FeatureTypes;

/// Supporting methods: `hideX`, `disableX`, `choicesX` and the like
pub struct SupportingMethods;

static META: FactoryMeta = FactoryMeta {
    name: "supporting-methods",
    description: "hide/disable/choices/autoComplete/default/validate methods",
    feature_types: FeatureTypes::MEMBERS_AND_PARAMETERS,
};

/// Minimum search length of an auto-complete without a `MinLength` marker
const DEFAULT_MIN_LENGTH: u32 = 1;

/// Facets for the supporting methods of `suffix`, consuming each method `take` yields
fn supporting_facets(
    mut take: impl FnMut(&str) -> Option<MethodDescriptor>,
    suffix: &str,
) -> Vec<Facet> {
    let mut facets = Vec::new();
    let mut found = |prefix: &str| take(&format!("{}{}", prefix, suffix)).map(|m| m.name);

    if let Some(method) = found("hide") {
        facets.push(FacetKind::HideMethod { method });
    }
    if let Some(method) = found("disable") {
        facets.push(FacetKind::DisableMethod { method });
    }
    if let Some(method) = found("choices") {
        facets.push(FacetKind::ChoicesProvider(ChoicesSource::Method(method)));
    }
    if let Some(method) = found("autoComplete") {
        facets.push(FacetKind::AutoComplete {
            method,
            min_length: DEFAULT_MIN_LENGTH,
        });
    }
    if let Some(method) = found("default") {
        facets.push(FacetKind::DefaultValue { method });
    }
    if let Some(method) = found("validate") {
        facets.push(FacetKind::ValidateMethod { method });
    }

    facets
        .into_iter()
        .map(|kind| Facet::new(kind, Precedence::Explicit))
        .collect()
}

impl FacetFactory for SupportingMethods {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) -> Result<(), FacetFactoryError> {
        let suffix = ctx.capitalized_id();
        for facet in supporting_facets(|name| ctx.remove_method(name), &suffix) {
            ctx.add_facet(facet);
        }
        Ok(())
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) -> Result<(), FacetFactoryError> {
        let suffix = format!("{}{}", ctx.index, ctx.capitalized_action());
        for facet in supporting_facets(|name| ctx.remove_method(name), &suffix) {
            ctx.add_facet(facet);
        }
        Ok(())
    }
}
