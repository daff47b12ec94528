//! Built-in facet factories and the helpers they share

pub mod accessor;
pub mod digits;
pub mod enum_choices;
pub mod fallback;
pub mod immutable_members;
pub mod invocation;
pub mod layout;
pub mod member_annotations;
pub mod object_naming;
pub mod programmatic;
pub mod supporting_methods;
pub mod title;
pub mod value_semantics;

use std::str::FromStr;
use std::sync::Arc;

use super::{ProcessingPhase, ProgrammingModel};
use crate::class::{Marker, MarkerValue};
use crate::error::FacetFactoryError;
use crate::feature::FeatureType;

/// Register every built-in factory in its phase
pub fn install_defaults(model: &mut ProgrammingModel) {
    use ProcessingPhase::*;

    model
        .add(FallbackDefaults, Arc::new(fallback::Fallback))
        .add(ObjectNaming, Arc::new(object_naming::ObjectNaming))
        // Methods consumed at class level must be gone before members are discovered.
        .add(MethodRemoving, Arc::new(programmatic::Programmatic))
        .add(MethodRemoving, Arc::new(title::Title))
        .add(MethodRemoving, Arc::new(accessor::Accessor))
        .add(MethodRemoving, Arc::new(supporting_methods::SupportingMethods))
        .add(MethodRemoving, Arc::new(invocation::Invocation))
        .add(MemberModelling, Arc::new(member_annotations::MemberAnnotations))
        .add(MemberModelling, Arc::new(digits::Digits))
        .add(ValueTypes, Arc::new(enum_choices::EnumChoices))
        .add(ValueTypes, Arc::new(value_semantics::ValueSemantics))
        .add(Layout, Arc::new(layout::Layout))
        .add(Finally, Arc::new(immutable_members::ImmutableMembers));
}

/// Upper-case the first letter: `name` → `Name`
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first letter: `Name` → `name`
pub fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Human-readable name from an identifier: `firstName` → `First Name`
pub fn natural_name(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 4);
    let mut prev_lower = false;
    for c in id.chars() {
        if c == '_' {
            out.push(' ');
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        out.push(c);
    }
    capitalize(out.trim())
}

/// String attribute of a marker
pub(crate) fn str_attr<'m>(marker: &'m Marker, attribute: &str) -> Result<Option<&'m str>, FacetFactoryError> {
    match marker.get(attribute) {
        None => Ok(None),
        Some(MarkerValue::Str(s)) => Ok(Some(s)),
        Some(other) => Err(invalid(marker, attribute, format!("expected a string, got {}", other))),
    }
}

/// Boolean attribute of a marker
pub(crate) fn bool_attr(marker: &Marker, attribute: &str) -> Result<Option<bool>, FacetFactoryError> {
    match marker.get(attribute) {
        None => Ok(None),
        Some(MarkerValue::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(invalid(marker, attribute, format!("expected a boolean, got {}", other))),
    }
}

/// Non-negative integer attribute of a marker
pub(crate) fn uint_attr(marker: &Marker, attribute: &str) -> Result<Option<u32>, FacetFactoryError> {
    match marker.get(attribute) {
        None => Ok(None),
        Some(MarkerValue::Int(i)) => u32::try_from(*i)
            .map(Some)
            .map_err(|_| invalid(marker, attribute, format!("{} is out of range", i))),
        Some(other) => Err(invalid(marker, attribute, format!("expected an integer, got {}", other))),
    }
}

/// Enumeration attribute of a marker; unknown constants fail loudly
pub(crate) fn enum_attr<T: FromStr>(marker: &Marker, attribute: &str) -> Result<Option<T>, FacetFactoryError> {
    let Some(value) = str_attr(marker, attribute)? else {
        return Ok(None);
    };
    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| FacetFactoryError::UnrecognizedValue {
            marker: marker.name.clone(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
}

/// A member context carried a feature type that is not a member
pub(crate) fn not_a_member(feature_type: FeatureType) -> FacetFactoryError {
    FacetFactoryError::Failed(format!("'{}' is not a member feature type", feature_type))
}

pub(crate) fn invalid(marker: &Marker, attribute: &str, message: String) -> FacetFactoryError {
    FacetFactoryError::InvalidAttribute {
        marker: marker.name.clone(),
        attribute: attribute.to_string(),
        message,
    }
}

/// Three-state switch used by `editing` and `optionality` attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Toggle {
    On,
    Off,
    AsConfigured,
}

/// `editing = ENABLED | DISABLED | AS_CONFIGURED`
pub(crate) struct Editing(pub Toggle);

impl FromStr for Editing {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENABLED" => Ok(Editing(Toggle::On)),
            "DISABLED" => Ok(Editing(Toggle::Off)),
            "AS_CONFIGURED" => Ok(Editing(Toggle::AsConfigured)),
            _ => Err(()),
        }
    }
}

/// `optionality = MANDATORY | OPTIONAL | DEFAULT`
pub(crate) struct Optionality(pub Toggle);

impl FromStr for Optionality {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MANDATORY" => Ok(Optionality(Toggle::On)),
            "OPTIONAL" => Ok(Optionality(Toggle::Off)),
            "DEFAULT" => Ok(Optionality(Toggle::AsConfigured)),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::class::{ClassDescriptor, ClassName, ClassRegistry};
    use crate::error::MetaModelResult;
    use crate::factory::ProgrammingModel;
    use crate::spec::{ObjectSpecification, SpecificationLoader};

    /// Build `target` with the default programming model
    pub fn try_load(classes: Vec<ClassDescriptor>, target: &str) -> MetaModelResult<Arc<ObjectSpecification>> {
        let registry = ClassRegistry::new();
        for class in classes {
            registry.register(class);
        }
        let loader = SpecificationLoader::new(Arc::new(registry), ProgrammingModel::new());
        loader.load(&ClassName::new(target))
    }

    /// Build `target` with the default programming model, panicking on failure
    pub fn load(classes: Vec<ClassDescriptor>, target: &str) -> Arc<ObjectSpecification> {
        try_load(classes, target).unwrap()
    }
}
