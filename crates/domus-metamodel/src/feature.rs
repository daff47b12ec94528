//! Feature kinds and identifiers
//!
//! Every facet holder is one feature of the metamodel: a class, one of its
//! properties, collections or actions, or an action parameter.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::class::ClassName;
use crate::error::MetaModelError;

/// Kind of feature a facet holder represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureType {
    /// Class-level specification
    Class,
    /// Scalar property
    Property,
    /// Collection
    Collection,
    /// Action
    Action,
    /// Action parameter
    Parameter,
}

impl FeatureType {
    /// All feature types
    pub const ALL: [FeatureType; 5] = [
        FeatureType::Class,
        FeatureType::Property,
        FeatureType::Collection,
        FeatureType::Action,
        FeatureType::Parameter,
    ];

    /// Stable name
    pub fn name(&self) -> &'static str {
        match self {
            FeatureType::Class => "class",
            FeatureType::Property => "property",
            FeatureType::Collection => "collection",
            FeatureType::Action => "action",
            FeatureType::Parameter => "parameter",
        }
    }

    /// Whether this is a property or collection
    pub fn is_association(&self) -> bool {
        matches!(self, FeatureType::Property | FeatureType::Collection)
    }

    fn flag(&self) -> u8 {
        match self {
            FeatureType::Class => 0x01,
            FeatureType::Property => 0x02,
            FeatureType::Collection => 0x04,
            FeatureType::Action => 0x08,
            FeatureType::Parameter => 0x10,
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureType {
    type Err = MetaModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureType::ALL
            .iter()
            .copied()
            .find(|ft| ft.name() == s)
            .ok_or_else(|| MetaModelError::UnmatchedVariant {
                what: "feature type",
                value: s.to_string(),
            })
    }
}

/// Set of feature types a facet factory applies to (bitflags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureTypes(u8);

impl FeatureTypes {
    /// Nothing
    pub const NONE: Self = Self(0x00);
    /// Classes only
    pub const CLASS: Self = Self(0x01);
    /// Properties only
    pub const PROPERTY: Self = Self(0x02);
    /// Collections only
    pub const COLLECTION: Self = Self(0x04);
    /// Actions only
    pub const ACTION: Self = Self(0x08);
    /// Parameters only
    pub const PARAMETER: Self = Self(0x10);

    /// PROPERTY | COLLECTION
    pub const ASSOCIATIONS: Self = Self(0x06);
    /// PROPERTY | COLLECTION | ACTION
    pub const MEMBERS: Self = Self(0x0E);
    /// PROPERTY | PARAMETER
    pub const PROPERTIES_AND_PARAMETERS: Self = Self(0x12);
    /// Members and parameters
    pub const MEMBERS_AND_PARAMETERS: Self = Self(0x1E);
    /// Everything
    pub const ALL: Self = Self(0x1F);

    /// Whether the set contains a feature type
    pub const fn contains_bits(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Whether the set contains `feature`
    pub fn contains(&self, feature: FeatureType) -> bool {
        self.0 & feature.flag() != 0
    }

    /// Union of two sets
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// The feature types in this set
    pub fn iter(self) -> impl Iterator<Item = FeatureType> {
        FeatureType::ALL.into_iter().filter(move |ft| self.contains(*ft))
    }
}

/// Identifies one feature: a class, a member of a class, or an action parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FeatureIdentifier {
    /// Owning class
    pub class: ClassName,
    /// Member id, for members and parameters
    pub member: Option<String>,
    /// Parameter index, for parameters
    pub param: Option<usize>,
}

impl FeatureIdentifier {
    /// Identifier of a class
    pub fn class(class: ClassName) -> Self {
        Self {
            class,
            member: None,
            param: None,
        }
    }

    /// Identifier of a member
    pub fn member(class: ClassName, member: impl Into<String>) -> Self {
        Self {
            class,
            member: Some(member.into()),
            param: None,
        }
    }

    /// Identifier of a parameter of an action
    pub fn parameter(class: ClassName, action: impl Into<String>, index: usize) -> Self {
        Self {
            class,
            member: Some(action.into()),
            param: Some(index),
        }
    }

    /// The member id, or the simple class name for classes
    pub fn name(&self) -> &str {
        self.member.as_deref().unwrap_or_else(|| self.class.simple_name())
    }
}

impl fmt::Display for FeatureIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class)?;
        if let Some(member) = &self.member {
            write!(f, "#{}", member)?;
        }
        if let Some(param) = self.param {
            write!(f, "({})", param)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_types_contains() {
        assert!(FeatureTypes::MEMBERS.contains(FeatureType::Property));
        assert!(FeatureTypes::MEMBERS.contains(FeatureType::Action));
        assert!(!FeatureTypes::MEMBERS.contains(FeatureType::Class));
        assert!(!FeatureTypes::MEMBERS.contains(FeatureType::Parameter));
        assert!(FeatureTypes::ALL.contains_bits(FeatureTypes::MEMBERS_AND_PARAMETERS));
        assert!(!FeatureTypes::NONE.contains(FeatureType::Class));
    }

    #[test]
    fn test_feature_types_union_and_iter() {
        let set = FeatureTypes::CLASS.union(FeatureTypes::PARAMETER);
        let types: Vec<_> = set.iter().collect();
        assert_eq!(types, vec![FeatureType::Class, FeatureType::Parameter]);
    }

    #[test]
    fn test_feature_type_from_str() {
        assert_eq!("action".parse::<FeatureType>().unwrap(), FeatureType::Action);
        let err = "method".parse::<FeatureType>().unwrap_err();
        assert!(matches!(err, MetaModelError::UnmatchedVariant { .. }));
    }

    #[test]
    fn test_identifier_display() {
        let class = ClassName::new("crm.Customer");
        assert_eq!(FeatureIdentifier::class(class.clone()).to_string(), "crm.Customer");
        assert_eq!(
            FeatureIdentifier::member(class.clone(), "name").to_string(),
            "crm.Customer#name"
        );
        assert_eq!(
            FeatureIdentifier::parameter(class.clone(), "placeOrder", 1).to_string(),
            "crm.Customer#placeOrder(1)"
        );
        assert_eq!(FeatureIdentifier::class(class).name(), "Customer");
    }
}
