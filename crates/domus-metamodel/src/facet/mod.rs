//! Facets
//!
//! A facet is one immutable, typed unit of behavior attached to a feature:
//! "hidden", "max length 30", "choices come from `choicesCountry()`" and so on.
//! [`FacetType`] is the closed set of behavior kinds; [`FacetKind`] carries the
//! payload for each kind. A [`Facet`] pairs a payload with the
//! [`Precedence`] it was contributed at.
//!
//! Every facet can list its own attributes ([`Facet::attributes`]) as
//! name/value pairs, which is what diagnostics and metamodel export iterate.

mod holder;

pub use holder::{AddOutcome, FacetHolder, RejectedFacet, RejectionReason};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::feature::FeatureIdentifier;

/// Rank of a facet contribution
///
/// When two facets of one type compete for a holder, the higher rank wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precedence {
    /// Derived from naming conventions or other facets
    Inferred,
    /// Framework default
    Default,
    /// Declared by the user (markers, supporting methods)
    Explicit,
    /// Override that beats anything declared
    High,
}

impl Precedence {
    /// Stable name
    pub fn name(&self) -> &'static str {
        match self {
            Precedence::Inferred => "inferred",
            Precedence::Default => "default",
            Precedence::Explicit => "explicit",
            Precedence::High => "high",
        }
    }
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed set of facet types; a holder keeps at most one facet per type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacetType {
    /// Hidden or visible
    Visibility,
    /// Editable or read-only
    Mutability,
    /// Source of a choices list
    ChoicesProvider,
    /// Auto-complete lookup
    AutoComplete,
    /// Default value supplier
    DefaultValue,
    /// Imperative validation method
    ValidateMethod,
    /// Imperative visibility method
    HideMethod,
    /// Imperative usability method
    DisableMethod,
    /// Regular expression validation
    Regex,
    /// Maximum length
    MaxLength,
    /// Required or optional
    Mandatory,
    /// Display name
    Named,
    /// Description
    Description,
    /// Title supplier
    Title,
    /// Icon name supplier
    Icon,
    /// Logical type name used in bookmarks
    LogicalType,
    /// Persistence identity
    EntityIdentity,
    /// Instances cannot be modified
    Immutable,
    /// Class is a scalar value type
    ValueSemantics,
    /// Action side-effect semantics
    ActionSemantics,
    /// Position in the layout
    LayoutOrder,
    /// Getter of an association
    Accessor,
    /// Setter of a property
    Setter,
    /// Method an action invokes
    ActionInvocation,
}

impl FacetType {
    /// Stable name
    pub fn name(&self) -> &'static str {
        match self {
            FacetType::Visibility => "visibility",
            FacetType::Mutability => "mutability",
            FacetType::ChoicesProvider => "choices-provider",
            FacetType::AutoComplete => "auto-complete",
            FacetType::DefaultValue => "default-value",
            FacetType::ValidateMethod => "validate-method",
            FacetType::HideMethod => "hide-method",
            FacetType::DisableMethod => "disable-method",
            FacetType::Regex => "regex",
            FacetType::MaxLength => "max-length",
            FacetType::Mandatory => "mandatory",
            FacetType::Named => "named",
            FacetType::Description => "description",
            FacetType::Title => "title",
            FacetType::Icon => "icon",
            FacetType::LogicalType => "logical-type",
            FacetType::EntityIdentity => "entity-identity",
            FacetType::Immutable => "immutable",
            FacetType::ValueSemantics => "value-semantics",
            FacetType::ActionSemantics => "action-semantics",
            FacetType::LayoutOrder => "layout-order",
            FacetType::Accessor => "accessor",
            FacetType::Setter => "setter",
            FacetType::ActionInvocation => "action-invocation",
        }
    }
}

impl fmt::Display for FacetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a choices list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoicesSource {
    /// A supporting method on the domain class
    Method(String),
    /// The constants of an enum type
    EnumConstants(Vec<String>),
}

/// Side-effect semantics of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantics {
    /// No side effects
    Safe,
    /// Repeatable with the same outcome
    Idempotent,
    /// Each invocation may change state
    NonIdempotent,
}

impl Semantics {
    /// Stable name, as written in markers
    pub fn name(&self) -> &'static str {
        match self {
            Semantics::Safe => "SAFE",
            Semantics::Idempotent => "IDEMPOTENT",
            Semantics::NonIdempotent => "NON_IDEMPOTENT",
        }
    }
}

impl FromStr for Semantics {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SAFE" => Ok(Semantics::Safe),
            "IDEMPOTENT" => Ok(Semantics::Idempotent),
            "NON_IDEMPOTENT" => Ok(Semantics::NonIdempotent),
            other => Err(other.to_string()),
        }
    }
}

/// Payload of a facet, one variant per [`FacetType`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetKind {
    /// Visibility
    Visibility {
        /// Whether the feature is hidden
        hidden: bool,
    },
    /// Mutability
    Mutability {
        /// Whether the feature can be edited
        editable: bool,
        /// Why it cannot be edited
        reason: Option<String>,
    },
    /// Choices provider
    ChoicesProvider(ChoicesSource),
    /// Auto-complete
    AutoComplete {
        /// Supporting method
        method: String,
        /// Minimum search length
        min_length: u32,
    },
    /// Default value supplier method
    DefaultValue {
        /// Supporting method
        method: String,
    },
    /// Imperative validation method
    ValidateMethod {
        /// Supporting method
        method: String,
    },
    /// Method deciding whether the feature is hidden
    HideMethod {
        /// Supporting method
        method: String,
    },
    /// Method deciding whether the feature is usable
    DisableMethod {
        /// Supporting method
        method: String,
    },
    /// Regular expression the value must match
    Regex {
        /// Pattern
        pattern: String,
    },
    /// Maximum length of the value
    MaxLength(u32),
    /// Required or optional
    Mandatory {
        /// Whether a value is required
        required: bool,
    },
    /// Display name
    Named {
        /// Name
        name: String,
    },
    /// Description
    Description {
        /// Text
        text: String,
    },
    /// Title supplier
    Title {
        /// Method returning the title
        method: String,
    },
    /// Icon name supplier
    Icon {
        /// Method returning the icon name
        method: String,
    },
    /// Logical type name
    LogicalType {
        /// Name
        name: String,
    },
    /// Persistence identity
    EntityIdentity {
        /// Table the entity is stored in
        table: Option<String>,
        /// Property holding the identity
        id_property: Option<String>,
    },
    /// Immutable instances
    Immutable {
        /// Why the instances are immutable
        reason: Option<String>,
    },
    /// Scalar value type
    ValueSemantics,
    /// Action semantics
    ActionSemantics(Semantics),
    /// Layout position
    LayoutOrder {
        /// Sort key within the group
        sequence: String,
        /// Layout group
        group: Option<String>,
    },
    /// Association getter
    Accessor {
        /// Getter method
        method: String,
    },
    /// Property setter
    Setter {
        /// Setter method
        method: String,
    },
    /// Action invocation
    ActionInvocation {
        /// Invoked method
        method: String,
        /// Rendered return type
        returns: String,
    },
}

impl FacetKind {
    /// The facet type this payload belongs to
    pub fn facet_type(&self) -> FacetType {
        match self {
            FacetKind::Visibility { .. } => FacetType::Visibility,
            FacetKind::Mutability { .. } => FacetType::Mutability,
            FacetKind::ChoicesProvider(_) => FacetType::ChoicesProvider,
            FacetKind::AutoComplete { .. } => FacetType::AutoComplete,
            FacetKind::DefaultValue { .. } => FacetType::DefaultValue,
            FacetKind::ValidateMethod { .. } => FacetType::ValidateMethod,
            FacetKind::HideMethod { .. } => FacetType::HideMethod,
            FacetKind::DisableMethod { .. } => FacetType::DisableMethod,
            FacetKind::Regex { .. } => FacetType::Regex,
            FacetKind::MaxLength(_) => FacetType::MaxLength,
            FacetKind::Mandatory { .. } => FacetType::Mandatory,
            FacetKind::Named { .. } => FacetType::Named,
            FacetKind::Description { .. } => FacetType::Description,
            FacetKind::Title { .. } => FacetType::Title,
            FacetKind::Icon { .. } => FacetType::Icon,
            FacetKind::LogicalType { .. } => FacetType::LogicalType,
            FacetKind::EntityIdentity { .. } => FacetType::EntityIdentity,
            FacetKind::Immutable { .. } => FacetType::Immutable,
            FacetKind::ValueSemantics => FacetType::ValueSemantics,
            FacetKind::ActionSemantics(_) => FacetType::ActionSemantics,
            FacetKind::LayoutOrder { .. } => FacetType::LayoutOrder,
            FacetKind::Accessor { .. } => FacetType::Accessor,
            FacetKind::Setter { .. } => FacetType::Setter,
            FacetKind::ActionInvocation { .. } => FacetType::ActionInvocation,
        }
    }

    /// Descriptive attributes of the payload
    pub fn attributes(&self) -> BTreeMap<&'static str, AttributeValue> {
        let mut attrs = BTreeMap::new();
        match self {
            FacetKind::Visibility { hidden } => {
                attrs.insert("hidden", AttributeValue::Bool(*hidden));
            }
            FacetKind::Mutability { editable, reason } => {
                attrs.insert("editable", AttributeValue::Bool(*editable));
                put_opt(&mut attrs, "reason", reason);
            }
            FacetKind::ChoicesProvider(ChoicesSource::Method(method)) => {
                attrs.insert("source", AttributeValue::from("method"));
                attrs.insert("method", AttributeValue::from(method.as_str()));
            }
            FacetKind::ChoicesProvider(ChoicesSource::EnumConstants(constants)) => {
                attrs.insert("source", AttributeValue::from("enum"));
                attrs.insert("constants", AttributeValue::List(constants.clone()));
            }
            FacetKind::AutoComplete { method, min_length } => {
                attrs.insert("method", AttributeValue::from(method.as_str()));
                attrs.insert("minLength", AttributeValue::Int(*min_length as i64));
            }
            FacetKind::DefaultValue { method }
            | FacetKind::ValidateMethod { method }
            | FacetKind::HideMethod { method }
            | FacetKind::DisableMethod { method }
            | FacetKind::Title { method }
            | FacetKind::Icon { method }
            | FacetKind::Accessor { method }
            | FacetKind::Setter { method } => {
                attrs.insert("method", AttributeValue::from(method.as_str()));
            }
            FacetKind::Regex { pattern } => {
                attrs.insert("pattern", AttributeValue::from(pattern.as_str()));
            }
            FacetKind::MaxLength(len) => {
                attrs.insert("value", AttributeValue::Int(*len as i64));
            }
            FacetKind::Mandatory { required } => {
                attrs.insert("required", AttributeValue::Bool(*required));
            }
            FacetKind::Named { name } | FacetKind::LogicalType { name } => {
                attrs.insert("name", AttributeValue::from(name.as_str()));
            }
            FacetKind::Description { text } => {
                attrs.insert("text", AttributeValue::from(text.as_str()));
            }
            FacetKind::EntityIdentity { table, id_property } => {
                put_opt(&mut attrs, "table", table);
                put_opt(&mut attrs, "idProperty", id_property);
            }
            FacetKind::Immutable { reason } => {
                put_opt(&mut attrs, "reason", reason);
            }
            FacetKind::ValueSemantics => {}
            FacetKind::ActionSemantics(semantics) => {
                attrs.insert("semantics", AttributeValue::from(semantics.name()));
            }
            FacetKind::LayoutOrder { sequence, group } => {
                attrs.insert("sequence", AttributeValue::from(sequence.as_str()));
                put_opt(&mut attrs, "group", group);
            }
            FacetKind::ActionInvocation { method, returns } => {
                attrs.insert("method", AttributeValue::from(method.as_str()));
                attrs.insert("returns", AttributeValue::from(returns.as_str()));
            }
        }
        attrs
    }
}

fn put_opt(attrs: &mut BTreeMap<&'static str, AttributeValue>, name: &'static str, value: &Option<String>) {
    if let Some(value) = value {
        attrs.insert(name, AttributeValue::from(value.as_str()));
    }
}

/// Value of a facet attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// String
    Str(String),
    /// List of strings
    List(Vec<String>),
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Str(v.to_string())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Int(i) => write!(f, "{}", i),
            AttributeValue::Str(s) => f.write_str(s),
            AttributeValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// An immutable unit of behavior attached to a feature
#[derive(Debug, Clone)]
pub struct Facet {
    kind: FacetKind,
    precedence: Precedence,
    replacing: bool,
    origin: &'static str,
    holder: Option<FeatureIdentifier>,
}

impl Facet {
    /// Create a facet
    pub fn new(kind: FacetKind, precedence: Precedence) -> Self {
        Self {
            kind,
            precedence,
            replacing: false,
            origin: "",
            holder: None,
        }
    }

    /// Mark the facet as a replacement: it wins against an existing facet of
    /// the same type and equal precedence
    pub fn replacing(mut self) -> Self {
        self.replacing = true;
        self
    }

    pub(crate) fn with_origin(mut self, origin: &'static str) -> Self {
        self.origin = origin;
        self
    }

    pub(crate) fn attach(mut self, holder: FeatureIdentifier) -> Arc<Facet> {
        self.holder = Some(holder);
        Arc::new(self)
    }

    /// Facet type
    pub fn facet_type(&self) -> FacetType {
        self.kind.facet_type()
    }

    /// Payload
    pub fn kind(&self) -> &FacetKind {
        &self.kind
    }

    /// Precedence
    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    /// Whether this facet replaces equal-precedence facets
    pub fn is_replacement(&self) -> bool {
        self.replacing
    }

    /// Name of the factory that contributed the facet (empty if added directly)
    pub fn origin(&self) -> &'static str {
        self.origin
    }

    /// Feature this facet is attached to
    pub fn holder(&self) -> Option<&FeatureIdentifier> {
        self.holder.as_ref()
    }

    /// Whether `other` means the same thing (same payload), regardless of
    /// precedence, origin or holder
    pub fn semantics_equal(&self, other: &Facet) -> bool {
        self.kind == other.kind
    }

    /// All descriptive attributes, including the precedence
    pub fn attributes(&self) -> BTreeMap<&'static str, AttributeValue> {
        let mut attrs = self.kind.attributes();
        attrs.insert("precedence", AttributeValue::from(self.precedence.name()));
        attrs
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.facet_type(), self.precedence)?;
        for (name, value) in self.kind.attributes() {
            write!(f, " {}={}", name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        assert!(Precedence::Inferred < Precedence::Default);
        assert!(Precedence::Default < Precedence::Explicit);
        assert!(Precedence::Explicit < Precedence::High);
    }

    #[test]
    fn test_kind_maps_to_type() {
        assert_eq!(FacetKind::MaxLength(10).facet_type(), FacetType::MaxLength);
        assert_eq!(
            FacetKind::Visibility { hidden: true }.facet_type(),
            FacetType::Visibility
        );
        assert_eq!(FacetType::ChoicesProvider.name(), "choices-provider");
    }

    #[test]
    fn test_attributes_stable() {
        let facet = Facet::new(
            FacetKind::Mutability {
                editable: false,
                reason: Some("derived".to_string()),
            },
            Precedence::Inferred,
        );
        let first = facet.attributes();
        let second = facet.attributes();
        assert_eq!(first, second);
        assert_eq!(first.get("editable"), Some(&AttributeValue::Bool(false)));
        assert_eq!(first.get("reason"), Some(&AttributeValue::from("derived")));
        assert_eq!(first.get("precedence"), Some(&AttributeValue::from("inferred")));
        assert!(first.get("method").is_none());
    }

    #[test]
    fn test_semantics_equal_ignores_precedence() {
        let a = Facet::new(FacetKind::MaxLength(30), Precedence::Inferred);
        let b = Facet::new(FacetKind::MaxLength(30), Precedence::Explicit);
        let c = Facet::new(FacetKind::MaxLength(40), Precedence::Inferred);
        assert!(a.semantics_equal(&b));
        assert!(!a.semantics_equal(&c));
    }

    #[test]
    fn test_semantics_from_str() {
        assert_eq!("SAFE".parse::<Semantics>(), Ok(Semantics::Safe));
        assert_eq!("NON_IDEMPOTENT".parse::<Semantics>(), Ok(Semantics::NonIdempotent));
        assert_eq!("MAYBE".parse::<Semantics>(), Err("MAYBE".to_string()));
    }

    #[test]
    fn test_display() {
        let facet = Facet::new(FacetKind::MaxLength(30), Precedence::Explicit);
        assert_eq!(facet.to_string(), "max-length[explicit] value=30");
    }
}
