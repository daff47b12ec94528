//! Class model
//!
//! Domain classes are described as plain data: a [`ClassDescriptor`] lists
//! the class's markers (declarative annotations with attribute values), its
//! methods, superclass and origin. Everything downstream reads classes only
//! through the [`ClassSource`] seam, so the facet factories never depend on
//! how descriptors were produced.
//!
//! ```rust,ignore
//! let customer = ClassDescriptor::new("Customer")
//!     .marker(Marker::new("DomainObject").with("logicalTypeName", "crm.Customer"))
//!     .method(MethodDescriptor::new("getName").returns(TypeRef::class("string")))
//!     .method(MethodDescriptor::new("hideName").returns(TypeRef::class("boolean")));
//! ```

mod canonical;
mod registry;

pub use canonical::ClassCanonicalizer;
pub use registry::{ClassRegistry, ClassSource, VALUE_TYPES};

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Name of a class; cheap to clone and hash
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName(Arc<str>);

impl ClassName {
    /// Create a class name
    pub fn new(name: impl AsRef<str>) -> Self {
        ClassName(Arc::from(name.as_ref()))
    }

    /// The name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Simple name: the part after the last `.`
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Debug for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassName({})", self.0)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassName {
    fn from(name: &str) -> Self {
        ClassName::new(name)
    }
}

impl Serialize for ClassName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Reference to a type from a method signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// No value
    Void,
    /// A single instance of a class
    Class(ClassName),
    /// A collection whose elements are instances of a class
    Collection(ClassName),
}

impl TypeRef {
    /// Shorthand for `TypeRef::Class`
    pub fn class(name: impl AsRef<str>) -> Self {
        TypeRef::Class(ClassName::new(name))
    }

    /// Shorthand for `TypeRef::Collection`
    pub fn collection(element: impl AsRef<str>) -> Self {
        TypeRef::Collection(ClassName::new(element))
    }

    /// The referenced class (element class for collections)
    pub fn class_name(&self) -> Option<&ClassName> {
        match self {
            TypeRef::Void => None,
            TypeRef::Class(c) | TypeRef::Collection(c) => Some(c),
        }
    }

    /// Whether this is `Void`
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    /// Whether this is a collection
    pub fn is_collection(&self) -> bool {
        matches!(self, TypeRef::Collection(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => f.write_str("void"),
            TypeRef::Class(c) => write!(f, "{}", c),
            TypeRef::Collection(c) => write!(f, "{}[]", c),
        }
    }
}

/// Value of a marker attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// String (also used for enumeration constants)
    Str(String),
    /// List of strings
    List(Vec<String>),
}

impl fmt::Display for MarkerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerValue::Bool(b) => write!(f, "{}", b),
            MarkerValue::Int(i) => write!(f, "{}", i),
            MarkerValue::Str(s) => f.write_str(s),
            MarkerValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<bool> for MarkerValue {
    fn from(v: bool) -> Self {
        MarkerValue::Bool(v)
    }
}

impl From<i64> for MarkerValue {
    fn from(v: i64) -> Self {
        MarkerValue::Int(v)
    }
}

impl From<i32> for MarkerValue {
    fn from(v: i32) -> Self {
        MarkerValue::Int(v as i64)
    }
}

impl From<&str> for MarkerValue {
    fn from(v: &str) -> Self {
        MarkerValue::Str(v.to_string())
    }
}

impl From<String> for MarkerValue {
    fn from(v: String) -> Self {
        MarkerValue::Str(v)
    }
}

impl From<Vec<String>> for MarkerValue {
    fn from(v: Vec<String>) -> Self {
        MarkerValue::List(v)
    }
}

/// A declarative marker on a class, method or parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Marker name, e.g. "Property"
    pub name: String,
    /// Attribute values by name
    pub attributes: BTreeMap<String, MarkerValue>,
}

impl Marker {
    /// Create a marker without attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<MarkerValue>) -> Self {
        self.attributes.insert(attribute.into(), value.into());
        self
    }

    /// Get an attribute value
    pub fn get(&self, attribute: &str) -> Option<&MarkerValue> {
        self.attributes.get(attribute)
    }
}

/// Find a marker by name
pub fn find_marker<'a>(markers: &'a [Marker], name: &str) -> Option<&'a Marker> {
    markers.iter().find(|m| m.name == name)
}

/// What sort of class a descriptor describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassKind {
    /// Ordinary concrete class
    Class,
    /// Abstract class
    Abstract,
    /// Interface
    Interface,
    /// Enumeration with its constants in declaration order
    Enum {
        /// Constant names
        constants: Vec<String>,
    },
    /// Scalar value type (string, int, date, ...)
    Value,
}

impl ClassKind {
    /// Stable name for diagnostics and export
    pub fn name(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Abstract => "abstract",
            ClassKind::Interface => "interface",
            ClassKind::Enum { .. } => "enum",
            ClassKind::Value => "value",
        }
    }
}

/// How a class came to exist at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassOrigin {
    /// Declared in domain code
    Declared,
    /// Synthetic subtype generated for an enum constant with a body
    EnumConstantBody {
        /// The enum that declares the constant
        enum_class: ClassName,
    },
    /// Runtime-generated proxy around a domain class
    Proxy {
        /// Proxied class
        target: ClassName,
    },
    /// Persistence-enhanced subtype of a domain class
    Enhanced {
        /// Enhanced class
        target: ClassName,
    },
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub ty: TypeRef,
    /// Markers on the parameter
    pub markers: Vec<Marker>,
}

impl ParamDescriptor {
    /// Create a parameter
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            markers: Vec::new(),
        }
    }

    /// Add a marker
    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }
}

/// A method of a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,
    /// Parameters in order
    pub params: Vec<ParamDescriptor>,
    /// Return type
    pub returns: TypeRef,
    /// Markers on the method
    pub markers: Vec<Marker>,
    /// Whether the method is static
    pub is_static: bool,
    /// Whether the method is public
    pub is_public: bool,
}

impl MethodDescriptor {
    /// Create a public, non-static, no-arg method returning `void`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: TypeRef::Void,
            markers: Vec::new(),
            is_static: false,
            is_public: true,
        }
    }

    /// Set the return type
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.returns = ty;
        self
    }

    /// Append a parameter
    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    /// Add a marker
    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Mark as static
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Mark as non-public
    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    /// Find a marker by name
    pub fn find_marker(&self, name: &str) -> Option<&Marker> {
        find_marker(&self.markers, name)
    }
}

/// Description of one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    /// Class name
    pub name: ClassName,
    /// Kind of class
    pub kind: ClassKind,
    /// Runtime origin
    pub origin: ClassOrigin,
    /// Direct superclass
    pub superclass: Option<ClassName>,
    /// Class-level markers
    pub markers: Vec<Marker>,
    /// Declared methods in declaration order
    pub methods: Vec<MethodDescriptor>,
}

impl ClassDescriptor {
    /// Create a declared, concrete class with no members
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: ClassName::new(name),
            kind: ClassKind::Class,
            origin: ClassOrigin::Declared,
            superclass: None,
            markers: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Create an enum with the given constants
    pub fn enumeration(name: impl AsRef<str>, constants: &[&str]) -> Self {
        Self::new(name).kind(ClassKind::Enum {
            constants: constants.iter().map(|c| c.to_string()).collect(),
        })
    }

    /// Create a scalar value type
    pub fn value(name: impl AsRef<str>) -> Self {
        Self::new(name).kind(ClassKind::Value)
    }

    /// Set the kind
    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the origin
    pub fn origin(mut self, origin: ClassOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Set the superclass
    pub fn superclass(mut self, superclass: impl AsRef<str>) -> Self {
        self.superclass = Some(ClassName::new(superclass));
        self
    }

    /// Add a class-level marker
    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Add a method
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Find a class-level marker by name
    pub fn find_marker(&self, name: &str) -> Option<&Marker> {
        find_marker(&self.markers, name)
    }

    /// Whether this is a scalar value type
    pub fn is_value(&self) -> bool {
        matches!(self.kind, ClassKind::Value)
    }

    /// Enum constants, if this is an enum
    pub fn enum_constants(&self) -> Option<&[String]> {
        match &self.kind {
            ClassKind::Enum { constants } => Some(constants),
            _ => None,
        }
    }
}
