//! Error types for metamodel construction
//!
//! Construction-time failures (canonicalization, the facet factory pipeline)
//! are reported through [`MetaModelError`]. The enum is `Clone` because a
//! failed build is cached in the loader and handed back to every later caller
//! of the same class.

use thiserror::Error;

use crate::class::ClassName;

/// Errors raised by a single facet factory invocation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FacetFactoryError {
    /// A marker attribute carried an enumeration value the factory does not know
    #[error("Unrecognized value '{value}' for {marker}({attribute})")]
    UnrecognizedValue {
        /// Marker name
        marker: String,
        /// Attribute name
        attribute: String,
        /// Offending value
        value: String,
    },

    /// A marker attribute had the wrong shape (e.g. a string where an int was expected)
    #[error("Invalid attribute {marker}({attribute}): {message}")]
    InvalidAttribute {
        /// Marker name
        marker: String,
        /// Attribute name
        attribute: String,
        /// What was wrong
        message: String,
    },

    /// Any other factory failure
    #[error("{0}")]
    Failed(String),
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A disabled factory name does not match any registered factory
    #[error("Unknown facet factory '{0}'")]
    UnknownFactory(String),
}

/// Errors raised while building or using the metamodel
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetaModelError {
    /// No descriptor is known for the class
    #[error("Unknown class '{0}'")]
    UnknownClass(ClassName),

    /// A proxy/enhancement wrapper chain loops back on itself
    #[error("Cannot canonicalize '{class}': wrapper chain loops through '{repeated}'")]
    CanonicalizationCycle {
        /// Class that was being canonicalized
        class: ClassName,
        /// First class seen twice in the chain
        repeated: ClassName,
    },

    /// A facet factory failed; the specification build was aborted
    #[error("Failed to build specification for '{class}': factory '{factory}' failed on {feature}: {source}")]
    PipelineFailure {
        /// Class whose build was aborted
        class: ClassName,
        /// Name of the failing factory
        factory: &'static str,
        /// Feature being processed when the factory failed
        feature: String,
        /// Underlying factory error
        source: FacetFactoryError,
    },

    /// A pojo's runtime class is not compatible with the specification it was paired with
    #[error("Type mismatch: specification is for '{expected}', pojo is a '{actual}'")]
    TypeMismatch {
        /// Specification class
        expected: ClassName,
        /// Canonicalized runtime class of the pojo
        actual: ClassName,
    },

    /// A processing branch met a kind it does not handle
    #[error("Unmatched {what}: '{value}'")]
    UnmatchedVariant {
        /// Which enumeration was being matched
        what: &'static str,
        /// The unrecognized value
        value: String,
    },

    /// A bookmark string could not be parsed
    #[error("Invalid bookmark '{0}'")]
    InvalidBookmark(String),

    /// The requested specification handle does not exist in the current metamodel
    #[error("Unknown specification handle {0}")]
    UnknownSpecification(u32),

    /// Configuration could not be applied
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<ConfigError> for MetaModelError {
    fn from(err: ConfigError) -> Self {
        MetaModelError::Config(err.to_string())
    }
}

/// Result alias for metamodel operations
pub type MetaModelResult<T> = Result<T, MetaModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_failure_message() {
        let err = MetaModelError::PipelineFailure {
            class: ClassName::new("Customer"),
            factory: "title",
            feature: "Customer".to_string(),
            source: FacetFactoryError::Failed("boom".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("Customer"));
        assert!(msg.contains("title"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: MetaModelError = ConfigError::UnknownFactory("layot".to_string()).into();
        assert_eq!(
            err,
            MetaModelError::Config("Unknown facet factory 'layot'".to_string())
        );
    }

    #[test]
    fn test_unrecognized_value_message() {
        let err = FacetFactoryError::UnrecognizedValue {
            marker: "Property".to_string(),
            attribute: "editing".to_string(),
            value: "SOMETIMES".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unrecognized value 'SOMETIMES' for Property(editing)"
        );
    }
}
