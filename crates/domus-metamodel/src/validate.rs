//! Post-build metamodel validation
//!
//! Validators inspect built specifications and report problems a build
//! cannot reject on its own (a misspelt supporting method is simply left
//! unconsumed). Failures are reported and logged, never raised.

use std::fmt;
use tracing::warn;

use crate::config::ValidationConfig;
use crate::facet::FacetType;
use crate::factory::is_supporting_method;
use crate::feature::FeatureIdentifier;
use crate::spec::{ObjectSpecification, SpecificationLoader};

/// Static metadata for a validator
pub struct ValidatorMeta {
    /// Validator name, e.g. "orphaned-methods"
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

/// A check over one built specification
pub trait MetaModelValidator: Send + Sync {
    /// Static metadata for this validator
    fn meta(&self) -> &ValidatorMeta;

    /// Validate one specification
    fn validate(&self, spec: &ObjectSpecification) -> Vec<ValidationFailure>;
}

/// One validation problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Validator that reported it
    pub validator: &'static str,
    /// Offending feature
    pub feature: FeatureIdentifier,
    /// What is wrong
    pub message: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.validator, self.feature, self.message)
    }
}

/// Outcome of validating a metamodel
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Number of specifications checked
    pub checked: usize,
    /// Problems found
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    /// Whether no problem was found
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Supporting-method names that no member picked up
pub struct OrphanedMethods;

static ORPHANED_META: ValidatorMeta = ValidatorMeta {
    name: "orphaned-methods",
    description: "Supporting methods that match no member",
};

impl MetaModelValidator for OrphanedMethods {
    fn meta(&self) -> &ValidatorMeta {
        &ORPHANED_META
    }

    fn validate(&self, spec: &ObjectSpecification) -> Vec<ValidationFailure> {
        spec.unconsumed_methods()
            .iter()
            .filter(|name| is_supporting_method(name))
            .map(|name| ValidationFailure {
                validator: ORPHANED_META.name,
                feature: FeatureIdentifier::class(spec.class().clone()),
                message: format!("Supporting method '{}' matches no member", name),
            })
            .collect()
    }
}

/// Features with both a choices provider and an auto-complete
pub struct ChoicesConflicts;

static CHOICES_META: ValidatorMeta = ValidatorMeta {
    name: "choices-conflicts",
    description: "A feature offers both choices and auto-complete",
};

impl MetaModelValidator for ChoicesConflicts {
    fn meta(&self) -> &ValidatorMeta {
        &CHOICES_META
    }

    fn validate(&self, spec: &ObjectSpecification) -> Vec<ValidationFailure> {
        spec.holders()
            .filter(|h| h.contains(FacetType::ChoicesProvider) && h.contains(FacetType::AutoComplete))
            .map(|h| ValidationFailure {
                validator: CHOICES_META.name,
                feature: h.identifier().clone(),
                message: "Has both choices and auto-complete".to_string(),
            })
            .collect()
    }
}

/// Validators enabled by `config`
pub fn validators(config: &ValidationConfig) -> Vec<Box<dyn MetaModelValidator>> {
    let mut validators: Vec<Box<dyn MetaModelValidator>> = Vec::new();
    if !config.enabled {
        return validators;
    }
    if config.orphaned_methods {
        validators.push(Box::new(OrphanedMethods));
    }
    if config.choices_conflicts {
        validators.push(Box::new(ChoicesConflicts));
    }
    validators
}

pub(crate) fn run(loader: &SpecificationLoader, config: &ValidationConfig) -> ValidationReport {
    let validators = validators(config);
    let mut report = ValidationReport::default();
    if validators.is_empty() {
        return report;
    }

    for spec in loader.specifications() {
        report.checked += 1;
        for validator in &validators {
            for failure in validator.validate(&spec) {
                warn!(
                    validator = failure.validator,
                    feature = %failure.feature,
                    message = %failure.message,
                    "Metamodel validation failed"
                );
                report.failures.push(failure);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassDescriptor, ClassName, ClassRegistry, MethodDescriptor, TypeRef};
    use crate::config::MetaModelConfig;
    use crate::factory::ProgrammingModel;
    use std::sync::Arc;

    fn loader(config: MetaModelConfig) -> SpecificationLoader {
        let registry = ClassRegistry::new().with(
            ClassDescriptor::new("Customer")
                .method(MethodDescriptor::new("getCountry").returns(TypeRef::class("string")))
                .method(MethodDescriptor::new("choicesCountry").returns(TypeRef::collection("string")))
                .method(MethodDescriptor::new("autoCompleteCountry").returns(TypeRef::collection("string")))
                // misspelt: no member `nmae`
                .method(MethodDescriptor::new("hideNmae").returns(TypeRef::class("boolean"))),
        );
        SpecificationLoader::with_config(Arc::new(registry), ProgrammingModel::new(), config).unwrap()
    }

    #[test]
    fn test_reports_orphans_and_conflicts() {
        let loader = loader(MetaModelConfig::default());
        loader.load(&ClassName::new("Customer")).unwrap();

        let report = loader.validate();
        assert!(!report.is_valid());
        let validators: Vec<_> = report.failures.iter().map(|f| f.validator).collect();
        assert_eq!(validators, vec!["orphaned-methods", "choices-conflicts"]);
        assert_eq!(report.failures[1].feature.to_string(), "Customer#country");
        assert!(report.failures[0].message.contains("hideNmae"));
    }

    #[test]
    fn test_disabled_validation() {
        let mut config = MetaModelConfig::default();
        config.validation.enabled = false;
        let loader = loader(config);
        loader.load(&ClassName::new("Customer")).unwrap();

        let report = loader.validate();
        assert!(report.is_valid());
        assert_eq!(report.checked, 0);
    }

    #[test]
    fn test_single_validator_switch() {
        let mut config = MetaModelConfig::default();
        config.validation.choices_conflicts = false;
        let loader = loader(config);
        loader.load(&ClassName::new("Customer")).unwrap();

        let report = loader.validate();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].validator, "orphaned-methods");
    }
}
