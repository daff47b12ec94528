//! Programming model: the ordered registry of facet factories

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::FacetFactory;
use crate::config::MetaModelConfig;
use crate::error::{ConfigError, MetaModelError};
use crate::feature::FeatureType;

/// Processing phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProcessingPhase {
    /// Framework defaults every feature starts with
    FallbackDefaults,
    /// Class naming and logical type names
    ObjectNaming,
    /// Factories that interpret and consume methods
    MethodRemoving,
    /// Facets from markers on members
    MemberModelling,
    /// Facets derived from the member's value type
    ValueTypes,
    /// Layout hints
    Layout,
    /// Facets that depend on everything before
    Finally,
}

impl ProcessingPhase {
    /// All phases in order
    pub const ALL: [ProcessingPhase; 7] = [
        ProcessingPhase::FallbackDefaults,
        ProcessingPhase::ObjectNaming,
        ProcessingPhase::MethodRemoving,
        ProcessingPhase::MemberModelling,
        ProcessingPhase::ValueTypes,
        ProcessingPhase::Layout,
        ProcessingPhase::Finally,
    ];

    /// Stable name
    pub fn name(&self) -> &'static str {
        match self {
            ProcessingPhase::FallbackDefaults => "fallback-defaults",
            ProcessingPhase::ObjectNaming => "object-naming",
            ProcessingPhase::MethodRemoving => "method-removing",
            ProcessingPhase::MemberModelling => "member-modelling",
            ProcessingPhase::ValueTypes => "value-types",
            ProcessingPhase::Layout => "layout",
            ProcessingPhase::Finally => "finally",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ProcessingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProcessingPhase {
    type Err = MetaModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessingPhase::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| MetaModelError::UnmatchedVariant {
                what: "processing phase",
                value: s.to_string(),
            })
    }
}

/// Where to register a factory relative to a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    /// Before every factory of the phase
    Before(ProcessingPhase),
    /// At the end of the phase's own factories
    Into(ProcessingPhase),
    /// After every factory of the phase, including those inserted `Into` it later
    After(ProcessingPhase),
}

/// A module that contributes factories to a programming model
///
/// This is the only supported way to extend the metamodel.
pub trait ProgrammingModelExtension {
    /// Name of the extension, for logging
    fn name(&self) -> &'static str;

    /// Register factories
    fn contribute(&self, model: &mut ProgrammingModel);
}

#[derive(Default, Clone)]
struct PhaseSlots {
    before: Vec<Arc<dyn FacetFactory>>,
    main: Vec<Arc<dyn FacetFactory>>,
    after: Vec<Arc<dyn FacetFactory>>,
}

impl PhaseSlots {
    fn iter(&self) -> impl Iterator<Item = &Arc<dyn FacetFactory>> {
        self.before.iter().chain(&self.main).chain(&self.after)
    }

    fn retain(&mut self, mut keep: impl FnMut(&Arc<dyn FacetFactory>) -> bool) {
        self.before.retain(&mut keep);
        self.main.retain(&mut keep);
        self.after.retain(&mut keep);
    }
}

/// Ordered registry of facet factories
#[derive(Clone)]
pub struct ProgrammingModel {
    phases: Vec<PhaseSlots>,
}

impl ProgrammingModel {
    /// Create a programming model with all built-in factories
    pub fn new() -> Self {
        let mut model = Self::empty();
        super::factories::install_defaults(&mut model);
        model
    }

    /// Create a programming model without any factories
    pub fn empty() -> Self {
        Self {
            phases: vec![PhaseSlots::default(); ProcessingPhase::ALL.len()],
        }
    }

    /// Append a factory to a phase
    pub fn add(&mut self, phase: ProcessingPhase, factory: Arc<dyn FacetFactory>) -> &mut Self {
        self.insert(InsertionPoint::Into(phase), factory)
    }

    /// Register a factory at an insertion point
    pub fn insert(&mut self, point: InsertionPoint, factory: Arc<dyn FacetFactory>) -> &mut Self {
        let (phase, slot) = match point {
            InsertionPoint::Before(p) => (p, &mut self.phases[p.index()].before),
            InsertionPoint::Into(p) => (p, &mut self.phases[p.index()].main),
            InsertionPoint::After(p) => (p, &mut self.phases[p.index()].after),
        };
        tracing::trace!(factory = factory.meta().name, phase = %phase, ?point, "Registered facet factory");
        slot.push(factory);
        self
    }

    /// Let an extension register its factories
    pub fn install(&mut self, extension: &dyn ProgrammingModelExtension) -> &mut Self {
        let before = self.len();
        extension.contribute(self);
        tracing::debug!(
            extension = extension.name(),
            factories = self.len() - before,
            "Installed programming model extension"
        );
        self
    }

    /// Remove every factory with `name`; returns whether any was removed
    pub fn disable(&mut self, name: &str) -> bool {
        let before = self.len();
        for slots in &mut self.phases {
            slots.retain(|f| f.meta().name != name);
        }
        self.len() != before
    }

    /// Apply the factory-related parts of a configuration
    ///
    /// Fails on a disabled factory name that matches nothing.
    pub fn apply_config(&mut self, config: &MetaModelConfig) -> Result<(), ConfigError> {
        for name in &config.disabled_factories {
            if !self.disable(name) {
                return Err(ConfigError::UnknownFactory(name.clone()));
            }
        }
        Ok(())
    }

    /// All factories in execution order
    pub fn factories(&self) -> impl Iterator<Item = &Arc<dyn FacetFactory>> {
        self.phases.iter().flat_map(|slots| slots.iter())
    }

    /// Factories of one phase in execution order
    pub fn phase(&self, phase: ProcessingPhase) -> impl Iterator<Item = &Arc<dyn FacetFactory>> {
        self.phases[phase.index()].iter()
    }

    /// Factories applicable to a feature type, in execution order
    pub fn factories_for(&self, feature: FeatureType) -> impl Iterator<Item = &Arc<dyn FacetFactory>> {
        self.factories()
            .filter(move |f| f.meta().feature_types.contains(feature))
    }

    /// Factory names in execution order
    pub fn factory_names(&self) -> Vec<&'static str> {
        self.factories().map(|f| f.meta().name).collect()
    }

    /// Whether a factory with `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories().any(|f| f.meta().name == name)
    }

    /// Number of registered factories
    pub fn len(&self) -> usize {
        self.phases.iter().map(|s| s.before.len() + s.main.len() + s.after.len()).sum()
    }

    /// Whether no factory is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ProgrammingModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProgrammingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgrammingModel")
            .field("factories", &self.factory_names())
            .finish()
    }
}
