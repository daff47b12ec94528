//! Specification loader
//!
//! Specifications are built in two phases:
//!
//! 1. **Registration**: the canonical class gets a slot and a [`SpecId`] in
//!    the arena. Registration never runs factories.
//! 2. **Introspection**: the programming model runs over the class. Types
//!    referenced by members are registered (phase 1 only) and stored as
//!    handles, so cyclic class graphs finish without recursion.
//!
//! Each slot owns a [`OnceCell`] holding the build result. Concurrent first
//! loads of one class share a single pipeline run; loads of other classes
//! are not blocked. A failed build is stored like a successful one and
//! returned to every later caller until [`reset`](SpecificationLoader::reset).

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::introspector::{Introspector, TypeRegistrar};
use super::{IntrospectionState, ObjectSpecification, SpecId};
use crate::class::{ClassCanonicalizer, ClassName, ClassSource};
use crate::config::MetaModelConfig;
use crate::error::{MetaModelError, MetaModelResult};
use crate::factory::ProgrammingModel;
use crate::managed::{DomainObject, ManagedObject};
use crate::validate::{self, ValidationReport};

type BuildResult = MetaModelResult<Arc<ObjectSpecification>>;

struct SpecSlot {
    class: ClassName,
    state: AtomicU8,
    built: OnceCell<BuildResult>,
}

impl SpecSlot {
    fn new(class: ClassName) -> Self {
        Self {
            class,
            state: AtomicU8::new(IntrospectionState::NotIntrospected as u8),
            built: OnceCell::new(),
        }
    }

    fn state(&self) -> IntrospectionState {
        IntrospectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: IntrospectionState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

/// One generation of the metamodel: the arena and its class index
struct LoaderState {
    generation: u64,
    index: DashMap<ClassName, SpecId>,
    slots: RwLock<Vec<Arc<SpecSlot>>>,
}

impl LoaderState {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            index: DashMap::new(),
            slots: RwLock::new(Vec::new()),
        }
    }

    fn slot(&self, id: SpecId) -> MetaModelResult<Arc<SpecSlot>> {
        self.slots
            .read()
            .get(id.index())
            .cloned()
            .ok_or(MetaModelError::UnknownSpecification(id.as_u32()))
    }

    /// Phase 1: give a canonical class a slot, or return its existing one
    fn register(&self, class: &ClassName, classes: &dyn ClassSource) -> MetaModelResult<SpecId> {
        if let Some(id) = self.index.get(class) {
            return Ok(*id);
        }
        if classes.describe(class).is_none() {
            return Err(MetaModelError::UnknownClass(class.clone()));
        }

        // The slot is pushed before the index entry is published, so any id
        // read from the index resolves to a slot.
        let mut slots = self.slots.write();
        match self.index.entry(class.clone()) {
            Entry::Occupied(e) => Ok(*e.get()),
            Entry::Vacant(e) => {
                let id = SpecId::new(slots.len());
                slots.push(Arc::new(SpecSlot::new(class.clone())));
                e.insert(id);
                debug!(class = %class, spec_id = %id, generation = self.generation, "Registered specification");
                Ok(id)
            }
        }
    }
}

/// Builds and caches specifications keyed by canonical class
pub struct SpecificationLoader {
    classes: Arc<dyn ClassSource>,
    canonicalizer: ClassCanonicalizer,
    model: ProgrammingModel,
    config: MetaModelConfig,
    state: RwLock<Arc<LoaderState>>,
}

struct Registrar<'a> {
    loader: &'a SpecificationLoader,
    state: &'a LoaderState,
}

impl TypeRegistrar for Registrar<'_> {
    fn register_type(&self, class: &ClassName) -> MetaModelResult<SpecId> {
        let canonical = self.loader.canonicalizer.canonicalize(class)?;
        self.state.register(&canonical, &*self.loader.classes)
    }
}

impl SpecificationLoader {
    /// Create a loader with the default configuration
    pub fn new(classes: Arc<dyn ClassSource>, model: ProgrammingModel) -> Self {
        Self {
            canonicalizer: ClassCanonicalizer::new(classes.clone()),
            classes,
            model,
            config: MetaModelConfig::default(),
            state: RwLock::new(Arc::new(LoaderState::new(0))),
        }
    }

    /// Create a loader, applying the factory-related configuration to `model`
    pub fn with_config(
        classes: Arc<dyn ClassSource>,
        mut model: ProgrammingModel,
        config: MetaModelConfig,
    ) -> MetaModelResult<Self> {
        model.apply_config(&config)?;
        let mut loader = Self::new(classes, model);
        loader.config = config;
        Ok(loader)
    }

    /// The class canonicalizer
    pub fn canonicalizer(&self) -> &ClassCanonicalizer {
        &self.canonicalizer
    }

    /// The programming model
    pub fn model(&self) -> &ProgrammingModel {
        &self.model
    }

    /// The configuration
    pub fn config(&self) -> &MetaModelConfig {
        &self.config
    }

    /// Class metadata source
    pub fn classes(&self) -> &dyn ClassSource {
        &*self.classes
    }

    fn current(&self) -> Arc<LoaderState> {
        self.state.read().clone()
    }

    /// Current metamodel generation; incremented by every reset
    pub fn generation(&self) -> u64 {
        self.current().generation
    }

    /// Register a class without building it (phase 1)
    pub fn register(&self, class: &ClassName) -> MetaModelResult<SpecId> {
        let canonical = self.canonicalizer.canonicalize(class)?;
        self.current().register(&canonical, &*self.classes)
    }

    /// Load the fully built specification of a class
    pub fn load(&self, class: &ClassName) -> MetaModelResult<Arc<ObjectSpecification>> {
        let state = self.current();
        let canonical = self.canonicalizer.canonicalize(class)?;
        let id = state.register(&canonical, &*self.classes)?;
        let spec = self.build(&state, id)?;
        if self.config.eager_introspection {
            self.build_closure(&state, &spec);
        }
        Ok(spec)
    }

    /// Load the specification behind a handle, building it if needed
    pub fn load_id(&self, id: SpecId) -> MetaModelResult<Arc<ObjectSpecification>> {
        let state = self.current();
        self.build(&state, id)
    }

    /// Built specification behind a handle, without building
    pub fn spec(&self, id: SpecId) -> Option<Arc<ObjectSpecification>> {
        let slot = self.current().slot(id).ok()?;
        match slot.built.get() {
            Some(Ok(spec)) => Some(spec.clone()),
            _ => None,
        }
    }

    /// Handle of a registered class, without registering or building
    pub fn lookup(&self, class: &ClassName) -> Option<SpecId> {
        let canonical = self.canonicalizer.canonicalize(class).ok()?;
        self.current().index.get(&canonical).map(|id| *id)
    }

    /// Build state of a slot
    pub fn state(&self, id: SpecId) -> Option<IntrospectionState> {
        self.current().slot(id).ok().map(|slot| slot.state())
    }

    /// Class of a slot
    pub fn class_of(&self, id: SpecId) -> Option<ClassName> {
        self.current().slot(id).ok().map(|slot| slot.class.clone())
    }

    /// Number of registered slots
    pub fn len(&self) -> usize {
        self.current().slots.read().len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build every registered slot, including slots registered along the
    /// way, until none is left unbuilt
    ///
    /// Returns the failures; successful builds are cached as usual.
    pub fn load_all(&self) -> Vec<MetaModelError> {
        let state = self.current();
        let mut failures = Vec::new();
        let mut next = 0;
        loop {
            let len = state.slots.read().len();
            if next >= len {
                break;
            }
            for index in next..len {
                if let Err(e) = self.build(&state, SpecId::new(index)) {
                    failures.push(e);
                }
            }
            next = len;
        }
        debug!(specifications = next, failures = failures.len(), "Loaded all specifications");
        failures
    }

    /// Successfully built specifications, in registration order
    pub fn specifications(&self) -> Vec<Arc<ObjectSpecification>> {
        self.current()
            .slots
            .read()
            .iter()
            .filter_map(|slot| match slot.built.get() {
                Some(Ok(spec)) => Some(spec.clone()),
                _ => None,
            })
            .collect()
    }

    /// Discard every specification and the canonicalization memo
    ///
    /// Specifications handed out earlier stay valid for their holders but
    /// are no longer reachable through the loader.
    pub fn reset(&self) {
        let mut state = self.state.write();
        let generation = state.generation + 1;
        *state = Arc::new(LoaderState::new(generation));
        self.canonicalizer.clear();
        debug!(generation, "Metamodel reset");
    }

    /// Load the specification of a pojo's class and wrap the pojo
    pub fn adapt(&self, pojo: Arc<dyn DomainObject>) -> MetaModelResult<ManagedObject> {
        let spec = self.load(&pojo.runtime_class())?;
        ManagedObject::of(self, spec, pojo)
    }

    /// Run the configured validators over every built specification
    pub fn validate(&self) -> ValidationReport {
        validate::run(self, &self.config.validation)
    }

    fn build(&self, state: &LoaderState, id: SpecId) -> BuildResult {
        let slot = state.slot(id)?;
        slot.built
            .get_or_init(|| {
                slot.set_state(IntrospectionState::Introspecting);
                debug!(class = %slot.class, spec_id = %id, "Introspecting specification");

                let result = self.introspect(state, id, &slot.class);
                match &result {
                    Ok(spec) => {
                        slot.set_state(IntrospectionState::Introspected);
                        debug!(
                            class = %slot.class,
                            spec_id = %id,
                            members = spec.members().len(),
                            "Specification built"
                        );
                    }
                    Err(e) => {
                        slot.set_state(IntrospectionState::Failed);
                        error!(class = %slot.class, spec_id = %id, error = %e, "Specification build failed");
                    }
                }
                result
            })
            .clone()
    }

    fn introspect(&self, state: &LoaderState, id: SpecId, class: &ClassName) -> BuildResult {
        let descriptor = self
            .classes
            .describe(class)
            .ok_or_else(|| MetaModelError::UnknownClass(class.clone()))?;
        let registrar = Registrar { loader: self, state };
        let introspector = Introspector {
            classes: &*self.classes,
            model: &self.model,
            policy: self.config.introspection,
            registrar: &registrar,
        };
        introspector.introspect(id, &descriptor).map(Arc::new)
    }

    /// Build everything reachable from `root` through type references
    fn build_closure(&self, state: &LoaderState, root: &ObjectSpecification) {
        let mut seen = FxHashSet::default();
        seen.insert(root.id());
        let mut queue: VecDeque<SpecId> = referenced(root).collect();

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            match self.build(state, id) {
                Ok(spec) => queue.extend(referenced(&spec).filter(|r| !seen.contains(r))),
                Err(e) => warn!(spec_id = %id, error = %e, "Eager introspection skipped a failed specification"),
            }
        }
    }
}

/// Handles a specification refers to
fn referenced(spec: &ObjectSpecification) -> impl Iterator<Item = SpecId> + '_ {
    spec.superclass().into_iter().chain(spec.members().iter().flat_map(|m| {
        m.type_spec()
            .into_iter()
            .chain(m.parameters().iter().filter_map(|p| p.type_spec()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassDescriptor, ClassOrigin, ClassRegistry, MethodDescriptor, TypeRef};
    use crate::error::FacetFactoryError;
    use crate::factory::{ClassContext, FacetFactory, FactoryMeta, ProcessingPhase};
    use crate::feature::FeatureTypes;

    fn registry() -> Arc<ClassRegistry> {
        Arc::new(
            ClassRegistry::new()
                .with(
                    ClassDescriptor::new("Customer")
                        .method(MethodDescriptor::new("getName").returns(TypeRef::class("string")))
                        .method(MethodDescriptor::new("getOrders").returns(TypeRef::collection("Order"))),
                )
                .with(
                    ClassDescriptor::new("Order")
                        .method(MethodDescriptor::new("getCustomer").returns(TypeRef::class("Customer"))),
                )
                .with(ClassDescriptor::new("Customer$Proxy").origin(ClassOrigin::Proxy {
                    target: ClassName::new("Customer"),
                })),
        )
    }

    fn loader() -> SpecificationLoader {
        SpecificationLoader::new(registry(), ProgrammingModel::new())
    }

    #[test]
    fn test_load_is_cached() {
        let loader = loader();
        let a = loader.load(&ClassName::new("Customer")).unwrap();
        let b = loader.load(&ClassName::new("Customer")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_proxy_shares_canonical_spec() {
        let loader = loader();
        let direct = loader.load(&ClassName::new("Customer")).unwrap();
        let proxied = loader.load(&ClassName::new("Customer$Proxy")).unwrap();
        assert!(Arc::ptr_eq(&direct, &proxied));
        assert_eq!(proxied.class().as_str(), "Customer");
    }

    #[test]
    fn test_references_are_registered_not_built() {
        let loader = loader();
        let customer = loader.load(&ClassName::new("Customer")).unwrap();
        let orders = customer.member("orders").unwrap();
        let order_id = orders.type_spec().unwrap();

        assert_eq!(loader.state(order_id), Some(IntrospectionState::NotIntrospected));
        assert!(loader.spec(order_id).is_none());

        let order = loader.load_id(order_id).unwrap();
        assert_eq!(order.class().as_str(), "Order");
        assert_eq!(order.member("customer").unwrap().type_spec(), Some(customer.id()));
        assert_eq!(loader.state(order_id), Some(IntrospectionState::Introspected));
    }

    #[test]
    fn test_unknown_class() {
        let loader = loader();
        let err = loader.load(&ClassName::new("Nope")).unwrap_err();
        assert_eq!(err, MetaModelError::UnknownClass(ClassName::new("Nope")));
        assert!(loader.is_empty());
    }

    #[test]
    fn test_load_all_reaches_fixpoint() {
        let loader = loader();
        loader.register(&ClassName::new("Customer")).unwrap();
        let failures = loader.load_all();
        assert!(failures.is_empty());
        // Customer, string, Order
        assert_eq!(loader.specifications().len(), 3);
        assert_eq!(loader.len(), 3);
    }

    #[test]
    fn test_eager_introspection() {
        let config = MetaModelConfig {
            eager_introspection: true,
            ..MetaModelConfig::default()
        };
        let loader = SpecificationLoader::with_config(registry(), ProgrammingModel::new(), config).unwrap();
        loader.load(&ClassName::new("Customer")).unwrap();
        let order = loader.lookup(&ClassName::new("Order")).unwrap();
        assert_eq!(loader.state(order), Some(IntrospectionState::Introspected));
    }

    #[test]
    fn test_reset() {
        let loader = loader();
        let before = loader.load(&ClassName::new("Customer")).unwrap();
        assert_eq!(loader.generation(), 0);

        loader.reset();
        assert_eq!(loader.generation(), 1);
        assert!(loader.is_empty());
        assert!(loader.lookup(&ClassName::new("Customer")).is_none());
        assert_eq!(loader.canonicalizer().memoized(), 0);

        let after = loader.load(&ClassName::new("Customer")).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
    }

    struct Explode;

    static EXPLODE: FactoryMeta = FactoryMeta {
        name: "explode",
        description: "fails on Order",
        feature_types: FeatureTypes::CLASS,
    };

    impl FacetFactory for Explode {
        fn meta(&self) -> &FactoryMeta {
            &EXPLODE
        }

        fn process_class(&self, ctx: &mut ClassContext<'_>) -> Result<(), FacetFactoryError> {
            if ctx.class.name.as_str() == "Order" {
                return Err(FacetFactoryError::Failed("boom".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_failed_build_is_terminal() {
        let mut model = ProgrammingModel::new();
        model.add(ProcessingPhase::ObjectNaming, Arc::new(Explode));
        let loader = SpecificationLoader::new(registry(), model);

        let first = loader.load(&ClassName::new("Order")).unwrap_err();
        let second = loader.load(&ClassName::new("Order")).unwrap_err();
        assert_eq!(first, second);
        assert!(matches!(first, MetaModelError::PipelineFailure { factory: "explode", .. }));

        let id = loader.lookup(&ClassName::new("Order")).unwrap();
        assert_eq!(loader.state(id), Some(IntrospectionState::Failed));
        assert!(loader.load(&ClassName::new("Customer")).is_ok());
    }

    #[test]
    fn test_with_config_unknown_factory() {
        let config = MetaModelConfig {
            disabled_factories: vec!["no-such-factory".to_string()],
            ..MetaModelConfig::default()
        };
        let err = SpecificationLoader::with_config(registry(), ProgrammingModel::new(), config)
            .err()
            .unwrap();
        assert!(matches!(err, MetaModelError::Config(_)));
    }
}
