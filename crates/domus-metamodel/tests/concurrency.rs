//! Concurrent loads: one pipeline run per class, shared results

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use domus_metamodel::{
    ClassContext, ClassDescriptor, ClassName, ClassOrigin, ClassRegistry, FacetFactory,
    FacetFactoryError, FactoryMeta, FeatureTypes, MethodDescriptor, ProcessingPhase,
    ProgrammingModel, SpecificationLoader, TypeRef,
};

fn crm() -> ClassRegistry {
    ClassRegistry::new()
        .with(
            ClassDescriptor::new("Customer")
                .method(MethodDescriptor::new("getName").returns(TypeRef::class("string")))
                .method(MethodDescriptor::new("getOrders").returns(TypeRef::collection("Order"))),
        )
        .with(
            ClassDescriptor::new("Order")
                .method(MethodDescriptor::new("getCustomer").returns(TypeRef::class("Customer")))
                .method(MethodDescriptor::new("getProduct").returns(TypeRef::class("Product"))),
        )
        .with(ClassDescriptor::new("Product"))
        .with(ClassDescriptor::new("Customer$Enhanced$Proxy").origin(ClassOrigin::Proxy {
            target: ClassName::new("Customer"),
        }))
}

fn loader() -> SpecificationLoader {
    SpecificationLoader::new(Arc::new(crm()), ProgrammingModel::new())
}

/// Counts class builds
struct CountingFactory {
    runs: Arc<AtomicUsize>,
}

static COUNTING: FactoryMeta = FactoryMeta {
    name: "counting",
    description: "Counts class builds",
    feature_types: FeatureTypes::CLASS,
};

impl FacetFactory for CountingFactory {
    fn meta(&self) -> &FactoryMeta {
        &COUNTING
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) -> Result<(), FacetFactoryError> {
        if ctx.class.name.as_str() == "Customer" {
            self.runs.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[test]
fn test_concurrent_first_load_builds_once() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut model = ProgrammingModel::new();
    model.add(ProcessingPhase::ObjectNaming, Arc::new(CountingFactory { runs: runs.clone() }));
    let loader = SpecificationLoader::new(Arc::new(crm()), model);

    let specs: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let loader = &loader;
                s.spawn(move || {
                    let class = if i % 2 == 0 { "Customer" } else { "Customer$Enhanced$Proxy" };
                    loader.load(&ClassName::new(class)).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    for spec in &specs[1..] {
        assert!(Arc::ptr_eq(&specs[0], spec));
    }
}

#[test]
fn test_concurrent_loads_of_different_classes() {
    let loader = loader();
    std::thread::scope(|s| {
        for class in ["Customer", "Order", "Product"] {
            let loader = &loader;
            s.spawn(move || {
                for _ in 0..50 {
                    loader.load(&ClassName::new(class)).unwrap();
                }
            });
        }
    });
    assert!(loader.load_all().is_empty());
    assert_eq!(loader.specifications().len(), loader.len());
}
