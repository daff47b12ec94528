//! Integration tests for the specification loader: cycles, canonical
//! classes and reset

use std::sync::Arc;

use domus_metamodel::{
    ClassDescriptor, ClassName, ClassOrigin, ClassRegistry, FeatureType, IntrospectionState,
    MethodDescriptor, ParamDescriptor, ProgrammingModel, SpecificationLoader, TypeRef,
};

fn crm() -> ClassRegistry {
    ClassRegistry::new()
        .with(
            ClassDescriptor::new("Customer")
                .method(MethodDescriptor::new("getName").returns(TypeRef::class("string")))
                .method(MethodDescriptor::new("getOrders").returns(TypeRef::collection("Order")))
                .method(
                    MethodDescriptor::new("placeOrder")
                        .param(ParamDescriptor::new("product", TypeRef::class("Product")))
                        .returns(TypeRef::class("Order")),
                ),
        )
        .with(
            ClassDescriptor::new("Order")
                .method(MethodDescriptor::new("getCustomer").returns(TypeRef::class("Customer"))),
        )
        .with(ClassDescriptor::new("Product"))
        .with(ClassDescriptor::new("Customer$Enhanced").origin(ClassOrigin::Enhanced {
            target: ClassName::new("Customer"),
        }))
        .with(ClassDescriptor::new("Customer$Enhanced$Proxy").origin(ClassOrigin::Proxy {
            target: ClassName::new("Customer$Enhanced"),
        }))
}

fn loader() -> SpecificationLoader {
    SpecificationLoader::new(Arc::new(crm()), ProgrammingModel::new())
}

#[test]
fn test_cyclic_references_resolve() {
    let loader = loader();
    let customer = loader.load(&ClassName::new("Customer")).unwrap();
    let orders = customer.member("orders").unwrap();
    assert_eq!(orders.feature_type(), FeatureType::Collection);

    let order_id = orders.type_spec().unwrap();
    assert_eq!(loader.state(order_id), Some(IntrospectionState::NotIntrospected));

    let order = loader.load_id(order_id).unwrap();
    let back = order.member("customer").unwrap().type_spec().unwrap();
    assert_eq!(back, customer.id());
    assert!(Arc::ptr_eq(&loader.load_id(back).unwrap(), &customer));
}

#[test]
fn test_parameter_types_are_registered() {
    let loader = loader();
    let customer = loader.load(&ClassName::new("Customer")).unwrap();
    let place = customer.member("placeOrder").unwrap();
    assert_eq!(place.feature_type(), FeatureType::Action);

    let product = place.parameters()[0].type_spec().unwrap();
    assert_eq!(loader.class_of(product), Some(ClassName::new("Product")));
    assert_eq!(loader.lookup(&ClassName::new("Product")), Some(product));
}

#[test]
fn test_wrapped_classes_share_canonical_spec() {
    let loader = loader();
    let direct = loader.load(&ClassName::new("Customer")).unwrap();
    let wrapped = loader.load(&ClassName::new("Customer$Enhanced$Proxy")).unwrap();
    assert!(Arc::ptr_eq(&direct, &wrapped));

    let canonicalizer = loader.canonicalizer();
    let once = canonicalizer
        .canonicalize(&ClassName::new("Customer$Enhanced$Proxy"))
        .unwrap();
    let twice = canonicalizer.canonicalize(&once).unwrap();
    assert_eq!(once, twice);
    assert_eq!(once.as_str(), "Customer");
}

#[test]
fn test_load_all_reaches_fixpoint() {
    let loader = loader();
    loader.register(&ClassName::new("Customer")).unwrap();
    let failures = loader.load_all();
    assert!(failures.is_empty());

    let mut classes: Vec<String> = loader
        .specifications()
        .iter()
        .map(|s| s.class().to_string())
        .collect();
    classes.sort();
    assert_eq!(classes, vec!["Customer", "Order", "Product", "string"]);
}

#[test]
fn test_reset_starts_new_generation() {
    let loader = loader();
    let before = loader.load(&ClassName::new("Customer")).unwrap();
    assert_eq!(loader.generation(), 0);

    loader.reset();
    assert_eq!(loader.generation(), 1);
    assert!(loader.is_empty());
    assert_eq!(loader.canonicalizer().memoized(), 0);

    let after = loader.load(&ClassName::new("Customer")).unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    // Specifications handed out earlier stay usable.
    assert!(before.member("name").is_some());
}
