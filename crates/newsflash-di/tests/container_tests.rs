//! Unit tests for the service container
use std::sync::Arc;

use newsflash_di::{Container, ContainerBuilder, DiError};

#[derive(Debug, PartialEq)]
struct TestService {
    value: i32,
}

#[test]
fn singleton_resolves_to_the_same_instance() {
    let container = Container::new();

    container
        .register(|_| Ok(Arc::new(TestService { value: 42 })))
        .unwrap();

    let first = container.resolve::<TestService>().unwrap();
    let second = container.resolve::<TestService>().unwrap();

    assert_eq!(first.value, 42);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn transient_resolves_to_fresh_instances() {
    let container = Container::new();

    container
        .register_transient(|_| Ok(Arc::new(TestService { value: 42 })))
        .unwrap();

    let first = container.resolve::<TestService>().unwrap();
    let second = container.resolve::<TestService>().unwrap();

    assert_eq!(first.value, second.value);
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn resolving_an_unknown_service_fails() {
    let container = Container::new();

    let result = container.resolve::<TestService>();
    assert!(matches!(result, Err(DiError::NotRegistered { .. })));
}

#[test]
fn double_registration_fails() {
    let container = Container::new();

    container
        .register(|_| Ok(Arc::new(TestService { value: 42 })))
        .unwrap();

    let result = container.register(|_| Ok(Arc::new(TestService { value: 24 })));
    assert!(matches!(result, Err(DiError::AlreadyRegistered { .. })));
}

#[test]
fn registration_is_observable() {
    let container = Container::new();
    assert!(!container.is_registered::<TestService>());
    assert_eq!(container.service_count(), 0);

    container
        .register(|_| Ok(Arc::new(TestService { value: 1 })))
        .unwrap();

    assert!(container.is_registered::<TestService>());
    assert_eq!(container.service_count(), 1);
}

#[test]
fn builder_assembles_a_container() {
    let container = ContainerBuilder::new()
        .register(|_| Ok(Arc::new(TestService { value: 42 })))
        .unwrap()
        .build();

    let service = container.resolve::<TestService>().unwrap();
    assert_eq!(service.value, 42);
}
