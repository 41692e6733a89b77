//! Tests for the field injection pass
//!
//! Exercises `#[derive(Injectable)]` with named and by-type annotations,
//! partial resolution, idempotence, re-binding behavior, and the
//! end-to-end wiring scenario.

use std::sync::Arc;

use wirebox::{Dep, Injectable, Registry};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("wirebox=debug")
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Default, Injectable)]
struct Stu {
    #[inject("stu_name")]
    name: Dep<String>,
    #[inject("stu_age")]
    age: Dep<u32>,
    #[inject("stu_status")]
    status: Dep<bool>,
}

#[derive(Clone, Default, Injectable)]
struct Person {
    #[inject]
    stu: Dep<Stu>,
}

#[test]
fn end_to_end_wiring() {
    init_tracing();
    let registry = Registry::new();

    registry.apply(Arc::new(Stu::default()));
    registry.apply(Arc::new(Person::default()));
    registry.set("stu_name", Arc::new("XXXX".to_string()));
    registry.set("stu_age", Arc::new(45u32));
    registry.set("stu_status", Arc::new(true));

    registry.inject();

    let person: Person = registry.service::<Person>().expect("Person registered");
    let stu = person.stu.get().expect("Stu resolved by type name");
    assert_eq!(*stu.name.get().expect("name resolved"), "XXXX");
    assert_eq!(*stu.age.get().expect("age resolved"), 45);
    assert!(*stu.status.get().expect("status resolved"));
}

#[test]
fn apply_keys_by_fully_qualified_type_name() {
    let registry = Registry::new();
    registry.apply(Arc::new(Stu::default()));

    assert!(registry.contains(std::any::type_name::<Stu>()));
}

#[test]
fn partial_resolution_leaves_missing_fields_unresolved() {
    init_tracing();
    let registry = Registry::new();
    registry.apply(Arc::new(Stu::default()));
    registry.set("stu_name", Arc::new("only-name".to_string()));

    registry.inject();

    let stu = registry.service::<Stu>().expect("Stu registered");
    assert_eq!(*stu.name.get().expect("registered dependency resolved"), "only-name");
    assert!(stu.age.get().is_none(), "missing dependency stays at zero value");
    assert!(stu.status.get().is_none());
}

#[test]
fn inject_is_idempotent_without_intervening_registration() {
    let registry = Registry::new();
    registry.apply(Arc::new(Stu::default()));
    registry.set("stu_name", Arc::new("once".to_string()));

    registry.inject();
    let first = registry
        .service::<Stu>()
        .expect("Stu registered")
        .name
        .get()
        .expect("resolved");

    registry.inject();
    let second = registry
        .service::<Stu>()
        .expect("Stu registered")
        .name
        .get()
        .expect("still resolved");

    assert!(Arc::ptr_eq(&first, &second), "same handle after a second pass");
}

#[test]
fn inject_retries_previously_missing_dependencies() {
    let registry = Registry::new();
    registry.apply(Arc::new(Stu::default()));

    registry.inject();
    assert!(
        registry.service::<Stu>().expect("registered").age.get().is_none(),
        "nothing to resolve yet"
    );

    registry.set("stu_age", Arc::new(30u32));
    registry.inject();
    assert_eq!(
        *registry
            .service::<Stu>()
            .expect("registered")
            .age
            .get()
            .expect("resolved on the second pass"),
        30
    );
}

#[test]
fn inject_picks_up_replaced_bindings() {
    let registry = Registry::new();
    registry.apply(Arc::new(Stu::default()));
    registry.set("stu_name", Arc::new("before".to_string()));
    registry.inject();

    registry.set("stu_name", Arc::new("after".to_string()));
    registry.inject();

    let stu = registry.service::<Stu>().expect("registered");
    assert_eq!(*stu.name.get().expect("resolved"), "after");
}

#[test]
fn type_mismatch_during_injection_is_non_fatal() {
    init_tracing();
    let registry = Registry::new();
    registry.apply(Arc::new(Stu::default()));
    // Wrong concrete type under the annotated key.
    registry.set("stu_age", Arc::new("not-a-number".to_string()));

    registry.inject();

    let stu = registry.service::<Stu>().expect("registered");
    assert!(stu.age.get().is_none(), "mismatched field stays unresolved");
}

#[test]
fn register_service_applies_and_injects_in_one_call() {
    let registry = Registry::new();
    registry.set("stu_name", Arc::new("wired".to_string()));
    registry.set("stu_age", Arc::new(21u32));
    registry.set("stu_status", Arc::new(false));

    registry.register_service(Arc::new(Stu::default()));

    let stu = registry.service::<Stu>().expect("registered");
    assert_eq!(*stu.name.get().expect("resolved"), "wired");
    assert_eq!(*stu.age.get().expect("resolved"), 21);
    assert!(!*stu.status.get().expect("resolved"));
}

#[derive(Clone, Default, Injectable)]
struct Classroom {
    #[inject("homeroom_teacher")]
    teacher: Dep<Stu>,
}

#[test]
fn named_registration_disambiguates_instances() {
    let registry = Registry::new();

    let homeroom = Arc::new(Stu::default());
    registry.apply_with_name("homeroom_teacher", homeroom.clone());
    registry.apply_with_name("substitute_teacher", Arc::new(Stu::default()));
    registry.register_service_with_name("classroom", Arc::new(Classroom::default()));

    let classroom: Classroom = registry
        .service_by_name::<Classroom>("classroom")
        .expect("named service registered");
    let teacher = classroom.teacher.get().expect("named dependency resolved");
    assert!(Arc::ptr_eq(&teacher, &homeroom), "resolved the named instance");
}

#[derive(Default, Injectable)]
struct Leaf;

#[test]
fn services_without_annotations_survive_the_pass() {
    let registry = Registry::new();
    registry.apply(Arc::new(Leaf));
    registry.inject();

    assert!(registry.contains(std::any::type_name::<Leaf>()));
}
