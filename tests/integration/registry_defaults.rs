use crate::common::{another_test_po, no_overrides, widget};
use parameterized::{ClassDef, ParamDecl, Parameterized, Value};
use std::sync::Arc;

#[test]
fn test_widget_scenario() {
    let widget = widget();
    let w = Parameterized::new(&widget, no_overrides()).unwrap();
    assert!(w.set("size", 150).unwrap_err().is_validation());
    assert_eq!(w.get("size").unwrap(), Value::Int(10));

    let w2 = Parameterized::new(&widget, [("size", 50)]).unwrap();
    widget.set_default("size", 20).unwrap();
    let w3 = Parameterized::new(&widget, no_overrides()).unwrap();

    assert_eq!(w3.get("size").unwrap(), Value::Int(20));
    assert_eq!(w2.get("size").unwrap(), Value::Int(50));
    assert!(widget.set_default("size", -1).unwrap_err().is_validation());
}

#[test]
fn test_registry_identity_stable() {
    let class = another_test_po();
    let first = class.params();
    let second = class.params();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_subclass_default_does_not_leak_to_parent() {
    let base = another_test_po();
    let sub = ClassDef::builder("SubPO").parent(&base).build().unwrap();
    let sub_registry = sub.params();

    sub.set_default("x", 1).unwrap();
    assert_eq!(sub.get("x").unwrap(), Value::Int(1));
    assert_eq!(base.get("x").unwrap(), Value::Int(300));
    assert!(!Arc::ptr_eq(&sub_registry, &sub.params()));
}

#[test]
fn test_parent_default_change_reaches_subclass() {
    let base = another_test_po();
    let sub = ClassDef::builder("SubPO").parent(&base).build().unwrap();
    base.set_default("x", 5).unwrap();
    let po = Parameterized::new(&sub, no_overrides()).unwrap();
    assert_eq!(po.get("x").unwrap(), Value::Int(5));
}

#[test]
fn test_object_parameter_class_filter() {
    let base = another_test_po();
    let sub = ClassDef::builder("SubPO").parent(&base).build().unwrap();
    let unrelated = ClassDef::builder("Unrelated").build().unwrap();
    let owner = ClassDef::builder("Owner")
        .param(ParamDecl::object("target", Value::None, &base))
        .build()
        .unwrap();

    let po = Parameterized::new(&owner, no_overrides()).unwrap();
    po.set("target", Parameterized::with_defaults(&sub)).unwrap();
    assert!(po
        .set("target", Parameterized::with_defaults(&unrelated))
        .unwrap_err()
        .is_validation());
    po.set("target", Value::None).unwrap();
}

#[test]
fn test_duplicate_declaration_rejected() {
    let result = ClassDef::builder("Twice")
        .param(ParamDecl::new("a", 1))
        .param(ParamDecl::new("a", 2))
        .build();
    assert!(result.unwrap_err().is_validation());
}

#[test]
fn test_invalid_default_rejected() {
    let result = ClassDef::builder("Broken")
        .param(ParamDecl::integer("n", "three"))
        .build();
    assert!(result.unwrap_err().is_validation());
}
