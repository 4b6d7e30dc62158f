use crate::common::{another_test_po, no_overrides, Counter, Sequence, Uniform};
use parameterized::{ClassDef, ParamDecl, Parameterized, ProviderRef, Value};

#[test]
fn test_provider_yields_fresh_values() {
    let class = another_test_po();
    let po = Parameterized::new(&class, no_overrides()).unwrap();
    po.set("x", ProviderRef::new(Counter::default())).unwrap();

    assert_eq!(po.get("x").unwrap(), Value::Int(0));
    assert_eq!(po.get("x").unwrap(), Value::Int(1));
    assert_eq!(po.get("x").unwrap(), Value::Int(2));
}

#[test]
fn test_provider_on_class_default() {
    let class = another_test_po();
    class
        .set_default("x", ProviderRef::new(Counter::default()))
        .unwrap();
    let a = Parameterized::new(&class, no_overrides()).unwrap();
    let b = Parameterized::new(&class, no_overrides()).unwrap();

    assert_eq!(a.get("x").unwrap(), Value::Int(0));
    assert_eq!(b.get("x").unwrap(), Value::Int(1));
    assert_eq!(class.get("x").unwrap(), Value::Int(2));
}

#[test]
fn test_bounds_checked_on_read_not_assignment() {
    let class = another_test_po();
    let po = Parameterized::new(&class, no_overrides()).unwrap();
    let provider = ProviderRef::new(Sequence::new(vec![Value::Int(5), Value::Int(150)]));

    po.set("y", provider.clone()).unwrap();
    assert_eq!(po.get("y").unwrap(), Value::Int(5));
    assert!(po.get("y").unwrap_err().is_validation());
    assert!(po.value_provider("y").unwrap().unwrap().ptr_eq(&provider));
}

#[test]
fn test_provider_bounds_respected() {
    let class = another_test_po();
    let po = Parameterized::new(&class, no_overrides()).unwrap();
    po.set("y", ProviderRef::new(Uniform::new(42, 0.0, 20.0)))
        .unwrap();

    for _ in 0..100 {
        let y = po.get("y").unwrap().as_f64().unwrap();
        assert!((0.0..=20.0).contains(&y));
    }
}

#[test]
fn test_inspect_returns_provider_unresolved() {
    let class = another_test_po();
    let po = Parameterized::new(&class, no_overrides()).unwrap();
    let provider = ProviderRef::new(Counter::default());
    po.set("x", provider.clone()).unwrap();

    let stored = po.inspect_value("x").unwrap();
    assert!(stored.as_provider().unwrap().ptr_eq(&provider));
    assert_eq!(po.get("x").unwrap(), Value::Int(0));
}

#[test]
fn test_non_dynamic_parameter_rejects_provider() {
    let class = ClassDef::builder("Static")
        .param(ParamDecl::number("z", 1).dynamic(false))
        .param(ParamDecl::string("label", "a"))
        .build()
        .unwrap();
    let po = Parameterized::new(&class, no_overrides()).unwrap();
    assert!(po
        .set("z", ProviderRef::new(Counter::default()))
        .unwrap_err()
        .is_validation());
    assert!(po
        .set("label", ProviderRef::new(Counter::default()))
        .unwrap_err()
        .is_validation());
}

#[test]
fn test_provider_output_type_checked() {
    let class = ClassDef::builder("Typed")
        .param(ParamDecl::integer("n", 0))
        .build()
        .unwrap();
    let po = Parameterized::new(&class, no_overrides()).unwrap();
    po.set("n", ProviderRef::new(Sequence::new(vec![Value::Float(0.5)])))
        .unwrap();
    assert!(po.get("n").unwrap_err().is_validation());
}
