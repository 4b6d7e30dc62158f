use crate::common::{no_overrides, test_po};
use parameterized::{ClassDef, ParamDecl, Parameterized, Value};

#[test]
fn test_constant_settable_once_at_construction() {
    let class = test_po();
    let po = Parameterized::new(&class, [("const", 17)]).unwrap();
    assert_eq!(po.get("const").unwrap(), Value::Int(17));

    let err = po.set("const", 10).unwrap_err();
    assert!(err.is_immutability());
    assert_eq!(po.get("const").unwrap(), Value::Int(17));
}

#[test]
fn test_constant_class_level_set_reaches_new_instances() {
    let class = test_po();
    let before = Parameterized::new(&class, no_overrides()).unwrap();
    class.set_default("const", 9).unwrap();

    let after = Parameterized::new(&class, no_overrides()).unwrap();
    assert_eq!(after.get("const").unwrap(), Value::Int(9));
    // Not stored on the instance, so the earlier one reads the new default too
    assert_eq!(before.get("const").unwrap(), Value::Int(9));
}

#[test]
fn test_readonly_rejects_every_write() {
    let class = test_po();
    assert!(Parameterized::new(&class, [("ro", 20)])
        .unwrap_err()
        .is_immutability());

    let po = Parameterized::new(&class, no_overrides()).unwrap();
    assert!(po.set("ro", "Bye").unwrap_err().is_immutability());
    assert!(po.set("ro2", 2).unwrap_err().is_immutability());
    assert!(class.set_default("ro", "Bye").unwrap_err().is_immutability());

    assert_eq!(po.get("ro").unwrap(), Value::Str("Hello".into()));
    assert!(class.param("ro").unwrap().constant());
}

#[test]
fn test_readonly_is_never_instantiated() {
    let class = ClassDef::builder("ReadonlyList")
        .param(
            ParamDecl::new("fixed", Value::list([1]))
                .readonly(true)
                .instantiate(true),
        )
        .build()
        .unwrap();
    assert!(!class.param("fixed").unwrap().instantiate());

    let po = Parameterized::new(&class, no_overrides()).unwrap();
    assert!(po
        .get("fixed")
        .unwrap()
        .same_identity(&class.default_value("fixed").unwrap()));
}

#[test]
fn test_constant_inherited_by_subclass() {
    let base = test_po();
    let sub = ClassDef::builder("SubPO").parent(&base).build().unwrap();
    let po = Parameterized::new(&sub, [("const", 3)]).unwrap();
    assert!(po.set("const", 4).unwrap_err().is_immutability());

    sub.set_default("const", 5).unwrap();
    assert_eq!(sub.default_value("const").unwrap(), Value::Int(5));
    assert_eq!(base.default_value("const").unwrap(), Value::Int(1));
}
