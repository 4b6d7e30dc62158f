use crate::common::{holder, no_overrides, test_po};
use parameterized::{ClassDef, ParamDecl, Parameterized, Value};

#[test]
fn test_instantiated_defaults_are_private() {
    let class = test_po();
    let a = Parameterized::new(&class, no_overrides()).unwrap();
    let b = Parameterized::new(&class, no_overrides()).unwrap();

    let a_inst = a.get("inst").unwrap();
    let b_inst = b.get("inst").unwrap();
    assert_eq!(a_inst, b_inst);
    assert!(!a_inst.same_identity(&b_inst));

    a_inst.as_list().unwrap().push(4);
    assert_eq!(a.get("inst").unwrap(), Value::list([1, 2, 3, 4]));
    assert_eq!(b.get("inst").unwrap(), Value::list([1, 2, 3]));
    assert_eq!(class.default_value("inst").unwrap(), Value::list([1, 2, 3]));
}

#[test]
fn test_non_instantiated_default_is_shared_until_reassigned() {
    let class = test_po();
    let a = Parameterized::new(&class, no_overrides()).unwrap();
    let b = Parameterized::new(&class, no_overrides()).unwrap();

    let shared = a.get("notinst").unwrap();
    assert!(shared.same_identity(&b.get("notinst").unwrap()));
    shared.as_list().unwrap().push(4);
    assert_eq!(b.get("notinst").unwrap(), Value::list([1, 2, 3, 4]));

    a.set("notinst", Value::list([9])).unwrap();
    assert!(!a.get("notinst").unwrap().same_identity(&b.get("notinst").unwrap()));
}

#[test]
fn test_object_default_is_deep_copied() {
    let inner = ClassDef::builder("Inner")
        .param(ParamDecl::new("items", Value::list([1])))
        .build()
        .unwrap();
    let prototype = Parameterized::new(&inner, [("name", "proto")]).unwrap();
    let class = holder(&inner, prototype.clone().into());

    let a = Parameterized::new(&class, no_overrides()).unwrap();
    let b = Parameterized::new(&class, no_overrides()).unwrap();
    let a_held = a.get("held").unwrap();
    let b_held = b.get("held").unwrap();
    let a_obj = a_held.as_object().unwrap();
    let b_obj = b_held.as_object().unwrap();

    assert!(!a_obj.ptr_eq(b_obj));
    assert!(!a_obj.ptr_eq(&prototype));
    assert_eq!(a_obj.name().unwrap(), "proto");

    a_obj.set("items", Value::list([2])).unwrap();
    assert_eq!(b_obj.get("items").unwrap(), Value::list([1]));
    assert_eq!(prototype.get("items").unwrap(), Value::list([1]));
}

#[test]
fn test_copied_object_still_shares_its_own_defaults() {
    let class = test_po();
    let prototype = Parameterized::new(&class, no_overrides()).unwrap();
    let outer = holder(&class, prototype.into());
    let po = Parameterized::new(&outer, no_overrides()).unwrap();
    let held = po.get("held").unwrap();

    class
        .default_value("notinst")
        .unwrap()
        .as_list()
        .unwrap()
        .set(1, 7);
    let notinst = held.as_object().unwrap().get("notinst").unwrap();
    assert_eq!(notinst, Value::list([1, 7, 3]));
}

#[test]
fn test_instantiate_sticks_through_redeclaration_and_grandchild() {
    let base = ClassDef::builder("Base")
        .param(ParamDecl::new("inst", Value::list([1, 2, 3])).instantiate(true))
        .build()
        .unwrap();
    let child = ClassDef::builder("Child")
        .parent(&base)
        .param(ParamDecl::new("inst", Value::list([4, 5])))
        .build()
        .unwrap();
    let grandchild = ClassDef::builder("GrandChild").parent(&child).build().unwrap();

    assert!(child.param("inst").unwrap().instantiate());
    assert!(grandchild.param("inst").unwrap().instantiate());

    let a = Parameterized::new(&grandchild, no_overrides()).unwrap();
    let b = Parameterized::new(&grandchild, no_overrides()).unwrap();
    assert_eq!(a.get("inst").unwrap(), Value::list([4, 5]));
    assert!(!a.get("inst").unwrap().same_identity(&b.get("inst").unwrap()));
}

#[test]
fn test_explicit_false_overrides_inherited_instantiate() {
    let base = ClassDef::builder("Base")
        .param(ParamDecl::new("inst", Value::list([1])).instantiate(true))
        .build()
        .unwrap();
    let child = ClassDef::builder("Child")
        .parent(&base)
        .param(ParamDecl::new("inst", Value::list([2])).instantiate(false))
        .build()
        .unwrap();

    let a = Parameterized::new(&child, no_overrides()).unwrap();
    assert!(a
        .get("inst")
        .unwrap()
        .same_identity(&child.default_value("inst").unwrap()));
}

#[test]
fn test_copy_taken_from_current_class_default() {
    let class = test_po();
    class.set_default("inst", Value::list([7])).unwrap();
    let po = Parameterized::new(&class, no_overrides()).unwrap();
    assert_eq!(po.get("inst").unwrap(), Value::list([7]));
}
