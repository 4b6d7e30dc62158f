use crate::common::{no_overrides, test_po, Counter};
use parameterized::{ParamError, Parameterized, ProviderRef, Value};

#[test]
fn test_round_trip_restores_every_attribute() {
    let class = test_po();
    let po = Parameterized::new(&class, [("name", "before")]).unwrap();
    let provider = ProviderRef::new(Counter::default());
    po.set("dyn", provider.clone()).unwrap();
    let inst = po.get("inst").unwrap();
    let before = po.snapshot().unwrap();

    po.state_push();
    po.set("name", "after").unwrap();
    po.set("dyn", 5).unwrap();
    po.set("inst", Value::list([0])).unwrap();
    po.set("notinst", Value::list([9])).unwrap();
    po.state_pop().unwrap();

    assert_eq!(po.snapshot().unwrap(), before);
    assert!(po.value_provider("dyn").unwrap().unwrap().ptr_eq(&provider));
    assert!(po.get("inst").unwrap().same_identity(&inst));
}

#[test]
fn test_provider_progress_is_not_rewound() {
    let class = test_po();
    let po = Parameterized::new(&class, no_overrides()).unwrap();
    po.set("dyn", ProviderRef::new(Counter::default())).unwrap();
    assert_eq!(po.get("dyn").unwrap(), Value::Int(0));

    po.state_push();
    assert_eq!(po.get("dyn").unwrap(), Value::Int(1));
    po.state_pop().unwrap();
    assert_eq!(po.get("dyn").unwrap(), Value::Int(2));
}

#[test]
fn test_nested_push_pop() {
    let class = test_po();
    let po = Parameterized::new(&class, no_overrides()).unwrap();
    po.set("dyn", 1).unwrap();
    po.state_push();
    po.set("dyn", 2).unwrap();
    po.state_push();
    po.set("dyn", 3).unwrap();
    assert_eq!(po.state_depth(), 2);

    po.state_pop().unwrap();
    assert_eq!(po.get("dyn").unwrap(), Value::Int(2));
    po.state_pop().unwrap();
    assert_eq!(po.get("dyn").unwrap(), Value::Int(1));
    assert!(matches!(po.state_pop(), Err(ParamError::StackUnderflow(_))));
    assert_eq!(po.get("dyn").unwrap(), Value::Int(1));
}
