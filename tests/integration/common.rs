//! Shared fixtures: test providers and class hierarchies

use parameterized::{Bounds, ClassDef, ClassRef, ParamDecl, Value, ValueProvider};

/// Produces 0, 1, 2, ...
#[derive(Debug, Default)]
pub struct Counter {
    next: i64,
}

impl ValueProvider for Counter {
    fn next_value(&mut self) -> Value {
        let value = self.next;
        self.next += 1;
        Value::Int(value)
    }
}

/// Deterministic pseudo-random floats in `[lower, upper]`
#[derive(Debug)]
pub struct Uniform {
    state: u64,
    lower: f64,
    upper: f64,
}

impl Uniform {
    pub fn new(seed: u64, lower: f64, upper: f64) -> Self {
        Self {
            state: seed,
            lower,
            upper,
        }
    }
}

impl ValueProvider for Uniform {
    fn next_value(&mut self) -> Value {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let unit = (self.state >> 11) as f64 / (1u64 << 53) as f64;
        Value::Float(self.lower + unit * (self.upper - self.lower))
    }

    fn bounds(&self) -> Option<Bounds> {
        Some(Bounds::closed(self.lower, self.upper))
    }
}

/// Replays a fixed sequence, repeating the last value
#[derive(Debug)]
pub struct Sequence {
    values: Vec<Value>,
    pos: usize,
}

impl Sequence {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values, pos: 0 }
    }
}

impl ValueProvider for Sequence {
    fn next_value(&mut self) -> Value {
        let index = self.pos.min(self.values.len().saturating_sub(1));
        self.pos += 1;
        self.values.get(index).cloned().unwrap_or(Value::None)
    }
}

/// Class with one parameter of every flavor
pub fn test_po() -> ClassRef {
    ClassDef::builder("TestPO")
        .param(ParamDecl::new("inst", Value::list([1, 2, 3])).instantiate(true))
        .param(ParamDecl::new("notinst", Value::list([1, 2, 3])).instantiate(false))
        .param(ParamDecl::new("const", 1).constant(true))
        .param(ParamDecl::new("ro", "Hello").readonly(true))
        .param(ParamDecl::new("ro2", 1).readonly(true))
        .param(ParamDecl::number("dyn", 1).dynamic(true))
        .build()
        .unwrap()
}

/// Class with a bounded, provider-capable number
pub fn another_test_po() -> ClassRef {
    ClassDef::builder("AnotherTestPO")
        .param(ParamDecl::number("x", 300))
        .param(ParamDecl::number("y", 17).bounds(Bounds::closed(0.0, 20.0)))
        .build()
        .unwrap()
}

/// Class whose object-valued parameter is copied into each instance
pub fn holder(of: &ClassRef, default: Value) -> ClassRef {
    ClassDef::builder("Holder")
        .param(ParamDecl::object("held", default, of).instantiate(true))
        .build()
        .unwrap()
}

pub fn widget() -> ClassRef {
    ClassDef::builder("Widget")
        .param(ParamDecl::number("size", 10).bounds(Bounds::closed(0.0, 100.0)))
        .build()
        .unwrap()
}

pub fn no_overrides() -> Vec<(String, Value)> {
    Vec::new()
}
