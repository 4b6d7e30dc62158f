//! Parameter Values
//!
//! Dynamic values stored in parameters. Scalars are plain data; lists, objects,
//! and providers are handles with reference identity, so cloning a [`Value`]
//! shares the underlying object and [`Value::deep_copy`] is the only way to get
//! an exclusively owned one.

use crate::instance::Parameterized;
use crate::provider::ProviderRef;
use parking_lot::RwLock;
use serde::de::Deserializer;
use serde::ser::{Error as _, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A parameter value
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Mutable list shared by reference
    List(SharedList),
    /// Parameterized instance shared by reference
    Object(Parameterized),
    /// Value provider, resolved on read by dynamic parameters
    Provider(ProviderRef),
}

impl Value {
    /// Build a shared list value
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(SharedList::new(items.into_iter().map(Into::into).collect()))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, Value::Provider(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of `Int` and `Float` values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&SharedList> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Parameterized> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_provider(&self) -> Option<&ProviderRef> {
        match self {
            Value::Provider(p) => Some(p),
            _ => None,
        }
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Provider(_) => "provider",
        }
    }

    /// Whether two values refer to the same underlying object.
    ///
    /// Scalars have no identity and compare by value.
    pub fn same_identity(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Provider(a), Value::Provider(b)) => a.ptr_eq(b),
            (Value::List(_), _) | (Value::Object(_), _) | (Value::Provider(_), _) => false,
            (a, b) => a == b,
        }
    }

    /// Exclusively owned copy.
    ///
    /// Lists are copied recursively and objects copy their own value mapping.
    /// Providers stay shared: their resolution state is never duplicated.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::List(list) => Value::List(list.deep_copy()),
            Value::Object(obj) => Value::Object(obj.deep_copy()),
            other => other.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                self.as_f64() == other.as_f64()
            }
            (Value::List(a), Value::List(b)) => a.ptr_eq(b) || a.to_vec() == b.to_vec(),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Provider(a), Value::Provider(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(list) => f.debug_list().entries(list.to_vec()).finish(),
            Value::Object(obj) => write!(f, "<{} instance>", obj.class().name()),
            Value::Provider(p) => write!(f, "{:?}", p),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(SharedList::new(items))
    }
}

impl From<SharedList> for Value {
    fn from(list: SharedList) -> Self {
        Value::List(list)
    }
}

impl From<Parameterized> for Value {
    fn from(obj: Parameterized) -> Self {
        Value::Object(obj)
    }
}

impl From<ProviderRef> for Value {
    fn from(p: ProviderRef) -> Self {
        Value::Provider(p)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::None)
    }
}

/// Mutable list with reference identity
#[derive(Clone, Default)]
pub struct SharedList {
    items: Arc<RwLock<Vec<Value>>>,
}

impl SharedList {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.read().get(index).cloned()
    }

    /// Replace the item at `index` in place, returning the previous item
    pub fn set(&self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let mut items = self.items.write();
        let slot = items.get_mut(index)?;
        Some(std::mem::replace(slot, value.into()))
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.items.write().push(value.into());
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.items.read().clone()
    }

    pub fn ptr_eq(&self, other: &SharedList) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    pub fn deep_copy(&self) -> SharedList {
        let copied = self.items.read().iter().map(Value::deep_copy).collect();
        SharedList::new(copied)
    }
}

impl fmt::Debug for SharedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}

// Only plain data crosses the persistence boundary; objects and providers
// have process-local identity.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(list) => {
                let items = list.to_vec();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in &items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(obj) => Err(S::Error::custom(format!(
                "cannot serialize {} instance by value",
                obj.class().name()
            ))),
            Value::Provider(_) => Err(S::Error::custom("cannot serialize a value provider")),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlainValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<PlainValue>),
}

impl From<PlainValue> for Value {
    fn from(plain: PlainValue) -> Self {
        match plain {
            PlainValue::None => Value::None,
            PlainValue::Bool(b) => Value::Bool(b),
            PlainValue::Int(i) => Value::Int(i),
            PlainValue::Float(x) => Value::Float(x),
            PlainValue::Str(s) => Value::Str(s),
            PlainValue::List(items) => Value::list(items),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PlainValue::deserialize(deserializer).map(Value::from)
    }
}
