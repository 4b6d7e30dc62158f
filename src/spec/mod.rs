//! Parameter Specifications
//!
//! A [`ParameterSpec`] is the metadata for one declared parameter: its default,
//! kind, flags, bounds, and the class that declared it. Specs are created from
//! a [`ParamDecl`] when a class is built and are immutable afterwards, except
//! for the stored default, which a class-level set rewrites in place.

mod bounds;
mod validation;

pub use bounds::Bounds;
pub use validation::{check_bounds, validate};
pub(crate) use validation::validate_produced;

use crate::registry::{ClassId, ClassRef};
use crate::value::Value;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Kind of value a parameter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    Any,
    Number,
    Integer,
    Boolean,
    String,
    List,
    Object,
}

impl ParamKind {
    /// Whether a concrete (non-none, non-provider) value has this kind
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamKind::Any => true,
            ParamKind::Number => matches!(value, Value::Int(_) | Value::Float(_)),
            ParamKind::Integer => matches!(value, Value::Int(_)),
            ParamKind::Boolean => matches!(value, Value::Bool(_)),
            ParamKind::String => matches!(value, Value::Str(_)),
            ParamKind::List => matches!(value, Value::List(_)),
            ParamKind::Object => matches!(value, Value::Object(_)),
        }
    }

    /// Numeric kinds accept value providers unless told otherwise
    fn dynamic_by_default(&self) -> bool {
        matches!(self, ParamKind::Number | ParamKind::Integer)
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ParamKind::Any => "any",
            ParamKind::Number => "number",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
            ParamKind::String => "string",
            ParamKind::List => "list",
            ParamKind::Object => "object",
        }
    }
}

/// Declaration of one parameter, before it belongs to a class
#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub(crate) name: String,
    pub(crate) default: Value,
    pub(crate) kind: ParamKind,
    pub(crate) constant: bool,
    pub(crate) readonly: bool,
    pub(crate) instantiate: Option<bool>,
    pub(crate) allow_none: bool,
    pub(crate) dynamic: Option<bool>,
    pub(crate) bounds: Option<Bounds>,
    pub(crate) class_filter: Option<ClassRef>,
    pub(crate) doc: Option<String>,
}

impl ParamDecl {
    /// Untyped parameter accepting any value
    pub fn new(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            kind: ParamKind::Any,
            constant: false,
            readonly: false,
            instantiate: None,
            allow_none: false,
            dynamic: None,
            bounds: None,
            class_filter: None,
            doc: None,
        }
    }

    pub fn number(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::new(name, default).kind(ParamKind::Number)
    }

    pub fn integer(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::new(name, default).kind(ParamKind::Integer)
    }

    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Self::new(name, default).kind(ParamKind::Boolean)
    }

    pub fn string(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::new(name, default).kind(ParamKind::String)
    }

    pub fn list(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::new(name, default).kind(ParamKind::List)
    }

    /// Object parameter; values must be instances of `class` or its subclasses
    pub fn object(name: impl Into<String>, default: impl Into<Value>, class: &ClassRef) -> Self {
        let mut decl = Self::new(name, default).kind(ParamKind::Object);
        decl.class_filter = Some(class.clone());
        decl
    }

    pub fn kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn constant(mut self, constant: bool) -> Self {
        self.constant = constant;
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Copy the default into each instance on first access.
    ///
    /// Leaving this unset inherits the nearest ancestor's declaration.
    pub fn instantiate(mut self, instantiate: bool) -> Self {
        self.instantiate = Some(instantiate);
        self
    }

    pub fn allow_none(mut self, allow_none: bool) -> Self {
        self.allow_none = allow_none;
        self
    }

    /// Accept value providers, resolved on every read
    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = Some(dynamic);
        self
    }

    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_spec(self, owner: ClassId, owner_name: &str) -> ParameterSpec {
        let allow_none = self.allow_none || self.default.is_none();
        ParameterSpec {
            dynamic: self.dynamic.unwrap_or_else(|| self.kind.dynamic_by_default()),
            name: self.name,
            kind: self.kind,
            default: RwLock::new(self.default),
            constant: self.constant,
            readonly: self.readonly,
            instantiate: self.instantiate,
            inherited_instantiate: OnceLock::new(),
            allow_none,
            bounds: self.bounds,
            class_filter: self.class_filter,
            doc: self.doc,
            owner,
            owner_name: owner_name.to_string(),
        }
    }
}

/// Metadata for one declared parameter
pub struct ParameterSpec {
    name: String,
    kind: ParamKind,
    default: RwLock<Value>,
    constant: bool,
    readonly: bool,
    instantiate: Option<bool>,
    /// Effective flag of the ancestor declaration this spec replaces
    inherited_instantiate: OnceLock<bool>,
    allow_none: bool,
    dynamic: bool,
    bounds: Option<Bounds>,
    class_filter: Option<ClassRef>,
    doc: Option<String>,
    owner: ClassId,
    owner_name: String,
}

impl ParameterSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Current class-level default (a handle, not a copy)
    pub fn default(&self) -> Value {
        self.default.read().clone()
    }

    /// Readonly parameters are always constant
    pub fn constant(&self) -> bool {
        self.constant || self.readonly
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    /// Effective instantiate flag.
    ///
    /// Readonly parameters are never copied. An unset declaration takes the
    /// effective flag of the ancestor declaration it replaces.
    pub fn instantiate(&self) -> bool {
        if self.readonly {
            return false;
        }
        self.instantiate
            .unwrap_or_else(|| self.inherited_instantiate.get().copied().unwrap_or(false))
    }

    pub fn allow_none(&self) -> bool {
        self.allow_none
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn class_filter(&self) -> Option<&ClassRef> {
        self.class_filter.as_ref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Class that declared this spec
    pub fn owner(&self) -> ClassId {
        self.owner
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub(crate) fn replace_default(&self, value: Value) -> Value {
        std::mem::replace(&mut *self.default.write(), value)
    }

    /// Record the ancestor's effective flag; the first aggregation wins and
    /// later ones compute the same value.
    pub(crate) fn inherit_instantiate(&self, inherited: bool) {
        let _ = self.inherited_instantiate.set(inherited);
    }

    /// Copy of this spec declared on another class with a new default
    pub(crate) fn redeclare(&self, owner: ClassId, owner_name: &str, default: Value) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            default: RwLock::new(default),
            constant: self.constant,
            readonly: self.readonly,
            instantiate: Some(self.instantiate()),
            inherited_instantiate: OnceLock::new(),
            allow_none: self.allow_none,
            dynamic: self.dynamic,
            bounds: self.bounds,
            class_filter: self.class_filter.clone(),
            doc: self.doc.clone(),
            owner,
            owner_name: owner_name.to_string(),
        }
    }
}

impl fmt::Debug for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default())
            .field("constant", &self.constant())
            .field("readonly", &self.readonly)
            .field("instantiate", &self.instantiate())
            .field("allow_none", &self.allow_none)
            .field("dynamic", &self.dynamic)
            .field("bounds", &self.bounds)
            .field("owner", &self.owner_name)
            .finish()
    }
}
