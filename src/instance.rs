//! Instance Attribute Protocol
//!
//! A [`Parameterized`] instance stores only the values it owns: explicit
//! assignments, private copies of `instantiate` defaults, and pooled defaults
//! bound at construction. Any parameter without an entry reads the shared
//! class-level default. Every read and write goes through [`Parameterized::get`]
//! and [`Parameterized::set`].
//!
//! Reads of a value provider stored on a dynamic parameter return a freshly
//! produced value each time; the produced value is validated then, never when
//! the provider is assigned.

use crate::config;
use crate::error::ParamError;
use crate::provider::ProviderRef;
use crate::registry::{ClassRef, ParamRegistry};
use crate::shared;
use crate::spec::{validate, validate_produced, ParameterSpec};
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Handle to a parameterized instance.
///
/// Clones share the same instance; [`Parameterized::deep_copy`] makes a new one.
#[derive(Clone)]
pub struct Parameterized {
    inner: Arc<Inner>,
}

struct Inner {
    class: ClassRef,
    state: RwLock<InstanceState>,
}

pub(crate) struct InstanceState {
    /// Values owned by this instance; absent names read the class default
    pub(crate) values: IndexMap<String, Value>,
    /// Set once construction has finished; constants are frozen afterwards
    pub(crate) initialized: bool,
    /// Saved value mappings, most recent last
    pub(crate) saved: Vec<IndexMap<String, Value>>,
}

/// Persistable view of an instance: class name plus every stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    pub class_name: String,
    pub values: IndexMap<String, Value>,
}

impl Parameterized {
    /// Construct an instance, applying `overrides` as construction-time sets.
    ///
    /// Constants may be set here exactly once; readonly parameters reject any
    /// value. Unknown names are a lookup error.
    pub fn new<I, K, V>(class: &ClassRef, overrides: I) -> Result<Self, ParamError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let overrides: IndexMap<String, Value> = overrides
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let registry = class.params();
        if let Some(unknown) = overrides.keys().find(|k| !registry.contains(k)) {
            return Err(ParamError::Lookup(format!(
                "{} has no parameter '{}'",
                class.name(),
                unknown
            )));
        }

        let instance = Self::allocate(class);
        instance.bind_shared_defaults(&registry, &overrides);
        if !overrides.contains_key("name") {
            instance.assign_generated_name();
        }
        instance.set_params(overrides)?;
        instance.finish_construction();
        Ok(instance)
    }

    /// Construct an instance with every parameter at its default
    pub fn with_defaults(class: &ClassRef) -> Self {
        let instance = Self::allocate(class);
        instance.bind_shared_defaults(&class.params(), &IndexMap::new());
        instance.assign_generated_name();
        instance.finish_construction();
        instance
    }

    fn allocate(class: &ClassRef) -> Self {
        if class.is_abstract() {
            debug!(class = %class.name(), "Instantiating abstract class");
        }
        Self {
            inner: Arc::new(Inner {
                class: class.clone(),
                state: RwLock::new(InstanceState {
                    values: IndexMap::new(),
                    initialized: false,
                    saved: Vec::new(),
                }),
            }),
        }
    }

    /// Bind pooled copies of `instantiate` defaults while a pool is active
    fn bind_shared_defaults(&self, registry: &ParamRegistry, overrides: &IndexMap<String, Value>) {
        if !shared::is_active() {
            return;
        }
        for spec in registry.iter() {
            if !spec.instantiate() || overrides.contains_key(spec.name()) {
                continue;
            }
            if let Some(pooled) = shared::pooled_default(registry.class(), spec) {
                self.state_mut()
                    .values
                    .insert(spec.name().to_string(), pooled);
            }
        }
    }

    fn assign_generated_name(&self) {
        let Ok(spec) = self.inner.class.param("name") else {
            return;
        };
        if spec.readonly() || !spec.kind().accepts(&Value::Str(String::new())) {
            return;
        }
        let width = config::current().counter_width;
        let name = self.inner.class.next_instance_name(width);
        self.state_mut()
            .values
            .insert("name".to_string(), Value::Str(name));
    }

    fn finish_construction(&self) {
        self.state_mut().initialized = true;
    }

    pub(crate) fn state(&self) -> parking_lot::RwLockReadGuard<'_, InstanceState> {
        self.inner.state.read()
    }

    pub(crate) fn state_mut(&self) -> parking_lot::RwLockWriteGuard<'_, InstanceState> {
        self.inner.state.write()
    }

    pub fn class(&self) -> &ClassRef {
        &self.inner.class
    }

    /// The class's cached parameter registry
    pub fn params(&self) -> Arc<ParamRegistry> {
        self.inner.class.params()
    }

    /// Whether both handles refer to the same instance
    pub fn ptr_eq(&self, other: &Parameterized) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The instance's `name` parameter, if it holds a string
    pub fn name(&self) -> Option<String> {
        self.get("name")
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Read a parameter.
    pub fn get(&self, name: &str) -> Result<Value, ParamError> {
        let spec = self.inner.class.param(name)?;
        let stored = self.stored_for_read(&spec);
        resolve(&spec, stored)
    }

    fn stored_for_read(&self, spec: &ParameterSpec) -> Value {
        if spec.readonly() {
            return spec.default();
        }
        if let Some(value) = self.state().values.get(spec.name()) {
            return value.clone();
        }
        if spec.instantiate() {
            return self.materialize(spec);
        }
        spec.default()
    }

    /// Copy the current class default into this instance exclusively
    fn materialize(&self, spec: &ParameterSpec) -> Value {
        let default = spec.default();
        if default.is_provider() {
            return default;
        }
        let copy = default.deep_copy();

        let mut state = self.state_mut();
        // Another reader may have materialized it meanwhile
        if let Some(existing) = state.values.get(spec.name()) {
            return existing.clone();
        }
        state.values.insert(spec.name().to_string(), copy.clone());
        debug!(
            class = %self.inner.class.name(),
            param = spec.name(),
            "Materialized private copy of default"
        );
        copy
    }

    /// Stored value without resolving providers or materializing copies
    pub fn inspect_value(&self, name: &str) -> Result<Value, ParamError> {
        let spec = self.inner.class.param(name)?;
        if spec.readonly() {
            return Ok(spec.default());
        }
        Ok(self
            .state()
            .values
            .get(name)
            .cloned()
            .unwrap_or_else(|| spec.default()))
    }

    /// Provider currently stored for a parameter, if any
    pub fn value_provider(&self, name: &str) -> Result<Option<ProviderRef>, ParamError> {
        Ok(self.inspect_value(name)?.as_provider().cloned())
    }

    /// Assign a parameter on this instance.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), ParamError> {
        let value = value.into();
        let spec = self.inner.class.param(name)?;
        self.check_writable(&spec)?;
        validate(&value, &spec)?;
        self.state_mut().values.insert(name.to_string(), value);
        Ok(())
    }

    /// Assign several parameters; nothing is written unless all are valid
    pub fn set_params<I, K, V>(&self, pairs: I) -> Result<(), ParamError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut checked = Vec::new();
        for (name, value) in pairs {
            let name = name.into();
            let value = value.into();
            let spec = self.inner.class.param(&name)?;
            self.check_writable(&spec)?;
            validate(&value, &spec)?;
            checked.push((name, value));
        }
        let mut state = self.state_mut();
        for (name, value) in checked {
            state.values.insert(name, value);
        }
        Ok(())
    }

    fn check_writable(&self, spec: &ParameterSpec) -> Result<(), ParamError> {
        if spec.readonly() {
            return Err(ParamError::Immutability(format!(
                "Read-only parameter '{}' cannot be modified",
                spec.name()
            )));
        }
        if spec.constant() && self.state().initialized {
            return Err(ParamError::Immutability(format!(
                "Constant parameter '{}' cannot be modified after construction",
                spec.name()
            )));
        }
        Ok(())
    }

    /// Resolved values of every parameter, in declaration order
    pub fn param_values(&self) -> Result<Vec<(String, Value)>, ParamError> {
        let registry = self.params();
        registry
            .names()
            .map(|name| Ok((name.to_string(), self.get(name)?)))
            .collect()
    }

    /// New instance owning deep copies of this instance's own values
    pub fn deep_copy(&self) -> Parameterized {
        let values = self
            .state()
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.deep_copy()))
            .collect();
        Parameterized {
            inner: Arc::new(Inner {
                class: self.inner.class.clone(),
                state: RwLock::new(InstanceState {
                    values,
                    initialized: true,
                    saved: Vec::new(),
                }),
            }),
        }
    }

    /// Copies of the stored value of every parameter, for external persistence.
    ///
    /// Providers stay shared; everything else is detached from the instance
    /// and from class defaults.
    pub fn snapshot(&self) -> Result<InstanceSnapshot, ParamError> {
        let registry = self.params();
        let values = registry
            .names()
            .map(|name| Ok((name.to_string(), self.inspect_value(name)?.deep_copy())))
            .collect::<Result<_, ParamError>>()?;
        Ok(InstanceSnapshot {
            class_name: self.inner.class.name().to_string(),
            values,
        })
    }

    /// Rebuild an instance from a snapshot taken of an instance of `class`.
    ///
    /// Constants take the snapshot's values; readonly entries are skipped since
    /// they always read the class default. The instance owns copies, so it never
    /// shares a value with the snapshot or a class default.
    pub fn restore(class: &ClassRef, snapshot: &InstanceSnapshot) -> Result<Self, ParamError> {
        if snapshot.class_name != class.name() {
            return Err(ParamError::Validation(format!(
                "Snapshot of {} cannot restore an instance of {}",
                snapshot.class_name,
                class.name()
            )));
        }
        let instance = Self::allocate(class);
        let mut restored = IndexMap::new();
        for (name, value) in &snapshot.values {
            let spec = class.param(name)?;
            if spec.readonly() {
                continue;
            }
            validate(value, &spec)?;
            restored.insert(name.clone(), value.deep_copy());
        }
        {
            let mut state = instance.state_mut();
            state.values = restored;
            state.initialized = true;
        }
        Ok(instance)
    }
}

/// Produce the readable value for a stored value
pub(crate) fn resolve(spec: &ParameterSpec, stored: Value) -> Result<Value, ParamError> {
    match stored {
        Value::Provider(provider) if spec.is_dynamic() => {
            let value = provider.produce();
            trace!(param = spec.name(), value = ?value, "Resolved value provider");
            validate_produced(&value, spec, provider.bounds())?;
            Ok(value)
        }
        other => Ok(other),
    }
}

impl fmt::Debug for Parameterized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Parameterized")
            .field("class", &self.inner.class.name())
            .field("values", &state.values)
            .finish()
    }
}
