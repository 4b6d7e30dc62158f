//! Parameterized Functions
//!
//! A [`ParameterizedFunction`] is a callable whose arguments are the
//! parameters of its class. Calling it on the type reads class defaults;
//! calling it through [`ParameterizedFunction::instance`] reads the cached
//! singleton's own values. Either way the call builds a one-shot
//! [`ParamOverrides`] view from the explicit keyword arguments and drops it
//! afterwards, so overrides never persist.

use crate::error::ParamError;
use crate::instance::{InstanceSnapshot, Parameterized};
use crate::overrides::ParamOverrides;
use crate::registry::ClassRef;
use crate::value::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Body of a parameterized function
pub type FunctionBody<T> = Arc<dyn Fn(&ParamOverrides<'_>) -> Result<T, ParamError> + Send + Sync>;

/// A callable whose declared parameters are its effective arguments
pub struct ParameterizedFunction<T> {
    class: ClassRef,
    body: FunctionBody<T>,
    singleton: OnceLock<Parameterized>,
}

impl<T> ParameterizedFunction<T> {
    pub fn new<F>(class: ClassRef, body: F) -> Self
    where
        F: Fn(&ParamOverrides<'_>) -> Result<T, ParamError> + Send + Sync + 'static,
    {
        Self {
            class,
            body: Arc::new(body),
            singleton: OnceLock::new(),
        }
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// Call with class defaults for every parameter not in `overrides`
    pub fn call<I, K, V>(&self, overrides: I) -> Result<T, ParamError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let view = ParamOverrides::new(&self.class, overrides)?;
        (self.body)(&view)
    }

    /// Call with class defaults only
    pub fn call_defaults(&self) -> Result<T, ParamError> {
        self.call(std::iter::empty::<(String, Value)>())
    }

    /// Class-level read
    pub fn get(&self, name: &str) -> Result<Value, ParamError> {
        self.class.get(name)
    }

    /// Class-level default change, persisting across calls
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), ParamError> {
        self.class.set_default(name, value)
    }

    /// The cached singleton instance, created with defaults on first use
    pub fn instance(&self) -> FunctionInstance<T> {
        let instance = self
            .singleton
            .get_or_init(|| Parameterized::with_defaults(&self.class))
            .clone();
        FunctionInstance {
            instance,
            body: self.body.clone(),
        }
    }

    /// Rebuild an instance from a persisted snapshot of one
    pub fn restore_instance(
        &self,
        snapshot: &InstanceSnapshot,
    ) -> Result<FunctionInstance<T>, ParamError> {
        Ok(FunctionInstance {
            instance: Parameterized::restore(&self.class, snapshot)?,
            body: self.body.clone(),
        })
    }
}

impl<T> fmt::Debug for ParameterizedFunction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterizedFunction")
            .field("class", &self.class.name())
            .field("singleton", &self.singleton.get().is_some())
            .finish()
    }
}

/// A parameterized function bound to one instance's values
pub struct FunctionInstance<T> {
    instance: Parameterized,
    body: FunctionBody<T>,
}

impl<T> Clone for FunctionInstance<T> {
    fn clone(&self) -> Self {
        Self {
            instance: self.instance.clone(),
            body: self.body.clone(),
        }
    }
}

impl<T> FunctionInstance<T> {
    /// Call with this instance's values for every parameter not in `overrides`
    pub fn call<I, K, V>(&self, overrides: I) -> Result<T, ParamError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let view = ParamOverrides::new(&self.instance, overrides)?;
        (self.body)(&view)
    }

    pub fn call_defaults(&self) -> Result<T, ParamError> {
        self.call(std::iter::empty::<(String, Value)>())
    }

    pub fn get(&self, name: &str) -> Result<Value, ParamError> {
        self.instance.get(name)
    }

    /// Instance-level change; the type's defaults are unaffected
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), ParamError> {
        self.instance.set(name, value)
    }

    /// Current values, for external persistence
    pub fn snapshot(&self) -> Result<InstanceSnapshot, ParamError> {
        self.instance.snapshot()
    }

    pub fn parameterized(&self) -> &Parameterized {
        &self.instance
    }
}

impl<T> fmt::Debug for FunctionInstance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionInstance")
            .field("instance", &self.instance)
            .finish()
    }
}
