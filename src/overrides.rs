//! Override View
//!
//! [`ParamOverrides`] layers explicit call-time values over an instance's (or
//! a class's) parameters for the duration of one operation. It never writes to
//! the underlying source.

use crate::config;
use crate::error::ParamError;
use crate::instance::Parameterized;
use crate::registry::{ClassDef, ParamRegistry};
use crate::value::Value;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::warn;

/// What a view resolves non-overridden keys against
#[derive(Debug, Clone, Copy)]
pub enum ParamSource<'a> {
    /// Class-level defaults
    Class(&'a ClassDef),
    /// An instance's current values
    Instance(&'a Parameterized),
}

impl ParamSource<'_> {
    fn params(&self) -> Arc<ParamRegistry> {
        match self {
            ParamSource::Class(class) => class.params(),
            ParamSource::Instance(instance) => instance.params(),
        }
    }

    fn resolve(&self, key: &str) -> Result<Value, ParamError> {
        match self {
            ParamSource::Class(class) => class.get(key),
            ParamSource::Instance(instance) => instance.get(key),
        }
    }

    fn class_name(&self) -> &str {
        match self {
            ParamSource::Class(class) => class.name(),
            ParamSource::Instance(instance) => instance.class().name(),
        }
    }
}

impl<'a> From<&'a ClassDef> for ParamSource<'a> {
    fn from(class: &'a ClassDef) -> Self {
        ParamSource::Class(class)
    }
}

impl<'a> From<&'a Arc<ClassDef>> for ParamSource<'a> {
    fn from(class: &'a Arc<ClassDef>) -> Self {
        ParamSource::Class(class.as_ref())
    }
}

impl<'a> From<&'a Parameterized> for ParamSource<'a> {
    fn from(instance: &'a Parameterized) -> Self {
        ParamSource::Instance(instance)
    }
}

/// Handling of override keywords that name no parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraKeywords {
    /// Keep them readable and log a warning
    Warn,
    /// Fail with a lookup error
    Reject,
    /// Move them to [`ParamOverrides::extra_keywords`]
    Collect,
}

/// Transient merge of a source's parameters and explicit overrides
#[derive(Debug)]
pub struct ParamOverrides<'a> {
    source: ParamSource<'a>,
    overrides: IndexMap<String, Value>,
    extra_keywords: IndexMap<String, Value>,
}

impl<'a> ParamOverrides<'a> {
    /// Build a view; unknown keywords warn, or fail when strict overrides are configured
    pub fn new<S, I, K, V>(source: S, overrides: I) -> Result<Self, ParamError>
    where
        S: Into<ParamSource<'a>>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let policy = if config::current().strict_overrides {
            ExtraKeywords::Reject
        } else {
            ExtraKeywords::Warn
        };
        Self::with_policy(source, overrides, policy)
    }

    /// Build a view that sets unknown keywords aside instead of warning
    pub fn with_extra_keywords<S, I, K, V>(source: S, overrides: I) -> Self
    where
        S: Into<ParamSource<'a>>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let source = source.into();
        let (overrides, extra_keywords) = split_overrides(&source, overrides);
        Self {
            source,
            overrides,
            extra_keywords,
        }
    }

    pub fn with_policy<S, I, K, V>(
        source: S,
        overrides: I,
        policy: ExtraKeywords,
    ) -> Result<Self, ParamError>
    where
        S: Into<ParamSource<'a>>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let source = source.into();
        let (mut overrides, extra) = split_overrides(&source, overrides);
        match policy {
            ExtraKeywords::Collect => {
                return Ok(Self {
                    source,
                    overrides,
                    extra_keywords: extra,
                })
            }
            ExtraKeywords::Reject => {
                if let Some(key) = extra.keys().next() {
                    return Err(ParamError::Lookup(format!(
                        "{} has no parameter '{}' to override",
                        source.class_name(),
                        key
                    )));
                }
            }
            ExtraKeywords::Warn => {
                for key in extra.keys() {
                    warn!(
                        class = source.class_name(),
                        keyword = %key,
                        "Override keyword names no parameter"
                    );
                }
                overrides.extend(extra);
            }
        }
        Ok(Self {
            source,
            overrides,
            extra_keywords: IndexMap::new(),
        })
    }

    /// Override if present, else the source's resolved value
    pub fn get(&self, key: &str) -> Result<Value, ParamError> {
        if let Some(value) = self.overrides.get(key) {
            return Ok(value.clone());
        }
        if !self.source.params().contains(key) {
            return Err(ParamError::Lookup(format!(
                "'{}' is neither an override nor a parameter of {}",
                key,
                self.source.class_name()
            )));
        }
        self.source.resolve(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.overrides.contains_key(key) || self.source.params().contains(key)
    }

    pub fn is_overridden(&self, key: &str) -> bool {
        self.overrides.contains_key(key)
    }

    /// Keywords set aside by [`ParamOverrides::with_extra_keywords`]
    pub fn extra_keywords(&self) -> &IndexMap<String, Value> {
        &self.extra_keywords
    }

    /// Every key readable through [`ParamOverrides::get`]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.source.params().names().map(str::to_string).collect();
        for key in self.overrides.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        keys
    }

    pub fn source(&self) -> ParamSource<'a> {
        self.source
    }
}

fn split_overrides<I, K, V>(
    source: &ParamSource<'_>,
    overrides: I,
) -> (IndexMap<String, Value>, IndexMap<String, Value>)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let registry = source.params();
    let mut known = IndexMap::new();
    let mut extra = IndexMap::new();
    for (key, value) in overrides {
        let key = key.into();
        if registry.contains(&key) {
            known.insert(key, value.into());
        } else {
            extra.insert(key, value.into());
        }
    }
    (known, extra)
}
