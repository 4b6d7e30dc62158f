//! Class Registry
//!
//! A [`ClassDef`] is the one-time registration of a parameterized class: its
//! name, parent, abstract flag, and its own parameter declarations. The merged
//! view over the whole ancestor chain ([`ParamRegistry`]) is built lazily on
//! first lookup and cached on the class, so repeated lookups return the same
//! `Arc`.
//!
//! Classes have at most one parent. Every class descends from the built-in
//! root class `Parameterized`, which declares the `name` parameter.

use crate::error::ParamError;
use crate::instance;
use crate::spec::{validate, ParamDecl, ParameterSpec};
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use tracing::debug;

/// Name of the root class
pub const ROOT_CLASS_NAME: &str = "Parameterized";

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);
static ROOT: OnceLock<ClassRef> = OnceLock::new();

/// Process-unique class identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u64);

impl ClassId {
    pub(crate) fn next() -> Self {
        ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared handle to a registered class
pub type ClassRef = Arc<ClassDef>;

/// Merged parameter view for one class, in declaration order (root first)
#[derive(Debug)]
pub struct ParamRegistry {
    class: ClassId,
    params: IndexMap<String, Arc<ParameterSpec>>,
}

impl ParamRegistry {
    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ParameterSpec>> {
        self.params.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ParameterSpec>> {
        self.params.values()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Registration data for one parameterized class
pub struct ClassDef {
    id: ClassId,
    name: String,
    parent: Option<ClassRef>,
    is_abstract: bool,
    own: RwLock<IndexMap<String, Arc<ParameterSpec>>>,
    children: RwLock<Vec<Weak<ClassDef>>>,
    cache: RwLock<Option<Arc<ParamRegistry>>>,
    instance_counter: AtomicUsize,
}

impl ClassDef {
    /// Start declaring a class. The parent defaults to the root class.
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            name: name.into(),
            parent: Some(Self::root()),
            is_abstract: false,
            decls: Vec::new(),
        }
    }

    /// The built-in root class
    pub fn root() -> ClassRef {
        ROOT.get_or_init(|| {
            let id = ClassId::next();
            let name_spec = ParamDecl::string("name", Value::None)
                .doc("String identifier for this object")
                .into_spec(id, ROOT_CLASS_NAME);
            let mut own = IndexMap::new();
            own.insert(name_spec.name().to_string(), Arc::new(name_spec));
            Arc::new(ClassDef::new(id, ROOT_CLASS_NAME.to_string(), None, false, own))
        })
        .clone()
    }

    fn new(
        id: ClassId,
        name: String,
        parent: Option<ClassRef>,
        is_abstract: bool,
        own: IndexMap<String, Arc<ParameterSpec>>,
    ) -> Self {
        Self {
            id,
            name,
            parent,
            is_abstract,
            own: RwLock::new(own),
            children: RwLock::new(Vec::new()),
            cache: RwLock::new(None),
            instance_counter: AtomicUsize::new(0),
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&ClassRef> {
        self.parent.as_ref()
    }

    /// This class's own abstract declaration; never inherited
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Ancestor chain, root first, excluding this class
    pub fn ancestors(&self) -> Vec<ClassRef> {
        let mut chain = Vec::new();
        let mut current = self.parent.clone();
        while let Some(class) = current {
            current = class.parent.clone();
            chain.push(class);
        }
        chain.reverse();
        chain
    }

    /// Whether this class is `other` or descends from it
    pub fn is_subclass_of(&self, other: &ClassDef) -> bool {
        if self.id == other.id {
            return true;
        }
        let mut current = self.parent.as_ref();
        while let Some(class) = current {
            if class.id == other.id {
                return true;
            }
            current = class.parent.as_ref();
        }
        false
    }

    /// Parameters declared directly on this class
    pub fn own_params(&self) -> Vec<Arc<ParameterSpec>> {
        self.own.read().values().cloned().collect()
    }

    /// Merged parameter view over the ancestor chain.
    ///
    /// Built on first call and cached; later calls return the same `Arc`.
    pub fn params(&self) -> Arc<ParamRegistry> {
        if let Some(registry) = self.cache.read().as_ref() {
            return registry.clone();
        }

        let mut cache = self.cache.write();
        // Double-check after acquiring write lock
        if let Some(registry) = cache.as_ref() {
            return registry.clone();
        }
        let registry = Arc::new(self.aggregate());
        debug!(
            class = %self.name,
            params = registry.len(),
            "Built parameter registry"
        );
        *cache = Some(registry.clone());
        registry
    }

    fn aggregate(&self) -> ParamRegistry {
        let mut params = match &self.parent {
            Some(parent) => parent.params().params.clone(),
            None => IndexMap::new(),
        };
        for (name, spec) in self.own.read().iter() {
            let inherited = params.get(name).map(|s| s.instantiate()).unwrap_or(false);
            spec.inherit_instantiate(inherited);
            params.insert(name.clone(), spec.clone());
        }
        ParamRegistry {
            class: self.id,
            params,
        }
    }

    /// Look up one parameter spec through the cached registry
    pub fn param(&self, name: &str) -> Result<Arc<ParameterSpec>, ParamError> {
        self.params().get(name).cloned().ok_or_else(|| {
            ParamError::Lookup(format!("{} has no parameter '{}'", self.name, name))
        })
    }

    /// Stored class-level default, providers unresolved
    pub fn default_value(&self, name: &str) -> Result<Value, ParamError> {
        Ok(self.param(name)?.default())
    }

    /// Class-level read; providers on dynamic parameters are resolved
    pub fn get(&self, name: &str) -> Result<Value, ParamError> {
        let spec = self.param(name)?;
        instance::resolve(&spec, spec.default())
    }

    /// Rewrite the class-level default.
    ///
    /// Always rejected for readonly parameters. A parameter inherited from an
    /// ancestor is redeclared on this class so the ancestor keeps its default.
    pub fn set_default(&self, name: &str, value: impl Into<Value>) -> Result<(), ParamError> {
        let value = value.into();
        let spec = self.param(name)?;
        if spec.readonly() {
            return Err(ParamError::Immutability(format!(
                "Read-only parameter '{}' cannot be modified on {}",
                name, self.name
            )));
        }
        validate(&value, &spec)?;

        if spec.owner() == self.id {
            spec.replace_default(value);
            debug!(class = %self.name, param = name, "Replaced class default");
        } else {
            let redeclared = spec.redeclare(self.id, &self.name, value);
            self.own
                .write()
                .insert(name.to_string(), Arc::new(redeclared));
            self.invalidate();
            debug!(
                class = %self.name,
                param = name,
                declared_by = spec.owner_name(),
                "Redeclared inherited parameter with new default"
            );
        }
        Ok(())
    }

    /// Drop the cached registry of this class and every descendant
    fn invalidate(&self) {
        self.cache.write().take();
        let children: Vec<ClassRef> = {
            let mut children = self.children.write();
            children.retain(|child| child.strong_count() > 0);
            children.iter().filter_map(Weak::upgrade).collect()
        };
        for child in children {
            child.invalidate();
        }
    }

    pub(crate) fn next_instance_name(&self, width: usize) -> String {
        let n = self.instance_counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{:0width$}", self.name, n, width = width)
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name.clone()))
            .field("abstract", &self.is_abstract)
            .finish()
    }
}

/// Declaration surface for a class
pub struct ClassBuilder {
    name: String,
    parent: Option<ClassRef>,
    is_abstract: bool,
    decls: Vec<ParamDecl>,
}

impl ClassBuilder {
    pub fn parent(mut self, parent: &ClassRef) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn abstract_class(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn param(mut self, decl: ParamDecl) -> Self {
        self.decls.push(decl);
        self
    }

    /// Register the class.
    ///
    /// Fails if a name is declared twice or a default does not satisfy its own
    /// declaration.
    pub fn build(self) -> Result<ClassRef, ParamError> {
        let id = ClassId::next();
        let mut seen = HashSet::new();
        let mut own = IndexMap::new();
        for decl in self.decls {
            if !seen.insert(decl.name.clone()) {
                return Err(ParamError::Validation(format!(
                    "Parameter '{}' declared twice on {}",
                    decl.name, self.name
                )));
            }
            let spec = decl.into_spec(id, &self.name);
            validate(&spec.default(), &spec).map_err(|e| {
                ParamError::Validation(format!("invalid default on {}: {}", self.name, e))
            })?;
            own.insert(spec.name().to_string(), Arc::new(spec));
        }

        let class = Arc::new(ClassDef::new(
            id,
            self.name,
            self.parent.clone(),
            self.is_abstract,
            own,
        ));
        if let Some(parent) = &self.parent {
            parent.children.write().push(Arc::downgrade(&class));
        }
        debug!(class = %class.name, id = %class.id, "Registered class");
        Ok(class)
    }
}
