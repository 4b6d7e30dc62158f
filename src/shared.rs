//! Shared-Default Pool
//!
//! While a [`SharedParameters`] scope is open, constructions that need a
//! private copy of an `instantiate` default take one pooled copy per
//! (constructed class, parameter name) instead, so instances of one class built
//! together share it by identity. Subclasses inheriting the same parameter get
//! their own pooled copies. Pools are thread-local and nest: the innermost open
//! scope is the active one, and closing it reactivates the one outside.

use crate::registry::ClassId;
use crate::spec::ParameterSpec;
use crate::value::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::marker::PhantomData;
use tracing::debug;

thread_local! {
    static POOLS: RefCell<Vec<SharedPool>> = const { RefCell::new(Vec::new()) };
    static NEXT_GENERATION: Cell<u64> = const { Cell::new(0) };
}

struct SharedPool {
    generation: u64,
    entries: HashMap<(ClassId, String), Value>,
}

/// Guard for an open pooling scope; dropping it closes the scope.
///
/// Not `Send`: the pool belongs to the thread that opened it.
#[must_use = "the pooling scope closes when the guard is dropped"]
pub struct SharedParameters {
    depth: usize,
    generation: u64,
    _thread_bound: PhantomData<*const ()>,
}

/// Open a pooling scope on the current thread
pub fn shared_parameters() -> SharedParameters {
    let generation = NEXT_GENERATION.with(|next| {
        let generation = next.get();
        next.set(generation.wrapping_add(1));
        generation
    });
    let depth = POOLS.with(|pools| {
        let mut pools = pools.borrow_mut();
        pools.push(SharedPool {
            generation,
            entries: HashMap::new(),
        });
        pools.len()
    });
    debug!(depth, generation, "Opened shared parameter scope");
    SharedParameters {
        depth,
        generation,
        _thread_bound: PhantomData,
    }
}

/// Run `f` inside a pooling scope
pub fn with_shared_parameters<T>(f: impl FnOnce() -> T) -> T {
    let _scope = shared_parameters();
    f()
}

/// Whether a pooling scope is open on the current thread
pub fn is_active() -> bool {
    POOLS.with(|pools| !pools.borrow().is_empty())
}

/// Number of open pooling scopes on the current thread
pub fn depth() -> usize {
    POOLS.with(|pools| pools.borrow().len())
}

impl SharedParameters {
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for SharedParameters {
    fn drop(&mut self) {
        // Truncate rather than pop so a leaked inner guard cannot leave its
        // pool active after the outer scope closes. A guard whose scope is
        // already gone must not touch scopes opened since.
        let discarded = POOLS.with(|pools| {
            let mut pools = pools.borrow_mut();
            let owned = pools
                .get(self.depth - 1)
                .is_some_and(|pool| pool.generation == self.generation);
            if !owned {
                return 0;
            }
            let before = pools.len();
            pools.truncate(self.depth - 1);
            before - pools.len()
        });
        debug!(depth = self.depth, discarded, "Closed shared parameter scope");
    }
}

/// Pooled copy of `spec`'s default for instances of `class` in the active
/// scope, created on first use.
///
/// Returns `None` when no scope is open or the default is a provider.
pub(crate) fn pooled_default(class: ClassId, spec: &ParameterSpec) -> Option<Value> {
    let key = (class, spec.name().to_string());
    let existing = POOLS.with(|pools| {
        let pools = pools.borrow();
        pools.last().map(|pool| pool.entries.get(&key).cloned())
    })?;
    if let Some(value) = existing {
        debug!(class = %class, declared_by = spec.owner_name(), param = spec.name(), "Reused pooled default");
        return Some(value);
    }

    let default = spec.default();
    if default.is_provider() {
        return None;
    }
    // Copy outside the borrow; copying an object reads its own state.
    let copy = default.deep_copy();
    POOLS.with(|pools| {
        let mut pools = pools.borrow_mut();
        let pool = pools.last_mut()?;
        let value = pool.entries.entry(key).or_insert(copy).clone();
        debug!(class = %class, declared_by = spec.owner_name(), param = spec.name(), "Created pooled default");
        Some(value)
    })
}
