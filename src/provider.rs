//! Value Providers
//!
//! A value provider produces a fresh value every time a dynamic parameter is
//! read. The core never caches what a provider returns; concrete generators
//! live outside this crate and only have to satisfy [`ValueProvider`].

use crate::spec::Bounds;
use crate::value::Value;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Produces the next value for a dynamic parameter
pub trait ValueProvider: Send + fmt::Debug {
    /// Produce the next value. Called on every read, never memoized.
    fn next_value(&mut self) -> Value;

    /// Bounds the provider guarantees for its own output, checked at resolution
    fn bounds(&self) -> Option<Bounds> {
        None
    }
}

/// Shared handle to a stateful provider
///
/// Clones refer to the same provider; identity is preserved through
/// snapshots and copies.
#[derive(Clone)]
pub struct ProviderRef {
    inner: Arc<Mutex<dyn ValueProvider>>,
}

impl ProviderRef {
    pub fn new<P: ValueProvider + 'static>(provider: P) -> Self {
        Self {
            inner: Arc::new(Mutex::new(provider)),
        }
    }

    /// Ask the provider for its next value
    pub fn produce(&self) -> Value {
        self.inner.lock().next_value()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.inner.lock().bounds()
    }

    pub fn ptr_eq(&self, other: &ProviderRef) -> bool {
        // Compare data pointers only; vtable pointers are not unique.
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl fmt::Debug for ProviderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Provider({:?})", &*self.inner.lock())
    }
}
