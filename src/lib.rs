//! Parameterized: Declarative, Validated Object Attributes
//!
//! Classes declare named, typed parameters with defaults and constraints.
//! Instances read and write those parameters through a mediated protocol that
//! validates assignments, enforces constant and readonly semantics, copies
//! mutable defaults on demand, and resolves dynamic value providers on each
//! read. Override views, shared-default pools, snapshot stacks and
//! parameterized functions are built on the same protocol.

pub mod config;
pub mod error;
pub mod function;
pub mod instance;
pub mod logging;
pub mod overrides;
pub mod provider;
pub mod registry;
pub mod shared;
pub mod spec;
pub mod state;
pub mod value;

pub use error::ParamError;
pub use function::{FunctionInstance, ParameterizedFunction};
pub use instance::{InstanceSnapshot, Parameterized};
pub use overrides::{ExtraKeywords, ParamOverrides, ParamSource};
pub use provider::{ProviderRef, ValueProvider};
pub use registry::{ClassBuilder, ClassDef, ClassId, ClassRef, ParamRegistry};
pub use shared::{shared_parameters, with_shared_parameters, SharedParameters};
pub use spec::{check_bounds, validate, Bounds, ParamDecl, ParamKind, ParameterSpec};
pub use value::{SharedList, Value};
