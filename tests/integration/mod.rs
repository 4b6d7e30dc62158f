//! Integration tests for the parameterized attribute system

mod common;
mod dynamic_values;
mod immutability;
mod instantiation;
mod registry_defaults;
mod state_stack;
