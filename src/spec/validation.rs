//! Value validation against a parameter specification.

use super::{Bounds, ParameterSpec};
use crate::error::ParamError;
use crate::value::Value;

/// Pure bounds check.
///
/// Values without a numeric view, and specs without bounds, always pass.
pub fn check_bounds(value: &Value, spec: &ParameterSpec) -> bool {
    within(value, spec.bounds())
}

fn within(value: &Value, bounds: Option<Bounds>) -> bool {
    match (bounds, value.as_f64()) {
        (Some(bounds), Some(x)) => bounds.contains(x),
        _ => true,
    }
}

/// Validate a value about to be assigned to a parameter.
///
/// Providers are accepted by dynamic parameters without a bounds check; their
/// output is checked when it is read.
pub fn validate(value: &Value, spec: &ParameterSpec) -> Result<(), ParamError> {
    match value {
        Value::None => {
            if spec.allow_none() {
                Ok(())
            } else {
                Err(ParamError::Validation(format!(
                    "Parameter '{}' does not accept None",
                    spec.name()
                )))
            }
        }
        Value::Provider(_) => {
            if spec.is_dynamic() {
                Ok(())
            } else {
                Err(ParamError::Validation(format!(
                    "Parameter '{}' is not dynamic and cannot hold a value provider",
                    spec.name()
                )))
            }
        }
        concrete => validate_concrete(concrete, spec),
    }
}

fn validate_concrete(value: &Value, spec: &ParameterSpec) -> Result<(), ParamError> {
    if !spec.kind().accepts(value) {
        return Err(ParamError::Validation(format!(
            "Parameter '{}' expects a {} value, not {}",
            spec.name(),
            spec.kind().slug(),
            value.type_name()
        )));
    }

    if let (Some(class), Value::Object(obj)) = (spec.class_filter(), value) {
        if !obj.class().is_subclass_of(class) {
            return Err(ParamError::Validation(format!(
                "Parameter '{}' expects an instance of {}, not {}",
                spec.name(),
                class.name(),
                obj.class().name()
            )));
        }
    }

    if !check_bounds(value, spec) {
        if let Some(bounds) = spec.bounds() {
            return Err(ParamError::Validation(format!(
                "Parameter '{}' must be in range {}, not {:?}",
                spec.name(),
                bounds,
                value
            )));
        }
    }

    Ok(())
}

/// Validate a value produced by a provider at read time
pub(crate) fn validate_produced(
    value: &Value,
    spec: &ParameterSpec,
    provider_bounds: Option<Bounds>,
) -> Result<(), ParamError> {
    if value.is_provider() {
        return Err(ParamError::Validation(format!(
            "Provider for '{}' produced another provider",
            spec.name()
        )));
    }
    validate(value, spec)?;
    if !within(value, provider_bounds) {
        if let Some(bounds) = provider_bounds {
            return Err(ParamError::Validation(format!(
                "Provider for '{}' produced {:?} outside its own range {}",
                spec.name(),
                value,
                bounds
            )));
        }
    }
    Ok(())
}
