use crate::core::catalog::{FieldKind, FieldSpec, OperationDescriptor};
use crate::domain::error::{IamCtlError, IamCtlResult};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Named values supplied by the caller, keyed by API field name
pub type RawParameters = Map<String, Value>;

/// Request populated from bound parameters, keyed by canonical API field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BoundRequest {
    fields: Map<String, Value>,
}

impl BoundRequest {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.str(name).map(str::to_string)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.fields.get(name).and_then(Value::as_bool)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Maps caller-supplied values onto the request fields of one operation
pub struct ParameterBinder {
    operation: &'static OperationDescriptor,
}

impl ParameterBinder {
    pub fn new(operation: &'static OperationDescriptor) -> Self {
        Self { operation }
    }

    /// Validate and coerce `raw` into a request.
    ///
    /// A null or empty value counts as unbound for optional fields and is
    /// rejected for required ones.
    pub fn bind(&self, raw: RawParameters) -> IamCtlResult<BoundRequest> {
        let mut fields = Map::new();
        let mut seen = HashSet::new();

        for (name, value) in raw {
            let field = self.operation.field(&name).ok_or_else(|| {
                IamCtlError::validation(format!(
                    "Unknown parameter '{}' for {}",
                    name, self.operation.operation
                ))
            })?;

            if !seen.insert(field.name) {
                return Err(IamCtlError::validation(format!(
                    "Parameter '{}' of {} is given more than once",
                    field.name, self.operation.operation
                )));
            }

            if is_null_or_empty(&value) {
                if field.required {
                    return Err(IamCtlError::validation(format!(
                        "Parameter '{}' of {} is required and cannot be null or empty",
                        field.name, self.operation.operation
                    )));
                }
                debug!(field = field.name, "optional parameter bound to null, leaving unset");
                continue;
            }

            let coerced = coerce(field, value)?;
            debug!(field = field.name, value = %coerced, "bound parameter");
            fields.insert(field.name.to_string(), coerced);
        }

        let missing: Vec<String> = self
            .operation
            .required_fields()
            .filter(|field| !fields.contains_key(field.name))
            .map(|field| format!("{} (--{})", field.name, field.flag_name()))
            .collect();

        if !missing.is_empty() {
            return Err(IamCtlError::validation(format!(
                "Missing required parameter(s) for {}: {}",
                self.operation.operation,
                missing.join(", ")
            )));
        }

        Ok(BoundRequest { fields })
    }
}

/// Parse the `--cli-input-json` document and overlay explicitly named values on it
pub fn merge_parameters(input_json: Option<&str>, named: RawParameters) -> IamCtlResult<RawParameters> {
    let mut merged = match input_json {
        Some(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(IamCtlError::validation(
                    "--cli-input-json must be a JSON object keyed by parameter name",
                ))
            }
            Err(e) => {
                return Err(IamCtlError::validation(format!(
                    "--cli-input-json is not valid JSON: {}",
                    e
                )))
            }
        },
        None => Map::new(),
    };

    for (name, value) in named {
        merged.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        merged.insert(name, value);
    }

    Ok(merged)
}

fn is_null_or_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn coerce(field: &FieldSpec, value: Value) -> IamCtlResult<Value> {
    match field.kind {
        FieldKind::String => {
            let text = match value {
                Value::String(s) => s,
                other => {
                    return Err(IamCtlError::validation(format!(
                        "Parameter '{}' expects a string, got {}",
                        field.name, other
                    )))
                }
            };
            check_length(field, &text)?;
            check_pattern(field, &text)?;
            Ok(Value::String(text))
        }
        FieldKind::Integer { min, max } => {
            let number = match &value {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            }
            .ok_or_else(|| {
                IamCtlError::validation(format!(
                    "Parameter '{}' expects an integer, got {}",
                    field.name, value
                ))
            })?;

            if number < min || number > max {
                return Err(IamCtlError::validation(format!(
                    "Parameter '{}' must be between {} and {}, got {}",
                    field.name, min, max, number
                )));
            }
            Ok(Value::from(number))
        }
        FieldKind::Boolean => {
            let flag = match &value {
                Value::Bool(b) => Some(*b),
                Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
                Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
                _ => None,
            }
            .ok_or_else(|| {
                IamCtlError::validation(format!(
                    "Parameter '{}' expects true or false, got {}",
                    field.name, value
                ))
            })?;
            Ok(Value::Bool(flag))
        }
        FieldKind::Enum(allowed) => {
            let canonical = value
                .as_str()
                .and_then(|s| allowed.iter().find(|candidate| candidate.eq_ignore_ascii_case(s)))
                .ok_or_else(|| {
                    IamCtlError::validation(format!(
                        "Parameter '{}' must be one of {}, got {}",
                        field.name,
                        allowed.join(", "),
                        value
                    ))
                })?;
            Ok(Value::String((*canonical).to_string()))
        }
    }
}

fn check_length(field: &FieldSpec, text: &str) -> IamCtlResult<()> {
    let len = text.chars().count();
    if let Some(min) = field.min_len {
        if len < min {
            return Err(IamCtlError::validation(format!(
                "Parameter '{}' must be at least {} characters long",
                field.name, min
            )));
        }
    }
    if let Some(max) = field.max_len {
        if len > max {
            return Err(IamCtlError::validation(format!(
                "Parameter '{}' must be at most {} characters long",
                field.name, max
            )));
        }
    }
    Ok(())
}

fn check_pattern(field: &FieldSpec, text: &str) -> IamCtlResult<()> {
    let Some(pattern) = field.pattern else {
        return Ok(());
    };

    let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
        IamCtlError::validation(format!("Pattern for '{}' is invalid: {}", field.name, e))
    })?;

    if regex.is_match(text) {
        Ok(())
    } else {
        Err(IamCtlError::validation(format!(
            "Parameter '{}' value '{}' does not match the allowed pattern {}",
            field.name, text, pattern
        )))
    }
}
