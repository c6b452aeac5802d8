use crate::core::binder::BoundRequest;
use crate::core::catalog::OperationDescriptor;
use crate::domain::error::{IamCtlError, IamCtlResult};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Which part of a response is surfaced to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `*`: the whole response
    Whole,
    /// `Field` or `Field.Sub`: a response member, first segment canonicalized
    Field(Vec<String>),
    /// `^Param`: the bound value of an input parameter
    Parameter(String),
}

impl Selector {
    /// Parse a selector expression against the shape of `operation`
    pub fn parse(expr: &str, operation: &OperationDescriptor) -> IamCtlResult<Self> {
        let expr = expr.trim();

        if expr.is_empty() {
            return Err(IamCtlError::selector(expr, "selector is empty"));
        }

        if expr == "*" {
            return Ok(Selector::Whole);
        }

        if let Some(name) = expr.strip_prefix('^') {
            let field = operation.field(name).ok_or_else(|| {
                IamCtlError::selector(
                    expr,
                    format!("'{}' is not a parameter of {}", name, operation.operation),
                )
            })?;
            return Ok(Selector::Parameter(field.name.to_string()));
        }

        let mut segments = Vec::new();
        for segment in expr.split('.') {
            if segment.is_empty() {
                return Err(IamCtlError::selector(expr, "empty path segment"));
            }
            if !segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(IamCtlError::selector(
                    expr,
                    format!("'{}' is not a valid member name", segment),
                ));
            }
            segments.push(segment.to_string());
        }

        let member = operation.response_field(&segments[0]).ok_or_else(|| {
            let known = if operation.response.is_empty() {
                "the response has no members".to_string()
            } else {
                format!("expected one of {}", operation.response.join(", "))
            };
            IamCtlError::selector(
                expr,
                format!("'{}' is not a member of the {} response; {}", segments[0], operation.operation, known),
            )
        })?;
        segments[0] = member.to_string();

        Ok(Selector::Field(segments))
    }

    /// Parse `expr`, or the operation's default selector when absent
    pub fn resolve(expr: Option<&str>, operation: &OperationDescriptor) -> IamCtlResult<Self> {
        Self::parse(expr.unwrap_or(operation.default_select), operation)
    }

    /// Pick the output value out of a response without modifying it
    pub fn project(&self, response: &Value, request: &BoundRequest) -> Value {
        let projected = match self {
            Selector::Whole => response.clone(),
            Selector::Parameter(name) => request.get(name).cloned().unwrap_or(Value::Null),
            Selector::Field(path) => select_path(response, path),
        };
        debug!(selector = %self, "projected response");
        projected
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Whole => write!(f, "*"),
            Selector::Field(path) => write!(f, "{}", path.join(".")),
            Selector::Parameter(name) => write!(f, "^{}", name),
        }
    }
}

/// Walk `path` through objects; arrays apply the rest of the path to each element
fn select_path(value: &Value, path: &[String]) -> Value {
    let Some((head, rest)) = path.split_first() else {
        return value.clone();
    };

    match value {
        Value::Object(map) => {
            let child = map.get(head.as_str()).or_else(|| {
                map.iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(head))
                    .map(|(_, v)| v)
            });
            match child {
                Some(child) => select_path(child, rest),
                None => Value::Null,
            }
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| select_path(item, path))
                .filter(|item| !item.is_null())
                .collect(),
        ),
        _ => Value::Null,
    }
}
