//! Message: one broker delivery's payload, parsed at most once.
//!
//! ```text
//! {
//!   "__amqp__": "users/update",
//!   "timestamp": 1700000000,
//!   "dependencies": { "read": ["users:5"], "write": ["users:7"] }
//! }
//! ```
//!
//! Parsing is lazy and memoized: the first accessor call parses, every later
//! call returns the same cached data (or the same cached error).

use std::fmt;
use std::sync::OnceLock;

use serde_json::{Map, Value};
use uuid::Uuid;

use causeway_core::config::SubscriberConfig;
use causeway_core::constants::{DEPENDENCIES_FIELD, READ_FIELD, TIMESTAMP_FIELD, WRITE_FIELD};
use causeway_core::errors::PayloadError;
use causeway_core::models::{Change, ErrorContext};
use causeway_core::{Dependency, DependencyKind};

use crate::resolver;

/// Declared read and write dependencies of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub read: Vec<Dependency>,
    pub write: Vec<Dependency>,
}

impl Dependencies {
    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.write.is_empty()
    }
}

/// Why a message is or is not gated on its dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyStatus {
    /// The wait-set must be satisfied before applying.
    Gated,
    /// Causal gating is disabled by configuration.
    BarebackMode,
    /// The payload declared no dependencies.
    NoDependencies,
}

impl DependencyStatus {
    pub fn requires_wait(self) -> bool {
        self == Self::Gated
    }
}

/// Fields extracted from a well-formed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPayload {
    pub endpoint: String,
    pub timestamp: i64,
    pub dependencies: Dependencies,
    /// The full decoded payload, handed to the store untouched.
    pub body: Value,
}

impl ParsedPayload {
    /// Borrow this payload as a change for the local store.
    pub fn change(&self) -> Change<'_> {
        Change {
            endpoint: &self.endpoint,
            timestamp: self.timestamp,
            payload: &self.body,
            reads: &self.dependencies.read,
            writes: &self.dependencies.write,
        }
    }
}

/// Parse a raw payload. Pure and idempotent.
pub fn parse(raw: &str, endpoint_field: &str) -> Result<ParsedPayload, PayloadError> {
    let body: Value = serde_json::from_str(raw).map_err(|e| PayloadError::InvalidJson {
        message: e.to_string(),
    })?;
    let object = body.as_object().ok_or(PayloadError::NotAnObject)?;

    let endpoint = parse_endpoint(object, endpoint_field)?;
    let timestamp = parse_timestamp(object)?;
    let dependencies = parse_dependencies(object)?;

    Ok(ParsedPayload {
        endpoint,
        timestamp,
        dependencies,
        body,
    })
}

fn parse_endpoint(object: &Map<String, Value>, field: &str) -> Result<String, PayloadError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(PayloadError::MissingField {
            field: field.to_string(),
        }),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(PayloadError::InvalidField {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        }),
        Some(other) => Err(PayloadError::InvalidField {
            field: field.to_string(),
            message: format!("expected a string, got {}", json_type(other)),
        }),
    }
}

fn parse_timestamp(object: &Map<String, Value>) -> Result<i64, PayloadError> {
    let invalid = |message: String| PayloadError::InvalidField {
        field: TIMESTAMP_FIELD.to_string(),
        message,
    };

    match object.get(TIMESTAMP_FIELD) {
        None | Some(Value::Null) => Err(PayloadError::MissingField {
            field: TIMESTAMP_FIELD.to_string(),
        }),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else {
                n.as_f64()
                    .and_then(truncate_seconds)
                    .ok_or_else(|| invalid(format!("{n} is out of range")))
            }
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate_seconds))
                .ok_or_else(|| invalid(format!("{s:?} is not numeric")))
        }
        Some(other) => Err(invalid(format!(
            "expected a number or numeric string, got {}",
            json_type(other)
        ))),
    }
}

fn truncate_seconds(value: f64) -> Option<i64> {
    if value.is_finite() && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

fn parse_dependencies(object: &Map<String, Value>) -> Result<Dependencies, PayloadError> {
    let block = match object.get(DEPENDENCIES_FIELD) {
        None | Some(Value::Null) => return Ok(Dependencies::default()),
        Some(Value::Object(block)) => block,
        Some(other) => {
            return Err(PayloadError::InvalidField {
                field: DEPENDENCIES_FIELD.to_string(),
                message: format!("expected an object, got {}", json_type(other)),
            })
        }
    };

    Ok(Dependencies {
        read: parse_tokens(block, READ_FIELD, DependencyKind::Read)?,
        write: parse_tokens(block, WRITE_FIELD, DependencyKind::Write)?,
    })
}

fn parse_tokens(
    block: &Map<String, Value>,
    list: &str,
    kind: DependencyKind,
) -> Result<Vec<Dependency>, PayloadError> {
    let field = format!("{DEPENDENCIES_FIELD}.{list}");
    let items = match block.get(list) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(PayloadError::InvalidField {
                field,
                message: format!("expected an array, got {}", json_type(other)),
            })
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(token) => Dependency::parse(token, kind),
            other => Err(PayloadError::InvalidField {
                field: field.clone(),
                message: format!("expected dependency tokens, got {}", json_type(other)),
            }),
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One broker delivery attempt. Redelivery creates a new `Message`.
pub struct Message {
    id: Uuid,
    payload: String,
    endpoint_field: String,
    bareback: bool,
    parsed: OnceLock<Result<ParsedPayload, PayloadError>>,
    happens_before: OnceLock<Vec<Dependency>>,
}

impl Message {
    /// Wrap a raw payload. Nothing is parsed until an accessor is called.
    pub fn new(payload: impl Into<String>, config: &SubscriberConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload: payload.into(),
            endpoint_field: config.endpoint_field.clone(),
            bareback: config.bareback,
            parsed: OnceLock::new(),
            happens_before: OnceLock::new(),
        }
    }

    /// Per-delivery correlation id (not part of the wire format).
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The raw payload as received.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn parsed(&self) -> Result<&ParsedPayload, PayloadError> {
        self.parsed
            .get_or_init(|| parse(&self.payload, &self.endpoint_field))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn endpoint(&self) -> Result<&str, PayloadError> {
        Ok(&self.parsed()?.endpoint)
    }

    pub fn timestamp(&self) -> Result<i64, PayloadError> {
        Ok(self.parsed()?.timestamp)
    }

    pub fn dependencies(&self) -> Result<&Dependencies, PayloadError> {
        Ok(&self.parsed()?.dependencies)
    }

    /// The ordered happens-before wait-set, computed once.
    pub fn happens_before(&self) -> Result<&[Dependency], PayloadError> {
        let parsed = self.parsed()?;
        Ok(self
            .happens_before
            .get_or_init(|| resolver::happens_before(&parsed.dependencies)))
    }

    pub fn dependency_status(&self) -> Result<DependencyStatus, PayloadError> {
        let dependencies = self.dependencies()?;
        Ok(if self.bareback {
            DependencyStatus::BarebackMode
        } else if dependencies.is_empty() {
            DependencyStatus::NoDependencies
        } else {
            DependencyStatus::Gated
        })
    }

    /// False in bareback mode or when no dependencies were declared.
    pub fn has_dependencies(&self) -> Result<bool, PayloadError> {
        Ok(self.dependency_status()?.requires_wait())
    }

    /// Context for error-sink reports about this delivery.
    pub fn error_context(&self) -> ErrorContext {
        ErrorContext {
            endpoint: self.endpoint().ok().map(str::to_string),
            delivery_id: self.id.to_string(),
            payload: self.payload.clone(),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("payload", &self.payload)
            .field("bareback", &self.bareback)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.endpoint(), self.happens_before()) {
            (Ok(endpoint), Ok(wait_set)) => {
                write!(f, "{endpoint} -> ")?;
                for (i, dep) in wait_set.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{dep}")?;
                }
                Ok(())
            }
            _ => f.write_str("<malformed> -> "),
        }
    }
}
