// src/inspect.rs
//
// Value-level access to non-public state for assertions. Rust has no
// runtime reflection, so a type opts in by implementing Inspect against
// its own private fields and methods; tests then reach them by name.

use serde_json::Value;
use thiserror::Error;

/// Errors raised when a named member does not exist on the inspected type.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("`{type_name}` has no field `{field}`")]
    UnknownField { type_name: String, field: String },

    #[error("`{type_name}` has no method `{method}`")]
    UnknownMethod { type_name: String, method: String },
}

impl InspectError {
    pub fn unknown_field(type_name: &str, field: &str) -> Self {
        Self::UnknownField {
            type_name: type_name.to_string(),
            field: field.to_string(),
        }
    }

    pub fn unknown_method(type_name: &str, method: &str) -> Self {
        Self::UnknownMethod {
            type_name: type_name.to_string(),
            method: method.to_string(),
        }
    }
}

/// Opt-in access to a type's non-public members.
///
/// An unknown member name is an error; a field that exists but has not
/// been set reads as `Ok(None)` rather than erroring. The default method
/// bodies reject every name, so implementers override only the
/// operations they support.
pub trait Inspect {
    /// Name reported in errors, usually the plain type name.
    fn type_name(&self) -> &str;

    /// Read a non-public field by name.
    fn field(&self, name: &str) -> Result<Option<Value>, InspectError> {
        Err(InspectError::unknown_field(self.type_name(), name))
    }

    /// Write a non-public field by name.
    fn set_field(&mut self, name: &str, _value: Value) -> Result<(), InspectError> {
        Err(InspectError::unknown_field(self.type_name(), name))
    }

    /// Invoke a non-public method by name.
    fn invoke(&mut self, name: &str, _args: &[Value]) -> Result<Value, InspectError> {
        Err(InspectError::unknown_method(self.type_name(), name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Connection {
        host: String,
        retries: Option<u32>,
    }

    impl Connection {
        fn redact(&self, value: &str) -> String {
            format!("{}@{}", value, self.host)
        }
    }

    impl Inspect for Connection {
        fn type_name(&self) -> &str {
            "Connection"
        }

        fn field(&self, name: &str) -> Result<Option<Value>, InspectError> {
            match name {
                "host" => Ok(Some(json!(self.host))),
                "retries" => Ok(self.retries.map(|r| json!(r))),
                _ => Err(InspectError::unknown_field(self.type_name(), name)),
            }
        }

        fn set_field(&mut self, name: &str, value: Value) -> Result<(), InspectError> {
            match name {
                "host" => {
                    self.host = value.as_str().unwrap_or_default().to_string();
                    Ok(())
                }
                "retries" => {
                    self.retries = value.as_u64().map(|r| r as u32);
                    Ok(())
                }
                _ => Err(InspectError::unknown_field(self.type_name(), name)),
            }
        }

        fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Value, InspectError> {
            match name {
                "redact" => {
                    let value = args.first().and_then(Value::as_str).unwrap_or_default();
                    Ok(json!(self.redact(value)))
                }
                _ => Err(InspectError::unknown_method(self.type_name(), name)),
            }
        }
    }

    #[test]
    fn test_field_reads_private_state() {
        let conn = Connection {
            host: "db.internal".to_string(),
            retries: Some(3),
        };
        assert_eq!(conn.field("host").unwrap(), Some(json!("db.internal")));
        assert_eq!(conn.field("retries").unwrap(), Some(json!(3)));
    }

    #[test]
    fn test_unset_field_reads_as_none() {
        let conn = Connection {
            host: "db.internal".to_string(),
            retries: None,
        };
        assert_eq!(conn.field("retries").unwrap(), None);
    }

    #[test]
    fn test_unknown_field_errors() {
        let conn = Connection {
            host: "db.internal".to_string(),
            retries: None,
        };
        let err = conn.field("password").unwrap_err();
        assert!(err.to_string().contains("Connection"));
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_set_field_writes_private_state() {
        let mut conn = Connection {
            host: "db.internal".to_string(),
            retries: None,
        };
        conn.set_field("retries", json!(5)).unwrap();
        assert_eq!(conn.retries, Some(5));

        conn.set_field("host", json!("replica.internal")).unwrap();
        assert_eq!(conn.host, "replica.internal");
    }

    #[test]
    fn test_invoke_private_method() {
        let mut conn = Connection {
            host: "db.internal".to_string(),
            retries: None,
        };
        let result = conn.invoke("redact", &[json!("admin")]).unwrap();
        assert_eq!(result, json!("admin@db.internal"));
    }

    #[test]
    fn test_default_bodies_reject_everything() {
        struct Opaque;
        impl Inspect for Opaque {
            fn type_name(&self) -> &str {
                "Opaque"
            }
        }

        let mut opaque = Opaque;
        assert!(matches!(
            opaque.field("anything").unwrap_err(),
            InspectError::UnknownField { .. }
        ));
        assert!(matches!(
            opaque.set_field("anything", json!(1)).unwrap_err(),
            InspectError::UnknownField { .. }
        ));
        assert!(matches!(
            opaque.invoke("anything", &[]).unwrap_err(),
            InspectError::UnknownMethod { .. }
        ));
    }
}
