//! Parameter encoding for typed calls.
//!
//! Each remote procedure has a request type implementing [`RpcCall`]. Its
//! `encode` is a pure function producing the exact wire parameters the node's
//! dispatcher expects: optional fields absent from the request are replaced by
//! literal defaults so that positional arrays always have the full length, and
//! missing required or dependent fields are rejected before any network access.

use serde::Serialize;
use serde_json::{Map, Value};

use super::envelope::Params;
use super::error::RpcError;

/// A typed request for one remote procedure.
pub trait RpcCall {
    /// Wire name of the remote procedure.
    const METHOD: &'static str;

    fn encode(&self) -> Result<Params, RpcError>;
}

/// Returns the value of a required string field, rejecting empty strings.
pub fn require_str(method: &'static str, field: &'static str, value: &str) -> Result<Value, RpcError> {
    if value.trim().is_empty() {
        return Err(RpcError::MissingField { method, field });
    }
    Ok(Value::String(value.to_string()))
}

/// Returns the value of a required list field, rejecting empty lists.
pub fn require_list<T: Serialize>(method: &'static str, field: &'static str, values: &[T]) -> Result<Value, RpcError> {
    if values.is_empty() {
        return Err(RpcError::MissingField { method, field });
    }
    to_value(method, values)
}

/// Returns a required amount, rejecting zero, negative and non-finite values.
pub fn require_positive(method: &'static str, field: &'static str, value: f64) -> Result<Value, RpcError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(RpcError::InvalidArgument {
            method: method.to_string(),
            reason: format!("{field} must be a positive amount, got {value}"),
        });
    }
    Ok(Value::from(value))
}

/// Rejects `field` when it is supplied without `requires`.
pub fn require_companion(
    method: &'static str,
    field: &'static str,
    present: bool,
    requires: &'static str,
    companion_present: bool,
) -> Result<(), RpcError> {
    if present && !companion_present {
        return Err(RpcError::DependentField { method, field, requires });
    }
    Ok(())
}

/// The field's value, or the procedure's literal default when it is absent.
pub fn or_default<T: Into<Value>>(value: Option<T>, default: impl Into<Value>) -> Value {
    value.map_or_else(|| default.into(), Into::into)
}

/// The field's value, or JSON `null` when it is absent.
pub fn or_null<T: Into<Value>>(value: Option<T>) -> Value {
    value.map_or(Value::Null, Into::into)
}

pub fn to_value<T: Serialize + ?Sized>(method: &'static str, value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::InvalidArgument {
        method: method.to_string(),
        reason: e.to_string(),
    })
}

/// Builder for procedures whose single parameter is an object of named fields.
#[derive(Debug, Default)]
pub struct NamedParams {
    fields: Map<String, Value>,
}

impl NamedParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Adds the field only when a value is present.
    pub fn optional(self, name: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    /// The named fields as the whole `params` object.
    pub fn into_params(self) -> Params {
        Params::Named(self.fields)
    }

    /// The named fields as the only element of a positional array.
    pub fn into_single_positional(self) -> Params {
        Params::Positional(vec![Value::Object(self.fields)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_required_string_is_missing() {
        let err = require_str("getassetdata", "asset_name", "  ").unwrap_err();
        assert!(matches!(
            err,
            RpcError::MissingField {
                field: "asset_name",
                ..
            }
        ));
        assert_eq!(require_str("getassetdata", "asset_name", "ROSIE").unwrap(), json!("ROSIE"));
    }

    #[test]
    fn empty_required_list_is_missing() {
        let empty: [String; 0] = [];
        assert!(require_list("getaddressbalance", "addresses", &empty).is_err());
        assert_eq!(
            require_list("getaddressbalance", "addresses", &["RXaddr"]).unwrap(),
            json!(["RXaddr"])
        );
    }

    #[test]
    fn companion_rule() {
        assert!(require_companion("listassets", "start", true, "count", false).is_err());
        assert!(require_companion("listassets", "start", true, "count", true).is_ok());
        assert!(require_companion("listassets", "start", false, "count", false).is_ok());
    }

    #[test]
    fn amounts_must_be_positive() {
        assert_eq!(require_positive("transfer", "qty", 2.5).unwrap(), json!(2.5));
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = require_positive("transfer", "qty", bad).unwrap_err();
            assert!(err.to_string().contains("qty"), "{bad}");
        }
    }

    #[test]
    fn absent_fields_take_defaults() {
        assert_eq!(or_default(None::<u32>, 1), json!(1));
        assert_eq!(or_default(Some(0), 1), json!(0));
        assert_eq!(or_null(None::<String>), Value::Null);
        assert_eq!(or_null(Some("abc")), json!("abc"));
    }

    #[test]
    fn named_params_shapes() {
        let named = NamedParams::new()
            .field("addresses", json!(["RXaddr"]))
            .optional("assetName", None::<String>)
            .field("chainInfo", false);

        assert_eq!(
            named.into_single_positional(),
            Params::Positional(vec![json!({ "addresses": ["RXaddr"], "chainInfo": false })])
        );

        let params = NamedParams::new().field("asset_name", "ROSIE").into_params();
        assert_eq!(params.as_named().map(|m| m.len()), Some(1));
    }
}
