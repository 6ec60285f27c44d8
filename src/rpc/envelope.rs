// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

pub const JSON_RPC_VERSION: &str = "2.0";

/// Parameters of one remote procedure call.
///
/// Most procedures take a positional array. A few accept a single object of
/// named arguments instead; which shape is used is decided by the procedure,
/// never inferred from the values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl Params {
    pub fn none() -> Self {
        Params::Positional(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            Params::Positional(values) => values.len(),
            Params::Named(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_positional(&self) -> Option<&[Value]> {
        match self {
            Params::Positional(values) => Some(values),
            Params::Named(_) => None,
        }
    }

    pub fn as_named(&self) -> Option<&Map<String, Value>> {
        match self {
            Params::Named(map) => Some(map),
            Params::Positional(_) => None,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::none()
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Params::Positional(values)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params::Named(map)
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Params::none()
    }
}

/// A JSON-RPC 2.0 request object.
///
/// The correlation id is a random v4 UUID, which keeps concurrent requests and
/// the elements of one batch distinguishable without any shared counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub jsonrpc: String,
    pub id: String,
    pub method: String,
    pub params: Params,
}

impl Envelope {
    pub fn new(method: impl Into<String>, params: Params) -> Self {
        Self {
            jsonrpc: JSON_RPC_VERSION.to_string(),
            id: Uuid::new_v4().to_string(),
            method: method.into(),
            params,
        }
    }

    /// The wire form, as derived by `Serialize`.
    pub fn to_value(&self) -> Value {
        json!(self)
    }

    /// The serialized request body.
    pub fn to_body(&self) -> String {
        self.to_value().to_string()
    }
}

/// Serializes several envelopes as one batch body (a JSON array).
pub fn batch_body(envelopes: &[Envelope]) -> String {
    json!(envelopes).to_string()
}

/// Normalizes a response `id` to the string form used for matching.
pub(crate) fn id_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_wire_fields() {
        let envelope = Envelope::new("getblockhash", Params::Positional(vec![json!(100)]));
        let value: Value = serde_json::from_str(&envelope.to_body()).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "getblockhash");
        assert_eq!(value["params"], json!([100]));
        assert_eq!(value["id"], json!(envelope.id));
    }

    #[test]
    fn named_params_serialize_as_object() {
        let mut map = Map::new();
        map.insert("asset_name".into(), json!("ROSIE"));
        let envelope = Envelope::new("issue", Params::Named(map));
        let value: Value = serde_json::from_str(&envelope.to_body()).unwrap();

        assert_eq!(value["params"], json!({ "asset_name": "ROSIE" }));
    }

    #[test]
    fn body_round_trips_through_serde() {
        let envelope = Envelope::new("getblock", Params::Positional(vec![json!("00ab"), json!(1)]));
        let parsed: Envelope = serde_json::from_str(&envelope.to_body()).unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn batch_body_round_trips_every_envelope() {
        let mut named = Map::new();
        named.insert("asset_name".into(), json!("ROSIE"));
        let envelopes = vec![
            Envelope::new("getblockhash", Params::Positional(vec![json!(7)])),
            Envelope::new("issue", Params::Named(named)),
        ];
        let parsed: Vec<Envelope> = serde_json::from_str(&batch_body(&envelopes)).unwrap();
        assert_eq!(parsed, envelopes);
    }

    #[test]
    fn correlation_ids_are_unique() {
        let a = Envelope::new("ping", Params::none());
        let b = Envelope::new("ping", Params::none());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn batch_body_is_an_array() {
        let envelopes = vec![
            Envelope::new("getblockcount", Params::none()),
            Envelope::new("getbestblockhash", Params::none()),
        ];
        let value: Value = serde_json::from_str(&batch_body(&envelopes)).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn id_key_handles_numeric_ids() {
        assert_eq!(id_key(&json!("abc")), "abc");
        assert_eq!(id_key(&json!(42)), "42");
    }
}
