//! Node information, address utilities and the address index.
//!
//! The address-index procedures (`getaddress*`) take one object describing
//! the query as their first positional parameter; they are only available on
//! nodes started with `-addressindex`.

use serde_json::{Value, json};

use crate::rpc::params::{NamedParams, or_default, require_companion, require_list, require_str};
use crate::rpc::{Outcome, Params, RpcCall, RpcClient, RpcError};

#[derive(Debug, Clone, Default)]
pub struct GetAddressBalance {
    pub addresses: Vec<String>,
    pub include_assets: Option<bool>,
}

impl RpcCall for GetAddressBalance {
    const METHOD: &'static str = "getaddressbalance";

    fn encode(&self) -> Result<Params, RpcError> {
        let query = NamedParams::new().field("addresses", require_list(Self::METHOD, "addresses", &self.addresses)?);
        with_include_assets(query.into_single_positional(), self.include_assets)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetAddressMempool {
    pub addresses: Vec<String>,
    pub include_assets: Option<bool>,
}

impl RpcCall for GetAddressMempool {
    const METHOD: &'static str = "getaddressmempool";

    fn encode(&self) -> Result<Params, RpcError> {
        let query = NamedParams::new().field("addresses", require_list(Self::METHOD, "addresses", &self.addresses)?);
        with_include_assets(query.into_single_positional(), self.include_assets)
    }
}

fn with_include_assets(params: Params, include_assets: Option<bool>) -> Result<Params, RpcError> {
    match (params, include_assets) {
        (Params::Positional(mut values), Some(include)) => {
            values.push(Value::Bool(include));
            Ok(Params::Positional(values))
        },
        (params, _) => Ok(params),
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetAddressUtxos {
    pub addresses: Vec<String>,
    pub chain_info: Option<bool>,
    pub asset_name: Option<String>,
}

impl RpcCall for GetAddressUtxos {
    const METHOD: &'static str = "getaddressutxos";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(NamedParams::new()
            .field("addresses", require_list(Self::METHOD, "addresses", &self.addresses)?)
            .optional("chainInfo", self.chain_info)
            .optional("assetName", self.asset_name.clone())
            .into_single_positional())
    }
}

/// Block height range shared by the delta and txid lookups. Either both ends
/// are given or neither.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeightRange {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl HeightRange {
    fn check(&self, method: &'static str) -> Result<(), RpcError> {
        require_companion(method, "start", self.start.is_some(), "end", self.end.is_some())?;
        require_companion(method, "end", self.end.is_some(), "start", self.start.is_some())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetAddressDeltas {
    pub addresses: Vec<String>,
    pub range: HeightRange,
    pub chain_info: Option<bool>,
    pub asset_name: Option<String>,
}

impl RpcCall for GetAddressDeltas {
    const METHOD: &'static str = "getaddressdeltas";

    fn encode(&self) -> Result<Params, RpcError> {
        let addresses = require_list(Self::METHOD, "addresses", &self.addresses)?;
        self.range.check(Self::METHOD)?;
        Ok(NamedParams::new()
            .field("addresses", addresses)
            .optional("start", self.range.start)
            .optional("end", self.range.end)
            .optional("chainInfo", self.chain_info)
            .optional("assetName", self.asset_name.clone())
            .into_single_positional())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetAddressTxids {
    pub addresses: Vec<String>,
    pub range: HeightRange,
}

impl RpcCall for GetAddressTxids {
    const METHOD: &'static str = "getaddresstxids";

    fn encode(&self) -> Result<Params, RpcError> {
        let addresses = require_list(Self::METHOD, "addresses", &self.addresses)?;
        self.range.check(Self::METHOD)?;
        Ok(NamedParams::new()
            .field("addresses", addresses)
            .optional("start", self.range.start)
            .optional("end", self.range.end)
            .into_single_positional())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetMemoryInfo {
    /// "stats" or "mallocinfo".
    pub mode: Option<String>,
}

impl RpcCall for GetMemoryInfo {
    const METHOD: &'static str = "getmemoryinfo";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![or_default(self.mode.clone(), "stats")].into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct VerifyMessage {
    pub address: String,
    pub signature: String,
    pub message: String,
}

impl RpcCall for VerifyMessage {
    const METHOD: &'static str = "verifymessage";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "address", &self.address)?,
            require_str(Self::METHOD, "signature", &self.signature)?,
            json!(self.message),
        ]
        .into())
    }
}

pub struct Misc<'a> {
    pub(crate) client: &'a RpcClient,
}

impl Misc<'_> {
    pub async fn get_info(&self) -> Outcome {
        self.client.invoke("getinfo", ()).await
    }

    pub async fn get_memory_info(&self, request: &GetMemoryInfo) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn validate_address(&self, address: &str) -> Result<Outcome, RpcError> {
        let address = require_str("validateaddress", "address", address)?;
        Ok(self.client.invoke("validateaddress", vec![address]).await)
    }

    pub async fn verify_message(&self, request: &VerifyMessage) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_address_balance(&self, request: &GetAddressBalance) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_address_deltas(&self, request: &GetAddressDeltas) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_address_mempool(&self, request: &GetAddressMempool) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_address_txids(&self, request: &GetAddressTxids) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_address_utxos(&self, request: &GetAddressUtxos) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positional(params: Params) -> Vec<Value> {
        params.as_positional().map(<[Value]>::to_vec).unwrap_or_default()
    }

    fn addresses() -> Vec<String> {
        vec!["RXaddr1".into(), "RXaddr2".into()]
    }

    #[test]
    fn address_balance_wraps_query_in_array() {
        let request = GetAddressBalance {
            addresses: addresses(),
            include_assets: None,
        };
        assert_eq!(
            positional(request.encode().unwrap()),
            vec![json!({ "addresses": ["RXaddr1", "RXaddr2"] })]
        );

        let request = GetAddressBalance {
            include_assets: Some(true),
            ..request
        };
        assert_eq!(positional(request.encode().unwrap())[1], json!(true));
    }

    #[test]
    fn address_queries_need_addresses() {
        assert!(matches!(
            GetAddressUtxos::default().encode(),
            Err(RpcError::MissingField {
                method: "getaddressutxos",
                field: "addresses"
            })
        ));
    }

    #[test]
    fn height_range_needs_both_ends() {
        let request = GetAddressDeltas {
            addresses: addresses(),
            range: HeightRange {
                start: Some(100),
                end: None,
            },
            ..Default::default()
        };
        assert!(matches!(
            request.encode(),
            Err(RpcError::DependentField {
                field: "start",
                requires: "end",
                ..
            })
        ));

        let request = GetAddressTxids {
            addresses: addresses(),
            range: HeightRange {
                start: None,
                end: Some(200),
            },
        };
        assert!(matches!(
            request.encode(),
            Err(RpcError::DependentField { field: "end", .. })
        ));

        let request = GetAddressTxids {
            addresses: addresses(),
            range: HeightRange {
                start: Some(100),
                end: Some(200),
            },
        };
        assert_eq!(
            positional(request.encode().unwrap()),
            vec![json!({ "addresses": ["RXaddr1", "RXaddr2"], "start": 100, "end": 200 })]
        );
    }

    #[test]
    fn memory_info_defaults_to_stats() {
        assert_eq!(positional(GetMemoryInfo::default().encode().unwrap()), vec![json!("stats")]);
    }
}
