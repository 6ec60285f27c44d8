//! Mining status, network hash rate and fee estimation.

use serde_json::{Value, json};

use super::wallet::EstimateMode;
use crate::rpc::params::{or_default, require_str};
use crate::rpc::{Outcome, Params, RpcCall, RpcClient, RpcError};

/// Average hash rate over the last `nblocks` blocks ending at `height`.
/// A height of -1 means the current tip.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetNetworkHashPs {
    pub nblocks: Option<i64>,
    pub height: Option<i64>,
}

impl RpcCall for GetNetworkHashPs {
    const METHOD: &'static str = "getnetworkhashps";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![or_default(self.nblocks, 120), or_default(self.height, -1)].into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerateToAddress {
    pub nblocks: u32,
    pub address: String,
    pub maxtries: Option<u64>,
}

impl RpcCall for GenerateToAddress {
    const METHOD: &'static str = "generatetoaddress";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            json!(self.nblocks),
            require_str(Self::METHOD, "address", &self.address)?,
            or_default(self.maxtries, 1_000_000),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EstimateSmartFee {
    /// Confirmation target in blocks.
    pub conf_target: u32,
    pub estimate_mode: Option<EstimateMode>,
}

impl RpcCall for EstimateSmartFee {
    const METHOD: &'static str = "estimatesmartfee";

    fn encode(&self) -> Result<Params, RpcError> {
        let mode = self.estimate_mode.unwrap_or(EstimateMode::Conservative);
        Ok(vec![json!(self.conf_target), json!(mode.as_str())].into())
    }
}

pub struct Mining<'a> {
    pub(crate) client: &'a RpcClient,
}

impl Mining<'_> {
    pub async fn get_mining_info(&self) -> Outcome {
        self.client.invoke("getmininginfo", ()).await
    }

    pub async fn get_network_hash_ps(&self, request: &GetNetworkHashPs) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn generate_to_address(&self, request: &GenerateToAddress) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn estimate_smart_fee(&self, request: &EstimateSmartFee) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn submit_block(&self, hexdata: &str) -> Result<Outcome, RpcError> {
        let hexdata: Value = require_str("submitblock", "hexdata", hexdata)?;
        Ok(self.client.invoke("submitblock", vec![hexdata]).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positional(params: Params) -> Vec<Value> {
        params.as_positional().map(<[Value]>::to_vec).unwrap_or_default()
    }

    #[test]
    fn network_hash_ps_defaults_to_tip() {
        assert_eq!(
            positional(GetNetworkHashPs::default().encode().unwrap()),
            vec![json!(120), json!(-1)]
        );
    }

    #[test]
    fn generate_to_address_defaults_maxtries() {
        let request = GenerateToAddress {
            nblocks: 2,
            address: "RXaddr".into(),
            maxtries: None,
        };
        assert_eq!(
            positional(request.encode().unwrap()),
            vec![json!(2), json!("RXaddr"), json!(1_000_000)]
        );
    }

    #[test]
    fn smart_fee_mode() {
        let request = EstimateSmartFee {
            conf_target: 6,
            estimate_mode: None,
        };
        assert_eq!(positional(request.encode().unwrap()), vec![json!(6), json!("CONSERVATIVE")]);

        let request = EstimateSmartFee {
            conf_target: 2,
            estimate_mode: Some(EstimateMode::Economical),
        };
        assert_eq!(positional(request.encode().unwrap())[1], json!("ECONOMICAL"));
    }
}
