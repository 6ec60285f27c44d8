//! Wallet balances, addresses and payments.

use serde_json::{Value, json};

use crate::rpc::params::{or_default, or_null, require_positive, require_str, to_value};
use crate::rpc::{Outcome, Params, RpcCall, RpcClient, RpcError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EstimateMode {
    #[default]
    Unset,
    Economical,
    Conservative,
}

impl EstimateMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "UNSET",
            Self::Economical => "ECONOMICAL",
            Self::Conservative => "CONSERVATIVE",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetBalance {
    pub account: Option<String>,
    pub minconf: Option<u32>,
    pub include_watchonly: Option<bool>,
}

impl RpcCall for GetBalance {
    const METHOD: &'static str = "getbalance";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            or_default(self.account.clone(), "*"),
            or_default(self.minconf, 1),
            or_default(self.include_watchonly, false),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetNewAddress {
    pub account: Option<String>,
}

impl RpcCall for GetNewAddress {
    const METHOD: &'static str = "getnewaddress";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![or_default(self.account.clone(), "")].into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetReceivedByAddress {
    pub address: String,
    pub minconf: Option<u32>,
}

impl RpcCall for GetReceivedByAddress {
    const METHOD: &'static str = "getreceivedbyaddress";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![require_str(Self::METHOD, "address", &self.address)?, or_default(self.minconf, 1)].into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetTransaction {
    pub txid: String,
    pub include_watchonly: Option<bool>,
}

impl RpcCall for GetTransaction {
    const METHOD: &'static str = "gettransaction";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "txid", &self.txid)?,
            or_default(self.include_watchonly, false),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportPrivKey {
    pub privkey: String,
    pub label: Option<String>,
    pub rescan: Option<bool>,
}

impl RpcCall for ImportPrivKey {
    const METHOD: &'static str = "importprivkey";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "privkey", &self.privkey)?,
            or_default(self.label.clone(), ""),
            or_default(self.rescan, true),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListTransactions {
    pub account: Option<String>,
    pub count: Option<u32>,
    pub skip: Option<u32>,
    pub include_watchonly: Option<bool>,
}

impl RpcCall for ListTransactions {
    const METHOD: &'static str = "listtransactions";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            or_default(self.account.clone(), "*"),
            or_default(self.count, 10),
            or_default(self.skip, 0),
            or_default(self.include_watchonly, false),
        ]
        .into())
    }
}

/// Filters applied by `listunspent` on top of the confirmation range.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnspentQueryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_sum_amount: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ListUnspent {
    pub minconf: Option<u32>,
    pub maxconf: Option<u32>,
    pub addresses: Vec<String>,
    pub include_unsafe: Option<bool>,
    pub query_options: Option<UnspentQueryOptions>,
}

impl RpcCall for ListUnspent {
    const METHOD: &'static str = "listunspent";

    fn encode(&self) -> Result<Params, RpcError> {
        let mut params = vec![
            or_default(self.minconf, 1),
            or_default(self.maxconf, 9_999_999),
            to_value(Self::METHOD, &self.addresses)?,
            or_default(self.include_unsafe, true),
        ];
        if let Some(options) = &self.query_options {
            params.push(to_value(Self::METHOD, options)?);
        }
        Ok(params.into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SendToAddress {
    pub address: String,
    pub amount: f64,
    pub comment: Option<String>,
    pub comment_to: Option<String>,
    pub subtract_fee_from_amount: Option<bool>,
    pub conf_target: Option<u32>,
    pub estimate_mode: Option<EstimateMode>,
}

impl RpcCall for SendToAddress {
    const METHOD: &'static str = "sendtoaddress";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "address", &self.address)?,
            require_positive(Self::METHOD, "amount", self.amount)?,
            or_default(self.comment.clone(), ""),
            or_default(self.comment_to.clone(), ""),
            or_default(self.subtract_fee_from_amount, false),
            or_null(self.conf_target),
            json!(self.estimate_mode.unwrap_or_default().as_str()),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignMessage {
    pub address: String,
    pub message: String,
}

impl RpcCall for SignMessage {
    const METHOD: &'static str = "signmessage";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "address", &self.address)?,
            Value::String(self.message.clone()),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct WalletPassphrase {
    pub passphrase: String,
    /// Seconds to keep the wallet unlocked.
    pub timeout: u64,
}

impl RpcCall for WalletPassphrase {
    const METHOD: &'static str = "walletpassphrase";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![require_str(Self::METHOD, "passphrase", &self.passphrase)?, json!(self.timeout)].into())
    }
}

pub struct Wallet<'a> {
    pub(crate) client: &'a RpcClient,
}

impl Wallet<'_> {
    pub async fn get_wallet_info(&self) -> Outcome {
        self.client.invoke("getwalletinfo", ()).await
    }

    pub async fn get_unconfirmed_balance(&self) -> Outcome {
        self.client.invoke("getunconfirmedbalance", ()).await
    }

    pub async fn list_lock_unspent(&self) -> Outcome {
        self.client.invoke("listlockunspent", ()).await
    }

    pub async fn wallet_lock(&self) -> Outcome {
        self.client.invoke("walletlock", ()).await
    }

    pub async fn backup_wallet(&self, destination: &str) -> Result<Outcome, RpcError> {
        let destination = require_str("backupwallet", "destination", destination)?;
        Ok(self.client.invoke("backupwallet", vec![destination]).await)
    }

    pub async fn dump_priv_key(&self, address: &str) -> Result<Outcome, RpcError> {
        let address = require_str("dumpprivkey", "address", address)?;
        Ok(self.client.invoke("dumpprivkey", vec![address]).await)
    }

    pub async fn get_balance(&self, request: &GetBalance) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_new_address(&self, request: &GetNewAddress) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_received_by_address(&self, request: &GetReceivedByAddress) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_transaction(&self, request: &GetTransaction) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn import_priv_key(&self, request: &ImportPrivKey) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn list_transactions(&self, request: &ListTransactions) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn list_unspent(&self, request: &ListUnspent) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn send_to_address(&self, request: &SendToAddress) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn set_tx_fee(&self, amount: f64) -> Outcome {
        self.client.invoke("settxfee", vec![json!(amount)]).await
    }

    pub async fn sign_message(&self, request: &SignMessage) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn wallet_passphrase(&self, request: &WalletPassphrase) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }
}
