//! Building, signing and broadcasting raw transactions.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::rpc::params::{or_default, or_null, require_list, require_str, to_value};
use crate::rpc::{Outcome, Params, RpcCall, RpcClient, RpcError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TxInput {
    pub txid: String,
    pub vout: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrevTx {
    pub txid: String,
    pub vout: u32,
    pub script_pub_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redeem_script: Option<String>,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SigHashType {
    #[default]
    All,
    None,
    Single,
    AllAnyoneCanPay,
    NoneAnyoneCanPay,
    SingleAnyoneCanPay,
}

impl SigHashType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::None => "NONE",
            Self::Single => "SINGLE",
            Self::AllAnyoneCanPay => "ALL|ANYONECANPAY",
            Self::NoneAnyoneCanPay => "NONE|ANYONECANPAY",
            Self::SingleAnyoneCanPay => "SINGLE|ANYONECANPAY",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetRawTransaction {
    pub txid: String,
    pub verbose: Option<bool>,
}

impl RpcCall for GetRawTransaction {
    const METHOD: &'static str = "getrawtransaction";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![require_str(Self::METHOD, "txid", &self.txid)?, or_default(self.verbose, false)].into())
    }
}

/// Outputs are keyed by destination address (amount as value) or by an
/// asset operation such as `"transfer"` (object as value).
#[derive(Debug, Clone, Default)]
pub struct CreateRawTransaction {
    pub inputs: Vec<TxInput>,
    pub outputs: Map<String, Value>,
    pub locktime: Option<u32>,
}

impl RpcCall for CreateRawTransaction {
    const METHOD: &'static str = "createrawtransaction";

    fn encode(&self) -> Result<Params, RpcError> {
        if self.outputs.is_empty() {
            return Err(RpcError::MissingField {
                method: Self::METHOD,
                field: "outputs",
            });
        }
        Ok(vec![
            to_value(Self::METHOD, &self.inputs)?,
            Value::Object(self.outputs.clone()),
            or_default(self.locktime, 0),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SendRawTransaction {
    pub hexstring: String,
    pub allowhighfees: Option<bool>,
}

impl RpcCall for SendRawTransaction {
    const METHOD: &'static str = "sendrawtransaction";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "hexstring", &self.hexstring)?,
            or_default(self.allowhighfees, false),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignRawTransaction {
    pub hexstring: String,
    pub prevtxs: Option<Vec<PrevTx>>,
    /// When absent the wallet's own keys are used.
    pub privkeys: Option<Vec<String>>,
    pub sighashtype: Option<SigHashType>,
}

impl RpcCall for SignRawTransaction {
    const METHOD: &'static str = "signrawtransaction";

    fn encode(&self) -> Result<Params, RpcError> {
        let prevtxs = match &self.prevtxs {
            Some(prevtxs) => to_value(Self::METHOD, prevtxs)?,
            None => json!([]),
        };
        Ok(vec![
            require_str(Self::METHOD, "hexstring", &self.hexstring)?,
            prevtxs,
            or_null(self.privkeys.clone()),
            json!(self.sighashtype.unwrap_or_default().as_str()),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TestMempoolAccept {
    pub rawtxs: Vec<String>,
    pub allowhighfees: Option<bool>,
}

impl RpcCall for TestMempoolAccept {
    const METHOD: &'static str = "testmempoolaccept";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_list(Self::METHOD, "rawtxs", &self.rawtxs)?,
            or_default(self.allowhighfees, false),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetTxOutProof {
    pub txids: Vec<String>,
    pub blockhash: Option<String>,
}

impl RpcCall for GetTxOutProof {
    const METHOD: &'static str = "gettxoutproof";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_list(Self::METHOD, "txids", &self.txids)?,
            or_null(self.blockhash.clone()),
        ]
        .into())
    }
}

pub struct RawTransactions<'a> {
    pub(crate) client: &'a RpcClient,
}

impl RawTransactions<'_> {
    pub async fn get_raw_transaction(&self, request: &GetRawTransaction) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn create_raw_transaction(&self, request: &CreateRawTransaction) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn decode_raw_transaction(&self, hexstring: &str) -> Result<Outcome, RpcError> {
        let hex = require_str("decoderawtransaction", "hexstring", hexstring)?;
        Ok(self.client.invoke("decoderawtransaction", vec![hex]).await)
    }

    pub async fn decode_script(&self, hexstring: &str) -> Result<Outcome, RpcError> {
        let hex = require_str("decodescript", "hexstring", hexstring)?;
        Ok(self.client.invoke("decodescript", vec![hex]).await)
    }

    pub async fn send_raw_transaction(&self, request: &SendRawTransaction) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn sign_raw_transaction(&self, request: &SignRawTransaction) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn test_mempool_accept(&self, request: &TestMempoolAccept) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_tx_out_proof(&self, request: &GetTxOutProof) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn verify_tx_out_proof(&self, proof: &str) -> Result<Outcome, RpcError> {
        let proof = require_str("verifytxoutproof", "proof", proof)?;
        Ok(self.client.invoke("verifytxoutproof", vec![proof]).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positional(params: Params) -> Vec<Value> {
        params.as_positional().map(<[Value]>::to_vec).unwrap_or_default()
    }

    #[test]
    fn sign_defaults_use_wallet_keys() {
        let request = SignRawTransaction {
            hexstring: "0200".into(),
            ..Default::default()
        };
        assert_eq!(
            positional(request.encode().unwrap()),
            vec![json!("0200"), json!([]), Value::Null, json!("ALL")]
        );
    }

    #[test]
    fn create_raw_transaction_shape() {
        let mut outputs = Map::new();
        outputs.insert("RXaddr".into(), json!(0.5));
        let request = CreateRawTransaction {
            inputs: vec![TxInput {
                txid: "aa".into(),
                vout: 1,
                sequence: None,
            }],
            outputs,
            locktime: None,
        };
        assert_eq!(
            positional(request.encode().unwrap()),
            vec![json!([{ "txid": "aa", "vout": 1 }]), json!({ "RXaddr": 0.5 }), json!(0)]
        );

        assert!(matches!(
            CreateRawTransaction::default().encode(),
            Err(RpcError::MissingField { field: "outputs", .. })
        ));
    }

    #[test]
    fn prev_tx_field_names() {
        let prev = PrevTx {
            txid: "aa".into(),
            vout: 0,
            script_pub_key: "76a9".into(),
            redeem_script: None,
            amount: 1.0,
        };
        assert_eq!(
            serde_json::to_value(&prev).unwrap(),
            json!({ "txid": "aa", "vout": 0, "scriptPubKey": "76a9", "amount": 1.0 })
        );
    }

    #[test]
    fn list_inputs_are_required() {
        assert!(TestMempoolAccept::default().encode().is_err());
        assert!(GetTxOutProof::default().encode().is_err());

        let request = GetTxOutProof {
            txids: vec!["aa".into()],
            blockhash: None,
        };
        assert_eq!(positional(request.encode().unwrap()), vec![json!(["aa"]), Value::Null]);
    }
}
