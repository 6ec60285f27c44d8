//! Argument kinds of the known procedures, used to turn textual arguments
//! (command line, scripts) into typed JSON parameters.

use serde_json::Value;

use super::error::RpcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Str,
    Int,
    Float,
    Bool,
    Obj,
    Arr,
}

use ArgKind::{Arr, Bool, Float, Int, Obj, Str};

static CALL_SPECS: &[(&str, &[ArgKind])] = &[
    // assets
    ("getassetdata", &[Str]),
    ("getcacheinfo", &[]),
    ("getsnapshot", &[Str, Int]),
    ("issue", &[Str, Float, Str, Str, Int, Bool, Bool, Str]),
    ("issueunique", &[Str, Arr, Arr, Str, Str]),
    ("listaddressesbyasset", &[Str, Bool, Int, Int]),
    ("listassetbalancesbyaddress", &[Str, Bool, Int, Int]),
    ("listassets", &[Str, Bool, Int, Int]),
    ("listmyassets", &[Str, Bool, Int, Int, Int]),
    ("purgesnapshot", &[Str, Int]),
    ("reissue", &[Str, Float, Str, Str, Bool, Int, Str]),
    ("transfer", &[Str, Float, Str, Str, Int, Str, Str]),
    ("transferfromaddress", &[Str, Str, Float, Str, Str, Int, Str, Str]),
    ("transferfromaddresses", &[Str, Arr, Float, Str, Str, Int, Str, Str]),
    // blockchain
    ("clearmempool", &[]),
    ("decodeblock", &[Str]),
    ("getbestblockhash", &[]),
    ("getblock", &[Str, Int]),
    ("getblockchaininfo", &[]),
    ("getblockcount", &[]),
    ("getblockdeltas", &[Str]),
    ("getblockhash", &[Int]),
    ("getblockhashes", &[Int, Int, Obj]),
    ("getblockheader", &[Str, Bool]),
    ("getchaintips", &[]),
    ("getchaintxstats", &[Int, Str]),
    ("getdifficulty", &[]),
    ("getmempoolancestors", &[Str, Bool]),
    ("getmempooldescendants", &[Str, Bool]),
    ("getmempoolentry", &[Str]),
    ("getmempoolinfo", &[]),
    ("getrawmempool", &[Bool]),
    ("gettxout", &[Str, Int, Bool]),
    ("gettxoutsetinfo", &[]),
    ("invalidateblock", &[Str]),
    ("preciousblock", &[Str]),
    ("pruneblockchain", &[Int]),
    ("reconsiderblock", &[Str]),
    ("savemempool", &[]),
    ("verifychain", &[Int, Int]),
    ("waitforblock", &[Str, Int]),
    ("waitforblockheight", &[Int, Int]),
    ("waitfornewblock", &[Int]),
    // messages
    ("clearmessages", &[]),
    ("sendmessage", &[Str, Str, Int]),
    ("subscribetochannel", &[Str]),
    ("unsubscribefromchannel", &[Str]),
    ("viewallmessagechannels", &[]),
    ("viewallmessages", &[]),
    // mining
    ("estimatesmartfee", &[Int, Str]),
    ("generatetoaddress", &[Int, Str, Int]),
    ("getmininginfo", &[]),
    ("getnetworkhashps", &[Int, Int]),
    ("submitblock", &[Str]),
    // misc
    ("getaddressbalance", &[Obj]),
    ("getaddressdeltas", &[Obj]),
    ("getaddressmempool", &[Obj]),
    ("getaddresstxids", &[Obj]),
    ("getaddressutxos", &[Obj]),
    ("getinfo", &[]),
    ("getmemoryinfo", &[Str]),
    ("validateaddress", &[Str]),
    ("verifymessage", &[Str, Str, Str]),
    // net
    ("addnode", &[Str, Str]),
    ("clearbanned", &[]),
    ("disconnectnode", &[Str, Int]),
    ("getaddednodeinfo", &[Str]),
    ("getconnectioncount", &[]),
    ("getnettotals", &[]),
    ("getnetworkinfo", &[]),
    ("getpeerinfo", &[]),
    ("listbanned", &[]),
    ("ping", &[]),
    ("setban", &[Str, Str, Int, Bool]),
    ("setnetworkactive", &[Bool]),
    // restricted assets, qualifiers and tags
    ("addtagtoaddress", &[Str, Str, Str, Str]),
    ("checkaddressrestriction", &[Str, Str]),
    ("checkaddresstag", &[Str, Str]),
    ("checkglobalrestriction", &[Str]),
    ("freezeaddress", &[Str, Str, Str, Str]),
    ("freezerestrictedasset", &[Str, Str, Str]),
    ("getverifierstring", &[Str]),
    ("issuequalifierasset", &[Str, Float, Str, Str, Bool, Str]),
    ("issuerestrictedasset", &[Str, Float, Str, Str, Str, Int, Bool, Bool, Str]),
    ("isvalidverifierstring", &[Str]),
    ("listaddressesfortag", &[Str]),
    ("listaddressrestrictions", &[Str]),
    ("listglobalrestrictions", &[]),
    ("listtagsforaddress", &[Str]),
    ("reissuerestrictedasset", &[Str, Float, Str, Bool, Str, Str, Int, Bool, Str]),
    ("removetagfromaddress", &[Str, Str, Str, Str]),
    ("transferqualifier", &[Str, Float, Str, Str, Str, Int]),
    ("unfreezeaddress", &[Str, Str, Str, Str]),
    ("unfreezerestrictedasset", &[Str, Str, Str]),
    // rewards
    ("cancelsnapshotrequest", &[Str, Int]),
    ("distributereward", &[Str, Int, Str, Float, Str, Str]),
    ("getdistributestatus", &[Str, Int, Str, Float, Str]),
    ("getsnapshotrequest", &[Str, Int]),
    ("listsnapshotrequests", &[Str, Int]),
    ("requestsnapshot", &[Str, Int]),
    // raw transactions
    ("createrawtransaction", &[Arr, Obj, Int]),
    ("decoderawtransaction", &[Str]),
    ("decodescript", &[Str]),
    ("getrawtransaction", &[Str, Bool]),
    ("gettxoutproof", &[Arr, Str]),
    ("sendrawtransaction", &[Str, Bool]),
    ("signrawtransaction", &[Str, Arr, Arr, Str]),
    ("testmempoolaccept", &[Arr, Bool]),
    ("verifytxoutproof", &[Str]),
    // wallet
    ("dumpprivkey", &[Str]),
    ("getbalance", &[Str, Int, Bool]),
    ("getnewaddress", &[Str]),
    ("getreceivedbyaddress", &[Str, Int]),
    ("getunconfirmedbalance", &[]),
    ("gettransaction", &[Str, Bool]),
    ("getwalletinfo", &[]),
    ("listlockunspent", &[]),
    ("listtransactions", &[Str, Int, Int, Bool]),
    ("listunspent", &[Int, Int, Arr, Bool]),
    ("sendtoaddress", &[Str, Float, Str, Str, Bool, Int, Str]),
    ("settxfee", &[Float]),
    ("signmessage", &[Str, Str]),
    ("walletlock", &[]),
    ("walletpassphrase", &[Str, Int]),
    ("importprivkey", &[Str, Str, Bool]),
    ("backupwallet", &[Str]),
];

/// Declared argument kinds of `method`, or `None` for unknown procedures.
pub fn arg_kinds(method: &str) -> Option<&'static [ArgKind]> {
    CALL_SPECS
        .iter()
        .find(|(name, _)| *name == method)
        .map(|(_, kinds)| *kinds)
}

/// Converts textual arguments into JSON parameters for `method`.
///
/// Arguments beyond the declared ones, and all arguments of unknown
/// procedures, are taken as JSON when they parse and as strings otherwise.
pub fn coerce_args(method: &str, args: &[String]) -> Result<Vec<Value>, RpcError> {
    let kinds = arg_kinds(method).unwrap_or_default();
    args.iter()
        .enumerate()
        .map(|(i, arg)| match kinds.get(i) {
            Some(kind) => coerce(method, *kind, arg),
            None => Ok(serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.clone()))),
        })
        .collect()
}

fn coerce(method: &str, kind: ArgKind, arg: &str) -> Result<Value, RpcError> {
    let invalid = |reason: String| RpcError::InvalidArgument {
        method: method.to_string(),
        reason,
    };

    match kind {
        Str => Ok(Value::String(arg.to_string())),
        Int => arg
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| invalid(format!("'{arg}' is not an integer: {e}"))),
        Float => arg
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(|f| serde_json::Number::from_f64(f).map(Value::Number))
            .ok_or_else(|| invalid(format!("'{arg}' is not a number"))),
        Bool => Ok(Value::Bool(matches!(arg.trim().to_ascii_lowercase().as_str(), "1" | "true"))),
        Obj | Arr => {
            let value: Value =
                serde_json::from_str(arg).map_err(|e| invalid(format!("'{arg}' is not valid JSON: {e}")))?;
            match (kind, &value) {
                (Obj, Value::Object(_)) | (Arr, Value::Array(_)) => Ok(value),
                (Obj, _) => Err(invalid(format!("'{arg}' is not a JSON object"))),
                _ => Err(invalid(format!("'{arg}' is not a JSON array"))),
            }
        },
    }
}
