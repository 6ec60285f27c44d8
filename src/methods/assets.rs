//! Asset issuance, transfer and listing.
//!
//! `issue`, `issueunique` and `reissue` take named parameters; everything
//! else here is positional. For named procedures only the supplied optional
//! fields are sent and the node applies its own defaults to the rest.

use serde_json::{Value, json};

use crate::rpc::params::{NamedParams, or_default, require_companion, require_list, require_positive, require_str};
use crate::rpc::{Outcome, Params, RpcCall, RpcClient, RpcError};

/// Page size used when a listing call is given an offset but no count.
pub const LIST_ALL_COUNT: u64 = 999_999_999;
/// Page size of the by-address and by-asset listings.
pub const ADDRESS_LIST_COUNT: u64 = 50_000;

fn require_qty(method: &'static str, qty: f64) -> Result<Value, RpcError> {
    require_positive(method, "qty", qty)
}

#[derive(Debug, Clone, Default)]
pub struct Issue {
    pub asset_name: String,
    pub qty: Option<f64>,
    pub to_address: Option<String>,
    pub change_address: Option<String>,
    pub units: Option<u8>,
    pub reissuable: Option<bool>,
    pub has_ipfs: Option<bool>,
    pub ipfs_hash: Option<String>,
}

impl RpcCall for Issue {
    const METHOD: &'static str = "issue";

    fn encode(&self) -> Result<Params, RpcError> {
        let asset_name = require_str(Self::METHOD, "asset_name", &self.asset_name)?;
        let has_ipfs = self.has_ipfs.unwrap_or(false);
        require_companion(Self::METHOD, "has_ipfs", has_ipfs, "ipfs_hash", self.ipfs_hash.is_some())?;
        let qty = self.qty.map(|q| require_qty(Self::METHOD, q)).transpose()?;

        Ok(NamedParams::new()
            .field("asset_name", asset_name)
            .optional("qty", qty)
            .optional("to_address", self.to_address.clone())
            .optional("change_address", self.change_address.clone())
            .optional("units", self.units)
            .optional("reissuable", self.reissuable)
            .optional("has_ipfs", self.has_ipfs)
            .optional("ipfs_hash", self.ipfs_hash.clone())
            .into_params())
    }
}

#[derive(Debug, Clone, Default)]
pub struct IssueUnique {
    pub root_name: String,
    pub asset_tags: Vec<String>,
    pub ipfs_hashes: Option<Vec<String>>,
    pub to_address: Option<String>,
    pub change_address: Option<String>,
}

impl RpcCall for IssueUnique {
    const METHOD: &'static str = "issueunique";

    fn encode(&self) -> Result<Params, RpcError> {
        let root_name = require_str(Self::METHOD, "root_name", &self.root_name)?;
        let asset_tags = require_list(Self::METHOD, "asset_tags", &self.asset_tags)?;
        if let Some(hashes) = &self.ipfs_hashes {
            if hashes.len() != self.asset_tags.len() {
                return Err(RpcError::InvalidArgument {
                    method: Self::METHOD.to_string(),
                    reason: format!(
                        "{} ipfs hashes given for {} asset tags",
                        hashes.len(),
                        self.asset_tags.len()
                    ),
                });
            }
        }

        Ok(NamedParams::new()
            .field("root_name", root_name)
            .field("asset_tags", asset_tags)
            .optional("ipfs_hashes", self.ipfs_hashes.clone())
            .optional("to_address", self.to_address.clone())
            .optional("change_address", self.change_address.clone())
            .into_params())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Reissue {
    pub asset_name: String,
    pub qty: f64,
    pub to_address: String,
    pub change_address: Option<String>,
    pub reissuable: Option<bool>,
    pub new_units: Option<i8>,
    pub new_ipfs: Option<String>,
}

impl RpcCall for Reissue {
    const METHOD: &'static str = "reissue";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(NamedParams::new()
            .field("asset_name", require_str(Self::METHOD, "asset_name", &self.asset_name)?)
            .field("qty", require_qty(Self::METHOD, self.qty)?)
            .field("to_address", require_str(Self::METHOD, "to_address", &self.to_address)?)
            .optional("change_address", self.change_address.clone())
            .optional("reissuable", self.reissuable)
            .optional("new_units", self.new_units)
            .optional("new_ipfs", self.new_ipfs.clone())
            .into_params())
    }
}

/// Lists asset names known to the node, optionally filtered by a prefix
/// pattern such as `"ROSIE*"`.
#[derive(Debug, Clone, Default)]
pub struct ListAssets {
    pub asset: Option<String>,
    pub verbose: Option<bool>,
    pub count: Option<u64>,
    pub start: Option<i64>,
}

impl RpcCall for ListAssets {
    const METHOD: &'static str = "listassets";

    fn encode(&self) -> Result<Params, RpcError> {
        require_companion(Self::METHOD, "start", self.start.is_some(), "count", self.count.is_some())?;
        Ok(vec![
            or_default(self.asset.clone(), "*"),
            or_default(self.verbose, false),
            or_default(self.count, LIST_ALL_COUNT),
            or_default(self.start, 0),
        ]
        .into())
    }
}

/// Lists the assets held by this wallet.
#[derive(Debug, Clone, Default)]
pub struct ListMyAssets {
    pub asset: Option<String>,
    pub verbose: Option<bool>,
    pub count: Option<u64>,
    pub start: Option<i64>,
    pub confs: Option<u32>,
}

impl RpcCall for ListMyAssets {
    const METHOD: &'static str = "listmyassets";

    fn encode(&self) -> Result<Params, RpcError> {
        require_companion(Self::METHOD, "confs", self.confs.is_some(), "start", self.start.is_some())?;
        Ok(vec![
            or_default(self.asset.clone(), "*"),
            or_default(self.verbose, false),
            or_default(self.count, LIST_ALL_COUNT),
            or_default(self.start, 0),
            or_default(self.confs, 0),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListAddressesByAsset {
    pub asset_name: String,
    pub onlytotal: Option<bool>,
    pub count: Option<u64>,
    pub start: Option<i64>,
}

impl RpcCall for ListAddressesByAsset {
    const METHOD: &'static str = "listaddressesbyasset";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "asset_name", &self.asset_name)?,
            or_default(self.onlytotal, false),
            or_default(self.count, ADDRESS_LIST_COUNT),
            or_default(self.start, 0),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListAssetBalancesByAddress {
    pub address: String,
    pub onlytotal: Option<bool>,
    pub count: Option<u64>,
    pub start: Option<i64>,
}

impl RpcCall for ListAssetBalancesByAddress {
    const METHOD: &'static str = "listassetbalancesbyaddress";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "address", &self.address)?,
            or_default(self.onlytotal, false),
            or_default(self.count, ADDRESS_LIST_COUNT),
            or_default(self.start, 0),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transfer {
    pub asset_name: String,
    pub qty: f64,
    pub to_address: String,
    pub message: Option<String>,
    pub expire_time: Option<u64>,
    pub change_address: Option<String>,
    pub asset_change_address: Option<String>,
}

impl RpcCall for Transfer {
    const METHOD: &'static str = "transfer";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "asset_name", &self.asset_name)?,
            require_qty(Self::METHOD, self.qty)?,
            require_str(Self::METHOD, "to_address", &self.to_address)?,
            or_default(self.message.clone(), ""),
            or_default(self.expire_time, 0),
            or_default(self.change_address.clone(), ""),
            or_default(self.asset_change_address.clone(), ""),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransferFromAddress {
    pub asset_name: String,
    pub from_address: String,
    pub qty: f64,
    pub to_address: String,
    pub message: Option<String>,
    pub expire_time: Option<u64>,
    pub rvn_change_address: Option<String>,
    pub asset_change_address: Option<String>,
}

impl RpcCall for TransferFromAddress {
    const METHOD: &'static str = "transferfromaddress";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "asset_name", &self.asset_name)?,
            require_str(Self::METHOD, "from_address", &self.from_address)?,
            require_qty(Self::METHOD, self.qty)?,
            require_str(Self::METHOD, "to_address", &self.to_address)?,
            or_default(self.message.clone(), ""),
            or_default(self.expire_time, 0),
            or_default(self.rvn_change_address.clone(), ""),
            or_default(self.asset_change_address.clone(), ""),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransferFromAddresses {
    pub asset_name: String,
    pub from_addresses: Vec<String>,
    pub qty: f64,
    pub to_address: String,
    pub message: Option<String>,
    pub expire_time: Option<u64>,
    pub rvn_change_address: Option<String>,
    pub asset_change_address: Option<String>,
}

impl RpcCall for TransferFromAddresses {
    const METHOD: &'static str = "transferfromaddresses";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "asset_name", &self.asset_name)?,
            require_list(Self::METHOD, "from_addresses", &self.from_addresses)?,
            require_qty(Self::METHOD, self.qty)?,
            require_str(Self::METHOD, "to_address", &self.to_address)?,
            or_default(self.message.clone(), ""),
            or_default(self.expire_time, 0),
            or_default(self.rvn_change_address.clone(), ""),
            or_default(self.asset_change_address.clone(), ""),
        ]
        .into())
    }
}

/// Snapshot lookups share their shape: asset name and block height.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub asset_name: String,
    pub block_height: u64,
}

impl Snapshot {
    fn encode_for(&self, method: &'static str) -> Result<Params, RpcError> {
        Ok(vec![require_str(method, "asset_name", &self.asset_name)?, json!(self.block_height)].into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetSnapshot(pub Snapshot);

impl RpcCall for GetSnapshot {
    const METHOD: &'static str = "getsnapshot";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PurgeSnapshot(pub Snapshot);

impl RpcCall for PurgeSnapshot {
    const METHOD: &'static str = "purgesnapshot";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

pub struct Assets<'a> {
    pub(crate) client: &'a RpcClient,
}

impl Assets<'_> {
    pub async fn get_cache_info(&self) -> Outcome {
        self.client.invoke("getcacheinfo", ()).await
    }

    pub async fn get_asset_data(&self, asset_name: &str) -> Result<Outcome, RpcError> {
        let name = require_str("getassetdata", "asset_name", asset_name)?;
        Ok(self.client.invoke("getassetdata", vec![name]).await)
    }

    pub async fn issue(&self, request: &Issue) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn issue_unique(&self, request: &IssueUnique) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn reissue(&self, request: &Reissue) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn list_assets(&self, request: &ListAssets) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn list_my_assets(&self, request: &ListMyAssets) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn list_addresses_by_asset(&self, request: &ListAddressesByAsset) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn list_asset_balances_by_address(
        &self,
        request: &ListAssetBalancesByAddress,
    ) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn transfer(&self, request: &Transfer) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn transfer_from_address(&self, request: &TransferFromAddress) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn transfer_from_addresses(&self, request: &TransferFromAddresses) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_snapshot(&self, request: &GetSnapshot) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn purge_snapshot(&self, request: &PurgeSnapshot) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }
}
