//! Restricted assets, qualifiers and address tags.
//!
//! Restricted assets (`$NAME`) can only move to addresses that satisfy their
//! verifier string, which is written in terms of qualifier tags (`#TAG`).
//! All procedures here are positional.

use serde_json::{Value, json};

use crate::rpc::params::{or_default, require_companion, require_positive, require_str};
use crate::rpc::{Outcome, Params, RpcCall, RpcClient, RpcError};

#[derive(Debug, Clone, Default)]
pub struct IssueRestrictedAsset {
    pub asset_name: String,
    pub qty: f64,
    pub verifier: String,
    pub to_address: String,
    pub change_address: Option<String>,
    pub units: Option<u8>,
    pub reissuable: Option<bool>,
    pub has_ipfs: Option<bool>,
    pub ipfs_hash: Option<String>,
}

impl RpcCall for IssueRestrictedAsset {
    const METHOD: &'static str = "issuerestrictedasset";

    fn encode(&self) -> Result<Params, RpcError> {
        let has_ipfs = self.has_ipfs.unwrap_or(false);
        require_companion(Self::METHOD, "has_ipfs", has_ipfs, "ipfs_hash", self.ipfs_hash.is_some())?;

        let mut params = vec![
            require_str(Self::METHOD, "asset_name", &self.asset_name)?,
            require_positive(Self::METHOD, "qty", self.qty)?,
            require_str(Self::METHOD, "verifier", &self.verifier)?,
            require_str(Self::METHOD, "to_address", &self.to_address)?,
            or_default(self.change_address.clone(), ""),
            or_default(self.units, 0),
            or_default(self.reissuable, true),
            json!(has_ipfs),
        ];
        if let Some(ipfs_hash) = self.ipfs_hash.as_ref().filter(|_| has_ipfs) {
            params.push(json!(ipfs_hash));
        }
        Ok(params.into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct IssueQualifierAsset {
    pub asset_name: String,
    pub qty: Option<f64>,
    pub to_address: Option<String>,
    pub change_address: Option<String>,
    pub has_ipfs: Option<bool>,
    pub ipfs_hash: Option<String>,
}

impl RpcCall for IssueQualifierAsset {
    const METHOD: &'static str = "issuequalifierasset";

    fn encode(&self) -> Result<Params, RpcError> {
        let has_ipfs = self.has_ipfs.unwrap_or(false);
        require_companion(Self::METHOD, "has_ipfs", has_ipfs, "ipfs_hash", self.ipfs_hash.is_some())?;
        let qty = match self.qty {
            Some(qty) => require_positive(Self::METHOD, "qty", qty)?,
            None => json!(1),
        };

        let mut params = vec![
            require_str(Self::METHOD, "asset_name", &self.asset_name)?,
            qty,
            or_default(self.to_address.clone(), ""),
            or_default(self.change_address.clone(), ""),
            json!(has_ipfs),
        ];
        if let Some(ipfs_hash) = self.ipfs_hash.as_ref().filter(|_| has_ipfs) {
            params.push(json!(ipfs_hash));
        }
        Ok(params.into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReissueRestrictedAsset {
    pub asset_name: String,
    pub qty: f64,
    pub to_address: String,
    pub change_verifier: Option<bool>,
    pub new_verifier: Option<String>,
    pub change_address: Option<String>,
    /// `-1` keeps the current units.
    pub new_units: Option<i8>,
    pub reissuable: Option<bool>,
    pub new_ipfs: Option<String>,
}

impl RpcCall for ReissueRestrictedAsset {
    const METHOD: &'static str = "reissuerestrictedasset";

    fn encode(&self) -> Result<Params, RpcError> {
        let change_verifier = self.change_verifier.unwrap_or(false);
        require_companion(
            Self::METHOD,
            "change_verifier",
            change_verifier,
            "new_verifier",
            self.new_verifier.as_deref().is_some_and(|v| !v.trim().is_empty()),
        )?;
        if !self.qty.is_finite() || self.qty < 0.0 {
            return Err(RpcError::InvalidArgument {
                method: Self::METHOD.to_string(),
                reason: format!("qty must not be negative, got {}", self.qty),
            });
        }

        let mut params = vec![
            require_str(Self::METHOD, "asset_name", &self.asset_name)?,
            // Zero reissues nothing but may still change verifier or units.
            json!(self.qty),
            require_str(Self::METHOD, "to_address", &self.to_address)?,
            json!(change_verifier),
            or_default(self.new_verifier.clone(), ""),
            or_default(self.change_address.clone(), ""),
            or_default(self.new_units, -1),
            or_default(self.reissuable, true),
        ];
        if let Some(new_ipfs) = &self.new_ipfs {
            params.push(json!(new_ipfs));
        }
        Ok(params.into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransferQualifier {
    pub qualifier_name: String,
    pub qty: f64,
    pub to_address: String,
    pub change_address: Option<String>,
    pub message: Option<String>,
    pub expire_time: Option<u64>,
}

impl RpcCall for TransferQualifier {
    const METHOD: &'static str = "transferqualifier";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "qualifier_name", &self.qualifier_name)?,
            require_positive(Self::METHOD, "qty", self.qty)?,
            require_str(Self::METHOD, "to_address", &self.to_address)?,
            or_default(self.change_address.clone(), ""),
            or_default(self.message.clone(), ""),
            or_default(self.expire_time, 0),
        ]
        .into())
    }
}

/// Assigning and removing a tag take the same arguments.
#[derive(Debug, Clone, Default)]
pub struct TagAssignment {
    pub tag_name: String,
    pub to_address: String,
    /// Receives the qualifier token change.
    pub change_address: Option<String>,
    pub asset_data: Option<String>,
}

impl TagAssignment {
    fn encode_for(&self, method: &'static str) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(method, "tag_name", &self.tag_name)?,
            require_str(method, "to_address", &self.to_address)?,
            or_default(self.change_address.clone(), ""),
            or_default(self.asset_data.clone(), ""),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AddTagToAddress(pub TagAssignment);

impl RpcCall for AddTagToAddress {
    const METHOD: &'static str = "addtagtoaddress";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RemoveTagFromAddress(pub TagAssignment);

impl RpcCall for RemoveTagFromAddress {
    const METHOD: &'static str = "removetagfromaddress";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

/// Freezing and unfreezing one address take the same arguments.
#[derive(Debug, Clone, Default)]
pub struct AddressFreeze {
    pub asset_name: String,
    pub address: String,
    /// Receives the owner token change.
    pub change_address: Option<String>,
    pub asset_data: Option<String>,
}

impl AddressFreeze {
    fn encode_for(&self, method: &'static str) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(method, "asset_name", &self.asset_name)?,
            require_str(method, "address", &self.address)?,
            or_default(self.change_address.clone(), ""),
            or_default(self.asset_data.clone(), ""),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FreezeAddress(pub AddressFreeze);

impl RpcCall for FreezeAddress {
    const METHOD: &'static str = "freezeaddress";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnfreezeAddress(pub AddressFreeze);

impl RpcCall for UnfreezeAddress {
    const METHOD: &'static str = "unfreezeaddress";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

/// Freezing and unfreezing a whole restricted asset take the same arguments.
#[derive(Debug, Clone, Default)]
pub struct AssetFreeze {
    pub asset_name: String,
    pub change_address: Option<String>,
    pub asset_data: Option<String>,
}

impl AssetFreeze {
    fn encode_for(&self, method: &'static str) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(method, "asset_name", &self.asset_name)?,
            or_default(self.change_address.clone(), ""),
            or_default(self.asset_data.clone(), ""),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FreezeRestrictedAsset(pub AssetFreeze);

impl RpcCall for FreezeRestrictedAsset {
    const METHOD: &'static str = "freezerestrictedasset";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnfreezeRestrictedAsset(pub AssetFreeze);

impl RpcCall for UnfreezeRestrictedAsset {
    const METHOD: &'static str = "unfreezerestrictedasset";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

pub struct Restricted<'a> {
    pub(crate) client: &'a RpcClient,
}

impl Restricted<'_> {
    pub async fn issue_restricted_asset(&self, request: &IssueRestrictedAsset) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn issue_qualifier_asset(&self, request: &IssueQualifierAsset) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn reissue_restricted_asset(&self, request: &ReissueRestrictedAsset) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn transfer_qualifier(&self, request: &TransferQualifier) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn add_tag_to_address(&self, request: &AddTagToAddress) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn remove_tag_from_address(&self, request: &RemoveTagFromAddress) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn freeze_address(&self, request: &FreezeAddress) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn unfreeze_address(&self, request: &UnfreezeAddress) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn freeze_restricted_asset(&self, request: &FreezeRestrictedAsset) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn unfreeze_restricted_asset(&self, request: &UnfreezeRestrictedAsset) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn list_addresses_for_tag(&self, tag_name: &str) -> Result<Outcome, RpcError> {
        self.single("listaddressesfortag", "tag_name", tag_name).await
    }

    pub async fn list_tags_for_address(&self, address: &str) -> Result<Outcome, RpcError> {
        self.single("listtagsforaddress", "address", address).await
    }

    pub async fn list_address_restrictions(&self, address: &str) -> Result<Outcome, RpcError> {
        self.single("listaddressrestrictions", "address", address).await
    }

    pub async fn list_global_restrictions(&self) -> Outcome {
        self.client.invoke("listglobalrestrictions", ()).await
    }

    pub async fn get_verifier_string(&self, restricted_name: &str) -> Result<Outcome, RpcError> {
        self.single("getverifierstring", "restricted_name", restricted_name).await
    }

    pub async fn check_global_restriction(&self, restricted_name: &str) -> Result<Outcome, RpcError> {
        self.single("checkglobalrestriction", "restricted_name", restricted_name).await
    }

    pub async fn is_valid_verifier_string(&self, verifier_string: &str) -> Result<Outcome, RpcError> {
        self.single("isvalidverifierstring", "verifier_string", verifier_string).await
    }

    pub async fn check_address_tag(&self, address: &str, tag_name: &str) -> Result<Outcome, RpcError> {
        let params = address_pair("checkaddresstag", address, "tag_name", tag_name)?;
        Ok(self.client.invoke("checkaddresstag", params).await)
    }

    pub async fn check_address_restriction(&self, address: &str, restricted_name: &str) -> Result<Outcome, RpcError> {
        let params = address_pair("checkaddressrestriction", address, "restricted_name", restricted_name)?;
        Ok(self.client.invoke("checkaddressrestriction", params).await)
    }

    async fn single(&self, method: &'static str, field: &'static str, value: &str) -> Result<Outcome, RpcError> {
        let value = require_str(method, field, value)?;
        Ok(self.client.invoke(method, vec![value]).await)
    }
}

fn address_pair(
    method: &'static str,
    address: &str,
    field: &'static str,
    value: &str,
) -> Result<Vec<Value>, RpcError> {
    Ok(vec![require_str(method, "address", address)?, require_str(method, field, value)?])
}
