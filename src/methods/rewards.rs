//! Ownership snapshots and reward distribution.

use serde_json::{Value, json};

use crate::rpc::params::{or_default, require_positive, require_str};
use crate::rpc::{Outcome, Params, RpcCall, RpcClient, RpcError};

/// A snapshot request is identified by asset and block height.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRequest {
    pub asset_name: String,
    pub block_height: u64,
}

impl SnapshotRequest {
    pub fn new(asset_name: impl Into<String>, block_height: u64) -> Self {
        Self {
            asset_name: asset_name.into(),
            block_height,
        }
    }

    fn encode_for(&self, method: &'static str) -> Result<Params, RpcError> {
        Ok(vec![require_str(method, "asset_name", &self.asset_name)?, json!(self.block_height)].into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestSnapshot(pub SnapshotRequest);

impl RpcCall for RequestSnapshot {
    const METHOD: &'static str = "requestsnapshot";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetSnapshotRequest(pub SnapshotRequest);

impl RpcCall for GetSnapshotRequest {
    const METHOD: &'static str = "getsnapshotrequest";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CancelSnapshotRequest(pub SnapshotRequest);

impl RpcCall for CancelSnapshotRequest {
    const METHOD: &'static str = "cancelsnapshotrequest";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

/// Lists pending snapshot requests. An empty name and height 0 match all.
#[derive(Debug, Clone, Default)]
pub struct ListSnapshotRequests {
    pub asset_name: Option<String>,
    pub block_height: Option<u64>,
}

impl RpcCall for ListSnapshotRequests {
    const METHOD: &'static str = "listsnapshotrequests";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            or_default(self.asset_name.clone(), ""),
            or_default(self.block_height, 0),
        ]
        .into())
    }
}

/// Arguments shared by a distribution and its status query.
#[derive(Debug, Clone, Default)]
pub struct Distribution {
    pub asset_name: String,
    pub snapshot_height: u64,
    /// Asset paid out to owners, or `RVN`.
    pub distribution_asset_name: String,
    pub gross_distribution_amount: f64,
    /// Owner addresses left out of the distribution.
    pub exception_addresses: Vec<String>,
}

impl Distribution {
    fn encode_for(&self, method: &'static str) -> Result<Vec<Value>, RpcError> {
        Ok(vec![
            require_str(method, "asset_name", &self.asset_name)?,
            json!(self.snapshot_height),
            require_str(method, "distribution_asset_name", &self.distribution_asset_name)?,
            require_positive(method, "gross_distribution_amount", self.gross_distribution_amount)?,
            // The node takes the exclusions as one comma-separated string.
            json!(self.exception_addresses.join(",")),
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct DistributeReward {
    pub distribution: Distribution,
    /// Receives whatever cannot be split evenly.
    pub change_address: Option<String>,
}

impl RpcCall for DistributeReward {
    const METHOD: &'static str = "distributereward";

    fn encode(&self) -> Result<Params, RpcError> {
        let mut params = self.distribution.encode_for(Self::METHOD)?;
        params.push(or_default(self.change_address.clone(), ""));
        Ok(params.into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetDistributeStatus(pub Distribution);

impl RpcCall for GetDistributeStatus {
    const METHOD: &'static str = "getdistributestatus";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(self.0.encode_for(Self::METHOD)?.into())
    }
}

pub struct Rewards<'a> {
    pub(crate) client: &'a RpcClient,
}

impl Rewards<'_> {
    pub async fn request_snapshot(&self, request: &RequestSnapshot) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_snapshot_request(&self, request: &GetSnapshotRequest) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn list_snapshot_requests(&self, request: &ListSnapshotRequests) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn cancel_snapshot_request(&self, request: &CancelSnapshotRequest) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn distribute_reward(&self, request: &DistributeReward) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_distribute_status(&self, request: &GetDistributeStatus) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }
}
