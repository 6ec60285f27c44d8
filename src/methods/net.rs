//! Peer and network management.

use serde_json::{Value, json};

use crate::rpc::params::{or_default, or_null, require_str};
use crate::rpc::{Outcome, Params, RpcCall, RpcClient, RpcError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCommand {
    Add,
    Remove,
    OneTry,
}

impl NodeCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::OneTry => "onetry",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddNode {
    pub node: String,
    pub command: NodeCommand,
}

impl RpcCall for AddNode {
    const METHOD: &'static str = "addnode";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![require_str(Self::METHOD, "node", &self.node)?, json!(self.command.as_str())].into())
    }
}

/// Disconnects a peer by address or by node id; exactly one of them is needed.
#[derive(Debug, Clone, Default)]
pub struct DisconnectNode {
    pub address: Option<String>,
    pub nodeid: Option<u64>,
}

impl RpcCall for DisconnectNode {
    const METHOD: &'static str = "disconnectnode";

    fn encode(&self) -> Result<Params, RpcError> {
        if self.address.is_none() && self.nodeid.is_none() {
            return Err(RpcError::MissingField {
                method: Self::METHOD,
                field: "address",
            });
        }
        Ok(vec![or_null(self.address.clone()), or_null(self.nodeid)].into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetAddedNodeInfo {
    pub node: Option<String>,
}

impl RpcCall for GetAddedNodeInfo {
    const METHOD: &'static str = "getaddednodeinfo";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![or_null(self.node.clone())].into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanCommand {
    Add,
    Remove,
}

#[derive(Debug, Clone)]
pub struct SetBan {
    pub subnet: String,
    pub command: BanCommand,
    /// Seconds, or an absolute unix time when `absolute` is set.
    pub bantime: Option<u64>,
    pub absolute: Option<bool>,
}

impl RpcCall for SetBan {
    const METHOD: &'static str = "setban";

    fn encode(&self) -> Result<Params, RpcError> {
        let command = match self.command {
            BanCommand::Add => "add",
            BanCommand::Remove => "remove",
        };
        Ok(vec![
            require_str(Self::METHOD, "subnet", &self.subnet)?,
            json!(command),
            or_null(self.bantime),
            or_default(self.absolute, false),
        ]
        .into())
    }
}

pub struct Net<'a> {
    pub(crate) client: &'a RpcClient,
}

impl Net<'_> {
    pub async fn clear_banned(&self) -> Outcome {
        self.client.invoke("clearbanned", ()).await
    }

    pub async fn get_connection_count(&self) -> Outcome {
        self.client.invoke("getconnectioncount", ()).await
    }

    pub async fn get_net_totals(&self) -> Outcome {
        self.client.invoke("getnettotals", ()).await
    }

    pub async fn get_network_info(&self) -> Outcome {
        self.client.invoke("getnetworkinfo", ()).await
    }

    pub async fn get_peer_info(&self) -> Outcome {
        self.client.invoke("getpeerinfo", ()).await
    }

    pub async fn list_banned(&self) -> Outcome {
        self.client.invoke("listbanned", ()).await
    }

    pub async fn ping(&self) -> Outcome {
        self.client.invoke("ping", ()).await
    }

    pub async fn add_node(&self, request: &AddNode) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn disconnect_node(&self, request: &DisconnectNode) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_added_node_info(&self, request: &GetAddedNodeInfo) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn set_ban(&self, request: &SetBan) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn set_network_active(&self, state: bool) -> Outcome {
        self.client.invoke("setnetworkactive", vec![Value::Bool(state)]).await
    }
}
