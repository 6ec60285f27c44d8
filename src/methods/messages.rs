//! Messaging channels.

use serde_json::{Value, json};

use crate::rpc::params::require_str;
use crate::rpc::{Outcome, Params, RpcCall, RpcClient, RpcError};

#[derive(Debug, Clone, Default)]
pub struct SendMessage {
    pub channel_name: String,
    pub ipfs_hash: String,
    /// Unix time after which the message expires.
    pub expire_time: Option<u64>,
}

impl RpcCall for SendMessage {
    const METHOD: &'static str = "sendmessage";

    fn encode(&self) -> Result<Params, RpcError> {
        let mut params = vec![
            require_str(Self::METHOD, "channel_name", &self.channel_name)?,
            require_str(Self::METHOD, "ipfs_hash", &self.ipfs_hash)?,
        ];
        // The node treats a present expire_time as a real expiry.
        if let Some(expire_time) = self.expire_time {
            params.push(json!(expire_time));
        }
        Ok(params.into())
    }
}

pub struct Messages<'a> {
    pub(crate) client: &'a RpcClient,
}

impl Messages<'_> {
    pub async fn view_all_messages(&self) -> Outcome {
        self.client.invoke("viewallmessages", ()).await
    }

    pub async fn view_all_message_channels(&self) -> Outcome {
        self.client.invoke("viewallmessagechannels", ()).await
    }

    pub async fn clear_messages(&self) -> Outcome {
        self.client.invoke("clearmessages", ()).await
    }

    pub async fn subscribe_to_channel(&self, channel_name: &str) -> Result<Outcome, RpcError> {
        self.channel_call("subscribetochannel", channel_name).await
    }

    pub async fn unsubscribe_from_channel(&self, channel_name: &str) -> Result<Outcome, RpcError> {
        self.channel_call("unsubscribefromchannel", channel_name).await
    }

    pub async fn send_message(&self, request: &SendMessage) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    async fn channel_call(&self, method: &'static str, channel_name: &str) -> Result<Outcome, RpcError> {
        let channel: Value = require_str(method, "channel_name", channel_name)?;
        Ok(self.client.invoke(method, vec![channel]).await)
    }
}
