//! Chain state, blocks and the mempool.

use serde_json::{Value, json};

use crate::rpc::params::{or_default, or_null, require_str};
use crate::rpc::{Outcome, Params, RpcCall, RpcClient, RpcError};

/// Blocks on the node's default one month window.
pub const DEFAULT_CHAIN_TX_STATS_BLOCKS: u64 = 43_200;

#[derive(Debug, Clone, Default)]
pub struct GetBlock {
    pub blockhash: String,
    /// 0 for hex, 1 for a json object, 2 for json with transaction data.
    pub verbosity: Option<u8>,
}

impl GetBlock {
    pub fn new(blockhash: impl Into<String>) -> Self {
        Self {
            blockhash: blockhash.into(),
            verbosity: None,
        }
    }
}

impl RpcCall for GetBlock {
    const METHOD: &'static str = "getblock";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "blockhash", &self.blockhash)?,
            or_default(self.verbosity, 1),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecodeBlock {
    pub blockhex: String,
}

impl RpcCall for DecodeBlock {
    const METHOD: &'static str = "decodeblock";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![require_str(Self::METHOD, "blockhex", &self.blockhex)?].into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetBlockDeltas {
    pub blockhash: String,
}

impl RpcCall for GetBlockDeltas {
    const METHOD: &'static str = "getblockdeltas";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![require_str(Self::METHOD, "blockhash", &self.blockhash)?].into())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetBlockHash {
    pub height: u64,
}

impl RpcCall for GetBlockHash {
    const METHOD: &'static str = "getblockhash";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![json!(self.height)].into())
    }
}

/// Hashes of the blocks whose timestamps fall in `low..high`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetBlockHashes {
    pub high: u64,
    pub low: u64,
    pub no_orphans: Option<bool>,
    pub logical_times: Option<bool>,
}

impl RpcCall for GetBlockHashes {
    const METHOD: &'static str = "getblockhashes";

    fn encode(&self) -> Result<Params, RpcError> {
        let options = json!({
            "noOrphans": self.no_orphans.unwrap_or(true),
            "logicalTimes": self.logical_times.unwrap_or(false),
        });
        Ok(vec![json!(self.high), json!(self.low), options].into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetBlockHeader {
    pub blockhash: String,
    pub verbose: Option<bool>,
}

impl RpcCall for GetBlockHeader {
    const METHOD: &'static str = "getblockheader";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "blockhash", &self.blockhash)?,
            or_default(self.verbose, true),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetChainTxStats {
    pub nblocks: Option<u64>,
    pub blockhash: Option<String>,
}

impl RpcCall for GetChainTxStats {
    const METHOD: &'static str = "getchaintxstats";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            or_default(self.nblocks, DEFAULT_CHAIN_TX_STATS_BLOCKS),
            or_null(self.blockhash.clone()),
        ]
        .into())
    }
}

/// Shared shape of the mempool lookups keyed by transaction id.
#[derive(Debug, Clone, Default)]
pub struct MempoolTx {
    pub txid: String,
    pub verbose: Option<bool>,
}

impl MempoolTx {
    fn encode_for(&self, method: &'static str) -> Result<Params, RpcError> {
        Ok(vec![require_str(method, "txid", &self.txid)?, or_default(self.verbose, false)].into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetMempoolAncestors(pub MempoolTx);

impl RpcCall for GetMempoolAncestors {
    const METHOD: &'static str = "getmempoolancestors";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetMempoolDescendants(pub MempoolTx);

impl RpcCall for GetMempoolDescendants {
    const METHOD: &'static str = "getmempooldescendants";

    fn encode(&self) -> Result<Params, RpcError> {
        self.0.encode_for(Self::METHOD)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetMempoolEntry {
    pub txid: String,
}

impl RpcCall for GetMempoolEntry {
    const METHOD: &'static str = "getmempoolentry";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![require_str(Self::METHOD, "txid", &self.txid)?].into())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetRawMempool {
    pub verbose: Option<bool>,
}

impl RpcCall for GetRawMempool {
    const METHOD: &'static str = "getrawmempool";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![or_default(self.verbose, false)].into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetTxOut {
    pub txid: String,
    pub n: u32,
    pub include_mempool: Option<bool>,
}

impl RpcCall for GetTxOut {
    const METHOD: &'static str = "gettxout";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "txid", &self.txid)?,
            json!(self.n),
            or_default(self.include_mempool, true),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PruneBlockchain {
    pub height: u64,
}

impl RpcCall for PruneBlockchain {
    const METHOD: &'static str = "pruneblockchain";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![json!(self.height)].into())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyChain {
    pub checklevel: Option<u8>,
    pub nblocks: Option<u32>,
}

impl RpcCall for VerifyChain {
    const METHOD: &'static str = "verifychain";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![or_default(self.checklevel, 3), or_default(self.nblocks, 6)].into())
    }
}

/// Block-hash commands that take nothing else: preciousblock,
/// invalidateblock, reconsiderblock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCommand {
    Precious,
    Invalidate,
    Reconsider,
}

impl BlockCommand {
    pub fn method(self) -> &'static str {
        match self {
            Self::Precious => "preciousblock",
            Self::Invalidate => "invalidateblock",
            Self::Reconsider => "reconsiderblock",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WaitForNewBlock {
    /// Milliseconds; 0 waits forever.
    pub timeout: Option<u64>,
}

impl RpcCall for WaitForNewBlock {
    const METHOD: &'static str = "waitfornewblock";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![or_default(self.timeout, 0)].into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaitForBlock {
    pub blockhash: String,
    pub timeout: Option<u64>,
}

impl RpcCall for WaitForBlock {
    const METHOD: &'static str = "waitforblock";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![
            require_str(Self::METHOD, "blockhash", &self.blockhash)?,
            or_default(self.timeout, 0),
        ]
        .into())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WaitForBlockHeight {
    pub height: u64,
    pub timeout: Option<u64>,
}

impl RpcCall for WaitForBlockHeight {
    const METHOD: &'static str = "waitforblockheight";

    fn encode(&self) -> Result<Params, RpcError> {
        Ok(vec![json!(self.height), or_default(self.timeout, 0)].into())
    }
}

pub struct Blockchain<'a> {
    pub(crate) client: &'a RpcClient,
}

impl Blockchain<'_> {
    pub async fn clear_mempool(&self) -> Outcome {
        self.client.invoke("clearmempool", ()).await
    }

    pub async fn get_best_block_hash(&self) -> Outcome {
        self.client.invoke("getbestblockhash", ()).await
    }

    pub async fn get_blockchain_info(&self) -> Outcome {
        self.client.invoke("getblockchaininfo", ()).await
    }

    pub async fn get_block_count(&self) -> Outcome {
        self.client.invoke("getblockcount", ()).await
    }

    pub async fn get_chain_tips(&self) -> Outcome {
        self.client.invoke("getchaintips", ()).await
    }

    pub async fn get_difficulty(&self) -> Outcome {
        self.client.invoke("getdifficulty", ()).await
    }

    pub async fn get_mempool_info(&self) -> Outcome {
        self.client.invoke("getmempoolinfo", ()).await
    }

    pub async fn get_tx_out_set_info(&self) -> Outcome {
        self.client.invoke("gettxoutsetinfo", ()).await
    }

    pub async fn save_mempool(&self) -> Outcome {
        self.client.invoke("savemempool", ()).await
    }

    pub async fn get_block(&self, request: &GetBlock) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn decode_block(&self, request: &DecodeBlock) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_block_deltas(&self, request: &GetBlockDeltas) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_block_hash(&self, height: u64) -> Result<Outcome, RpcError> {
        self.client.call(&GetBlockHash { height }).await
    }

    pub async fn get_block_hashes(&self, request: &GetBlockHashes) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_block_header(&self, request: &GetBlockHeader) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_chain_tx_stats(&self, request: &GetChainTxStats) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_mempool_ancestors(&self, request: &GetMempoolAncestors) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_mempool_descendants(&self, request: &GetMempoolDescendants) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_mempool_entry(&self, request: &GetMempoolEntry) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_raw_mempool(&self, request: &GetRawMempool) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn get_tx_out(&self, request: &GetTxOut) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn prune_blockchain(&self, height: u64) -> Result<Outcome, RpcError> {
        self.client.call(&PruneBlockchain { height }).await
    }

    pub async fn verify_chain(&self, request: &VerifyChain) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn block_command(&self, command: BlockCommand, blockhash: &str) -> Result<Outcome, RpcError> {
        let hash: Value = require_str(command.method(), "blockhash", blockhash)?;
        Ok(self.client.invoke(command.method(), vec![hash]).await)
    }

    pub async fn wait_for_new_block(&self, request: &WaitForNewBlock) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn wait_for_block(&self, request: &WaitForBlock) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }

    pub async fn wait_for_block_height(&self, request: &WaitForBlockHeight) -> Result<Outcome, RpcError> {
        self.client.call(request).await
    }
}
