//! Typed call surface, one module per domain of the node's RPC interface.
//!
//! Every procedure that takes arguments has a request struct implementing
//! [`RpcCall`](crate::rpc::RpcCall): required arguments are plain fields,
//! optional ones are `Option`s that encode to the node's own defaults.
//! The domain handles borrow an [`RpcClient`] and expose one async method per
//! procedure:
//!
//! ```rust,no_run
//! # use ravencoin_rpc::rpc::RpcClient;
//! # use ravencoin_rpc::methods::blockchain::GetBlock;
//! # async fn example(client: &RpcClient) -> Result<(), ravencoin_rpc::rpc::RpcError> {
//! let hash = client.blockchain().get_best_block_hash().await;
//! if let Some(hash) = hash.result().and_then(|h| h.as_str()) {
//!     let block = client.blockchain().get_block(&GetBlock::new(hash)).await?;
//!     println!("{:?}", block.result());
//! }
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod blockchain;
pub mod messages;
pub mod mining;
pub mod misc;
pub mod net;
pub mod raw_transactions;
pub mod restricted;
pub mod rewards;
pub mod wallet;

use crate::rpc::RpcClient;

pub use assets::Assets;
pub use blockchain::Blockchain;
pub use messages::Messages;
pub use mining::Mining;
pub use misc::Misc;
pub use net::Net;
pub use raw_transactions::RawTransactions;
pub use restricted::Restricted;
pub use rewards::Rewards;
pub use wallet::Wallet;

impl RpcClient {
    pub fn assets(&self) -> Assets<'_> {
        Assets { client: self }
    }

    pub fn blockchain(&self) -> Blockchain<'_> {
        Blockchain { client: self }
    }

    pub fn messages(&self) -> Messages<'_> {
        Messages { client: self }
    }

    pub fn mining(&self) -> Mining<'_> {
        Mining { client: self }
    }

    pub fn misc(&self) -> Misc<'_> {
        Misc { client: self }
    }

    pub fn net(&self) -> Net<'_> {
        Net { client: self }
    }

    pub fn raw_transactions(&self) -> RawTransactions<'_> {
        RawTransactions { client: self }
    }

    pub fn restricted(&self) -> Restricted<'_> {
        Restricted { client: self }
    }

    pub fn rewards(&self) -> Rewards<'_> {
        Rewards { client: self }
    }

    pub fn wallet(&self) -> Wallet<'_> {
        Wallet { client: self }
    }
}
