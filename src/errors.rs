//! Error types for the evm-dep-tree crate.

use ethers_core::types::{Address, H256};
use thiserror::Error;

/// Errors from the chain access adapter. All of these are fatal: the only
/// tolerated failure, an `execution reverted` answer to a getter call, never
/// surfaces as an error.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC communication or execution error
    #[error("RPC error: `{0}`")]
    Rpc(String),

    /// Raw storage read failed
    #[error("storage read failed for {address:?} at slot {slot:?}: {message}")]
    StorageRead {
        address: Address,
        slot: H256,
        message: String,
    },
}

/// Errors from the metadata provider adapter.
#[derive(Debug, Error)]
pub enum EtherscanError {
    /// The provider knows the contract but its source was never verified.
    /// Recoverable: callers fall back to the bare ABI endpoint.
    #[error("contract source code not verified")]
    NotVerified,

    /// More than one result record for a single-address query
    #[error("more than one result record for a single address")]
    AmbiguousResult,

    /// HTTP transport failure
    #[error("etherscan request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response envelope did not match the expected shape
    #[error("malformed etherscan response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Constructor arguments were not valid hex
    #[error("malformed constructor arguments: {0}")]
    ConstructorArgs(#[from] hex::FromHexError),
}

/// Errors that abort a tree build. There is no partial output: the first
/// unrecoverable error discards everything gathered so far.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Etherscan(#[from] EtherscanError),

    /// The provider served an ABI that is not valid ABI JSON
    #[error("malformed ABI for {address:?}")]
    InvalidAbi {
        address: Address,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for tree building
pub type Result<T, E = TreeError> = std::result::Result<T, E>;
