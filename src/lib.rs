//! evm-dep-tree discovers the on-chain dependency tree of a smart contract.
//!
//! Starting from a target address it:
//! - Fetches verified metadata (name + ABI) from Etherscan, falling back to
//!   the bare ABI endpoint for unverified contracts
//! - Calls every zero-argument `address`-returning getter and records the
//!   results as linked children
//! - Reads the three fixed EIP-1967 storage slots (implementation, beacon,
//!   admin) and records non-empty ones as proxy children
//! - Recurses into every discovered contract up to a configurable depth
//!
//! # Example
//! ```no_run
//! use evm_dep_tree::{EthClient, EtherscanClient, TreeBuilder};
//! use ethers_providers::{Http, Provider};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = Provider::<Http>::try_from("http://localhost:8545")?;
//! let chain = EthClient::new(provider);
//! let source = EtherscanClient::new("MY_API_KEY");
//!
//! let tree = TreeBuilder::new(&chain, &source, 5)
//!     .build("0xbebebebebebebebebebebebebebebebebebebebe".parse()?)
//!     .await?;
//! println!("{}", tree);
//! # Ok(())
//! # }
//! ```

mod abi;
mod chain;
mod consts;
mod errors;
mod etherscan;
mod tree;
mod types;
pub mod utils;

pub use abi::{extract_address_getters, parse_abi};
pub use chain::{ChainAccess, EthClient};
pub use consts::{EIP1967_ADMIN_SLOT, EIP1967_BEACON_SLOT, EIP1967_IMPLEMENTATION_SLOT};
pub use errors::{ChainError, EtherscanError, Result, TreeError};
pub use etherscan::{EtherscanClient, MetadataSource};
pub use tree::{ContractNode, DepTree, NodeId, TreeBuilder, UNKNOWN_NAME};
pub use types::{ContractMetadata, Eip1967Slots};

// Re-export common types for convenience
pub use ethers_core::types::{Address, Bytes, Selector, H256};
