use async_trait::async_trait;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, Bytes, Selector, TransactionRequest, H256};
use ethers_providers::{Middleware, MiddlewareError};
use tracing::debug;

use crate::consts::{EIP1967_ADMIN_SLOT, EIP1967_BEACON_SLOT, EIP1967_IMPLEMENTATION_SLOT};
use crate::errors::ChainError;
use crate::types::Eip1967Slots;
use crate::utils::{bytes_to_address, h256_to_address};

/// Read-only access to contract state: `eth_call` and raw storage reads.
///
/// The derived operations have default implementations in terms of the two
/// primitives, so alternative backends only need `call` and `read_storage`.
#[async_trait]
pub trait ChainAccess {
    /// Calls the contract with the selector as the full calldata.
    ///
    /// An `execution reverted` answer is expected (many getters sit behind
    /// authentication) and yields empty return data. Every other failure is
    /// an error.
    async fn call(&self, address: Address, selector: Selector) -> Result<Bytes, ChainError>;

    /// Reads one raw storage slot. No tolerated failure mode here.
    async fn read_storage(&self, address: Address, slot: H256) -> Result<H256, ChainError>;

    /// Calls an address-returning getter and right-aligns the raw return
    /// data into an address.
    async fn call_address_returning(
        &self,
        address: Address,
        selector: Selector,
    ) -> Result<Address, ChainError> {
        let ret = self.call(address, selector).await?;
        Ok(bytes_to_address(&ret))
    }

    /// Reads the three fixed EIP-1967 slots, in implementation, beacon,
    /// admin order. The first failing read aborts with its error.
    async fn read_eip1967_slots(&self, address: Address) -> Result<Eip1967Slots, ChainError> {
        let implementation = self
            .read_storage(address, *EIP1967_IMPLEMENTATION_SLOT)
            .await?;
        let beacon = self.read_storage(address, *EIP1967_BEACON_SLOT).await?;
        let admin = self.read_storage(address, *EIP1967_ADMIN_SLOT).await?;

        Ok(Eip1967Slots {
            implementation: h256_to_address(&implementation),
            beacon: h256_to_address(&beacon),
            admin: h256_to_address(&admin),
        })
    }
}

/// [`ChainAccess`] over any ethers [`Middleware`].
#[derive(Clone, Debug)]
pub struct EthClient<M> {
    inner: M,
}

impl<M: Middleware> EthClient<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<M: Middleware> ChainAccess for EthClient<M> {
    async fn call(&self, address: Address, selector: Selector) -> Result<Bytes, ChainError> {
        let tx: TypedTransaction = TransactionRequest::new()
            .to(address)
            .data(selector.to_vec())
            .into();

        match self.inner.call(&tx, None).await {
            Ok(ret) => Ok(ret),
            Err(e) => {
                let reverted = e
                    .as_error_response()
                    .map_or(false, |rpc| rpc.message == "execution reverted");
                if reverted {
                    debug!("call to {:?} reverted, treating as empty", address);
                    Ok(Bytes::default())
                } else {
                    Err(ChainError::Rpc(e.to_string()))
                }
            }
        }
    }

    async fn read_storage(&self, address: Address, slot: H256) -> Result<H256, ChainError> {
        self.inner
            .get_storage_at(address, slot, None)
            .await
            .map_err(|e| ChainError::StorageRead {
                address,
                slot,
                message: e.to_string(),
            })
    }
}
