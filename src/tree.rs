use std::collections::HashMap;
use std::fmt;

use async_recursion::async_recursion;
use ethers_core::types::Address;
use tracing::debug;

use crate::abi::{extract_address_getters, parse_abi};
use crate::chain::ChainAccess;
use crate::errors::{EtherscanError, Result, TreeError};
use crate::etherscan::MetadataSource;
use crate::types::Eip1967Slots;

const GIVEN_NAME_ADMIN: &str = "EIP1967 ADMIN";
const GIVEN_NAME_IMPL: &str = "EIP1967 IMPL";
const GIVEN_NAME_BEACON: &str = "EIP1967 BEACON";

/// Rendered in place of a contract name when none is known.
pub const UNKNOWN_NAME: &str = "unknown";

/// Index of a node inside a [`DepTree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(usize);

/// A contract discovered during traversal.
///
/// Children are owned through arena ids; `parent` is a non-owning
/// back-reference, present on everything but the root.
#[derive(Debug)]
pub struct ContractNode {
    pub address: Address,
    /// The role this node was discovered under: a getter name or one of the
    /// EIP-1967 labels. Empty for the root.
    pub given_name: String,
    /// The contract's self-reported name from verified metadata. `None` when
    /// no metadata was found.
    pub own_name: Option<String>,
    pub parent: Option<NodeId>,
    pub admin: Option<NodeId>,
    pub implementation: Option<NodeId>,
    pub beacon: Option<NodeId>,
    /// Children found through address getters, in discovery order.
    pub linked: Vec<NodeId>,
}

struct ProxyChildren {
    admin: NodeId,
    implementation: NodeId,
    beacon: NodeId,
}

/// The dependency tree of a contract, arena-allocated.
///
/// Nodes are never deduplicated: an address reachable through two paths
/// appears as two distinct nodes, and a proxy pointing back at an ancestor
/// is re-expanded until the depth bound cuts it off.
#[derive(Debug)]
pub struct DepTree {
    nodes: Vec<ContractNode>,
    root: NodeId,
}

impl DepTree {
    fn new(address: Address) -> Self {
        let root = ContractNode {
            address,
            given_name: String::new(),
            own_name: None,
            parent: None,
            admin: None,
            implementation: None,
            beacon: None,
            linked: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &ContractNode {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_mut(&mut self, id: NodeId) -> &mut ContractNode {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, parent: NodeId, given_name: &str, address: Address) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ContractNode {
            address,
            given_name: given_name.to_string(),
            own_name: None,
            parent: Some(parent),
            admin: None,
            implementation: None,
            beacon: None,
            linked: Vec::new(),
        });
        id
    }

    fn add_linked(&mut self, parent: NodeId, name: &str, address: Address) -> NodeId {
        let child = self.alloc(parent, name, address);
        self.node_mut(parent).linked.push(child);
        child
    }

    /// Attaches the three EIP-1967 children. The slots are write-once: a
    /// second call for the same node is a traversal bug, not a runtime
    /// condition.
    fn add_proxy_children(&mut self, parent: NodeId, slots: &Eip1967Slots) -> ProxyChildren {
        let node = self.node(parent);
        if node.admin.is_some() || node.implementation.is_some() || node.beacon.is_some() {
            panic!("proxy children already attached to {:?}", node.address);
        }

        let admin = self.alloc(parent, GIVEN_NAME_ADMIN, slots.admin);
        let implementation = self.alloc(parent, GIVEN_NAME_IMPL, slots.implementation);
        let beacon = self.alloc(parent, GIVEN_NAME_BEACON, slots.beacon);

        let node = self.node_mut(parent);
        node.admin = Some(admin);
        node.implementation = Some(implementation);
        node.beacon = Some(beacon);

        ProxyChildren {
            admin,
            implementation,
            beacon,
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let node = self.node(id);
        writeln!(f, "{:?}", node.address)?;

        let proxy = [node.admin, node.implementation, node.beacon];
        for child in proxy.into_iter().flatten().chain(node.linked.iter().copied()) {
            let c = self.node(child);
            write!(
                f,
                "--{}> ({} - {}): ",
                "--".repeat(depth),
                c.given_name,
                c.own_name.as_deref().unwrap_or(UNKNOWN_NAME)
            )?;
            self.fmt_node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for DepTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0)
    }
}

/// Builds a [`DepTree`] by recursively expanding every discovered contract
/// up to `max_depth`.
///
/// Calls run strictly one at a time; there is no visited set, so shared and
/// cyclic dependencies are bounded only by the depth limit.
pub struct TreeBuilder<'a, C, S> {
    chain: &'a C,
    source: &'a S,
    max_depth: usize,
}

impl<'a, C, S> TreeBuilder<'a, C, S>
where
    C: ChainAccess + Sync,
    S: MetadataSource + Sync,
{
    pub fn new(chain: &'a C, source: &'a S, max_depth: usize) -> Self {
        Self {
            chain,
            source,
            max_depth,
        }
    }

    pub async fn build(&self, root: Address) -> Result<DepTree> {
        let mut tree = DepTree::new(root);
        let root_id = tree.root();
        self.expand(&mut tree, root_id, 0).await?;
        Ok(tree)
    }

    #[async_recursion]
    async fn expand(&self, tree: &mut DepTree, id: NodeId, depth: usize) -> Result<()> {
        if depth == self.max_depth {
            return Ok(());
        }
        let address = tree.node(id).address;
        debug!("expanding {:?} at depth {}", address, depth);

        let metadata = match self.source.get_source_code(address).await {
            Ok(metadata) => metadata,
            // unverified contracts still get a shot at the bare ABI endpoint
            Err(EtherscanError::NotVerified) => None,
            Err(e) => return Err(e.into()),
        };

        let getters = match metadata {
            Some(metadata) => {
                let abi = parse_abi(&metadata.abi)
                    .map_err(|source| TreeError::InvalidAbi { address, source })?;
                tree.node_mut(id).own_name = Some(metadata.contract_name);
                extract_address_getters(&abi)
            }
            None => match self.source.get_abi(address).await? {
                Some(raw) => {
                    let abi = parse_abi(&raw)
                        .map_err(|source| TreeError::InvalidAbi { address, source })?;
                    // an ABI exists but nothing reports the contract's name
                    tree.node_mut(id).own_name = Some(UNKNOWN_NAME.to_string());
                    extract_address_getters(&abi)
                }
                None => HashMap::new(),
            },
        };

        for (name, selector) in &getters {
            let target = self.chain.call_address_returning(address, *selector).await?;
            debug!("{:?}.{}() -> {:?}", address, name, target);
            tree.add_linked(id, name, target);
        }

        let slots = self.chain.read_eip1967_slots(address).await?;
        if !slots.is_empty() {
            let proxy = tree.add_proxy_children(id, &slots);
            self.expand(tree, proxy.admin, depth + 1).await?;
            self.expand(tree, proxy.beacon, depth + 1).await?;
            self.expand(tree, proxy.implementation, depth + 1).await?;
        }

        let linked = tree.node(id).linked.clone();
        for child in linked {
            self.expand(tree, child, depth + 1).await?;
        }
        Ok(())
    }
}
