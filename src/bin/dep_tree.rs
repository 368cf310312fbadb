use std::str::FromStr;

use clap::Parser;
use ethers_core::types::Address;
use ethers_providers::{Http, Provider};
use evm_dep_tree::{EthClient, EtherscanClient, TreeBuilder};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Target contract, 0x prefixed
    #[clap(value_parser = Address::from_str)]
    address: Address,

    #[clap(short = 'k', long = "etherscan-key", env = "ETHERSCAN_API_KEY")]
    etherscan_key: String,

    #[clap(short = 'r', long = "rpc-url", env = "ETH_RPC_URL")]
    pub url: String,

    /// Maximum recursion depth
    #[clap(long, default_value_t = 5)]
    max_depth: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env();

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .init();

    let args = Args::parse();

    let provider = Provider::<Http>::try_from(args.url.as_str())?;
    let chain = EthClient::new(provider);
    let source = EtherscanClient::new(args.etherscan_key);

    println!("- Target contract: {:?}", args.address);
    println!("- Max depth: {}", args.max_depth);
    println!("- Starting. This may take a while...");

    let tree = TreeBuilder::new(&chain, &source, args.max_depth)
        .build(args.address)
        .await?;

    println!("\n{}", tree);
    Ok(())
}
