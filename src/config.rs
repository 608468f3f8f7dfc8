use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use ethers::providers::{Provider, Http};
use ethers::types::Address;
use eyre::Result;
use tracing::warn;

use crate::constants::{DEFAULT_CACHE_DIR, DEFAULT_CHAIN_ID, DEFAULT_RPC_URL};

pub struct Config {
    pub chain_id: u64,
    pub rpc_url: String,
    pub provider: Arc<Provider<Http>>,
    pub arena_contract: Option<Address>,
    pub strategy_nft_contract: Option<Address>,
    pub ranking_contract: Option<Address>,
    pub wallet_private_key: Option<String>,
    pub cache_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let chain_id = env::var("ARENA_CHAIN_ID")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_CHAIN_ID);

        let rpc_url = env::var("ARENA_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());

        let provider = Provider::<Http>::try_from(rpc_url.as_str())?;

        let arena_contract = parse_contract_address("ARENA_CONTRACT");
        let strategy_nft_contract = parse_contract_address("STRATEGY_NFT_CONTRACT");
        let ranking_contract = parse_contract_address("RANKING_CONTRACT");

        let wallet_private_key = env::var("WALLET_PRIVATE_KEY").ok().filter(|k| !k.is_empty());

        let cache_dir = env::var("ARENA_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CACHE_DIR));

        Ok(Config {
            chain_id,
            rpc_url,
            provider: Arc::new(provider),
            arena_contract,
            strategy_nft_contract,
            ranking_contract,
            wallet_private_key,
            cache_dir,
        })
    }
}

/// An unset or malformed address disables that contract rather than failing startup.
fn parse_contract_address(var: &str) -> Option<Address> {
    let raw = env::var(var).ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<Address>() {
        Ok(address) => Some(address),
        Err(_) => {
            warn!(var = var, value = raw, "Malformed contract address, disabling");
            None
        }
    }
}
