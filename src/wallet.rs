use ethers::prelude::*;
use std::str::FromStr;
use std::sync::Arc;
use eyre::Result;
use tracing::info;

use crate::config::Config;

pub type ArenaSigner = SignerMiddleware<Arc<Provider<Http>>, Wallet<k256::ecdsa::SigningKey>>;

/// A connected signing session. Constructed once from config and passed
/// explicitly into the client; a client without one is read-only.
#[derive(Clone)]
pub struct WalletSession {
    pub signer: Arc<ArenaSigner>,
    pub address: Address,
}

impl WalletSession {
    pub fn new(config: &Config, private_key: &str) -> Result<Self> {
        let wallet = Wallet::from_str(private_key)?.with_chain_id(config.chain_id);
        let signer = SignerMiddleware::new(config.provider.clone(), wallet);
        let address = signer.address();
        info!(address = ?address, chain_id = config.chain_id, "Wallet session connected");
        Ok(Self {
            signer: Arc::new(signer),
            address,
        })
    }

    /// `Ok(None)` when no key is configured: the caller stays read-only.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        match config.wallet_private_key.as_deref() {
            Some(key) => Ok(Some(Self::new(config, key)?)),
            None => Ok(None),
        }
    }
}
