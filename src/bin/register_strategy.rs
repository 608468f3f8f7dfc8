use std::env;
use std::fs;
use tracing::info;

use strategy_arena::arena::{ArenaClient, RegisterParams};
use strategy_arena::config::Config;
use strategy_arena::constants::BLOCK_EXPLORER_URL;
use strategy_arena::da;
use strategy_arena::logging;
use strategy_arena::session_cache::RegistrationCache;
use strategy_arena::wallet::WalletSession;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    logging::init_logging(env!("CARGO_BIN_NAME"))?;

    let mut args = env::args().skip(1);
    let (Some(name), Some(description), Some(code_path)) =
        (args.next(), args.next(), args.next())
    else {
        eyre::bail!("usage: register_strategy <name> <description> <code-file>");
    };
    let code = fs::read_to_string(&code_path)?;

    let cfg = Config::load()?;
    let cache = RegistrationCache::new(&cfg.cache_dir);

    // A registration from the last few minutes may still be pending display
    if let Some(prior) = cache.load() {
        println!(
            "Previous registration: strategy {} (tx {})",
            prior
                .strategy_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            prior.tx_hash
        );
    }

    let session = WalletSession::from_config(&cfg)?
        .ok_or_else(|| eyre::eyre!("WALLET_PRIVATE_KEY not set; a signing session is required"))?;
    let client = ArenaClient::new(&cfg, Some(session));

    // Mock DA upload + content hash of the source
    let da_result = da::upload(&name, &code, &description).await?;
    let code_hash = da::code_hash(&code);
    info!(url = %da_result.url, content_hash = ?da_result.content_hash, "Strategy artifacts uploaded");

    if let Some(fee) = client.get_registration_fee().await? {
        info!(fee_wei = %fee, "Current registration fee");
    }

    let outcome = client
        .register_strategy(&RegisterParams {
            name: name.clone(),
            description,
            code_hash,
            da_storage_url: da_result.url.clone(),
        })
        .await?;

    let tx_hash = format!("{:?}", outcome.tx_hash);
    cache.store(outcome.strategy_id, &da_result.url, &tx_hash);

    match outcome.strategy_id {
        Some(id) => println!("Registered \"{}\" as strategy {}", name, id),
        // The write went through even though the id could not be recovered
        None => println!("Registered \"{}\"; id not yet resolved", name),
    }
    println!("Transaction: {}/tx/{}", BLOCK_EXPLORER_URL, tx_hash);
    println!("DA record:   {}", da_result.url);

    Ok(())
}
