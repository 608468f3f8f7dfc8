use tracing::info;

use strategy_arena::arena::{ArenaClient, RankingEngine};
use strategy_arena::config::Config;
use strategy_arena::logging;
use strategy_arena::metrics;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    logging::init_logging(env!("CARGO_BIN_NAME"))?;

    let cfg = Config::load()?;
    info!(chain_id = cfg.chain_id, rpc_url = %cfg.rpc_url, "Configuration loaded");

    // Read-only: no signing session
    let client = ArenaClient::new(&cfg, None);
    let engine = RankingEngine::new(&client);

    let top = engine.top_strategies(10).await?;
    if top.is_empty() {
        println!("No strategies to rank (none registered, or arena contract not configured).");
        return Ok(());
    }

    println!(
        "{:<4} {:<28} {:>10} {:>8} {:>8} {:>12}",
        "#", "Strategy", "Return", "Sharpe", "Trades", "Owner"
    );
    for (rank, entry) in top.iter().enumerate() {
        let owner = format!("{:?}", entry.owner);
        println!(
            "{:<4} {:<28} {:>10} {:>8} {:>8} {:>12}",
            rank + 1,
            entry.name,
            metrics::format_total_return(entry.total_return),
            metrics::format_sharpe(entry.sharpe_ratio),
            entry.trades_count,
            &owner[..10],
        );
    }

    Ok(())
}
