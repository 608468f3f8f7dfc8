use std::env;
use tracing::info;

use strategy_arena::arena::{
    ArenaClient, PerformanceInput, VerificationState, VerificationWorkflow,
};
use strategy_arena::config::Config;
use strategy_arena::constants::BLOCK_EXPLORER_URL;
use strategy_arena::logging;
use strategy_arena::metrics;
use strategy_arena::wallet::WalletSession;

const USAGE: &str = "usage: verify_strategy compute <id>\n       \
    verify_strategy result <id> <da-root> <compute-proof> <total-return> <sharpe> <drawdown> <win-rate> <trades>";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    logging::init_logging(env!("CARGO_BIN_NAME"))?;

    let args: Vec<String> = env::args().skip(1).collect();
    let (Some(mode), Some(id)) = (args.first(), args.get(1)) else {
        eyre::bail!(USAGE);
    };
    let id: u64 = id.parse()?;

    let cfg = Config::load()?;
    let session = WalletSession::from_config(&cfg)?
        .ok_or_else(|| eyre::eyre!("WALLET_PRIVATE_KEY not set; a signing session is required"))?;
    let client = ArenaClient::new(&cfg, Some(session));
    let workflow = VerificationWorkflow::new(&client);

    let outcome = match mode.as_str() {
        "compute" => workflow.submit_compute_task(id).await?,
        "result" => {
            let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or("");
            // Malformed numeric fields fall back to their documented
            // defaults; only a zero trades count refuses to submit.
            let performance = PerformanceInput {
                total_return: metrics::parse_scaled(arg(4), metrics::DEFAULT_TOTAL_RETURN),
                sharpe_ratio: metrics::parse_scaled(arg(5), metrics::DEFAULT_SHARPE_RATIO),
                max_drawdown: metrics::parse_scaled(arg(6), metrics::DEFAULT_MAX_DRAWDOWN),
                win_rate: metrics::parse_scaled(arg(7), metrics::DEFAULT_WIN_RATE),
                trades_count: metrics::parse_trades_count(arg(8)),
            };
            workflow.submit_result(id, arg(2), arg(3), performance).await?
        }
        _ => eyre::bail!(USAGE),
    };

    let tx_hash = format!("{:?}", outcome.tx_hash);
    info!(id, state = ?outcome.state, tx_hash = %tx_hash, "Workflow step confirmed");

    let view = &outcome.view;
    println!("Strategy {}: {}", view.strategy.id, view.strategy.name);
    println!(
        "  Return {}  Sharpe {}  Drawdown {}  Win rate {}  Trades {}",
        metrics::format_total_return(view.performance.total_return),
        metrics::format_sharpe(view.performance.sharpe_ratio),
        metrics::format_drawdown(view.performance.max_drawdown),
        metrics::format_win_rate(view.performance.win_rate),
        view.performance.trades_count,
    );
    match outcome.state {
        VerificationState::Verified => println!("  Verified at {}", view.verification.verified_at),
        VerificationState::ComputeSubmitted => println!("  Compute task submitted, awaiting attestation"),
        VerificationState::Unverified => println!("  Pending verification"),
    }
    println!("Transaction: {}/tx/{}", BLOCK_EXPLORER_URL, tx_hash);

    Ok(())
}
