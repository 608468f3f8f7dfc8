use ethers::types::{Address, TxHash, H256, U256};

use crate::metrics;

/// Immutable identity of a registered strategy. The ledger is authoritative;
/// this is a read-only snapshot.
#[derive(Debug, Clone)]
pub struct StrategyRecord {
    pub id: u64,
    pub token_id: u64,
    pub owner: Address,
    pub name: String,
    pub description: String,
    pub code_hash: H256,
    pub da_storage_url: String,
    pub created_at: u64,
}

/// Scaled-integer performance figures as stored on the ledger. Holds the
/// unset defaults (baseline return, zero trades) until a verification lands.
#[derive(Debug, Clone)]
pub struct PerformanceRecord {
    pub total_return: i64,
    pub sharpe_ratio: i64,
    pub max_drawdown: i64,
    pub win_rate: i64,
    pub trades_count: u64,
    pub last_updated: u64,
}

#[derive(Debug, Clone)]
pub struct VerificationRecord {
    pub verified: bool,
    /// Meaningful only when `verified` is true.
    pub verified_at: u64,
}

/// Merged detail view: one strategy with its performance and verification.
#[derive(Debug, Clone)]
pub struct StrategyView {
    pub strategy: StrategyRecord,
    pub performance: PerformanceRecord,
    pub verification: VerificationRecord,
}

/// One row of the ranking: strategy + performance, no verification read.
#[derive(Debug, Clone)]
pub struct RankedStrategy {
    pub id: u64,
    pub token_id: u64,
    pub owner: Address,
    pub name: String,
    pub description: String,
    pub total_return: i64,
    pub sharpe_ratio: i64,
    pub trades_count: u64,
    pub last_updated: u64,
}

impl From<(StrategyRecord, PerformanceRecord)> for RankedStrategy {
    fn from((strategy, performance): (StrategyRecord, PerformanceRecord)) -> Self {
        Self {
            id: strategy.id,
            token_id: strategy.token_id,
            owner: strategy.owner,
            name: strategy.name,
            description: strategy.description,
            total_return: performance.total_return,
            sharpe_ratio: performance.sharpe_ratio,
            trades_count: performance.trades_count,
            last_updated: performance.last_updated,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisterParams {
    pub name: String,
    pub description: String,
    pub code_hash: H256,
    pub da_storage_url: String,
}

/// Result of a confirmed registration. `strategy_id` is `None` when the
/// assigned id could not be recovered from the receipt or the event history;
/// the transaction still succeeded and its hash is always present.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub strategy_id: Option<u64>,
    pub tx_hash: TxHash,
}

/// Performance figures submitted with a verification. `last_updated` is
/// stamped by the client at submission time.
#[derive(Debug, Clone)]
pub struct PerformanceInput {
    pub total_return: i64,
    pub sharpe_ratio: i64,
    pub max_drawdown: i64,
    pub win_rate: i64,
    pub trades_count: u64,
}

impl Default for PerformanceInput {
    fn default() -> Self {
        Self {
            total_return: metrics::DEFAULT_TOTAL_RETURN,
            sharpe_ratio: metrics::DEFAULT_SHARPE_RATIO,
            max_drawdown: metrics::DEFAULT_MAX_DRAWDOWN,
            win_rate: metrics::DEFAULT_WIN_RATE,
            trades_count: 1,
        }
    }
}

// Conversions from the abigen return tuples. Ledger values are untrusted:
// widths are truncated with low_u64 rather than panicking on overflow.

pub(crate) type RawStrategy = (U256, U256, Address, String, String, [u8; 32], String, U256);
pub(crate) type RawPerformance = (U256, U256, U256, U256, U256, U256);
pub(crate) type RawVerification = (bool, U256);

impl From<RawStrategy> for StrategyRecord {
    fn from(raw: RawStrategy) -> Self {
        let (id, token_id, owner, name, description, code_hash, da_storage_url, created_at) = raw;
        Self {
            id: id.low_u64(),
            token_id: token_id.low_u64(),
            owner,
            name,
            description,
            code_hash: H256::from(code_hash),
            da_storage_url,
            created_at: created_at.low_u64(),
        }
    }
}

impl From<RawPerformance> for PerformanceRecord {
    fn from(raw: RawPerformance) -> Self {
        let (total_return, sharpe_ratio, max_drawdown, win_rate, trades_count, last_updated) = raw;
        Self {
            total_return: total_return.low_u64() as i64,
            sharpe_ratio: sharpe_ratio.low_u64() as i64,
            max_drawdown: max_drawdown.low_u64() as i64,
            win_rate: win_rate.low_u64() as i64,
            trades_count: trades_count.low_u64(),
            last_updated: last_updated.low_u64(),
        }
    }
}

impl From<RawVerification> for VerificationRecord {
    fn from((verified, verified_at): RawVerification) -> Self {
        Self {
            verified,
            verified_at: verified_at.low_u64(),
        }
    }
}
