//! Per-strategy verification coordination.
//!
//! `Unverified -> ComputeSubmitted -> Verified`. The middle state is a
//! local, optimistic label only: the ledger does not track it, so every
//! operation ends by re-reading the authoritative strategy state and
//! returning it. Callers never observe stale verification state through
//! this module.

use ethers::types::{TxHash, H256};
use tracing::{debug, info};

use crate::constants::DEFAULT_COMPUTE_INPUT;
use super::client::ArenaLedger;
use super::error::ArenaError;
use super::types::{PerformanceInput, StrategyView};

/// Substituted when a supplied DA root fails the 32-byte shape check.
pub const DEFAULT_DA_ROOT: [u8; 32] = [0x00; 32];
/// Substituted when a supplied compute proof fails the 32-byte shape check.
pub const DEFAULT_COMPUTE_PROOF: [u8; 32] = [0x01; 32];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationState {
    Unverified,
    /// Compute task submitted, attestation not yet observed. Optimistic;
    /// not authoritative.
    ComputeSubmitted,
    /// Terminal. Reached only once a post-write read shows `verified`.
    Verified,
}

/// Result of a workflow operation: the confirmed transaction plus the
/// re-read, authoritative view of the strategy.
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    pub tx_hash: TxHash,
    pub state: VerificationState,
    pub view: StrategyView,
}

pub struct VerificationWorkflow<'a, L: ArenaLedger> {
    ledger: &'a L,
}

impl<'a, L: ArenaLedger> VerificationWorkflow<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Submit an off-chain compute task for a strategy. Refused once the
    /// strategy is verified. Concurrent duplicate submissions are not
    /// deduplicated here; idempotency belongs to the compute layer.
    pub async fn submit_compute_task(&self, id: u64) -> Result<WorkflowOutcome, ArenaError> {
        let current = self.ledger.strategy_view(id).await?;
        if current.verification.verified {
            return Err(ArenaError::AlreadyVerified(id));
        }

        let tx_hash = self
            .ledger
            .submit_compute_task(id, DEFAULT_COMPUTE_INPUT)
            .await?;
        debug!(id, tx_hash = ?tx_hash, "Compute task confirmed, refreshing strategy");

        let view = self.ledger.strategy_view(id).await?;
        let state = if view.verification.verified {
            VerificationState::Verified
        } else {
            VerificationState::ComputeSubmitted
        };
        Ok(WorkflowOutcome { tx_hash, state, view })
    }

    /// Submit a verification result. `trades_count < 1` is refused before
    /// any network call; malformed root/proof hex is replaced with the
    /// documented defaults rather than blocking submission.
    pub async fn submit_result(
        &self,
        id: u64,
        da_root: &str,
        compute_proof: &str,
        performance: PerformanceInput,
    ) -> Result<WorkflowOutcome, ArenaError> {
        if performance.trades_count < 1 {
            return Err(ArenaError::InvalidTradesCount);
        }

        let da_root = normalize_bytes32(da_root, DEFAULT_DA_ROOT);
        let compute_proof = normalize_bytes32(compute_proof, DEFAULT_COMPUTE_PROOF);

        let tx_hash = self
            .ledger
            .submit_verification(id, da_root, compute_proof, &performance)
            .await?;
        info!(id, tx_hash = ?tx_hash, "Verification confirmed, refreshing strategy");

        let view = self.ledger.strategy_view(id).await?;
        let state = if view.verification.verified {
            VerificationState::Verified
        } else {
            VerificationState::Unverified
        };
        Ok(WorkflowOutcome { tx_hash, state, view })
    }
}

/// Accepts exactly `0x` + 64 hex digits; anything else becomes `fallback`.
pub fn normalize_bytes32(value: &str, fallback: [u8; 32]) -> H256 {
    parse_bytes32(value).unwrap_or_else(|| H256::from(fallback))
}

fn parse_bytes32(value: &str) -> Option<H256> {
    let digits = value.strip_prefix("0x")?;
    if digits.len() != 64 {
        return None;
    }
    let bytes = hex::decode(digits).ok()?;
    Some(H256::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::types::{
        PerformanceRecord, RankedStrategy, StrategyRecord, VerificationRecord,
    };
    use ethers::types::Address;
    use std::cell::{Cell, RefCell};

    fn view(id: u64, verified: bool) -> StrategyView {
        StrategyView {
            strategy: StrategyRecord {
                id,
                token_id: id,
                owner: Address::repeat_byte(0x22),
                name: "Momentum Trader v1".to_string(),
                description: "Trend following".to_string(),
                code_hash: H256::zero(),
                da_storage_url: String::new(),
                created_at: 1_700_000_000,
            },
            performance: PerformanceRecord {
                total_return: 10_500,
                sharpe_ratio: 15_000,
                max_drawdown: 200,
                win_rate: 6_000,
                trades_count: if verified { 10 } else { 0 },
                last_updated: 0,
            },
            verification: VerificationRecord {
                verified,
                verified_at: if verified { 1_700_000_100 } else { 0 },
            },
        }
    }

    /// Ledger fake: flips to verified once a verification write lands, and
    /// counts every operation.
    struct FakeLedger {
        verified: Cell<bool>,
        reads: Cell<u32>,
        compute_calls: Cell<u32>,
        verify_calls: Cell<u32>,
        last_root: RefCell<Option<H256>>,
        last_proof: RefCell<Option<H256>>,
    }

    impl FakeLedger {
        fn new(verified: bool) -> Self {
            Self {
                verified: Cell::new(verified),
                reads: Cell::new(0),
                compute_calls: Cell::new(0),
                verify_calls: Cell::new(0),
                last_root: RefCell::new(None),
                last_proof: RefCell::new(None),
            }
        }
    }

    impl ArenaLedger for FakeLedger {
        async fn strategy_count(&self) -> Result<u64, ArenaError> {
            unreachable!("not used by the workflow")
        }

        async fn ranking_entry(&self, _id: u64) -> Result<RankedStrategy, ArenaError> {
            unreachable!("not used by the workflow")
        }

        async fn strategy_view(&self, id: u64) -> Result<StrategyView, ArenaError> {
            self.reads.set(self.reads.get() + 1);
            Ok(view(id, self.verified.get()))
        }

        async fn submit_compute_task(
            &self,
            _id: u64,
            _compute_input: &str,
        ) -> Result<TxHash, ArenaError> {
            self.compute_calls.set(self.compute_calls.get() + 1);
            Ok(TxHash::repeat_byte(0x01))
        }

        async fn submit_verification(
            &self,
            _id: u64,
            da_root: H256,
            compute_proof: H256,
            _performance: &PerformanceInput,
        ) -> Result<TxHash, ArenaError> {
            self.verify_calls.set(self.verify_calls.get() + 1);
            *self.last_root.borrow_mut() = Some(da_root);
            *self.last_proof.borrow_mut() = Some(compute_proof);
            self.verified.set(true);
            Ok(TxHash::repeat_byte(0x02))
        }
    }

    fn performance(trades: u64) -> PerformanceInput {
        PerformanceInput {
            total_return: 10_500,
            sharpe_ratio: 15_000,
            max_drawdown: 200,
            win_rate: 6_000,
            trades_count: trades,
        }
    }

    const GOOD_ROOT: &str =
        "0x1111111111111111111111111111111111111111111111111111111111111111";
    const GOOD_PROOF: &str =
        "0x2222222222222222222222222222222222222222222222222222222222222222";

    #[tokio::test]
    async fn zero_trades_is_refused_before_any_call() {
        let ledger = FakeLedger::new(false);
        let workflow = VerificationWorkflow::new(&ledger);

        let err = workflow
            .submit_result(1, GOOD_ROOT, GOOD_PROOF, performance(0))
            .await
            .unwrap_err();
        assert!(matches!(err, ArenaError::InvalidTradesCount));
        assert_eq!(ledger.verify_calls.get(), 0);
        assert_eq!(ledger.reads.get(), 0);
    }

    #[tokio::test]
    async fn one_trade_is_accepted_and_state_refreshed() {
        let ledger = FakeLedger::new(false);
        let workflow = VerificationWorkflow::new(&ledger);

        let outcome = workflow
            .submit_result(1, GOOD_ROOT, GOOD_PROOF, performance(1))
            .await
            .unwrap();
        assert_eq!(outcome.state, VerificationState::Verified);
        assert!(outcome.view.verification.verified);
        assert_eq!(ledger.verify_calls.get(), 1);
        // the returned view comes from a read issued after the write
        assert_eq!(ledger.reads.get(), 1);
        assert_eq!(*ledger.last_root.borrow(), Some(GOOD_ROOT.parse().unwrap()));
    }

    #[tokio::test]
    async fn malformed_hex_is_replaced_with_defaults_not_blocked() {
        let ledger = FakeLedger::new(false);
        let workflow = VerificationWorkflow::new(&ledger);

        workflow
            .submit_result(1, "0x123", "not hex at all", performance(5))
            .await
            .unwrap();
        assert_eq!(*ledger.last_root.borrow(), Some(H256::from(DEFAULT_DA_ROOT)));
        assert_eq!(
            *ledger.last_proof.borrow(),
            Some(H256::from(DEFAULT_COMPUTE_PROOF))
        );
    }

    #[tokio::test]
    async fn compute_task_refused_once_verified() {
        let ledger = FakeLedger::new(true);
        let workflow = VerificationWorkflow::new(&ledger);

        let err = workflow.submit_compute_task(1).await.unwrap_err();
        assert!(matches!(err, ArenaError::AlreadyVerified(1)));
        assert_eq!(ledger.compute_calls.get(), 0);
    }

    #[tokio::test]
    async fn compute_task_reports_optimistic_state_after_refresh() {
        let ledger = FakeLedger::new(false);
        let workflow = VerificationWorkflow::new(&ledger);

        let outcome = workflow.submit_compute_task(1).await.unwrap();
        assert_eq!(outcome.state, VerificationState::ComputeSubmitted);
        assert_eq!(ledger.compute_calls.get(), 1);
        // one read to gate on current state, one to refresh after the write
        assert_eq!(ledger.reads.get(), 2);
    }

    #[test]
    fn bytes32_normalization() {
        assert_eq!(
            normalize_bytes32(GOOD_ROOT, DEFAULT_DA_ROOT),
            GOOD_ROOT.parse::<H256>().unwrap()
        );
        assert_eq!(
            normalize_bytes32("0xabc", DEFAULT_DA_ROOT),
            H256::from(DEFAULT_DA_ROOT)
        );
        assert_eq!(
            normalize_bytes32("", DEFAULT_COMPUTE_PROOF),
            H256::from(DEFAULT_COMPUTE_PROOF)
        );
        // right length, not hex
        let junk = format!("0x{}", "zz".repeat(32));
        assert_eq!(
            normalize_bytes32(&junk, DEFAULT_DA_ROOT),
            H256::from(DEFAULT_DA_ROOT)
        );
    }
}
