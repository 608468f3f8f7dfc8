use ethers::prelude::*;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::constants::DEFAULT_REGISTRATION_FEE_WEI;
use crate::wallet::{ArenaSigner, WalletSession};
use super::error::ArenaError;
use super::events;
use super::types::{
    PerformanceInput, PerformanceRecord, RankedStrategy, RegisterParams, RegistrationOutcome,
    StrategyRecord, StrategyView, VerificationRecord,
};

abigen!(
    StrategyArena,
    r#"[
        struct PerformanceData { uint256 totalReturn; uint256 sharpeRatio; uint256 maxDrawdown; uint256 winRate; uint256 tradesCount; uint256 lastUpdated; }
        function strategyCount() external view returns (uint256)
        function registrationFee() external view returns (uint256)
        function getStrategy(uint256 strategyId) external view returns (uint256, uint256, address, string, string, bytes32, string, uint256)
        function getPerformance(uint256 strategyId) external view returns (uint256, uint256, uint256, uint256, uint256, uint256)
        function getVerification(uint256 strategyId) external view returns (bool, uint256)
        function registerStrategy(string name, string description, bytes32 codeHash, string daStorageUrl) external payable returns (uint256)
        function submitComputeTask(uint256 strategyId, string computeInput) external
        function verifyResult(uint256 strategyId, bytes32 daRoot, bytes32 computeProof, PerformanceData performance) external
        event StrategyRegistered(uint256 indexed strategyId, address indexed owner, string name, uint256 createdAt)
    ]"#
);

/// The ledger operation seam the read-model components are generic over.
/// Implemented by [`ArenaClient`] against the real contract and by fakes in
/// tests.
// Callers stay generic (static dispatch), so auto-trait bounds on the
// returned futures are not needed here.
#[allow(async_fn_in_trait)]
pub trait ArenaLedger {
    async fn strategy_count(&self) -> Result<u64, ArenaError>;
    async fn ranking_entry(&self, id: u64) -> Result<RankedStrategy, ArenaError>;
    async fn strategy_view(&self, id: u64) -> Result<StrategyView, ArenaError>;
    async fn submit_compute_task(&self, id: u64, compute_input: &str) -> Result<TxHash, ArenaError>;
    async fn submit_verification(
        &self,
        id: u64,
        da_root: H256,
        compute_proof: H256,
        performance: &PerformanceInput,
    ) -> Result<TxHash, ArenaError>;
}

/// Typed client for the arena ledger contract.
///
/// Holds a read instance over the plain provider and, when a signing session
/// is connected, a write instance over the session's signer. Either can be
/// absent: no configured address disables both, no session disables writes.
pub struct ArenaClient {
    reader: Option<StrategyArena<Provider<Http>>>,
    writer: Option<StrategyArena<ArenaSigner>>,
    provider: Arc<Provider<Http>>,
    arena_address: Option<Address>,
    account: Option<Address>,
}

impl ArenaClient {
    pub fn new(config: &Config, session: Option<WalletSession>) -> Self {
        let arena_address = config.arena_contract;
        let reader =
            arena_address.map(|address| StrategyArena::new(address, config.provider.clone()));
        let writer = match (arena_address, &session) {
            (Some(address), Some(session)) => {
                Some(StrategyArena::new(address, session.signer.clone()))
            }
            _ => None,
        };
        Self {
            reader,
            writer,
            provider: config.provider.clone(),
            arena_address,
            account: session.map(|s| s.address),
        }
    }

    /// Merged Strategy + Performance + Verification view. The three reads
    /// are issued concurrently and all are required: one failure fails the
    /// call.
    #[instrument(skip(self))]
    pub async fn get_strategy(&self, id: u64) -> Result<StrategyView, ArenaError> {
        let reader = self.reader.as_ref().ok_or(ArenaError::Unconfigured)?;

        let strategy_call = reader.get_strategy(U256::from(id));
        let performance_call = reader.get_performance(U256::from(id));
        let verification_call = reader.get_verification(U256::from(id));
        let (raw_strategy, raw_performance, raw_verification) = futures::try_join!(
            strategy_call.call(),
            performance_call.call(),
            verification_call.call(),
        )
        .map_err(|e| map_read_error(id, e))?;

        let strategy = StrategyRecord::from(raw_strategy);
        if strategy.id == 0 {
            return Err(ArenaError::NotFound(id));
        }

        Ok(StrategyView {
            strategy,
            performance: PerformanceRecord::from(raw_performance),
            verification: VerificationRecord::from(raw_verification),
        })
    }

    /// Current registration fee in wei; `None` when the arena is not
    /// configured or the read fails.
    pub async fn get_registration_fee(&self) -> Result<Option<U256>, ArenaError> {
        let Some(reader) = self.reader.as_ref() else {
            return Ok(None);
        };
        match reader.registration_fee().call().await {
            Ok(fee) => Ok(Some(fee)),
            Err(e) => {
                warn!(error = %e, "registrationFee read failed");
                Ok(None)
            }
        }
    }

    /// Register a strategy: pay the fee, wait for confirmation, then recover
    /// the assigned id from the receipt (decoded event, then raw logs, then
    /// a historical query by registrant). An unresolved id is reported, not
    /// an error: the funds were spent and the write did occur.
    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn register_strategy(
        &self,
        params: &RegisterParams,
    ) -> Result<RegistrationOutcome, ArenaError> {
        let arena_address = self.arena_address.ok_or(ArenaError::Unconfigured)?;
        let writer = self.writer.as_ref().ok_or(ArenaError::Unauthenticated)?;
        let owner = self.account.ok_or(ArenaError::Unauthenticated)?;

        let fee = self
            .get_registration_fee()
            .await?
            .unwrap_or_else(|| U256::from(DEFAULT_REGISTRATION_FEE_WEI));

        let call = writer
            .register_strategy(
                params.name.clone(),
                params.description.clone(),
                params.code_hash.0,
                params.da_storage_url.clone(),
            )
            .value(fee);

        let pending_tx = call.send().await.map_err(map_write_error)?;
        let tx_hash = pending_tx.tx_hash();
        debug!(tx_hash = ?tx_hash, "Registration sent, waiting for confirmation");
        let receipt = self.confirm("registerStrategy", pending_tx).await?;

        let decoded_tier = |r: &TransactionReceipt| events::decoded_event_id(arena_address, r);
        let resolvers: [events::ReceiptResolver<'_>; 2] = [&decoded_tier, &events::raw_log_id];
        let mut strategy_id = events::resolve_from_receipt(&receipt, &resolvers);
        if strategy_id.is_none() {
            strategy_id =
                events::registered_id_by_owner(&self.provider, arena_address, owner).await;
        }
        if strategy_id.is_none() {
            warn!(tx_hash = ?tx_hash, "Strategy id unresolved; registration itself succeeded");
        }

        Ok(RegistrationOutcome {
            strategy_id: strategy_id.map(|id| id.low_u64()),
            tx_hash,
        })
    }

    /// Transaction hash of the registration event for a strategy, from the
    /// historical log index. `None` on any failure.
    pub async fn registration_tx_hash(&self, id: u64) -> Option<TxHash> {
        let arena_address = self.arena_address?;
        events::registration_tx_lookup(&self.provider, arena_address, id).await
    }

    async fn confirm(
        &self,
        action: &str,
        pending_tx: PendingTransaction<'_, Http>,
    ) -> Result<TransactionReceipt, ArenaError> {
        match pending_tx.await {
            Ok(Some(receipt)) => {
                if receipt.status == Some(1.into()) {
                    Ok(receipt)
                } else {
                    Err(ArenaError::LedgerRejected(format!(
                        "{} reverted with status {:?}",
                        action, receipt.status
                    )))
                }
            }
            Ok(None) => Err(ArenaError::Unavailable(format!(
                "{}: no receipt returned",
                action
            ))),
            Err(e) => Err(ArenaError::Unavailable(e.to_string())),
        }
    }

    fn write_contract(&self) -> Result<&StrategyArena<ArenaSigner>, ArenaError> {
        if self.arena_address.is_none() {
            return Err(ArenaError::Unconfigured);
        }
        self.writer.as_ref().ok_or(ArenaError::Unauthenticated)
    }
}

impl ArenaLedger for ArenaClient {
    async fn strategy_count(&self) -> Result<u64, ArenaError> {
        let reader = self.reader.as_ref().ok_or(ArenaError::Unconfigured)?;
        reader
            .strategy_count()
            .call()
            .await
            .map(|count| count.low_u64())
            .map_err(|e| ArenaError::Unavailable(e.to_string()))
    }

    /// Strategy + performance pair for the ranking. Both reads are required;
    /// either failing fails this one entry only.
    async fn ranking_entry(&self, id: u64) -> Result<RankedStrategy, ArenaError> {
        let reader = self.reader.as_ref().ok_or(ArenaError::Unconfigured)?;

        let strategy_call = reader.get_strategy(U256::from(id));
        let performance_call = reader.get_performance(U256::from(id));
        let (raw_strategy, raw_performance) = futures::try_join!(
            strategy_call.call(),
            performance_call.call(),
        )
        .map_err(|e| map_read_error(id, e))?;

        let strategy = StrategyRecord::from(raw_strategy);
        if strategy.id == 0 {
            return Err(ArenaError::NotFound(id));
        }

        Ok(RankedStrategy::from((
            strategy,
            PerformanceRecord::from(raw_performance),
        )))
    }

    async fn strategy_view(&self, id: u64) -> Result<StrategyView, ArenaError> {
        self.get_strategy(id).await
    }

    #[instrument(skip(self, compute_input))]
    async fn submit_compute_task(
        &self,
        id: u64,
        compute_input: &str,
    ) -> Result<TxHash, ArenaError> {
        let writer = self.write_contract()?;
        let call = writer.submit_compute_task(U256::from(id), compute_input.to_string());
        let pending_tx = call.send().await.map_err(map_write_error)?;
        let tx_hash = pending_tx.tx_hash();
        debug!(tx_hash = ?tx_hash, "Compute task sent, waiting for confirmation");
        self.confirm("submitComputeTask", pending_tx).await?;
        Ok(tx_hash)
    }

    #[instrument(skip(self, da_root, compute_proof, performance))]
    async fn submit_verification(
        &self,
        id: u64,
        da_root: H256,
        compute_proof: H256,
        performance: &PerformanceInput,
    ) -> Result<TxHash, ArenaError> {
        let writer = self.write_contract()?;
        let last_updated = chrono::Utc::now().timestamp().max(0) as u64;
        let call = writer.verify_result(
            U256::from(id),
            da_root.0,
            compute_proof.0,
            PerformanceData {
                total_return: scaled_to_u256(performance.total_return),
                sharpe_ratio: scaled_to_u256(performance.sharpe_ratio),
                max_drawdown: scaled_to_u256(performance.max_drawdown),
                win_rate: scaled_to_u256(performance.win_rate),
                trades_count: U256::from(performance.trades_count),
                last_updated: U256::from(last_updated),
            },
        );
        let pending_tx = call.send().await.map_err(map_write_error)?;
        let tx_hash = pending_tx.tx_hash();
        debug!(tx_hash = ?tx_hash, "Verification sent, waiting for confirmation");
        self.confirm("verifyResult", pending_tx).await?;
        Ok(tx_hash)
    }
}

// The ledger stores scaled metrics as unsigned words
fn scaled_to_u256(value: i64) -> U256 {
    U256::from(value.max(0) as u64)
}

/// A revert on a read means the ledger has no such entry; everything else is
/// a transport problem.
fn map_read_error<M: Middleware>(id: u64, err: ContractError<M>) -> ArenaError {
    if err.is_revert() {
        ArenaError::NotFound(id)
    } else {
        ArenaError::Unavailable(err.to_string())
    }
}

/// Reverted writes carry the ledger's reason string; it is forwarded
/// verbatim as the user-visible message.
fn map_write_error<M: Middleware>(err: ContractError<M>) -> ArenaError {
    if let Some(reason) = err.decode_revert::<String>() {
        ArenaError::LedgerRejected(reason)
    } else if err.is_revert() {
        ArenaError::LedgerRejected(err.to_string())
    } else {
        ArenaError::Unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config(arena: Option<Address>) -> Config {
        // Port 9 (discard) is never dialed by these tests: every checked
        // failure must surface before a network call is attempted.
        let provider = Provider::<Http>::try_from("http://127.0.0.1:9").unwrap();
        Config {
            chain_id: 16602,
            rpc_url: "http://127.0.0.1:9".to_string(),
            provider: Arc::new(provider),
            arena_contract: arena,
            strategy_nft_contract: None,
            ranking_contract: None,
            wallet_private_key: None,
            cache_dir: PathBuf::from(".arena-cache"),
        }
    }

    fn register_params() -> RegisterParams {
        RegisterParams {
            name: "Momentum Trader v1".to_string(),
            description: "Trend following".to_string(),
            code_hash: H256::zero(),
            da_storage_url: "https://storagescan-galileo.0g.ai/submissions".to_string(),
        }
    }

    #[tokio::test]
    async fn register_without_session_fails_with_unauthenticated() {
        let config = test_config(Some(Address::repeat_byte(0x11)));
        let client = ArenaClient::new(&config, None);
        // An attempted network call would surface as Unavailable instead
        let err = client.register_strategy(&register_params()).await.unwrap_err();
        assert!(matches!(err, ArenaError::Unauthenticated));
    }

    #[tokio::test]
    async fn writes_without_arena_address_fail_with_unconfigured() {
        let config = test_config(None);
        let client = ArenaClient::new(&config, None);
        let err = client.register_strategy(&register_params()).await.unwrap_err();
        assert!(matches!(err, ArenaError::Unconfigured));

        let err = client.submit_compute_task(1, "{}").await.unwrap_err();
        assert!(matches!(err, ArenaError::Unconfigured));
    }

    #[tokio::test]
    async fn unconfigured_reads_degrade_to_empty() {
        let config = test_config(None);
        let client = ArenaClient::new(&config, None);

        assert!(client.get_registration_fee().await.unwrap().is_none());
        assert!(client.registration_tx_hash(1).await.is_none());

        let err = client.get_strategy(1).await.unwrap_err();
        assert!(matches!(err, ArenaError::Unconfigured));
    }
}
