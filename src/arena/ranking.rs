use futures::future::join_all;
use tracing::debug;

use super::client::ArenaLedger;
use super::error::ArenaError;
use super::types::RankedStrategy;

/// Total-return-ordered top-N view over the registered strategies.
///
/// The ledger has no indexed performance sort, so the candidate set is the
/// `min(total, 2N)` lowest-numbered (oldest) strategies. This is a
/// documented approximation of "all strategies", not a guaranteed global
/// top-N.
pub struct RankingEngine<'a, L: ArenaLedger> {
    ledger: &'a L,
}

impl<'a, L: ArenaLedger> RankingEngine<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    pub async fn top_strategies(&self, n: usize) -> Result<Vec<RankedStrategy>, ArenaError> {
        let total = match self.ledger.strategy_count().await {
            Ok(total) => total,
            // No configured ledger renders as an empty list, not a failure
            Err(ArenaError::Unconfigured) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let candidate_count = total.min(2 * n as u64);
        let candidates: Vec<u64> = (1..=candidate_count).collect();

        let fetched = join_all(
            candidates
                .iter()
                .map(|id| self.ledger.ranking_entry(*id)),
        )
        .await;

        // A candidate that fails to read (e.g. never fully initialized) is
        // dropped without affecting the others
        let mut entries: Vec<RankedStrategy> =
            fetched.into_iter().filter_map(Result::ok).collect();
        debug!(
            candidates = candidates.len(),
            readable = entries.len(),
            "Ranking candidates fetched"
        );

        // Stable sort: ties keep their id order, repeated calls on
        // unchanged data are deterministic
        entries.sort_by(|a, b| b.total_return.cmp(&a.total_return));
        entries.truncate(n);
        Ok(entries)
    }
}
