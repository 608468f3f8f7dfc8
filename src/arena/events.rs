//! Recovery of the ledger-assigned strategy id from a registration
//! transaction.
//!
//! Receipts are untrusted input: depending on how a log was retrieved the
//! decodable event may be missing or mangled, so resolution is a layered
//! chain (decoded receipt event, then per-log re-decoding, then a
//! historical query). Exhausting the chain yields "id unknown", never an
//! error. The transaction hash is preserved by the caller either way.

use ethers::contract::EthEvent;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, Filter, TransactionReceipt, TxHash, H256, U256};
use tracing::{debug, warn};

use super::client::StrategyRegisteredFilter;

/// One step of the receipt resolution chain.
pub type ReceiptResolver<'a> = &'a dyn Fn(&TransactionReceipt) -> Option<U256>;

/// Try each resolver in order; first success wins.
pub fn resolve_from_receipt(
    receipt: &TransactionReceipt,
    resolvers: &[ReceiptResolver<'_>],
) -> Option<U256> {
    resolvers.iter().find_map(|resolve| resolve(receipt))
}

/// Primary path: the receipt's own logs, restricted to those emitted by the
/// arena contract with the expected event signature.
pub fn decoded_event_id(arena: Address, receipt: &TransactionReceipt) -> Option<U256> {
    let signature = StrategyRegisteredFilter::signature();
    receipt
        .logs
        .iter()
        .filter(|log| log.address == arena && log.topics.first() == Some(&signature))
        .find_map(|log| {
            StrategyRegisteredFilter::decode_log(&log.clone().into())
                .ok()
                .map(|event| event.strategy_id)
        })
}

/// Fallback path: re-decode every raw log in the receipt independently.
/// Receipts may contain unrelated logs; a log that fails to decode is
/// skipped, not fatal.
pub fn raw_log_id(receipt: &TransactionReceipt) -> Option<U256> {
    receipt
        .logs
        .iter()
        .find_map(|log| match StrategyRegisteredFilter::decode_log(&log.clone().into()) {
            Ok(event) => Some(event.strategy_id),
            Err(_) => None,
        })
}

/// Last resort: query the historical event index, filtered by the event
/// signature and the registrant, taking the id from the first match.
pub async fn registered_id_by_owner(
    provider: &Provider<Http>,
    arena: Address,
    owner: Address,
) -> Option<U256> {
    let filter = Filter::new()
        .address(arena)
        .topic0(StrategyRegisteredFilter::signature())
        .topic2(H256::from(owner))
        .from_block(0u64);
    match provider.get_logs(&filter).await {
        Ok(logs) => logs.into_iter().find_map(|log| {
            StrategyRegisteredFilter::decode_log(&log.into())
                .ok()
                .map(|event| event.strategy_id)
        }),
        Err(e) => {
            warn!(error = %e, owner = ?owner, "Registration event query failed");
            None
        }
    }
}

/// Originating transaction hash of a strategy's registration event.
pub async fn registration_tx_lookup(
    provider: &Provider<Http>,
    arena: Address,
    strategy_id: u64,
) -> Option<TxHash> {
    let filter = Filter::new()
        .address(arena)
        .topic0(StrategyRegisteredFilter::signature())
        .topic1(topic_from_u256(U256::from(strategy_id)))
        .from_block(0u64);
    match provider.get_logs(&filter).await {
        Ok(logs) => {
            debug!(strategy_id, logs_count = logs.len(), "Registration event lookup");
            logs.into_iter().find_map(|log| log.transaction_hash)
        }
        Err(e) => {
            warn!(error = %e, strategy_id, "Registration tx lookup failed");
            None
        }
    }
}

fn topic_from_u256(value: U256) -> H256 {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    H256::from(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::Token;
    use ethers::types::Log;
    use std::cell::Cell;

    fn arena_address() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn registered_log(emitter: Address, strategy_id: u64) -> Log {
        Log {
            address: emitter,
            topics: vec![
                StrategyRegisteredFilter::signature(),
                topic_from_u256(U256::from(strategy_id)),
                H256::from(Address::repeat_byte(0x22)),
            ],
            data: ethers::abi::encode(&[
                Token::String("Momentum Trader v1".to_string()),
                Token::Uint(U256::from(1_700_000_000u64)),
            ])
            .into(),
            ..Default::default()
        }
    }

    fn unrelated_log() -> Log {
        Log {
            address: Address::repeat_byte(0x33),
            topics: vec![H256::repeat_byte(0x44)],
            data: vec![0u8; 4].into(),
            ..Default::default()
        }
    }

    #[test]
    fn decoded_event_short_circuits_the_chain() {
        let receipt = TransactionReceipt {
            logs: vec![unrelated_log(), registered_log(arena_address(), 7)],
            ..Default::default()
        };

        let fallback_calls = Cell::new(0u32);
        let primary = |r: &TransactionReceipt| decoded_event_id(arena_address(), r);
        let counted_fallback = |r: &TransactionReceipt| {
            fallback_calls.set(fallback_calls.get() + 1);
            raw_log_id(r)
        };
        let resolvers: [ReceiptResolver<'_>; 2] = [&primary, &counted_fallback];

        assert_eq!(
            resolve_from_receipt(&receipt, &resolvers),
            Some(U256::from(7))
        );
        assert_eq!(fallback_calls.get(), 0);
    }

    #[test]
    fn raw_log_path_recovers_id_when_primary_sees_nothing() {
        // Event emitted through a different address than the one the
        // primary path filters on
        let receipt = TransactionReceipt {
            logs: vec![unrelated_log(), registered_log(Address::repeat_byte(0xbb), 42)],
            ..Default::default()
        };

        let primary = |r: &TransactionReceipt| decoded_event_id(arena_address(), r);
        let resolvers: [ReceiptResolver<'_>; 2] = [&primary, &raw_log_id];

        assert_eq!(
            resolve_from_receipt(&receipt, &resolvers),
            Some(U256::from(42))
        );
    }

    #[test]
    fn raw_log_path_skips_undecodable_logs() {
        let mut mangled = registered_log(arena_address(), 9);
        mangled.data = vec![0u8; 3].into(); // truncated payload
        let receipt = TransactionReceipt {
            logs: vec![mangled, registered_log(arena_address(), 10)],
            ..Default::default()
        };

        assert_eq!(raw_log_id(&receipt), Some(U256::from(10)));
    }

    #[test]
    fn exhausted_chain_reports_absence_not_error() {
        let receipt = TransactionReceipt {
            logs: vec![unrelated_log()],
            ..Default::default()
        };

        let primary = |r: &TransactionReceipt| decoded_event_id(arena_address(), r);
        let resolvers: [ReceiptResolver<'_>; 2] = [&primary, &raw_log_id];

        assert_eq!(resolve_from_receipt(&receipt, &resolvers), None);
    }
}
