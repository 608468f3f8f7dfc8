//! Mock data-availability collaborator.
//!
//! Uploads are simulated: the payload is hashed with keccak256 as a content
//! attestation and the returned URL points at the public storage explorer.
//! The interface matches what a real DA client would expose so callers do
//! not change when one lands.

use ethers::types::H256;
use ethers::utils::keccak256;
use eyre::Result;
use serde_json::json;

use crate::constants::{MOCK_DA_URL_PATTERN, STORAGE_EXPLORER_URL};

#[derive(Debug, Clone)]
pub struct DaUploadResult {
    pub url: String,
    pub content_hash: H256,
    pub tx_hash: H256,
}

/// Upload strategy artifacts. Mock: hashes the JSON payload and points the
/// caller at the storage explorer.
pub async fn upload(name: &str, code: &str, description: &str) -> Result<DaUploadResult> {
    let timestamp_ms = chrono::Utc::now().timestamp_millis();
    let hash = payload_hash(name, code, description, timestamp_ms)?;
    Ok(DaUploadResult {
        url: STORAGE_EXPLORER_URL.to_string(),
        content_hash: hash,
        tx_hash: hash,
    })
}

/// Content hash of a strategy's source code, as stored on the ledger.
pub fn code_hash(code: &str) -> H256 {
    H256::from(keccak256(code.as_bytes()))
}

/// Resolve a stored DA URL for display. Old mock upload URLs no longer
/// resolve; anything under the mock host is rewritten to the canonical
/// storage explorer. `None` for an empty value.
pub fn display_url(stored: &str) -> Option<String> {
    if stored.is_empty() {
        return None;
    }
    if stored.contains(MOCK_DA_URL_PATTERN) {
        return Some(STORAGE_EXPLORER_URL.to_string());
    }
    Some(stored.to_string())
}

fn payload_hash(name: &str, code: &str, description: &str, timestamp_ms: i64) -> Result<H256> {
    let payload = serde_json::to_string(&json!({
        "data": {
            "name": name,
            "code": code,
            "metadata": { "description": description },
        },
        "timestamp": timestamp_ms,
    }))?;
    Ok(H256::from(keccak256(payload.as_bytes())))
}
