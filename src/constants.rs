// Chain + contract defaults for the 0G Galileo testnet deployment.

pub const DEFAULT_CHAIN_ID: u64 = 16602;
pub const DEFAULT_RPC_URL: &str = "https://evmrpc-testnet.0g.ai";

pub const BLOCK_EXPLORER_URL: &str = "https://chainscan-galileo.0g.ai";

// Storage explorer submissions page; mock DA uploads resolve here
pub const STORAGE_EXPLORER_URL: &str = "https://storagescan-galileo.0g.ai/submissions";

// Old mock upload URLs 404, rewrite anything under this host to the explorer
pub const MOCK_DA_URL_PATTERN: &str = "da.0g.ai/";

/// Fallback registration fee when the contract read fails: 0.01 native (18 decimals).
pub const DEFAULT_REGISTRATION_FEE_WEI: u128 = 10_000_000_000_000_000;

pub const DEFAULT_COMPUTE_INPUT: &str = "{}";

/// File name of the session-scoped registration record.
pub const REGISTRATION_CACHE_FILE: &str = "register-success.json";

/// Registration records older than this are discarded at read time.
pub const REGISTRATION_CACHE_TTL_MS: i64 = 300_000;

pub const DEFAULT_CACHE_DIR: &str = ".arena-cache";
