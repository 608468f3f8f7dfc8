pub mod arena;
pub mod config;
pub mod constants;
pub mod da;
pub mod logging;
pub mod metrics;
pub mod session_cache;
pub mod wallet;
