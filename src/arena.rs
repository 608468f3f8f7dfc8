pub mod client;
pub mod error;
pub mod events;
pub mod ranking;
pub mod types;
pub mod workflow;

pub use client::{ArenaClient, ArenaLedger};
pub use error::ArenaError;
pub use ranking::RankingEngine;
pub use types::{
    PerformanceInput, PerformanceRecord, RankedStrategy, RegisterParams, RegistrationOutcome,
    StrategyRecord, StrategyView, VerificationRecord,
};
pub use workflow::{VerificationState, VerificationWorkflow, WorkflowOutcome};
