pub mod classify;
pub mod halves;
pub mod ladder;
pub mod percentile;
pub mod props;
pub mod runs_pool;
pub mod sprt;
pub mod systems;

pub use sprt::{SprtDecision, SprtError, SprtOutcome, SprtParams};
