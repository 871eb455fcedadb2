//! Challenge storage implementations.
//!
//! - **Memory** - single-process `HashMap` store with expiry sweeps, for
//!   development, tests, and single-node deployments
//! - **Redis** - shared store with TTL and atomic `GETDEL` consumption, for
//!   multi-node deployments

pub mod challenge_memory;
pub mod challenge_redis;

pub use challenge_memory::MemoryChallengeStore;
pub use challenge_redis::RedisChallengeStore;
