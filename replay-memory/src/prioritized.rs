//! Prioritized experience replay.
//!
//! Transitions are drawn with probability proportional to `priority^alpha`
//! and returned with importance-sampling weights that correct the resulting
//! bias. Priorities are refreshed from training errors through
//! [`update`](crate::ReplayMemoryBase::update).
//!
//! Each stored transition shares a slot with its priority, so the two can
//! never drift out of alignment.
//!
//! ```rust
//! use replay_memory::prioritized::{PerConfig, PrioritizedReplayMemoryConfig};
//!
//! let config = PrioritizedReplayMemoryConfig::default()
//!     .capacity(10_000)
//!     .seed(42)
//!     .per_config(PerConfig::default().alpha(0.7).beta(0.5));
//! assert!(config.validate().is_ok());
//! ```
mod base;
mod beta_scheduler;
mod config;
pub use base::PrioritizedReplayMemory;
pub use beta_scheduler::BetaScheduler;
pub use config::{PerConfig, PrioritizedReplayMemoryConfig};
