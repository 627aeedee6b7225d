#![warn(missing_docs)]
//! Fixed-capacity experience replay memories for reinforcement learning.
//!
//! Two retrieval policies are provided behind the same interface:
//!
//! - [`UniformReplayMemory`]: uniform random sampling without replacement.
//! - [`PrioritizedReplayMemory`]: priority-proportional sampling with
//!   importance-sampling correction ([Schaul et al.](https://arxiv.org/abs/1511.05952)).
//!
//! Both implement [`ExperienceMemoryBase`] and [`ReplayMemoryBase`], so a
//! training loop written against the traits can switch policies by changing
//! only the concrete type.
//!
//! ```rust
//! use replay_memory::{
//!     ExperienceMemoryBase, PrioritizedReplayMemory, PrioritizedReplayMemoryConfig,
//!     PriorityUpdate, ReplayMemoryBase, Transition,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = PrioritizedReplayMemoryConfig::default().capacity(100).seed(7);
//! let mut memory = PrioritizedReplayMemory::<Vec<f32>, i64, f32, ()>::build(&config)?;
//!
//! for t in 0..10 {
//!     memory.add(Transition::new(vec![t as f32], t % 2, 1.0, vec![t as f32 + 1.0], ()))?;
//! }
//!
//! let batch = memory.sample(4)?;
//! let errors = vec![0.5; batch.len()];
//! memory.update(&errors, PriorityUpdate::Direct)?;
//! # Ok(())
//! # }
//! ```
pub mod circular_buffer;
pub mod error;
pub mod prioritized;
pub mod uniform;

mod base;
pub use base::{
    ExperienceMemoryBase, PriorityUpdate, ReplayBatch, ReplayMemoryBase, Transition,
    DEFAULT_BATCH_SIZE,
};
pub use circular_buffer::CircularBuffer;
pub use error::ReplayError;
pub use prioritized::{BetaScheduler, PrioritizedReplayMemory, PrioritizedReplayMemoryConfig};
pub use uniform::{ReplayMemoryConfig, UniformReplayMemory};
