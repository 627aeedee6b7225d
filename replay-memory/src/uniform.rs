//! Replay memory with uniform random sampling.
//!
//! This is the reference retrieval policy: every stored transition is equally
//! likely to be drawn and every batch carries unit weights.
mod base;
mod config;
pub use base::UniformReplayMemory;
pub use config::ReplayMemoryConfig;
