//! Replay memory interface for reinforcement learning.
//!
//! Both retrieval policies expose the same contract, so a training loop can
//! be written once against these traits and switch policies freely.
use super::PriorityUpdate;
use anyhow::Result;

/// Batch size used by training loops that do not choose their own.
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Interface for memories that store experiences from environments.
pub trait ExperienceMemoryBase {
    /// The type of items stored in the memory.
    type Item;

    /// Adds an experience, evicting the oldest one if the memory is full.
    fn add(&mut self, tr: Self::Item) -> Result<()>;

    /// Returns the current number of stored experiences.
    fn len(&self) -> usize;

    /// Returns `true` if no experience has been stored yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Interface for replay memories that generate batches for training.
///
/// A training loop interacts with a replay memory as follows:
///
/// ```mermaid
/// graph LR
///     Env -->|add| Memory
///     Memory -->|sample| Batch
///     Batch --> Learner
///     Learner -->|update with errors| Memory
/// ```
///
/// `update` refers to the batch returned by the most recent `sample`.
pub trait ReplayMemoryBase {
    /// Configuration parameters for the memory.
    type Config: Clone;

    /// The type of batch generated for training.
    type Batch;

    /// Builds a new memory from the given configuration.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Samples `size` distinct experiences.
    ///
    /// Fails without side effects if the memory is empty or holds fewer
    /// than `size` experiences.
    fn sample(&mut self, size: usize) -> Result<Self::Batch>;

    /// Refreshes the priorities of the most recently sampled batch from
    /// the errors computed on it.
    fn update(&mut self, errors: &[f32], variant: PriorityUpdate) -> Result<()>;
}
