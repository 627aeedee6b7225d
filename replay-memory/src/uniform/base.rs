//! Uniform replay memory.
use super::ReplayMemoryConfig;
use crate::{
    error::ReplayError, CircularBuffer, ExperienceMemoryBase, PriorityUpdate, ReplayBatch,
    ReplayMemoryBase, Transition,
};
use anyhow::Result;
use log::{debug, trace};
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// A fixed-capacity FIFO memory sampled uniformly without replacement.
///
/// # Type Parameters
///
/// * `S` - The type of states
/// * `A` - The type of actions
/// * `R` - The type of rewards
/// * `X` - The type of auxiliary data
pub struct UniformReplayMemory<S, A, R, X> {
    /// Stored transitions, oldest first.
    store: CircularBuffer<Transition<S, A, R, X>>,

    /// Random number generator for sampling.
    rng: StdRng,
}

impl<S, A, R, X> UniformReplayMemory<S, A, R, X> {
    /// Returns the maximum number of transitions.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Returns an iterator over the stored transitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<S, A, R, X>> + '_ {
        self.store.iter()
    }
}

impl<S, A, R, X> ExperienceMemoryBase for UniformReplayMemory<S, A, R, X> {
    type Item = Transition<S, A, R, X>;

    fn add(&mut self, tr: Self::Item) -> Result<()> {
        if self.store.append(tr).is_some() {
            trace!("Evicted the oldest transition");
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.store.len()
    }
}

impl<S, A, R, X> ReplayMemoryBase for UniformReplayMemory<S, A, R, X>
where
    S: Clone,
    A: Clone,
    R: Clone,
    X: Clone,
{
    type Config = ReplayMemoryConfig;
    type Batch = ReplayBatch<S, A, R, X>;

    fn build(config: &Self::Config) -> Result<Self> {
        debug!("Build uniform replay memory with {:?}", config);
        Ok(Self {
            store: CircularBuffer::new(config.capacity)?,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    fn sample(&mut self, size: usize) -> Result<Self::Batch> {
        let n = self.store.len();
        if n == 0 {
            return Err(ReplayError::EmptyBuffer.into());
        }
        if size > n {
            return Err(ReplayError::Capacity {
                requested: size,
                available: n,
            }
            .into());
        }

        let ixs = index::sample(&mut self.rng, n, size).into_vec();
        trace!("Sampled {} of {} transitions", size, n);

        let mut batch = ReplayBatch::with_capacity(size);
        for ix in ixs {
            let tr = self
                .store
                .get(ix)
                .ok_or(ReplayError::IndexOutOfRange { index: ix, len: n })?;
            batch.push(ix, tr, 1.0);
        }

        Ok(batch)
    }

    /// Uniform sampling keeps no priorities, so this does nothing.
    fn update(&mut self, _errors: &[f32], _variant: PriorityUpdate) -> Result<()> {
        Ok(())
    }
}
