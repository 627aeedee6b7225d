//! Prioritized replay memory.
use super::{BetaScheduler, PrioritizedReplayMemoryConfig};
use crate::{
    error::ReplayError, CircularBuffer, ExperienceMemoryBase, PriorityUpdate, ReplayBatch,
    ReplayMemoryBase, Transition,
};
use anyhow::Result;
use log::{debug, trace, warn};
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// A stored transition together with its sampling priority.
struct Slot<S, A, R, X> {
    transition: Transition<S, A, R, X>,

    /// Unnormalized priority, before taking the `alpha`-th power.
    priority: f32,

    /// Last `|error|` reported for this transition, used by rank updates.
    abs_error: Option<f32>,
}

/// A fixed-capacity memory sampled in proportion to transition priorities.
///
/// New transitions enter with the largest priority currently stored (1 for
/// the first one), so they are likely to be replayed soon. After a learning
/// step, [`update`](ReplayMemoryBase::update) refreshes the priorities of the
/// batch returned by the last [`sample`](ReplayMemoryBase::sample).
///
/// The sampled positions stay valid only until the next `add` or `sample`.
/// Calling `update` outside that window fails with
/// [`ReplayError::StaleIndices`] instead of touching unrelated entries.
///
/// # Type Parameters
///
/// * `S` - The type of states
/// * `A` - The type of actions
/// * `R` - The type of rewards
/// * `X` - The type of auxiliary data
pub struct PrioritizedReplayMemory<S, A, R, X> {
    /// Stored transitions and priorities, oldest first.
    store: CircularBuffer<Slot<S, A, R, X>>,

    /// Exponent for prioritization.
    alpha: f32,

    /// Priority floor.
    epsilon: f32,

    /// Schedule of the importance-sampling exponent.
    beta_scheduler: BetaScheduler,

    /// Positions sampled by the last call of `sample`.
    last_sampled_indices: Option<Vec<usize>>,

    /// Random number generator for sampling.
    rng: StdRng,
}

impl<S, A, R, X> PrioritizedReplayMemory<S, A, R, X> {
    /// Returns the maximum number of transitions.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Returns the prioritization exponent.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Returns the priority floor.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Returns the initial importance-sampling exponent.
    pub fn beta(&self) -> f32 {
        self.beta_scheduler.beta
    }

    /// Sets the importance-sampling exponent.
    pub fn set_beta(&mut self, beta: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&beta) {
            let msg = format!("beta = {} must be in [0, 1]", beta);
            return Err(ReplayError::InvalidArgument(msg).into());
        }
        self.beta_scheduler.beta = beta;
        Ok(())
    }

    /// Returns the current anneal rate of `beta`.
    pub fn beta_anneal_rate(&self) -> f32 {
        self.beta_scheduler.beta_anneal_rate
    }

    /// Returns the exponent used for the importance weights of the next batch.
    pub fn annealed_beta(&self) -> f32 {
        self.beta_scheduler.annealed_beta()
    }

    /// Returns the priorities of the stored transitions, oldest first.
    pub fn priorities(&self) -> Vec<f32> {
        self.store.iter().map(|slot| slot.priority).collect()
    }

    /// Returns the positions sampled by the last `sample`, if they are still valid.
    pub fn last_sampled_indices(&self) -> Option<&[usize]> {
        self.last_sampled_indices.as_deref()
    }

    /// Returns an iterator over the stored transitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<S, A, R, X>> + '_ {
        self.store.iter().map(|slot| &slot.transition)
    }

    /// Largest stored priority, or 1 if the memory is empty.
    fn max_priority(&self) -> f32 {
        self.store.max_by_key(1.0, |slot| slot.priority)
    }

    /// Sampling probabilities, `p_i^alpha / sum_k p_k^alpha`, oldest first.
    ///
    /// Priorities are scaled by the largest one before taking the power, so
    /// the total cannot overflow.
    fn probabilities(&self) -> Vec<f64> {
        let alpha = self.alpha as f64;
        let p_max = self.max_priority() as f64;
        let scores = self
            .store
            .iter()
            .map(|slot| (slot.priority as f64 / p_max).powf(alpha))
            .collect::<Vec<_>>();
        let total: f64 = scores.iter().sum();
        scores.iter().map(|s| s / total).collect()
    }

    /// Importance-sampling weights `(N P(i))^-beta`, normalized by their
    /// maximum over the transitions that can be drawn.
    fn importance_weights(&self, probs: &[f64]) -> Vec<f32> {
        let beta = self.beta_scheduler.annealed_beta() as f64;
        let n = probs.len() as f64;
        let ws = probs
            .iter()
            .map(|p| (p * n).powf(-beta))
            .collect::<Vec<_>>();

        // Zero-probability entries are never drawn and do not set the scale.
        let w_max = ws
            .iter()
            .copied()
            .filter(|w| w.is_finite())
            .fold(f64::MIN_POSITIVE, f64::max);
        ws.iter().map(|w| (w / w_max) as f32).collect()
    }

    /// Sets `priority = |error| + epsilon` for the given positions.
    fn update_direct(&mut self, ixs: &[usize], errors: &[f32]) -> Result<(), ReplayError> {
        let epsilon = self.epsilon;
        self.store.batch_modify(ixs, errors, |slot, err| {
            let abs_error = err.abs();
            slot.abs_error = Some(abs_error);
            slot.priority = abs_error + epsilon;
        })
    }

    /// Records the errors of the given positions and sets every priority to
    /// `1 / rank`, ranking by last `|error|` in descending order.
    ///
    /// Transitions without a reported error rank first. Equal errors share
    /// the best rank among them.
    fn update_rank(&mut self, ixs: &[usize], errors: &[f32]) -> Result<(), ReplayError> {
        self.store.batch_modify(ixs, errors, |slot, err| {
            slot.abs_error = Some(err.abs());
        })?;

        let mut keys = self
            .store
            .iter()
            .enumerate()
            .map(|(ix, slot)| (ix, slot.abs_error.unwrap_or(f32::INFINITY)))
            .collect::<Vec<_>>();
        keys.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut rank = 0;
        let mut prev = None;
        for (pos, &(ix, key)) in keys.iter().enumerate() {
            if prev != Some(key) {
                rank = pos + 1;
                prev = Some(key);
            }
            if let Some(slot) = self.store.get_mut(ix) {
                slot.priority = 1.0 / rank as f32;
            }
        }

        Ok(())
    }
}

impl<S, A, R, X> ExperienceMemoryBase for PrioritizedReplayMemory<S, A, R, X> {
    type Item = Transition<S, A, R, X>;

    /// Adds a transition with the largest priority currently stored.
    ///
    /// Invalidates the positions of the last sampled batch.
    fn add(&mut self, tr: Self::Item) -> Result<()> {
        let priority = self.max_priority();
        let slot = Slot {
            transition: tr,
            priority,
            abs_error: None,
        };
        if self.store.append(slot).is_some() {
            trace!("Evicted the oldest transition");
        }
        if self.last_sampled_indices.take().is_some() {
            trace!("Invalidated the last sampled indices");
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.store.len()
    }
}

impl<S, A, R, X> ReplayMemoryBase for PrioritizedReplayMemory<S, A, R, X>
where
    S: Clone,
    A: Clone,
    R: Clone,
    X: Clone,
{
    type Config = PrioritizedReplayMemoryConfig;
    type Batch = ReplayBatch<S, A, R, X>;

    fn build(config: &Self::Config) -> Result<Self> {
        config.validate()?;
        debug!("Build prioritized replay memory with {:?}", config);

        let per_config = &config.per_config;
        Ok(Self {
            store: CircularBuffer::new(config.capacity)?,
            alpha: per_config.alpha,
            epsilon: per_config.epsilon,
            beta_scheduler: BetaScheduler::new(per_config.beta, per_config.beta_anneal_rate),
            last_sampled_indices: None,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Samples `size` distinct transitions in proportion to `priority^alpha`.
    ///
    /// The returned weights lie in `(0, 1]`. Every successful call squares
    /// the anneal rate of `beta`. Fails with [`ReplayError::Capacity`] if
    /// fewer than `size` transitions have a nonzero probability.
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

        let probs = self.probabilities();
        let available = probs.iter().filter(|&&p| p > 0.0).count();
        if size > available {
            return Err(ReplayError::Capacity {
                requested: size,
                available,
            }
            .into());
        }

        let weights = self.importance_weights(&probs);
        let ixs = index::sample_weighted(&mut self.rng, n, |i| probs[i], size)
            .map_err(|e| ReplayError::InvalidArgument(e.to_string()))?
            .into_vec();
        trace!(
            "Sampled {} of {} transitions, beta = {}",
            size,
            n,
            self.beta_scheduler.annealed_beta()
        );

        let mut batch = ReplayBatch::with_capacity(size);
        for &ix in ixs.iter() {
            let slot = self
                .store
                .get(ix)
                .ok_or(ReplayError::IndexOutOfRange { index: ix, len: n })?;
            batch.push(ix, &slot.transition, weights[ix]);
        }

        self.last_sampled_indices = Some(ixs);
        self.beta_scheduler.step();

        Ok(batch)
    }

    /// Refreshes the priorities of the last sampled batch.
    ///
    /// `errors[k]` belongs to the `k`-th transition of that batch.
    fn update(&mut self, errors: &[f32], variant: PriorityUpdate) -> Result<()> {
        let ixs = match self.last_sampled_indices.take() {
            Some(ixs) => ixs,
            None => {
                warn!("update() called without a valid sampled batch");
                return Err(ReplayError::StaleIndices.into());
            }
        };

        let res = if errors.len() != ixs.len() {
            Err(ReplayError::LengthMismatch {
                expected: ixs.len(),
                actual: errors.len(),
            })
        } else if let Some(e) = errors.iter().find(|e| !e.is_finite()) {
            Err(ReplayError::InvalidArgument(format!("Non-finite error {}", e)))
        } else {
            trace!("Update {} priorities ({})", ixs.len(), variant);
            match variant {
                PriorityUpdate::Direct => self.update_direct(&ixs, errors),
                PriorityUpdate::Rank => self.update_rank(&ixs, errors),
            }
        };

        self.last_sampled_indices = Some(ixs);
        res.map_err(anyhow::Error::from)
    }
}
