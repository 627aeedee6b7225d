//! Batch of sampled transitions.
use super::Transition;

/// A batch of transitions sampled from a replay memory.
///
/// Field names are the contract consumed by training code. Stacking the
/// per-field vectors into tensors is left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayBatch<S, A, R, X> {
    /// States before the actions.
    pub state_before_batch: Vec<S>,

    /// Actions taken.
    pub action_batch: Vec<A>,

    /// Rewards received.
    pub reward_batch: Vec<R>,

    /// States after the actions.
    pub state_after_batch: Vec<S>,

    /// Auxiliary data of each transition.
    pub auxiliary_list: Vec<X>,

    /// Importance-sampling weights, all ones for uniform sampling.
    pub weights: Vec<f32>,

    /// Oldest-first positions of the sampled transitions at sampling time.
    pub ix_sample: Vec<usize>,
}

impl<S, A, R, X> ReplayBatch<S, A, R, X> {
    /// Creates an empty batch with room for `capacity` transitions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state_before_batch: Vec::with_capacity(capacity),
            action_batch: Vec::with_capacity(capacity),
            reward_batch: Vec::with_capacity(capacity),
            state_after_batch: Vec::with_capacity(capacity),
            auxiliary_list: Vec::with_capacity(capacity),
            weights: Vec::with_capacity(capacity),
            ix_sample: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if the batch holds no transitions.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Decomposes the batch into
    /// `(states_before, actions, rewards, states_after, auxiliary, weights)`.
    #[allow(clippy::type_complexity)]
    pub fn unpack(self) -> (Vec<S>, Vec<A>, Vec<R>, Vec<S>, Vec<X>, Vec<f32>) {
        (
            self.state_before_batch,
            self.action_batch,
            self.reward_batch,
            self.state_after_batch,
            self.auxiliary_list,
            self.weights,
        )
    }
}

impl<S, A, R, X> ReplayBatch<S, A, R, X>
where
    S: Clone,
    A: Clone,
    R: Clone,
    X: Clone,
{
    /// Copies a stored transition into the batch.
    pub(crate) fn push(&mut self, ix: usize, tr: &Transition<S, A, R, X>, weight: f32) {
        self.state_before_batch.push(tr.state_before.clone());
        self.action_batch.push(tr.action.clone());
        self.reward_batch.push(tr.reward.clone());
        self.state_after_batch.push(tr.state_after.clone());
        self.auxiliary_list.push(tr.auxiliary.clone());
        self.weights.push(weight);
        self.ix_sample.push(ix);
    }
}
