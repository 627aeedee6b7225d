//! Scheduling the exponent of importance weight for PER.
use serde::{Deserialize, Serialize};

/// Scheduler of the exponent of importance weight for PER.
///
/// The effective exponent is $1 - (1 - \beta) \cdot r$, where the anneal
/// rate $r$ is squared after every sampled batch. It therefore moves from
/// roughly $\beta$ towards 1 without an external clock.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct BetaScheduler {
    /// Initial strength of the importance correction, $\beta$.
    pub beta: f32,

    /// Current anneal rate $r$.
    pub beta_anneal_rate: f32,
}

impl BetaScheduler {
    /// Creates a scheduler.
    pub fn new(beta: f32, beta_anneal_rate: f32) -> Self {
        Self {
            beta,
            beta_anneal_rate,
        }
    }

    /// Gets the exponent of importance sampling weight.
    pub fn annealed_beta(&self) -> f32 {
        1.0 - (1.0 - self.beta) * self.beta_anneal_rate
    }

    /// Advances the schedule by one sampled batch.
    pub fn step(&mut self) {
        self.beta_anneal_rate *= self.beta_anneal_rate;
    }
}
