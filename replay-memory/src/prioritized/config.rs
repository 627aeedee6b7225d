//! Configuration of [`PrioritizedReplayMemory`](super::PrioritizedReplayMemory).
use crate::error::ReplayError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration for Prioritized Experience Replay (PER).
///
/// # Examples
///
/// ```rust
/// use replay_memory::prioritized::PerConfig;
///
/// let config = PerConfig::default()
///     .alpha(0.6)
///     .beta(0.4)
///     .epsilon(1e-4)
///     .beta_anneal_rate(0.9995);
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PerConfig {
    /// Exponent for prioritization. A value of 0 results in uniform sampling.
    pub alpha: f32,

    /// Initial strength of the importance-sampling correction.
    pub beta: f32,

    /// Added to `|error|` so that no transition gets zero probability.
    pub epsilon: f32,

    /// Anneal rate of `beta`, squared after every sampled batch.
    pub beta_anneal_rate: f32,
}

impl Default for PerConfig {
    fn default() -> Self {
        Self {
            alpha: 0.6,
            beta: 0.4,
            epsilon: 0.0001,
            beta_anneal_rate: 0.9995,
        }
    }
}

impl PerConfig {
    /// Sets the prioritization exponent `alpha`.
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the initial importance sampling exponent `beta`.
    pub fn beta(mut self, beta: f32) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the priority floor `epsilon`.
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the anneal rate of `beta`.
    pub fn beta_anneal_rate(mut self, beta_anneal_rate: f32) -> Self {
        self.beta_anneal_rate = beta_anneal_rate;
        self
    }

    /// Checks that the hyperparameters are in range.
    pub fn validate(&self) -> Result<(), ReplayError> {
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(invalid("alpha", self.alpha, "a finite value >= 0"));
        }
        if !(0.0..=1.0).contains(&self.beta) {
            return Err(invalid("beta", self.beta, "[0, 1]"));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(invalid("epsilon", self.epsilon, "a finite value > 0"));
        }
        if !(0.0..=1.0).contains(&self.beta_anneal_rate) {
            return Err(invalid("beta_anneal_rate", self.beta_anneal_rate, "[0, 1]"));
        }
        Ok(())
    }
}

fn invalid(name: &str, value: f32, range: &str) -> ReplayError {
    ReplayError::InvalidArgument(format!("{} = {} must be in {}", name, value, range))
}

/// Configuration of [`PrioritizedReplayMemory`](super::PrioritizedReplayMemory).
///
/// # Examples
///
/// ```rust
/// use replay_memory::prioritized::{PerConfig, PrioritizedReplayMemoryConfig};
///
/// let config = PrioritizedReplayMemoryConfig::default()
///     .capacity(10000)
///     .seed(42)
///     .per_config(PerConfig::default().alpha(0.6));
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PrioritizedReplayMemoryConfig {
    /// Maximum number of transitions. When full, new transitions replace the
    /// oldest ones.
    pub capacity: usize,

    /// Seed of the random number generator used for sampling.
    pub seed: u64,

    /// Prioritization hyperparameters.
    pub per_config: PerConfig,
}

impl Default for PrioritizedReplayMemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            seed: 42,
            per_config: PerConfig::default(),
        }
    }
}

impl PrioritizedReplayMemoryConfig {
    /// Sets the capacity of the memory.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the random seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the prioritization hyperparameters.
    pub fn per_config(mut self, per_config: PerConfig) -> Self {
        self.per_config = per_config;
        self
    }

    /// Checks the capacity and the prioritization hyperparameters.
    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.capacity == 0 {
            return Err(ReplayError::ZeroCapacity);
        }
        self.per_config.validate()
    }

    /// Loads the configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_prioritized_config() -> Result<()> {
        let config = PrioritizedReplayMemoryConfig::default()
            .capacity(500)
            .seed(7)
            .per_config(PerConfig::default().alpha(0.7).beta_anneal_rate(0.99));

        let dir = TempDir::new("prioritized_replay_memory_config")?;
        let path = dir.path().join("prioritized_replay_memory_config.yaml");
        config.save(&path)?;
        let config_ = PrioritizedReplayMemoryConfig::load(&path)?;
        assert_eq!(config, config_);

        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(PrioritizedReplayMemoryConfig::default().validate().is_ok());
        assert_eq!(
            PrioritizedReplayMemoryConfig::default().capacity(0).validate(),
            Err(ReplayError::ZeroCapacity)
        );

        let bad = [
            PerConfig::default().alpha(-0.1),
            PerConfig::default().alpha(f32::NAN),
            PerConfig::default().beta(1.5),
            PerConfig::default().epsilon(-1.0),
            PerConfig::default().epsilon(0.0),
            PerConfig::default().beta_anneal_rate(1.01),
        ];
        for per_config in bad.iter() {
            assert!(matches!(
                per_config.validate(),
                Err(ReplayError::InvalidArgument(_))
            ));
        }
    }
}
