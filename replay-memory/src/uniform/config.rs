//! Configuration of [`UniformReplayMemory`](super::UniformReplayMemory).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`UniformReplayMemory`](super::UniformReplayMemory).
///
/// ```rust
/// use replay_memory::ReplayMemoryConfig;
///
/// let config = ReplayMemoryConfig::default().capacity(50_000).seed(0);
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ReplayMemoryConfig {
    /// Maximum number of transitions. When full, new transitions replace the
    /// oldest ones.
    pub capacity: usize,

    /// Seed of the random number generator used for sampling.
    pub seed: u64,
}

impl Default for ReplayMemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            seed: 42,
        }
    }
}

impl ReplayMemoryConfig {
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
