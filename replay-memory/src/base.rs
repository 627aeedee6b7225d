//! Core vocabulary shared by the replay memories.
mod batch;
mod memory;
mod priority_update;
mod transition;
pub use batch::ReplayBatch;
pub use memory::{ExperienceMemoryBase, ReplayMemoryBase, DEFAULT_BATCH_SIZE};
pub use priority_update::PriorityUpdate;
pub use transition::Transition;
