use anyhow::Result;
use replay_memory::{
    prioritized::PerConfig, ExperienceMemoryBase, PrioritizedReplayMemory,
    PrioritizedReplayMemoryConfig, PriorityUpdate, ReplayBatch, ReplayError, ReplayMemoryBase,
    ReplayMemoryConfig, Transition, UniformReplayMemory, DEFAULT_BATCH_SIZE,
};
use std::collections::HashSet;

type Tr = Transition<Vec<f32>, i64, f32, usize>;
type Batch = ReplayBatch<Vec<f32>, i64, f32, usize>;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn transition(t: usize, reward: f32) -> Tr {
    Transition::new(vec![t as f32; 4], (t % 3) as i64, reward, vec![t as f32 + 1.0; 4], t)
}

fn prioritized(capacity: usize) -> PrioritizedReplayMemory<Vec<f32>, i64, f32, usize> {
    let config = PrioritizedReplayMemoryConfig::default()
        .capacity(capacity)
        .seed(42)
        .per_config(PerConfig::default());
    PrioritizedReplayMemory::build(&config).unwrap()
}

fn uniform(capacity: usize) -> UniformReplayMemory<Vec<f32>, i64, f32, usize> {
    let config = ReplayMemoryConfig::default().capacity(capacity).seed(42);
    UniformReplayMemory::build(&config).unwrap()
}

/// A training loop written once for both retrieval policies.
fn train<M>(memory: &mut M, steps: usize, batch_size: usize) -> Result<usize>
where
    M: ExperienceMemoryBase<Item = Tr> + ReplayMemoryBase<Batch = Batch>,
{
    let mut n_opts = 0;
    for t in 0..steps {
        memory.add(transition(t, (t % 7) as f32))?;

        if memory.len() >= batch_size {
            let batch = memory.sample(batch_size)?;
            assert_eq!(batch.len(), batch_size);
            assert_eq!(batch.ix_sample.len(), batch_size);

            let (states, _, rewards, next_states, _, weights) = batch.unpack();
            assert_eq!(states.len(), batch_size);
            assert_eq!(next_states.len(), batch_size);
            assert!(weights.iter().all(|&w| w > 0.0 && w <= 1.0));

            let errors = rewards
                .iter()
                .map(|r| r - 3.0)
                .collect::<Vec<_>>();
            memory.update(&errors, PriorityUpdate::Direct)?;
            n_opts += 1;
        }
    }
    Ok(n_opts)
}

#[test]
fn test_shared_training_loop() -> Result<()> {
    init_logger();
    assert_eq!(train(&mut uniform(50), 200, 16)?, 185);
    assert_eq!(train(&mut prioritized(50), 200, 16)?, 185);
    Ok(())
}

#[test]
fn test_capacity_and_fifo_eviction() -> Result<()> {
    init_logger();
    let mut per = prioritized(5);
    let mut uni = uniform(5);

    for t in 0..23 {
        per.add(transition(t, 0.0))?;
        uni.add(transition(t, 0.0))?;
        assert!(per.len() <= 5);
        assert!(uni.len() <= 5);

        let first = t.saturating_sub(4);
        let expected = (first..=t).collect::<Vec<_>>();
        assert_eq!(per.iter().map(|tr| tr.auxiliary).collect::<Vec<_>>(), expected);
        assert_eq!(uni.iter().map(|tr| tr.auxiliary).collect::<Vec<_>>(), expected);
    }
    Ok(())
}

#[test]
fn test_scenario_eviction_of_first_reward() -> Result<()> {
    init_logger();
    let mut memory = prioritized(4);
    for (t, r) in [1.0f32, 2.0, 3.0, 4.0].iter().enumerate() {
        memory.add(transition(t, *r))?;
    }
    assert_eq!(memory.len(), 4);

    memory.add(transition(4, 5.0))?;
    assert_eq!(memory.len(), 4);
    let rewards = memory.iter().map(|tr| tr.reward).collect::<Vec<_>>();
    assert_eq!(rewards, vec![2.0, 3.0, 4.0, 5.0]);
    Ok(())
}

#[test]
fn test_scenario_equal_priorities() -> Result<()> {
    init_logger();
    let mut memory = prioritized(1000);
    for t in 0..10 {
        memory.add(transition(t, 0.0))?;
    }
    assert!(memory.priorities().iter().all(|&p| p == 1.0));

    let batch = memory.sample(5)?;
    assert_eq!(batch.weights, vec![1.0; 5]);
    assert_eq!(batch.ix_sample.iter().collect::<HashSet<_>>().len(), 5);
    Ok(())
}

#[test]
fn test_scenario_bootstrap_from_update() -> Result<()> {
    init_logger();
    let mut memory = prioritized(10);
    memory.add(transition(0, 0.0))?;
    memory.sample(1)?;
    memory.update(&[10.0], PriorityUpdate::Direct)?;

    let expected = 10.0f32 + 0.0001;
    assert_eq!(memory.priorities(), vec![expected]);
    assert!((expected - 10.0001).abs() < 1e-5);

    memory.add(transition(1, 0.0))?;
    assert_eq!(memory.priorities(), vec![expected, expected]);
    Ok(())
}

#[test]
fn test_priority_proportional_frequencies() -> Result<()> {
    init_logger();
    let config = PrioritizedReplayMemoryConfig::default()
        .capacity(2)
        .seed(3)
        .per_config(PerConfig::default().alpha(1.0).epsilon(1e-6));
    let mut memory = PrioritizedReplayMemory::<Vec<f32>, i64, f32, usize>::build(&config)?;
    memory.add(transition(0, 0.0))?;
    memory.add(transition(1, 0.0))?;

    memory.sample(2)?;
    let errors = memory
        .last_sampled_indices()
        .unwrap()
        .iter()
        .map(|&ix| if ix == 0 { 1.0 } else { 3.0 })
        .collect::<Vec<_>>();
    memory.update(&errors, PriorityUpdate::Direct)?;

    let n = 4000;
    let mut hits = 0;
    for _ in 0..n {
        let batch = memory.sample(1)?;
        if batch.ix_sample[0] == 1 {
            hits += 1;
        }
    }
    let freq = hits as f32 / n as f32;
    assert!((freq - 0.75).abs() < 0.05, "freq = {}", freq);
    Ok(())
}

#[test]
fn test_uniform_frequencies() -> Result<()> {
    init_logger();
    let mut memory = uniform(4);
    for t in 0..4 {
        memory.add(transition(t, 0.0))?;
    }

    let n = 4000;
    let mut hits = [0usize; 4];
    for _ in 0..n {
        let batch = memory.sample(1)?;
        assert_eq!(batch.weights, vec![1.0]);
        hits[batch.ix_sample[0]] += 1;
    }
    for (ix, &h) in hits.iter().enumerate() {
        let freq = h as f32 / n as f32;
        assert!((freq - 0.25).abs() < 0.05, "ix = {}, freq = {}", ix, freq);
    }
    Ok(())
}

#[test]
fn test_default_batch_size() -> Result<()> {
    init_logger();
    assert_eq!(DEFAULT_BATCH_SIZE, 200);

    let mut memory = prioritized(300);
    for t in 0..DEFAULT_BATCH_SIZE - 1 {
        memory.add(transition(t, 0.0))?;
    }
    assert!(memory.sample(DEFAULT_BATCH_SIZE).is_err());

    memory.add(transition(DEFAULT_BATCH_SIZE, 0.0))?;
    assert_eq!(memory.sample(DEFAULT_BATCH_SIZE)?.len(), DEFAULT_BATCH_SIZE);
    Ok(())
}

#[test]
fn test_errors_are_typed() -> Result<()> {
    init_logger();
    let mut memory = uniform(3);
    let err = memory.sample(1).unwrap_err();
    assert_eq!(err.downcast_ref::<ReplayError>(), Some(&ReplayError::EmptyBuffer));

    let config = PrioritizedReplayMemoryConfig::default().capacity(0);
    let err = PrioritizedReplayMemory::<Vec<f32>, i64, f32, usize>::build(&config)
        .err()
        .unwrap();
    assert_eq!(err.downcast_ref::<ReplayError>(), Some(&ReplayError::ZeroCapacity));

    let variant = "unknown".parse::<PriorityUpdate>();
    assert!(matches!(variant, Err(ReplayError::InvalidArgument(_))));
    Ok(())
}
