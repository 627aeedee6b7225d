//! Tabular TD(0) value learning on a random-walk chain, fed from a replay memory.
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use replay_memory::{
    ExperienceMemoryBase, PrioritizedReplayMemory, PrioritizedReplayMemoryConfig,
    PriorityUpdate, ReplayBatch, ReplayMemoryBase, ReplayMemoryConfig, Transition,
    UniformReplayMemory, DEFAULT_BATCH_SIZE,
};

const N_STATES: usize = 7;
const DISCOUNT_FACTOR: f32 = 0.99;
const LR: f32 = 0.1;
const WARMUP_PERIOD: usize = 100;
const OPT_INTERVAL: usize = 4;
const EVAL_INTERVAL: usize = 5_000;

type Tr = Transition<usize, i8, f32, bool>;
type Batch = ReplayBatch<usize, i8, f32, bool>;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Policy {
    Uniform,
    Prioritized,
}

/// Learn state values of a random walk with experience replay
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Retrieval policy of the replay memory
    #[arg(long, value_enum, default_value_t = Policy::Prioritized)]
    policy: Policy,

    /// YAML file with the prioritized memory configuration
    #[arg(long)]
    config: Option<String>,

    /// Priority refresh variant, "direct" or "rank"
    #[arg(long, default_value = "direct")]
    variant: String,

    /// Number of environment steps
    #[arg(long, default_value_t = 50_000)]
    steps: usize,

    /// Batch size
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Random walk over `N_STATES` states; reward 1 on the right end.
struct Chain {
    state: usize,
    rng: StdRng,
}

impl Chain {
    fn new(seed: u64) -> Self {
        Self {
            state: N_STATES / 2,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn step(&mut self) -> Tr {
        let prev = self.state;
        let act: i8 = if self.rng.gen::<bool>() { 1 } else { -1 };
        let next = (prev as i64 + act as i64) as usize;
        let is_done = next == 0 || next == N_STATES - 1;
        let reward = if next == N_STATES - 1 { 1.0 } else { 0.0 };
        self.state = if is_done { N_STATES / 2 } else { next };
        Transition::new(prev, act, reward, next, is_done)
    }
}

/// Applies one importance-weighted TD(0) step and returns the TD errors.
fn learn(values: &mut [f32], batch: Batch) -> Vec<f32> {
    let (states, _, rewards, next_states, is_done, weights) = batch.unpack();
    let mut td_errs = Vec::with_capacity(states.len());
    for k in 0..states.len() {
        let (s, s_next) = (states[k], next_states[k]);
        let not_done = if is_done[k] { 0.0 } else { 1.0 };
        let target = rewards[k] + DISCOUNT_FACTOR * not_done * values[s_next];
        let td_err = target - values[s];
        values[s] += LR * weights[k] * td_err;
        td_errs.push(td_err);
    }
    td_errs
}

fn train<M>(memory: &mut M, args: &Args) -> Result<Vec<f32>>
where
    M: ExperienceMemoryBase<Item = Tr> + ReplayMemoryBase<Batch = Batch>,
{
    let variant = args.variant.parse::<PriorityUpdate>()?;
    let mut env = Chain::new(args.seed);
    let mut values = vec![0f32; N_STATES];

    for t in 1..=args.steps {
        memory.add(env.step())?;

        if t >= WARMUP_PERIOD && t % OPT_INTERVAL == 0 && memory.len() >= args.batch_size {
            let batch = memory.sample(args.batch_size)?;
            let td_errs = learn(&mut values, batch);
            memory.update(&td_errs, variant)?;
        }

        if t % EVAL_INTERVAL == 0 {
            info!("Step {}: values = {:.3?}", t, &values[1..N_STATES - 1]);
        }
    }

    Ok(values)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let values = match args.policy {
        Policy::Uniform => {
            let config = ReplayMemoryConfig::default().capacity(10_000).seed(args.seed);
            let mut memory = UniformReplayMemory::build(&config)?;
            train(&mut memory, &args)?
        }
        Policy::Prioritized => {
            let config = match &args.config {
                Some(path) => PrioritizedReplayMemoryConfig::load(path)?,
                None => PrioritizedReplayMemoryConfig::default()
                    .capacity(10_000)
                    .seed(args.seed),
            };
            let mut memory = PrioritizedReplayMemory::build(&config)?;
            train(&mut memory, &args)?
        }
    };

    info!("Final values = {:.3?}", &values[1..N_STATES - 1]);

    Ok(())
}
