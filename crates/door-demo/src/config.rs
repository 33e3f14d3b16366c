//! Demo configuration loaded from the environment.
use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct DemoConfig {
    /// Number of doors the building has.
    pub doors: usize,
    /// Seed of the random source shared by the door actions.
    pub seed: u64,
    /// How long each tick waits on the background door attempt.
    pub poll_interval: Duration,
    /// Artificial latency added to every door action.
    pub action_delay: Duration,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            doors: 5,
            seed: 42,
            poll_interval: Duration::from_millis(10),
            action_delay: Duration::ZERO,
        }
    }
}

impl DemoConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DEMO_DOORS` - Doors in the building (default: 5)
    /// - `DEMO_SEED` - Random seed for door actions (default: 42)
    /// - `DEMO_POLL_MS` - Background poll interval in milliseconds (default: 10)
    /// - `DEMO_ACTION_DELAY_MS` - Delay of each door action in milliseconds (default: 0)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(doors) = read_env::<usize>("DEMO_DOORS") {
            config.doors = doors;
        }
        if let Some(seed) = read_env::<u64>("DEMO_SEED") {
            config.seed = seed;
        }
        if let Some(millis) = read_env::<u64>("DEMO_POLL_MS") {
            config.poll_interval = Duration::from_millis(millis.max(1));
        }
        if let Some(millis) = read_env::<u64>("DEMO_ACTION_DELAY_MS") {
            config.action_delay = Duration::from_millis(millis);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
