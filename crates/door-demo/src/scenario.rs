//! The building-entry scenario: try the doors of a building one at a time
//! until one lets the character in.
//!
//! ```text
//! Sequence "Enter building"
//! ├── AssignContainer(doors ← building)
//! ├── Succeed
//! │   └── RepeatUntil(FAILURE)
//! │       └── Sequence
//! │           ├── PopFromContainer(current door)
//! │           └── Invert
//! │               └── Async
//! │                   └── Sequence "Try door"
//! │                       ├── Walk to door
//! │                       ├── Select [Open, Unlock, Smash]
//! │                       ├── Walk through door
//! │                       ├── Succeed(Close door)
//! │                       └── SetVariable(used door ← current door)
//! └── Invert(IsNull(used door))
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use behavior_tree::builder::{action, invert, repeat_until, select, succeed};
use behavior_tree::{
    AssignContainer, Async, AsyncConfig, BlockingContainer, BoundedContainer, ContainerConfig,
    Decorator, Discipline, IsNull, Node, NodeExt, PopFromContainer, Sequence, SetVariable, Slot,
    Status, Tree,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DemoConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Door {
    pub number: usize,
}

impl fmt::Display for Door {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "door #{}", self.number)
    }
}

/// Success chance of each door action, in percent.
#[derive(Clone, Copy, Debug)]
pub struct Odds {
    pub walk_to_door: u32,
    pub open: u32,
    pub unlock: u32,
    pub smash: u32,
    pub walk_through: u32,
    pub close: u32,
}

#[cfg(test)]
impl Odds {
    /// Every action succeeds with the same chance.
    pub const fn uniform(percent: u32) -> Self {
        Self {
            walk_to_door: percent,
            open: percent,
            unlock: percent,
            smash: percent,
            walk_through: percent,
            close: percent,
        }
    }
}

impl Default for Odds {
    fn default() -> Self {
        Self {
            walk_to_door: 99,
            open: 12,
            unlock: 25,
            smash: 60,
            walk_through: 85,
            close: 100,
        }
    }
}

/// Factory for door actions sharing one seeded random source.
#[derive(Clone)]
struct DoorActions {
    rng: Arc<Mutex<StdRng>>,
    delay: Duration,
    current: Slot<Door>,
}

impl DoorActions {
    fn attempt(&self, name: &'static str, percent: u32) -> Box<dyn Node> {
        let actions = self.clone();
        action(name, move || actions.roll(name, percent))
    }

    fn roll(&self, name: &str, percent: u32) -> Status {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let roll = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(0..100);
        let door = self.current.get().map(|door| door.number);

        if roll < percent {
            tracing::info!(door, "{name}: success");
            Status::Success
        } else {
            tracing::info!(door, "{name}: failure");
            Status::Failure
        }
    }
}

/// A ready-to-run building-entry tree and the blackboard it works on.
pub struct Scenario {
    tree: Tree,
    building: Arc<BlockingContainer<Door>>,
    used: Slot<Door>,
}

impl Scenario {
    pub fn new(config: &DemoConfig, odds: Odds) -> Result<Self> {
        let container = || {
            BlockingContainer::new(
                Discipline::Lifo,
                ContainerConfig {
                    capacity: Some(config.doors.max(1)),
                    ..ContainerConfig::default()
                },
            )
        };

        let building = Arc::new(container());
        for number in 1..=config.doors {
            building.push(Door { number })?;
        }
        let doors = Arc::new(container());
        let current = Slot::new();
        let used = Slot::new();

        let actions = DoorActions {
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(config.seed))),
            delay: config.action_delay,
            current: current.clone(),
        };

        let try_door = Sequence::new(vec![
            actions.attempt("Walk to door", odds.walk_to_door),
            select(vec![
                actions.attempt("Open door", odds.open),
                actions.attempt("Unlock door", odds.unlock),
                actions.attempt("Smash door", odds.smash),
            ]),
            actions.attempt("Walk through door", odds.walk_through),
            succeed(actions.attempt("Close door", odds.close)),
            SetVariable::new(used.clone(), current.clone())
                .named("Remember door")
                .boxed(),
        ])
        .named("Try door");

        let in_background = Async::with_config(AsyncConfig {
            poll_interval: config.poll_interval,
            thread_name: "door-worker".to_string(),
        })
        .with_child(try_door.boxed());

        let enter = Sequence::new(vec![
            AssignContainer::<Door, _>::new(Arc::clone(&doors), Arc::clone(&building)).boxed(),
            succeed(repeat_until(
                Status::Failure,
                Sequence::new(vec![
                    PopFromContainer::new(Arc::clone(&doors), current.clone())
                        .named("Next door")
                        .boxed(),
                    invert(in_background.boxed()),
                ])
                .boxed(),
            )),
            invert(IsNull::new(used.clone()).named("No door used").boxed()),
        ])
        .named("Enter building");

        Ok(Self {
            tree: Tree::with_root_child(enter.boxed()),
            building,
            used,
        })
    }

    pub fn run(&mut self) -> Status {
        self.tree.run()
    }

    /// The door the character entered through, once the tree succeeded.
    pub fn used_door(&self) -> Option<Door> {
        self.used.get()
    }

    /// Doors the building has; trying them never removes any.
    pub fn door_count(&self) -> usize {
        self.building.len()
    }
}
