//! Bounded, blocking containers shared between leaves and other threads.
//!
//! Memory leaves only rely on the [`BoundedContainer`] capability; whether
//! items come back last-in-first-out or first-in-first-out is a property of the
//! container the caller hands them. [`BlockingContainer`] is the reference
//! implementation of both disciplines.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::ContainerError;

/// A thread-safe container with an optional capacity.
///
/// Blocking operations wait while the container is full (`push`) or empty
/// (`pop`); containers configured with a timeout give up after it and return
/// an error instead.
pub trait BoundedContainer<T>: Send + Sync {
    fn push(&self, item: T) -> Result<(), ContainerError>;

    fn pop(&self) -> Result<T, ContainerError>;

    /// Removes the next item without ever blocking.
    fn try_pop(&self) -> Option<T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_full(&self) -> bool;

    /// `None` for an unbounded container.
    fn capacity(&self) -> Option<usize>;

    /// Copies the items in insertion order (oldest first).
    fn snapshot(&self) -> Vec<T>
    where
        T: Clone;

    /// Replaces the contents with `items`, given in insertion order.
    fn assign(&self, items: Vec<T>) -> Result<(), ContainerError>;
}

/// Which end of a [`BlockingContainer`] items are popped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Stack: the most recently pushed item comes out first.
    Lifo,
    /// Queue: items come out in the order they were pushed.
    Fifo,
}

#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Maximum number of items; `None` means unbounded.
    pub capacity: Option<usize>,
    /// How long blocking operations wait; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            capacity: Some(10),
            timeout: None,
        }
    }
}

/// Mutex-and-condvar container implementing both disciplines.
pub struct BlockingContainer<T> {
    items: Mutex<VecDeque<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    discipline: Discipline,
    config: ContainerConfig,
}

impl<T> BlockingContainer<T> {
    pub fn new(discipline: Discipline, config: ContainerConfig) -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            discipline,
            config,
        }
    }

    /// A bounded stack.
    pub fn lifo(capacity: usize) -> Self {
        Self::new(
            Discipline::Lifo,
            ContainerConfig {
                capacity: Some(capacity),
                ..ContainerConfig::default()
            },
        )
    }

    /// A bounded queue.
    pub fn fifo(capacity: usize) -> Self {
        Self::new(
            Discipline::Fifo,
            ContainerConfig {
                capacity: Some(capacity),
                ..ContainerConfig::default()
            },
        )
    }

    pub fn unbounded(discipline: Discipline) -> Self {
        Self::new(
            discipline,
            ContainerConfig {
                capacity: None,
                ..ContainerConfig::default()
            },
        )
    }

    /// Makes blocking operations give up after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    // The queue itself has no invariant a panicking holder could break.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn full(&self, items: &VecDeque<T>) -> bool {
        self.config
            .capacity
            .is_some_and(|capacity| items.len() >= capacity)
    }

    fn take(&self, items: &mut VecDeque<T>) -> Option<T> {
        match self.discipline {
            Discipline::Lifo => items.pop_back(),
            Discipline::Fifo => items.pop_front(),
        }
    }

    /// Waits on `signal` while `blocked` holds, up to the configured timeout.
    fn wait_while<'a>(
        &self,
        signal: &Condvar,
        guard: MutexGuard<'a, VecDeque<T>>,
        blocked: impl FnMut(&mut VecDeque<T>) -> bool,
    ) -> MutexGuard<'a, VecDeque<T>> {
        match self.config.timeout {
            None => signal
                .wait_while(guard, blocked)
                .unwrap_or_else(PoisonError::into_inner),
            Some(timeout) => {
                signal
                    .wait_timeout_while(guard, timeout, blocked)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
        }
    }
}

impl<T: Send> BoundedContainer<T> for BlockingContainer<T> {
    fn push(&self, item: T) -> Result<(), ContainerError> {
        let guard = self.lock();
        let mut items = self.wait_while(&self.not_full, guard, |items| self.full(items));
        if self.full(&items) {
            return Err(ContainerError::Full {
                capacity: self.config.capacity.unwrap_or_default(),
            });
        }
        items.push_back(item);
        drop(items);
        self.not_empty.notify_one();
        Ok(())
    }

    fn pop(&self) -> Result<T, ContainerError> {
        let guard = self.lock();
        let mut items = self.wait_while(&self.not_empty, guard, |items| items.is_empty());
        let item = self.take(&mut items).ok_or(ContainerError::Empty)?;
        drop(items);
        self.not_full.notify_one();
        Ok(item)
    }

    fn try_pop(&self) -> Option<T> {
        let item = self.take(&mut self.lock());
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn is_full(&self) -> bool {
        self.full(&self.lock())
    }

    fn capacity(&self) -> Option<usize> {
        self.config.capacity
    }

    fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.lock().iter().cloned().collect()
    }

    fn assign(&self, items: Vec<T>) -> Result<(), ContainerError> {
        if let Some(capacity) = self.config.capacity
            && items.len() > capacity
        {
            return Err(ContainerError::Overflow {
                len: items.len(),
                capacity,
            });
        }
        *self.lock() = items.into();
        self.not_empty.notify_all();
        self.not_full.notify_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    use super::*;

    #[test]
    fn lifo_pops_most_recent_first() {
        let stack = BlockingContainer::lifo(5);
        for item in 1..=5 {
            stack.push(item).unwrap();
        }

        assert!(stack.is_full());
        let popped: Vec<_> = (0..5).map(|_| stack.pop().unwrap()).collect();
        assert_eq!(popped, [5, 4, 3, 2, 1]);
        assert!(stack.is_empty());
    }

    #[test]
    fn fifo_pops_oldest_first() {
        let queue = BlockingContainer::fifo(3);
        for item in ["a", "b", "c"] {
            queue.push(item).unwrap();
        }

        assert_eq!(queue.pop(), Ok("a"));
        assert_eq!(queue.try_pop(), Some("b"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn try_pop_on_empty_does_not_block() {
        let stack = BlockingContainer::<u8>::lifo(2);
        assert_eq!(stack.try_pop(), None);
    }

    #[test]
    fn pop_times_out_on_empty() {
        let stack = BlockingContainer::<u8>::lifo(2).with_timeout(Duration::from_millis(20));
        let started = Instant::now();

        assert_eq!(stack.pop(), Err(ContainerError::Empty));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn push_times_out_when_full() {
        let queue = BlockingContainer::fifo(1).with_timeout(Duration::from_millis(20));
        queue.push(1).unwrap();

        assert_eq!(queue.push(2), Err(ContainerError::Full { capacity: 1 }));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn blocked_pop_wakes_up_on_push() {
        let queue = Arc::new(BlockingContainer::fifo(1));
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop())
        };

        thread::sleep(Duration::from_millis(20));
        queue.push(7).unwrap();
        assert_eq!(consumer.join().unwrap(), Ok(7));
    }

    #[test]
    fn blocked_push_wakes_up_on_pop() {
        let stack = Arc::new(BlockingContainer::lifo(1));
        stack.push(1).unwrap();
        let producer = {
            let stack = Arc::clone(&stack);
            thread::spawn(move || stack.push(2))
        };

        thread::sleep(Duration::from_millis(20));
        assert_eq!(stack.pop(), Ok(1));
        assert_eq!(producer.join().unwrap(), Ok(()));
        assert_eq!(stack.pop(), Ok(2));
    }

    #[test]
    fn snapshot_and_assign_preserve_order() {
        let source = BlockingContainer::lifo(4);
        for item in 1..=3 {
            source.push(item).unwrap();
        }
        let target = BlockingContainer::lifo(4);
        target.push(99).unwrap();

        target.assign(source.snapshot()).unwrap();

        assert_eq!(target.snapshot(), [1, 2, 3]);
        assert_eq!(target.pop(), Ok(3));
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn assign_rejects_overflow() {
        let target = BlockingContainer::fifo(2);
        assert_eq!(
            target.assign(vec![1, 2, 3]),
            Err(ContainerError::Overflow {
                len: 3,
                capacity: 2
            })
        );
        assert!(target.is_empty());
    }

    #[test]
    fn unbounded_is_never_full() {
        let stack = BlockingContainer::unbounded(Discipline::Lifo);
        for item in 0..100 {
            stack.push(item).unwrap();
        }
        assert!(!stack.is_full());
        assert_eq!(stack.capacity(), None);
    }
}
