//! Blackboard slots and the leaves that read and write them.
//!
//! The blackboard is owned by the caller. Leaves only hold shared handles to
//! it: [`Slot`]s for single values and `Arc`s of a [`BoundedContainer`] for
//! collections. The engine enforces nothing about their contents, and
//! mutating them from outside while a tree is ticking is the caller's
//! responsibility.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::container::BoundedContainer;
use crate::node::{Node, NodeState};
use crate::Status;

/// A shared, optionally empty blackboard variable.
///
/// Clones are handles to the same value.
pub struct Slot<T>(Arc<Mutex<Option<T>>>);

impl<T> Slot<T> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(None)))
    }

    pub fn with_value(value: T) -> Self {
        Self(Arc::new(Mutex::new(Some(value))))
    }

    pub fn set(&self, value: T) {
        *self.lock() = Some(value);
    }

    /// Stores `value` (possibly nothing) and returns the previous content.
    pub fn replace(&self, value: Option<T>) -> Option<T> {
        std::mem::replace(&mut *self.lock(), value)
    }

    pub fn take(&self) -> Option<T> {
        self.lock().take()
    }

    pub fn clear(&self) {
        self.lock().take();
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    /// Copies the current value out of the slot.
    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&*self.lock()).finish()
    }
}

/// Copies one slot into another. Always succeeds; copying an empty source
/// empties the target.
pub struct SetVariable<T> {
    state: NodeState,
    target: Slot<T>,
    source: Slot<T>,
}

impl<T> SetVariable<T> {
    pub fn new(target: Slot<T>, source: Slot<T>) -> Self {
        Self {
            state: NodeState::new("SetVariable"),
            target,
            source,
        }
    }
}

impl<T: Clone + Send> Node for SetVariable<T> {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        let value = self.source.get();
        tracing::debug!(node = self.state.name(), empty = value.is_none(), "set variable");
        self.target.replace(value);
        Status::Success
    }
}

/// `Success` if the slot holds nothing, `Failure` otherwise.
pub struct IsNull<T> {
    state: NodeState,
    slot: Slot<T>,
}

impl<T> IsNull<T> {
    pub fn new(slot: Slot<T>) -> Self {
        Self {
            state: NodeState::new("IsNull"),
            slot,
        }
    }
}

impl<T: Send> Node for IsNull<T> {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        if self.slot.is_empty() {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

/// Replaces the target container's contents with a copy of the source
/// container, optionally followed by one extra item.
///
/// `Error` if the copy does not fit in the target.
pub struct AssignContainer<T, C: ?Sized> {
    state: NodeState,
    target: Arc<C>,
    source: Arc<C>,
    extra: Option<T>,
}

impl<T, C> AssignContainer<T, C>
where
    C: BoundedContainer<T> + ?Sized,
{
    pub fn new(target: Arc<C>, source: Arc<C>) -> Self {
        Self {
            state: NodeState::new("AssignContainer"),
            target,
            source,
            extra: None,
        }
    }

    /// Appends `item` after the copied contents on every run.
    pub fn with_extra(mut self, item: T) -> Self {
        self.extra = Some(item);
        self
    }
}

impl<T, C> Node for AssignContainer<T, C>
where
    T: Clone + Send,
    C: BoundedContainer<T> + ?Sized,
{
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        let mut items = self.source.snapshot();
        items.extend(self.extra.iter().cloned());
        let len = items.len();

        match self.target.assign(items) {
            Ok(()) => {
                tracing::debug!(node = self.state.name(), len, "container assigned");
                Status::Success
            }
            Err(err) => {
                tracing::warn!(node = self.state.name(), error = %err, "container assign failed");
                Status::Error
            }
        }
    }
}

/// Pops the next item of a container into a slot.
///
/// `Failure` on an empty container, which is left untouched; this leaf never
/// blocks.
pub struct PopFromContainer<T, C: ?Sized> {
    state: NodeState,
    container: Arc<C>,
    item: Slot<T>,
}

impl<T, C> PopFromContainer<T, C>
where
    C: BoundedContainer<T> + ?Sized,
{
    pub fn new(container: Arc<C>, item: Slot<T>) -> Self {
        Self {
            state: NodeState::new("PopFromContainer"),
            container,
            item,
        }
    }
}

impl<T, C> Node for PopFromContainer<T, C>
where
    T: Send,
    C: BoundedContainer<T> + ?Sized,
{
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        match self.container.try_pop() {
            Some(item) => {
                self.item.set(item);
                tracing::debug!(
                    node = self.state.name(),
                    remaining = self.container.len(),
                    "popped item"
                );
                Status::Success
            }
            None => Status::Failure,
        }
    }
}

/// Pushes a copy of the value held in a slot.
///
/// `Error` if the slot is empty or the container stays full past its
/// timeout.
pub struct PushToContainer<T, C: ?Sized> {
    state: NodeState,
    container: Arc<C>,
    item: Slot<T>,
}

impl<T, C> PushToContainer<T, C>
where
    C: BoundedContainer<T> + ?Sized,
{
    pub fn new(container: Arc<C>, item: Slot<T>) -> Self {
        Self {
            state: NodeState::new("PushToContainer"),
            container,
            item,
        }
    }
}

impl<T, C> Node for PushToContainer<T, C>
where
    T: Clone + Send,
    C: BoundedContainer<T> + ?Sized,
{
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        let Some(item) = self.item.get() else {
            tracing::warn!(node = self.state.name(), "nothing to push, slot is empty");
            return Status::Error;
        };

        match self.container.push(item) {
            Ok(()) => Status::Success,
            Err(err) => {
                tracing::warn!(node = self.state.name(), error = %err, "push failed");
                Status::Error
            }
        }
    }
}

/// `Success` if the container is empty, `Failure` otherwise.
pub struct ContainerIsEmpty<T, C: ?Sized> {
    state: NodeState,
    container: Arc<C>,
    _item: PhantomData<fn() -> T>,
}

impl<T, C> ContainerIsEmpty<T, C>
where
    C: BoundedContainer<T> + ?Sized,
{
    pub fn new(container: Arc<C>) -> Self {
        Self {
            state: NodeState::new("ContainerIsEmpty"),
            container,
            _item: PhantomData,
        }
    }
}

impl<T, C> Node for ContainerIsEmpty<T, C>
where
    C: BoundedContainer<T> + ?Sized,
{
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        if self.container.is_empty() {
            Status::Success
        } else {
            Status::Failure
        }
    }
}
