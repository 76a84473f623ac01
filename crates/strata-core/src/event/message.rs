// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::EventId;
use crate::renderer::RenderDevice;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// How a message is placed into the receiving unit's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueueMode {
    /// Appended to the back of the queue (FIFO).
    #[default]
    Normal,
    /// Pushed to the front of the queue, preempting everything already queued.
    InsertFirst,
}

/// The optional object carried by a [`Message`].
pub enum Payload {
    /// No payload.
    None,
    /// Owned by the message and dropped together with it.
    Owned(Box<dyn Any + Send + Sync>),
    /// Shared with the producer; its lifetime is managed elsewhere.
    Borrowed(Arc<dyn Any + Send + Sync>),
}

impl Payload {
    /// Returns a typed reference to the payload, regardless of ownership.
    pub fn get<T: Any>(&self) -> Option<&T> {
        match self {
            Payload::None => None,
            Payload::Owned(obj) => obj.downcast_ref::<T>(),
            Payload::Borrowed(obj) => obj.downcast_ref::<T>(),
        }
    }

    /// Returns `true` if there is no payload.
    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }

    /// Returns `true` if the payload is owned by the message.
    pub fn is_owned(&self) -> bool {
        matches!(self, Payload::Owned(_))
    }

    fn into_shared(self) -> Self {
        match self {
            Payload::Owned(obj) => Payload::Borrowed(Arc::from(obj)),
            other => other,
        }
    }

    fn try_clone(&self) -> Option<Self> {
        match self {
            Payload::None => Some(Payload::None),
            Payload::Owned(_) => None,
            Payload::Borrowed(obj) => Some(Payload::Borrowed(Arc::clone(obj))),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::None => f.write_str("None"),
            Payload::Owned(_) => f.write_str("Owned(..)"),
            Payload::Borrowed(_) => f.write_str("Borrowed(..)"),
        }
    }
}

/// Work that must run on the thread owning the rendering context.
///
/// The task runs at most once; later calls to [`RenderTask::run`] do nothing.
pub struct RenderTask {
    task: Mutex<Option<Box<dyn FnOnce(&dyn RenderDevice) + Send>>>,
}

impl RenderTask {
    /// Wraps a closure as a render-thread task.
    pub fn new(task: impl FnOnce(&dyn RenderDevice) + Send + 'static) -> Self {
        Self {
            task: Mutex::new(Some(Box::new(task))),
        }
    }

    /// Runs the task against `device`. Returns `false` if it already ran.
    pub fn run(&self, device: &dyn RenderDevice) -> bool {
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match task {
            Some(task) => {
                task(device);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for RenderTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTask").finish_non_exhaustive()
    }
}

/// A typed envelope exchanged between units.
///
/// A message is built once with the `with_*` methods and is read-only
/// afterwards. It is delivered to exactly one handler; broadcasts produce one
/// envelope per subscriber.
#[derive(Debug)]
pub struct Message {
    what: EventId,
    arg1: i32,
    arg2: i64,
    payload: Payload,
    desc: Option<Cow<'static, str>>,
    queue_mode: QueueMode,
}

impl Message {
    /// Creates an empty message for `what`.
    pub fn new(what: EventId) -> Self {
        Self {
            what,
            arg1: 0,
            arg2: 0,
            payload: Payload::None,
            desc: None,
            queue_mode: QueueMode::Normal,
        }
    }

    /// Sets the first scalar argument.
    pub fn with_arg1(mut self, arg1: i32) -> Self {
        self.arg1 = arg1;
        self
    }

    /// Sets the second scalar argument (often a timestamp in nanoseconds).
    pub fn with_arg2(mut self, arg2: i64) -> Self {
        self.arg2 = arg2;
        self
    }

    /// Attaches a payload owned by the message.
    pub fn with_owned<T: Any + Send + Sync>(mut self, obj: T) -> Self {
        self.payload = Payload::Owned(Box::new(obj));
        self
    }

    /// Attaches a payload whose lifetime is managed by the caller.
    pub fn with_borrowed<T: Any + Send + Sync>(mut self, obj: Arc<T>) -> Self {
        self.payload = Payload::Borrowed(obj);
        self
    }

    /// Sets a human readable description.
    pub fn with_desc(mut self, desc: impl Into<Cow<'static, str>>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Sets the queue mode.
    pub fn with_queue_mode(mut self, queue_mode: QueueMode) -> Self {
        self.queue_mode = queue_mode;
        self
    }

    /// Shortcut for `with_queue_mode(QueueMode::InsertFirst)`.
    pub fn insert_first(self) -> Self {
        self.with_queue_mode(QueueMode::InsertFirst)
    }

    /// The event identifier.
    pub fn what(&self) -> EventId {
        self.what
    }

    /// The first scalar argument.
    pub fn arg1(&self) -> i32 {
        self.arg1
    }

    /// The second scalar argument.
    pub fn arg2(&self) -> i64 {
        self.arg2
    }

    /// The raw payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns a typed reference to the payload, if it has type `T`.
    pub fn obj<T: Any>(&self) -> Option<&T> {
        self.payload.get::<T>()
    }

    /// The description, if any.
    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    /// The queue mode.
    pub fn queue_mode(&self) -> QueueMode {
        self.queue_mode
    }

    /// Converts an owned payload into a shared one so the message can be duplicated.
    pub fn into_shared(mut self) -> Self {
        self.payload = self.payload.into_shared();
        self
    }

    /// Duplicates the envelope. Returns `None` while the payload is still owned.
    pub fn try_clone(&self) -> Option<Self> {
        Some(Self {
            what: self.what,
            arg1: self.arg1,
            arg2: self.arg2,
            payload: self.payload.try_clone()?,
            desc: self.desc.clone(),
            queue_mode: self.queue_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Size;

    #[test]
    fn builder_sets_all_fields() {
        let msg = Message::new(EventId::Timestamp)
            .with_arg1(7)
            .with_arg2(1_000_000)
            .with_desc("ts")
            .insert_first();

        assert_eq!(msg.what(), EventId::Timestamp);
        assert_eq!(msg.arg1(), 7);
        assert_eq!(msg.arg2(), 1_000_000);
        assert_eq!(msg.desc(), Some("ts"));
        assert_eq!(msg.queue_mode(), QueueMode::InsertFirst);
        assert!(msg.payload().is_none());
    }

    #[test]
    fn typed_payload_access() {
        let msg = Message::new(EventId::CameraUpdateSize).with_owned(Size::new(640, 480));
        assert_eq!(msg.obj::<Size>(), Some(&Size::new(640, 480)));
        assert!(msg.obj::<String>().is_none());
    }

    #[test]
    fn owned_payload_cannot_be_cloned_until_shared() {
        let msg = Message::new(EventId::VideoOutputSize).with_owned(Size::new(1, 2));
        assert!(msg.try_clone().is_none());

        let shared = msg.into_shared();
        let copy = shared.try_clone().expect("shared payload must clone");
        assert_eq!(copy.obj::<Size>(), Some(&Size::new(1, 2)));
        assert!(!copy.payload().is_owned());
    }

    #[test]
    fn borrowed_payload_keeps_producer_ownership() {
        let size = Arc::new(Size::new(3, 4));
        let msg = Message::new(EventId::VideoOutputSize).with_borrowed(Arc::clone(&size));
        assert_eq!(Arc::strong_count(&size), 2);
        drop(msg);
        assert_eq!(Arc::strong_count(&size), 1);
    }
}
