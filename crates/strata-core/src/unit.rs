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

//! The unit (sequential actor) contract.
//!
//! A unit registers one handler per [`EventId`] at construction time, acquires
//! its resources in [`Unit::on_create`] and releases them in
//! [`Unit::on_destroy`]. Both lifecycle hooks are delivered as ordinary
//! messages on the unit's own queue, so they happen-before and happen-after
//! every other message the unit processes.

use crate::event::{EventId, Message, RouteError, Router};
use crate::renderer::RenderDevice;
use std::collections::HashMap;
use std::fmt;

/// Outcome of a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The message was consumed, even if its effect could not be completed.
    Yes,
    /// No handler exists for the message.
    No,
}

/// Lifecycle state of a unit hosted by an executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitState {
    /// Constructed, `Create` not processed yet. Only `Create` is accepted.
    #[default]
    Uncreated,
    /// Processing messages.
    Running,
    /// `Destroy` has been processed. Nothing else is delivered.
    Destroyed,
}

/// A handler bound to a concrete unit type.
pub type EventHandler<U> = fn(&mut U, &Message, &mut UnitContext<'_>) -> Handled;

/// The per-unit mapping from [`EventId`] to handler.
pub struct EventHandlers<U> {
    handlers: HashMap<EventId, EventHandler<U>>,
}

impl<U> EventHandlers<U> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers `handler` for `id`. A second registration for the same id
    /// silently replaces the first. Lifecycle ids are handled by
    /// [`Unit::on_create`]/[`Unit::on_destroy`] and are ignored here.
    pub fn register(&mut self, id: EventId, handler: EventHandler<U>) {
        if id.is_lifecycle() {
            log::warn!("Lifecycle event {id} cannot be registered as a handler.");
            return;
        }
        self.handlers.insert(id, handler);
    }

    /// Returns the handler registered for `id`.
    pub fn get(&self, id: EventId) -> Option<EventHandler<U>> {
        self.handlers.get(&id).copied()
    }

    /// Returns the registered event ids, sorted.
    pub fn events(&self) -> Vec<EventId> {
        let mut ids: Vec<EventId> = self.handlers.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl<U> Default for EventHandlers<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> fmt::Debug for EventHandlers<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.events()).finish()
    }
}

/// What a handler can reach while it runs: the router for posting and the
/// render device of the thread it runs on.
pub struct UnitContext<'a> {
    alias: &'a str,
    router: &'a Router,
    device: &'a dyn RenderDevice,
}

impl<'a> UnitContext<'a> {
    /// Creates a context for the unit registered as `alias`.
    pub fn new(alias: &'a str, router: &'a Router, device: &'a dyn RenderDevice) -> Self {
        Self {
            alias,
            router,
            device,
        }
    }

    /// Alias of the unit currently running.
    pub fn alias(&self) -> &str {
        self.alias
    }

    /// The render device bound to the current thread.
    pub fn device(&self) -> &'a dyn RenderDevice {
        self.device
    }

    /// The router, for units that need to hand it to a collaborator.
    pub fn router(&self) -> &'a Router {
        self.router
    }

    /// Sends `message` to the unit registered as `to`. Failures are logged.
    pub fn post_message(&self, to: &str, message: Message) -> Result<(), RouteError> {
        let what = message.what();
        self.router.post_message(to, message).inspect_err(|e| {
            log::warn!("{}: {what} not delivered: {e}", self.alias);
        })
    }

    /// Broadcasts `message` to every subscriber of its event id.
    pub fn post_event(&self, message: Message) -> usize {
        self.router.post_event(message)
    }
}

/// An addressable actor driven by messages.
///
/// Implementations dispatch through their [`EventHandlers`]:
///
/// ```rust,ignore
/// fn on_event(&mut self, msg: &Message, ctx: &mut UnitContext<'_>) -> Handled {
///     match self.handlers.get(msg.what()) {
///         Some(handler) => handler(self, msg, ctx),
///         None => Handled::No,
///     }
/// }
/// ```
pub trait Unit: Send + 'static {
    /// The unique alias under which the unit is addressed.
    fn alias(&self) -> &str;

    /// The event ids this unit handles, used for broadcast subscription.
    fn subscriptions(&self) -> Vec<EventId>;

    /// Acquires resources. Runs before any other message.
    fn on_create(&mut self, ctx: &mut UnitContext<'_>) -> Handled;

    /// Releases resources. Must tolerate a partially failed `on_create`.
    fn on_destroy(&mut self, ctx: &mut UnitContext<'_>) -> Handled;

    /// Handles a non-lifecycle message.
    fn on_event(&mut self, msg: &Message, ctx: &mut UnitContext<'_>) -> Handled;
}
