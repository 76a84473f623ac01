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

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use flume::{Receiver, RecvTimeoutError};
use strata_core::event::{Envelope, EventId, Mailbox, Message, QueueMode, Router};
use strata_core::renderer::RenderDevice;
use strata_core::unit::{Handled, Unit, UnitContext, UnitState};

use crate::LooperConfig;

/// Errors returned by a [`Looper`].
#[derive(Debug, thiserror::Error)]
pub enum LooperError {
    /// A unit with this alias is already registered on the router.
    #[error("a unit named '{0}' is already registered")]
    AliasTaken(String),
}

struct HostedUnit {
    alias: Arc<str>,
    unit: Box<dyn Unit>,
    state: UnitState,
}

/// A sequential executor for a group of units sharing one render device.
///
/// Messages are taken from a single inbox and dispatched one at a time, so
/// no two handlers of the hosted units ever run concurrently. Messages with
/// [`QueueMode::InsertFirst`] jump ahead of everything already pending.
pub struct Looper {
    config: LooperConfig,
    router: Router,
    device: Arc<dyn RenderDevice>,
    mailbox: Mailbox,
    inbox: Receiver<Envelope>,
    pending: VecDeque<Envelope>,
    units: HashMap<Arc<str>, HostedUnit>,
}

impl Looper {
    /// Creates a looper bound to `device`, posting through `router`.
    pub fn new(config: LooperConfig, router: Router, device: Arc<dyn RenderDevice>) -> Self {
        let (mailbox, inbox) = flume::unbounded();
        Self {
            config,
            router,
            device,
            mailbox,
            inbox,
            pending: VecDeque::new(),
            units: HashMap::new(),
        }
    }

    /// Hosts `unit` on this looper.
    ///
    /// The unit is registered on the router with its subscriptions and its
    /// `Create` lifecycle message is queued; no other message reaches it
    /// before `Create` has been processed.
    pub fn attach(&mut self, unit: impl Unit) -> Result<(), LooperError> {
        self.attach_boxed(Box::new(unit))
    }

    /// Same as [`Looper::attach`] for an already boxed unit.
    pub fn attach_boxed(&mut self, unit: Box<dyn Unit>) -> Result<(), LooperError> {
        let alias: Arc<str> = Arc::from(unit.alias());
        if self.units.contains_key(&alias) || self.router.is_registered(&alias) {
            return Err(LooperError::AliasTaken(alias.to_string()));
        }
        self.pending.push_back(Envelope {
            to: Arc::clone(&alias),
            message: Message::new(EventId::Create),
        });
        self.router
            .register(&alias, self.mailbox.clone(), unit.subscriptions());
        log::debug!("Looper '{}': attached unit '{alias}'.", self.config.name);
        self.units.insert(
            Arc::clone(&alias),
            HostedUnit {
                alias,
                unit,
                state: UnitState::Uncreated,
            },
        );
        Ok(())
    }

    /// The router this looper posts through.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The configuration of this looper.
    pub fn config(&self) -> &LooperConfig {
        &self.config
    }

    /// The lifecycle state of a hosted unit.
    pub fn unit_state(&self, alias: &str) -> Option<UnitState> {
        self.units.get(alias).map(|hosted| hosted.state)
    }

    /// Returns `true` if no message is waiting.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.inbox.is_empty()
    }

    /// Dispatches messages until none is left. Returns how many were dispatched.
    ///
    /// Messages posted by handlers to units of this looper are processed in
    /// the same call.
    pub fn pump(&mut self) -> usize {
        let mut dispatched = 0;
        loop {
            self.drain_inbox();
            let Some(envelope) = self.pending.pop_front() else {
                break;
            };
            if self.dispatch(envelope) {
                dispatched += 1;
            }
        }
        dispatched
    }

    /// Runs until `running` is cleared, then shuts the hosted units down.
    pub fn run(&mut self, running: &AtomicBool) {
        log::info!("Looper '{}' started.", self.config.name);
        let idle_timeout = self.config.idle_timeout();
        while running.load(Ordering::Relaxed) {
            self.pump();
            match self.inbox.recv_timeout(idle_timeout) {
                Ok(envelope) => self.enqueue(envelope),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.shutdown();
        log::info!("Looper '{}' stopped.", self.config.name);
    }

    /// Delivers `Destroy` to every hosted unit ahead of any pending work,
    /// processes it, and removes the units from the router.
    ///
    /// Messages still queued for a destroyed unit are discarded.
    pub fn shutdown(&mut self) {
        let aliases: Vec<Arc<str>> = self
            .units
            .values()
            .filter(|hosted| hosted.state != UnitState::Destroyed)
            .map(|hosted| Arc::clone(&hosted.alias))
            .collect();
        for alias in aliases {
            self.router.unregister(&alias);
            self.pending.push_front(Envelope {
                to: alias,
                message: Message::new(EventId::Destroy).insert_first(),
            });
        }
        self.pump();
    }

    fn drain_inbox(&mut self) {
        while let Ok(envelope) = self.inbox.try_recv() {
            self.enqueue(envelope);
        }
    }

    fn enqueue(&mut self, envelope: Envelope) {
        match envelope.message.queue_mode() {
            QueueMode::Normal => self.pending.push_back(envelope),
            QueueMode::InsertFirst => self.pending.push_front(envelope),
        }
    }

    fn dispatch(&mut self, envelope: Envelope) -> bool {
        let Envelope { to, message } = envelope;
        let what = message.what();
        let Some(hosted) = self.units.get_mut(&to) else {
            log::warn!(
                "Looper '{}': no unit '{to}' for {what}, dropped.",
                self.config.name
            );
            return false;
        };
        let mut ctx = UnitContext::new(&hosted.alias, &self.router, self.device.as_ref());

        match (what, hosted.state) {
            (EventId::Create, UnitState::Uncreated) => {
                log::debug!("Unit '{to}': on_create.");
                hosted.unit.on_create(&mut ctx);
                hosted.state = UnitState::Running;
            }
            (EventId::Destroy, UnitState::Running) => {
                log::debug!("Unit '{to}': on_destroy.");
                hosted.unit.on_destroy(&mut ctx);
                hosted.state = UnitState::Destroyed;
            }
            (EventId::Destroy, UnitState::Uncreated) => {
                log::debug!("Unit '{to}': destroyed before creation.");
                hosted.state = UnitState::Destroyed;
            }
            (_, UnitState::Destroyed) => {
                log::trace!("Unit '{to}' destroyed, {what} discarded.");
                return false;
            }
            (_, UnitState::Uncreated) => {
                log::warn!("Unit '{to}' not created yet, {what} discarded.");
                return false;
            }
            (EventId::Create, UnitState::Running) => {
                log::warn!("Unit '{to}' already created, duplicate Create ignored.");
                return false;
            }
            (_, UnitState::Running) => {
                if hosted.unit.on_event(&message, &mut ctx) == Handled::No {
                    log::debug!("Unit '{to}' has no handler for {what}, dropped.");
                }
            }
        }
        true
    }
}

impl std::fmt::Debug for Looper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Looper")
            .field("name", &self.config.name)
            .field("units", &self.units.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}
