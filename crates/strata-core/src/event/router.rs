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

use super::{EventId, Message};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A message addressed to one unit, as it travels through a [`Mailbox`].
#[derive(Debug)]
pub struct Envelope {
    /// Alias of the receiving unit.
    pub to: Arc<str>,
    /// The message itself.
    pub message: Message,
}

/// The sending end of the queue feeding the executor that hosts a unit.
pub type Mailbox = flume::Sender<Envelope>;

/// Errors returned when a message cannot be routed.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// No unit is registered under this alias.
    #[error("no unit registered under alias '{0}'")]
    UnknownUnit(String),
    /// The executor hosting the unit has stopped.
    #[error("mailbox of unit '{0}' is disconnected")]
    Disconnected(String),
}

#[derive(Default)]
struct RouteTable {
    mailboxes: HashMap<Arc<str>, Mailbox>,
    subscribers: HashMap<EventId, Vec<Arc<str>>>,
    taps: Vec<flume::Sender<Message>>,
}

/// Delivers messages to unit mailboxes.
///
/// The router is a cheap, cloneable handle over a shared routing table. It
/// supports point-to-point delivery by alias and publish/subscribe delivery by
/// [`EventId`]. Observers that are not units (a presentation layer, a test)
/// can [`tap`](Router::tap) every broadcast.
#[derive(Clone, Default)]
pub struct Router {
    table: Arc<RwLock<RouteTable>>,
}

impl Router {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a unit's mailbox and the event ids it subscribes to.
    ///
    /// Registering an alias twice replaces the previous mailbox and subscriptions.
    pub fn register(
        &self,
        alias: &str,
        mailbox: Mailbox,
        subscriptions: impl IntoIterator<Item = EventId>,
    ) {
        let alias: Arc<str> = Arc::from(alias);
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        Self::remove_subscriptions(&mut table, &alias);
        for id in subscriptions {
            if id.is_lifecycle() {
                continue;
            }
            let subs = table.subscribers.entry(id).or_default();
            if !subs.contains(&alias) {
                subs.push(Arc::clone(&alias));
            }
        }
        table.mailboxes.insert(Arc::clone(&alias), mailbox);
        log::debug!("Router: registered unit '{alias}'.");
    }

    /// Removes a unit from the routing table.
    pub fn unregister(&self, alias: &str) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        Self::remove_subscriptions(&mut table, alias);
        if table.mailboxes.remove(alias).is_some() {
            log::debug!("Router: unregistered unit '{alias}'.");
        }
    }

    /// Returns `true` if a unit is registered under `alias`.
    pub fn is_registered(&self, alias: &str) -> bool {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .mailboxes
            .contains_key(alias)
    }

    /// Enqueues `message` onto the queue of the unit registered as `to`.
    ///
    /// Never blocks.
    pub fn post_message(&self, to: &str, message: Message) -> Result<(), RouteError> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        let (alias, mailbox) = table
            .mailboxes
            .get_key_value(to)
            .ok_or_else(|| RouteError::UnknownUnit(to.to_string()))?;
        mailbox
            .send(Envelope {
                to: Arc::clone(alias),
                message,
            })
            .map_err(|_| RouteError::Disconnected(to.to_string()))
    }

    /// Broadcasts `message` to every unit subscribed to its event id and to every tap.
    ///
    /// An owned payload is promoted to a shared one so each receiver gets its
    /// own envelope. Returns the number of units the message was delivered to.
    pub fn post_event(&self, message: Message) -> usize {
        let what = message.what();
        if what.is_lifecycle() {
            log::warn!("Router: lifecycle event {what} cannot be broadcast, dropped.");
            return 0;
        }
        let message = message.into_shared();
        let mut delivered = 0;
        let mut dead_taps = false;
        {
            let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(subs) = table.subscribers.get(&what) {
                for alias in subs {
                    let (Some(mailbox), Some(copy)) =
                        (table.mailboxes.get(alias), message.try_clone())
                    else {
                        continue;
                    };
                    let envelope = Envelope {
                        to: Arc::clone(alias),
                        message: copy,
                    };
                    if mailbox.send(envelope).is_ok() {
                        delivered += 1;
                    } else {
                        log::warn!("Router: mailbox of '{alias}' disconnected, {what} dropped.");
                    }
                }
            }
            for tap in &table.taps {
                if let Some(copy) = message.try_clone() {
                    dead_taps |= tap.send(copy).is_err();
                }
            }
        }
        if dead_taps {
            self.table
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .taps
                .retain(|tap| !tap.is_disconnected());
        }
        if delivered == 0 {
            log::trace!("Router: no unit subscribed to {what}.");
        }
        delivered
    }

    /// Returns a receiver observing every broadcast event from now on.
    pub fn tap(&self) -> flume::Receiver<Message> {
        let (tx, rx) = flume::unbounded();
        self.table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .taps
            .push(tx);
        rx
    }

    fn remove_subscriptions(table: &mut RouteTable, alias: &str) {
        for subs in table.subscribers.values_mut() {
            subs.retain(|a| &**a != alias);
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Router")
            .field("units", &table.mailboxes.len())
            .field("taps", &table.taps.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Size;
    use flume::TryRecvError;

    #[test]
    fn post_message_reaches_only_the_target() {
        let router = Router::new();
        let (tx_a, rx_a) = flume::unbounded();
        let (tx_b, rx_b) = flume::unbounded();
        router.register("a", tx_a, []);
        router.register("b", tx_b, []);

        router
            .post_message("a", Message::new(EventId::UpdateLayer))
            .expect("target is registered");

        let envelope = rx_a.try_recv().expect("a should receive");
        assert_eq!(&*envelope.to, "a");
        assert_eq!(envelope.message.what(), EventId::UpdateLayer);
        assert_eq!(rx_b.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[test]
    fn post_message_to_unknown_unit_fails() {
        let router = Router::new();
        let err = router
            .post_message("ghost", Message::new(EventId::Redo))
            .unwrap_err();
        assert!(matches!(err, RouteError::UnknownUnit(alias) if alias == "ghost"));
    }

    #[test]
    fn post_message_to_dropped_mailbox_fails() {
        let router = Router::new();
        let (tx, rx) = flume::unbounded();
        router.register("a", tx, []);
        drop(rx);
        let err = router
            .post_message("a", Message::new(EventId::Redo))
            .unwrap_err();
        assert!(matches!(err, RouteError::Disconnected(_)));
    }

    #[test]
    fn post_event_fans_out_to_subscribers_and_taps() {
        let router = Router::new();
        let (tx_a, rx_a) = flume::unbounded();
        let (tx_b, rx_b) = flume::unbounded();
        let (tx_c, rx_c) = flume::unbounded();
        router.register("a", tx_a, [EventId::VideoOutputSize]);
        router.register("b", tx_b, [EventId::VideoOutputSize, EventId::Timestamp]);
        router.register("c", tx_c, [EventId::Timestamp]);
        let tap = router.tap();

        let delivered = router.post_event(
            Message::new(EventId::VideoOutputSize).with_owned(Size::new(1280, 720)),
        );
        assert_eq!(delivered, 2);

        for rx in [&rx_a, &rx_b] {
            let envelope = rx.try_recv().expect("subscriber should receive");
            assert_eq!(envelope.message.obj::<Size>(), Some(&Size::new(1280, 720)));
            assert!(rx.try_recv().is_err(), "delivered exactly once");
        }
        assert!(rx_c.try_recv().is_err());
        assert_eq!(tap.try_recv().unwrap().what(), EventId::VideoOutputSize);
    }

    #[test]
    fn lifecycle_events_are_not_broadcast() {
        let router = Router::new();
        let (tx, rx) = flume::unbounded();
        router.register("a", tx, [EventId::Create, EventId::Destroy]);
        assert_eq!(router.post_event(Message::new(EventId::Destroy)), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn re_register_replaces_subscriptions() {
        let router = Router::new();
        let (tx, rx) = flume::unbounded();
        router.register("a", tx.clone(), [EventId::Timestamp]);
        router.register("a", tx, [EventId::Redo]);

        assert_eq!(router.post_event(Message::new(EventId::Timestamp)), 0);
        assert_eq!(router.post_event(Message::new(EventId::Redo)), 1);
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn unregister_stops_delivery() {
        let router = Router::new();
        let (tx, _rx) = flume::unbounded();
        router.register("a", tx, [EventId::Undo]);
        assert!(router.is_registered("a"));
        router.unregister("a");
        assert!(!router.is_registered("a"));
        assert_eq!(router.post_event(Message::new(EventId::Undo)), 0);
    }

    #[test]
    fn dropped_taps_are_pruned() {
        let router = Router::new();
        let tap = router.tap();
        drop(tap);
        router.post_event(Message::new(EventId::LayerRenderShow));
        let live = router.tap();
        router.post_event(Message::new(EventId::LayerRenderShow));
        assert_eq!(live.len(), 1);
        assert!(format!("{router:?}").contains("taps: 1"));
    }
}
