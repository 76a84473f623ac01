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

//! Provides the primitives for message-driven communication between units.
//!
//! - [`EventId`] tags every message.
//! - [`Message`] is the envelope: scalar arguments, an optional [`Payload`]
//!   that is either owned by the message or shared with its producer, a
//!   description and a [`QueueMode`].
//! - [`Router`] delivers messages point-to-point (`post_message`) or to every
//!   subscriber of an event id (`post_event`), and lets observers tap the
//!   broadcast stream.

mod id;
mod message;
mod router;

pub use self::id::EventId;
pub use self::message::{Message, Payload, QueueMode, RenderTask};
pub use self::router::{Envelope, Mailbox, RouteError, Router};
