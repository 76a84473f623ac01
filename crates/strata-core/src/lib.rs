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

//! # Strata Core
//!
//! Foundational crate containing the message envelope, the unit (actor) contract,
//! the render-device capability interface and the layer data model shared by
//! every other crate of the compositing core.

#![warn(missing_docs)]

pub mod event;
pub mod import;
pub mod layer;
pub mod math;
pub mod renderer;
pub mod resource;
pub mod unit;

pub use event::{EventId, Message, Payload, QueueMode, RenderTask, RouteError, Router};
pub use resource::GpuResource;
pub use unit::{EventHandlers, Handled, Unit, UnitContext, UnitState};
