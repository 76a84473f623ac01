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

//! Executors for units.
//!
//! A [`Looper`] hosts a group of units that share one render device and
//! processes their messages strictly one after the other. It can be pumped
//! from the calling thread, or moved onto a dedicated thread with
//! [`LooperThread`]. Work that must run on that thread is submitted through a
//! [`RenderThread`] handle.

#![warn(missing_docs)]

mod config;
pub mod logging;
mod looper;
mod render_thread;
mod service;

pub use config::LooperConfig;
pub use looper::{Looper, LooperError};
pub use render_thread::RenderThread;
pub use service::LooperThread;
