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

//! The rendering capability interface consumed by the compositing units.
//!
//! Shader compilation, texture allocation and framebuffer binding live behind
//! [`RenderDevice`]; this crate only defines the contract and the opaque
//! handles it hands out.

pub mod api;
pub mod error;
pub mod flags;
#[cfg(test)]
mod null;
pub mod traits;

pub use self::api::*;
pub use self::error::ResourceError;
pub use self::flags::RenderFlags;
#[cfg(test)]
pub(crate) use self::null::NullDevice;
pub use self::traits::RenderDevice;
