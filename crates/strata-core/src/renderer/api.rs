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

//! Opaque GPU handles and descriptors.

use crate::math::Size;
use std::borrow::Cow;

/// An opaque handle to a GPU texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// An opaque handle to an offscreen render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub usize);

/// An opaque handle to a compiled shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub usize);

/// A texture together with its dimensions.
///
/// This is what travels in messages: a copy, never a reference to the owner's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    /// The texture.
    pub id: TextureId,
    /// Its size in pixels.
    pub size: Size,
}

impl TextureHandle {
    /// Creates a new handle.
    pub const fn new(id: TextureId, size: Size) -> Self {
        Self { id, size }
    }

    /// Width in pixels.
    pub const fn width(&self) -> i32 {
        self.size.width
    }

    /// Height in pixels.
    pub const fn height(&self) -> i32 {
        self.size.height
    }
}

/// The kind of image a program samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerKind {
    /// A regular 2D texture.
    #[default]
    Texture2D,
    /// An externally produced image (camera driver, video decoder).
    External,
}

/// Describes a shader program to compile.
#[derive(Debug, Clone)]
pub struct ProgramDescriptor<'a> {
    /// A debug label.
    pub label: Option<&'a str>,
    /// Vertex stage source.
    pub vertex: Cow<'a, str>,
    /// Fragment stage source.
    pub fragment: Cow<'a, str>,
    /// What the fragment stage samples from.
    pub sampler: SamplerKind,
}
