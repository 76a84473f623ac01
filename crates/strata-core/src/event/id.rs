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

use std::fmt;

/// Identifies the kind of a [`Message`](super::Message).
///
/// The payload expected for each id is documented on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventId {
    /// Lifecycle: acquire resources. Always the first message a unit sees.
    Create,
    /// Lifecycle: release resources. Always the last message a unit sees.
    Destroy,

    /// Per-frame camera tick. `arg2` = timestamp in ns, optional [`Mat4`](crate::math::Mat4) payload.
    CameraInvalidate,
    /// Native camera frame size. [`Size`](crate::math::Size) payload.
    CameraUpdateSize,
    /// Deferred work for the render thread. [`RenderTask`](super::RenderTask) payload.
    CameraRun,
    /// The external camera texture is available. [`TextureId`](crate::renderer::TextureId) payload.
    CameraOesTextureNotify,
    /// A compositing layer texture is ready. `arg1` = layer id,
    /// [`TextureHandle`](crate::renderer::TextureHandle) payload.
    LayerQueryIdNotify,
    /// Final output surface size. [`Size`](crate::math::Size) payload.
    VideoOutputSize,
    /// Drives a compositing pass. `arg1` = [`RenderFlags`](crate::renderer::RenderFlags) bits.
    CommonInvalidate,
    /// The authoritative layer-model list changed.
    UpdateLayer,
    /// Import a project. [`PathBuf`](std::path::PathBuf) payload.
    Import,
    /// History: redo.
    Redo,
    /// History: undo.
    Undo,

    /// Request for an empty backing layer. [`Size`](crate::math::Size) payload.
    LayerAddEmpty,
    /// A new frame is ready. `arg2` = timestamp in ns.
    Timestamp,
    /// Cover-fit correction for a layer. `arg1` = layer id,
    /// [`LayerScale`](crate::layer::LayerScale) payload.
    LayerScale,
    /// Cached GPU state for a layer must be evicted. `arg1` = layer id.
    LayerRemoveCache,
    /// Render one layer through its filter. `arg1` = flags,
    /// [`LayerPair`](crate::layer::LayerPair) payload.
    LayerFilterRender,
    /// Present the current framebuffer; there is nothing to composite.
    LayerRenderShow,
    /// The canvas was resized. [`Size`](crate::math::Size) payload.
    LayerRenderUpdateCanvas,
}

impl EventId {
    /// Returns `true` for the lifecycle ids, which are never broadcast.
    pub const fn is_lifecycle(&self) -> bool {
        matches!(self, EventId::Create | EventId::Destroy)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
