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

use crate::math::{Size, Vec2};
use crate::renderer::{FramebufferId, TextureHandle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifier of a layer. Unique and stable across edits.
pub type LayerId = i32;

/// Placement of a layer on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerTransform {
    /// Offset of the layer centre, in canvas units.
    pub position: Vec2,
    /// Per-axis scale. A negative component mirrors that axis.
    pub scale: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            alpha: 1.0,
        }
    }
}

/// A filter applied when the layer is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Name of the filter, resolved by the filter renderer.
    pub name: String,
    /// Strength of the effect.
    pub intensity: f32,
}

/// Editable metadata describing one compositing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerModel {
    /// The layer id.
    pub id: LayerId,
    /// Size of the layer's backing surface.
    pub size: Size,
    /// Placement on the canvas.
    #[serde(default)]
    pub transform: LayerTransform,
    /// Filters, applied in order.
    #[serde(default)]
    pub filters: Vec<FilterParams>,
}

impl LayerModel {
    /// Creates a model with an identity transform and no filters.
    pub fn new(id: LayerId, size: Size) -> Self {
        Self {
            id,
            size,
            transform: LayerTransform::default(),
            filters: Vec::new(),
        }
    }

    /// Returns the layer id.
    pub fn id(&self) -> LayerId {
        self.id
    }
}

/// Description of the canvas produced by an import.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasModel {
    /// Size of the canvas.
    pub size: Size,
    /// Background color, RGBA.
    pub background: [f32; 4],
}

/// Cover-fit correction for a layer, emitted with `EventId::LayerScale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerScale {
    /// The layer to scale.
    pub layer_id: LayerId,
    /// Scale to apply. `y` is negated for a vertical flip.
    pub scale: Vec2,
    /// Anchor of the scale, in layer units.
    pub anchor: Vec2,
}

/// A copy of the GPU handles realising a layer, as passed in render messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerTarget {
    /// The layer id.
    pub id: LayerId,
    /// The layer texture.
    pub texture: TextureHandle,
    /// The render target bound to that texture.
    pub framebuffer: FramebufferId,
}

/// Payload of `EventId::LayerFilterRender`: a layer and the model it realises.
#[derive(Debug, Clone)]
pub struct LayerPair {
    /// GPU handles of the layer.
    pub layer: LayerTarget,
    /// Snapshot of the model.
    pub model: Arc<LayerModel>,
}
