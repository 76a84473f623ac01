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

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use strata_core::layer::{LayerId, LayerModel, LayerTarget};
use strata_core::math::Size;
use strata_core::renderer::{FramebufferId, RenderDevice, ResourceError, TextureHandle};
use strata_core::GpuResource;

/// The GPU resources realising one layer model.
///
/// Created empty when its model first appears; the texture and render target
/// are allocated on the render thread the first time the layer is needed.
#[derive(Debug)]
pub struct LayerObject {
    id: LayerId,
    size: Size,
    texture: GpuResource<TextureHandle>,
    framebuffer: GpuResource<FramebufferId>,
}

impl LayerObject {
    fn new(id: LayerId, size: Size) -> Self {
        Self {
            id,
            size,
            texture: GpuResource::Uncreated,
            framebuffer: GpuResource::Uncreated,
        }
    }

    /// The id of the model this object realises.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Size the texture is (or will be) allocated with.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns `true` once both the texture and the render target exist.
    pub fn is_ready(&self) -> bool {
        self.texture.is_ready() && self.framebuffer.is_ready()
    }

    /// The GPU handles, if the layer is ready.
    pub fn target(&self) -> Option<LayerTarget> {
        Some(LayerTarget {
            id: self.id,
            texture: self.texture.get()?,
            framebuffer: self.framebuffer.get()?,
        })
    }

    /// Allocates whatever is missing and returns the handles.
    ///
    /// A failure leaves the missing part uncreated so a later call retries.
    pub fn materialize(&mut self, device: &dyn RenderDevice) -> Result<LayerTarget, ResourceError> {
        let size = self.size;
        let texture = self.texture.get_or_create(|| device.create_texture(size))?;
        let framebuffer = self
            .framebuffer
            .get_or_create(|| device.create_framebuffer())?;
        Ok(LayerTarget {
            id: self.id,
            texture,
            framebuffer,
        })
    }

    fn release(&mut self, device: &dyn RenderDevice) {
        self.framebuffer.release(|fb| device.destroy_framebuffer(fb));
        self.texture.release(|texture| device.destroy_texture(texture.id));
    }
}

/// Reconciles the ordered layer-model list with the live layer objects.
///
/// After [`update`](LayerManager::update) or
/// [`replace_all`](LayerManager::replace_all), there is exactly one object per
/// distinct model id, and [`get_layer`](LayerManager::get_layer) walks the
/// models in input order. Objects whose model disappeared are retired and
/// their GPU resources are freed by [`purge`](LayerManager::purge).
#[derive(Debug, Default)]
pub struct LayerManager {
    models: Vec<Arc<LayerModel>>,
    objects: HashMap<LayerId, LayerObject>,
    retired: Vec<LayerObject>,
    max_id: LayerId,
}

impl LayerManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles against `models`.
    ///
    /// Ids present before and after keep their object. New ids get an empty
    /// object. Ids that vanished are retired and appended to `removed`, in
    /// their previous order. When an id appears more than once, the first
    /// occurrence wins.
    pub fn update(&mut self, models: &[Arc<LayerModel>], removed: Option<&mut Vec<LayerId>>) {
        let mut seen = HashSet::with_capacity(models.len());
        let mut ordered = Vec::with_capacity(models.len());
        for model in models {
            if seen.insert(model.id) {
                ordered.push(Arc::clone(model));
            } else {
                log::debug!("LayerManager: duplicate layer id {} ignored.", model.id);
            }
        }

        let mut vanished = Vec::new();
        for previous in &self.models {
            if seen.contains(&previous.id) {
                continue;
            }
            if let Some(object) = self.objects.remove(&previous.id) {
                self.retired.push(object);
            }
            vanished.push(previous.id);
        }

        for model in &ordered {
            let object = self
                .objects
                .entry(model.id)
                .or_insert_with(|| LayerObject::new(model.id, model.size));
            if !object.is_ready() {
                object.size = model.size;
            }
            self.max_id = self.max_id.max(model.id);
        }
        self.models = ordered;

        if !vanished.is_empty() {
            log::debug!("LayerManager: removed layers {vanished:?}.");
        }
        if let Some(removed) = removed {
            removed.extend(vanished);
        }
    }

    /// Retires every current object, then applies `models`.
    ///
    /// Returns the ids of the retired objects.
    pub fn replace_all(&mut self, models: &[Arc<LayerModel>]) -> Vec<LayerId> {
        let removed: Vec<LayerId> = self.models.iter().map(|model| model.id).collect();
        for model in self.models.drain(..) {
            if let Some(object) = self.objects.remove(&model.id) {
                self.retired.push(object);
            }
        }
        self.update(models, None);
        removed
    }

    /// The object realising layer `id`.
    pub fn find(&self, id: LayerId) -> Option<&LayerObject> {
        self.objects.get(&id)
    }

    /// Mutable access to the object realising layer `id`.
    pub fn find_mut(&mut self, id: LayerId) -> Option<&mut LayerObject> {
        self.objects.get_mut(&id)
    }

    /// The model at `index`, bottom layer first.
    pub fn get_layer(&self, index: usize) -> Option<&Arc<LayerModel>> {
        self.models.get(index)
    }

    /// Iterates the models, bottom layer first.
    pub fn models(&self) -> impl Iterator<Item = &Arc<LayerModel>> {
        self.models.iter()
    }

    /// Number of layers.
    pub fn size(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if there is no layer.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// The highest layer id ever seen, `0` if none.
    pub fn max_id(&self) -> LayerId {
        self.max_id
    }

    /// Ids of the layers whose GPU resources are not allocated yet, in order.
    pub fn pending(&self) -> Vec<LayerId> {
        self.models
            .iter()
            .map(|model| model.id)
            .filter(|id| self.objects.get(id).is_some_and(|object| !object.is_ready()))
            .collect()
    }

    /// Frees the GPU resources of retired objects. Returns how many were purged.
    pub fn purge(&mut self, device: &dyn RenderDevice) -> usize {
        let count = self.retired.len();
        for mut object in self.retired.drain(..) {
            object.release(device);
        }
        count
    }

    /// Destroys every object. Safe to call more than once.
    pub fn release(&mut self, device: &dyn RenderDevice) {
        self.purge(device);
        for (_, mut object) in self.objects.drain() {
            object.release(device);
        }
        self.models.clear();
    }
}
