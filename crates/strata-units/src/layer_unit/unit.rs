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

use std::path::PathBuf;
use std::sync::Arc;

use strata_core::event::{EventId, Message};
use strata_core::import::ProjectImporter;
use strata_core::layer::{LayerId, LayerPair, LayerStore};
use strata_core::renderer::RenderFlags;
use strata_core::unit::{EventHandlers, Handled, Unit, UnitContext};

use super::LayerManager;

/// Called with the highest layer id after a successful import.
pub type LoadListener = Box<dyn Fn(LayerId) + Send>;

/// Drives the compositing pass over the ordered layer list.
///
/// Inbound: `CommonInvalidate`, `UpdateLayer`, `Import`, `Redo`, `Undo`.
/// Outbound (broadcast): `LayerQueryIdNotify`, `LayerRemoveCache`,
/// `LayerFilterRender`, `LayerRenderShow`, `LayerRenderUpdateCanvas`.
pub struct LayerCompositorUnit {
    alias: String,
    store: LayerStore,
    importer: Arc<dyn ProjectImporter>,
    manager: LayerManager,
    on_load: Option<LoadListener>,
    handlers: EventHandlers<Self>,
}

impl LayerCompositorUnit {
    /// Creates the compositor reading its layer list from `store`.
    pub fn new(
        alias: impl Into<String>,
        store: LayerStore,
        importer: Arc<dyn ProjectImporter>,
    ) -> Self {
        let mut handlers = EventHandlers::new();
        handlers.register(EventId::CommonInvalidate, Self::on_invalidate);
        handlers.register(EventId::UpdateLayer, Self::on_update_layer);
        handlers.register(EventId::Import, Self::on_import);
        handlers.register(EventId::Redo, Self::on_redo);
        handlers.register(EventId::Undo, Self::on_undo);
        Self {
            alias: alias.into(),
            store,
            importer,
            manager: LayerManager::new(),
            on_load: None,
            handlers,
        }
    }

    /// Sets the callback run after a successful import.
    pub fn set_on_load_listener(&mut self, listener: impl Fn(LayerId) + Send + 'static) {
        self.on_load = Some(Box::new(listener));
    }

    /// The layer manager.
    pub fn manager(&self) -> &LayerManager {
        &self.manager
    }

    fn on_invalidate(&mut self, msg: &Message, ctx: &mut UnitContext<'_>) -> Handled {
        self.notify_all(RenderFlags::from_bits(msg.arg1()), ctx);
        Handled::Yes
    }

    fn on_update_layer(&mut self, _msg: &Message, ctx: &mut UnitContext<'_>) -> Handled {
        let snapshot = self.store.snapshot();
        let mut removed = Vec::new();
        self.manager.update(snapshot.models(), Some(&mut removed));
        log::debug!(
            "{}: layer list v{} applied, {} layers.",
            self.alias,
            snapshot.version(),
            self.manager.size()
        );
        self.evict(&removed, ctx);
        self.materialize_pending(ctx);
        Handled::Yes
    }

    fn on_import(&mut self, msg: &Message, ctx: &mut UnitContext<'_>) -> Handled {
        let path = msg
            .obj::<PathBuf>()
            .cloned()
            .or_else(|| msg.desc().map(PathBuf::from));
        let Some(path) = path else {
            log::warn!("{}: import without a path.", self.alias);
            return Handled::Yes;
        };

        let project = match self.importer.import_from_file(&path) {
            Ok(project) => project,
            Err(e) => {
                log::warn!("{}: import of {} failed: {e}", self.alias, path.display());
                return Handled::Yes;
            }
        };
        if project.layers.is_empty() || !project.canvas.size.is_valid() {
            log::warn!(
                "{}: import of {} rejected ({} layers, canvas {}).",
                self.alias,
                path.display(),
                project.layers.len(),
                project.canvas.size
            );
            return Handled::Yes;
        }

        let canvas = project.canvas.size;
        let version = self.store.replace(project.layers);
        let snapshot = self.store.snapshot();
        let removed = self.manager.replace_all(snapshot.models());
        log::info!(
            "{}: imported {} ({} layers, canvas {canvas}, v{version}).",
            self.alias,
            path.display(),
            self.manager.size()
        );
        self.evict(&removed, ctx);

        ctx.post_event(
            Message::new(EventId::LayerRenderUpdateCanvas)
                .with_owned(canvas)
                .insert_first(),
        );
        self.notify_all(RenderFlags::default(), ctx);
        if let Some(on_load) = &self.on_load {
            on_load(self.manager.max_id());
        }
        Handled::Yes
    }

    fn on_redo(&mut self, _msg: &Message, _ctx: &mut UnitContext<'_>) -> Handled {
        log::trace!("{}: redo.", self.alias);
        Handled::Yes
    }

    fn on_undo(&mut self, _msg: &Message, _ctx: &mut UnitContext<'_>) -> Handled {
        log::trace!("{}: undo.", self.alias);
        Handled::Yes
    }

    fn evict(&mut self, removed: &[LayerId], ctx: &UnitContext<'_>) {
        self.manager.purge(ctx.device());
        for &id in removed {
            ctx.post_event(Message::new(EventId::LayerRemoveCache).with_arg1(id));
        }
    }

    /// Allocates the layers that have no GPU resources yet and announces them.
    fn materialize_pending(&mut self, ctx: &UnitContext<'_>) {
        for id in self.manager.pending() {
            let Some(object) = self.manager.find_mut(id) else {
                continue;
            };
            match object.materialize(ctx.device()) {
                Ok(target) => {
                    log::debug!("{}: layer {id} ready ({}).", self.alias, target.texture.size);
                    ctx.post_event(
                        Message::new(EventId::LayerQueryIdNotify)
                            .with_arg1(id)
                            .with_owned(target.texture),
                    );
                }
                Err(e) => log::warn!("{}: layer {id} not allocated: {e}", self.alias),
            }
        }
    }

    fn notify_all(&mut self, flags: RenderFlags, ctx: &UnitContext<'_>) {
        if self.manager.is_empty() {
            ctx.post_event(Message::new(EventId::LayerRenderShow).with_desc("show"));
            return;
        }
        self.materialize_pending(ctx);

        let size = self.manager.size();
        for i in 0..size {
            let Some(model) = self.manager.get_layer(i).cloned() else {
                continue;
            };
            let Some(layer) = self.manager.find(model.id).and_then(|object| object.target())
            else {
                log::trace!("{}: layer {} not ready, skipped.", self.alias, model.id);
                continue;
            };

            // Only the last layer presents; only the first clears.
            let mut resolved = RenderFlags::default().with_render_screen(false);
            if i == size - 1 {
                resolved = flags;
            }
            if i == 0 {
                resolved = resolved.with_req_clear(true);
            }
            ctx.post_event(
                Message::new(EventId::LayerFilterRender)
                    .with_arg1(resolved.bits())
                    .with_owned(LayerPair { layer, model })
                    .with_desc("filter"),
            );
        }
    }
}

impl Unit for LayerCompositorUnit {
    fn alias(&self) -> &str {
        &self.alias
    }

    fn subscriptions(&self) -> Vec<EventId> {
        self.handlers.events()
    }

    fn on_create(&mut self, ctx: &mut UnitContext<'_>) -> Handled {
        log::info!("{}: create.", self.alias);
        let snapshot = self.store.snapshot();
        self.manager.update(snapshot.models(), None);
        self.materialize_pending(ctx);
        Handled::Yes
    }

    fn on_destroy(&mut self, ctx: &mut UnitContext<'_>) -> Handled {
        log::info!("{}: destroy.", self.alias);
        self.manager.release(ctx.device());
        Handled::Yes
    }

    fn on_event(&mut self, msg: &Message, ctx: &mut UnitContext<'_>) -> Handled {
        match self.handlers.get(msg.what()) {
            Some(handler) => handler(self, msg, ctx),
            None => Handled::No,
        }
    }
}

impl std::fmt::Debug for LayerCompositorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerCompositorUnit")
            .field("alias", &self.alias)
            .field("layers", &self.manager.size())
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}
