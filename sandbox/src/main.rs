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

// Strata Sandbox
// Runs the camera and compositor units on a headless device and plays the
// editor role: it answers layer requests and prints what reaches the screen.
//
// Usage: sandbox [project.json]

mod importer;

use std::path::PathBuf;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use strata_core::event::{EventId, Message, Router};
use strata_core::layer::{LayerId, LayerModel, LayerPair, LayerStore};
use strata_core::math::Size;
use strata_core::renderer::RenderFlags;
use strata_infra::HeadlessDevice;
use strata_runtime::logging::init_logging;
use strata_runtime::{Looper, LooperConfig, LooperThread};
use strata_units::{CameraConfig, CameraInputUnit, LayerCompositorUnit};

use importer::JsonImporter;

const CAMERA: &str = "camera";
const LAYERS: &str = "layers";
const FRAMES: i64 = 5;
const FRAME_NS: i64 = 33_333_333;
const SETTLE: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
struct Stats {
    presented: usize,
    shown_empty: usize,
    filter_requests: usize,
}

/// Hands out layer ids that never repeat, even after layers are removed.
#[derive(Debug, Clone, Default)]
struct LayerIds {
    max: Arc<AtomicI32>,
}

impl LayerIds {
    /// Records an id already in use, e.g. the newest id of a loaded project.
    fn observe(&self, id: LayerId) {
        self.max.fetch_max(id, Ordering::SeqCst);
    }

    fn next(&self) -> LayerId {
        self.max.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Stands in for the editor surface: owns the layer list.
struct Editor {
    router: Router,
    store: LayerStore,
    ids: LayerIds,
    stats: Stats,
}

impl Editor {
    fn handle(&mut self, msg: &Message) -> Result<()> {
        match msg.what() {
            EventId::LayerAddEmpty => {
                let size = msg
                    .obj::<Size>()
                    .copied()
                    .context("layer request without a size")?;
                for model in self.store.snapshot().models() {
                    self.ids.observe(model.id);
                }
                let next_id = self.ids.next();
                self.store
                    .edit(|models| models.push(LayerModel::new(next_id, size)));
                log::info!("Editor: added layer {next_id} ({size}).");
                self.router
                    .post_message(LAYERS, Message::new(EventId::UpdateLayer))
                    .context("compositor is gone")?;
            }
            EventId::LayerFilterRender => {
                self.stats.filter_requests += 1;
                let flags = RenderFlags::from_bits(msg.arg1());
                if let Some(pair) = msg.obj::<LayerPair>() {
                    log::debug!(
                        "Editor: filter layer {} ({} filters), flags {:#05b}.",
                        pair.model.id,
                        pair.model.filters.len(),
                        flags.bits()
                    );
                }
                if flags.render_screen() {
                    self.stats.presented += 1;
                }
            }
            EventId::LayerRenderShow => self.stats.shown_empty += 1,
            EventId::LayerScale => log::info!("Editor: layer {} rescaled.", msg.arg1()),
            EventId::LayerRenderUpdateCanvas => {
                if let Some(size) = msg.obj::<Size>() {
                    log::info!("Editor: canvas is now {size}.");
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn settle(&mut self, tap: &flume::Receiver<Message>) -> Result<()> {
        while let Ok(msg) = tap.recv_timeout(SETTLE) {
            self.handle(&msg)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    init_logging("info");

    let device = Arc::new(HeadlessDevice::new());
    let store = LayerStore::new();
    let router = Router::new();
    let tap = router.tap();

    let mut looper = Looper::new(LooperConfig::default(), router.clone(), device.clone());
    looper.attach(CameraInputUnit::new(CAMERA, CameraConfig::default()))?;
    let ids = LayerIds::default();
    let mut compositor = LayerCompositorUnit::new(LAYERS, store.clone(), Arc::new(JsonImporter));
    let loaded = ids.clone();
    compositor.set_on_load_listener(move |max_id| {
        log::info!("Project loaded, newest layer {max_id}.");
        loaded.observe(max_id);
    });
    looper.attach(compositor)?;
    let mut thread = LooperThread::spawn(looper)?;

    let mut editor = Editor {
        router: router.clone(),
        store,
        ids,
        stats: Stats::default(),
    };

    router.post_message(
        CAMERA,
        Message::new(EventId::CameraUpdateSize).with_owned(Size::new(1280, 720)),
    )?;
    router.post_event(Message::new(EventId::VideoOutputSize).with_owned(Size::new(720, 1280)));

    if let Some(path) = std::env::args().nth(1) {
        log::info!("Importing {path}...");
        router.post_message(
            LAYERS,
            Message::new(EventId::Import).with_owned(PathBuf::from(path)),
        )?;
    }
    editor.settle(&tap)?;

    for frame in 0..FRAMES {
        router
            .post_message(
                CAMERA,
                Message::new(EventId::CameraInvalidate).with_arg2(frame * FRAME_NS),
            )
            .with_context(|| format!("failed to tick frame {frame}"))?;
        editor.settle(&tap)?;
    }

    thread.stop();
    log::info!(
        "Done: {} frames presented, {} empty shows, {} filter requests, {} camera draws.",
        editor.stats.presented,
        editor.stats.shown_empty,
        editor.stats.filter_requests,
        device.draw_count()
    );
    if !device.is_clean() {
        log::warn!(
            "Leaked GPU resources: {} textures, {} programs, {} render targets.",
            device.live_textures(),
            device.live_programs(),
            device.live_framebuffers()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_ids_are_not_reused_after_removal() {
        // --- 1. ARRANGE ---
        let ids = LayerIds::default();
        ids.observe(12);

        // --- 2. ACT ---
        let first = ids.next();
        ids.observe(3);
        let second = ids.next();

        // --- 3. ASSERT ---
        assert_eq!(first, 13);
        assert_eq!(second, 14, "a lower id never moves the counter back");
    }

    #[test]
    fn empty_editor_starts_at_one() {
        assert_eq!(LayerIds::default().next(), 1);
    }
}
