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

//! Camera and compositor sharing one looper, with the test acting as editor.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;
use strata_core::event::{EventId, Message, Router};
use strata_core::import::{ImportError, ImportedProject, ProjectImporter};
use strata_core::layer::{LayerModel, LayerPair, LayerScale, LayerStore};
use strata_core::math::Size;
use strata_core::renderer::{RenderDevice, RenderFlags};
use strata_infra::HeadlessDevice;
use strata_runtime::{Looper, LooperConfig, LooperThread, RenderThread};
use strata_units::{CameraConfig, CameraInputUnit, LayerCompositorUnit};

struct NoProjects;

impl ProjectImporter for NoProjects {
    fn import_from_file(&self, path: &Path) -> Result<ImportedProject, ImportError> {
        Err(ImportError::NotFound(path.to_path_buf()))
    }
}

fn pipeline(device: Arc<HeadlessDevice>) -> (Looper, LayerStore) {
    let store = LayerStore::new();
    let mut looper = Looper::new(LooperConfig::default(), Router::new(), device);
    looper
        .attach(CameraInputUnit::new("camera", CameraConfig::default()))
        .unwrap();
    looper
        .attach(LayerCompositorUnit::new(
            "layers",
            store.clone(),
            Arc::new(NoProjects),
        ))
        .unwrap();
    (looper, store)
}

#[test]
fn camera_frame_reaches_the_compositor() {
    // --- 1. ARRANGE ---
    let device = Arc::new(HeadlessDevice::new());
    let (mut looper, store) = pipeline(device.clone());
    let router = looper.router().clone();
    let tap = router.tap();
    looper.pump();
    router
        .post_message(
            "camera",
            Message::new(EventId::CameraUpdateSize).with_owned(Size::new(100, 50)),
        )
        .unwrap();

    // First tick: no layer yet, the camera asks the editor for one.
    router
        .post_message("camera", Message::new(EventId::CameraInvalidate))
        .unwrap();
    looper.pump();
    let requested = tap
        .try_iter()
        .find(|m| m.what() == EventId::LayerAddEmpty)
        .and_then(|m| m.obj::<Size>().copied())
        .expect("camera requests a backing layer");
    assert_eq!(requested, Size::new(100, 50));

    // The editor adds the layer and tells the compositor.
    store.edit(|models| models.push(LayerModel::new(1, requested)));
    router
        .post_message("layers", Message::new(EventId::UpdateLayer))
        .unwrap();
    looper.pump();
    let scale = tap
        .try_iter()
        .find(|m| m.what() == EventId::LayerScale)
        .expect("camera wraps the announced layer");
    let scale = scale.obj::<LayerScale>().unwrap();
    assert_eq!(scale.layer_id, 1);
    assert_relative_eq!(scale.scale.x, 1.0);
    assert_relative_eq!(scale.scale.y, -1.0);

    // --- 2. ACT ---
    router
        .post_message(
            "camera",
            Message::new(EventId::CameraInvalidate).with_arg2(99),
        )
        .unwrap();
    looper.pump();

    // --- 3. ASSERT ---
    let events: Vec<Message> = tap.try_iter().collect();
    let order: Vec<EventId> = events.iter().map(|m| m.what()).collect();
    assert_eq!(
        order,
        vec![
            EventId::Timestamp,
            EventId::CommonInvalidate,
            EventId::LayerFilterRender
        ]
    );
    let filter = &events[2];
    let pair = filter.obj::<LayerPair>().unwrap();
    assert_eq!(pair.layer.id, 1);
    assert_eq!(
        RenderFlags::from_bits(filter.arg1()),
        RenderFlags::default()
            .with_transparent(true)
            .with_req_clear(true)
    );
    assert_eq!(device.draw_count(), 1);

    looper.shutdown();
    assert!(device.is_clean());
}

/// Brings the pipeline to the point where the camera draws into layer 1.
fn camera_on_first_layer(
    device: Arc<HeadlessDevice>,
) -> (Looper, Router, flume::Receiver<Message>, LayerStore) {
    let (mut looper, store) = pipeline(device);
    let router = looper.router().clone();
    let tap = router.tap();
    looper.pump();
    router
        .post_message(
            "camera",
            Message::new(EventId::CameraUpdateSize).with_owned(Size::new(100, 50)),
        )
        .unwrap();
    store.edit(|models| models.push(LayerModel::new(1, Size::new(100, 50))));
    router
        .post_message("layers", Message::new(EventId::UpdateLayer))
        .unwrap();
    looper.pump();
    assert!(kinds(&tick(&mut looper, &router, &tap)).contains(&EventId::LayerFilterRender));
    (looper, router, tap, store)
}

fn tick(looper: &mut Looper, router: &Router, tap: &flume::Receiver<Message>) -> Vec<Message> {
    router
        .post_message("camera", Message::new(EventId::CameraInvalidate))
        .unwrap();
    looper.pump();
    tap.try_iter().collect()
}

fn kinds(events: &[Message]) -> Vec<EventId> {
    events.iter().map(|m| m.what()).collect()
}

#[test]
fn camera_follows_a_replaced_layer() {
    // --- 1. ARRANGE ---
    let device = Arc::new(HeadlessDevice::new());
    let (mut looper, router, tap, store) = camera_on_first_layer(device.clone());

    // --- 2. ACT ---
    store.replace(vec![LayerModel::new(2, Size::new(100, 50))]);
    router
        .post_message("layers", Message::new(EventId::UpdateLayer))
        .unwrap();
    looper.pump();
    let update: Vec<Message> = tap.try_iter().collect();
    let frames: Vec<Vec<Message>> = (0..3).map(|_| tick(&mut looper, &router, &tap)).collect();

    // --- 3. ASSERT ---
    assert_eq!(
        kinds(&update),
        vec![
            EventId::LayerRemoveCache,
            EventId::LayerQueryIdNotify,
            EventId::LayerScale
        ]
    );
    assert_eq!(update[0].arg1(), 1);
    assert_eq!(update[2].obj::<LayerScale>().unwrap().layer_id, 2);
    for events in &frames {
        assert_eq!(
            kinds(events),
            vec![
                EventId::Timestamp,
                EventId::CommonInvalidate,
                EventId::LayerFilterRender
            ]
        );
        assert_eq!(events[2].obj::<LayerPair>().unwrap().layer.id, 2);
    }
    assert_eq!(device.draw_count(), 4);

    looper.shutdown();
    assert!(device.is_clean());
}

#[test]
fn camera_asks_again_after_its_layer_is_removed() {
    // --- 1. ARRANGE ---
    let device = Arc::new(HeadlessDevice::new());
    let (mut looper, router, tap, store) = camera_on_first_layer(device.clone());
    store.edit(|models| models.clear());
    router
        .post_message("layers", Message::new(EventId::UpdateLayer))
        .unwrap();
    looper.pump();
    tap.try_iter().for_each(drop);

    // --- 2. ACT ---
    let orphaned = tick(&mut looper, &router, &tap);
    let orphaned_again = tick(&mut looper, &router, &tap);

    // --- 3. ASSERT ---
    assert_eq!(kinds(&orphaned), vec![EventId::LayerAddEmpty]);
    assert!(orphaned_again.is_empty());
    assert_eq!(device.draw_count(), 1);

    // The editor answers and frames flow again.
    store.edit(|models| models.push(LayerModel::new(2, Size::new(100, 50))));
    router
        .post_message("layers", Message::new(EventId::UpdateLayer))
        .unwrap();
    looper.pump();
    tap.try_iter().for_each(drop);
    let resumed = tick(&mut looper, &router, &tap);
    assert_eq!(
        kinds(&resumed),
        vec![
            EventId::Timestamp,
            EventId::CommonInvalidate,
            EventId::LayerFilterRender
        ]
    );
    assert_eq!(device.draw_count(), 2);

    looper.shutdown();
    assert!(device.is_clean());
}

#[test]
fn threaded_looper_runs_submitted_tasks_and_cleans_up() {
    let device = Arc::new(HeadlessDevice::new());
    let (looper, _store) = pipeline(device.clone());
    let mut thread = LooperThread::spawn(looper).expect("thread spawns");
    assert!(thread.is_running());

    let render_thread = RenderThread::new(thread.router().clone(), "camera");
    let (tx, rx) = flume::bounded(1);
    render_thread
        .submit(move |device: &dyn RenderDevice| {
            let texture = device.create_texture(Size::new(2, 2));
            tx.send(texture.is_ok()).unwrap();
            if let Ok(texture) = texture {
                device.destroy_texture(texture.id).unwrap();
            }
        })
        .unwrap();
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(true));

    thread.stop();
    assert!(!thread.is_running());
    assert!(device.is_clean());
    assert!(!thread.router().is_registered("camera"));
}
