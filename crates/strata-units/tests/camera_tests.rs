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

use std::sync::Arc;

use approx::assert_relative_eq;
use strata_core::event::{EventId, Message, Router};
use strata_core::layer::LayerScale;
use strata_core::math::{Mat4, Size, Vec2};
use strata_core::renderer::{RenderDevice, RenderFlags, TextureHandle, TextureId};
use strata_infra::{DeviceCommand, HeadlessDevice};
use strata_runtime::{Looper, LooperConfig, RenderThread};
use strata_units::{CameraConfig, CameraInputUnit};

const ALIAS: &str = "camera";

struct Harness {
    looper: Looper,
    router: Router,
    device: Arc<HeadlessDevice>,
    tap: flume::Receiver<Message>,
}

impl Harness {
    fn new() -> Self {
        let device = Arc::new(HeadlessDevice::new());
        let router = Router::new();
        let tap = router.tap();
        let mut looper = Looper::new(LooperConfig::named("camera"), router.clone(), device.clone());
        looper
            .attach(CameraInputUnit::new(ALIAS, CameraConfig::default()))
            .expect("alias is free");
        looper.pump();
        Self {
            looper,
            router,
            device,
            tap,
        }
    }

    fn send(&mut self, msg: Message) -> Vec<Message> {
        while self.tap.try_recv().is_ok() {}
        self.router.post_message(ALIAS, msg).expect("camera is registered");
        self.looper.pump();
        self.tap.try_iter().collect()
    }

    fn camera_size(&mut self, width: i32, height: i32) {
        self.send(Message::new(EventId::CameraUpdateSize).with_owned(Size::new(width, height)));
    }

    /// Allocates a layer texture on the device and announces it to the camera.
    fn announce_layer(&mut self, id: i32, size: Size) -> (TextureHandle, Vec<Message>) {
        let texture = self.device.create_texture(size).expect("valid layer size");
        let events = self.send(
            Message::new(EventId::LayerQueryIdNotify)
                .with_arg1(id)
                .with_owned(texture),
        );
        (texture, events)
    }
}

fn of(events: &[Message], what: EventId) -> Vec<&Message> {
    events.iter().filter(|m| m.what() == what).collect()
}

#[test]
fn create_publishes_the_camera_texture_once() {
    let h = Harness::new();
    let notifies: Vec<Message> = h
        .tap
        .try_iter()
        .filter(|m| m.what() == EventId::CameraOesTextureNotify)
        .collect();
    assert_eq!(notifies.len(), 1);
    assert!(notifies[0].obj::<TextureId>().is_some());
}

#[test]
fn cover_scale_uses_the_larger_ratio_and_flips_y() {
    // --- 1. ARRANGE ---
    let mut h = Harness::new();
    h.camera_size(100, 50);

    // --- 2. ACT ---
    let (_, events) = h.announce_layer(3, Size::new(400, 100));

    // --- 3. ASSERT ---
    let scales = of(&events, EventId::LayerScale);
    assert_eq!(scales.len(), 1);
    assert_eq!(scales[0].arg1(), 3);
    let scale = scales[0].obj::<LayerScale>().expect("scale payload");
    assert_eq!(scale.layer_id, 3);
    assert_relative_eq!(scale.scale.x, 4.0);
    assert_relative_eq!(scale.scale.y, -4.0);
    assert_eq!(scale.anchor, Vec2::ZERO);
}

#[test]
fn layer_is_wrapped_only_once() {
    let mut h = Harness::new();
    h.camera_size(100, 100);

    let (_, first) = h.announce_layer(1, Size::new(200, 200));
    let (_, second) = h.announce_layer(1, Size::new(200, 200));
    let (_, other) = h.announce_layer(2, Size::new(50, 50));

    assert_eq!(of(&first, EventId::LayerScale).len(), 1);
    assert!(of(&second, EventId::LayerScale).is_empty());
    assert!(of(&other, EventId::LayerScale).is_empty());
}

#[test]
fn invalidate_without_layer_requests_one_and_skips_drawing() {
    let mut h = Harness::new();
    h.camera_size(1280, 720);

    let first = h.send(Message::new(EventId::CameraInvalidate).with_arg2(1));
    let second = h.send(Message::new(EventId::CameraInvalidate).with_arg2(2));

    let requests = of(&first, EventId::LayerAddEmpty);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].obj::<Size>(), Some(&Size::new(1280, 720)));
    assert!(of(&second, EventId::LayerAddEmpty).is_empty());

    for events in [&first, &second] {
        assert!(of(events, EventId::Timestamp).is_empty());
        assert!(of(events, EventId::CommonInvalidate).is_empty());
    }
    assert_eq!(h.device.live_framebuffers(), 1);
    assert_eq!(h.device.draw_count(), 0);
}

#[test]
fn invalidate_copies_the_camera_into_the_layer() {
    // --- 1. ARRANGE ---
    let mut h = Harness::new();
    h.camera_size(100, 50);
    let (texture, _) = h.announce_layer(9, Size::new(400, 100));
    h.device.take_commands();
    let matrix = Mat4::from_scale(Vec2::new(1.0, -1.0));

    // --- 2. ACT ---
    let events = h.send(
        Message::new(EventId::CameraInvalidate)
            .with_arg2(123_456)
            .with_owned(matrix),
    );

    // --- 3. ASSERT ---
    let commands = h.device.take_commands();
    let kinds: Vec<&str> = commands
        .iter()
        .map(|c| match c {
            DeviceCommand::CreateFramebuffer(_) => "create_fb",
            DeviceCommand::UpdateProgramMatrix(..) => "matrix",
            DeviceCommand::BindFramebuffer(_, target) => {
                assert_eq!(*target, texture.id);
                "bind"
            }
            DeviceCommand::Viewport(size) => {
                assert_eq!(*size, Size::new(400, 100));
                "viewport"
            }
            DeviceCommand::Clear(color) => {
                assert_eq!(*color, CameraConfig::default().clear_color);
                "clear"
            }
            DeviceCommand::Draw(..) => "draw",
            DeviceCommand::UnbindFramebuffer(_) => "unbind",
            other => panic!("unexpected command {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["create_fb", "matrix", "bind", "viewport", "clear", "draw", "unbind"]
    );
    assert!(matches!(
        commands[1],
        DeviceCommand::UpdateProgramMatrix(_, uploaded) if uploaded == matrix
    ));
    if let DeviceCommand::UpdateProgramMatrix(program, _) = commands[1] {
        assert_eq!(
            h.device.program_uniforms(program).as_deref(),
            Some(matrix.as_bytes())
        );
    }

    let stamps = of(&events, EventId::Timestamp);
    assert_eq!(stamps.len(), 1);
    assert_eq!(stamps[0].arg2(), 123_456);
    let ticks = of(&events, EventId::CommonInvalidate);
    assert_eq!(ticks.len(), 1);
    let flags = RenderFlags::from_bits(ticks[0].arg1());
    assert!(flags.transparent());
    assert!(flags.render_screen());
    assert!(!flags.req_clear());
}

#[test]
fn invalidate_without_matrix_keeps_the_program_state() {
    let mut h = Harness::new();
    h.camera_size(10, 10);
    h.announce_layer(1, Size::new(10, 10));
    h.device.take_commands();

    h.send(Message::new(EventId::CameraInvalidate));

    assert!(!h
        .device
        .commands()
        .iter()
        .any(|c| matches!(c, DeviceCommand::UpdateProgramMatrix(..))));
    assert_eq!(h.device.draw_count(), 1);
}

#[test]
fn unknown_camera_size_defers_the_layer() {
    let mut h = Harness::new();

    let events = h.send(Message::new(EventId::CameraInvalidate));
    assert!(of(&events, EventId::LayerAddEmpty).is_empty());

    let (_, events) = h.announce_layer(1, Size::new(10, 10));
    assert!(of(&events, EventId::LayerScale).is_empty());

    h.camera_size(5, 5);
    let (_, events) = h.announce_layer(1, Size::new(10, 10));
    assert_eq!(of(&events, EventId::LayerScale).len(), 1);
}

#[test]
fn submitted_tasks_run_in_order_on_the_camera_queue() {
    let mut h = Harness::new();
    let render_thread = RenderThread::new(h.router.clone(), ALIAS);
    let (tx, rx) = flume::unbounded();

    for i in 0..3 {
        let tx = tx.clone();
        render_thread
            .submit(move |device: &dyn RenderDevice| {
                device.clear([i as f32; 4]);
                tx.send(i).unwrap();
            })
            .unwrap();
    }
    h.looper.pump();

    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
}

#[test]
fn shutdown_releases_camera_resources() {
    let mut h = Harness::new();
    h.camera_size(4, 4);
    h.send(Message::new(EventId::CameraInvalidate));

    h.looper.shutdown();

    assert_eq!(h.device.live_programs(), 0);
    assert_eq!(h.device.live_framebuffers(), 0);
    assert_eq!(h.device.live_textures(), 0);
}
