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

use serde::{Deserialize, Serialize};
use strata_core::event::{EventId, Message, RenderTask};
use strata_core::layer::{LayerId, LayerScale};
use strata_core::math::{cover_scale, Mat4, Size, Vec2};
use strata_core::renderer::{
    FramebufferId, ProgramId, RenderDevice, RenderFlags, TextureHandle, TextureId,
};
use strata_core::unit::{EventHandlers, Handled, Unit, UnitContext};
use strata_core::GpuResource;

use super::shader::copy_program;

/// Configuration of a [`CameraInputUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Color the layer texture is cleared to before each copy.
    pub clear_color: [f32; 4],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.3, 0.3, 0.3, 0.0],
        }
    }
}

/// The layer texture the camera draws into, held until the layer is evicted.
#[derive(Debug, Clone, Copy)]
struct LayerBinding {
    id: LayerId,
    texture: TextureHandle,
}

/// Copies the external camera image into a compositing layer every tick.
///
/// Inbound: `CameraInvalidate`, `CameraUpdateSize`, `CameraRun`,
/// `LayerQueryIdNotify`, `LayerRemoveCache`, `VideoOutputSize`.
/// Outbound (broadcast): `CameraOesTextureNotify`, `LayerAddEmpty`,
/// `Timestamp`, `CommonInvalidate`, `LayerScale`.
pub struct CameraInputUnit {
    alias: String,
    config: CameraConfig,
    handlers: EventHandlers<Self>,
    source: GpuResource<TextureId>,
    program: GpuResource<ProgramId>,
    framebuffer: GpuResource<FramebufferId>,
    camera_size: Size,
    output_size: Size,
    layer: Option<LayerBinding>,
    layer_requested: bool,
}

impl CameraInputUnit {
    /// Creates the unit. No GPU resource is acquired before `Create`.
    pub fn new(alias: impl Into<String>, config: CameraConfig) -> Self {
        let mut handlers = EventHandlers::new();
        handlers.register(EventId::CameraInvalidate, Self::on_invalidate);
        handlers.register(EventId::CameraUpdateSize, Self::on_update_size);
        handlers.register(EventId::CameraRun, Self::on_run);
        handlers.register(EventId::LayerQueryIdNotify, Self::on_layer_notify);
        handlers.register(EventId::LayerRemoveCache, Self::on_layer_removed);
        handlers.register(EventId::VideoOutputSize, Self::on_output_size);
        Self {
            alias: alias.into(),
            config,
            handlers,
            source: GpuResource::Uncreated,
            program: GpuResource::Uncreated,
            framebuffer: GpuResource::Uncreated,
            camera_size: Size::default(),
            output_size: Size::default(),
            layer: None,
            layer_requested: false,
        }
    }

    /// The native camera frame size last recorded.
    pub fn camera_size(&self) -> Size {
        self.camera_size
    }

    /// The output surface size last recorded.
    pub fn output_size(&self) -> Size {
        self.output_size
    }

    /// The id of the layer the camera draws into, once announced.
    pub fn layer_id(&self) -> Option<LayerId> {
        self.layer.map(|binding| binding.id)
    }

    /// The external camera texture, once created.
    pub fn source_texture(&self) -> Option<TextureId> {
        self.source.get()
    }

    fn on_invalidate(&mut self, msg: &Message, ctx: &mut UnitContext<'_>) -> Handled {
        let device = ctx.device();
        let Some(layer) = self.layer else {
            self.request_layer(ctx);
            return Handled::Yes;
        };
        let framebuffer = match self.framebuffer.get_or_create(|| device.create_framebuffer()) {
            Ok(framebuffer) => framebuffer,
            Err(e) => {
                log::warn!("{}: no render target, frame skipped: {e}", self.alias);
                return Handled::Yes;
            }
        };
        let (Some(program), Some(source)) = (self.program.get(), self.source.get()) else {
            log::debug!("{}: resources not ready, frame skipped.", self.alias);
            return Handled::Yes;
        };
        log::trace!(
            "{}: copy {} camera frame into layer {} ({}).",
            self.alias,
            self.camera_size,
            layer.id,
            layer.texture.size
        );

        if let Some(matrix) = msg.obj::<Mat4>() {
            if let Err(e) = device.update_program_matrix(program, matrix) {
                log::warn!("{}: failed to update texture matrix: {e}", self.alias);
            }
        }
        if !self.draw(device, program, source, framebuffer, layer.texture) {
            return Handled::Yes;
        }

        ctx.post_event(Message::new(EventId::Timestamp).with_arg2(msg.arg2()));
        let flags = RenderFlags::default().with_transparent(true);
        ctx.post_event(Message::new(EventId::CommonInvalidate).with_arg1(flags.bits()));
        Handled::Yes
    }

    fn request_layer(&mut self, ctx: &UnitContext<'_>) {
        if !self.layer_requested {
            if !self.camera_size.is_valid() {
                log::debug!("{}: camera size unknown, no layer requested.", self.alias);
                return;
            }
            ctx.post_event(Message::new(EventId::LayerAddEmpty).with_owned(self.camera_size));
            self.layer_requested = true;
        }
        let device = ctx.device();
        if let Err(e) = self.framebuffer.get_or_create(|| device.create_framebuffer()) {
            log::warn!("{}: failed to create render target: {e}", self.alias);
        }
    }

    fn draw(
        &self,
        device: &dyn RenderDevice,
        program: ProgramId,
        source: TextureId,
        framebuffer: FramebufferId,
        target: TextureHandle,
    ) -> bool {
        if let Err(e) = device.bind_framebuffer(framebuffer, target.id) {
            log::warn!("{}: cannot bind layer texture: {e}", self.alias);
            return false;
        }
        device.set_viewport(target.size);
        device.clear(self.config.clear_color);
        let drawn = device.draw(program, source);
        if let Err(e) = device.unbind_framebuffer(framebuffer) {
            log::warn!("{}: failed to unbind render target: {e}", self.alias);
        }
        match drawn {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}: camera copy failed: {e}", self.alias);
                false
            }
        }
    }

    fn on_update_size(&mut self, msg: &Message, _ctx: &mut UnitContext<'_>) -> Handled {
        match msg.obj::<Size>().and_then(|size| size.validated()) {
            Some(size) => self.camera_size = size,
            None => log::debug!("{}: invalid camera size ignored.", self.alias),
        }
        Handled::Yes
    }

    fn on_run(&mut self, msg: &Message, ctx: &mut UnitContext<'_>) -> Handled {
        match msg.obj::<RenderTask>() {
            Some(task) => {
                if !task.run(ctx.device()) {
                    log::warn!("{}: render task already ran.", self.alias);
                }
            }
            None => log::warn!("{}: run message without a task.", self.alias),
        }
        Handled::Yes
    }

    fn on_layer_notify(&mut self, msg: &Message, ctx: &mut UnitContext<'_>) -> Handled {
        if let Some(layer) = self.layer {
            log::trace!(
                "{}: already drawing into layer {}, notify for {} ignored.",
                self.alias,
                layer.id,
                msg.arg1()
            );
            return Handled::Yes;
        }
        let Some(texture) = msg.obj::<TextureHandle>().copied() else {
            log::warn!("{}: layer notify without a texture.", self.alias);
            return Handled::Yes;
        };
        let Some(scale) = cover_scale(self.camera_size, texture.size) else {
            log::warn!(
                "{}: cannot fit {} camera into {} layer, not wrapped.",
                self.alias,
                self.camera_size,
                texture.size
            );
            return Handled::Yes;
        };

        let id = msg.arg1();
        self.layer = Some(LayerBinding { id, texture });
        log::info!("{}: drawing into layer {id}.", self.alias);
        let correction = LayerScale {
            layer_id: id,
            scale: Vec2::new(scale, -scale),
            anchor: Vec2::ZERO,
        };
        ctx.post_event(
            Message::new(EventId::LayerScale)
                .with_arg1(id)
                .with_owned(correction),
        );
        Handled::Yes
    }

    /// Drops the binding when its layer is evicted, so the next tick asks
    /// for a new one.
    fn on_layer_removed(&mut self, msg: &Message, _ctx: &mut UnitContext<'_>) -> Handled {
        if self.layer.is_some_and(|layer| layer.id == msg.arg1()) {
            log::info!("{}: layer {} removed, unwrapped.", self.alias, msg.arg1());
            self.layer = None;
            self.layer_requested = false;
        }
        Handled::Yes
    }

    fn on_output_size(&mut self, msg: &Message, _ctx: &mut UnitContext<'_>) -> Handled {
        match msg.obj::<Size>().and_then(|size| size.validated()) {
            Some(size) => {
                self.output_size = size;
                log::info!("{}: output size {size}.", self.alias);
            }
            None => log::debug!("{}: invalid output size ignored.", self.alias),
        }
        Handled::Yes
    }
}

impl Unit for CameraInputUnit {
    fn alias(&self) -> &str {
        &self.alias
    }

    fn subscriptions(&self) -> Vec<EventId> {
        self.handlers.events()
    }

    fn on_create(&mut self, ctx: &mut UnitContext<'_>) -> Handled {
        log::info!("{}: create.", self.alias);
        let device = ctx.device();
        if let Err(e) = self.program.get_or_create(|| device.create_program(&copy_program())) {
            log::error!("{}: failed to build copy program: {e}", self.alias);
        }
        match self.source.get_or_create(|| device.create_external_texture()) {
            Ok(texture) => {
                ctx.post_event(Message::new(EventId::CameraOesTextureNotify).with_owned(texture));
            }
            Err(e) => log::error!("{}: failed to create camera texture: {e}", self.alias),
        }
        Handled::Yes
    }

    fn on_destroy(&mut self, ctx: &mut UnitContext<'_>) -> Handled {
        log::info!("{}: destroy.", self.alias);
        let device = ctx.device();
        self.source.release(|id| device.destroy_texture(id));
        self.framebuffer.release(|id| device.destroy_framebuffer(id));
        self.program.release(|id| device.destroy_program(id));
        self.layer = None;
        Handled::Yes
    }

    fn on_event(&mut self, msg: &Message, ctx: &mut UnitContext<'_>) -> Handled {
        match self.handlers.get(msg.what()) {
            Some(handler) => handler(self, msg, ctx),
            None => Handled::No,
        }
    }
}

impl std::fmt::Debug for CameraInputUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraInputUnit")
            .field("alias", &self.alias)
            .field("camera_size", &self.camera_size)
            .field("layer", &self.layer_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::event::Router;
    use strata_infra::{DeviceCommand, HeadlessDevice};

    fn deliver(unit: &mut CameraInputUnit, router: &Router, device: &HeadlessDevice, msg: Message) {
        let alias = unit.alias().to_string();
        let mut ctx = UnitContext::new(&alias, router, device);
        unit.on_event(&msg, &mut ctx);
    }

    fn created(router: &Router, device: &HeadlessDevice) -> CameraInputUnit {
        let mut unit = CameraInputUnit::new("camera", CameraConfig::default());
        let mut ctx = UnitContext::new("camera", router, device);
        unit.on_create(&mut ctx);
        unit
    }

    #[test]
    fn create_announces_the_external_texture() {
        let router = Router::new();
        let tap = router.tap();
        let device = HeadlessDevice::new();
        let unit = created(&router, &device);

        let msg = tap.try_recv().expect("texture notify");
        assert_eq!(msg.what(), EventId::CameraOesTextureNotify);
        assert_eq!(msg.obj::<TextureId>().copied(), unit.source_texture());
        assert_eq!(device.live_programs(), 1);
    }

    #[test]
    fn zero_sizes_are_ignored() {
        let router = Router::new();
        let device = HeadlessDevice::new();
        let mut unit = created(&router, &device);

        let size_msg = |w, h| Message::new(EventId::CameraUpdateSize).with_owned(Size::new(w, h));
        deliver(&mut unit, &router, &device, size_msg(640, 480));
        deliver(&mut unit, &router, &device, size_msg(0, 480));
        deliver(&mut unit, &router, &device, size_msg(640, 0));
        assert_eq!(unit.camera_size(), Size::new(640, 480));

        let out_msg = |w, h| Message::new(EventId::VideoOutputSize).with_owned(Size::new(w, h));
        deliver(&mut unit, &router, &device, out_msg(-1, 10));
        assert_eq!(unit.output_size(), Size::default());
        deliver(&mut unit, &router, &device, out_msg(720, 1280));
        assert_eq!(unit.output_size(), Size::new(720, 1280));
    }

    #[test]
    fn run_executes_the_task_on_the_unit_device() {
        let router = Router::new();
        let device = HeadlessDevice::new();
        let mut unit = created(&router, &device);
        device.take_commands();

        let msg = Message::new(EventId::CameraRun)
            .with_owned(RenderTask::new(|device| device.clear([1.0; 4])));
        deliver(&mut unit, &router, &device, msg);
        assert_eq!(device.commands(), vec![DeviceCommand::Clear([1.0; 4])]);
    }

    #[test]
    fn destroy_releases_everything_once() {
        let router = Router::new();
        let device = HeadlessDevice::new();
        let mut unit = created(&router, &device);
        deliver(
            &mut unit,
            &router,
            &device,
            Message::new(EventId::CameraUpdateSize).with_owned(Size::new(4, 4)),
        );
        deliver(&mut unit, &router, &device, Message::new(EventId::CameraInvalidate));
        assert_eq!(device.live_framebuffers(), 1);

        let mut ctx = UnitContext::new("camera", &router, &device);
        unit.on_destroy(&mut ctx);
        unit.on_destroy(&mut ctx);
        assert!(device.is_clean());
    }

    #[test]
    fn destroy_tolerates_a_failed_create() {
        let router = Router::new();
        let device = HeadlessDevice::new().with_failing_programs();
        let mut unit = created(&router, &device);
        assert_eq!(device.live_programs(), 0);

        let mut ctx = UnitContext::new("camera", &router, &device);
        unit.on_destroy(&mut ctx);
        assert!(device.is_clean());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: CameraConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CameraConfig::default());
        let config: CameraConfig = serde_json::from_str(r#"{"clear_color":[0,0,0,1]}"#).unwrap();
        assert_eq!(config.clear_color, [0.0, 0.0, 0.0, 1.0]);
    }
}
