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

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use strata_core::math::{Mat4, Size};
use strata_core::renderer::{
    FramebufferId, ProgramDescriptor, ProgramId, RenderDevice, ResourceError, TextureHandle,
    TextureId,
};

/// One call made on a [`HeadlessDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    /// An external texture was allocated.
    CreateExternalTexture(TextureId),
    /// A 2D texture was allocated.
    CreateTexture(TextureHandle),
    /// A texture was destroyed.
    DestroyTexture(TextureId),
    /// A program was built.
    CreateProgram(ProgramId),
    /// A program was destroyed.
    DestroyProgram(ProgramId),
    /// A program's texture matrix was uploaded.
    UpdateProgramMatrix(ProgramId, Mat4),
    /// A render target was allocated.
    CreateFramebuffer(FramebufferId),
    /// A render target was destroyed.
    DestroyFramebuffer(FramebufferId),
    /// A render target was bound to a texture.
    BindFramebuffer(FramebufferId, TextureId),
    /// A render target was unbound.
    UnbindFramebuffer(FramebufferId),
    /// The viewport was set.
    Viewport(Size),
    /// The current destination was cleared.
    Clear([f32; 4]),
    /// A texture was drawn through a program.
    Draw(ProgramId, TextureId),
}

#[derive(Debug, Default)]
struct DeviceState {
    next_id: usize,
    textures: HashMap<TextureId, Option<Size>>,
    /// Live programs and the uniform bytes last uploaded to each.
    programs: HashMap<ProgramId, Vec<u8>>,
    framebuffers: HashMap<FramebufferId, Option<TextureId>>,
    bound: Option<FramebufferId>,
    commands: Vec<DeviceCommand>,
}

impl DeviceState {
    fn next(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }
}

/// A headless [`RenderDevice`]. See the module documentation.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    state: Mutex<DeviceState>,
    fail_programs: bool,
}

impl HeadlessDevice {
    /// Creates a device with no live resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every program build fail, to exercise partial creation paths.
    pub fn with_failing_programs(mut self) -> Self {
        self.fail_programs = true;
        self
    }

    fn state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the recorded command stream.
    pub fn commands(&self) -> Vec<DeviceCommand> {
        self.state().commands.clone()
    }

    /// Returns and clears the recorded command stream.
    pub fn take_commands(&self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.state().commands)
    }

    /// Number of live textures, external ones included.
    pub fn live_textures(&self) -> usize {
        self.state().textures.len()
    }

    /// Number of live programs.
    pub fn live_programs(&self) -> usize {
        self.state().programs.len()
    }

    /// Number of live render targets.
    pub fn live_framebuffers(&self) -> usize {
        self.state().framebuffers.len()
    }

    /// Returns `true` if every allocated resource has been destroyed.
    pub fn is_clean(&self) -> bool {
        let state = self.state();
        state.textures.is_empty() && state.programs.is_empty() && state.framebuffers.is_empty()
    }

    /// The uniform block last uploaded to `program`, if it is live.
    pub fn program_uniforms(&self, program: ProgramId) -> Option<Vec<u8>> {
        self.state().programs.get(&program).cloned()
    }

    /// Number of recorded draw calls.
    pub fn draw_count(&self) -> usize {
        self.state()
            .commands
            .iter()
            .filter(|c| matches!(c, DeviceCommand::Draw(..)))
            .count()
    }
}

impl RenderDevice for HeadlessDevice {
    fn create_external_texture(&self) -> Result<TextureId, ResourceError> {
        let mut state = self.state();
        let id = TextureId(state.next());
        state.textures.insert(id, None);
        state.commands.push(DeviceCommand::CreateExternalTexture(id));
        Ok(id)
    }

    fn create_texture(&self, size: Size) -> Result<TextureHandle, ResourceError> {
        if !size.is_valid() {
            return Err(ResourceError::InvalidSize(size));
        }
        let mut state = self.state();
        let handle = TextureHandle::new(TextureId(state.next()), size);
        state.textures.insert(handle.id, Some(size));
        state.commands.push(DeviceCommand::CreateTexture(handle));
        Ok(handle)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        let mut state = self.state();
        state
            .textures
            .remove(&id)
            .ok_or(ResourceError::InvalidHandle)?;
        state.commands.push(DeviceCommand::DestroyTexture(id));
        Ok(())
    }

    fn create_program(
        &self,
        descriptor: &ProgramDescriptor<'_>,
    ) -> Result<ProgramId, ResourceError> {
        let label = descriptor.label.unwrap_or("unnamed").to_string();
        if self.fail_programs {
            return Err(ResourceError::Shader {
                label,
                details: "compilation disabled on this device".into(),
            });
        }
        if descriptor.vertex.trim().is_empty() || descriptor.fragment.trim().is_empty() {
            return Err(ResourceError::Shader {
                label,
                details: "empty shader stage".into(),
            });
        }
        let mut state = self.state();
        let id = ProgramId(state.next());
        state.programs.insert(id, Vec::new());
        state.commands.push(DeviceCommand::CreateProgram(id));
        log::trace!("HeadlessDevice: built program '{label}' as {id:?}.");
        Ok(id)
    }

    fn destroy_program(&self, id: ProgramId) -> Result<(), ResourceError> {
        let mut state = self.state();
        state
            .programs
            .remove(&id)
            .ok_or(ResourceError::InvalidHandle)?;
        state.commands.push(DeviceCommand::DestroyProgram(id));
        Ok(())
    }

    fn update_program_matrix(
        &self,
        program: ProgramId,
        matrix: &Mat4,
    ) -> Result<(), ResourceError> {
        let mut state = self.state();
        let uniforms = state
            .programs
            .get_mut(&program)
            .ok_or(ResourceError::InvalidHandle)?;
        *uniforms = matrix.as_bytes().to_vec();
        state
            .commands
            .push(DeviceCommand::UpdateProgramMatrix(program, *matrix));
        Ok(())
    }

    fn create_framebuffer(&self) -> Result<FramebufferId, ResourceError> {
        let mut state = self.state();
        let id = FramebufferId(state.next());
        state.framebuffers.insert(id, None);
        state.commands.push(DeviceCommand::CreateFramebuffer(id));
        Ok(id)
    }

    fn destroy_framebuffer(&self, id: FramebufferId) -> Result<(), ResourceError> {
        let mut state = self.state();
        state
            .framebuffers
            .remove(&id)
            .ok_or(ResourceError::InvalidHandle)?;
        if state.bound == Some(id) {
            state.bound = None;
        }
        state.commands.push(DeviceCommand::DestroyFramebuffer(id));
        Ok(())
    }

    fn bind_framebuffer(
        &self,
        framebuffer: FramebufferId,
        target: TextureId,
    ) -> Result<(), ResourceError> {
        let mut state = self.state();
        match state.textures.get(&target) {
            None => return Err(ResourceError::InvalidHandle),
            Some(None) => {
                return Err(ResourceError::Unsupported(
                    "external textures cannot be render targets",
                ))
            }
            Some(Some(_)) => {}
        }
        let attachment = state
            .framebuffers
            .get_mut(&framebuffer)
            .ok_or(ResourceError::InvalidHandle)?;
        *attachment = Some(target);
        state.bound = Some(framebuffer);
        state
            .commands
            .push(DeviceCommand::BindFramebuffer(framebuffer, target));
        Ok(())
    }

    fn unbind_framebuffer(&self, framebuffer: FramebufferId) -> Result<(), ResourceError> {
        let mut state = self.state();
        if !state.framebuffers.contains_key(&framebuffer) {
            return Err(ResourceError::InvalidHandle);
        }
        state.bound = None;
        state
            .commands
            .push(DeviceCommand::UnbindFramebuffer(framebuffer));
        Ok(())
    }

    fn set_viewport(&self, size: Size) {
        self.state().commands.push(DeviceCommand::Viewport(size));
    }

    fn clear(&self, color: [f32; 4]) {
        self.state().commands.push(DeviceCommand::Clear(color));
    }

    fn draw(&self, program: ProgramId, source: TextureId) -> Result<(), ResourceError> {
        let mut state = self.state();
        if !state.programs.contains_key(&program) || !state.textures.contains_key(&source) {
            return Err(ResourceError::InvalidHandle);
        }
        state.commands.push(DeviceCommand::Draw(program, source));
        Ok(())
    }
}
