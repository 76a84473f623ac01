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

use super::api::*;
use super::{RenderDevice, ResourceError};
use crate::math::{Mat4, Size};

/// A device with no GPU behind it, for exercising units that never draw.
///
/// Every allocation fails with [`ResourceError::Unsupported`]; draw-state
/// calls are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NullDevice;

const REASON: &str = "null device";

impl RenderDevice for NullDevice {
    fn create_external_texture(&self) -> Result<TextureId, ResourceError> {
        Err(ResourceError::Unsupported(REASON))
    }

    fn create_texture(&self, _size: Size) -> Result<TextureHandle, ResourceError> {
        Err(ResourceError::Unsupported(REASON))
    }

    fn destroy_texture(&self, _id: TextureId) -> Result<(), ResourceError> {
        Err(ResourceError::InvalidHandle)
    }

    fn create_program(
        &self,
        _descriptor: &ProgramDescriptor<'_>,
    ) -> Result<ProgramId, ResourceError> {
        Err(ResourceError::Unsupported(REASON))
    }

    fn destroy_program(&self, _id: ProgramId) -> Result<(), ResourceError> {
        Err(ResourceError::InvalidHandle)
    }

    fn update_program_matrix(
        &self,
        _program: ProgramId,
        _matrix: &Mat4,
    ) -> Result<(), ResourceError> {
        Err(ResourceError::InvalidHandle)
    }

    fn create_framebuffer(&self) -> Result<FramebufferId, ResourceError> {
        Err(ResourceError::Unsupported(REASON))
    }

    fn destroy_framebuffer(&self, _id: FramebufferId) -> Result<(), ResourceError> {
        Err(ResourceError::InvalidHandle)
    }

    fn bind_framebuffer(
        &self,
        _framebuffer: FramebufferId,
        _target: TextureId,
    ) -> Result<(), ResourceError> {
        Err(ResourceError::InvalidHandle)
    }

    fn unbind_framebuffer(&self, _framebuffer: FramebufferId) -> Result<(), ResourceError> {
        Err(ResourceError::InvalidHandle)
    }

    fn set_viewport(&self, _size: Size) {}

    fn clear(&self, _color: [f32; 4]) {}

    fn draw(&self, _program: ProgramId, _source: TextureId) -> Result<(), ResourceError> {
        Err(ResourceError::InvalidHandle)
    }
}
