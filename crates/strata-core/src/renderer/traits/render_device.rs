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

use crate::math::{Mat4, Size};
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The GPU capability interface used by the compositing units.
///
/// Every call must be made from the thread that owns the rendering context;
/// other threads marshal work there through a render task.
pub trait RenderDevice: Send + Sync + Debug + 'static {
    /// Allocates a texture suitable for externally produced image data
    /// (camera driver, hardware decoder).
    /// ## Returns
    /// The id of the texture. Its size is defined by the producer.
    fn create_external_texture(&self) -> Result<TextureId, ResourceError>;

    /// Allocates a 2D texture.
    /// ## Arguments
    /// * `size` - The size of the texture. Must be valid.
    /// ## Errors
    /// * `ResourceError::InvalidSize` - If `size` is not strictly positive.
    fn create_texture(&self, size: Size) -> Result<TextureHandle, ResourceError>;

    /// Destroys a texture.
    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    /// Compiles and links a shader program.
    /// ## Arguments
    /// * `descriptor` - The sources and sampler kind of the program.
    /// ## Errors
    /// * `ResourceError::Shader` - If compilation or linking fails.
    fn create_program(&self, descriptor: &ProgramDescriptor<'_>)
        -> Result<ProgramId, ResourceError>;

    /// Destroys a shader program.
    fn destroy_program(&self, id: ProgramId) -> Result<(), ResourceError>;

    /// Uploads the texture-coordinate transform of a program.
    fn update_program_matrix(&self, program: ProgramId, matrix: &Mat4)
        -> Result<(), ResourceError>;

    /// Allocates an offscreen render target with no attachment.
    fn create_framebuffer(&self) -> Result<FramebufferId, ResourceError>;

    /// Destroys an offscreen render target.
    fn destroy_framebuffer(&self, id: FramebufferId) -> Result<(), ResourceError>;

    /// Attaches `target` to `framebuffer` and makes it the current destination.
    fn bind_framebuffer(
        &self,
        framebuffer: FramebufferId,
        target: TextureId,
    ) -> Result<(), ResourceError>;

    /// Restores the default destination.
    fn unbind_framebuffer(&self, framebuffer: FramebufferId) -> Result<(), ResourceError>;

    /// Sets the viewport of the current destination.
    fn set_viewport(&self, size: Size);

    /// Clears the current destination to `color`.
    fn clear(&self, color: [f32; 4]);

    /// Draws `source` through `program` into the current destination.
    fn draw(&self, program: ProgramId, source: TextureId) -> Result<(), ResourceError>;
}
