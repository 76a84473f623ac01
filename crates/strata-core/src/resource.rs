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

//! Typed lifecycle for GPU resources owned by units.

use crate::renderer::ResourceError;

/// A GPU resource slot with an explicit lifecycle.
///
/// `Uncreated -> Ready -> Released`. A released slot cannot be acquired
/// again; releasing twice, or releasing a slot that was never created, is a
/// no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuResource<T> {
    /// Not allocated yet.
    #[default]
    Uncreated,
    /// Allocated and usable.
    Ready(T),
    /// Released; any further use is an error.
    Released,
}

impl<T: Copy> GpuResource<T> {
    /// Returns the handle if the resource is ready.
    pub fn get(&self) -> Option<T> {
        match self {
            GpuResource::Ready(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Returns `true` if the resource is ready.
    pub fn is_ready(&self) -> bool {
        matches!(self, GpuResource::Ready(_))
    }

    /// Returns `true` if the resource has been released.
    pub fn is_released(&self) -> bool {
        matches!(self, GpuResource::Released)
    }

    /// Returns the handle, creating it with `create` if the slot is still uncreated.
    ///
    /// A failed creation leaves the slot `Uncreated` so a later call can retry.
    pub fn get_or_create(
        &mut self,
        create: impl FnOnce() -> Result<T, ResourceError>,
    ) -> Result<T, ResourceError> {
        match self {
            GpuResource::Ready(handle) => Ok(*handle),
            GpuResource::Released => Err(ResourceError::Released),
            GpuResource::Uncreated => {
                let handle = create()?;
                *self = GpuResource::Ready(handle);
                Ok(handle)
            }
        }
    }

    /// Releases the resource with `destroy` if it is ready and marks the slot released.
    ///
    /// Destruction failures are logged, never propagated. Returns `true` if
    /// `destroy` was called.
    pub fn release(&mut self, destroy: impl FnOnce(T) -> Result<(), ResourceError>) -> bool {
        let previous = std::mem::replace(self, GpuResource::Released);
        match previous {
            GpuResource::Ready(handle) => {
                if let Err(e) = destroy(handle) {
                    log::warn!("Failed to release GPU resource: {e}");
                }
                true
            }
            _ => false,
        }
    }
}
