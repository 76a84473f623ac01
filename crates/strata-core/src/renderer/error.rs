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

//! Error type for the rendering capability interface.

use crate::math::Size;

/// An error related to the creation or use of a GPU resource.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// A shader program failed to compile or link.
    #[error("shader program '{label}' failed to build: {details}")]
    Shader {
        /// Label of the program.
        label: String,
        /// Compiler or linker output.
        details: String,
    },
    /// A texture or target was requested with a non-positive size.
    #[error("invalid resource size {0}")]
    InvalidSize(Size),
    /// The handle used to reference a resource is not live.
    #[error("invalid or released resource handle")]
    InvalidHandle,
    /// The resource slot was already released and cannot be reused.
    #[error("resource already released")]
    Released,
    /// The operation is not supported by this device.
    #[error("operation not supported by this device: {0}")]
    Unsupported(&'static str),
    /// An error originating from the backend implementation.
    #[error("backend error: {0}")]
    Backend(String),
}
