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

//! The units of the compositing pipeline.
//!
//! - [`CameraInputUnit`] copies the external camera image into a layer texture
//!   and ticks the pipeline.
//! - [`LayerCompositorUnit`] reconciles the layer models with GPU layers through a
//!   [`LayerManager`] and issues the ordered per-layer render requests.

#![warn(missing_docs)]

pub mod camera_unit;
pub mod layer_unit;

pub use camera_unit::{CameraConfig, CameraInputUnit};
pub use layer_unit::{LayerCompositorUnit, LayerManager, LayerObject};
