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

//! The layer data model shared between the editor surface and the compositor.
//!
//! Models are editable metadata owned by the editor; the compositor only
//! ever reads them through a [`LayerSnapshot`] taken from a [`LayerStore`].

mod model;
mod store;

pub use self::model::{
    CanvasModel, FilterParams, LayerId, LayerModel, LayerPair, LayerScale, LayerTarget,
    LayerTransform,
};
pub use self::store::{LayerSnapshot, LayerStore};
