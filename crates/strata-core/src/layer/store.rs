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

use super::LayerModel;
use std::sync::{Arc, PoisonError, RwLock};

/// An immutable, versioned view of the ordered layer-model list.
#[derive(Debug, Clone)]
pub struct LayerSnapshot {
    version: u64,
    models: Arc<[Arc<LayerModel>]>,
}

impl LayerSnapshot {
    fn new(version: u64, models: Vec<LayerModel>) -> Self {
        Self {
            version,
            models: models.into_iter().map(Arc::new).collect(),
        }
    }

    /// Monotonic version; bumped on every write to the store.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The models, bottom layer first.
    pub fn models(&self) -> &[Arc<LayerModel>] {
        &self.models
    }

    /// Number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if the snapshot holds no model.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for LayerSnapshot {
    fn default() -> Self {
        Self::new(0, Vec::new())
    }
}

/// The authoritative layer-model list, shared by handle.
///
/// Writers (the editor surface, an import) publish whole new lists; readers
/// take a [`LayerSnapshot`] and never observe a list half-way through an edit.
#[derive(Debug, Clone, Default)]
pub struct LayerStore {
    current: Arc<RwLock<LayerSnapshot>>,
}

impl LayerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `models`.
    pub fn with_models(models: Vec<LayerModel>) -> Self {
        Self {
            current: Arc::new(RwLock::new(LayerSnapshot::new(1, models))),
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> LayerSnapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the current version.
    pub fn version(&self) -> u64 {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .version
    }

    /// Publishes `models` as the new list and returns the new version.
    pub fn replace(&self, models: Vec<LayerModel>) -> u64 {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let version = current.version + 1;
        *current = LayerSnapshot::new(version, models);
        version
    }

    /// Edits a copy of the current list and publishes it. Returns the new version.
    pub fn edit(&self, f: impl FnOnce(&mut Vec<LayerModel>)) -> u64 {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut models: Vec<LayerModel> =
            current.models.iter().map(|m| LayerModel::clone(m)).collect();
        f(&mut models);
        let version = current.version + 1;
        *current = LayerSnapshot::new(version, models);
        version
    }
}
