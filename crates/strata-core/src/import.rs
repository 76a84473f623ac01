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

//! Contract for the project importer collaborator.
//!
//! Parsing project files is not part of the compositing core; the compositor
//! only consumes the result.

use crate::layer::{CanvasModel, LayerModel};
use std::path::{Path, PathBuf};

/// Errors an importer can report.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The file does not exist.
    #[error("project file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The file exists but could not be understood.
    #[error("failed to parse project: {0}")]
    Parse(String),
    /// Reading the file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A successfully parsed project.
#[derive(Debug, Clone)]
pub struct ImportedProject {
    /// The canvas description.
    pub canvas: CanvasModel,
    /// The layers, bottom first.
    pub layers: Vec<LayerModel>,
}

/// Parses a project file into a canvas and a layer list.
pub trait ProjectImporter: Send + Sync {
    /// Imports the project at `path`.
    fn import_from_file(&self, path: &Path) -> Result<ImportedProject, ImportError>;
}
