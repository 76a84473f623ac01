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

//! A JSON project importer for trying the import path by hand.

use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use strata_core::import::{ImportError, ImportedProject, ProjectImporter};
use strata_core::layer::{CanvasModel, LayerModel};

#[derive(Deserialize)]
struct ProjectFile {
    canvas: CanvasModel,
    layers: Vec<LayerModel>,
}

/// Reads `{ "canvas": {..}, "layers": [..] }` documents.
#[derive(Debug, Default)]
pub struct JsonImporter;

impl ProjectImporter for JsonImporter {
    fn import_from_file(&self, path: &Path) -> Result<ImportedProject, ImportError> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ImportError::NotFound(path.to_path_buf()),
            _ => ImportError::Io(e),
        })?;
        let file: ProjectFile =
            serde_json::from_str(&text).map_err(|e| ImportError::Parse(e.to_string()))?;
        Ok(ImportedProject {
            canvas: file.canvas,
            layers: file.layers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_a_project_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "canvas": {{ "size": {{ "width": 1080, "height": 1920 }}, "background": [0, 0, 0, 1] }},
                "layers": [
                    {{ "id": 1, "size": {{ "width": 1080, "height": 1920 }} }},
                    {{ "id": 4, "size": {{ "width": 512, "height": 512 }},
                       "filters": [{{ "name": "sepia", "intensity": 0.5 }}] }}
                ]
            }}"#
        )
        .unwrap();

        let project = JsonImporter.import_from_file(file.path()).unwrap();
        assert_eq!(project.canvas.size.width, 1080);
        assert_eq!(project.layers.len(), 2);
        assert_eq!(project.layers[1].filters[0].name, "sepia");
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = JsonImporter
            .import_from_file(Path::new("/definitely/not/here.json"))
            .unwrap_err();
        assert!(matches!(err, ImportError::NotFound(_)));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"canvas\": 3 }}").unwrap();
        let err = JsonImporter.import_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }
}
