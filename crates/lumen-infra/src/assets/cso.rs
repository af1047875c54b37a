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

//! Compiled shader object (`.cso`) files.

use lumen_core::renderer::{ShaderBytecode, ShaderSource, ShaderStage};
use lumen_core::{RenderConfig, RenderError};
use std::path::{Path, PathBuf};

/// Reads precompiled bytecode for each stage from its own file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsoShaderSource {
    vertex: PathBuf,
    pixel: PathBuf,
}

impl CsoShaderSource {
    /// A source reading the two given files.
    pub fn new(vertex: impl Into<PathBuf>, pixel: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            pixel: pixel.into(),
        }
    }

    /// The shader paths named by `config`.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(&config.vertex_shader, &config.pixel_shader)
    }

    /// The file read for `stage`.
    pub fn path(&self, stage: ShaderStage) -> &Path {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Pixel => &self.pixel,
        }
    }
}

impl ShaderSource for CsoShaderSource {
    fn load(&self, stage: ShaderStage) -> Result<ShaderBytecode, RenderError> {
        let path = self.path(stage);
        let origin = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|e| RenderError::ShaderLoadFailed {
            path: origin.clone(),
            reason: e.to_string(),
        })?;
        log::debug!("Loaded {} bytes of {stage} bytecode from '{origin}'", bytes.len());
        ShaderBytecode::new(stage, bytes, &origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_each_stage_from_its_file() {
        let dir = tempfile::tempdir().unwrap();
        let vs = dir.path().join("basic.vert.cso");
        let ps = dir.path().join("basic.frag.cso");
        fs::write(&vs, [0x44, 0x58, 0x42, 0x43, 1]).unwrap();
        fs::write(&ps, [0x44, 0x58, 0x42, 0x43]).unwrap();

        let source = CsoShaderSource::new(&vs, &ps);
        let vertex = source.load(ShaderStage::Vertex).unwrap();
        let pixel = source.load(ShaderStage::Pixel).unwrap();
        assert_eq!(vertex.len(), 5);
        assert_eq!(pixel.stage(), ShaderStage::Pixel);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.cso");
        let source = CsoShaderSource::new(&missing, &missing);

        match source.load(ShaderStage::Vertex) {
            Err(RenderError::ShaderLoadFailed { path, .. }) => {
                assert_eq!(path, missing.display().to_string())
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_a_load_failure() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let source = CsoShaderSource::new(file.path(), file.path());
        assert!(matches!(
            source.load(ShaderStage::Pixel),
            Err(RenderError::ShaderLoadFailed { .. })
        ));
    }

    #[test]
    fn config_paths_are_used() {
        let config = RenderConfig::default();
        let source = CsoShaderSource::from_config(&config);
        assert_eq!(source.path(ShaderStage::Vertex), Path::new("shaders/basic.vert.cso"));
        assert_eq!(source.path(ShaderStage::Pixel), Path::new("shaders/basic.frag.cso"));
    }
}
