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

//! Opaque compiled shader bytecode and where it comes from.

use crate::renderer::error::RenderError;
use std::fmt;

/// The programmable stages the pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Pixel (fragment) shader.
    Pixel,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Pixel => f.write_str("pixel"),
        }
    }
}

/// Compiled shader bytecode. Never empty.
///
/// The contents are whatever the platform shader compiler emitted; nothing here
/// looks inside them.
#[derive(Clone, PartialEq, Eq)]
pub struct ShaderBytecode {
    stage: ShaderStage,
    bytes: Vec<u8>,
}

impl ShaderBytecode {
    /// Wraps `bytes` for `stage`. `origin` names the file or label in the error
    /// returned for empty bytecode.
    pub fn new(stage: ShaderStage, bytes: Vec<u8>, origin: &str) -> Result<Self, RenderError> {
        if bytes.is_empty() {
            return Err(RenderError::ShaderLoadFailed {
                path: origin.to_string(),
                reason: format!("{stage} shader bytecode is empty"),
            });
        }
        Ok(Self { stage, bytes })
    }

    /// The stage this bytecode was compiled for.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` when there are no bytes, which [`ShaderBytecode::new`] never allows.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ShaderBytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderBytecode")
            .field("stage", &self.stage)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Supplies compiled bytecode for each stage.
pub trait ShaderSource {
    /// Loads the bytecode for `stage`. Missing, unreadable or empty bytecode is a
    /// [`RenderError::ShaderLoadFailed`].
    fn load(&self, stage: ShaderStage) -> Result<ShaderBytecode, RenderError>;
}

/// Bytecode already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShaderSource {
    /// Vertex stage bytes.
    pub vertex: Vec<u8>,
    /// Pixel stage bytes.
    pub pixel: Vec<u8>,
}

impl InMemoryShaderSource {
    /// Creates a source from the two stages' bytes.
    pub fn new(vertex: impl Into<Vec<u8>>, pixel: impl Into<Vec<u8>>) -> Self {
        Self {
            vertex: vertex.into(),
            pixel: pixel.into(),
        }
    }
}

impl ShaderSource for InMemoryShaderSource {
    fn load(&self, stage: ShaderStage) -> Result<ShaderBytecode, RenderError> {
        let bytes = match stage {
            ShaderStage::Vertex => self.vertex.clone(),
            ShaderStage::Pixel => self.pixel.clone(),
        };
        ShaderBytecode::new(stage, bytes, &format!("<in-memory {stage} shader>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bytecode_is_a_load_failure() {
        let source = InMemoryShaderSource::new(vec![0x44, 0x58, 0x42, 0x43], Vec::new());

        let vs = source.load(ShaderStage::Vertex).unwrap();
        assert_eq!(vs.len(), 4);
        assert_eq!(vs.stage(), ShaderStage::Vertex);

        let err = source.load(ShaderStage::Pixel).unwrap_err();
        match err {
            RenderError::ShaderLoadFailed { path, reason } => {
                assert_eq!(path, "<in-memory pixel shader>");
                assert!(reason.contains("empty"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
