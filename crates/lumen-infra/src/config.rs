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

//! Loading of the render configuration from a RON file.

use lumen_core::{RenderConfig, RenderError};
use std::io::ErrorKind;
use std::path::Path;

/// The file read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "lumen.ron";

/// Loads and validates the render configuration.
///
/// Reads `path`, or [`DEFAULT_CONFIG_FILE`] in the working directory when `path` is
/// `None`. A missing file yields the defaults. An unreadable or malformed file, or
/// settings that fail [`RenderConfig::validate`], are
/// [`RenderError::InvalidConfiguration`].
pub fn load_render_config(path: Option<&Path>) -> Result<RenderConfig, RenderError> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let config = match std::fs::read_to_string(path) {
        Ok(text) => {
            log::info!("Loading render configuration from '{}'", path.display());
            parse_render_config(&text).map_err(|e| match e {
                RenderError::InvalidConfiguration(reason) => RenderError::InvalidConfiguration(
                    format!("{}: {reason}", path.display()),
                ),
                other => other,
            })?
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!(
                "No configuration file at '{}', using defaults",
                path.display()
            );
            RenderConfig::default()
        }
        Err(e) => {
            return Err(RenderError::InvalidConfiguration(format!(
                "cannot read '{}': {e}",
                path.display()
            )))
        }
    };
    config.validate()?;
    Ok(config)
}

/// Parses a RON document into a configuration, without validating it.
pub fn parse_render_config(text: &str) -> Result<RenderConfig, RenderError> {
    ron::from_str(text).map_err(|e| RenderError::InvalidConfiguration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_render_config(Some(&dir.path().join("absent.ron"))).unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn partial_file_overrides_named_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(frame_count: 3, clear_color: (0.0, 0.0, 0.0, 1.0))").unwrap();

        let config = load_render_config(Some(file.path())).unwrap();
        assert_eq!(config.frame_count, 3);
        assert_eq!(config.clear_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(config.width, 640);
    }

    #[test]
    fn malformed_file_is_rejected_with_its_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(frame_count: \"five\")").unwrap();

        let err = load_render_config(Some(file.path())).unwrap_err();
        match err {
            RenderError::InvalidConfiguration(reason) => {
                assert!(reason.contains(&file.path().display().to_string()))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn out_of_range_settings_fail_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(frame_count: 1)").unwrap();
        assert!(matches!(
            load_render_config(Some(file.path())),
            Err(RenderError::InvalidConfiguration(_))
        ));
    }
}
