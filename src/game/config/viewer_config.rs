//! Viewer Configuration
//!
//! Startup settings for the mountain viewer: the initial mountain
//! parameters, where the rock textures live and the window size. Read from
//! an optional JSON file; any missing field takes its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RidgelineError};
use crate::game::mountain::Parameters;

/// Texture directory used when the config does not name one
pub const DEFAULT_TEXTURE_DIR: &str = "textures";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Initial mountain parameters, stored at the top level of the file
    #[serde(flatten)]
    pub parameters: Parameters,
    /// Directory holding the `rock_06_*_4k.jpg` maps
    pub texture_dir: PathBuf,
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            parameters: Parameters::default(),
            texture_dir: PathBuf::from(DEFAULT_TEXTURE_DIR),
            window_width: 1280,
            window_height: 720,
            vsync: true,
        }
    }
}

impl ViewerConfig {
    /// Read a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RidgelineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| RidgelineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded viewer config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Config from the first CLI argument, or defaults when none is given
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        match args.nth(1) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_parameters_are_top_level() {
        let config = ViewerConfig::from_json(
            r#"{ "segments_width": 32, "mountain_height": 0.5, "texture_dir": "assets/rock" }"#,
        )
        .unwrap();
        assert_eq!(config.parameters.segments_width, 32);
        assert_eq!(config.parameters.mountain_height, 0.5);
        assert_eq!(config.parameters.plane_width, 5.0);
        assert_eq!(config.texture_dir, PathBuf::from("assets/rock"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ViewerConfig::load("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, RidgelineError::ConfigRead { .. }));
        assert!(err.to_string().contains("definitely/not/here.json"));
    }

    #[test]
    fn test_from_args_without_path() {
        let args = vec!["mountain_viewer".to_string()].into_iter();
        assert_eq!(ViewerConfig::from_args(args).unwrap(), ViewerConfig::default());
    }
}
