//! Registry configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! [map]
//! width = 200
//! height = 200
//!
//! [scan]
//! half_width = 3
//! half_height = 3
//! ```
//!
//! Every table and key is optional and falls back to the defaults above.

use std::path::{Path, PathBuf};

use fief_grid::{GridError, MapBounds};
use serde::{Deserialize, Serialize};

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The config file could not be read.
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		source: std::io::Error,
	},
	/// The config file is not valid TOML or has unknown keys.
	#[error("invalid config: {0}")]
	Parse(#[from] toml::de::Error),
	/// The map dimensions are unusable.
	#[error("invalid map dimensions: {0}")]
	Map(#[from] GridError),
}

/// World map dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
	pub width: u32,
	pub height: u32,
}

impl Default for MapConfig {
	fn default() -> Self {
		Self { width: 200, height: 200 }
	}
}

/// Half extents of the window used by [`CityRegistry::scan`](crate::CityRegistry::scan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
	pub half_width: u32,
	pub half_height: u32,
}

impl Default for ScanConfig {
	fn default() -> Self {
		Self {
			half_width: 3,
			half_height: 3,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	pub map: MapConfig,
	pub scan: ScanConfig,
}

impl RegistryConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		config.bounds()?;
		Ok(config)
	}

	/// Reads and validates a TOML config file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&source)
	}

	/// Map bounds described by this config.
	pub fn bounds(&self) -> Result<MapBounds, ConfigError> {
		Ok(MapBounds::new(self.map.width, self.map.height)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_uses_defaults() {
		let config = RegistryConfig::from_toml_str("").unwrap();
		assert_eq!(config, RegistryConfig::default());
		assert_eq!(config.map.width, 200);
		assert_eq!(config.scan.half_height, 3);
	}

	#[test]
	fn partial_tables_keep_remaining_defaults() {
		let config = RegistryConfig::from_toml_str("[map]\nwidth = 40\n").unwrap();
		assert_eq!(config.map, MapConfig { width: 40, height: 200 });
		assert_eq!(config.scan, ScanConfig::default());
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let err = RegistryConfig::from_toml_str("[map]\ndepth = 3\n").unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)), "{err}");
	}

	#[test]
	fn zero_dimension_is_rejected() {
		let err = RegistryConfig::from_toml_str("[map]\nheight = 0\n").unwrap_err();
		assert!(matches!(err, ConfigError::Map(GridError::EmptyDimension { axis: "height" })));
	}

	#[test]
	fn load_reports_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("absent.toml");
		let err = RegistryConfig::load(&path).unwrap_err();
		match err {
			ConfigError::Io { path: reported, source } => {
				assert_eq!(reported, path);
				assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn load_reads_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("fief.toml");
		std::fs::write(&path, "[scan]\nhalf_width = 5\nhalf_height = 1\n").unwrap();
		let config = RegistryConfig::load(&path).unwrap();
		assert_eq!(config.scan, ScanConfig { half_width: 5, half_height: 1 });
	}
}
