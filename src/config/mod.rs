//! Tracker configuration
//!
//! Selects the Earth model used for look angles and the ellipsoid used for
//! rigorous geocentric conversions. Every field has a default, so an empty
//! JSON object is a valid configuration:
//!
//! ```json
//! { "earth_model": "spherical",
//!   "ellipsoid": { "semi_major": 6378137.0, "semi_minor": 6356752.314245 } }
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::geodesy::{EarthModel, Ellipsoid};
use crate::{GeotrackerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub earth_model: EarthModel,
    pub ellipsoid: Ellipsoid,
}

impl TrackerConfig {
    /// Parses and validates a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TrackerConfig =
            serde_json::from_str(json).map_err(|e| GeotrackerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading tracker configuration from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        let errors = self.ellipsoid.parameter_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(GeotrackerError::Config(format!("invalid ellipsoid: {}", errors)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_object_is_default() {
        let config = TrackerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.earth_model, EarthModel::Oblate);
        assert_eq!(config.ellipsoid, Ellipsoid::WGS84);
    }

    #[test]
    fn test_spherical_model() {
        let config = TrackerConfig::from_json_str(r#"{"earth_model":"spherical"}"#).unwrap();
        assert_eq!(config.earth_model, EarthModel::Spherical);
    }

    #[test]
    fn test_rejects_bad_ellipsoid() {
        let json = r#"{"ellipsoid":{"semi_major":6000000.0,"semi_minor":6500000.0}}"#;
        match TrackerConfig::from_json_str(json) {
            Err(GeotrackerError::Config(message)) => assert!(message.contains("0x0010")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            TrackerConfig::from_json_str(r#"{"earth_model":"flat"}"#),
            Err(GeotrackerError::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"earth_model":"oblate"}}"#).unwrap();
        let config = TrackerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.earth_model, EarthModel::Oblate);
    }
}
