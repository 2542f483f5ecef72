use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// Fractional activity thresholds used by region processing.
///
/// These are calibration parameters, not constants of the geometry: a tower
/// counts as active when its energy exceeds `activity_fraction` of the
/// region total, and the EG/Tau vetoes additionally fire when the
/// non-electromagnetic (respectively non-active) energy share exceeds its
/// fraction of the region total. The current calibration applies the same
/// 10% everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calibration {
    pub activity_fraction: f64,
    pub ecal_activity_fraction: f64,
    pub misc_activity_fraction: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            activity_fraction: 0.1,
            ecal_activity_fraction: 0.1,
            misc_activity_fraction: 0.1,
        }
    }
}

/// Run parameters for the randomized exerciser.
///
/// Serializable to YAML so a run can be reproduced from its config file;
/// the RNG seed makes the generated event sequence deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatorConfig {
    pub run_number: u32,
    pub n_events: u32,
    pub mean_ecal_towers: f64,
    pub mean_hcal_towers: f64,
    pub seed: u64,
    pub capture_path: Option<PathBuf>,
    pub calibration: Calibration,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            run_number: 1,
            n_events: 100,
            mean_ecal_towers: 100.0,
            mean_hcal_towers: 100.0,
            seed: 0,
            capture_path: None,
            calibration: Calibration::default(),
        }
    }
}

impl EmulatorConfig {
    /// Read the configuration from a YAML file
    /// Returns an EmulatorConfig if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_calibration_is_ten_percent() {
        let calib = Calibration::default();
        assert_eq!(calib.activity_fraction, 0.1);
        assert_eq!(calib.ecal_activity_fraction, 0.1);
        assert_eq!(calib.misc_activity_fraction, 0.1);
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = EmulatorConfig {
            run_number: 42,
            n_events: 500,
            seed: 7,
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: EmulatorConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.run_number, 42);
        assert_eq!(back.n_events, 500);
        assert_eq!(back.seed, 7);
        assert_eq!(back.calibration.activity_fraction, 0.1);
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let result = EmulatorConfig::read_config_file(Path::new("/no/such/config.yml"));
        assert!(matches!(result, Err(ConfigError::BadFilePath(_))));
    }
}
