use std::path::PathBuf;
use thiserror::Error;

use super::constants::*;
use super::coordinates::{RegionCoord, TowerCoord};

/// Addressing inconsistency detected by the geometry mapper.
///
/// Every index handled here derives from the fixed detector geometry, so a
/// violation means the mapping tables themselves are inconsistent. Nothing
/// at event scope can repair that; callers should treat this class as
/// unrecoverable and stop feeding the affected tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Invalid calo eta {0}; legal values are +/-1..=+/-{max} excluding +/-{unused}", max = MAX_CALO_ETA, unused = UNUSED_CALO_ETA)]
    InvalidCaloEta(i32),
    #[error("Invalid calo phi {1} at calo eta {0}")]
    InvalidCaloPhi(i32, i32),
    #[error("Invalid crate index {0}; expected 0..={max}", max = N_CRATES - 1)]
    InvalidCrate(u32),
    #[error("Invalid card index {0}; expected 0..={max}", max = N_CARDS_IN_CRATE - 1)]
    InvalidCard(u32),
    #[error("Invalid region index {0}; expected 0..={max}", max = N_REGIONS_TOTAL - 1)]
    InvalidRegion(u32),
    #[error("Invalid local eta index {1} in region {0}")]
    InvalidEtaIndex(u32, u32),
    #[error("Invalid local phi index {1} in region {0}")]
    InvalidPhiIndex(u32, u32),
    #[error("Invalid region grid coordinate {0}")]
    InvalidRegionCoord(RegionCoord),
}

#[derive(Debug, Error)]
pub enum RegionError {
    #[error("Region addressing failed due to geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

#[derive(Debug, Error)]
pub enum CardError {
    #[error("Card addressing failed due to geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Card failed due to region error: {0}")]
    Region(#[from] RegionError),
}

#[derive(Debug, Error)]
pub enum CrateError {
    #[error("Crate addressing failed due to geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Crate failed due to card error: {0}")]
    Card(#[from] CardError),
}

#[derive(Debug, Error)]
pub enum Layer1Error {
    #[error("Layer1 addressing failed due to geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Layer1 failed due to crate error: {0}")]
    Crate(#[from] CrateError),
    #[error("Layer1 failed due to card error: {0}")]
    Card(#[from] CardError),
    #[error("Layer1 failed due to region error: {0}")]
    Region(#[from] RegionError),
    #[error("Tower data for {0} arrived after process; clear_event must run before loading the next event")]
    LoadAfterProcess(TowerCoord),
    #[error("process called twice without an intervening clear_event")]
    DoubleProcess,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Capture stream failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Capture stream has bad magic {0:#010x}; this is not a capture file")]
    BadMagic(u32),
    #[error("Capture stream has unsupported format version {0}")]
    BadVersion(u16),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}
