use super::calo_crate::CaloCrate;
use super::card::CaloCard;
use super::config::Calibration;
use super::constants::*;
use super::coordinates::{RegionCoord, TowerCoord};
use super::error::{GeometryError, Layer1Error};
use super::geometry;
use super::region::CaloRegion;
use super::tower::CaloTower;

/// Where the tree sits in the per-event cycle.
///
/// `clear_event` must complete before any data load, and all loads must
/// complete before `process`; running `process` twice without a clear would
/// double-count energy, so the phase flag refuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    Cleared,
    Loading,
    Processed,
}

/// Flat per-tower output record for the output-packaging stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowerRecord {
    pub coord: TowerCoord,
    pub raw_data: u16,
    pub et: u32,
    pub energy_ratio: u32,
    pub quality_bits: u32,
    pub ecal_et: u32,
    pub hcal_et: u32,
}

/// The top-level aggregation engine: three crates and the grand total.
///
/// The tree is built once per detector configuration and reused across
/// events; only the per-event state moves. One instance serves one
/// in-flight event at a time; concurrent workers should each own an
/// independent instance.
#[derive(Debug, Clone)]
pub struct CaloLayer1 {
    crates: Vec<CaloCrate>,
    layer_summary: u32,
    phase: EventPhase,
}

impl CaloLayer1 {
    /// Build the full tree. The only failure mode is a geometry-table
    /// inconsistency, which is a configuration error, not a runtime one.
    pub fn new(calibration: &Calibration) -> Result<Self, Layer1Error> {
        let mut crates = Vec::with_capacity(N_CRATES as usize);
        for crate_idx in 0..N_CRATES {
            crates.push(CaloCrate::new(crate_idx, calibration)?);
        }
        Ok(Self {
            crates,
            layer_summary: 0,
            phase: EventPhase::Cleared,
        })
    }

    fn crate_slot(&self, t: TowerCoord) -> Result<usize, Layer1Error> {
        let crate_idx = geometry::crate_of(t.calo_eta, t.calo_phi)?;
        if crate_idx as usize >= self.crates.len() {
            return Err(GeometryError::InvalidCrate(crate_idx).into());
        }
        Ok(crate_idx as usize)
    }

    /// Reset all per-event state and return to the `Cleared` phase.
    pub fn clear_event(&mut self) -> Result<(), Layer1Error> {
        self.layer_summary = 0;
        for crt in &mut self.crates {
            crt.clear_event();
        }
        self.phase = EventPhase::Cleared;
        Ok(())
    }

    pub fn set_ecal_data(
        &mut self,
        t: TowerCoord,
        fine_grain: bool,
        et: u32,
    ) -> Result<(), Layer1Error> {
        if self.phase == EventPhase::Processed {
            return Err(Layer1Error::LoadAfterProcess(t));
        }
        let slot = self.crate_slot(t)?;
        self.crates[slot].set_ecal_data(t, fine_grain, et)?;
        self.phase = EventPhase::Loading;
        Ok(())
    }

    pub fn set_hcal_data(
        &mut self,
        t: TowerCoord,
        feature_bits: u32,
        et: u32,
    ) -> Result<(), Layer1Error> {
        if self.phase == EventPhase::Processed {
            return Err(Layer1Error::LoadAfterProcess(t));
        }
        let slot = self.crate_slot(t)?;
        self.crates[slot].set_hcal_data(t, feature_bits, et)?;
        self.phase = EventPhase::Loading;
        Ok(())
    }

    pub fn set_event_data(
        &mut self,
        t: TowerCoord,
        fine_grain: bool,
        ecal_et: u32,
        feature_bits: u32,
        hcal_et: u32,
    ) -> Result<(), Layer1Error> {
        self.set_ecal_data(t, fine_grain, ecal_et)?;
        self.set_hcal_data(t, feature_bits, hcal_et)
    }

    /// Run the bottom-up computation: towers, regions, cards, crates, then
    /// the grand total.
    pub fn process(&mut self) -> Result<(), Layer1Error> {
        if self.phase == EventPhase::Processed {
            return Err(Layer1Error::DoubleProcess);
        }
        self.layer_summary = 0;
        for crt in &mut self.crates {
            crt.process();
            self.layer_summary += crt.et();
        }
        self.phase = EventPhase::Processed;
        Ok(())
    }

    /// Unsaturated grand total over all crates.
    pub fn et(&self) -> u32 {
        self.layer_summary
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    pub fn crates(&self) -> &[CaloCrate] {
        &self.crates
    }

    pub fn card_at(&self, t: TowerCoord) -> Result<&CaloCard, Layer1Error> {
        let slot = self.crate_slot(t)?;
        Ok(self.crates[slot].card_at(t)?)
    }

    /// Region lookup by compact region-grid coordinate.
    pub fn region_at(&self, r: RegionCoord) -> Result<&CaloRegion, Layer1Error> {
        let corner = geometry::tower_coord_of(r, 0, 0)?;
        let card = self.card_at(corner)?;
        Ok(card.region_at(r)?)
    }

    /// Tower lookup by global coordinate.
    pub fn tower_at(&self, t: TowerCoord) -> Result<&CaloTower, Layer1Error> {
        let r = geometry::region_coord_of(t.calo_eta, t.calo_phi)?;
        let region = self.region_at(r)?;
        Ok(region.tower_at(t)?)
    }

    /// Walk every tower in the tree in deterministic hardware order,
    /// yielding the flat output record.
    pub fn tower_records(&self) -> impl Iterator<Item = TowerRecord> + '_ {
        self.crates
            .iter()
            .flat_map(|crt| crt.cards())
            .flat_map(|card| card.regions())
            .flat_map(|region| region.towers())
            .map(|tower| TowerRecord {
                coord: tower.tower_coord(),
                raw_data: tower.raw_data(),
                et: tower.et(),
                energy_ratio: tower.energy_ratio(),
                quality_bits: tower.quality_bits(),
                ecal_et: tower.ecal_et(),
                hcal_et: tower.hcal_et(),
            })
    }
}
