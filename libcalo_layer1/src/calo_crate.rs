use super::card::CaloCard;
use super::config::Calibration;
use super::constants::*;
use super::coordinates::TowerCoord;
use super::error::{CrateError, GeometryError};
use super::geometry;

/// One hardware crate: a fixed set of cards spanning a 120-degree phi
/// wedge. The crate total is a plain accumulator over card totals.
#[derive(Debug, Clone)]
pub struct CaloCrate {
    crate_idx: u32,
    cards: Vec<CaloCard>,
    crate_summary: u32,
}

impl CaloCrate {
    pub fn new(crate_idx: u32, calibration: &Calibration) -> Result<Self, CrateError> {
        let mut cards = Vec::with_capacity(N_CARDS_IN_CRATE as usize);
        for card in 0..N_CARDS_IN_CRATE {
            cards.push(CaloCard::new(crate_idx, card, calibration)?);
        }
        Ok(Self {
            crate_idx,
            cards,
            crate_summary: 0,
        })
    }

    fn card_slot(&self, t: TowerCoord) -> Result<usize, CrateError> {
        let card = geometry::card_of(t.calo_eta, t.calo_phi)?;
        if card as usize >= self.cards.len() {
            return Err(GeometryError::InvalidCard(card).into());
        }
        Ok(card as usize)
    }

    pub fn clear_event(&mut self) {
        self.crate_summary = 0;
        for card in &mut self.cards {
            card.clear_event();
        }
    }

    pub fn set_ecal_data(
        &mut self,
        t: TowerCoord,
        fine_grain: bool,
        et: u32,
    ) -> Result<(), CrateError> {
        let slot = self.card_slot(t)?;
        Ok(self.cards[slot].set_ecal_data(t, fine_grain, et)?)
    }

    pub fn set_hcal_data(
        &mut self,
        t: TowerCoord,
        feature_bits: u32,
        et: u32,
    ) -> Result<(), CrateError> {
        let slot = self.card_slot(t)?;
        Ok(self.cards[slot].set_hcal_data(t, feature_bits, et)?)
    }

    pub fn set_event_data(
        &mut self,
        t: TowerCoord,
        fine_grain: bool,
        ecal_et: u32,
        feature_bits: u32,
        hcal_et: u32,
    ) -> Result<(), CrateError> {
        self.set_ecal_data(t, fine_grain, ecal_et)?;
        self.set_hcal_data(t, feature_bits, hcal_et)
    }

    pub fn process(&mut self) {
        self.crate_summary = 0;
        for card in &mut self.cards {
            card.process();
            self.crate_summary += card.et();
        }
    }

    /// Unsaturated sum of the owned cards' energies.
    pub fn et(&self) -> u32 {
        self.crate_summary
    }

    pub fn cards(&self) -> &[CaloCard] {
        &self.cards
    }

    pub fn card_at(&self, t: TowerCoord) -> Result<&CaloCard, CrateError> {
        let slot = self.card_slot(t)?;
        Ok(&self.cards[slot])
    }

    pub fn crate_idx(&self) -> u32 {
        self.crate_idx
    }
}
