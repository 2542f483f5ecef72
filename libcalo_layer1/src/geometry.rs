//! Stateless mapping between global calorimeter coordinates and
//! hardware-local (crate, card, region, local eta, local phi) addresses.
//!
//! Global eta indices are signed, never zero, and |eta| runs to 41 with 29
//! unused; phi runs 1..=72 at full granularity, halved for forward towers
//! and quartered for the outermost pair. The forward lookups here fold that
//! non-uniformity into a single crate/card/region address space; the inverse
//! lookups undo it exactly, so the round trip is lossless for every legal
//! coordinate.
//!
//! Every function validates its inputs and reports violations as
//! [`GeometryError`]. Those errors mean the caller holds indices the fixed
//! geometry cannot produce, which is a configuration inconsistency rather
//! than a data-quality condition.

use super::constants::*;
use super::coordinates::{HardwareCoord, RegionCoord, TowerCoord};
use super::error::GeometryError;

/// Validate a global tower coordinate, including the per-sub-range phi
/// restrictions (forward phi tops out at 36, very-forward at 18).
pub fn check_tower_coord(calo_eta: i32, calo_phi: i32) -> Result<(), GeometryError> {
    let abs_eta = calo_eta.abs();
    if calo_eta == 0 || abs_eta == UNUSED_CALO_ETA || abs_eta > MAX_CALO_ETA {
        return Err(GeometryError::InvalidCaloEta(calo_eta));
    }
    let max_phi = if abs_eta >= VHF_CALO_ETA_START {
        MAX_CALO_PHI_IN_VHF
    } else if abs_eta >= HF_CALO_ETA_START {
        MAX_CALO_PHI_IN_HF
    } else {
        MAX_CALO_PHI
    };
    if calo_phi < 1 || calo_phi > max_phi {
        return Err(GeometryError::InvalidCaloPhi(calo_eta, calo_phi));
    }
    Ok(())
}

fn check_crate(crate_idx: u32) -> Result<(), GeometryError> {
    if crate_idx >= N_CRATES {
        return Err(GeometryError::InvalidCrate(crate_idx));
    }
    Ok(())
}

fn check_card(card: u32) -> Result<(), GeometryError> {
    if card >= N_CARDS_IN_CRATE {
        return Err(GeometryError::InvalidCard(card));
    }
    Ok(())
}

fn check_region(region: u32) -> Result<(), GeometryError> {
    if region >= N_REGIONS_TOTAL {
        return Err(GeometryError::InvalidRegion(region));
    }
    Ok(())
}

/// Validate a compact region-grid coordinate (eta +/-1..=+/-13, phi 1..=18).
pub fn check_region_coord(r: RegionCoord) -> Result<(), GeometryError> {
    if r.eta == 0 || r.eta.abs() > MAX_REGIONS_ETA || r.phi < 1 || r.phi > MAX_REGIONS_PHI {
        return Err(GeometryError::InvalidRegionCoord(r));
    }
    Ok(())
}

/// Towers per region along eta: 4 central, 2 forward.
pub fn n_eta(region: u32) -> Result<u32, GeometryError> {
    check_region(region)?;
    if region < HF_REGION_START {
        Ok(N_ETA_IN_REGION)
    } else {
        Ok(N_HF_ETA_IN_REGION)
    }
}

/// Towers per region along phi: 4 central, 2 forward, 1 very-forward.
pub fn n_phi(region: u32) -> Result<u32, GeometryError> {
    check_region(region)?;
    if region < HF_REGION_START {
        Ok(N_PHI_IN_REGION)
    } else if region < VHF_REGION_START {
        Ok(N_HF_PHI_IN_REGION)
    } else {
        Ok(N_VHF_PHI_IN_REGION)
    }
}

/// Phi collapse factor of a region's sub-range relative to full granularity.
fn phi_scale(region: u32) -> i32 {
    if region >= VHF_REGION_START {
        4
    } else if region >= HF_REGION_START {
        2
    } else {
        1
    }
}

/// Region index (0..=12) owning a global coordinate.
pub fn region_of(calo_eta: i32, calo_phi: i32) -> Result<u32, GeometryError> {
    check_tower_coord(calo_eta, calo_phi)?;
    let abs_eta = calo_eta.unsigned_abs();
    if abs_eta < HF_CALO_ETA_START as u32 {
        Ok((abs_eta - 1) / N_ETA_IN_REGION)
    } else {
        Ok(HF_REGION_START + (abs_eta - HF_CALO_ETA_START as u32) / N_HF_ETA_IN_REGION)
    }
}

/// Crate index (0..=2) owning a global coordinate.
pub fn crate_of(calo_eta: i32, calo_phi: i32) -> Result<u32, GeometryError> {
    let region = region_of(calo_eta, calo_phi)?;
    // Full-granularity phi decides the crate regardless of sub-range.
    let c_phi = calo_phi * phi_scale(region);
    match c_phi {
        13..=36 => Ok(0),
        37..=60 => Ok(2),
        1..=12 | 61..=72 => Ok(1),
        _ => Err(GeometryError::InvalidCaloPhi(calo_eta, calo_phi)),
    }
}

/// Card index (0..=5) owning a global coordinate.
pub fn card_of(calo_eta: i32, calo_phi: i32) -> Result<u32, GeometryError> {
    let region = region_of(calo_eta, calo_phi)?;
    let crate_idx = crate_of(calo_eta, calo_phi)?;
    let c_phi = calo_phi * phi_scale(region);
    let card = match crate_idx {
        0 => (c_phi - CRATE0_PHI_OFFSET) / 4,
        2 => (c_phi - CRATE2_PHI_OFFSET) / 4,
        1 if c_phi > 60 => (c_phi - CRATE1_HIGH_PHI_OFFSET) / 4,
        1 => (c_phi + CRATE1_LOW_PHI_PAD) / 4,
        _ => return Err(GeometryError::InvalidCrate(crate_idx)),
    };
    Ok(card as u32)
}

/// Local eta index of a global coordinate within its region.
pub fn local_eta_of(calo_eta: i32, calo_phi: i32) -> Result<u32, GeometryError> {
    check_tower_coord(calo_eta, calo_phi)?;
    let abs_eta = calo_eta.unsigned_abs();
    if abs_eta < HF_CALO_ETA_START as u32 {
        Ok((abs_eta - 1) % N_ETA_IN_REGION)
    } else {
        // The unused tower 29 shifts the forward pairing by one.
        Ok(abs_eta % N_HF_ETA_IN_REGION)
    }
}

/// Local phi index of a global coordinate within its region.
pub fn local_phi_of(calo_eta: i32, calo_phi: i32) -> Result<u32, GeometryError> {
    let region = region_of(calo_eta, calo_phi)?;
    let card = card_of(calo_eta, calo_phi)? as i32;
    let n = if region < HF_REGION_START {
        N_PHI_IN_CARD
    } else if region < VHF_REGION_START {
        N_HF_PHI_IN_CARD
    } else {
        N_VHF_PHI_IN_CARD
    } as i32;
    Ok((calo_phi - 1 - card * n).rem_euclid(n) as u32)
}

/// Full forward mapping in one call.
pub fn hardware_of(t: TowerCoord) -> Result<HardwareCoord, GeometryError> {
    Ok(HardwareCoord {
        crate_idx: crate_of(t.calo_eta, t.calo_phi)?,
        card: card_of(t.calo_eta, t.calo_phi)?,
        region: region_of(t.calo_eta, t.calo_phi)?,
        i_eta: local_eta_of(t.calo_eta, t.calo_phi)?,
        i_phi: local_phi_of(t.calo_eta, t.calo_phi)?,
        negative_eta: t.is_negative_eta(),
    })
}

/// Inverse eta mapping: global signed eta of a (region, local eta) slot.
pub fn calo_eta_of(negative_side: bool, region: u32, i_eta: u32) -> Result<i32, GeometryError> {
    check_region(region)?;
    if i_eta >= n_eta(region)? {
        return Err(GeometryError::InvalidEtaIndex(region, i_eta));
    }
    let abs_eta = if region < HF_REGION_START {
        region * N_ETA_IN_REGION + i_eta + 1
    } else {
        (region - HF_REGION_START) * N_HF_ETA_IN_REGION + i_eta + HF_CALO_ETA_START as u32
    };
    if negative_side {
        Ok(-(abs_eta as i32))
    } else {
        Ok(abs_eta as i32)
    }
}

/// Inverse phi mapping: global phi of a (crate, card, region, local phi)
/// slot, collapsed to the region's sub-range granularity.
pub fn calo_phi_of(crate_idx: u32, card: u32, region: u32, i_phi: u32) -> Result<i32, GeometryError> {
    check_crate(crate_idx)?;
    check_card(card)?;
    check_region(region)?;
    if i_phi >= n_phi(region)? {
        return Err(GeometryError::InvalidPhiIndex(region, i_phi));
    }
    let card = card as i32;
    let i_phi = i_phi as i32;
    let base = match crate_idx {
        0 => CRATE0_PHI_OFFSET + card * 4 + i_phi,
        2 => CRATE2_PHI_OFFSET + card * 4 + i_phi,
        1 if card < 3 => CRATE1_HIGH_PHI_OFFSET + card * 4 + i_phi,
        1 => 1 + (card - 3) * 4 + i_phi,
        _ => return Err(GeometryError::InvalidCrate(crate_idx)),
    };
    if region >= VHF_REGION_START {
        Ok(1 + base / 4)
    } else if region >= HF_REGION_START {
        Ok(1 + base / 2)
    } else {
        Ok(base)
    }
}

/// Compact region-grid eta index (+/-1..=+/-13) of a region on one side.
pub fn region_eta_of(negative_side: bool, region: u32) -> Result<i32, GeometryError> {
    check_region(region)?;
    let eta = (region + 1) as i32;
    if negative_side {
        Ok(-eta)
    } else {
        Ok(eta)
    }
}

/// Compact region-grid phi index (1..=18) of a (crate, card) pair.
pub fn region_phi_of(crate_idx: u32, card: u32) -> Result<u32, GeometryError> {
    check_crate(crate_idx)?;
    check_card(card)?;
    let idx = match crate_idx {
        0 => 3 + card,
        2 => 9 + card,
        1 if card < 3 => 15 + card,
        1 => card - 3,
        _ => return Err(GeometryError::InvalidCrate(crate_idx)),
    };
    Ok(idx + 1)
}

/// Compact region-grid coordinate of the region owning a global coordinate.
pub fn region_coord_of(calo_eta: i32, calo_phi: i32) -> Result<RegionCoord, GeometryError> {
    let region = region_of(calo_eta, calo_phi)?;
    let crate_idx = crate_of(calo_eta, calo_phi)?;
    let card = card_of(calo_eta, calo_phi)?;
    Ok(RegionCoord {
        eta: region_eta_of(calo_eta < 0, region)?,
        phi: region_phi_of(crate_idx, card)?,
    })
}

/// Compact region-grid coordinate of a hardware-addressed region.
pub fn region_coord_from_hardware(
    negative_side: bool,
    crate_idx: u32,
    card: u32,
    region: u32,
) -> Result<RegionCoord, GeometryError> {
    Ok(RegionCoord {
        eta: region_eta_of(negative_side, region)?,
        phi: region_phi_of(crate_idx, card)?,
    })
}

/// Global coordinate of the (local eta, local phi) tower of a region-grid
/// cell. Passing (0, 0) yields the region's corner tower.
pub fn tower_coord_of(r: RegionCoord, i_eta: u32, i_phi: u32) -> Result<TowerCoord, GeometryError> {
    check_region_coord(r)?;
    let region = r.eta.unsigned_abs() - 1;
    let calo_eta = calo_eta_of(r.eta < 0, region, i_eta)?;
    let n = n_phi(region)?;
    if i_phi >= n {
        return Err(GeometryError::InvalidPhiIndex(region, i_phi));
    }
    let calo_phi = ((r.phi - 1) * n + i_phi + 1) as i32;
    Ok(TowerCoord { calo_eta, calo_phi })
}

fn wrap_phi_up(phi: u32) -> u32 {
    if phi == MAX_REGIONS_PHI {
        1
    } else {
        phi + 1
    }
}

fn wrap_phi_down(phi: u32) -> u32 {
    if phi == 1 {
        MAX_REGIONS_PHI
    } else {
        phi - 1
    }
}

// Eta 0 does not exist, so +/-1 are adjacent; a step beyond the high-|eta|
// edge yields the sentinel.
fn step_eta_up(eta: i32) -> i32 {
    let e = eta + 1;
    if e == 0 {
        1
    } else if e > MAX_REGIONS_ETA {
        REGION_ETA_SENTINEL
    } else {
        e
    }
}

fn step_eta_down(eta: i32) -> i32 {
    let e = eta - 1;
    if e == 0 {
        -1
    } else if e < -MAX_REGIONS_ETA {
        REGION_ETA_SENTINEL
    } else {
        e
    }
}

/// Neighbor at +phi.
pub fn region_north(r: RegionCoord) -> Result<RegionCoord, GeometryError> {
    check_region_coord(r)?;
    Ok(RegionCoord::new(r.eta, wrap_phi_up(r.phi)))
}

/// Neighbor at -phi.
pub fn region_south(r: RegionCoord) -> Result<RegionCoord, GeometryError> {
    check_region_coord(r)?;
    Ok(RegionCoord::new(r.eta, wrap_phi_down(r.phi)))
}

/// Neighbor at +eta.
pub fn region_east(r: RegionCoord) -> Result<RegionCoord, GeometryError> {
    check_region_coord(r)?;
    Ok(RegionCoord::new(step_eta_up(r.eta), r.phi))
}

/// Neighbor at -eta.
pub fn region_west(r: RegionCoord) -> Result<RegionCoord, GeometryError> {
    check_region_coord(r)?;
    Ok(RegionCoord::new(step_eta_down(r.eta), r.phi))
}

/// Neighbor at +phi, +eta.
pub fn region_ne(r: RegionCoord) -> Result<RegionCoord, GeometryError> {
    check_region_coord(r)?;
    Ok(RegionCoord::new(step_eta_up(r.eta), wrap_phi_up(r.phi)))
}

/// Neighbor at +phi, -eta.
pub fn region_nw(r: RegionCoord) -> Result<RegionCoord, GeometryError> {
    check_region_coord(r)?;
    Ok(RegionCoord::new(step_eta_down(r.eta), wrap_phi_up(r.phi)))
}

/// Neighbor at -phi, +eta.
pub fn region_se(r: RegionCoord) -> Result<RegionCoord, GeometryError> {
    check_region_coord(r)?;
    Ok(RegionCoord::new(step_eta_up(r.eta), wrap_phi_down(r.phi)))
}

/// Neighbor at -phi, -eta.
pub fn region_sw(r: RegionCoord) -> Result<RegionCoord, GeometryError> {
    check_region_coord(r)?;
    Ok(RegionCoord::new(step_eta_down(r.eta), wrap_phi_down(r.phi)))
}

/// Physical pseudorapidity at a tower's eta bin center. Informational only;
/// the aggregation logic never consumes this.
pub fn tower_eta(calo_eta: i32) -> Result<f64, GeometryError> {
    let abs_eta = calo_eta.abs();
    if calo_eta == 0 || abs_eta == UNUSED_CALO_ETA || abs_eta > MAX_CALO_ETA {
        return Err(GeometryError::InvalidCaloEta(calo_eta));
    }
    let eta = TOWER_ETA_BIN_CENTER[abs_eta as usize];
    if calo_eta < 0 {
        Ok(-eta)
    } else {
        Ok(eta)
    }
}

/// Physical azimuth at a full-granularity phi bin center, wrapped to
/// (-pi, pi]. Informational only; the eta index is carried for error
/// reporting and does not affect the value.
pub fn tower_phi(calo_eta: i32, calo_phi: i32) -> Result<f64, GeometryError> {
    if calo_phi < 1 || calo_phi > MAX_CALO_PHI {
        return Err(GeometryError::InvalidCaloPhi(calo_eta, calo_phi));
    }
    let bin = (calo_phi - 1) as f64;
    if calo_phi <= MAX_CALO_PHI / 2 {
        Ok((bin + 0.5) * CALO_PHI_BIN_WIDTH)
    } else {
        Ok(-(71.5 - bin) * CALO_PHI_BIN_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every legal global coordinate, honoring the forward phi collapse.
    fn legal_coordinates() -> Vec<(i32, i32)> {
        let mut coords = Vec::new();
        for calo_phi in 1..=MAX_CALO_PHI {
            for calo_eta in -MAX_CALO_ETA..=MAX_CALO_ETA {
                let abs_eta = calo_eta.abs();
                if calo_eta == 0 || abs_eta == UNUSED_CALO_ETA {
                    continue;
                }
                if abs_eta >= VHF_CALO_ETA_START && calo_phi > MAX_CALO_PHI_IN_VHF {
                    continue;
                }
                if abs_eta >= HF_CALO_ETA_START && calo_phi > MAX_CALO_PHI_IN_HF {
                    continue;
                }
                coords.push((calo_eta, calo_phi));
            }
        }
        coords
    }

    #[test]
    fn test_round_trip_all_legal_coordinates() {
        for (calo_eta, calo_phi) in legal_coordinates() {
            let crt = crate_of(calo_eta, calo_phi).unwrap();
            let crd = card_of(calo_eta, calo_phi).unwrap();
            let rgn = region_of(calo_eta, calo_phi).unwrap();
            let eta = local_eta_of(calo_eta, calo_phi).unwrap();
            let phi = local_phi_of(calo_eta, calo_phi).unwrap();
            assert!(crt < N_CRATES);
            assert!(crd < N_CARDS_IN_CRATE);
            assert!(rgn < N_REGIONS_TOTAL);
            assert!(eta < n_eta(rgn).unwrap());
            assert!(phi < n_phi(rgn).unwrap());
            let back_eta = calo_eta_of(calo_eta < 0, rgn, eta).unwrap();
            let back_phi = calo_phi_of(crt, crd, rgn, phi).unwrap();
            assert_eq!(
                (back_eta, back_phi),
                (calo_eta, calo_phi),
                "round trip failed through (crate {crt}, card {crd}, region {rgn}, eta {eta}, phi {phi})"
            );
        }
    }

    #[test]
    fn test_region_grid_round_trip() {
        for (calo_eta, calo_phi) in legal_coordinates() {
            let r = region_coord_of(calo_eta, calo_phi).unwrap();
            check_region_coord(r).unwrap();
            let rgn = region_of(calo_eta, calo_phi).unwrap();
            let corner = tower_coord_of(r, 0, 0).unwrap();
            // The corner tower must land in the same region cell.
            assert_eq!(region_coord_of(corner.calo_eta, corner.calo_phi).unwrap(), r);
            // And the queried tower itself must be reachable from the corner.
            let eta = local_eta_of(calo_eta, calo_phi).unwrap();
            let phi = local_phi_of(calo_eta, calo_phi).unwrap();
            let full = tower_coord_of(r, eta, phi).unwrap();
            assert_eq!(full, TowerCoord::new(calo_eta, calo_phi), "region {rgn}");
        }
    }

    #[test]
    fn test_crate_phi_split() {
        // The canonical 13/37/61 split at full granularity.
        assert_eq!(crate_of(1, 13).unwrap(), 0);
        assert_eq!(crate_of(1, 36).unwrap(), 0);
        assert_eq!(crate_of(1, 37).unwrap(), 2);
        assert_eq!(crate_of(1, 60).unwrap(), 2);
        assert_eq!(crate_of(1, 61).unwrap(), 1);
        assert_eq!(crate_of(1, 72).unwrap(), 1);
        assert_eq!(crate_of(1, 1).unwrap(), 1);
        assert_eq!(crate_of(1, 12).unwrap(), 1);
        // Forward phi is collapsed, so the same split applies to phi * 2.
        assert_eq!(crate_of(30, 7).unwrap(), 0);
        assert_eq!(crate_of(30, 19).unwrap(), 2);
        assert_eq!(crate_of(40, 4).unwrap(), 0);
    }

    #[test]
    fn test_region_shapes() {
        assert_eq!((n_eta(0).unwrap(), n_phi(0).unwrap()), (4, 4));
        assert_eq!((n_eta(6).unwrap(), n_phi(6).unwrap()), (4, 4));
        assert_eq!((n_eta(7).unwrap(), n_phi(7).unwrap()), (2, 2));
        assert_eq!((n_eta(11).unwrap(), n_phi(11).unwrap()), (2, 2));
        assert_eq!((n_eta(12).unwrap(), n_phi(12).unwrap()), (2, 1));
    }

    #[test]
    fn test_invalid_coordinates_are_rejected() {
        assert_eq!(
            crate_of(0, 10).unwrap_err(),
            GeometryError::InvalidCaloEta(0)
        );
        assert_eq!(
            region_of(UNUSED_CALO_ETA, 1).unwrap_err(),
            GeometryError::InvalidCaloEta(UNUSED_CALO_ETA)
        );
        assert_eq!(
            region_of(-42, 1).unwrap_err(),
            GeometryError::InvalidCaloEta(-42)
        );
        assert_eq!(
            local_phi_of(5, 73).unwrap_err(),
            GeometryError::InvalidCaloPhi(5, 73)
        );
        // Forward phi range restrictions.
        assert_eq!(
            crate_of(30, 37).unwrap_err(),
            GeometryError::InvalidCaloPhi(30, 37)
        );
        assert_eq!(
            crate_of(-40, 19).unwrap_err(),
            GeometryError::InvalidCaloPhi(-40, 19)
        );
    }

    #[test]
    fn test_invalid_hardware_indices_are_rejected() {
        // Only crates 0..=2 exist; 3 must be reported, never resolved.
        assert_eq!(
            calo_phi_of(3, 0, 0, 0).unwrap_err(),
            GeometryError::InvalidCrate(3)
        );
        assert_eq!(
            calo_phi_of(0, 6, 0, 0).unwrap_err(),
            GeometryError::InvalidCard(6)
        );
        assert_eq!(
            calo_eta_of(false, 13, 0).unwrap_err(),
            GeometryError::InvalidRegion(13)
        );
        assert_eq!(
            calo_eta_of(false, 0, 4).unwrap_err(),
            GeometryError::InvalidEtaIndex(0, 4)
        );
        assert_eq!(
            calo_phi_of(0, 0, 7, 2).unwrap_err(),
            GeometryError::InvalidPhiIndex(7, 2)
        );
        assert_eq!(
            region_phi_of(3, 0).unwrap_err(),
            GeometryError::InvalidCrate(3)
        );
    }

    #[test]
    fn test_known_forward_mappings() {
        // Crate 0 card 0 region 0 corner tower sits at (1, 13).
        assert_eq!(calo_eta_of(false, 0, 0).unwrap(), 1);
        assert_eq!(calo_phi_of(0, 0, 0, 0).unwrap(), 13);
        // Central tower (5, 10): wrapped low-phi side of crate 1.
        assert_eq!(crate_of(5, 10).unwrap(), 1);
        assert_eq!(card_of(5, 10).unwrap(), 5);
        assert_eq!(region_of(5, 10).unwrap(), 1);
        assert_eq!(local_eta_of(5, 10).unwrap(), 0);
        assert_eq!(local_phi_of(5, 10).unwrap(), 1);
        // Forward tower (30, 1) lands on the wrapped card of crate 1.
        assert_eq!(crate_of(30, 1).unwrap(), 1);
        assert_eq!(card_of(30, 1).unwrap(), 3);
        assert_eq!(region_of(30, 1).unwrap(), 7);
        assert_eq!(local_eta_of(30, 1).unwrap(), 0);
        assert_eq!(local_phi_of(30, 1).unwrap(), 0);
        // Very-forward tower (-41, 18).
        assert_eq!(region_of(-41, 18).unwrap(), 12);
        assert_eq!(local_eta_of(-41, 18).unwrap(), 1);
        assert_eq!(local_phi_of(-41, 18).unwrap(), 0);
    }

    #[test]
    fn test_region_coord_of_central_tower() {
        // (5, 10) sits in region eta 2, and phi 10 falls in grid cell 3.
        let r = region_coord_of(5, 10).unwrap();
        assert_eq!(r, RegionCoord::new(2, 3));
        assert_eq!(tower_coord_of(r, 0, 0).unwrap(), TowerCoord::new(5, 9));
        let neg = region_coord_of(-5, 10).unwrap();
        assert_eq!(neg, RegionCoord::new(-2, 3));
    }

    #[test]
    fn test_neighbor_phi_wraparound() {
        let r = RegionCoord::new(1, 18);
        assert_eq!(region_north(r).unwrap(), RegionCoord::new(1, 1));
        assert_eq!(region_south(RegionCoord::new(1, 1)).unwrap(), RegionCoord::new(1, 18));
        assert_eq!(region_ne(r).unwrap(), RegionCoord::new(2, 1));
        assert_eq!(region_se(RegionCoord::new(1, 1)).unwrap(), RegionCoord::new(2, 18));
    }

    #[test]
    fn test_neighbor_eta_origin_skip() {
        // Eta 0 does not exist, so +/-1 are adjacent.
        assert_eq!(region_east(RegionCoord::new(-1, 5)).unwrap(), RegionCoord::new(1, 5));
        assert_eq!(region_west(RegionCoord::new(1, 5)).unwrap(), RegionCoord::new(-1, 5));
        assert_eq!(region_nw(RegionCoord::new(1, 5)).unwrap(), RegionCoord::new(-1, 6));
        assert_eq!(region_sw(RegionCoord::new(1, 5)).unwrap(), RegionCoord::new(-1, 4));
    }

    #[test]
    fn test_neighbor_eta_edge_sentinel() {
        let east = region_east(RegionCoord::new(MAX_REGIONS_ETA, 5)).unwrap();
        assert!(east.is_beyond_eta_edge());
        let west = region_west(RegionCoord::new(-MAX_REGIONS_ETA, 5)).unwrap();
        assert!(west.is_beyond_eta_edge());
        // The sentinel itself is not a valid lookup key.
        assert!(region_north(east).is_err());
    }

    #[test]
    fn test_angle_helpers() {
        assert!((tower_eta(1).unwrap() - 0.0436).abs() < 1e-9);
        assert!((tower_eta(-1).unwrap() + 0.0436).abs() < 1e-9);
        assert!((tower_eta(41).unwrap() - 5.210).abs() < 1e-9);
        assert!(tower_eta(0).is_err());
        assert!(tower_eta(UNUSED_CALO_ETA).is_err());
        assert!((tower_phi(1, 1).unwrap() - 0.0436).abs() < 1e-9);
        assert!((tower_phi(1, 36).unwrap() - 35.5 * CALO_PHI_BIN_WIDTH).abs() < 1e-9);
        assert!((tower_phi(1, 37).unwrap() + 35.5 * CALO_PHI_BIN_WIDTH).abs() < 1e-9);
        assert!((tower_phi(1, 72).unwrap() + 0.5 * CALO_PHI_BIN_WIDTH).abs() < 1e-9);
        assert!(tower_phi(1, 0).is_err());
        assert!(tower_phi(1, 73).is_err());
    }
}
