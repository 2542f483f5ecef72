//! Fixed detector-geometry and packed-word constants.
//!
//! The trigger eta range splits into three sub-ranges with different region
//! granularity:
//!
//! ```text
//! eta:      -5 ... -4 ... -3 ... -2 ... -1 ... 0 ... 1 ... 2 ...  3 ...  4 ...  5
//! absEta:   41   ...  30(29)28     ...        1 1     ...       28(29)30   ... 41
//! region:   12 11 10  9  8  7  6  5  4 3 2 1  0 0 1 2  3  4   5  6 7 8 9 10 11 12
//! ```
//!
//! Central towers (|eta| 1..=28) group into 4x4 regions, forward towers
//! (|eta| 30..=39) into 2x2, and the outermost pair (|eta| 40..=41) into 2x1
//! because phi is already doubled there at the input level. Tower 29 shadows
//! a portion of the endcap and is unused in the trigger.

/// Number of crates in the system.
pub const N_CRATES: u32 = 3;
/// Number of cards per crate.
pub const N_CARDS_IN_CRATE: u32 = 6;
/// Number of central (4x4) regions per card side.
pub const N_REGIONS_IN_CARD: u32 = 7;
/// Number of forward regions per card side.
pub const N_HF_REGIONS_IN_CARD: u32 = 6;
/// Total regions per card side, central plus forward.
pub const N_REGIONS_TOTAL: u32 = N_REGIONS_IN_CARD + N_HF_REGIONS_IN_CARD;
/// Positive and negative eta sides.
pub const N_SIDES: u32 = 2;

pub const N_ETA_IN_REGION: u32 = 4;
pub const N_PHI_IN_REGION: u32 = 4;
pub const N_PHI_IN_CARD: u32 = N_PHI_IN_REGION;
pub const N_HF_ETA_IN_REGION: u32 = 2;
pub const N_HF_PHI_IN_REGION: u32 = 2;
pub const N_HF_PHI_IN_CARD: u32 = N_HF_PHI_IN_REGION;
pub const N_VHF_PHI_IN_REGION: u32 = 1;
pub const N_VHF_PHI_IN_CARD: u32 = N_VHF_PHI_IN_REGION;

/// Calorimeter eta indices are signed and never zero; |eta| tops out here.
pub const MAX_CALO_ETA: i32 = 41;
/// Calorimeter phi indices run 1..=72 at full granularity.
pub const MAX_CALO_PHI: i32 = 72;
/// Tower 29 shadows the endcap and carries no trigger input.
pub const UNUSED_CALO_ETA: i32 = 29;
/// First |eta| of the forward range (2x2 regions).
pub const HF_CALO_ETA_START: i32 = 30;
/// First |eta| of the very-forward range (2x1 regions).
pub const VHF_CALO_ETA_START: i32 = 40;
/// First region index of the forward range.
pub const HF_REGION_START: u32 = 7;
/// First region index of the very-forward range.
pub const VHF_REGION_START: u32 = 12;
/// Forward phi is halved at the input level.
pub const MAX_CALO_PHI_IN_HF: i32 = MAX_CALO_PHI / 2;
/// Very-forward phi is quartered at the input level.
pub const MAX_CALO_PHI_IN_VHF: i32 = MAX_CALO_PHI / 4;

/// Compact region-grid phi indices run 1..=18 and wrap cyclically.
pub const MAX_REGIONS_PHI: u32 = 18;
/// Compact region-grid eta indices run +/-1..=+/-13; zero is illegal.
pub const MAX_REGIONS_ETA: i32 = 13;
/// Returned by neighbor lookups that step beyond the high-|eta| edge.
pub const REGION_ETA_SENTINEL: i32 = 0;

// Crate phi coverage at full granularity, the canonical 13/37/61 split:
// crate 0 covers phi 13..=36, crate 2 covers 37..=60, crate 1 covers the
// wrap 61..=72 plus 1..=12.
pub const CRATE0_PHI_OFFSET: i32 = 13;
pub const CRATE2_PHI_OFFSET: i32 = 37;
pub const CRATE1_HIGH_PHI_OFFSET: i32 = 61;
/// Folds the wrapped phi 1..=12 onto crate 1 cards 3..=5.
pub const CRATE1_LOW_PHI_PAD: i32 = 11;

/// ECAL input energy is an 8-bit field.
pub const ECAL_ET_INPUT_MAX: u32 = 0xFF;
/// HCAL input energy is an 8-bit field.
pub const HCAL_ET_INPUT_MAX: u32 = 0xFF;
/// HCAL feature input is a 5-bit field.
pub const HCAL_FEATURE_MASK: u32 = 0x1F;

// Region summary word, a 16-bit hardware interchange format:
//   bits 0-9   saturated region ET
//   bit  10    EG veto
//   bit  11    Tau veto
//   bits 12-15 hottest-tower location (central regions only)
pub const REGION_ET_MASK: u16 = 0x03FF;
pub const REGION_EG_VETO: u16 = 0x0400;
pub const REGION_TAU_VETO: u16 = 0x0800;
pub const REGION_LOC_MASK: u16 = 0xF000;
pub const REGION_LOC_SHIFT: u32 = 12;

// Tower word, 16 bits:
//   bits 0-9   saturated ECAL+HCAL ET
//   bits 10-12 energy ratio, floor(log2(max/min)) capped at 7
//   bit  13    set when the ECAL deposit leads the HCAL deposit
//   bit  14    ECAL fine-grain bit
//   bit  15    HCAL feature bit 0
pub const TOWER_ET_MASK: u16 = 0x03FF;
pub const TOWER_ER_MASK: u16 = 0x1C00;
pub const TOWER_ER_SHIFT: u32 = 10;
pub const TOWER_ER_MAX: u32 = 0x7;
pub const TOWER_EOHR_FLAG: u16 = 0x2000;
pub const TOWER_FG_FLAG: u16 = 0x4000;
pub const TOWER_HCAL_FLAG: u16 = 0x8000;

/// Strip activity patterns inconsistent with an isolated deposit.
///
/// Bit i of a pattern is set when eta column (or phi row) i holds at least
/// one active tower. A single 4-bit pattern is vetoed when its active
/// strips are split or spread: two non-adjacent strips, three strips, or
/// all four.
pub const DISALLOWED_ACTIVITY_PATTERNS: [u8; 8] = [
    0b0101, 0b0111, 0b1001, 0b1010, 0b1011, 0b1101, 0b1110, 0b1111,
];

/// Physical pseudorapidity at each |calo eta| bin center, indexed by |eta|.
///
/// Towers 1..=20 sit on a uniform 0.0872 pitch; the endcap bins 21..=28
/// widen progressively; the forward bins 30..=41 are the midpoints of the
/// non-uniform forward tower edges. Slots 0 and 29 are never read (both
/// eta values are rejected before lookup).
pub const TOWER_ETA_BIN_CENTER: [f64; 42] = [
    0.0, // eta 0 is illegal
    0.0436, 0.1308, 0.2180, 0.3052, 0.3924, 0.4796, 0.5668, 0.6540, 0.7412,
    0.8284, 0.9156, 1.0028, 1.0900, 1.1772, 1.2644, 1.3516, 1.4388, 1.5260,
    1.6132, 1.7004, 1.785, 1.880, 1.9865, 2.1075, 2.247, 2.411, 2.575,
    2.825, 0.0, // tower 29 is unused in the trigger
    3.065, 3.240, 3.415, 3.590, 3.770, 3.955, 4.150, 4.355, 4.575, 4.805,
    5.065, 5.210,
];

/// Azimuthal width of one full-granularity phi bin, radians.
pub const CALO_PHI_BIN_WIDTH: f64 = 0.0872;
