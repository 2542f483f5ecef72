//! # calo_layer1
//!
//! libcalo_layer1 is a bit-accurate software emulation of the layer-1
//! calorimeter trigger aggregation firmware. It ingests the two raw
//! per-channel energy streams (ECAL energy plus fine-grain bit, HCAL energy
//! plus feature bits), groups them through the fixed hardware hierarchy
//! (tower, region, card, crate), and produces the packed 16-bit summary
//! words the real electronics emit, so emulated output can be diffed
//! word-for-word against live hardware captures during commissioning.
//!
//! ## The hierarchy
//!
//! The detector eta range splits into three sub-ranges with different
//! region granularity: central regions are 4x4 towers, forward regions
//! 2x2, and the outermost pair 2x1. A card carries every region index on
//! both eta sides of one phi slice, a crate carries six cards, and the
//! top-level engine carries three crates. The whole tree is built once per
//! detector configuration; only the per-event state (raw inputs and
//! summary words) moves between events.
//!
//! ## Per-event cycle
//!
//! ```text
//! clear_event() -> set_ecal_data()/set_hcal_data() ... -> process()
//! ```
//!
//! All routing goes through the [`geometry`] mapper, which converts global
//! (calo eta, calo phi) coordinates to hardware-local addresses and back,
//! losslessly. Addressing inconsistencies are configuration errors and are
//! reported as such; they are never recoverable at event scope. The
//! ordering of the cycle is enforced by an explicit phase flag on the
//! top-level engine: loading after `process`, or a second `process`
//! without an intervening clear, is refused with a recoverable error so a
//! caller can skip the event and carry on.
//!
//! Region processing saturates energies to the 10-bit hardware field,
//! locates the hottest tower of central regions, and derives the EG/Tau
//! veto bits from strip activity patterns against a fixed disallowed-
//! pattern table; the thresholds involved are calibration parameters
//! ([`config::Calibration`]), not hard-wired numbers.
//!
//! ## Output
//!
//! After `process`, the tree can be walked ([`layer1::CaloLayer1::crates`],
//! [`layer1::CaloLayer1::tower_records`]) to extract every region summary
//! word and per-tower record. The [`capture`] module streams those into a
//! flat little-endian capture file with a documented byte layout, which is
//! what offline diff tooling consumes.
//!
//! One engine instance serves one in-flight event; concurrent event
//! processing should give each worker its own instance.

pub mod calo_crate;
pub mod capture;
pub mod card;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod error;
pub mod geometry;
pub mod layer1;
pub mod region;
pub mod tower;
