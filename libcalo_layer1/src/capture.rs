//! Flat binary capture of emulated output, for diffing against hardware
//! spy captures.
//!
//! Everything is little-endian. The layout is fixed so offline tooling can
//! assert exact byte positions:
//!
//! ```text
//! header   magic u32 | version u16 | pad u16 | run u32 | unix timestamp i64
//! event    event id u32
//!          region count u16
//!          per region: crate u8 | card u8 | side u8 | region u8 | summary u16
//!          tower count u16
//!          per tower:  calo eta i8 | calo phi u8 | word u16 | ecal u8 | hcal u8
//! ```
//!
//! The side byte is 1 for negative eta. Events repeat until end of stream.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use super::error::CaptureError;
use super::layer1::CaloLayer1;

pub const CAPTURE_MAGIC: u32 = u32::from_le_bytes(*b"CLC1");
pub const CAPTURE_VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureHeader {
    pub version: u16,
    pub run_number: u32,
    pub unix_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionWord {
    pub crate_idx: u8,
    pub card: u8,
    pub negative_eta: bool,
    pub region: u8,
    pub summary: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowerWord {
    pub calo_eta: i8,
    pub calo_phi: u8,
    pub data: u16,
    pub ecal_et: u8,
    pub hcal_et: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEvent {
    pub event_id: u32,
    pub regions: Vec<RegionWord>,
    pub towers: Vec<TowerWord>,
}

/// Streams processed events into a capture file.
#[derive(Debug)]
pub struct CaptureWriter<W: Write> {
    out: W,
    n_events: u32,
}

impl CaptureWriter<BufWriter<File>> {
    /// Create a capture file and write its header.
    pub fn create(path: &Path, run_number: u32) -> Result<Self, CaptureError> {
        Self::new(BufWriter::new(File::create(path)?), run_number)
    }
}

impl<W: Write> CaptureWriter<W> {
    pub fn new(mut out: W, run_number: u32) -> Result<Self, CaptureError> {
        out.write_u32::<LittleEndian>(CAPTURE_MAGIC)?;
        out.write_u16::<LittleEndian>(CAPTURE_VERSION)?;
        out.write_u16::<LittleEndian>(0)?;
        out.write_u32::<LittleEndian>(run_number)?;
        out.write_i64::<LittleEndian>(time::OffsetDateTime::now_utc().unix_timestamp())?;
        Ok(Self { out, n_events: 0 })
    }

    /// Append one processed event: every region summary word, then every
    /// tower record, in hardware order.
    pub fn write_event(&mut self, event_id: u32, uct: &CaloLayer1) -> Result<(), CaptureError> {
        self.out.write_u32::<LittleEndian>(event_id)?;

        let n_regions: usize = uct
            .crates()
            .iter()
            .map(|c| c.cards().iter().map(|card| card.regions().len()).sum::<usize>())
            .sum();
        self.out.write_u16::<LittleEndian>(n_regions as u16)?;
        for crt in uct.crates() {
            for card in crt.cards() {
                for region in card.regions() {
                    self.out.write_u8(region.crate_idx() as u8)?;
                    self.out.write_u8(region.card() as u8)?;
                    self.out.write_u8(region.is_negative_eta() as u8)?;
                    self.out.write_u8(region.region() as u8)?;
                    self.out.write_u16::<LittleEndian>(region.raw_data())?;
                }
            }
        }

        let n_towers = uct.tower_records().count();
        self.out.write_u16::<LittleEndian>(n_towers as u16)?;
        for record in uct.tower_records() {
            self.out.write_i8(record.coord.calo_eta as i8)?;
            self.out.write_u8(record.coord.calo_phi as u8)?;
            self.out.write_u16::<LittleEndian>(record.raw_data)?;
            self.out.write_u8(record.ecal_et as u8)?;
            self.out.write_u8(record.hcal_et as u8)?;
        }

        self.n_events += 1;
        Ok(())
    }

    pub fn n_events(&self) -> u32 {
        self.n_events
    }

    /// Flush and hand back the underlying stream.
    pub fn finish(mut self) -> Result<W, CaptureError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Reads a capture stream back, event by event.
#[derive(Debug)]
pub struct CaptureReader<R: Read> {
    input: R,
    header: CaptureHeader,
}

impl CaptureReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read> CaptureReader<R> {
    pub fn new(mut input: R) -> Result<Self, CaptureError> {
        let magic = input.read_u32::<LittleEndian>()?;
        if magic != CAPTURE_MAGIC {
            return Err(CaptureError::BadMagic(magic));
        }
        let version = input.read_u16::<LittleEndian>()?;
        if version != CAPTURE_VERSION {
            return Err(CaptureError::BadVersion(version));
        }
        input.read_u16::<LittleEndian>()?; // pad
        let run_number = input.read_u32::<LittleEndian>()?;
        let unix_timestamp = input.read_i64::<LittleEndian>()?;
        Ok(Self {
            input,
            header: CaptureHeader {
                version,
                run_number,
                unix_timestamp,
            },
        })
    }

    pub fn header(&self) -> &CaptureHeader {
        &self.header
    }

    /// Next event in the stream, or None at a clean end of stream.
    pub fn next_event(&mut self) -> Result<Option<CaptureEvent>, CaptureError> {
        let event_id = match self.input.read_u32::<LittleEndian>() {
            Ok(id) => id,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let n_regions = self.input.read_u16::<LittleEndian>()?;
        let mut regions = Vec::with_capacity(n_regions as usize);
        for _ in 0..n_regions {
            regions.push(RegionWord {
                crate_idx: self.input.read_u8()?,
                card: self.input.read_u8()?,
                negative_eta: self.input.read_u8()? != 0,
                region: self.input.read_u8()?,
                summary: self.input.read_u16::<LittleEndian>()?,
            });
        }
        let n_towers = self.input.read_u16::<LittleEndian>()?;
        let mut towers = Vec::with_capacity(n_towers as usize);
        for _ in 0..n_towers {
            towers.push(TowerWord {
                calo_eta: self.input.read_i8()?,
                calo_phi: self.input.read_u8()?,
                data: self.input.read_u16::<LittleEndian>()?,
                ecal_et: self.input.read_u8()?,
                hcal_et: self.input.read_u8()?,
            });
        }
        Ok(Some(CaptureEvent {
            event_id,
            regions,
            towers,
        }))
    }
}
