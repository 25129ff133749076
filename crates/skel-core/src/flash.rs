//! Flash geometry and the RF calibration sector
//!
//! The radio firmware keeps its calibration data in a flash sector the
//! application chooses at boot. We use the default placement: the fifth
//! sector from the end of the chip, leaving the last five sectors to the
//! radio and system parameters.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Erase unit of the SPI flash, in bytes.
pub const SECTOR_SIZE: u32 = 4096;

/// `log2(SECTOR_SIZE)`.
pub const SECTOR_SHIFT: u32 = 12;

/// Sectors at the end of flash reserved for RF calibration and system parameters.
pub const RF_CAL_RESERVED_SECTORS: u32 = 5;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashError {
    #[error("flash chip has {sectors} sectors, need at least 5")]
    ChipTooSmall { sectors: u32 },
    #[error("unknown flash layout")]
    UnknownLayout,
}

/// Flash chip descriptor as reported by the ROM.
///
/// Read-only: the firmware only ever borrows it to size the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashChip {
    pub device_id: u32,
    pub chip_size: u32,
    pub block_size: u32,
    pub sector_size: u32,
    pub page_size: u32,
    pub status_mask: u32,
}

impl FlashChip {
    /// Descriptor for a chip of `chip_size` bytes with the standard geometry.
    pub const fn with_size(chip_size: u32) -> Self {
        Self {
            device_id: 0,
            chip_size,
            block_size: 64 * 1024,
            sector_size: SECTOR_SIZE,
            page_size: 256,
            status_mask: 0xffff,
        }
    }

    /// Number of 4 KiB sectors on the chip.
    ///
    /// Always shifts by [`SECTOR_SHIFT`], whatever `sector_size` claims.
    pub const fn sector_count(&self) -> u32 {
        self.chip_size >> SECTOR_SHIFT
    }
}

impl From<FlashLayout> for FlashChip {
    fn from(layout: FlashLayout) -> Self {
        FlashChip::with_size(layout.chip_size())
    }
}

/// Sector index holding the RF calibration data.
pub fn rf_cal_sector(chip: &FlashChip) -> Result<u32, FlashError> {
    let sectors = chip.sector_count();
    sectors
        .checked_sub(RF_CAL_RESERVED_SECTORS)
        .ok_or(FlashError::ChipTooSmall { sectors })
}

/// Byte address of the RF calibration sector.
pub fn rf_cal_offset(chip: &FlashChip) -> Result<u32, FlashError> {
    rf_cal_sector(chip).map(|sector| sector << SECTOR_SHIFT)
}

/// Where the descriptor used for the calibration sector came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashSource {
    /// Read from the chip; agrees with the configured layout
    Detected,
    /// Read from the chip; the configured layout says otherwise
    DetectedMismatch { configured: FlashLayout },
    /// Nothing usable from the chip, the configured layout stands in
    Configured,
}

/// Pick the descriptor to size the chip with.
///
/// The chip's own descriptor wins when it reports a non-zero size;
/// the configured layout is only a fallback and a cross-check.
pub fn resolve_chip(detected: Option<FlashChip>, configured: FlashLayout) -> (FlashChip, FlashSource) {
    match detected {
        Some(chip) if chip.chip_size != 0 => {
            let source = if chip.chip_size == configured.chip_size() {
                FlashSource::Detected
            } else {
                FlashSource::DetectedMismatch { configured }
            };
            (chip, source)
        }
        _ => (FlashChip::from(configured), FlashSource::Configured),
    }
}

/// Flash sizes a project can be built for, named in megabits.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashLayout {
    /// 512 KiB
    #[default]
    Mbit4,
    /// 1 MiB
    Mbit8,
    /// 2 MiB
    Mbit16,
    /// 4 MiB
    Mbit32,
    /// 8 MiB
    Mbit64,
    /// 16 MiB
    Mbit128,
}

impl FlashLayout {
    pub const ALL: [FlashLayout; 6] = [
        FlashLayout::Mbit4,
        FlashLayout::Mbit8,
        FlashLayout::Mbit16,
        FlashLayout::Mbit32,
        FlashLayout::Mbit64,
        FlashLayout::Mbit128,
    ];

    pub const fn megabits(self) -> u32 {
        match self {
            FlashLayout::Mbit4 => 4,
            FlashLayout::Mbit8 => 8,
            FlashLayout::Mbit16 => 16,
            FlashLayout::Mbit32 => 32,
            FlashLayout::Mbit64 => 64,
            FlashLayout::Mbit128 => 128,
        }
    }

    /// Chip size in bytes.
    pub const fn chip_size(self) -> u32 {
        self.megabits() * 1024 * 1024 / 8
    }

    /// Layout matching a chip size in bytes, if it is one we know.
    pub fn from_chip_size(chip_size: u32) -> Option<Self> {
        FlashLayout::ALL
            .into_iter()
            .find(|layout| layout.chip_size() == chip_size)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlashLayout::Mbit4 => "4m",
            FlashLayout::Mbit8 => "8m",
            FlashLayout::Mbit16 => "16m",
            FlashLayout::Mbit32 => "32m",
            FlashLayout::Mbit64 => "64m",
            FlashLayout::Mbit128 => "128m",
        }
    }
}

impl FromStr for FlashLayout {
    type Err = FlashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlashLayout::ALL
            .into_iter()
            .find(|layout| layout.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(FlashError::UnknownLayout)
    }
}

impl fmt::Display for FlashLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
