//! Runtime configuration store: calibration references and the color palette.
//!
//! Owns the data the detector core only borrows. Ships the reference
//! hardware's factory defaults; a persistence layer (EEPROM, flash) can
//! load and store the same fields around it.

use crate::calibration::Calibration;
use crate::types::{ConfigError, RawSample, MAX_PALETTE_COLORS};
use heapless::Vec;
use palette::Srgb;

/// Factory black reference of the reference sensor board.
pub const DEFAULT_BLACK_REFERENCE: RawSample = RawSample::new(0x00D4, 0x00B8, 0x00D2);

/// Factory white reference of the reference sensor board.
pub const DEFAULT_WHITE_REFERENCE: RawSample = RawSample::new(0x057B, 0x056E, 0x0693);

/// Factory palette: white, black, blue, green, red, yellow.
pub const DEFAULT_PALETTE: [Srgb<u8>; 6] = [
    Srgb::new(0xFF, 0xFF, 0xFF),
    Srgb::new(0x00, 0x00, 0x00),
    Srgb::new(0x40, 0x60, 0xA0),
    Srgb::new(0x40, 0x90, 0x50),
    Srgb::new(0xA0, 0x30, 0x30),
    Srgb::new(0xFF, 0xFF, 0x50),
];

/// Owned configuration: validated calibration plus the ordered palette.
#[derive(Debug, Clone)]
pub struct Settings {
    calibration: Calibration,
    palette: Vec<Srgb<u8>, MAX_PALETTE_COLORS>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut palette = Vec::new();
        // Factory palette always fits the capacity.
        for color in DEFAULT_PALETTE {
            let _ = palette.push(color);
        }

        Self {
            // Factory references are non-degenerate by construction.
            calibration: Calibration::new(DEFAULT_BLACK_REFERENCE, DEFAULT_WHITE_REFERENCE)
                .unwrap_or_else(|_| unreachable!()),
            palette,
        }
    }
}

impl Settings {
    /// Creates settings with the factory defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active calibration.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Returns the black reference sample.
    pub fn black_reference(&self) -> RawSample {
        self.calibration.black_reference()
    }

    /// Returns the white reference sample.
    pub fn white_reference(&self) -> RawSample {
        self.calibration.white_reference()
    }

    /// Updates the black reference, keeping the old one on rejection.
    pub fn set_black_reference(&mut self, black: RawSample) -> Result<(), ConfigError> {
        self.calibration.set_black_reference(black)
    }

    /// Updates the white reference, keeping the old one on rejection.
    pub fn set_white_reference(&mut self, white: RawSample) -> Result<(), ConfigError> {
        self.calibration.set_white_reference(white)
    }

    /// Returns the palette as an ordered read-only slice.
    ///
    /// Entry position is the classification index. The slice stays valid
    /// as long as these settings are alive and unmodified.
    pub fn palette(&self) -> &[Srgb<u8>] {
        &self.palette
    }

    /// Returns one palette entry.
    pub fn color(&self, index: u8) -> Option<Srgb<u8>> {
        self.palette.get(index as usize).copied()
    }

    /// Returns the number of configured palette entries.
    pub fn available_colors(&self) -> usize {
        self.palette.len()
    }

    /// Replaces the palette.
    ///
    /// # Errors
    /// `EmptyPalette` for zero entries, `PaletteTooLarge` above
    /// [`MAX_PALETTE_COLORS`]. The previous palette stays active on error.
    pub fn set_palette(&mut self, entries: &[Srgb<u8>]) -> Result<(), ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if entries.len() > MAX_PALETTE_COLORS {
            return Err(ConfigError::PaletteTooLarge {
                requested: entries.len(),
                capacity: MAX_PALETTE_COLORS,
            });
        }

        self.palette.clear();
        // Length was checked against capacity above.
        let _ = self.palette.extend_from_slice(entries);
        Ok(())
    }
}
