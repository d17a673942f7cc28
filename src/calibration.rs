//! Black/white reference calibration and raw-sample normalization.
//!
//! Raw pulse counts depend on ambient light, sensor distance and the
//! configured output-frequency scaling, so they are referenced against
//! counts captured from calibrated black and white targets. Normalization
//! maps each channel through an affine scale into an 8-bit display range
//! whose useful span is [`RESULT_BLACK_LEVEL`]..[`RESULT_WHITE_LEVEL`].

use crate::types::{Channel, ConfigError, RawSample};
use palette::Srgb;

/// Normalized output at the black reference.
pub const RESULT_BLACK_LEVEL: u8 = 0x10;

/// Normalized output at the white reference.
pub const RESULT_WHITE_LEVEL: u8 = 0xF0;

const RESULT_RANGE: i32 = (RESULT_WHITE_LEVEL - RESULT_BLACK_LEVEL) as i32;

/// Validated black/white reference pair.
///
/// Holds the raw counts observed at calibrated black and white targets.
/// The white count strictly exceeds the black count on every channel;
/// constructors and setters reject anything else and leave the previous
/// calibration untouched, so a `Calibration` is always usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    black: RawSample,
    white: RawSample,
}

impl Calibration {
    /// Creates a calibration from black and white reference samples.
    ///
    /// # Errors
    /// `DegenerateCalibration` if `white <= black` on any channel.
    pub fn new(black: RawSample, white: RawSample) -> Result<Self, ConfigError> {
        validate(black, white)?;
        Ok(Self { black, white })
    }

    /// Replaces the black reference.
    ///
    /// The current calibration stays active when the new reference would
    /// be degenerate against the existing white reference.
    pub fn set_black_reference(&mut self, black: RawSample) -> Result<(), ConfigError> {
        validate(black, self.white)?;
        self.black = black;
        Ok(())
    }

    /// Replaces the white reference.
    ///
    /// The current calibration stays active when the new reference would
    /// be degenerate against the existing black reference.
    pub fn set_white_reference(&mut self, white: RawSample) -> Result<(), ConfigError> {
        validate(self.black, white)?;
        self.white = white;
        Ok(())
    }

    /// Returns the black reference sample.
    pub fn black_reference(&self) -> RawSample {
        self.black
    }

    /// Returns the white reference sample.
    pub fn white_reference(&self) -> RawSample {
        self.white
    }

    /// Normalizes one raw sample into the calibrated 8-bit range.
    ///
    /// Each channel is mapped independently:
    ///
    /// ```text
    /// clamp((raw - black) * (0xF0 - 0x10) / (white - black) + 0x10, 0, 255)
    /// ```
    ///
    /// The multiply happens before the truncating divide in a signed
    /// 32-bit intermediate. A count at the black reference maps to exactly
    /// `0x10` and a count at the white reference to exactly `0xF0`; counts
    /// outside the reference span keep scaling linearly until they clamp
    /// at the 0/255 rails.
    pub fn normalize(&self, raw: RawSample) -> Srgb<u8> {
        Srgb::new(
            normalize_channel(raw.r, self.black.r, self.white.r),
            normalize_channel(raw.g, self.black.g, self.white.g),
            normalize_channel(raw.b, self.black.b, self.white.b),
        )
    }
}

/// Normalizes a single channel count against its black/white references.
///
/// Callers must guarantee `white > black`; [`Calibration`] enforces this
/// at construction so the divisor is never zero.
fn normalize_channel(raw: u16, black: u16, white: u16) -> u8 {
    let mut tmp = raw as i32;
    tmp -= black as i32;
    tmp *= RESULT_RANGE;
    tmp /= white as i32 - black as i32;
    tmp += RESULT_BLACK_LEVEL as i32;
    tmp.clamp(0x00, 0xFF) as u8
}

fn validate(black: RawSample, white: RawSample) -> Result<(), ConfigError> {
    for channel in [Channel::Red, Channel::Green, Channel::Blue] {
        if white.channel(channel) <= black.channel(channel) {
            return Err(ConfigError::DegenerateCalibration { channel });
        }
    }
    Ok(())
}
