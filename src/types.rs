//! Core sample and color types shared across the crate.

use palette::Srgb;

/// Maximum number of reference colors a palette can hold.
pub const MAX_PALETTE_COLORS: usize = 16;

/// One color channel of a sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// An unprocessed sensor reading: pulse counts accumulated over one
/// measurement window per color channel.
///
/// Counts are bounded by the 16-bit edge counter and by the sensor's
/// configured output-frequency scaling. A sample is produced by one
/// complete acquisition cycle and overwritten by the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl RawSample {
    /// Creates a raw sample from per-channel pulse counts.
    #[inline]
    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }

    /// Returns the count for a single channel.
    #[inline]
    pub const fn channel(&self, channel: Channel) -> u16 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    /// Returns true if no pulses were counted on any channel.
    ///
    /// An all-zero sample usually means the sensor output line never
    /// toggled during the measurement (disconnected or powered down).
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

/// An 8-bit HSV triple.
///
/// Hue uses the full 0-255 range (six sectors of ~43), matching the
/// integer conversion in [`crate::convert`]. Used for diagnostic output,
/// not for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hsv8 {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv8 {
    /// Creates an HSV triple.
    #[inline]
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// White reference does not exceed the black reference on this channel,
    /// so the normalization scale is undefined.
    DegenerateCalibration {
        /// First channel that failed validation.
        channel: Channel,
    },

    /// A palette with zero entries was supplied.
    EmptyPalette,

    /// The supplied palette exceeds [`MAX_PALETTE_COLORS`].
    PaletteTooLarge { requested: usize, capacity: usize },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::DegenerateCalibration { channel } => {
                write!(
                    f,
                    "white reference must exceed black reference on channel {:?}",
                    channel
                )
            }
            ConfigError::EmptyPalette => {
                write!(f, "palette must have at least one entry")
            }
            ConfigError::PaletteTooLarge {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "palette of {} entries exceeds capacity of {}",
                    requested, capacity
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Shorthand for constructing an 8-bit sRGB triple.
#[inline]
pub const fn rgb8(r: u8, g: u8, b: u8) -> Srgb<u8> {
    Srgb::new(r, g, b)
}
