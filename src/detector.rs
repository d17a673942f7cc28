//! Measurement-to-classification pipeline.
//!
//! [`ColorDetector`] ties the acquisition state machine to calibration and
//! palette lookup: the foreground loop calls [`ColorDetector::service`]
//! every iteration and receives a [`Detection`] when a measurement has
//! finished. Fan-out to consumers (audio player, serial console, display)
//! is the caller's concern.

use crate::calibration::Calibration;
use crate::classify::find_nearest;
use crate::sensor::{ColorSensor, MeasureError, Measurement, SensorInterface};
use crate::types::{ConfigError, RawSample};
use palette::Srgb;

/// One classified measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    /// Pulse counts as assembled by the sensor.
    pub raw: RawSample,

    /// Counts referenced against the calibration.
    pub normalized: Srgb<u8>,

    /// Index of the nearest palette entry; `None` with an empty palette.
    pub color_index: Option<u8>,
}

/// Outcome of one serviced measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorEvent {
    /// A measurement finished and was classified.
    Detection(Detection),

    /// The sensor produced no pulses at all (no-signal detection enabled
    /// on the underlying [`ColorSensor`]).
    NoSignal,
}

/// Errors from detector configuration operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DetectorError {
    /// The new configuration failed validation.
    Config(ConfigError),

    /// References and palette cannot change while a measurement is in
    /// flight; the classifier holds no internal copy of either.
    MeasurementInFlight,
}

impl core::fmt::Display for DetectorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DetectorError::Config(err) => write!(f, "configuration error: {}", err),
            DetectorError::MeasurementInFlight => {
                write!(f, "cannot reconfigure while a measurement is in flight")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DetectorError {}

impl From<ConfigError> for DetectorError {
    fn from(err: ConfigError) -> Self {
        DetectorError::Config(err)
    }
}

/// Drives a [`ColorSensor`] and classifies its samples against a borrowed
/// palette.
///
/// The palette slice must outlive the detector and stay unmodified while
/// borrowed; [`crate::settings::Settings`] is the usual owner.
///
/// # Type Parameters
/// * `'p` - Lifetime of the borrowed palette
/// * `H` - Hardware implementation of the sensor control lines
pub struct ColorDetector<'p, H: SensorInterface> {
    sensor: ColorSensor<H>,
    calibration: Calibration,
    palette: &'p [Srgb<u8>],
}

impl<'p, H: SensorInterface> ColorDetector<'p, H> {
    /// Creates a detector over the given sensor hardware.
    ///
    /// An empty palette is accepted and simply never classifies; use
    /// [`set_palette`](Self::set_palette) for validated updates.
    pub fn new(hw: H, calibration: Calibration, palette: &'p [Srgb<u8>]) -> Self {
        Self {
            sensor: ColorSensor::new(hw),
            calibration,
            palette,
        }
    }

    /// Enables no-signal detection on the underlying sensor.
    pub fn with_no_signal_detection(mut self) -> Self {
        self.sensor = self.sensor.with_no_signal_detection();
        self
    }

    /// Starts one measurement.
    ///
    /// # Errors
    /// `Busy` while a measurement is in flight or unserviced.
    pub fn start_measure(&mut self) -> Result<(), MeasureError> {
        self.sensor.start_measure()
    }

    /// Counts one sensor output edge. Interrupt context.
    #[inline]
    pub fn edge_pulse(&mut self) {
        self.sensor.edge_pulse();
    }

    /// Advances the acquisition on a window boundary. Interrupt context.
    pub fn window_expired(&mut self) {
        self.sensor.window_expired();
    }

    /// Returns true while a measurement is in flight or unserviced.
    pub fn is_measuring(&self) -> bool {
        self.sensor.is_busy()
    }

    /// Runs the foreground leg of the pipeline.
    ///
    /// Polls the sensor and, when a measurement has finished, normalizes
    /// and classifies it. Returns `None` on the iterations in between.
    pub fn service(&mut self) -> Option<DetectorEvent> {
        match self.sensor.poll(&mut ())? {
            Measurement::NoSignal => Some(DetectorEvent::NoSignal),
            Measurement::Sample(raw) => Some(DetectorEvent::Detection(self.classify(raw))),
        }
    }

    /// Normalizes and classifies a raw sample against the current
    /// calibration and palette.
    pub fn classify(&self, raw: RawSample) -> Detection {
        let normalized = self.calibration.normalize(raw);
        Detection {
            raw,
            normalized,
            color_index: find_nearest(normalized, self.palette),
        }
    }

    /// Returns the active calibration.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Returns the borrowed palette.
    pub fn palette(&self) -> &'p [Srgb<u8>] {
        self.palette
    }

    /// Replaces the palette.
    ///
    /// # Errors
    /// `MeasurementInFlight` while measuring, `Config(EmptyPalette)` for
    /// zero entries. The previous palette stays active on error.
    pub fn set_palette(&mut self, palette: &'p [Srgb<u8>]) -> Result<(), DetectorError> {
        if self.sensor.is_busy() {
            return Err(DetectorError::MeasurementInFlight);
        }
        if palette.is_empty() {
            return Err(DetectorError::Config(ConfigError::EmptyPalette));
        }
        self.palette = palette;
        Ok(())
    }

    /// Updates the black reference.
    ///
    /// # Errors
    /// `MeasurementInFlight` while measuring, `Config` on degenerate
    /// references. The previous calibration stays active on error.
    pub fn set_black_reference(&mut self, black: RawSample) -> Result<(), DetectorError> {
        if self.sensor.is_busy() {
            return Err(DetectorError::MeasurementInFlight);
        }
        self.calibration.set_black_reference(black)?;
        Ok(())
    }

    /// Updates the white reference, with the same rules as
    /// [`set_black_reference`](Self::set_black_reference).
    pub fn set_white_reference(&mut self, white: RawSample) -> Result<(), DetectorError> {
        if self.sensor.is_busy() {
            return Err(DetectorError::MeasurementInFlight);
        }
        self.calibration.set_white_reference(white)?;
        Ok(())
    }
}
