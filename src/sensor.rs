//! Acquisition state machine for frequency-output color sensors.
//!
//! Provides [`ColorSensor`] which times the sensor's pulse output across
//! the four photodiode filters and assembles one [`RawSample`] per
//! measurement. Also defines the [`SensorInterface`] trait for hardware
//! abstraction.
//!
//! # Concurrency contract
//!
//! The sensor is driven from two contexts: [`ColorSensor::edge_pulse`] and
//! [`ColorSensor::window_expired`] belong in interrupt handlers (both are
//! O(1) and never call back into foreground collaborators), while
//! [`ColorSensor::start_measure`] and [`ColorSensor::poll`] belong in the
//! main loop. The crate holds no statics; on a bare-metal target wrap the
//! sensor in your platform's interrupt-safe cell (for example
//! `critical_section::Mutex<RefCell<...>>`) so both contexts share it
//! through `&mut` and no torn state is observable.

use crate::types::RawSample;

/// Trait for abstracting the sensor's control lines.
///
/// Implement this for your board (GPIO writes for the S0..S3 select pins,
/// the illumination LED and the window timer) to let the state machine
/// drive it. Handle any hardware errors internally - these methods cannot
/// fail.
pub trait SensorInterface {
    /// Routes the selected photodiode filter to the output pin.
    fn select_filter(&mut self, filter: PhotodiodeFilter);

    /// Sets the sensor's output-frequency scaling (S0/S1 lines).
    fn set_frequency_scaling(&mut self, scaling: OutputScaling);

    /// Switches the white illumination LED.
    fn set_illumination(&mut self, on: bool);

    /// Starts the periodic window timer whose expiry calls
    /// [`ColorSensor::window_expired`].
    fn start_window_clock(&mut self);

    /// Stops the window timer and resets its free-running counter.
    fn stop_window_clock(&mut self);
}

/// The photodiode filter routed to the sensor output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhotodiodeFilter {
    Red,
    Green,
    Blue,
    Clear,
}

impl PhotodiodeFilter {
    /// The filter activated by the following window boundary, if any.
    fn successor(self) -> Option<Self> {
        match self {
            PhotodiodeFilter::Red => Some(PhotodiodeFilter::Green),
            PhotodiodeFilter::Green => Some(PhotodiodeFilter::Blue),
            PhotodiodeFilter::Blue => Some(PhotodiodeFilter::Clear),
            PhotodiodeFilter::Clear => None,
        }
    }
}

/// Output-frequency scaling of the sensor (S0/S1 lines).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputScaling {
    /// Output disabled; lowest power draw.
    PowerDown,
    Percent2,
    Percent20,
    Percent100,
}

/// Scaling applied while a measurement is running.
pub const MEASURE_SCALING: OutputScaling = OutputScaling::Percent20;

/// Result of one completed acquisition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Measurement {
    /// The assembled raw sample.
    Sample(RawSample),

    /// No pulses arrived during any filter window, suggesting a
    /// disconnected sensor. Only reported when no-signal detection is
    /// enabled; otherwise an all-zero sample is passed through and
    /// normalizes to the black rail.
    NoSignal,
}

/// Errors returned by measurement control operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasureError {
    /// A measurement is in flight, or a finished sample has not been
    /// collected by [`ColorSensor::poll`] yet.
    Busy,
}

impl core::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MeasureError::Busy => write!(f, "measurement already in progress"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MeasureError {}

/// Completion callback invoked from [`ColorSensor::poll`], exactly once
/// per finished measurement, with the caller-supplied context.
pub type MeasureCallback<U> = fn(&mut U, Measurement);

/// Times the sensor's pulse output across the four photodiode filters and
/// assembles raw color samples.
///
/// A measurement visits the filters in the order red, green, blue, clear,
/// one fixed window each, with a one-window settling lag: each window
/// boundary first switches the filter lines, then attributes the count
/// that just finished accumulating to the filter that was active while it
/// accumulated. The very first window runs with the idle filter selection
/// and its count is discarded. The clear filter is selected for settling
/// symmetry but never measured; the machine stops at its boundary.
///
/// # Type Parameters
/// * `H` - Hardware implementation of the control lines
/// * `U` - Context passed to the completion callback (defaults to `()`)
pub struct ColorSensor<H: SensorInterface, U = ()> {
    hw: H,
    pending: Option<PhotodiodeFilter>,
    count: u16,
    sample: RawSample,
    ready: bool,
    detect_no_signal: bool,
    callback: Option<MeasureCallback<U>>,
}

impl<H: SensorInterface, U> ColorSensor<H, U> {
    /// Creates an idle sensor with the output powered down and the
    /// illumination LED off.
    pub fn new(mut hw: H) -> Self {
        hw.set_illumination(false);
        hw.set_frequency_scaling(OutputScaling::PowerDown);

        Self {
            hw,
            pending: None,
            count: 0,
            sample: RawSample::default(),
            ready: false,
            detect_no_signal: false,
            callback: None,
        }
    }

    /// Enables reporting of [`Measurement::NoSignal`] for all-zero samples.
    ///
    /// Off by default: a zero sample then passes through and normalizes
    /// to the black rail.
    pub fn with_no_signal_detection(mut self) -> Self {
        self.detect_no_signal = true;
        self
    }

    /// Registers the completion callback.
    pub fn set_measure_callback(&mut self, callback: MeasureCallback<U>) {
        self.callback = Some(callback);
    }

    /// Removes the completion callback.
    pub fn clear_measure_callback(&mut self) {
        self.callback = None;
    }

    /// Starts one asynchronous measurement.
    ///
    /// Powers the sensor output up, arms the window clock and resets the
    /// edge counter. The measurement completes after five window
    /// boundaries; collect the result with [`poll`](Self::poll).
    ///
    /// # Errors
    /// `Busy` if a measurement is in flight or a finished sample has not
    /// been polled. The running measurement is not disturbed.
    pub fn start_measure(&mut self) -> Result<(), MeasureError> {
        if self.is_busy() {
            return Err(MeasureError::Busy);
        }

        self.pending = Some(PhotodiodeFilter::Red);
        self.hw.set_frequency_scaling(MEASURE_SCALING);
        self.hw.start_window_clock();
        self.count = 0;
        Ok(())
    }

    /// Aborts a measurement in flight and returns the sensor to idle.
    ///
    /// Foreground-only, like [`start_measure`](Self::start_measure). Any
    /// finished-but-unpolled sample is discarded. A no-op when idle.
    pub fn abort(&mut self) {
        if !self.is_busy() {
            return;
        }

        self.pending = None;
        self.ready = false;
        self.count = 0;
        self.hw.stop_window_clock();
        self.hw.set_illumination(false);
        self.hw.set_frequency_scaling(OutputScaling::PowerDown);
    }

    /// Returns true while a measurement is in flight or a finished sample
    /// awaits [`poll`](Self::poll).
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.ready
    }

    /// Returns the filter the next window boundary will activate, if a
    /// measurement is in flight.
    pub fn pending_filter(&self) -> Option<PhotodiodeFilter> {
        self.pending
    }

    /// Returns the most recently completed sample.
    pub fn last_sample(&self) -> RawSample {
        self.sample
    }

    /// Counts one rising edge of the sensor output. Interrupt context.
    #[inline]
    pub fn edge_pulse(&mut self) {
        self.count = self.count.wrapping_add(1);
    }

    /// Advances the acquisition on a window boundary. Interrupt context.
    ///
    /// Switches the filter lines to the pending filter, then attributes
    /// the just-finished window's count to the filter that was active
    /// during it:
    ///
    /// * boundary arming `Red`: idle-window count discarded, LED on
    /// * boundary arming `Green`: red-filtered count stored as `r`
    /// * boundary arming `Blue`: green-filtered count stored as `g`
    /// * boundary arming `Clear`: blue-filtered count stored as `b`,
    ///   LED off, measurement marked ready
    ///
    /// Boundaries while idle are ignored, so a window clock that keeps
    /// running after completion is harmless.
    pub fn window_expired(&mut self) {
        let Some(filter) = self.pending else {
            return;
        };

        self.hw.select_filter(filter);
        match filter {
            PhotodiodeFilter::Red => {
                self.hw.set_illumination(true);
            }
            PhotodiodeFilter::Green => {
                self.sample.r = self.count;
            }
            PhotodiodeFilter::Blue => {
                self.sample.g = self.count;
            }
            PhotodiodeFilter::Clear => {
                self.sample.b = self.count;
                self.hw.set_illumination(false);
                self.ready = true;
            }
        }

        self.pending = filter.successor();
        self.count = 0;
    }

    /// Collects a finished measurement. Foreground context.
    ///
    /// When the ready flag is set this stops the window clock, powers the
    /// sensor output down, invokes the registered completion callback with
    /// `ctx`, and yields the measurement. Returns `None` while no finished
    /// measurement is pending, so it is safe to call every loop iteration.
    pub fn poll(&mut self, ctx: &mut U) -> Option<Measurement> {
        if !self.ready {
            return None;
        }
        self.ready = false;

        self.hw.stop_window_clock();
        self.hw.set_frequency_scaling(OutputScaling::PowerDown);

        let measurement = if self.detect_no_signal && self.sample.is_zero() {
            Measurement::NoSignal
        } else {
            Measurement::Sample(self.sample)
        };

        if let Some(callback) = self.callback {
            callback(ctx, measurement);
        }

        Some(measurement)
    }
}
