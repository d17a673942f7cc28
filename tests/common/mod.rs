//! Shared test infrastructure for tcs-color-detect integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use tcs_color_detect::player::{FrameSink, FRAME_LEN};
use tcs_color_detect::sensor::{OutputScaling, PhotodiodeFilter, SensorInterface};
use tcs_color_detect::{ColorDetector, RawSample};

// ============================================================================
// Mock Sensor Hardware
// ============================================================================

/// Sensor control lines that accept every operation and track the last
/// illumination state.
pub struct MockSensorPins {
    pub illumination: bool,
}

impl MockSensorPins {
    pub fn new() -> Self {
        Self {
            illumination: false,
        }
    }
}

impl SensorInterface for MockSensorPins {
    fn select_filter(&mut self, _filter: PhotodiodeFilter) {}

    fn set_frequency_scaling(&mut self, _scaling: OutputScaling) {}

    fn set_illumination(&mut self, on: bool) {
        self.illumination = on;
    }

    fn start_window_clock(&mut self) {}

    fn stop_window_clock(&mut self) {}
}

// ============================================================================
// Mock Serial Sink
// ============================================================================

/// Serial sink that records every transmitted audio command frame.
pub struct MockFrameSink {
    pub frames: heapless::Vec<[u8; FRAME_LEN], 8>,
}

impl MockFrameSink {
    pub fn new() -> Self {
        Self {
            frames: heapless::Vec::new(),
        }
    }
}

impl FrameSink for MockFrameSink {
    fn write_frame(&mut self, frame: &[u8; FRAME_LEN]) {
        let _ = self.frames.push(*frame);
    }
}

// ============================================================================
// Measurement Driver
// ============================================================================

/// Drives one full measurement as the interrupts would: the first window
/// runs on the idle filter selection and counts a throwaway pulse, the
/// next three windows count `counts.r`, `counts.g` and `counts.b` edges.
pub fn run_measurement(detector: &mut ColorDetector<'_, MockSensorPins>, counts: RawSample) {
    detector.start_measure().expect("detector should be idle");
    for window in [1, counts.r, counts.g, counts.b] {
        for _ in 0..window {
            detector.edge_pulse();
        }
        detector.window_expired();
    }
}
