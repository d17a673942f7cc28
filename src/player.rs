//! Command framer for DFPlayer-style serial audio modules.
//!
//! Builds the module's fixed 10-byte frame
//! (`7E FF 06 cmd ack arg_hi arg_lo chk_hi chk_lo EF`) and hands it to a
//! byte sink. The detector maps a palette index to a playback track with
//! [`track_for_color`]; tracks on the module are numbered from 1.

/// Length of every command frame.
pub const FRAME_LEN: usize = 10;

const FRAME_START_CODE: u8 = 0x7E;
const FRAME_END_CODE: u8 = 0xEF;
const FRAME_VERSION_CODE: u8 = 0xFF;
const FRAME_DEFAULT_LENGTH: u8 = 0x06;

const CMD_SPECIFY_TRACK: u8 = 0x03;
const CMD_VOLUME_SET: u8 = 0x06;
const CMD_RESET: u8 = 0x0C;
const CMD_STOP: u8 = 0x16;

/// Trait for abstracting the serial link to the audio module.
///
/// Implement this over your UART driver; the framer hands over complete
/// frames, never partial writes.
pub trait FrameSink {
    /// Transmits one complete command frame.
    fn write_frame(&mut self, frame: &[u8; FRAME_LEN]);
}

/// Maps a palette index to the module's 1-based track number.
#[inline]
pub const fn track_for_color(color_index: u8) -> u16 {
    color_index as u16 + 1
}

/// Builds one command frame with its checksum filled in.
///
/// The checksum is the two's complement of the sum of bytes 1..=6
/// (version through argument low byte).
pub fn build_frame(command: u8, ack_request: bool, argument: u16) -> [u8; FRAME_LEN] {
    let mut frame = [
        FRAME_START_CODE,
        FRAME_VERSION_CODE,
        FRAME_DEFAULT_LENGTH,
        command,
        if ack_request { 0x01 } else { 0x00 },
        (argument >> 8) as u8,
        argument as u8,
        0x00,
        0x00,
        FRAME_END_CODE,
    ];

    let sum: u16 = frame[1..7].iter().map(|&byte| byte as u16).sum();
    let checksum = 0u16.wrapping_sub(sum);
    frame[7] = (checksum >> 8) as u8;
    frame[8] = checksum as u8;
    frame
}

/// Sends playback commands to a DFPlayer-style module.
pub struct SoundPlayer<S: FrameSink> {
    sink: S,
    ack_request: bool,
}

impl<S: FrameSink> SoundPlayer<S> {
    /// Creates a player over the given serial sink. Acknowledge requests
    /// are off by default.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            ack_request: false,
        }
    }

    /// Enables or disables the module's acknowledge replies.
    pub fn set_ack_request(&mut self, ack: bool) {
        self.ack_request = ack;
    }

    /// Returns the underlying serial sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Plays the track announcing the given palette index.
    pub fn play_for_color(&mut self, color_index: u8) {
        self.play_track(track_for_color(color_index));
    }

    /// Plays a specific track (1-based).
    pub fn play_track(&mut self, track: u16) {
        self.send(CMD_SPECIFY_TRACK, track);
    }

    /// Sets the playback volume (module range 0..=30).
    pub fn set_volume(&mut self, volume: u8) {
        self.send(CMD_VOLUME_SET, volume as u16);
    }

    /// Stops playback.
    pub fn stop(&mut self) {
        self.send(CMD_STOP, 0);
    }

    /// Resets the module.
    pub fn reset(&mut self) {
        self.send(CMD_RESET, 0);
    }

    fn send(&mut self, command: u8, argument: u16) {
        let frame = build_frame(command, self.ack_request, argument);
        self.sink.write_frame(&frame);
    }
}
