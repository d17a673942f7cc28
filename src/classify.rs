//! Nearest-color classification against a reference palette.
//!
//! The palette is an ordered slice of 8-bit RGB reference colors owned by
//! the caller (see [`crate::settings::Settings`]); its position is the
//! classification index. The classifier borrows the slice for the duration
//! of the call and never copies or mutates it.

use palette::Srgb;

/// Squared per-channel Euclidean distance between two 8-bit colors.
///
/// The maximum possible value is `3 * 255^2`, well inside `u32`.
pub fn color_distance_sq(a: Srgb<u8>, b: Srgb<u8>) -> u32 {
    let dr = a.red as i32 - b.red as i32;
    let dg = a.green as i32 - b.green as i32;
    let db = a.blue as i32 - b.blue as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Returns the palette index of the entry nearest to `sample`.
///
/// Distance is squared Euclidean over the three channels. Ties go to the
/// earlier palette entry: the running minimum is only replaced on a
/// strictly smaller distance. An empty palette yields `None`.
pub fn find_nearest(sample: Srgb<u8>, palette: &[Srgb<u8>]) -> Option<u8> {
    let mut min_distance = u32::MAX;
    let mut nearest = None;

    for (index, entry) in palette.iter().enumerate() {
        let distance = color_distance_sq(sample, *entry);
        if distance < min_distance {
            min_distance = distance;
            nearest = Some(index as u8);
        }
    }

    nearest
}
