//! Beat↔millisecond conversion at a given tempo.
//!
//! Pure, stateless helpers. Cursor math never goes through milliseconds —
//! these exist for callers whose note lengths are specified in wall time
//! (e.g. a fixed gate in ms) and for hosts whose event APIs want durations
//! in ms rather than beats.

/// Convert a beat count to milliseconds at `tempo` beats per minute.
///
/// `tempo <= 0` is a caller contract violation and is not defended against.
pub fn beats_to_ms(beats: f64, tempo: f64) -> f64 {
    beats * (60_000.0 / tempo)
}

/// Convert milliseconds to beats at `tempo` beats per minute.
///
/// Inverse of [`beats_to_ms`].
pub fn ms_to_beats(ms: f64, tempo: f64) -> f64 {
    ms / (60_000.0 / tempo)
}
