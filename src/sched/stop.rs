//! Cycle-safe stop beats.
//!
//! A start event with no reachable stop is a hung note. When the loop region
//! is active, a note's natural end may fall on or past the right cycle bound
//! and must be wrapped back into the loop; when the duration meets or exceeds
//! the cycle length, the wrap target is ambiguous and the whole note must be
//! suppressed instead.

use std::fmt;

use super::window::CycleWindow;

/// The requested duration cannot be scheduled inside the current cycle
/// bounds. The caller must skip the start event entirely rather than send a
/// start with no matching stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suppressed;

impl fmt::Display for Suppressed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duration meets or exceeds the cycle length; stop beat is ambiguous"
        )
    }
}

impl std::error::Error for Suppressed {}

/// Compute the beat at which the stop event for a note starting at
/// `start_beat` with `duration_beats` must be sent.
///
/// Not cycling: simply `start_beat + duration_beats`. Cycling: the natural
/// end is wrapped into the loop via [`CycleWindow::wrap_into_cycle`], unless
/// `duration_beats >= cycle_length()`, in which case the note is
/// [`Suppressed`].
pub fn compute_stop_beat(
    start_beat: f64,
    duration_beats: f64,
    window: &CycleWindow,
) -> Result<f64, Suppressed> {
    let stop = start_beat + duration_beats;
    if !window.cycling {
        return Ok(stop);
    }
    if duration_beats >= window.cycle_length() {
        return Err(Suppressed);
    }
    Ok(window.wrap_into_cycle(stop))
}
