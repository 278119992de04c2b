//! Block-synchronous beat scheduling — cursor scan, trigger state, cycle
//! wraparound.
//!
//! The [`BeatScheduler`] sits between the host's per-block callback and the
//! caller's event-producing logic. It owns the persistent *trigger* (the next
//! beat due to fire) and re-derives a *cursor* from the block bounds on every
//! call; the cursor walks the quantization grid through the block, hopping
//! the loop seam when the block straddles it, and each grid point that
//! matches the trigger is yielded to a caller-supplied callback.
//!
//! The scheduler never touches events, only beats. Constructing start/stop
//! pairs, tracking sounding notes, and talking to the host API all belong to
//! the caller (see [`crate::driver`]).

pub mod clock;
pub mod grid;
pub mod stop;
pub mod types;
pub mod window;

pub use grid::Grid;
pub use stop::{compute_stop_beat, Suppressed};
pub use types::FireEvent;
pub use window::CycleWindow;

/// Tolerance for beat comparisons.
///
/// Cursors are re-derived from block bounds every call while triggers
/// accumulate across calls, so the same musical position can disagree by a
/// few ulps between the two. The tolerance is far below any quantum the grid
/// can produce and far above accumulated f64 noise over a session.
pub(crate) const BEAT_EPS: f64 = 1e-9;

#[inline]
fn beats_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < BEAT_EPS
}

/// The beat scheduler: one instance per logical track/voice, living for the
/// whole plugin instance and driven once per processing block.
///
/// Two states: *stopped* (no trigger armed) and *armed*. The first block
/// observed with the transport playing arms the trigger to the first cursor
/// position; a block with the transport stopped disarms it. Stopping is the
/// only cancellation signal — the scheduler holds no registry of sounding
/// events, so the caller must flush its own.
#[derive(Debug, Clone)]
pub struct BeatScheduler {
    grid: Grid,
    /// The next beat due to fire. `None` while stopped/unarmed.
    trigger: Option<f64>,
}

impl BeatScheduler {
    /// Create a stopped scheduler on the given grid.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            trigger: None,
        }
    }

    /// The quantization grid.
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Whether a trigger is currently armed.
    pub fn is_armed(&self) -> bool {
        self.trigger.is_some()
    }

    /// The currently armed trigger beat, if any.
    pub fn trigger(&self) -> Option<f64> {
        self.trigger
    }

    /// Force the next trigger beat.
    pub fn rearm(&mut self, beat: f64) {
        self.trigger = Some(beat);
    }

    /// Return to the stopped state. Idempotent.
    pub fn reset(&mut self) {
        self.trigger = None;
    }

    /// Scan one processing block and fire every trigger it contains.
    ///
    /// `on_fire` is invoked once per fire, in chronological order — the
    /// in-block segment in increasing beat order, then (when the block
    /// straddles the loop seam) the wrapped tail segment in increasing beat
    /// order. Its return value becomes the next trigger beat, which is how
    /// the caller re-arms: either at the note's stop beat (back-to-back) or
    /// at `fire.beat + interval`. An unwrapped re-arm target past the right
    /// cycle bound is carried across the seam together with the cursor.
    ///
    /// A non-playing window disarms the scheduler and fires nothing; a
    /// degenerate window (see [`CycleWindow::is_degenerate`]) fires nothing
    /// for this block only. Neither is an error: a real-time callback must
    /// fail open.
    ///
    /// Returns the number of fires.
    pub fn advance<F>(&mut self, window: &CycleWindow, mut on_fire: F) -> usize
    where
        F: FnMut(FireEvent) -> f64,
    {
        if !window.playing {
            if self.trigger.take().is_some() {
                log::debug!("transport stopped; scheduler disarmed");
            }
            return 0;
        }
        if window.is_degenerate() {
            log::debug!(
                "degenerate block [{}, {}); no fires",
                window.block_start,
                window.block_end
            );
            return 0;
        }

        let quantum = self.grid.quantum();
        let mut cursor = window.block_start;
        if window.cycling && cursor < window.cycle_left {
            cursor = window.cycle_left;
        }
        cursor = self.grid.align(cursor);

        let mut trigger = match self.trigger {
            // Arm to the first cursor position seen.
            None => cursor,
            Some(t)
                if window.cycling
                    && (t < window.cycle_left - BEAT_EPS
                        || t > window.cycle_right + BEAT_EPS) =>
            {
                Self::correct_drift(window)
            }
            Some(t) => t,
        };

        let scan_end = window.block_end;
        // A block reaching past the right cycle bound also covers the first
        // beats of the next loop iteration; scan them in this same call.
        let wrap_end = if window.cycling && window.block_end >= window.cycle_right {
            Some(window.block_end - window.cycle_length())
        } else {
            None
        };

        let mut fired = 0;
        loop {
            let in_block =
                cursor > window.block_start - BEAT_EPS && cursor < scan_end - BEAT_EPS;
            let in_tail = matches!(wrap_end, Some(end) if cursor < end - BEAT_EPS);
            if !in_block && !in_tail {
                break;
            }

            if window.cycling && cursor >= window.cycle_right - BEAT_EPS {
                cursor -= window.cycle_length();
                trigger -= window.cycle_length();
            }

            if beats_eq(cursor, trigger) {
                trigger = on_fire(FireEvent { beat: cursor });
                fired += 1;
            }

            cursor += quantum;
            // A fast-forwarded cursor never leaves the trigger behind.
            if trigger < cursor - BEAT_EPS {
                trigger = cursor;
            }
        }

        self.trigger = Some(trigger);
        fired
    }

    /// Re-arm a trigger that drifted outside the loop region.
    ///
    /// Happens when a deferred re-arm landed outside the bounds while the
    /// host jumped the cycle. The target is the later of the right cycle
    /// bound or the block end — except when that collides with the right
    /// bound at the moment the block start has wrapped to the loop's left
    /// region, where the block start itself is used so a whole cycle of
    /// output is not lost. Asymmetric on purpose; see DESIGN.md.
    fn correct_drift(window: &CycleWindow) -> f64 {
        let target = if window.block_end > window.cycle_right {
            window.block_end
        } else {
            window.cycle_right
        };
        if beats_eq(target, window.cycle_right)
            && window.block_start.trunc() == window.cycle_left
        {
            window.block_start
        } else {
            target
        }
    }
}
