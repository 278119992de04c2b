//! Per-block host snapshot — transport flags, block bounds, cycle bounds.
//!
//! The host supplies a fresh [`CycleWindow`] on every processing block; the
//! scheduler never stores one. `wrap_into_cycle` is the crate's single
//! wraparound routine — every comparison of a beat against cycle bounds goes
//! through it rather than re-deriving the subtraction locally.

/// Read-only snapshot of the host transport for one processing block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleWindow {
    /// Whether the transport is running. `false` resets the scheduler.
    pub playing: bool,
    /// Whether the loop/cycle region is active.
    pub cycling: bool,
    /// Beat position at the start of the current block.
    pub block_start: f64,
    /// Beat position at the end of the current block (exclusive).
    pub block_end: f64,
    /// Left bound of the loop region. Meaningful only when `cycling`.
    pub cycle_left: f64,
    /// Right bound of the loop region. Meaningful only when `cycling`.
    pub cycle_right: f64,
    /// Tempo in beats per minute. Used only for beat↔ms conversion.
    pub tempo: f64,
}

impl CycleWindow {
    /// A playing, non-cycling window over one block.
    pub fn block(block_start: f64, block_end: f64, tempo: f64) -> Self {
        Self {
            playing: true,
            cycling: false,
            block_start,
            block_end,
            cycle_left: 0.0,
            cycle_right: 0.0,
            tempo,
        }
    }

    /// Activate a loop region over `[left, right)`.
    pub fn with_cycle(mut self, left: f64, right: f64) -> Self {
        self.cycling = true;
        self.cycle_left = left;
        self.cycle_right = right;
        self
    }

    /// Mark the transport as stopped.
    pub fn stopped(mut self) -> Self {
        self.playing = false;
        self
    }

    /// Length of the loop region in beats. Valid only when `cycling`.
    pub fn cycle_length(&self) -> f64 {
        self.cycle_right - self.cycle_left
    }

    /// Bring `beat` back inside the loop region by whole cycle lengths.
    ///
    /// Subtracts `cycle_length()` while `beat >= cycle_right`. Identity when
    /// not cycling. Beats left of `cycle_left` are returned unchanged.
    pub fn wrap_into_cycle(&self, mut beat: f64) -> f64 {
        if !self.cycling {
            return beat;
        }
        let len = self.cycle_length();
        if len <= 0.0 {
            return beat;
        }
        while beat >= self.cycle_right {
            beat -= len;
        }
        beat
    }

    /// Whether this block cannot be scanned meaningfully.
    ///
    /// Covers empty/inverted block bounds, inverted cycle bounds, and a
    /// block reaching a full cycle length past the loop end (which would
    /// re-wrap without terminating). Degenerate blocks produce zero fire
    /// events; they are never an error.
    pub fn is_degenerate(&self) -> bool {
        if self.block_end <= self.block_start {
            return true;
        }
        if self.cycling {
            if self.cycle_left >= self.cycle_right {
                return true;
            }
            if self.block_end >= self.cycle_right + self.cycle_length() {
                return true;
            }
        }
        false
    }
}

impl Default for CycleWindow {
    fn default() -> Self {
        Self {
            playing: false,
            cycling: false,
            block_start: 0.0,
            block_end: 0.0,
            cycle_left: 0.0,
            cycle_right: 0.0,
            tempo: 120.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn cycle_length() {
        let w = CycleWindow::block(0.0, 1.0, 120.0).with_cycle(2.0, 6.0);
        assert_approx_eq!(w.cycle_length(), 4.0);
    }

    #[test]
    fn wrap_is_identity_when_not_cycling() {
        let w = CycleWindow::block(0.0, 1.0, 120.0);
        assert_approx_eq!(w.wrap_into_cycle(100.0), 100.0);
    }

    #[test]
    fn wrap_subtracts_one_cycle() {
        let w = CycleWindow::block(3.5, 4.0, 120.0).with_cycle(0.0, 4.0);
        assert_approx_eq!(w.wrap_into_cycle(4.5), 0.5);
    }

    #[test]
    fn wrap_subtracts_repeatedly() {
        let w = CycleWindow::block(0.0, 1.0, 120.0).with_cycle(0.0, 2.0);
        assert_approx_eq!(w.wrap_into_cycle(7.5), 1.5);
    }

    #[test]
    fn wrap_at_exact_right_bound_lands_on_left() {
        let w = CycleWindow::block(0.0, 1.0, 120.0).with_cycle(0.0, 4.0);
        assert_approx_eq!(w.wrap_into_cycle(4.0), 0.0);
    }

    #[test]
    fn wrap_leaves_in_bounds_beats_alone() {
        let w = CycleWindow::block(0.0, 1.0, 120.0).with_cycle(1.0, 5.0);
        assert_approx_eq!(w.wrap_into_cycle(3.25), 3.25);
        // Beats left of the cycle are not pulled in.
        assert_approx_eq!(w.wrap_into_cycle(0.5), 0.5);
    }

    #[test]
    fn degenerate_empty_block() {
        assert!(CycleWindow::block(2.0, 2.0, 120.0).is_degenerate());
        assert!(CycleWindow::block(2.0, 1.0, 120.0).is_degenerate());
    }

    #[test]
    fn degenerate_inverted_cycle() {
        assert!(CycleWindow::block(0.0, 1.0, 120.0)
            .with_cycle(4.0, 4.0)
            .is_degenerate());
        assert!(CycleWindow::block(0.0, 1.0, 120.0)
            .with_cycle(5.0, 1.0)
            .is_degenerate());
    }

    #[test]
    fn degenerate_block_wider_than_cycle_tail() {
        // Block ends a full cycle length past the loop end.
        assert!(CycleWindow::block(3.0, 8.0, 120.0)
            .with_cycle(0.0, 4.0)
            .is_degenerate());
        // A block merely straddling the seam is fine.
        assert!(!CycleWindow::block(3.9, 5.2, 120.0)
            .with_cycle(0.0, 4.0)
            .is_degenerate());
    }

    #[test]
    fn default_is_stopped() {
        let w = CycleWindow::default();
        assert!(!w.playing);
        assert!(!w.cycling);
        assert_approx_eq!(w.tempo, 120.0);
    }
}
