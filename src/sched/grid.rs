//! Quantization grid — the subdivision triggers are aligned to.
//!
//! The grid owns the alignment math and the scan-loop step size. Alignment
//! rounds *up* (ceiling): beats are monotonically non-decreasing playhead
//! positions, so no scheduled beat may ever be placed earlier than the true
//! playhead, only at or after it.

/// A quantization grid with `division` equal subdivisions per beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    division: u32,
}

impl Grid {
    /// Create a grid with `division` subdivisions per beat.
    ///
    /// # Panics
    ///
    /// Panics if `division` is zero. A zero quantum would stall the scan
    /// loop, so this is rejected at construction rather than guarded per
    /// block.
    pub fn new(division: u32) -> Self {
        assert!(division > 0, "grid division must be positive");
        Self { division }
    }

    /// Subdivisions per beat.
    pub fn division(self) -> u32 {
        self.division
    }

    /// The scan step: the width of one subdivision in beats.
    pub fn quantum(self) -> f64 {
        1.0 / self.division as f64
    }

    /// Align `beat` upward to the nearest grid point.
    ///
    /// Idempotent on grid points: `align(align(b)) == align(b)`. Carries a
    /// hair of downward tolerance so upward float noise in host block bounds
    /// cannot push a position past the grid point it sits on.
    pub fn align(self, beat: f64) -> f64 {
        (beat * self.division as f64 - super::BEAT_EPS).ceil() / self.division as f64
    }
}

impl Default for Grid {
    /// Sixteenth-note grid.
    fn default() -> Self {
        Self::new(4)
    }
}
