//! Driver-level event and plan vocabulary.

/// A beat-timestamped note event for the host to dispatch.
///
/// The driver emits both halves of a note as soon as the fire decision is
/// made; a wrapped stop beat may numerically precede a later start in the
/// same block. Timestamps, not stream order, are the contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteEvent {
    Start { beat: f64, pitch: u8, velocity: f32 },
    Stop { beat: f64, pitch: u8 },
}

impl NoteEvent {
    /// The beat this event is timestamped at.
    pub fn beat(&self) -> f64 {
        match self {
            NoteEvent::Start { beat, .. } | NoteEvent::Stop { beat, .. } => *beat,
        }
    }

    /// The pitch this event addresses.
    pub fn pitch(&self) -> u8 {
        match self {
            NoteEvent::Start { pitch, .. } | NoteEvent::Stop { pitch, .. } => *pitch,
        }
    }
}

/// How long a planned note sounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteLength {
    /// Musical length; follows tempo changes.
    Beats(f64),
    /// Wall-clock length; resolved to beats at the block's current tempo.
    Millis(f64),
}

/// How the scheduler is re-armed after a fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rearm {
    /// Next trigger at the note's stop beat — back-to-back triggering.
    AtStop,
    /// Next trigger at `fire.beat + interval` beats. The target is left
    /// unwrapped; the scan loop carries it across the loop seam.
    After(f64),
}

/// What the selection callback decides for one fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotePlan {
    pub pitch: u8,
    pub velocity: f32,
    pub length: NoteLength,
    pub rearm: Rearm,
}
