//! The note driver — the caller side of the scheduling contract.
//!
//! [`NoteDriver`] owns a [`BeatScheduler`] and a seeded RNG, invokes a
//! caller-supplied [`PlanFn`] for every fire decision, and turns each plan
//! into a beat-timestamped start/stop pair with a cycle-safe stop beat.
//! Dispatching the events through the host API is the embedding script's
//! job — the driver produces data, not side effects.
//!
//! The driver also keeps the registry of sounding notes the scheduler
//! deliberately does not: when the transport stops, hosts discard scheduled
//! events, so every pitch that may still sound gets an immediate stop.

pub mod config;
pub mod types;

pub use config::DriverConfig;
pub use types::{NoteEvent, NoteLength, NotePlan, Rearm};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::pick::PoolError;
use crate::sched::{clock, compute_stop_beat, BeatScheduler, CycleWindow, FireEvent, Grid};

/// Selection callback: decides pitch, velocity, length, and re-arm policy
/// for one fire decision.
pub type PlanFn = Box<dyn FnMut(FireEvent, &mut ChaCha8Rng) -> NotePlan>;

/// A note that may still be sounding.
#[derive(Debug, Clone, Copy)]
struct ActiveNote {
    pitch: u8,
    stop_beat: f64,
}

/// Drives a [`BeatScheduler`] through host blocks, emitting note events.
pub struct NoteDriver {
    scheduler: BeatScheduler,
    plan: PlanFn,
    rng: ChaCha8Rng,
    active: Vec<ActiveNote>,
}

impl NoteDriver {
    /// Create a driver with an explicit grid, selection callback, and seed.
    pub fn new(grid: Grid, plan: PlanFn, seed: u64) -> Self {
        Self {
            scheduler: BeatScheduler::new(grid),
            plan,
            rng: ChaCha8Rng::seed_from_u64(seed),
            active: Vec::new(),
        }
    }

    /// Create a driver from a [`DriverConfig`].
    pub fn from_config(config: &DriverConfig) -> Result<Self, PoolError> {
        Ok(Self::new(
            Grid::new(config.division),
            config.into_plan_fn()?,
            config.seed,
        ))
    }

    /// The underlying scheduler.
    pub fn scheduler(&self) -> &BeatScheduler {
        &self.scheduler
    }

    /// Number of notes the driver considers possibly sounding.
    pub fn active_notes(&self) -> usize {
        self.active.len()
    }

    /// Return everything to the initial state without emitting events.
    pub fn reset(&mut self) {
        self.scheduler.reset();
        self.active.clear();
    }

    /// Process one host block.
    ///
    /// With the transport stopped: emits one stop per possibly-sounding
    /// pitch at the block start, clears the registry, and disarms the
    /// scheduler. Otherwise scans the block, planning a note for every fire;
    /// a plan whose stop beat is [`Suppressed`](crate::sched::Suppressed)
    /// emits nothing for that fire, but scheduling continues.
    pub fn process_block(&mut self, window: &CycleWindow) -> Vec<NoteEvent> {
        let mut out = Vec::new();

        if !window.playing {
            if !self.active.is_empty() {
                log::debug!("transport stopped; flushing {} note(s)", self.active.len());
            }
            for note in self.active.drain(..) {
                out.push(NoteEvent::Stop {
                    beat: window.block_start,
                    pitch: note.pitch,
                });
            }
            self.scheduler.reset();
            return out;
        }

        // Beat order is circular while cycling, so stop-beat pruning only
        // applies to linear time; the pitch dedup below bounds the registry
        // either way.
        if !window.cycling {
            let start = window.block_start;
            self.active.retain(|n| n.stop_beat > start);
        }

        let plan = &mut self.plan;
        let rng = &mut self.rng;
        let active = &mut self.active;
        let events = &mut out;
        self.scheduler.advance(window, |fire| {
            let choice = plan(fire, rng);
            let length_beats = match choice.length {
                NoteLength::Beats(beats) => beats,
                NoteLength::Millis(ms) => clock::ms_to_beats(ms, window.tempo),
            };
            match compute_stop_beat(fire.beat, length_beats, window) {
                Ok(stop) => {
                    events.push(NoteEvent::Start {
                        beat: fire.beat,
                        pitch: choice.pitch,
                        velocity: choice.velocity,
                    });
                    events.push(NoteEvent::Stop {
                        beat: stop,
                        pitch: choice.pitch,
                    });
                    active.retain(|n| n.pitch != choice.pitch);
                    active.push(ActiveNote {
                        pitch: choice.pitch,
                        stop_beat: stop,
                    });
                    match choice.rearm {
                        Rearm::AtStop => stop,
                        Rearm::After(interval) => fire.beat + interval,
                    }
                }
                Err(err) => {
                    log::debug!("fire at beat {:.3} suppressed: {err}", fire.beat);
                    match choice.rearm {
                        // The unwrapped natural end; the scheduler's drift
                        // correction recovers from it on a later block.
                        Rearm::AtStop => fire.beat + length_beats,
                        Rearm::After(interval) => fire.beat + interval,
                    }
                }
            }
        });

        out
    }
}
