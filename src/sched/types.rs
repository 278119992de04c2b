//! Fire decisions — what the scheduler hands to its caller.

/// A single fire decision: the caller should synthesize and dispatch a
/// start event at `beat`.
///
/// Ephemeral — produced during one [`advance`](crate::sched::BeatScheduler::advance)
/// call, never stored. The matching stop beat is the caller's job, via
/// [`compute_stop_beat`](crate::sched::compute_stop_beat).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireEvent {
    /// The beat at which to start the event.
    pub beat: f64,
}
