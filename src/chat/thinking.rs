//! Cosmetic "thinking" placeholder rotation for UI collaborators.
//!
//! Purely presentational: a pure function from elapsed time to an entry in a
//! fixed list, with no effect on conversation state. The UI collaborator polls
//! it while a generation request is in flight.

use std::time::Duration;

/// Fixed list of placeholder lines shown while a reply is generated.
pub const THINKING_LINES: &[&str] = &[
    "Consulting the feature importances...",
    "Reading the SMART telemetry...",
    "Asking the random forest...",
    "Weighing reallocated sectors...",
];

/// Seconds between placeholder rotations.
const ROTATION_SECS: u64 = 2;

/// Pick the placeholder line for the time elapsed since generation started.
///
/// The same elapsed duration always yields the same line; rotation advances
/// every [`ROTATION_SECS`] seconds and wraps around the list.
#[must_use]
pub fn thinking_line(elapsed: Duration) -> &'static str {
    let bucket = usize::try_from(elapsed.as_secs() / ROTATION_SECS).unwrap_or(usize::MAX);
    THINKING_LINES[bucket % THINKING_LINES.len()]
}
