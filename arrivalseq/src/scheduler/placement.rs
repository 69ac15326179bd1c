//! Earliest conflict-free landing time search.

use chrono::{DateTime, Utc};

use crate::sequence::Sequence;

/// A landing already committed in the current pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Placement {
    pub callsign: String,
    pub runway: String,
    pub time: DateTime<Utc>,
}

/// Earliest time at or after `seed` that a landing on `runway` is clear of
/// every obstacle, closure window and the runway mode cutover gap.
///
/// Fixed-point iteration: each conflict pushes the time forward until a full
/// sweep finds nothing to move past. The time only ever increases, and once
/// past an obstacle's separation window that obstacle cannot conflict again.
pub(super) fn earliest_time(
    sequence: &Sequence,
    runway: &str,
    seed: DateTime<Utc>,
    obstacles: &[Placement],
) -> DateTime<Utc> {
    let mut time = seed;

    loop {
        let mut moved = false;
        let mode = sequence.runway_mode_at(time);

        for obstacle in obstacles {
            let separation = mode.separation(runway, &obstacle.runway);
            if (time - obstacle.time).abs() < separation {
                time = obstacle.time + separation;
                moved = true;
            }
        }

        if let Some(end) = sequence.closure_end(runway, time) {
            time = end;
            moved = true;
        }

        if let Some((last, first)) = sequence.cutover_gap() {
            if time > last && time < first {
                time = first;
                moved = true;
            }
        }

        if !moved {
            return time;
        }
    }
}
