//! Where to put a flight inserted into the sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Side of the reference flight for a relative insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelativePosition {
    Before,
    After,
}

/// Target of an insertion or reposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum InsertionOptions {
    /// Land at an exact time on a given runway.
    Exact {
        time: DateTime<Utc>,
        runway: String,
    },
    /// Land directly before or after another sequenced flight.
    Relative {
        position: RelativePosition,
        reference: String,
    },
}

impl InsertionOptions {
    pub fn exact(time: DateTime<Utc>, runway: &str) -> Self {
        Self::Exact {
            time,
            runway: runway.to_uppercase(),
        }
    }

    pub fn before(reference: &str) -> Self {
        Self::Relative {
            position: RelativePosition::Before,
            reference: reference.to_uppercase(),
        }
    }

    pub fn after(reference: &str) -> Self {
        Self::Relative {
            position: RelativePosition::After,
            reference: reference.to_uppercase(),
        }
    }
}
