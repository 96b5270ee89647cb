//! The one place that knows what each dependency type means.
//!
//! Every dependency reads "predecessor anchor + lag <= successor anchor",
//! where the anchors are the start or finish named by the type. The forward
//! pass, the backward pass and the calendar projector all derive their
//! bounds from [`start_bound`].

use crate::models::{Anchor, DependencyType};

/// Which pass is asking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Lower bound on the successor's start, from the predecessor's earliest times.
    Earliest,
    /// Upper bound on the predecessor's start, from the successor's latest times.
    Latest,
}

/// Start and finish of one task, in day offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Window {
    pub start: i64,
    pub finish: i64,
}

impl Window {
    pub fn from_start(start: i64, duration: i64) -> Self {
        Self {
            start,
            finish: start.saturating_add(duration),
        }
    }

    pub fn from_finish(finish: i64, duration: i64) -> Self {
        Self {
            start: finish.saturating_sub(duration),
            finish,
        }
    }

    #[inline]
    fn at(self, anchor: Anchor) -> i64 {
        match anchor {
            Anchor::Start => self.start,
            Anchor::Finish => self.finish,
        }
    }
}

/// Bound on the start of the task at one end of a dependency, given the
/// window of the task at the other end.
///
/// With `Earliest`, `other` is the predecessor and the result is the floor
/// on the successor's start. With `Latest`, `other` is the successor and the
/// result is the ceiling on the predecessor's start. `own_duration` is the
/// duration of the task being bounded. Arithmetic saturates at the `i64`
/// range.
pub fn start_bound(
    kind: DependencyType,
    direction: Direction,
    lag: i64,
    other: Window,
    own_duration: i64,
) -> i64 {
    let (own_anchor, anchor_time) = match direction {
        Direction::Earliest => (
            kind.successor_anchor(),
            other.at(kind.predecessor_anchor()).saturating_add(lag),
        ),
        Direction::Latest => (
            kind.predecessor_anchor(),
            other.at(kind.successor_anchor()).saturating_sub(lag),
        ),
    };

    match own_anchor {
        Anchor::Start => anchor_time,
        Anchor::Finish => anchor_time.saturating_sub(own_duration),
    }
}
