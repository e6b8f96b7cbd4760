use std::fmt;

use crate::types::{JulianInstant, RiseTransitSet};

/// Declaration order is the tie-break precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Rise,
    Transit,
    Set,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Rise => "rise",
            EventKind::Transit => "transit",
            EventKind::Set => "set",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            EventKind::Rise => '↑',
            EventKind::Transit => '↔',
            EventKind::Set => '↓',
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol(), self.label())
    }
}

/// Chronological order of the defined events of `events`.
///
/// Equal instants keep rise before transit before set. A circumpolar body
/// yields at most its transit; a body that never rises yields nothing.
pub fn order_events(events: &RiseTransitSet) -> Vec<(EventKind, JulianInstant)> {
    let mut ordered: Vec<(EventKind, JulianInstant)> = match *events {
        RiseTransitSet::Events { rise, transit, set } => [
            (EventKind::Rise, rise),
            (EventKind::Transit, transit),
            (EventKind::Set, set),
        ]
        .into_iter()
        .filter_map(|(kind, instant)| instant.map(|jd| (kind, jd)))
        .collect(),
        RiseTransitSet::Circumpolar { transit } => {
            transit.map(|jd| (EventKind::Transit, jd)).into_iter().collect()
        }
        RiseTransitSet::NeverRises => Vec::new(),
    };
    // stable: ties stay in precedence order
    ordered.sort_by(|a, b| a.1.value().total_cmp(&b.1.value()));
    ordered
}
