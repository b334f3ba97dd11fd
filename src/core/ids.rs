//! Stabile, opake IDs für die Arena-Objekte (Point, Segment, Shape, Group).
//!
//! Alle IDs teilen sich einen Zähler in der `World`, damit eine ID in
//! serialisierten Payloads nie zweideutig ist.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Rohwert der ID.
            pub fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// ID eines Punktes (Vertex, Teilungspunkt, Bogenzentrum, …)
    PointId,
    "p"
);
define_id!(
    /// ID eines Segments (Strecke oder Kreisbogen)
    SegmentId,
    "s"
);
define_id!(
    /// ID einer Form
    ShapeId,
    "sh"
);
define_id!(
    /// ID einer Gruppe
    GroupId,
    "g"
);

/// Fortlaufender ID-Vergeber, startet bei `World::next_id()`.
///
/// Tools und Actions reservieren damit mehrere IDs, bevor die Objekte
/// tatsächlich in die World eingefügt werden.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Erstellt einen Vergeber, dessen erste ID `first` ist.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first.max(1) }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn point(&mut self) -> PointId {
        PointId(self.bump())
    }

    pub fn segment(&mut self) -> SegmentId {
        SegmentId(self.bump())
    }

    pub fn shape(&mut self) -> ShapeId {
        ShapeId(self.bump())
    }

    pub fn group(&mut self) -> GroupId {
        GroupId(self.bump())
    }

    /// Nächste ID, die vergeben würde.
    pub fn peek(&self) -> u64 {
        self.next
    }
}
