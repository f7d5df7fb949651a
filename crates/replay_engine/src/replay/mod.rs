mod loader;
mod map;

use std::fmt;

use serde::Deserialize;

use crate::playback::Entity;

pub use loader::{LogFormatError, ReplayLoadError};
pub use map::{parse_map, MapFormatError};

pub const PHASE_COUNT: usize = 4;

/// Sub-step of a turn. Every event bucket is keyed by one of these, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Spawn,
    Move,
    Attack,
    Remove,
}

impl Phase {
    pub const ALL: [Phase; PHASE_COUNT] = [Phase::Spawn, Phase::Move, Phase::Attack, Phase::Remove];

    pub const fn index(self) -> usize {
        match self {
            Phase::Spawn => 0,
            Phase::Move => 1,
            Phase::Attack => 2,
            Phase::Remove => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Phase::Spawn => "Spawn",
            Phase::Move => "Move",
            Phase::Attack => "Attack",
            Phase::Remove => "Remove",
        }
    }

    pub fn from_index(index: usize) -> Option<Phase> {
        Self::ALL.get(index).copied()
    }

    pub fn from_event_type(value: &str) -> Option<Phase> {
        Self::ALL.into_iter().find(|phase| phase.name() == value)
    }

    pub fn next(self) -> Option<Phase> {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "(usize, usize)")]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Map {
    pub width: usize,
    pub height: usize,
    pub contents: String,
}

/// A resolved log event. The phase is implied by the bucket that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SpawnAnt {
        id: String,
        player: usize,
        location: Cell,
    },
    SpawnFood {
        location: Cell,
    },
    MoveAnt {
        id: String,
        destination: Cell,
    },
    Attack {
        id: Option<String>,
        location: Cell,
        destination: Cell,
    },
    RemoveAnt {
        id: String,
    },
    RemoveFood {
        location: Cell,
    },
    RemoveHill {
        location: Cell,
    },
    /// The entity is unknown, or not one that the bucket's phase can act on.
    Unsupported {
        entity: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub turn_number: usize,
    pub ants: Vec<usize>,
    pub hive: Vec<usize>,
    pub scores: Vec<usize>,
    events: [Vec<Event>; PHASE_COUNT],
    unrecognized_event_types: Vec<String>,
}

impl Turn {
    pub fn events(&self, phase: Phase) -> &[Event] {
        &self.events[phase.index()]
    }

    pub fn event_count(&self) -> usize {
        self.events.iter().map(Vec::len).sum()
    }

    /// `event_type` values that match no phase, in log order.
    pub fn unrecognized_event_types(&self) -> &[String] {
        &self.unrecognized_event_types
    }
}

#[derive(Debug, Clone)]
pub struct Replay {
    players: usize,
    map: Map,
    turns: Vec<Turn>,
    finished_reason: String,
    terrain: Vec<Entity>,
}

impl Replay {
    pub fn players(&self) -> usize {
        self.players
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn turn(&self, turn_number: usize) -> Option<&Turn> {
        self.turns.get(turn_number)
    }

    pub fn last_turn_number(&self) -> usize {
        self.turns.len().saturating_sub(1)
    }

    pub fn finished_reason(&self) -> &str {
        &self.finished_reason
    }

    /// Water, hills and starting food parsed from the map.
    pub fn terrain(&self) -> &[Entity] {
        &self.terrain
    }
}
