use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::map::{parse_map, MapFormatError};
use super::{Cell, Event, Map, Phase, Replay, Turn, PHASE_COUNT};

const UNKNOWN_FINISHED_REASON: &str = "unknown";

#[derive(Debug, Error)]
pub enum LogFormatError {
    #[error("malformed replay json at {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("replay contains no turns")]
    NoTurns,
    #[error("turn at index {index} is numbered {found}, expected {expected}")]
    TurnOutOfSequence {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("turn {turn} event {index} ({phase} {entity}) is missing required field `{field}`")]
    MissingEventField {
        turn: usize,
        index: usize,
        phase: Phase,
        entity: String,
        field: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ReplayLoadError {
    #[error("failed to read replay '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    LogFormat(#[from] LogFormatError),
    #[error(transparent)]
    MapFormat(#[from] MapFormatError),
}

#[derive(Debug, Deserialize)]
struct ReplayLog {
    players: usize,
    map: Map,
    turns: Vec<TurnLog>,
    #[serde(default)]
    finished_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TurnLog {
    turn: usize,
    ants: Vec<usize>,
    hive: Vec<usize>,
    scores: Vec<usize>,
    events: Vec<EventLog>,
}

#[derive(Debug, Deserialize)]
struct EventLog {
    event_type: String,
    entity: String,
    #[serde(default)]
    entity_id: Option<String>,
    #[serde(default)]
    player: Option<usize>,
    #[serde(default)]
    location: Option<Cell>,
    #[serde(default)]
    destination: Option<Cell>,
}

impl Replay {
    pub fn from_path(path: &Path) -> Result<Self, ReplayLoadError> {
        let raw = fs::read_to_string(path).map_err(|source| ReplayLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ReplayLoadError> {
        let log = parse_replay_log(raw)?;
        build_replay(log)
    }
}

fn parse_replay_log(raw: &str) -> Result<ReplayLog, LogFormatError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, ReplayLog>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        LogFormatError::Json {
            path,
            source: error.into_inner(),
        }
    })
}

fn build_replay(log: ReplayLog) -> Result<Replay, ReplayLoadError> {
    if log.turns.is_empty() {
        return Err(LogFormatError::NoTurns.into());
    }

    let terrain = parse_map(&log.map)?;
    let mut turns = Vec::with_capacity(log.turns.len());
    for (index, turn_log) in log.turns.into_iter().enumerate() {
        if turn_log.turn != index {
            return Err(LogFormatError::TurnOutOfSequence {
                index,
                expected: index,
                found: turn_log.turn,
            }
            .into());
        }
        turns.push(build_turn(turn_log)?);
    }

    Ok(Replay {
        players: log.players,
        map: log.map,
        turns,
        finished_reason: log
            .finished_reason
            .unwrap_or_else(|| UNKNOWN_FINISHED_REASON.to_string()),
        terrain,
    })
}

fn build_turn(log: TurnLog) -> Result<Turn, LogFormatError> {
    let mut events: [Vec<Event>; PHASE_COUNT] = Default::default();
    let mut unrecognized_event_types = Vec::new();

    for (index, raw) in log.events.into_iter().enumerate() {
        let Some(phase) = Phase::from_event_type(&raw.event_type) else {
            unrecognized_event_types.push(raw.event_type);
            continue;
        };
        let event = resolve_event(log.turn, index, phase, raw)?;
        events[phase.index()].push(event);
    }

    Ok(Turn {
        turn_number: log.turn,
        ants: log.ants,
        hive: log.hive,
        scores: log.scores,
        events,
        unrecognized_event_types,
    })
}

fn resolve_event(
    turn: usize,
    index: usize,
    phase: Phase,
    raw: EventLog,
) -> Result<Event, LogFormatError> {
    let missing = |field: &'static str| LogFormatError::MissingEventField {
        turn,
        index,
        phase,
        entity: raw.entity.clone(),
        field,
    };

    let event = match (phase, raw.entity.as_str()) {
        (Phase::Spawn, "Ant") => Event::SpawnAnt {
            id: raw.entity_id.clone().ok_or_else(|| missing("entity_id"))?,
            player: raw.player.ok_or_else(|| missing("player"))?,
            location: raw.location.ok_or_else(|| missing("location"))?,
        },
        (Phase::Spawn, "Food") => Event::SpawnFood {
            location: raw.location.ok_or_else(|| missing("location"))?,
        },
        (Phase::Move, "Ant") => Event::MoveAnt {
            id: raw.entity_id.clone().ok_or_else(|| missing("entity_id"))?,
            destination: raw.destination.ok_or_else(|| missing("destination"))?,
        },
        (Phase::Attack, "Ant") => Event::Attack {
            id: raw.entity_id.clone(),
            location: raw.location.ok_or_else(|| missing("location"))?,
            destination: raw.destination.ok_or_else(|| missing("destination"))?,
        },
        (Phase::Remove, "Ant") => Event::RemoveAnt {
            id: raw.entity_id.clone().ok_or_else(|| missing("entity_id"))?,
        },
        (Phase::Remove, "Food") => Event::RemoveFood {
            location: raw.location.ok_or_else(|| missing("location"))?,
        },
        (Phase::Remove, "Hill") => Event::RemoveHill {
            location: raw.location.ok_or_else(|| missing("location"))?,
        },
        _ => Event::Unsupported {
            entity: raw.entity.clone(),
        },
    };
    Ok(event)
}
