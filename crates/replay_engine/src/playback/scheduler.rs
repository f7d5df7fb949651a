use thiserror::Error;
use tracing::{debug, warn};

use super::clock::{ClockPosition, PhaseClock};
use super::registry::{EntityRegistry, RegistryError, RemovalTarget};
use crate::replay::{Event, Phase, Replay, Turn, PHASE_COUNT};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("turn {turn} contains unrecognized event type '{event_type}'")]
    UnknownEventType { turn: usize, event_type: String },
    #[error("turn {turn} {phase} event has unsupported entity kind '{entity}'")]
    UnknownEntityKind {
        turn: usize,
        phase: Phase,
        entity: String,
    },
    #[error("turn {turn} {phase} event references a missing entity: {source}")]
    UnknownEntityReference {
        turn: usize,
        phase: Phase,
        #[source]
        source: RegistryError,
    },
}

/// One (turn, phase) pair. Ordered by turn first, then phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub turn: usize,
    pub phase: Phase,
}

impl Slot {
    pub const FIRST: Slot = Slot {
        turn: 0,
        phase: Phase::Spawn,
    };

    pub const fn new(turn: usize, phase: Phase) -> Self {
        Self { turn, phase }
    }

    pub fn next(self) -> Slot {
        match self.phase.next() {
            Some(phase) => Slot::new(self.turn, phase),
            None => Slot::new(self.turn + 1, Phase::Spawn),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackStatus {
    Playing {
        turn: usize,
        phase: Phase,
        progress: f32,
    },
    Finished {
        reason: String,
    },
}

/// Hooks into playback progress. Every method defaults to a no-op.
pub trait PlaybackObserver {
    fn bucket_applied(&mut self, _slot: Slot, _event_count: usize) {}

    /// Called once the turn's last phase is complete, before its sweep.
    fn turn_completed(&mut self, _turn: &Turn) {}

    fn finished(&mut self, _reason: &str) {}
}

impl PlaybackObserver for () {}

/// Drives a [`Replay`] through the entity registry in simulated time.
#[derive(Debug, Clone)]
pub struct Playback {
    replay: Replay,
    registry: EntityRegistry,
    clock: PhaseClock,
    applied: Vec<[bool; PHASE_COUNT]>,
    cursor: Option<Slot>,
    failure: Option<PlaybackError>,
    finished: bool,
}

impl Playback {
    pub fn new(replay: Replay, speed: f64) -> Self {
        let registry = EntityRegistry::from_terrain(replay.terrain());
        let clock = PhaseClock::new(replay.turns().len(), speed);
        let applied = vec![[false; PHASE_COUNT]; replay.turns().len()];
        Self {
            replay,
            registry,
            clock,
            applied,
            cursor: None,
            failure: None,
            finished: false,
        }
    }

    pub fn tick(&mut self, dt: f64) -> Result<PlaybackStatus, PlaybackError> {
        self.tick_with(dt, &mut ())
    }

    /// Advances simulated time by `dt` seconds, applying every bucket passed
    /// on the way exactly once.
    pub fn tick_with(
        &mut self,
        dt: f64,
        observer: &mut dyn PlaybackObserver,
    ) -> Result<PlaybackStatus, PlaybackError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        if self.finished {
            return Ok(self.finished_status());
        }

        let position = self.clock.advance(dt);
        if let Err(error) = self.step(position, observer) {
            warn!(error = %error, "playback_halted");
            self.failure = Some(error.clone());
            return Err(error);
        }

        if position.finished {
            self.finished = true;
            if let Some(turn) = self.replay.turn(position.turn) {
                observer.turn_completed(turn);
            }
            observer.finished(self.replay.finished_reason());
            return Ok(self.finished_status());
        }

        Ok(PlaybackStatus::Playing {
            turn: position.turn,
            phase: position.phase,
            progress: position.progress,
        })
    }

    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn clock(&self) -> &PhaseClock {
        &self.clock
    }

    /// Last slot whose bucket has been applied.
    pub fn current_slot(&self) -> Option<Slot> {
        self.cursor
    }

    pub fn is_applied(&self, slot: Slot) -> bool {
        self.applied
            .get(slot.turn)
            .map(|flags| flags[slot.phase.index()])
            .unwrap_or(false)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn failure(&self) -> Option<&PlaybackError> {
        self.failure.as_ref()
    }

    pub fn speed(&self) -> f64 {
        self.clock.speed()
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.clock.set_speed(speed);
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.clock.set_paused(paused);
    }

    fn finished_status(&self) -> PlaybackStatus {
        PlaybackStatus::Finished {
            reason: self.replay.finished_reason().to_string(),
        }
    }

    fn step(
        &mut self,
        position: ClockPosition,
        observer: &mut dyn PlaybackObserver,
    ) -> Result<(), PlaybackError> {
        let target = Slot::new(position.turn, position.phase);
        loop {
            let next = match self.cursor {
                None => Slot::FIRST,
                Some(current) if current >= target => break,
                Some(current) => current.next(),
            };
            self.enter_slot(next, observer)?;
        }
        self.registry.advance(position.phase, position.progress);
        Ok(())
    }

    fn enter_slot(
        &mut self,
        slot: Slot,
        observer: &mut dyn PlaybackObserver,
    ) -> Result<(), PlaybackError> {
        if let Some(previous) = self.cursor {
            self.registry.advance(previous.phase, 1.0);
            if previous.turn != slot.turn {
                if let Some(turn) = self.replay.turn(previous.turn) {
                    observer.turn_completed(turn);
                }
                let removed = self.registry.sweep();
                debug!(turn = previous.turn, removed, "turn_swept");
            }
        }

        self.cursor = Some(slot);
        self.registry.begin_phase(slot.phase);
        let Some(turn) = self.replay.turn(slot.turn) else {
            return Ok(());
        };
        if slot.phase == Phase::Spawn {
            if let Some(event_type) = turn.unrecognized_event_types().first() {
                return Err(PlaybackError::UnknownEventType {
                    turn: slot.turn,
                    event_type: event_type.clone(),
                });
            }
        }

        if !self.is_applied(slot) {
            let events = turn.events(slot.phase);
            for event in events {
                apply_event(&mut self.registry, slot, event)?;
            }
            self.applied[slot.turn][slot.phase.index()] = true;
            observer.bucket_applied(slot, events.len());
        }
        Ok(())
    }
}

fn apply_event(
    registry: &mut EntityRegistry,
    slot: Slot,
    event: &Event,
) -> Result<(), PlaybackError> {
    let reference = |source: RegistryError| PlaybackError::UnknownEntityReference {
        turn: slot.turn,
        phase: slot.phase,
        source,
    };

    match event {
        Event::SpawnAnt {
            id,
            player,
            location,
        } => registry.spawn_ant(id, *location, *player),
        Event::SpawnFood { location } => registry.spawn_food(*location),
        Event::MoveAnt { id, destination } => {
            registry.move_ant(id, *destination).map_err(reference)?
        }
        Event::Attack {
            id,
            location,
            destination,
        } => {
            if let Some(id) = id {
                if registry.ant(id).is_none() {
                    return Err(reference(RegistryError::UnknownAnt(id.clone())));
                }
            }
            registry.spawn_attack(*location, *destination);
        }
        Event::RemoveAnt { id } => registry
            .mark_removed(RemovalTarget::Ant(id))
            .map_err(reference)?,
        Event::RemoveFood { location } => registry
            .mark_removed(RemovalTarget::Food(*location))
            .map_err(reference)?,
        Event::RemoveHill { location } => registry
            .mark_removed(RemovalTarget::Hill(*location))
            .map_err(reference)?,
        Event::Unsupported { entity } => {
            return Err(PlaybackError::UnknownEntityKind {
                turn: slot.turn,
                phase: slot.phase,
                entity: entity.clone(),
            })
        }
    }
    Ok(())
}
