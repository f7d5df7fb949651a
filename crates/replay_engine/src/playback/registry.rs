use std::collections::BTreeMap;

use thiserror::Error;

use super::entity::{Entity, EntityKind, GridPoint, HillSprite};
use crate::replay::{Cell, Phase};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no live ant with id '{0}'")]
    UnknownAnt(String),
    #[error("no {kind} at {cell}")]
    UnknownCell { kind: &'static str, cell: Cell },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalTarget<'a> {
    Ant(&'a str),
    Food(Cell),
    Hill(Cell),
}

/// Live animation state. Ants are keyed by id, food and hills by cell.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    ants: BTreeMap<String, Entity>,
    food: BTreeMap<Cell, Entity>,
    hills: BTreeMap<Cell, Entity>,
    water: Vec<Entity>,
    attacks: Vec<Entity>,
    phase: Option<Phase>,
    phase_progress: f32,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_terrain(terrain: &[Entity]) -> Self {
        let mut registry = Self::new();
        for entity in terrain {
            registry.insert(entity.clone());
        }
        registry
    }

    pub fn spawn_ant(&mut self, id: &str, location: Cell, player: usize) {
        self.ants
            .insert(id.to_string(), Entity::ant(id, location, player));
    }

    pub fn spawn_food(&mut self, location: Cell) {
        self.food.insert(location, Entity::food(location));
    }

    pub fn spawn_attack(&mut self, from: Cell, to: Cell) {
        self.attacks.push(Entity::attack(from, to));
    }

    pub fn move_ant(&mut self, id: &str, destination: Cell) -> Result<(), RegistryError> {
        let ant = self
            .ants
            .get_mut(id)
            .ok_or_else(|| RegistryError::UnknownAnt(id.to_string()))?;
        ant.target_location = GridPoint::from(destination);
        Ok(())
    }

    pub fn mark_removed(&mut self, target: RemovalTarget<'_>) -> Result<(), RegistryError> {
        match target {
            RemovalTarget::Ant(id) => {
                let ant = self
                    .ants
                    .get_mut(id)
                    .ok_or_else(|| RegistryError::UnknownAnt(id.to_string()))?;
                ant.alive = false;
                ant.target_size = 0.0;
            }
            RemovalTarget::Food(cell) => {
                let food = self.food.get_mut(&cell).ok_or(RegistryError::UnknownCell {
                    kind: "food",
                    cell,
                })?;
                food.alive = false;
                food.target_size = 0.0;
            }
            RemovalTarget::Hill(cell) => {
                let hill = self.hills.get_mut(&cell).ok_or(RegistryError::UnknownCell {
                    kind: "hill",
                    cell,
                })?;
                hill.alive = false;
                if let EntityKind::Hill { sprite, .. } = &mut hill.kind {
                    *sprite = HillSprite::Razed;
                }
            }
        }
        Ok(())
    }

    /// Drops dead ants and food, and every attack indicator.
    pub fn sweep(&mut self) -> usize {
        let before = self.ants.len() + self.food.len() + self.attacks.len();
        self.ants.retain(|_, ant| ant.alive);
        self.food.retain(|_, food| food.alive);
        self.attacks.clear();
        before - (self.ants.len() + self.food.len() + self.attacks.len())
    }

    pub fn begin_phase(&mut self, phase: Phase) {
        self.phase = Some(phase);
        self.phase_progress = 0.0;
    }

    /// Moves every entity toward its target so that the phase's share of the
    /// motion reaches `progress`. `progress >= 1` lands exactly on the targets.
    pub fn advance(&mut self, phase: Phase, progress: f32) {
        if self.phase != Some(phase) {
            self.begin_phase(phase);
        }
        let last = self.phase_progress;
        let fraction = if progress >= 1.0 {
            1.0
        } else if progress <= last {
            return;
        } else {
            (progress - last) / (1.0 - last)
        };
        for entity in self.animated_mut() {
            entity.step(fraction);
        }
        self.phase_progress = progress.min(1.0);
    }

    pub fn ant(&self, id: &str) -> Option<&Entity> {
        self.ants.get(id)
    }

    pub fn food_at(&self, cell: Cell) -> Option<&Entity> {
        self.food.get(&cell)
    }

    pub fn hill_at(&self, cell: Cell) -> Option<&Entity> {
        self.hills.get(&cell)
    }

    pub fn ants(&self) -> impl Iterator<Item = &Entity> {
        self.ants.values()
    }

    pub fn food(&self) -> impl Iterator<Item = &Entity> {
        self.food.values()
    }

    pub fn hills(&self) -> impl Iterator<Item = &Entity> {
        self.hills.values()
    }

    pub fn water(&self) -> &[Entity] {
        &self.water
    }

    pub fn attacks(&self) -> &[Entity] {
        &self.attacks
    }

    /// Water, hills, food, ants, then attacks: later entries draw on top.
    pub fn iter_draw_order(&self) -> impl Iterator<Item = &Entity> {
        self.water
            .iter()
            .chain(self.hills.values())
            .chain(self.food.values())
            .chain(self.ants.values())
            .chain(self.attacks.iter())
    }

    pub fn len(&self) -> usize {
        self.ants.len() + self.food.len() + self.hills.len() + self.water.len() + self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn animated_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.ants
            .values_mut()
            .chain(self.food.values_mut())
            .chain(self.hills.values_mut())
            .chain(self.attacks.iter_mut())
    }

    fn insert(&mut self, entity: Entity) {
        match entity.kind {
            EntityKind::Ant { .. } => {
                if let Some(id) = entity.id.clone() {
                    self.ants.insert(id, entity);
                }
            }
            EntityKind::Food => {
                self.food.insert(entity.cell(), entity);
            }
            EntityKind::Hill { .. } => {
                self.hills.insert(entity.cell(), entity);
            }
            EntityKind::Water => self.water.push(entity),
            EntityKind::Attack { .. } => self.attacks.push(entity),
        }
    }
}
