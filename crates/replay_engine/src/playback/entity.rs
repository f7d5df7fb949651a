use crate::replay::Cell;

/// Ant radius as a fraction of one cell.
pub const ANT_SIZE: f32 = 0.2;
/// Food square side as a fraction of one cell.
pub const FOOD_SIZE: f32 = 1.0 / 3.0;
pub const FULL_CELL_SIZE: f32 = 1.0;
/// Remaining gaps smaller than this snap to the target.
pub const SNAP_EPSILON: f32 = 1e-4;

/// Fractional `(row, col)` position in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridPoint {
    pub row: f32,
    pub col: f32,
}

impl GridPoint {
    pub const fn new(row: f32, col: f32) -> Self {
        Self { row, col }
    }

    pub fn distance_to(self, other: GridPoint) -> f32 {
        let dr = other.row - self.row;
        let dc = other.col - self.col;
        (dr * dr + dc * dc).sqrt()
    }

    fn step_toward(self, target: GridPoint, fraction: f32) -> GridPoint {
        GridPoint {
            row: step_scalar(self.row, target.row, fraction),
            col: step_scalar(self.col, target.col, fraction),
        }
    }
}

impl From<Cell> for GridPoint {
    fn from(cell: Cell) -> Self {
        Self {
            row: cell.row as f32,
            col: cell.col as f32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HillSprite {
    Alive,
    Razed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    Ant { player: usize },
    Food,
    Hill { player: usize, sprite: HillSprite },
    Water,
    /// `current_target_location` is the drawn tip of the attack line.
    Attack { current_target_location: GridPoint },
}

impl EntityKind {
    pub const fn name(&self) -> &'static str {
        match self {
            EntityKind::Ant { .. } => "ant",
            EntityKind::Food => "food",
            EntityKind::Hill { .. } => "hill",
            EntityKind::Water => "water",
            EntityKind::Attack { .. } => "attack",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: Option<String>,
    pub location: GridPoint,
    pub target_location: GridPoint,
    pub size: f32,
    pub target_size: f32,
    pub alive: bool,
    pub kind: EntityKind,
}

impl Entity {
    /// A freshly spawned ant starts at size 0 and grows to [`ANT_SIZE`].
    pub fn ant(id: impl Into<String>, location: Cell, player: usize) -> Self {
        Self::growing(Some(id.into()), location, ANT_SIZE, EntityKind::Ant { player })
    }

    pub fn food(location: Cell) -> Self {
        Self::growing(None, location, FOOD_SIZE, EntityKind::Food)
    }

    pub fn hill(location: Cell, player: usize) -> Self {
        Self::settled_at(
            location,
            FULL_CELL_SIZE,
            EntityKind::Hill {
                player,
                sprite: HillSprite::Alive,
            },
        )
    }

    pub fn water(location: Cell) -> Self {
        Self::settled_at(location, FULL_CELL_SIZE, EntityKind::Water)
    }

    pub fn attack(from: Cell, to: Cell) -> Self {
        let origin = GridPoint::from(from);
        Self {
            id: None,
            location: origin,
            target_location: GridPoint::from(to),
            size: FULL_CELL_SIZE,
            target_size: FULL_CELL_SIZE,
            alive: true,
            kind: EntityKind::Attack {
                current_target_location: origin,
            },
        }
    }

    /// Jumps every animated value to its target.
    pub fn settled(mut self) -> Self {
        self.snap();
        self
    }

    /// Cell the entity is heading to.
    pub fn cell(&self) -> Cell {
        Cell::new(
            self.target_location.row.round().max(0.0) as usize,
            self.target_location.col.round().max(0.0) as usize,
        )
    }

    pub fn is_settled(&self) -> bool {
        let tip_settled = match self.kind {
            EntityKind::Attack {
                current_target_location,
            } => current_target_location == self.target_location,
            _ => self.location == self.target_location,
        };
        tip_settled && self.size == self.target_size
    }

    /// Covers `fraction` of the remaining distance to every target.
    pub(crate) fn step(&mut self, fraction: f32) {
        if fraction >= 1.0 {
            self.snap();
            return;
        }
        if fraction <= 0.0 {
            return;
        }
        match &mut self.kind {
            EntityKind::Attack {
                current_target_location,
            } => {
                *current_target_location =
                    current_target_location.step_toward(self.target_location, fraction);
            }
            _ => self.location = self.location.step_toward(self.target_location, fraction),
        }
        self.size = step_scalar(self.size, self.target_size, fraction);
    }

    pub(crate) fn snap(&mut self) {
        match &mut self.kind {
            EntityKind::Attack {
                current_target_location,
            } => *current_target_location = self.target_location,
            _ => self.location = self.target_location,
        }
        self.size = self.target_size;
    }

    fn growing(id: Option<String>, location: Cell, nominal: f32, kind: EntityKind) -> Self {
        let point = GridPoint::from(location);
        Self {
            id,
            location: point,
            target_location: point,
            size: 0.0,
            target_size: nominal,
            alive: true,
            kind,
        }
    }

    fn settled_at(location: Cell, size: f32, kind: EntityKind) -> Self {
        let point = GridPoint::from(location);
        Self {
            id: None,
            location: point,
            target_location: point,
            size,
            target_size: size,
            alive: true,
            kind,
        }
    }
}

fn step_scalar(current: f32, target: f32, fraction: f32) -> f32 {
    let next = current + (target - current) * fraction;
    if (target - next).abs() < SNAP_EPSILON {
        target
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_ant_grows_from_zero() {
        let mut ant = Entity::ant("a1", Cell::new(2, 3), 1);
        assert_eq!(ant.size, 0.0);
        assert_eq!(ant.target_size, ANT_SIZE);
        assert_eq!(ant.location, GridPoint::new(2.0, 3.0));

        ant.step(0.5);
        assert!((ant.size - ANT_SIZE / 2.0).abs() < 1e-6);
        ant.step(1.0);
        assert_eq!(ant.size, ANT_SIZE);
    }

    #[test]
    fn step_never_overshoots() {
        let mut ant = Entity::ant("a1", Cell::new(0, 0), 0).settled();
        ant.target_location = GridPoint::new(0.0, 1.0);
        for _ in 0..50 {
            ant.step(0.3);
            assert!(ant.location.col <= 1.0);
        }
        assert_eq!(ant.location.col, 1.0);
    }

    #[test]
    fn tiny_gap_snaps_to_target() {
        let mut ant = Entity::ant("a1", Cell::new(0, 0), 0).settled();
        ant.target_location = GridPoint::new(0.0, 1.0);
        ant.location = GridPoint::new(0.0, 1.0 - SNAP_EPSILON / 2.0);
        ant.step(0.01);
        assert_eq!(ant.location, ant.target_location);
    }

    #[test]
    fn attack_moves_only_its_tip() {
        let mut attack = Entity::attack(Cell::new(1, 1), Cell::new(1, 2));
        attack.step(0.5);

        assert_eq!(attack.location, GridPoint::new(1.0, 1.0));
        match attack.kind {
            EntityKind::Attack {
                current_target_location,
            } => assert!((current_target_location.col - 1.5).abs() < 1e-6),
            other => panic!("unexpected kind {other:?}"),
        }
        attack.step(1.0);
        assert!(attack.is_settled());
        assert_eq!(attack.location, GridPoint::new(1.0, 1.0));
    }

    #[test]
    fn terrain_is_settled_at_full_size() {
        assert!(Entity::water(Cell::new(0, 0)).is_settled());
        let hill = Entity::hill(Cell::new(4, 5), 2);
        assert!(hill.is_settled());
        assert_eq!(hill.cell(), Cell::new(4, 5));
    }
}
