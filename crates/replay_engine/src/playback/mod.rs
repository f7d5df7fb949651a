mod clock;
mod entity;
mod registry;
mod scheduler;

pub use clock::{position_at, ClockPosition, PhaseClock};
pub use entity::{
    Entity, EntityKind, GridPoint, HillSprite, ANT_SIZE, FOOD_SIZE, FULL_CELL_SIZE, SNAP_EPSILON,
};
pub use registry::{EntityRegistry, RegistryError, RemovalTarget};
pub use scheduler::{Playback, PlaybackError, PlaybackObserver, PlaybackStatus, Slot};
