pub mod app;
pub mod playback;
pub mod replay;

pub use app::{run_viewer, AppError, InputAction, LoopMetricsSnapshot, ViewerConfig};
pub use playback::{
    EntityRegistry, Playback, PlaybackError, PlaybackObserver, PlaybackStatus, Slot,
};
pub use replay::{LogFormatError, MapFormatError, Phase, Replay, ReplayLoadError, Turn};
