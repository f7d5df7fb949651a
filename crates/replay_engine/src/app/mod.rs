mod input;
mod loop_runner;
mod metrics;
mod pacing;
mod rendering;

pub use input::InputAction;
pub use loop_runner::{
    run_viewer, AppError, ViewerConfig, DEFAULT_SCALE, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED,
};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    build_hud_lines, cell_center_px, centered_square, draw_hud, draw_replay_frame, grid_to_pixel,
    split_hill_sheet, FrameOptions, FrameSurface, HudData, HudLine, PixelRect, RenderStyle,
    Renderer, Rgba, Sprite, SpriteError, SpriteSet, Surface, Viewport, HILL_SPRITE_FILE,
    PLAYER_COLORS, WATER_SPRITE_FILE,
};
