mod draw;
mod hud;
mod renderer;
mod sprite;
mod style;
mod surface;
mod transform;

pub use draw::{draw_replay_frame, FrameOptions};
pub use hud::{build_hud_lines, draw_hud, HudData, HudLine};
pub use renderer::Renderer;
pub use sprite::{split_hill_sheet, Sprite, SpriteError, SpriteSet, HILL_SPRITE_FILE, WATER_SPRITE_FILE};
pub use style::{RenderStyle, PLAYER_COLORS};
pub use surface::{FrameSurface, PixelRect, Rgba, Surface};
pub use transform::{cell_center_px, centered_square, grid_to_pixel, Viewport};
