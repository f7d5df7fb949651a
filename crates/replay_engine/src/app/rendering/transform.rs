use crate::playback::GridPoint;
use crate::replay::Map;

use super::surface::PixelRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Frame size for a map drawn at `scale` pixels per cell.
    pub fn for_map(map: &Map, scale: u32) -> Self {
        let scale = scale.max(1);
        Self {
            width: (map.width as u32).saturating_mul(scale).max(1),
            height: (map.height as u32).saturating_mul(scale).max(1),
        }
    }
}

/// Top-left pixel of a grid point: `(row, col) * scale`.
pub fn grid_to_pixel(point: GridPoint, scale: u32) -> (f32, f32) {
    let scale = scale as f32;
    (point.col * scale, point.row * scale)
}

/// Pixel center of the cell whose top-left corner is `point`.
pub fn cell_center_px(point: GridPoint, scale: u32) -> (f32, f32) {
    let (x, y) = grid_to_pixel(point, scale);
    let half = scale as f32 * 0.5;
    (x + half, y + half)
}

/// Square of side `size * scale` centered in the cell at `point`.
pub fn centered_square(point: GridPoint, size: f32, scale: u32) -> PixelRect {
    let (x, y) = grid_to_pixel(point, scale);
    let side = (size.max(0.0) * scale as f32).round() as i32;
    let offset = (scale as i32 - side) / 2;
    PixelRect::new(
        x.round() as i32 + offset,
        y.round() as i32 + offset,
        side,
        side,
    )
}
