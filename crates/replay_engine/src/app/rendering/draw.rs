use crate::playback::{Entity, EntityKind, EntityRegistry, HillSprite};

use super::sprite::SpriteSet;
use super::style::RenderStyle;
use super::surface::{PixelRect, Surface};
use super::transform::{cell_center_px, centered_square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameOptions {
    pub show_grid: bool,
}

/// Land, then every entity in registry draw order, then the optional grid.
pub fn draw_replay_frame(
    surface: &mut dyn Surface,
    registry: &EntityRegistry,
    style: &RenderStyle,
    sprites: &SpriteSet,
    options: FrameOptions,
) {
    surface.fill(style.land);
    for entity in registry.iter_draw_order() {
        draw_entity(surface, entity, style, sprites);
    }
    if options.show_grid {
        draw_grid(surface, style);
    }
}

fn draw_entity(surface: &mut dyn Surface, entity: &Entity, style: &RenderStyle, sprites: &SpriteSet) {
    let scale = style.scale;
    match entity.kind {
        EntityKind::Water => {
            let rect = centered_square(entity.location, entity.size, scale);
            match &sprites.water {
                Some(sprite) => surface.blit_sprite(sprite, rect),
                None => surface.fill_rect(rect, style.water),
            }
        }
        EntityKind::Hill { player, sprite } => {
            draw_hill(surface, entity, player, sprite, style, sprites);
        }
        EntityKind::Food => {
            let rect = centered_square(entity.location, entity.size, scale);
            surface.fill_rect(rect, style.food);
        }
        EntityKind::Ant { player } => {
            let center = cell_center_px(entity.location, scale);
            surface.fill_circle(center, entity.size * scale as f32, style.player_color(player));
        }
        EntityKind::Attack {
            current_target_location,
        } => {
            let from = cell_center_px(entity.location, scale);
            let to = cell_center_px(current_target_location, scale);
            surface.draw_line(from, to, style.attack_width, style.attack);
        }
    }
}

fn draw_hill(
    surface: &mut dyn Surface,
    entity: &Entity,
    player: usize,
    sprite: HillSprite,
    style: &RenderStyle,
    sprites: &SpriteSet,
) {
    let scale = style.scale as f32;
    let center = cell_center_px(entity.location, style.scale);
    let rect = centered_square(entity.location, entity.size, style.scale);
    let radius = entity.size * scale * 0.5;

    match sprites.hill(sprite) {
        Some(image) => {
            surface.blit_sprite(image, rect);
            if entity.alive {
                surface.stroke_circle(
                    center,
                    scale * 0.25,
                    style.hill_outline_width,
                    style.player_color(player),
                );
            }
        }
        None => {
            let body = match sprite {
                HillSprite::Alive => style.player_color(player),
                HillSprite::Razed => style.razed_hill,
            };
            surface.fill_circle(center, radius, body);
            surface.fill_circle(center, radius * 0.5, style.hill_core);
        }
    }
}

/// One-pixel outline around every cell.
fn draw_grid(surface: &mut dyn Surface, style: &RenderStyle) {
    let (width, height) = surface.size();
    let scale = style.scale.max(1) as i32;
    let line = style.grid_width.max(1);
    let (width, height) = (width as i32, height as i32);

    let mut x = 0;
    while x < width {
        surface.fill_rect(PixelRect::new(x, 0, line, height), style.grid);
        surface.fill_rect(PixelRect::new(x + scale - line, 0, line, height), style.grid);
        x += scale;
    }
    let mut y = 0;
    while y < height {
        surface.fill_rect(PixelRect::new(0, y, width, line), style.grid);
        surface.fill_rect(PixelRect::new(0, y + scale - line, width, line), style.grid);
        y += scale;
    }
}
