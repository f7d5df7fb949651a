use crate::replay::{Phase, Turn};

use super::style::RenderStyle;
use super::surface::{PixelRect, Rgba, Surface};

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
const TEXT_SCALE: i32 = 2;
const GLYPH_ADVANCE: i32 = (GLYPH_WIDTH + 1) * TEXT_SCALE;
const LINE_ADVANCE: i32 = (GLYPH_HEIGHT + 2) * TEXT_SCALE;
const HUD_PADDING: i32 = 4 * TEXT_SCALE;
const HUD_PANEL_INSET: i32 = 3 * TEXT_SCALE;
const HUD_TEXT_COLOR: Rgba = [244, 248, 252, 255];
const HUD_DIM_COLOR: Rgba = [176, 198, 220, 255];
const HUD_PANEL_BG_COLOR: Rgba = [10, 12, 16, 190];
const HUD_PANEL_BORDER_COLOR: Rgba = [92, 106, 126, 255];

#[derive(Debug, Clone)]
pub struct HudData<'a> {
    pub turn: Option<&'a Turn>,
    pub last_turn: usize,
    pub phase: Phase,
    pub speed: f64,
    pub paused: bool,
    pub finished_reason: Option<&'a str>,
    pub fps: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudLine {
    pub text: String,
    pub color: Rgba,
}

impl HudLine {
    fn new(text: String, color: Rgba) -> Self {
        Self { text, color }
    }
}

pub fn build_hud_lines(data: &HudData<'_>, style: &RenderStyle) -> Vec<HudLine> {
    let turn_number = data.turn.map(|turn| turn.turn_number).unwrap_or(0);
    let mut lines = vec![HudLine::new(
        format!(
            "Turn {}/{} {}",
            turn_number,
            data.last_turn,
            data.phase.name()
        ),
        HUD_TEXT_COLOR,
    )];

    let mut speed_line = format!("Speed {:.2}x", data.speed);
    if data.paused {
        speed_line.push_str(" paused");
    }
    lines.push(HudLine::new(speed_line, HUD_DIM_COLOR));

    if let Some(turn) = data.turn {
        let players = turn.ants.len().max(turn.hive.len()).max(turn.scores.len());
        for player in 0..players {
            let value = |values: &[usize]| values.get(player).copied().unwrap_or(0);
            lines.push(HudLine::new(
                format!(
                    "P{} ants {} hive {} score {}",
                    player,
                    value(&turn.ants),
                    value(&turn.hive),
                    value(&turn.scores)
                ),
                style.player_color(player),
            ));
        }
    }

    if let Some(reason) = data.finished_reason {
        lines.push(HudLine::new(format!("Finished: {reason}"), HUD_TEXT_COLOR));
    }
    lines.push(HudLine::new(format!("FPS {:.0}", data.fps), HUD_DIM_COLOR));
    lines
}

/// Text panel anchored at the top-left corner.
pub fn draw_hud(surface: &mut dyn Surface, lines: &[HudLine]) {
    let (width, height) = surface.size();
    if width == 0 || height == 0 || lines.is_empty() {
        return;
    }

    let longest = lines
        .iter()
        .map(|line| line.text.chars().count() as i32)
        .max()
        .unwrap_or(0);
    let panel = PixelRect::new(
        HUD_PADDING - HUD_PANEL_INSET,
        HUD_PADDING - HUD_PANEL_INSET,
        longest * GLYPH_ADVANCE + HUD_PANEL_INSET * 2,
        lines.len() as i32 * LINE_ADVANCE + HUD_PANEL_INSET * 2,
    );
    surface.fill_rect(panel, HUD_PANEL_BG_COLOR);
    draw_rect_outline(surface, panel, HUD_PANEL_BORDER_COLOR);

    let mut y = HUD_PADDING;
    for line in lines {
        draw_text(surface, HUD_PADDING, y, &line.text, line.color);
        y += LINE_ADVANCE;
    }
}

fn draw_rect_outline(surface: &mut dyn Surface, rect: PixelRect, color: Rgba) {
    if rect.width <= 1 || rect.height <= 1 {
        return;
    }
    surface.fill_rect(PixelRect::new(rect.x, rect.y, rect.width, 1), color);
    surface.fill_rect(PixelRect::new(rect.x, rect.bottom() - 1, rect.width, 1), color);
    surface.fill_rect(PixelRect::new(rect.x, rect.y, 1, rect.height), color);
    surface.fill_rect(PixelRect::new(rect.right() - 1, rect.y, 1, rect.height), color);
}

fn draw_text(surface: &mut dyn Surface, mut x: i32, y: i32, text: &str, color: Rgba) {
    for ch in text.chars() {
        if let Some(rows) = glyph_rows(ch) {
            draw_glyph(surface, x, y, rows, color);
        }
        x += GLYPH_ADVANCE;
    }
}

fn draw_glyph(surface: &mut dyn Surface, x: i32, y: i32, rows: [u8; 5], color: Rgba) {
    for (row_index, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            surface.fill_rect(
                PixelRect::new(
                    x + col * TEXT_SCALE,
                    y + row_index as i32 * TEXT_SCALE,
                    TEXT_SCALE,
                    TEXT_SCALE,
                ),
                color,
            );
        }
    }
}

/// 3x5 bitmap rows, most significant bit leftmost. Lowercase draws as uppercase;
/// anything unknown draws as a blank cell.
fn glyph_rows(ch: char) -> Option<[u8; 5]> {
    let rows = match ch.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b011, 0b000, 0b010],
        _ => return None,
    };
    Some(rows)
}
