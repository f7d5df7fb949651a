use super::surface::Rgba;

pub const PLAYER_COLORS: [Rgba; 10] = [
    [212, 17, 50, 255],
    [232, 110, 48, 255],
    [230, 179, 25, 255],
    [246, 246, 85, 255],
    [166, 229, 153, 255],
    [46, 184, 126, 255],
    [48, 140, 232, 255],
    [99, 23, 207, 255],
    [214, 92, 214, 255],
    [207, 175, 183, 255],
];

const LAND_COLOR: Rgba = [120, 89, 58, 255];
const WATER_COLOR: Rgba = [1, 6, 71, 255];
const FOOD_COLOR: Rgba = [153, 145, 102, 255];
const RAZED_HILL_COLOR: Rgba = [70, 62, 54, 255];
const BLACK: Rgba = [0, 0, 0, 255];

/// Colors and stroke widths for one viewer session.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub scale: u32,
    pub land: Rgba,
    pub water: Rgba,
    pub food: Rgba,
    pub razed_hill: Rgba,
    pub hill_core: Rgba,
    pub grid: Rgba,
    pub attack: Rgba,
    pub attack_width: f32,
    pub grid_width: i32,
    /// Ring that marks a live hill's owner.
    pub hill_outline_width: f32,
    pub player_colors: Vec<Rgba>,
}

impl RenderStyle {
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
            land: LAND_COLOR,
            water: WATER_COLOR,
            food: FOOD_COLOR,
            razed_hill: RAZED_HILL_COLOR,
            hill_core: BLACK,
            grid: BLACK,
            attack: BLACK,
            attack_width: 2.0,
            grid_width: 1,
            hill_outline_width: 3.0,
            player_colors: PLAYER_COLORS.to_vec(),
        }
    }

    /// Players beyond the palette reuse colors cyclically.
    pub fn player_color(&self, player: usize) -> Rgba {
        if self.player_colors.is_empty() {
            return BLACK;
        }
        self.player_colors[player % self.player_colors.len()]
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::new(10)
    }
}
