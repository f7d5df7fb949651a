use super::sprite::Sprite;

pub type Rgba = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// 2D drawing target. Coordinates are pixels; anything outside is clipped.
pub trait Surface {
    fn size(&self) -> (u32, u32);

    fn fill(&mut self, color: Rgba);

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba);

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: Rgba);

    /// Ring whose outer edge is `radius` and which extends `thickness` inward.
    fn stroke_circle(&mut self, center: (f32, f32), radius: f32, thickness: f32, color: Rgba);

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, color: Rgba);

    /// Nearest-neighbour scaled copy of `sprite` into `rect`. Fully transparent
    /// texels are skipped.
    fn blit_sprite(&mut self, sprite: &Sprite, rect: PixelRect);
}

/// [`Surface`] over a row-major RGBA8 frame.
pub struct FrameSurface<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> FrameSurface<'a> {
    /// `None` when the buffer is not exactly `width * height * 4` bytes.
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))?;
        (frame.len() == expected).then_some(Self {
            frame,
            width,
            height,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let bytes = self.frame.get(offset..offset + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn clip(&self, rect: PixelRect) -> Option<(i32, i32, i32, i32)> {
        let left = rect.x.max(0);
        let top = rect.y.max(0);
        let right = rect.right().min(self.width as i32);
        let bottom = rect.bottom().min(self.height as i32);
        (left < right && top < bottom).then_some((left, top, right, bottom))
    }

    /// Bounding box of a shape, clipped to the frame.
    fn bounds(&self, min: (f32, f32), max: (f32, f32)) -> Option<(i32, i32, i32, i32)> {
        let left = min.0.floor() as i32;
        let top = min.1.floor() as i32;
        let right = max.0.ceil() as i32 + 1;
        let bottom = max.1.ceil() as i32 + 1;
        self.clip(PixelRect::new(left, top, right - left, bottom - top))
    }

    fn put(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let Some(pixel) = self.frame.get_mut(offset..offset + 4) else {
            return;
        };
        match color[3] {
            0 => {}
            255 => pixel.copy_from_slice(&color),
            alpha => {
                let a = alpha as u16;
                for channel in 0..3 {
                    let src = color[channel] as u16;
                    let dst = pixel[channel] as u16;
                    pixel[channel] = ((src * a + dst * (255 - a)) / 255) as u8;
                }
                pixel[3] = 255;
            }
        }
    }
}

impl Surface for FrameSurface<'_> {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill(&mut self, color: Rgba) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba) {
        let Some((left, top, right, bottom)) = self.clip(rect) else {
            return;
        };
        for y in top..bottom {
            for x in left..right {
                self.put(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: Rgba) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        let (cx, cy) = center;
        let Some((left, top, right, bottom)) =
            self.bounds((cx - radius, cy - radius), (cx + radius, cy + radius))
        else {
            return;
        };
        let radius_sq = radius * radius;
        for y in top..bottom {
            for x in left..right {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= radius_sq {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn stroke_circle(&mut self, center: (f32, f32), radius: f32, thickness: f32, color: Rgba) {
        if radius.is_nan() || radius <= 0.0 || thickness.is_nan() || thickness <= 0.0 {
            return;
        }
        let (cx, cy) = center;
        let Some((left, top, right, bottom)) =
            self.bounds((cx - radius, cy - radius), (cx + radius, cy + radius))
        else {
            return;
        };
        let outer_sq = radius * radius;
        let inner = (radius - thickness).max(0.0);
        let inner_sq = inner * inner;
        for y in top..bottom {
            for x in left..right {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let distance_sq = dx * dx + dy * dy;
                if distance_sq <= outer_sq && (inner == 0.0 || distance_sq > inner_sq) {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, color: Rgba) {
        let half = (thickness.max(1.0)) * 0.5;
        let Some((left, top, right, bottom)) = self.bounds(
            (from.0.min(to.0) - half, from.1.min(to.1) - half),
            (from.0.max(to.0) + half, from.1.max(to.1) + half),
        ) else {
            return;
        };
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length_sq = dx * dx + dy * dy;
        let half_sq = half * half;
        for y in top..bottom {
            for x in left..right {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let t = if length_sq > 0.0 {
                    (((px - from.0) * dx + (py - from.1) * dy) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let nx = from.0 + dx * t - px;
                let ny = from.1 + dy * t - py;
                if nx * nx + ny * ny <= half_sq {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn blit_sprite(&mut self, sprite: &Sprite, rect: PixelRect) {
        if sprite.width == 0 || sprite.height == 0 || rect.is_empty() {
            return;
        }
        let Some((left, top, right, bottom)) = self.clip(rect) else {
            return;
        };
        let x_ratio = sprite.width as f32 / rect.width as f32;
        let y_ratio = sprite.height as f32 / rect.height as f32;
        for y in top..bottom {
            let src_y = (((y - rect.y) as f32 * y_ratio) as u32).min(sprite.height - 1);
            for x in left..right {
                let src_x = (((x - rect.x) as f32 * x_ratio) as u32).min(sprite.width - 1);
                let texel = sprite.pixel(src_x, src_y);
                if texel[3] == 0 {
                    continue;
                }
                self.put(x, y, texel);
            }
        }
    }
}
