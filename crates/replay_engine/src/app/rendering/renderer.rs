use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::playback::EntityRegistry;

use super::draw::{draw_replay_frame, FrameOptions};
use super::hud::{draw_hud, HudLine};
use super::sprite::SpriteSet;
use super::style::RenderStyle;
use super::surface::FrameSurface;
use super::Viewport;

/// Presents frames through a `pixels` buffer sized to the map. The buffer is
/// scaled to whatever size the window has.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    buffer: Viewport,
    window_size: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>, buffer: Viewport) -> Result<Self, Error> {
        let size = window.inner_size();
        let window_size = Viewport {
            width: size.width.max(1),
            height: size.height.max(1),
        };
        let pixels = Self::build_pixels(Arc::clone(&window), buffer, window_size)?;
        Ok(Self {
            window,
            pixels,
            buffer,
            window_size,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let window_size = Viewport { width, height };
        self.pixels = Self::build_pixels(Arc::clone(&self.window), self.buffer, window_size)?;
        self.window_size = window_size;
        Ok(())
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn buffer_size(&self) -> Viewport {
        self.buffer
    }

    fn build_pixels(
        window: Arc<Window>,
        buffer: Viewport,
        window_size: Viewport,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(window_size.width, window_size.height, window);
        Pixels::new(buffer.width, buffer.height, surface)
    }

    pub fn render_frame(
        &mut self,
        registry: &EntityRegistry,
        style: &RenderStyle,
        sprites: &SpriteSet,
        options: FrameOptions,
        hud: Option<&[HudLine]>,
    ) -> Result<(), Error> {
        if self.window_size.width == 0 || self.window_size.height == 0 {
            return Ok(());
        }
        {
            let frame = self.pixels.frame_mut();
            let Some(mut surface) = FrameSurface::new(frame, self.buffer.width, self.buffer.height)
            else {
                return Ok(());
            };
            draw_replay_frame(&mut surface, registry, style, sprites, options);
            if let Some(lines) = hud {
                draw_hud(&mut surface, lines);
            }
        }
        self.pixels.render()
    }
}
