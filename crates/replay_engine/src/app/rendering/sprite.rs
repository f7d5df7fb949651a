use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::{info, warn};

use crate::playback::HillSprite;

pub const HILL_SPRITE_FILE: &str = "hill.png";
pub const WATER_SPRITE_FILE: &str = "water.png";

#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("failed to open sprite {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode sprite {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("sprite sheet {path} is {width}x{height}, too small to split into alive and razed halves")]
    SheetTooSmall {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

/// Decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Sprite {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        (width > 0 && height > 0 && rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SpriteError> {
        let reader = ImageReader::open(path).map_err(|source| SpriteError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = reader.decode().map_err(|source| SpriteError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let image = decoded.to_rgba8();
        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        match self.rgba.get(offset..offset + 4) {
            Some(bytes) => [bytes[0], bytes[1], bytes[2], bytes[3]],
            None => [0, 0, 0, 0],
        }
    }

    /// Rows `[top, top + rows)` as a new sprite.
    fn rows(&self, top: u32, rows: u32) -> Sprite {
        let row_bytes = self.width as usize * 4;
        let start = top as usize * row_bytes;
        let end = start + rows as usize * row_bytes;
        Sprite {
            width: self.width,
            height: rows,
            rgba: self
                .rgba
                .get(start..end)
                .map(<[u8]>::to_vec)
                .unwrap_or_else(|| vec![0; end - start]),
        }
    }
}

/// Splits a hill sheet: the top half is the alive hill, the bottom half razed.
pub fn split_hill_sheet(sheet: &Sprite, path: &Path) -> Result<(Sprite, Sprite), SpriteError> {
    if sheet.height < 2 || sheet.width == 0 {
        return Err(SpriteError::SheetTooSmall {
            path: path.to_path_buf(),
            width: sheet.width,
            height: sheet.height,
        });
    }
    let half = sheet.height / 2;
    Ok((sheet.rows(0, half), sheet.rows(half, half)))
}

/// Optional sprites. Anything missing is drawn with shapes instead.
#[derive(Debug, Clone, Default)]
pub struct SpriteSet {
    pub hill_alive: Option<Sprite>,
    pub hill_razed: Option<Sprite>,
    pub water: Option<Sprite>,
}

impl SpriteSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads `hill.png` and `water.png` from `dir`, warning once for each
    /// sprite that cannot be used.
    pub fn load_from_dir(dir: &Path) -> Self {
        let mut sprites = Self::empty();

        let hill_path = dir.join(HILL_SPRITE_FILE);
        match Sprite::load(&hill_path).and_then(|sheet| split_hill_sheet(&sheet, &hill_path)) {
            Ok((alive, razed)) => {
                sprites.hill_alive = Some(alive);
                sprites.hill_razed = Some(razed);
            }
            Err(error) => warn!(
                path = %hill_path.display(),
                error = %error,
                "sprite_load_failed_using_shapes"
            ),
        }

        let water_path = dir.join(WATER_SPRITE_FILE);
        match Sprite::load(&water_path) {
            Ok(water) => sprites.water = Some(water),
            Err(error) => warn!(
                path = %water_path.display(),
                error = %error,
                "sprite_load_failed_using_shapes"
            ),
        }

        info!(
            dir = %dir.display(),
            hill = sprites.hill_alive.is_some(),
            water = sprites.water.is_some(),
            "sprites_loaded"
        );
        sprites
    }

    pub fn hill(&self, sprite: HillSprite) -> Option<&Sprite> {
        match sprite {
            HillSprite::Alive => self.hill_alive.as_ref(),
            HillSprite::Razed => self.hill_razed.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn two_tone_sheet() -> RgbaImage {
        RgbaImage::from_fn(2, 4, |_, y| {
            if y < 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn hill_sheet_splits_into_alive_and_razed_halves() {
        let dir = tempfile::tempdir().expect("tempdir");
        two_tone_sheet()
            .save(dir.path().join(HILL_SPRITE_FILE))
            .expect("save hill");

        let sprites = SpriteSet::load_from_dir(dir.path());

        let alive = sprites.hill(HillSprite::Alive).expect("alive");
        let razed = sprites.hill(HillSprite::Razed).expect("razed");
        assert_eq!((alive.width, alive.height), (2, 2));
        assert_eq!(alive.pixel(1, 1), [255, 0, 0, 255]);
        assert_eq!(razed.pixel(0, 0), [0, 0, 255, 255]);
        assert!(sprites.water.is_none());
    }

    #[test]
    fn missing_directory_yields_no_sprites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sprites = SpriteSet::load_from_dir(&dir.path().join("absent"));

        assert!(sprites.hill_alive.is_none());
        assert!(sprites.hill_razed.is_none());
        assert!(sprites.water.is_none());
    }

    #[test]
    fn undecodable_sprite_reports_decode_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(WATER_SPRITE_FILE);
        std::fs::write(&path, b"not a png").expect("write");

        let err = Sprite::load(&path).expect_err("decode");
        assert!(matches!(err, SpriteError::Decode { .. }));
    }

    #[test]
    fn single_row_sheet_is_too_small() {
        let sheet = Sprite::from_rgba(1, 1, vec![0, 0, 0, 255]).expect("sprite");
        let err = split_hill_sheet(&sheet, Path::new("hill.png")).expect_err("too small");
        assert!(matches!(err, SpriteError::SheetTooSmall { height: 1, .. }));
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        assert!(Sprite::from_rgba(2, 2, vec![0; 8]).is_none());
        assert!(Sprite::from_rgba(0, 2, Vec::new()).is_none());
    }
}
