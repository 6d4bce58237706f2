//! Sprite frames
//!
//! Each frame is loaded from a raw big-endian RGB565 file when present.
//! Missing or truncated files fall back to a procedural placeholder drawn
//! with embedded-graphics primitives on a sky-blue background.

use std::convert::Infallible;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use embedded_graphics::{
    image::{Image, ImageRawBE},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle, Triangle},
};

use crate::consts::*;

/// RGB565 palette (hex values are the raw 16-bit encodings)
pub mod colors {
    use embedded_graphics::pixelcolor::Rgb565;

    pub const SKY_BLUE: Rgb565 = Rgb565::new(7, 20, 31); // 0x3A9F
    pub const GROUND_GREEN: Rgb565 = Rgb565::new(4, 44, 9); // 0x2589
    pub const TREE_GREEN: Rgb565 = Rgb565::new(4, 34, 4); // 0x2444
    pub const TREE_BROWN: Rgb565 = Rgb565::new(14, 10, 0); // 0x7140
    pub const RED: Rgb565 = Rgb565::new(31, 0, 0); // 0xF800
    pub const YELLOW: Rgb565 = Rgb565::new(31, 63, 0); // 0xFFE0
    pub const ORANGE: Rgb565 = Rgb565::new(31, 45, 0); // 0xFDA0
    pub const GREEN: Rgb565 = Rgb565::new(0, 63, 0); // 0x07E0
    pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);
    pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);
}

use colors::*;

/// An owned RGB565 bitmap. Also a draw target, so placeholders can be
/// painted into it with primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    size: Size,
    pixels: Vec<Rgb565>,
}

impl Sprite {
    /// A sprite filled with one color
    pub fn filled(width: u32, height: u32, color: Rgb565) -> Self {
        Self {
            size: Size::new(width, height),
            pixels: vec![color; (width * height) as usize],
        }
    }

    /// Decode `width * height` big-endian RGB565 pixels. Extra trailing
    /// bytes are ignored; a short buffer is an error.
    pub fn from_be_bytes(bytes: &[u8], width: u32, height: u32) -> anyhow::Result<Self> {
        let needed = (width * height * 2) as usize;
        if bytes.len() < needed {
            anyhow::bail!(
                "expected {} bytes for a {}x{} frame, got {}",
                needed,
                width,
                height,
                bytes.len()
            );
        }

        let mut sprite = Self::filled(width, height, SKY_BLUE);
        let raw = ImageRawBE::<Rgb565>::new(&bytes[..needed], width);
        let Ok(()) = Image::new(&raw, Point::zero()).draw(&mut sprite);
        Ok(sprite)
    }

    pub fn width(&self) -> i32 {
        self.size.width as i32
    }

    pub fn height(&self) -> i32 {
        self.size.height as i32
    }

    /// Pixel at sprite-local coordinates
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixels.get((y * self.width() + x) as usize).copied()
    }

    /// Blit the sprite with its top-left corner at `top_left`
    pub fn draw_at<D>(&self, target: &mut D, top_left: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.fill_contiguous(
            &Rectangle::new(top_left, self.size),
            self.pixels.iter().copied(),
        )
    }
}

impl OriginDimensions for Sprite {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Sprite {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = (self.width(), self.height());
        for Pixel(p, color) in pixels {
            if (0..w).contains(&p.x) && (0..h).contains(&p.y) {
                self.pixels[(p.y * w + p.x) as usize] = color;
            }
        }
        Ok(())
    }
}

/// Every frame the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteId {
    Sleigh0,
    Sleigh1,
    Duck0,
    Duck1,
    Foe0,
    Foe1,
    Gift,
    Tree,
    Explosion0,
    Explosion1,
}

impl SpriteId {
    pub const ALL: [SpriteId; 10] = [
        SpriteId::Sleigh0,
        SpriteId::Sleigh1,
        SpriteId::Duck0,
        SpriteId::Duck1,
        SpriteId::Foe0,
        SpriteId::Foe1,
        SpriteId::Gift,
        SpriteId::Tree,
        SpriteId::Explosion0,
        SpriteId::Explosion1,
    ];

    /// File name under the asset root
    pub fn file_name(&self) -> &'static str {
        match self {
            SpriteId::Sleigh0 => "sleigh0.bin",
            SpriteId::Sleigh1 => "sleigh1.bin",
            SpriteId::Duck0 => "duck0.bin",
            SpriteId::Duck1 => "duck1.bin",
            SpriteId::Foe0 => "foe0.bin",
            SpriteId::Foe1 => "foe1.bin",
            SpriteId::Gift => "gift0.bin",
            SpriteId::Tree => "tree.bin",
            SpriteId::Explosion0 => "explosion0.bin",
            SpriteId::Explosion1 => "explosion1.bin",
        }
    }

    /// Frame size in pixels
    pub fn size(&self) -> (u32, u32) {
        let (w, h) = match self {
            SpriteId::Gift => (GIFT_WIDTH, GIFT_HEIGHT),
            SpriteId::Tree => (TREE_WIDTH, TREE_HEIGHT),
            SpriteId::Duck0 | SpriteId::Duck1 | SpriteId::Foe0 | SpriteId::Foe1 => {
                (DUCK_WIDTH, DUCK_HEIGHT)
            }
            _ => (SLEIGH_WIDTH, SLEIGH_HEIGHT),
        };
        (w as u32, h as u32)
    }

    /// Placeholder frame drawn with primitives
    pub fn procedural(&self) -> Sprite {
        let (w, h) = self.size();
        let mut sprite = Sprite::filled(w, h, SKY_BLUE);
        let Ok(()) = paint(*self, &mut sprite);
        sprite
    }
}

fn disc(cx: i32, cy: i32, r: u32) -> Circle {
    Circle::with_center(Point::new(cx, cy), 2 * r + 1)
}

fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
}

fn tri(a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> Triangle {
    Triangle::new(
        Point::new(a.0, a.1),
        Point::new(b.0, b.1),
        Point::new(c.0, c.1),
    )
}

fn paint(id: SpriteId, s: &mut Sprite) -> Result<(), Infallible> {
    let fill = PrimitiveStyle::with_fill;
    let (w, h) = (s.width(), s.height());

    match id {
        // Both sleigh frames share one placeholder
        SpriteId::Sleigh0 | SpriteId::Sleigh1 => {
            rect(2, 2, (w - 4) as u32, (h - 4) as u32)
                .into_styled(fill(RED))
                .draw(s)?;
            Line::new(Point::new(0, h - 1), Point::new(w, h - 1))
                .into_styled(PrimitiveStyle::with_stroke(RED, 1))
                .draw(s)?;
            rect(4, 0, 6, 4).into_styled(fill(GREEN)).draw(s)?;
        }
        SpriteId::Duck0 | SpriteId::Duck1 => {
            // Second frame: body down a pixel, head and beak up a pixel
            let d = if id == SpriteId::Duck1 { 1 } else { 0 };
            disc(6, 7 + d, 5).into_styled(fill(YELLOW)).draw(s)?;
            disc(12, 5 - d, 4).into_styled(fill(YELLOW)).draw(s)?;
            tri((15, 5 - d), (19, 4 - d), (19, 6 - d))
                .into_styled(fill(ORANGE))
                .draw(s)?;
            disc(13, 4 - d, 1).into_styled(fill(BLACK)).draw(s)?;
        }
        SpriteId::Foe0 | SpriteId::Foe1 => {
            disc(10, 7, 6).into_styled(fill(BLACK)).draw(s)?;
            disc(8, 5, 2).into_styled(fill(RED)).draw(s)?;
            let legs = if id == SpriteId::Foe0 {
                rect(6, 10, 8, 3)
            } else {
                rect(5, 9, 10, 3)
            };
            legs.into_styled(fill(BLACK)).draw(s)?;
        }
        SpriteId::Gift => {
            // Drawn on the wider flyer grid; the frame keeps the left 13 columns
            rect(5, 4, 10, 8).into_styled(fill(RED)).draw(s)?;
            rect(9, 3, 2, 10).into_styled(fill(YELLOW)).draw(s)?;
            rect(4, 7, 12, 2).into_styled(fill(YELLOW)).draw(s)?;
            disc(10, 5, 2).into_styled(fill(YELLOW)).draw(s)?;
        }
        SpriteId::Tree => {
            let trunk_w = 6;
            let trunk_h = h / 4;
            rect(w / 2 - trunk_w / 2, h - trunk_h, trunk_w as u32, trunk_h as u32)
                .into_styled(fill(TREE_BROWN))
                .draw(s)?;
            let layer_h = (h - trunk_h) / 3;
            for i in 0..3 {
                let layer_w = w - i * 4;
                let top = trunk_h + i * layer_h;
                tri(
                    (w / 2, top),
                    (w / 2 - layer_w / 2, top + layer_h),
                    (w / 2 + layer_w / 2, top + layer_h),
                )
                .into_styled(fill(TREE_GREEN))
                .draw(s)?;
            }
        }
        SpriteId::Explosion0 => {
            disc(10, 7, 8).into_styled(fill(RED)).draw(s)?;
            disc(10, 7, 5).into_styled(fill(ORANGE)).draw(s)?;
            disc(10, 7, 2).into_styled(fill(YELLOW)).draw(s)?;
            for spike in [
                tri((10, 0), (8, 4), (12, 4)),
                tri((18, 7), (14, 6), (14, 8)),
                tri((2, 7), (6, 6), (6, 8)),
                tri((10, 14), (8, 10), (12, 10)),
            ] {
                spike.into_styled(fill(ORANGE)).draw(s)?;
            }
        }
        SpriteId::Explosion1 => {
            disc(10, 7, 7).into_styled(fill(ORANGE)).draw(s)?;
            disc(10, 7, 4).into_styled(fill(YELLOW)).draw(s)?;
            disc(10, 7, 1).into_styled(fill(WHITE)).draw(s)?;
            for spike in [
                tri((10, 1), (7, 5), (13, 5)),
                tri((17, 7), (13, 5), (13, 9)),
                tri((3, 7), (7, 5), (7, 9)),
                tri((10, 13), (7, 9), (13, 9)),
            ] {
                spike.into_styled(fill(RED)).draw(s)?;
            }
        }
    }
    Ok(())
}

/// Where frame files come from
pub trait AssetSource {
    /// Raw file contents, or `None` when the file does not exist
    fn read(&self, name: &str) -> anyhow::Result<Option<Vec<u8>>>;
}

/// Frame files in a directory
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl AssetSource for DirAssetSource {
    fn read(&self, name: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let path = self.root.join(name);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        Ok(Some(bytes))
    }
}

/// No files at all; every frame is procedural
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetSource for NoAssets {
    fn read(&self, _name: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// The full frame set, indexed by `SpriteId`
#[derive(Debug, Clone)]
pub struct Sprites {
    frames: Vec<Sprite>,
    /// How many frames came from files
    pub loaded: usize,
}

impl Sprites {
    /// Load every frame, falling back per frame
    pub fn load(source: &impl AssetSource) -> Self {
        let mut loaded = 0;
        let frames = SpriteId::ALL
            .iter()
            .map(|id| match load_frame(source, *id) {
                Ok(Some(sprite)) => {
                    loaded += 1;
                    sprite
                }
                Ok(None) => {
                    log::debug!("{} missing, drawing placeholder", id.file_name());
                    id.procedural()
                }
                Err(e) => {
                    log::warn!("{}: {:#}; drawing placeholder", id.file_name(), e);
                    id.procedural()
                }
            })
            .collect();

        log::info!("Sprites: {} of {} loaded from files", loaded, SpriteId::ALL.len());
        Self { frames, loaded }
    }

    /// All placeholders
    pub fn procedural() -> Self {
        Self::load(&NoAssets)
    }

    pub fn get(&self, id: SpriteId) -> &Sprite {
        &self.frames[id as usize]
    }
}

impl Default for Sprites {
    fn default() -> Self {
        Self::procedural()
    }
}

fn load_frame(source: &impl AssetSource, id: SpriteId) -> anyhow::Result<Option<Sprite>> {
    let Some(bytes) = source.read(id.file_name())? else {
        return Ok(None);
    };
    let (w, h) = id.size();
    Sprite::from_be_bytes(&bytes, w, h).map(Some)
}
