use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use raylib::prelude::*;

use crate::core::maze::TileMap;

/// Handle of an image in the texture store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageKey {
    /// Square wall tile, keyed by the map's texture id
    Wall(u32),
    /// Sprite frame, keyed by registration order
    Sprite(u32),
}

/// Sub-rectangle of an image, in image pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl SourceRect {
    pub fn whole((w, h): (u32, u32)) -> Self {
        Self { x: 0.0, y: 0.0, w: w as f32, h: h as f32 }
    }
}

/// Sampleable image storage the renderer reads from.
pub trait TextureStore {
    fn image_size(&self, key: ImageKey) -> Option<(u32, u32)>;
    /// Pixel at `(x, y)`; coordinates wrap. Unknown keys sample white.
    fn sample(&self, key: ImageKey, x: u32, y: u32) -> Color;
}

/// Immutable CPU pixmap.
#[derive(Clone)]
pub struct Pixmap {
    w: u32,
    h: u32,
    px: Vec<Color>,
}

impl Pixmap {
    /// Sizes clamp to at least 1x1; missing pixels are transparent, extra ones dropped.
    pub fn new(w: u32, h: u32, mut px: Vec<Color>) -> Self {
        let (w, h) = (w.max(1), h.max(1));
        px.resize((w * h) as usize, Color::BLANK);
        Self { w, h, px }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.w, self.h)
    }

    #[inline]
    fn sample(&self, x: u32, y: u32) -> Color {
        let xi = (x % self.w) as usize;
        let yi = (y % self.h) as usize;
        self.px[(yi * self.w as usize) + xi]
    }

    fn load(path: &Path) -> Option<Self> {
        let img = Image::load_image(path.to_str()?).ok()?;
        let w = img.width().max(1) as u32;
        let h = img.height().max(1) as u32;
        let data = img.get_image_data().to_vec();
        if data.len() != (w * h) as usize {
            return None;
        }
        Some(Self::new(w, h, data))
    }
}

pub struct TextureManager {
    tile_size: u32,
    walls: HashMap<u32, Pixmap>,
    sprites: Vec<Pixmap>,
    sprite_names: HashMap<String, ImageKey>,
}

impl TextureManager {
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size,
            walls: HashMap::new(),
            sprites: Vec::new(),
            sprite_names: HashMap::new(),
        }
    }

    /// Wall textures for every id the map uses: `<dir>/<id>.png` when it
    /// loads, a generated checker otherwise.
    pub fn for_map(tile_size: u32, dir: impl AsRef<Path>, map: &TileMap, fallback: u32) -> Self {
        let dir = dir.as_ref();
        let mut tm = Self::new(tile_size);
        let mut ids = map.texture_ids();
        if !ids.contains(&fallback) {
            ids.push(fallback);
        }
        for id in ids {
            let path = dir.join(format!("{id}.png"));
            let pm = match Pixmap::load(&path) {
                Some(pm) if pm.size() == (tile_size, tile_size) => pm,
                Some(pm) => {
                    log::warn!(
                        "{}: {}x{} does not match tile size {tile_size}, using generated texture",
                        path.display(),
                        pm.w,
                        pm.h
                    );
                    Self::make_checker(tile_size, tile_size, Self::color_from_id(id))
                }
                None => {
                    log::warn!("{}: not loaded, using generated texture", path.display());
                    Self::make_checker(tile_size, tile_size, Self::color_from_id(id))
                }
            };
            tm.walls.insert(id, pm);
        }
        log::info!("{} wall textures ready", tm.walls.len());
        tm
    }

    pub fn insert_wall(&mut self, id: u32, pixmap: Pixmap) {
        self.walls.insert(id, pixmap);
    }

    /// Register a sprite frame under `name`; re-registering a name replaces its pixels.
    pub fn insert_sprite(&mut self, name: &str, pixmap: Pixmap) -> ImageKey {
        if let Some(&ImageKey::Sprite(idx)) = self.sprite_names.get(name) {
            self.sprites[idx as usize] = pixmap;
            return ImageKey::Sprite(idx);
        }
        let key = ImageKey::Sprite(self.sprites.len() as u32);
        self.sprites.push(pixmap);
        self.sprite_names.insert(name.to_owned(), key);
        key
    }

    /// Load `<dir>/<name>.png`, or generate a glowing orb if it cannot be read.
    pub fn load_sprite(&mut self, dir: impl AsRef<Path>, name: &str) -> ImageKey {
        if let Some(&key) = self.sprite_names.get(name) {
            return key;
        }
        let path = dir.as_ref().join(format!("{name}.png"));
        let pm = Pixmap::load(&path).unwrap_or_else(|| {
            log::warn!("{}: not loaded, using generated sprite", path.display());
            Self::make_glowing_orb(64, 64, Self::color_from_name(name))
        });
        self.insert_sprite(name, pm)
    }

    /// Like [`TextureManager::load_sprite`], but an unreadable file is an error.
    pub fn load_sprite_strict(&mut self, dir: impl AsRef<Path>, name: &str) -> Result<ImageKey> {
        if let Some(&key) = self.sprite_names.get(name) {
            return Ok(key);
        }
        let path = dir.as_ref().join(format!("{name}.png"));
        let pm = Pixmap::load(&path).with_context(|| format!("sprite image {}", path.display()))?;
        Ok(self.insert_sprite(name, pm))
    }

    pub fn sprite_key(&self, name: &str) -> Option<ImageKey> {
        self.sprite_names.get(name).copied()
    }

    /// Surface, once at load time, any wall id the map uses that has no texture.
    pub fn validate_map_textures(&self, map: &TileMap, fallback: u32) -> Result<()> {
        let mut missing: Vec<u32> = map
            .texture_ids()
            .into_iter()
            .chain(std::iter::once(fallback))
            .filter(|id| !self.walls.contains_key(id))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        if !missing.is_empty() {
            bail!("no wall texture for ids {missing:?}");
        }
        for (id, pm) in &self.walls {
            if pm.size() != (self.tile_size, self.tile_size) {
                bail!(
                    "wall texture {id} is {}x{}, expected {}x{}",
                    pm.w,
                    pm.h,
                    self.tile_size,
                    self.tile_size
                );
            }
        }
        Ok(())
    }

    fn color_from_id(id: u32) -> Color {
        let r = ((id * 97) % 200 + 40) as u8;
        let g = ((id * 57) % 200 + 40) as u8;
        let b = ((id * 31) % 200 + 40) as u8;
        Color::new(r, g, b, 255)
    }

    fn color_from_name(name: &str) -> Color {
        let k = name.bytes().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        Self::color_from_id(k % 1024)
    }

    /// Checker tile with a darker one-pixel border so column seams stay visible.
    pub fn make_checker(w: u32, h: u32, base: Color) -> Pixmap {
        let mut px = vec![base; (w * h) as usize];
        let cell = (w / 8).max(1);
        for y in 0..h {
            for x in 0..w {
                let i = (y * w + x) as usize;
                if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                    px[i] = Self::mix(base, Color::BLACK, 96);
                } else if ((x / cell) + (y / cell)) % 2 == 0 {
                    px[i] = Self::mix(base, Color::WHITE, 24);
                }
            }
        }
        Pixmap::new(w, h, px)
    }

    /// Round orb on a transparent background.
    pub fn make_glowing_orb(w: u32, h: u32, color: Color) -> Pixmap {
        let mut px = vec![Color::new(0, 0, 0, 0); (w * h) as usize];
        let cx = w as f32 * 0.5;
        let cy = h as f32 * 0.5;
        let r = w.min(h) as f32 * 0.3;
        for y in 0..h {
            for x in 0..w {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                let i = (y * w + x) as usize;
                if d <= r {
                    let t = (1.0 - d / r).clamp(0.0, 1.0);
                    let mut core = Self::mix(color, Color::WHITE, (t * 220.0) as u8);
                    core.a = 255;
                    px[i] = core;
                } else {
                    let t = (1.0 - (d - r) / (r * 0.9)).clamp(0.0, 1.0);
                    if t > 0.0 {
                        let mut halo = color;
                        halo.a = (t * 180.0) as u8;
                        px[i] = halo;
                    }
                }
            }
        }
        Pixmap::new(w, h, px)
    }

    #[inline]
    fn mix(a: Color, b: Color, t: u8) -> Color {
        let ta = t as u16;
        let na = 255u16 - ta;
        let mixc = |x: u8, y: u8| -> u8 { (((x as u16) * na + (y as u16) * ta) / 255) as u8 };
        Color::new(mixc(a.r, b.r), mixc(a.g, b.g), mixc(a.b, b.b), mixc(a.a, b.a))
    }

    fn pixmap(&self, key: ImageKey) -> Option<&Pixmap> {
        match key {
            ImageKey::Wall(id) => self.walls.get(&id),
            ImageKey::Sprite(idx) => self.sprites.get(idx as usize),
        }
    }
}

impl TextureStore for TextureManager {
    fn image_size(&self, key: ImageKey) -> Option<(u32, u32)> {
        self.pixmap(key).map(Pixmap::size)
    }

    fn sample(&self, key: ImageKey, x: u32, y: u32) -> Color {
        match self.pixmap(key) {
            Some(pm) => pm.sample(x, y),
            None => Color::WHITE,
        }
    }
}
