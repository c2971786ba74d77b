use raylib::core::texture::RaylibTexture2D;
use raylib::prelude::*;

use crate::render::compose::ProjectedDrawable;
use crate::render::textures::TextureStore;

/// Texels with alpha below this are treated as holes.
const ALPHA_CUTOFF: u8 = 8;

pub struct Framebuffer {
    pub color_buffer: Vec<Color>,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        let bg = Color::BLACK;
        Self {
            color_buffer: vec![bg; size],
            width,
            height,
            background_color: bg,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.color_buffer.fill(self.background_color);
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x < self.width && y < self.height {
            return self.color_buffer[(y * self.width + x) as usize];
        }
        self.background_color
    }

    #[inline]
    pub fn set_background_color(&mut self, c: Color) {
        self.background_color = c;
    }

    /// Fill whole rows `[y0, y1)` with one colour.
    pub fn fill_rows(&mut self, y0: u32, y1: u32, color: Color) {
        let y1 = y1.min(self.height);
        if y0 >= y1 {
            return;
        }
        let w = self.width as usize;
        self.color_buffer[y0 as usize * w..y1 as usize * w].fill(color);
    }

    /// Paint one list entry: its source rect is stretched over its destination
    /// rect with nearest-neighbour sampling, clipped to the buffer.
    pub fn blit(&mut self, store: &impl TextureStore, item: &ProjectedDrawable) {
        let (dw, dh) = item.size;
        if !(dw > 0.0 && dh > 0.0) {
            return;
        }
        let src = item.drawable.src;
        let (px, py) = item.pos;

        let x0 = px.floor().max(0.0) as i64;
        let x1 = ((px + dw).ceil() as i64).min(self.width as i64);
        let y0 = py.floor().max(0.0) as i64;
        let y1 = ((py + dh).ceil() as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let sx_max = (src.x + src.w - 1.0).max(src.x);
        let sy_max = (src.y + src.h - 1.0).max(src.y);
        let key = item.drawable.image;

        for x in x0..x1 {
            let u = src.x + ((x as f32 + 0.5 - px) / dw) * src.w;
            let tx = u.clamp(src.x, sx_max).max(0.0) as u32;
            for y in y0..y1 {
                let v = src.y + ((y as f32 + 0.5 - py) / dh) * src.h;
                let ty = v.clamp(src.y, sy_max).max(0.0) as u32;
                let c = store.sample(key, tx, ty);
                if c.a < ALPHA_CUTOFF {
                    continue;
                }
                self.color_buffer[(y as u32 * self.width + x as u32) as usize] = c;
            }
        }
    }

    /// RGBA8 bytes in row order, for uploading to a GPU texture.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.color_buffer
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, c.a])
            .collect()
    }

    pub fn upload_to_texture(&self, tex: &mut Texture2D) {
        let bytes = self.to_rgba_bytes();
        if let Err(e) = tex.update_texture(&bytes) {
            log::debug!("framebuffer upload failed: {e}");
        }
    }
}
