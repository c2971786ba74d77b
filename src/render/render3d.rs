//! Wall strips from ray hits, and painting a composed frame.
use raylib::prelude::*;

use crate::config::EngineConfig;
use crate::render::casters::RayHit;
use crate::render::compose::{Drawable, ProjectedDrawable};
use crate::render::framebuffer::Framebuffer;
use crate::render::textures::{ImageKey, SourceRect, TextureStore};

const CEIL_TOP: Color = Color::new(10, 12, 18, 255);
const CEIL_MID: Color = Color::new(20, 24, 32, 255);
const FLOOR_NEAR: Color = Color::new(56, 58, 62, 255);
const FLOOR_FAR: Color = Color::new(26, 28, 30, 255);

#[inline]
fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let f = |x: u8, y: u8| -> u8 { ((x as f32) * (1.0 - t) + (y as f32) * t) as u8 };
    Color::new(f(a.r, b.r), f(a.g, b.g), f(a.b, b.b), 255)
}

/// Screen strip for one ray hit.
///
/// A wall shorter than the viewport samples a full-height texture column and
/// stretches it to `proj_height`. A taller wall samples only the middle part
/// of the column that would be visible and stretches that to the viewport
/// height, so the blit never paints rows that end up off screen.
pub fn wall_strip(cfg: &EngineConfig, ray: usize, hit: &RayHit) -> ProjectedDrawable {
    let scale = cfg.scale() as f64;
    let tex = cfg.texture_size as f64;
    let height = cfg.height as f64;
    let src_x = hit.offset * (tex - scale);
    let screen_x = ray as f64 * scale;

    let (src, size, pos) = if hit.proj_height < height {
        (
            SourceRect { x: src_x as f32, y: 0.0, w: scale as f32, h: tex as f32 },
            (scale, hit.proj_height),
            (screen_x, cfg.half_height() - (hit.proj_height / 2.0).floor()),
        )
    } else {
        let texture_height = tex * height / hit.proj_height;
        let src_y = cfg.half_texture_size() - (texture_height / 2.0).floor();
        (
            SourceRect {
                x: src_x as f32,
                y: src_y as f32,
                w: scale as f32,
                h: texture_height as f32,
            },
            (scale, height),
            (screen_x, 0.0),
        )
    };

    ProjectedDrawable {
        depth: hit.depth,
        drawable: Drawable { image: ImageKey::Wall(hit.texture_id), src },
        pos: (pos.0 as f32, pos.1 as f32),
        size: (size.0 as f32, size.1 as f32),
    }
}

/// One strip per hit, in column order.
pub fn wall_strips(cfg: &EngineConfig, hits: &[RayHit], out: &mut Vec<ProjectedDrawable>) {
    out.extend(hits.iter().enumerate().map(|(ray, hit)| wall_strip(cfg, ray, hit)));
}

/// Gradient sky above the horizon, gradient floor below it.
pub fn paint_ceiling_and_floor(fb: &mut Framebuffer) {
    let h = fb.height;
    let hh = h / 2;
    for y in 0..hh {
        let t = y as f32 / hh.max(1) as f32;
        let col = lerp_color(CEIL_TOP, CEIL_MID, t);
        fb.fill_rows(y, y + 1, col);
    }
    for y in hh..h {
        let t = (y - hh) as f32 / (h - hh).max(1) as f32;
        let col = lerp_color(FLOOR_FAR, FLOOR_NEAR, t);
        fb.fill_rows(y, y + 1, col);
    }
}

/// Paint a far-to-near list over the background.
pub fn draw_frame(fb: &mut Framebuffer, store: &impl TextureStore, items: &[ProjectedDrawable]) {
    paint_ceiling_and_floor(fb);
    for item in items {
        fb.blit(store, item);
    }
}
