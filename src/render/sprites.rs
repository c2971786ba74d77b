//! Billboard projection of world sprites onto the column grid.
//!
//! A sprite's bearing relative to the view is turned into a ray index, which
//! places it on the same horizontal scale the walls use; its distance is
//! fisheye-corrected the same way wall depth is, so the two sort together.

use crate::config::EngineConfig;
use crate::core::geometry::{sprite_angle_delta, wrap_angle};
use crate::core::player::PlayerView;
use crate::core::sprite::Sprite;
use crate::render::compose::{Drawable, ProjectedDrawable};
use crate::render::textures::{SourceRect, TextureStore};

/// Where a sprite lands relative to the view, before any size is computed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteView {
    /// Bearing relative to the view direction, radians
    pub delta: f64,
    /// Horizontal screen position of the sprite centre, pixels
    pub screen_x: f64,
    pub dist: f64,
    /// `dist * cos(delta)`, comparable with wall depth
    pub norm_dist: f64,
}

pub fn locate(cfg: &EngineConfig, sprite: &Sprite, player: &impl PlayerView) -> SpriteView {
    let d = sprite.pos - player.position();
    // the delta wrap below only holds for view angles in [0, 2π)
    let delta = sprite_angle_delta(d.x, d.y, wrap_angle(player.view_angle()));

    let delta_rays = delta / cfg.delta_angle();
    let screen_x = (cfg.half_num_rays() + delta_rays) * cfg.scale() as f64;

    let dist = d.x.hypot(d.y);
    SpriteView {
        delta,
        screen_x,
        dist,
        norm_dist: dist * delta.cos(),
    }
}

/// Inclusive on both screen edges; anything at or nearer than the clip distance is dropped.
pub fn is_visible(cfg: &EngineConfig, sprite: &Sprite, view: &SpriteView) -> bool {
    let margin = sprite.image_half_width;
    -margin <= view.screen_x
        && view.screen_x <= cfg.width as f64 + margin
        && view.norm_dist > cfg.min_sprite_distance
}

/// Project one sprite, or `None` when it is off screen, too close, behind
/// the viewer, or has no frame to show.
pub fn project(
    cfg: &EngineConfig,
    sprite: &Sprite,
    player: &impl PlayerView,
    store: &impl TextureStore,
) -> Option<ProjectedDrawable> {
    let view = locate(cfg, sprite, player);
    if !is_visible(cfg, sprite, &view) {
        return None;
    }
    let image = sprite.image()?;
    let size = store.image_size(image)?;

    let proj = cfg.screen_dist() / view.norm_dist * sprite.scale;
    let (proj_width, proj_height) = (proj * sprite.image_ratio, proj);

    let half_width = (proj_width / 2.0).floor();
    let height_shift = proj_height * sprite.height_shift;
    let x = view.screen_x - half_width;
    let y = cfg.half_height() - (proj_height / 2.0).floor() + height_shift;

    Some(ProjectedDrawable {
        depth: view.norm_dist,
        drawable: Drawable { image, src: SourceRect::whole(size) },
        pos: (x as f32, y as f32),
        size: (proj_width as f32, proj_height as f32),
    })
}

/// Project every sprite into `out`, in registry order.
pub fn project_all<'a>(
    cfg: &EngineConfig,
    sprites: impl IntoIterator<Item = &'a Sprite>,
    player: &impl PlayerView,
    store: &impl TextureStore,
    out: &mut Vec<ProjectedDrawable>,
) {
    out.extend(
        sprites
            .into_iter()
            .filter_map(|s| project(cfg, s, player, store)),
    );
}
