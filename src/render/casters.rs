//! Per-column ray / grid intersection.
//!
//! Each ray is walked twice: once across horizontal grid lines (`y` integer)
//! and once across vertical grid lines (`x` integer). Whichever search meets a
//! wall first is the hit. Both walks are capped at `max_depth` steps.

use glam::DVec2;

use crate::config::EngineConfig;
use crate::core::geometry::{GridCell, fisheye_correct, projected_height};
use crate::core::maze::GridMap;

/// One screen column's worth of wall.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// Distance to the wall, fisheye-corrected
    pub depth: f64,
    /// Wall height on screen, pixels
    pub proj_height: f64,
    pub texture_id: u32,
    /// Position across the wall face in `[0, 1]`, oriented left-to-right on screen
    pub offset: f64,
}

/// Result of walking one family of grid lines.
#[derive(Copy, Clone, Debug)]
struct LineHit {
    depth: f64,
    /// Coordinate along the crossed line (x for horizontal lines, y for vertical)
    along: f64,
    texture: Option<u32>,
}

/// Keeps its hit buffer between frames so casting doesn't allocate.
#[derive(Default)]
pub struct RayCaster {
    hits: Vec<RayHit>,
}

impl RayCaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cast `num_rays` rays fanned across the field of view around `view_angle`.
    pub fn cast(
        &mut self,
        cfg: &EngineConfig,
        origin: DVec2,
        view_angle: f64,
        map: &impl GridMap,
    ) -> &[RayHit] {
        self.hits.clear();
        self.hits.reserve(cfg.num_rays as usize);

        let delta = cfg.delta_angle();
        let mut ray_angle = view_angle - cfg.half_fov() + cfg.angle_epsilon;
        for _ in 0..cfg.num_rays {
            self.hits.push(cast_ray(cfg, origin, view_angle, ray_angle, map));
            ray_angle += delta;
        }
        &self.hits
    }

    pub fn hits(&self) -> &[RayHit] {
        &self.hits
    }
}

/// Cast a single ray at `ray_angle`; `view_angle` is only used for the fisheye term.
pub fn cast_ray(
    cfg: &EngineConfig,
    origin: DVec2,
    view_angle: f64,
    ray_angle: f64,
    map: &impl GridMap,
) -> RayHit {
    let (sin_a, cos_a) = ray_angle.sin_cos();
    let cell = GridCell::from_pos(origin);

    let hor = search_horizontal(cfg, origin, cell, sin_a, cos_a, map);
    let vert = search_vertical(cfg, origin, cell, sin_a, cos_a, map);

    let (raw_depth, texture, offset) = if vert.depth < hor.depth {
        let y = vert.along.rem_euclid(1.0);
        let offset = if cos_a > 0.0 { y } else { 1.0 - y };
        (vert.depth, vert.texture, offset)
    } else {
        let x = hor.along.rem_euclid(1.0);
        let offset = if sin_a > 0.0 { 1.0 - x } else { x };
        (hor.depth, hor.texture, offset)
    };

    // Both searches can only come back non-finite if the angle was exactly
    // axis-aligned and the other search ran out of steps.
    let (raw_depth, offset) = if raw_depth.is_finite() {
        (raw_depth, offset)
    } else {
        (cfg.max_depth as f64, 0.0)
    };

    let depth = fisheye_correct(raw_depth, view_angle, ray_angle);
    RayHit {
        depth,
        proj_height: projected_height(cfg.screen_dist(), depth, cfg.depth_epsilon),
        texture_id: texture.unwrap_or(cfg.fallback_texture),
        offset: if offset.is_finite() { offset } else { 0.0 },
    }
}

fn search_horizontal(
    cfg: &EngineConfig,
    origin: DVec2,
    cell: GridCell,
    sin_a: f64,
    cos_a: f64,
    map: &impl GridMap,
) -> LineHit {
    if sin_a == 0.0 {
        return LineHit::miss();
    }
    let (mut y, dy) = if sin_a > 0.0 {
        (cell.row as f64 + 1.0, 1.0)
    } else {
        (cell.row as f64 - cfg.grid_line_epsilon, -1.0)
    };

    let mut depth = (y - origin.y) / sin_a;
    let mut x = origin.x + depth * cos_a;

    let delta_depth = dy / sin_a;
    let dx = delta_depth * cos_a;

    for _ in 0..cfg.max_depth {
        if let Some(tex) = map.texture_id(GridCell::containing(x, y)) {
            return LineHit { depth, along: x, texture: Some(tex) };
        }
        x += dx;
        y += dy;
        depth += delta_depth;
    }
    LineHit { depth, along: x, texture: None }
}

fn search_vertical(
    cfg: &EngineConfig,
    origin: DVec2,
    cell: GridCell,
    sin_a: f64,
    cos_a: f64,
    map: &impl GridMap,
) -> LineHit {
    if cos_a == 0.0 {
        return LineHit::miss();
    }
    let (mut x, dx) = if cos_a > 0.0 {
        (cell.col as f64 + 1.0, 1.0)
    } else {
        (cell.col as f64 - cfg.grid_line_epsilon, -1.0)
    };

    let mut depth = (x - origin.x) / cos_a;
    let mut y = origin.y + depth * sin_a;

    let delta_depth = dx / cos_a;
    let dy = delta_depth * sin_a;

    for _ in 0..cfg.max_depth {
        if let Some(tex) = map.texture_id(GridCell::containing(x, y)) {
            return LineHit { depth, along: y, texture: Some(tex) };
        }
        x += dx;
        y += dy;
        depth += delta_depth;
    }
    LineHit { depth, along: y, texture: None }
}

impl LineHit {
    fn miss() -> Self {
        Self { depth: f64::INFINITY, along: 0.0, texture: None }
    }
}
