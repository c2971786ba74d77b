//! Engine tunables.
//!
//! Everything the raycaster and the sprite projector need to know about the
//! screen and the numeric guards lives here. Values come from a JSON file or
//! from `Default`, which mirrors the classic 1600x900 / 60° setup.

use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
    /// Horizontal field of view, radians
    pub fov: f64,
    /// Rays cast per frame (one per screen column strip)
    pub num_rays: u32,
    /// Grid lines stepped per search before giving up
    pub max_depth: u32,
    /// Side of a square wall texture, pixels
    pub texture_size: u32,
    /// Sprites nearer than this (perpendicular) are not drawn
    pub min_sprite_distance: f64,
    /// Texture id reported when a search runs out of depth
    pub fallback_texture: u32,
    /// Added to the first ray angle so no ray is exactly axis-aligned
    pub angle_epsilon: f64,
    /// Added to depth before dividing for the projected height
    pub depth_epsilon: f64,
    /// Pulls a negative-direction grid line into the cell before it
    pub grid_line_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let width = 1600;
        Self {
            width,
            height: 900,
            fov: PI / 3.0,
            num_rays: width / 2,
            max_depth: 20,
            texture_size: 256,
            min_sprite_distance: 0.5,
            fallback_texture: 1,
            angle_epsilon: 1e-4,
            depth_epsilon: 1e-4,
            grid_line_epsilon: 1e-6,
        }
    }
}

impl EngineConfig {
    /// Read and validate a JSON config. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path)
            .with_context(|| format!("read engine config: {}", path.display()))?;
        let cfg = Self::from_json(&txt)
            .with_context(|| format!("parse engine config: {}", path.display()))?;
        log::info!(
            "engine config from {}: {}x{}, {} rays",
            path.display(),
            cfg.width,
            cfg.height,
            cfg.num_rays
        );
        Ok(cfg)
    }

    pub fn from_json(txt: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(txt).context("engine config json")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("viewport must be non-empty, got {}x{}", self.width, self.height);
        }
        if self.num_rays == 0 || self.num_rays > self.width {
            bail!("num_rays must be in 1..={}, got {}", self.width, self.num_rays);
        }
        if !(self.fov > 0.0 && self.fov < PI) {
            bail!("fov must be in (0, pi), got {}", self.fov);
        }
        if self.max_depth == 0 {
            bail!("max_depth must be at least 1");
        }
        if self.texture_size <= self.scale() {
            bail!(
                "texture_size {} must exceed the column width {}",
                self.texture_size,
                self.scale()
            );
        }
        for (name, v) in [
            ("min_sprite_distance", self.min_sprite_distance),
            ("angle_epsilon", self.angle_epsilon),
            ("depth_epsilon", self.depth_epsilon),
            ("grid_line_epsilon", self.grid_line_epsilon),
        ] {
            if !(v > 0.0 && v.is_finite()) {
                bail!("{name} must be positive and finite, got {v}");
            }
        }
        Ok(())
    }

    #[inline]
    pub fn half_fov(&self) -> f64 {
        self.fov / 2.0
    }

    /// Angle between two neighbouring rays.
    #[inline]
    pub fn delta_angle(&self) -> f64 {
        self.fov / self.num_rays as f64
    }

    #[inline]
    pub fn half_num_rays(&self) -> f64 {
        (self.num_rays / 2) as f64
    }

    /// Distance from the eye to the projection plane, in pixels.
    #[inline]
    pub fn screen_dist(&self) -> f64 {
        (self.width as f64 / 2.0) / self.half_fov().tan()
    }

    /// Width of one ray column on screen, pixels.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.width / self.num_rays
    }

    #[inline]
    pub fn half_height(&self) -> f64 {
        self.height as f64 / 2.0
    }

    #[inline]
    pub fn half_texture_size(&self) -> f64 {
        self.texture_size as f64 / 2.0
    }
}
