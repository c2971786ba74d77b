//! Frame driver: animate, cast, project, compose.
//!
//! Walls and sprites are produced into separate buffers and only meet in
//! [`RenderList::compose`], which fixes the far-to-near paint order.

use std::time::Duration;

use anyhow::Result;

use crate::config::EngineConfig;
use crate::core::maze::{GridMap, TileMap};
use crate::core::objects::ObjectHandler;
use crate::core::player::PlayerView;
use crate::render::casters::{RayCaster, RayHit};
use crate::render::compose::{ProjectedDrawable, RenderList};
use crate::render::render3d::wall_strips;
use crate::render::sprites::project_all;
use crate::render::textures::{TextureManager, TextureStore};

pub struct Engine {
    cfg: EngineConfig,
    caster: RayCaster,
    walls: Vec<ProjectedDrawable>,
    sprites: Vec<ProjectedDrawable>,
    list: RenderList,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            caster: RayCaster::new(),
            walls: Vec::new(),
            sprites: Vec::new(),
            list: RenderList::new(),
        })
    }

    /// Like [`Engine::new`], but also checks that every wall id in `map` has a texture.
    pub fn for_map(cfg: EngineConfig, map: &TileMap, textures: &TextureManager) -> Result<Self> {
        textures.validate_map_textures(map, cfg.fallback_texture)?;
        Self::new(cfg)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Recompute this frame: animation cursors first, then rays and sprite
    /// projections, then the merged far-to-near list.
    pub fn update(
        &mut self,
        player: &impl PlayerView,
        map: &impl GridMap,
        objects: &mut ObjectHandler,
        store: &impl TextureStore,
        now: Duration,
    ) {
        objects.update(now);

        let hits = self
            .caster
            .cast(&self.cfg, player.position(), player.view_angle(), map);
        self.walls.clear();
        wall_strips(&self.cfg, hits, &mut self.walls);

        self.sprites.clear();
        project_all(&self.cfg, objects.sprites(), player, store, &mut self.sprites);

        self.list.compose(&self.walls, &self.sprites);
    }

    /// This frame's walls and sprites, farthest first.
    pub fn objects_to_render(&self) -> &[ProjectedDrawable] {
        self.list.items()
    }

    /// This frame's ray hits, one per column.
    pub fn ray_hits(&self) -> &[RayHit] {
        self.caster.hits()
    }
}
