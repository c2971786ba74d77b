//! Sprite registry.
use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use crate::core::geometry::GridCell;
use crate::core::maze::{GridMap, TileMap};
use crate::core::sprite::Sprite;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u32);

/// Tries per requested sprite before random placement gives up.
const SPAWN_ATTEMPTS: usize = 1000;

#[derive(Debug, Default)]
pub struct ObjectHandler {
    sprites: Vec<(SpriteId, Sprite)>,
    next_id: u32,
}

impl ObjectHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sprite(&mut self, sprite: Sprite) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        self.sprites.push((id, sprite));
        id
    }

    /// Drop a sprite from the world, e.g. when an NPC dies.
    pub fn remove(&mut self, id: SpriteId) -> Option<Sprite> {
        let idx = self.sprites.iter().position(|(sid, _)| *sid == id)?;
        Some(self.sprites.remove(idx).1)
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    /// Live sprites in insertion order.
    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> + '_ {
        self.sprites.iter().map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Cells currently holding a sprite.
    pub fn occupied_cells(&self) -> HashSet<GridCell> {
        self.sprites().map(|s| GridCell::from_pos(s.pos)).collect()
    }

    /// Advance every animation cursor. Runs whether or not a sprite is on screen.
    pub fn update(&mut self, now: Duration) {
        for (_, sprite) in &mut self.sprites {
            sprite.animate(now);
        }
    }

    /// Place `count` sprites drawn from `templates` (weighted) at the centres of
    /// random free cells outside `restricted`. A template's position is ignored.
    pub fn spawn_random(
        &mut self,
        count: usize,
        templates: &[(Sprite, u32)],
        map: &TileMap,
        restricted: &HashSet<GridCell>,
        rng: &mut impl Rng,
    ) -> Result<Vec<SpriteId>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let weights = WeightedIndex::new(templates.iter().map(|(_, w)| *w))
            .context("spawn template weights")?;
        let (cols, rows) = map.bounds();
        if cols == 0 || rows == 0 {
            bail!("cannot spawn into an empty map");
        }

        let mut taken = self.occupied_cells();
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let cell = (0..SPAWN_ATTEMPTS)
                .map(|_| GridCell::new(rng.gen_range(0..cols as i32), rng.gen_range(0..rows as i32)))
                .find(|c| !map.is_wall(*c) && !restricted.contains(c) && !taken.contains(c))
                .with_context(|| format!("no free cell after {SPAWN_ATTEMPTS} tries"))?;
            taken.insert(cell);

            let mut sprite = templates[weights.sample(&mut *rng)].0.clone();
            sprite.pos = cell.center();
            ids.push(self.add_sprite(sprite));
        }
        log::debug!("spawned {} sprites", ids.len());
        Ok(ids)
    }
}

/// Every cell within `radius` (Chebyshev) of `center`, e.g. around the player start.
pub fn area_around(center: GridCell, radius: i32) -> HashSet<GridCell> {
    (-radius..=radius)
        .flat_map(|dy| (-radius..=radius).map(move |dx| GridCell::new(center.col + dx, center.row + dy)))
        .collect()
}
