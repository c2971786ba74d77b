//! Grid map: wall occupancy, texture ids and the text loader.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::core::geometry::GridCell;

/// Read-only view of the tile grid the raycaster walks through.
pub trait GridMap {
    fn is_wall(&self, cell: GridCell) -> bool;
    /// Texture id of a wall cell; `None` for empty cells.
    fn texture_id(&self, cell: GridCell) -> Option<u32>;
    /// `(cols, rows)`
    fn bounds(&self) -> (u32, u32);
}

/// Sparse wall registry keyed by cell.
#[derive(Clone, Debug, Default)]
pub struct TileMap {
    walls: HashMap<GridCell, u32>,
    cols: u32,
    rows: u32,
}

impl TileMap {
    /// Build from rows of texture ids, `0` meaning empty.
    pub fn from_rows(rows: &[Vec<u32>]) -> Self {
        let mut walls = HashMap::new();
        for (j, row) in rows.iter().enumerate() {
            for (i, &tex) in row.iter().enumerate() {
                if tex != 0 {
                    walls.insert(GridCell::new(i as i32, j as i32), tex);
                }
            }
        }
        let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        Self {
            walls,
            cols,
            rows: rows.len() as u32,
        }
    }

    /// Parse the text format: digits `1`-`9` are walls with that texture,
    /// `.`, `0` and spaces are floor, anything else is a wall drawn with
    /// `fallback_texture`.
    pub fn parse(txt: &str, fallback_texture: u32) -> Result<Self> {
        let mut grid: Vec<Vec<u32>> = Vec::new();
        for line in txt.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let row = line
                .chars()
                .map(|ch| match ch {
                    '.' | ' ' | '0' => 0,
                    '1'..='9' => ch as u32 - '0' as u32,
                    _ => fallback_texture,
                })
                .collect();
            grid.push(row);
        }
        if grid.is_empty() {
            bail!("map has no rows");
        }
        Ok(Self::from_rows(&grid))
    }

    /// Distinct texture ids referenced by walls, sorted.
    pub fn texture_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.walls.values().copied().collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Every in-bounds cell without a wall.
    pub fn free_cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.rows as i32)
            .flat_map(move |row| (0..self.cols as i32).map(move |col| GridCell::new(col, row)))
            .filter(|c| !self.walls.contains_key(c))
    }
}

impl GridMap for TileMap {
    #[inline]
    fn is_wall(&self, cell: GridCell) -> bool {
        self.walls.contains_key(&cell)
    }

    #[inline]
    fn texture_id(&self, cell: GridCell) -> Option<u32> {
        self.walls.get(&cell).copied()
    }

    fn bounds(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }
}

pub fn load_map(path: impl AsRef<Path>, fallback_texture: u32) -> Result<TileMap> {
    let path = path.as_ref();
    let txt = fs::read_to_string(path).with_context(|| format!("read map: {}", path.display()))?;
    let map = TileMap::parse(&txt, fallback_texture)
        .with_context(|| format!("parse map: {}", path.display()))?;
    let (cols, rows) = map.bounds();
    log::info!(
        "map {}: {}x{} cells, {} walls",
        path.display(),
        cols,
        rows,
        map.wall_count()
    );
    Ok(map)
}

/// The built-in 16x9 level used when no map file is given.
pub fn default_map() -> TileMap {
    const ROWS: [&str; 9] = [
        "1111111111111111",
        "1..............1",
        "1..1111...2222.1",
        "1......3.....2.1",
        "1......3.....2.1",
        "1..1111........1",
        "1..........4...1",
        "1...5......4...1",
        "1111111111111111",
    ];
    let rows: Vec<Vec<u32>> = ROWS
        .iter()
        .map(|r| {
            r.chars()
                .map(|ch| ch.to_digit(10).unwrap_or(0))
                .collect()
        })
        .collect();
    TileMap::from_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_texture_ids_and_floor() {
        let map = TileMap::parse("111\n1.2\n1#1\n", 7).unwrap();
        assert_eq!(map.bounds(), (3, 3));
        assert_eq!(map.texture_id(GridCell::new(2, 1)), Some(2));
        assert_eq!(map.texture_id(GridCell::new(1, 2)), Some(7));
        assert!(!map.is_wall(GridCell::new(1, 1)));
        assert_eq!(map.texture_ids(), vec![1, 2, 7]);
    }

    #[test]
    fn short_rows_pad_with_floor() {
        let map = TileMap::parse("1111\n1\n1111", 1).unwrap();
        assert_eq!(map.bounds(), (4, 3));
        assert!(!map.is_wall(GridCell::new(3, 1)));
    }

    #[test]
    fn outside_cells_are_not_walls() {
        let map = default_map();
        assert!(!map.is_wall(GridCell::new(-1, 0)));
        assert!(!map.is_wall(GridCell::new(100, 100)));
    }

    #[test]
    fn default_map_is_enclosed() {
        let map = default_map();
        let (cols, rows) = map.bounds();
        for c in 0..cols as i32 {
            assert!(map.is_wall(GridCell::new(c, 0)));
            assert!(map.is_wall(GridCell::new(c, rows as i32 - 1)));
        }
        for r in 0..rows as i32 {
            assert!(map.is_wall(GridCell::new(0, r)));
            assert!(map.is_wall(GridCell::new(cols as i32 - 1, r)));
        }
        assert!(map.free_cells().all(|c| !map.is_wall(c)));
    }

    #[test]
    fn empty_map_is_an_error() {
        assert!(TileMap::parse("\n\n", 1).is_err());
    }
}
