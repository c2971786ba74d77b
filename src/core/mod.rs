//! World-side types: grid, player, sprites and their registry.
//!
//! Modules:
//! - `geometry`: grid cells and the angle helpers shared by both projections
//! - `maze`: wall grid, map text loader and the built-in demo map
//! - `player`: player pose, movement and the read-only view the renderer uses
//! - `sprite`: world sprites and frame animation
//! - `objects`: sprite registry and weighted random spawning
//! - `level`: JSON level files (player start and sprite placement)
//! - `process_events`: keyboard/mouse input and body collision

pub mod geometry;
pub mod level;
pub mod maze;
pub mod objects;
pub mod player;
pub mod process_events;
pub mod sprite;
