//! Grid raycaster with depth-sorted billboard sprites.
//!
//! Each frame [`engine::Engine::update`] casts one ray per column against a
//! [`core::maze::GridMap`], projects every sprite from the
//! [`core::objects::ObjectHandler`], and merges both into a single list sorted
//! far to near. Painting that list in order gives correct occlusion without a
//! depth buffer.

pub mod config;
pub mod core;
pub mod engine;
pub mod render;
