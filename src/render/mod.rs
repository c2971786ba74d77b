//! Projection and painting.
//!
//! Modules:
//! - `casters`: one grid ray per screen column
//! - `sprites`: billboard projection of world sprites
//! - `compose`: merging walls and sprites into one far-to-near list
//! - `render3d`: wall strips from ray hits, frame painting
//! - `textures`: texture store with procedural fallbacks
//! - `framebuffer`: CPU framebuffer and blitting

pub mod casters;
pub mod compose;
pub mod framebuffer;
pub mod render3d;
pub mod sprites;
pub mod textures;
