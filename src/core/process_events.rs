use raylib::prelude::*;

use crate::core::geometry::GridCell;
use crate::core::maze::GridMap;
use crate::core::player::{MoveInput, Player};

/// Radians per pixel of mouse movement.
pub const MOUSE_SENSITIVITY: f64 = 0.0025;

/// True when the circle at (wx, wy) with radius r touches no wall cell.
/// Eight points on the rim plus the centre are sampled.
pub fn is_free_with_radius(map: &impl GridMap, wx: f64, wy: f64, r: f64) -> bool {
    let d = r * std::f64::consts::FRAC_1_SQRT_2;
    let samples = [
        (wx, wy),
        (wx + r, wy),
        (wx - r, wy),
        (wx, wy + r),
        (wx, wy - r),
        (wx + d, wy + d),
        (wx - d, wy + d),
        (wx + d, wy - d),
        (wx - d, wy - d),
    ];
    samples
        .iter()
        .all(|&(sx, sy)| !cell_solid(map, GridCell::containing(sx, sy)))
}

/// Walls and anything outside the map block movement.
fn cell_solid(map: &impl GridMap, cell: GridCell) -> bool {
    let (cols, rows) = map.bounds();
    if cell.col < 0 || cell.row < 0 || cell.col >= cols as i32 || cell.row >= rows as i32 {
        return true;
    }
    map.is_wall(cell)
}

/// Read WASD / arrows / shift and the mouse into one frame of intent.
pub fn read_input(window: &RaylibHandle) -> MoveInput {
    let axis = |pos: KeyboardKey, neg: KeyboardKey| -> f64 {
        (window.is_key_down(pos) as i32 - window.is_key_down(neg) as i32) as f64
    };
    let mouse = window.get_mouse_delta();
    MoveInput {
        forward: axis(KeyboardKey::KEY_W, KeyboardKey::KEY_S),
        strafe: axis(KeyboardKey::KEY_D, KeyboardKey::KEY_A),
        turn: axis(KeyboardKey::KEY_RIGHT, KeyboardKey::KEY_LEFT),
        look: mouse.x as f64 * MOUSE_SENSITIVITY,
        sprint: window.is_key_down(KeyboardKey::KEY_LEFT_SHIFT)
            || window.is_key_down(KeyboardKey::KEY_RIGHT_SHIFT),
    }
}

pub fn process_events(window: &RaylibHandle, player: &mut Player, map: &impl GridMap) {
    let dt = window.get_frame_time() as f64;
    let input = read_input(window);
    let r = player.radius;
    player.step(input, dt, |x, y| is_free_with_radius(map, x, y, r));
}
