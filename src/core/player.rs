use std::f64::consts::PI;

use glam::DVec2;

use crate::core::geometry::{GridCell, wrap_angle};

/// What the renderer reads from the player each frame.
pub trait PlayerView {
    fn position(&self) -> DVec2;
    fn grid_cell(&self) -> GridCell {
        GridCell::from_pos(self.position())
    }
    /// Radians. `Player` keeps this in `[0, 2π)`; consumers wrap other values themselves.
    fn view_angle(&self) -> f64;
}

/// One frame of movement intent, each axis in `[-1, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MoveInput {
    pub forward: f64,
    pub strafe: f64,
    /// Keyboard turn, positive = clockwise on the map
    pub turn: f64,
    /// Mouse turn already in radians
    pub look: f64,
    pub sprint: bool,
}

pub struct Player {
    pub pos: DVec2,
    pub angle: f64,
    pub radius: f64,
    pub speed_walk: f64,
    pub speed_sprint: f64,
    pub turn_speed: f64,
}

impl Player {
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            angle: wrap_angle(angle),
            radius: 0.15,
            speed_walk: 2.5,   // cells/s
            speed_sprint: 4.0, // cells/s
            turn_speed: PI,    // rad/s
        }
    }

    /// Apply one frame of input. `is_free(x, y)` answers whether the player
    /// body may stand at that point; x and y are tried separately so the
    /// player slides along walls instead of sticking.
    pub fn step(&mut self, input: MoveInput, dt: f64, is_free: impl Fn(f64, f64) -> bool) {
        self.angle = wrap_angle(self.angle + input.turn * self.turn_speed * dt + input.look);

        let (mut fwd, mut strafe) = (input.forward, input.strafe);
        if fwd == 0.0 && strafe == 0.0 {
            return;
        }
        // diagonal movement is not faster
        let len = (fwd * fwd + strafe * strafe).sqrt();
        if len > 1.0 {
            fwd /= len;
            strafe /= len;
        }

        let speed = if input.sprint { self.speed_sprint } else { self.speed_walk };
        let (s, c) = self.angle.sin_cos();
        let dir_fwd = DVec2::new(c, s);
        let dir_right = DVec2::new(-s, c);
        let delta = (dir_fwd * fwd + dir_right * strafe) * speed * dt;

        let nx = self.pos.x + delta.x;
        if is_free(nx, self.pos.y) {
            self.pos.x = nx;
        }
        let ny = self.pos.y + delta.y;
        if is_free(self.pos.x, ny) {
            self.pos.y = ny;
        }
    }
}

impl PlayerView for Player {
    #[inline]
    fn position(&self) -> DVec2 {
        self.pos
    }

    #[inline]
    fn view_angle(&self) -> f64 {
        self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_forward_along_view_direction() {
        let mut p = Player::new(1.5, 1.5, 0.0);
        let input = MoveInput { forward: 1.0, ..Default::default() };
        p.step(input, 0.1, |_, _| true);
        assert!((p.pos.x - 1.75).abs() < 1e-9);
        assert!((p.pos.y - 1.5).abs() < 1e-9);
    }

    #[test]
    fn slides_along_blocked_axis() {
        let mut p = Player::new(1.5, 1.5, PI / 4.0);
        let input = MoveInput { forward: 1.0, ..Default::default() };
        // block any x movement
        p.step(input, 0.1, |x, _| x == 1.5);
        assert_eq!(p.pos.x, 1.5);
        assert!(p.pos.y > 1.5);
    }

    #[test]
    fn angle_stays_wrapped() {
        let mut p = Player::new(0.0, 0.0, -0.5);
        assert!(p.angle > 0.0);
        p.step(MoveInput { look: 10.0, ..Default::default() }, 0.016, |_, _| true);
        assert!((0.0..std::f64::consts::TAU).contains(&p.angle));
    }

    #[test]
    fn grid_cell_follows_position() {
        let p = Player::new(3.7, 2.2, 0.0);
        assert_eq!(p.grid_cell(), GridCell::new(3, 2));
    }
}
