//! Shared angle and grid helpers used by both the raycaster and the sprite projector.

use std::f64::consts::{PI, TAU};

use glam::DVec2;

/// Integer map cell, `(column, row)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
}

impl GridCell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Cell containing a world point. Floors, so points left of / above the
    /// map land in negative cells instead of folding onto row/column 0.
    #[inline]
    pub fn containing(x: f64, y: f64) -> Self {
        Self {
            col: saturating_floor(x),
            row: saturating_floor(y),
        }
    }

    #[inline]
    pub fn from_pos(p: DVec2) -> Self {
        Self::containing(p.x, p.y)
    }

    /// World position of the cell centre.
    #[inline]
    pub fn center(self) -> DVec2 {
        DVec2::new(self.col as f64 + 0.5, self.row as f64 + 0.5)
    }
}

#[inline]
fn saturating_floor(v: f64) -> i32 {
    // `as` saturates on overflow and maps NaN to 0; keep NaN far outside any map.
    if v.is_nan() { i32::MIN } else { v.floor() as i32 }
}

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn wrap_angle(a: f64) -> f64 {
    let w = a.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if w >= TAU { 0.0 } else { w }
}

/// Scale a raw ray length by the cosine of its offset from the view direction.
#[inline]
pub fn fisheye_correct(depth: f64, view_angle: f64, ray_angle: f64) -> f64 {
    depth * (view_angle - ray_angle).cos()
}

/// On-screen height of something `depth` units away, guarded against `depth == 0`.
#[inline]
pub fn projected_height(screen_dist: f64, depth: f64, epsilon: f64) -> f64 {
    screen_dist / (depth + epsilon)
}

/// Bearing of a sprite relative to the view direction.
///
/// `atan2` answers in `[-π, π]` while the player angle lives in `[0, 2π)`, so
/// the raw difference is shifted by a full turn when the sprite sits on the
/// other side of the wraparound. The shift is applied when `dx > 0` with the
/// player facing into the lower half-turn (`angle > π`), or when the sprite is
/// in the `dx < 0, dy < 0` quadrant.
///
/// Known gap: with `dx == 0` and `dy < 0` no shift happens, so a sprite
/// straight along -y while the player faces roughly -y (angle ≈ 3π/2) gets a
/// delta near -2π and projects off screen for that frame.
#[inline]
pub fn sprite_angle_delta(dx: f64, dy: f64, view_angle: f64) -> f64 {
    let theta = dy.atan2(dx);
    let mut delta = theta - view_angle;
    if (dx > 0.0 && view_angle > PI) || (dx < 0.0 && dy < 0.0) {
        delta += TAU;
    }
    delta
}

/// Difference of two angles folded into `(-π, π]`.
#[inline]
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    if d > PI { d - TAU } else { d }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn fisheye_is_identity_on_the_view_axis() {
        for depth in [0.25, 1.0, 2.0, 17.5] {
            assert_eq!(fisheye_correct(depth, 1.3, 1.3), depth);
        }
    }

    #[test]
    fn fisheye_foreshortens_off_axis_rays() {
        let d = fisheye_correct(2.0, 0.0, PI / 3.0);
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn projected_height_stays_finite_at_zero_depth() {
        let h = projected_height(100.0, 0.0, 1e-4);
        assert!(h.is_finite());
        assert!((h - 1e6).abs() < 1e-3);
    }

    #[test]
    fn grid_cell_floors_negative_coordinates() {
        assert_eq!(GridCell::containing(1.5, 2.99), GridCell::new(1, 2));
        assert_eq!(GridCell::containing(-0.25, 0.0), GridCell::new(-1, 0));
        assert_eq!(GridCell::containing(f64::NAN, 1.0).col, i32::MIN);
        assert_eq!(GridCell::new(3, 4).center(), DVec2::new(3.5, 4.5));
    }

    #[test]
    fn wrap_angle_lands_in_range() {
        for a in [-7.0, -0.1, 0.0, 3.0, TAU, 20.0, -1e-18] {
            let w = wrap_angle(a);
            assert!((0.0..TAU).contains(&w), "{a} -> {w}");
        }
    }

    // The delta is always a bearing difference up to whole turns, and any
    // sprite within a quarter turn of the view direction gets its true delta,
    // for every player angle in [0, 2π) and every sprite not exactly on dx == 0.
    #[test]
    fn sprite_delta_sweep() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200_000 {
            let view = rng.gen_range(0.0..TAU);
            let bearing = rng.gen_range(-PI..PI);
            let dist = rng.gen_range(0.1..20.0);
            let (dx, dy) = (dist * bearing.cos(), dist * bearing.sin());
            if dx == 0.0 {
                continue;
            }
            let delta = sprite_angle_delta(dx, dy, view);
            let truth = angle_diff(dy.atan2(dx), view);

            let turns = (delta - truth) / TAU;
            assert!((turns - turns.round()).abs() < 1e-9);

            if truth.abs() < PI / 2.0 {
                assert!((delta - truth).abs() < 1e-9, "view {view} bearing {bearing}");
            }
        }
    }

    #[test]
    fn sprite_delta_known_gap_on_vertical_axis() {
        // Sprite straight "up" the map (dx == 0, dy < 0), player facing it.
        let delta = sprite_angle_delta(0.0, -3.0, 3.0 * PI / 2.0);
        assert!((delta + TAU).abs() < 1e-9);
        assert!(angle_diff(delta, 0.0).abs() < 1e-9);
    }
}
