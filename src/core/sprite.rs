//! World sprites: static decorations and frame-cycled animations.
use std::collections::VecDeque;
use std::time::Duration;

use glam::DVec2;

use crate::render::textures::ImageKey;

pub const STATIC_SCALE: f64 = 0.7;
pub const STATIC_SHIFT: f64 = 0.27;
pub const ANIMATED_SCALE: f64 = 0.8;
pub const ANIMATED_SHIFT: f64 = 0.15;
pub const ANIMATION_INTERVAL: Duration = Duration::from_millis(100);

/// Frame queue plus the time it last advanced.
#[derive(Clone, Debug)]
pub struct Animation {
    frames: VecDeque<ImageKey>,
    interval: Duration,
    last_advance: Duration,
}

impl Animation {
    /// `frames` must not be empty. `start` is the clock reading the cursor counts from.
    pub fn new(frames: impl IntoIterator<Item = ImageKey>, interval: Duration, start: Duration) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            interval,
            last_advance: start,
        }
    }

    /// Rotate one frame forward once `interval` has passed since the last
    /// advance. Returns whether the frame changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last_advance) < self.interval {
            return false;
        }
        self.last_advance = now;
        self.frames.rotate_left(1.min(self.frames.len()));
        true
    }

    pub fn current(&self) -> Option<ImageKey> {
        self.frames.front().copied()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[derive(Clone, Debug)]
pub enum SpriteKind {
    Static { image: ImageKey },
    Animated(Animation),
}

#[derive(Clone, Debug)]
pub struct Sprite {
    pub pos: DVec2,
    pub kind: SpriteKind,
    /// Height relative to a wall at the same distance
    pub scale: f64,
    /// Pushes the sprite down by this fraction of its projected height
    pub height_shift: f64,
    /// Source image width / height, taken from the first frame
    pub image_ratio: f64,
    /// Half the source image width in pixels, used as the off-screen margin
    pub image_half_width: f64,
}

impl Sprite {
    pub fn new_static(pos: DVec2, image: ImageKey, image_size: (u32, u32)) -> Self {
        Self::with_kind(pos, SpriteKind::Static { image }, image_size, STATIC_SCALE, STATIC_SHIFT)
    }

    pub fn new_animated(pos: DVec2, animation: Animation, image_size: (u32, u32)) -> Self {
        Self::with_kind(
            pos,
            SpriteKind::Animated(animation),
            image_size,
            ANIMATED_SCALE,
            ANIMATED_SHIFT,
        )
    }

    pub fn with_kind(
        pos: DVec2,
        kind: SpriteKind,
        (w, h): (u32, u32),
        scale: f64,
        height_shift: f64,
    ) -> Self {
        let (w, h) = (w.max(1) as f64, h.max(1) as f64);
        Self {
            pos,
            kind,
            scale,
            height_shift,
            image_ratio: w / h,
            image_half_width: (w / 2.0).floor(),
        }
    }

    pub fn with_scale(mut self, scale: f64, height_shift: f64) -> Self {
        self.scale = scale;
        self.height_shift = height_shift;
        self
    }

    /// Advance the animation cursor, if any.
    pub fn animate(&mut self, now: Duration) -> bool {
        match &mut self.kind {
            SpriteKind::Static { .. } => false,
            SpriteKind::Animated(anim) => anim.tick(now),
        }
    }

    /// Frame to draw right now.
    pub fn image(&self) -> Option<ImageKey> {
        match &self.kind {
            SpriteKind::Static { image } => Some(*image),
            SpriteKind::Animated(anim) => anim.current(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: u32) -> Vec<ImageKey> {
        (0..n).map(ImageKey::Sprite).collect()
    }

    #[test]
    fn animation_advances_once_per_interval() {
        let mut anim = Animation::new(frames(3), Duration::from_millis(100), Duration::ZERO);
        let mut advanced = 0;
        for step in 1..=5 {
            if anim.tick(Duration::from_millis(50 * step)) {
                advanced += 1;
            }
        }
        assert_eq!(advanced, 2);
        assert_eq!(anim.current(), Some(ImageKey::Sprite(2)));
    }

    #[test]
    fn animation_wraps_around() {
        let mut anim = Animation::new(frames(3), Duration::from_millis(100), Duration::ZERO);
        for step in 1..=3 {
            anim.tick(Duration::from_millis(100 * step));
        }
        assert_eq!(anim.current(), Some(ImageKey::Sprite(0)));
    }

    #[test]
    fn static_sprite_never_animates() {
        let mut s = Sprite::new_static(DVec2::new(1.0, 1.0), ImageKey::Sprite(4), (64, 128));
        assert!(!s.animate(Duration::from_secs(10)));
        assert_eq!(s.image(), Some(ImageKey::Sprite(4)));
        assert_eq!(s.image_ratio, 0.5);
        assert_eq!(s.image_half_width, 32.0);
        assert_eq!(s.scale, STATIC_SCALE);
    }

    #[test]
    fn empty_animation_has_no_frame() {
        let mut anim = Animation::new(Vec::new(), Duration::from_millis(10), Duration::ZERO);
        assert!(anim.tick(Duration::from_millis(20)));
        assert_eq!(anim.current(), None);
    }
}
