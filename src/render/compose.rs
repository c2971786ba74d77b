//! The per-frame draw list shared by walls and sprites.
//!
//! There is no depth buffer: entries are painted farthest first, so the sort
//! below is the only thing deciding what ends up on top.

use crate::render::textures::{ImageKey, SourceRect};

/// Which image, and which part of it, to paint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Drawable {
    pub image: ImageKey,
    pub src: SourceRect,
}

/// One wall strip or sprite, placed on screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProjectedDrawable {
    /// Perpendicular distance from the viewer
    pub depth: f64,
    pub drawable: Drawable,
    /// Top-left corner, pixels
    pub pos: (f32, f32),
    /// Destination size, pixels
    pub size: (f32, f32),
}

/// Merged, far-to-near list for one frame.
#[derive(Default)]
pub struct RenderList {
    items: Vec<ProjectedDrawable>,
}

impl RenderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with `walls` followed by `sprites`, then sort far to
    /// near. The sort is stable, so equal depths keep that insertion order.
    pub fn compose(&mut self, walls: &[ProjectedDrawable], sprites: &[ProjectedDrawable]) {
        self.items.clear();
        self.items.reserve(walls.len() + sprites.len());
        self.items.extend_from_slice(walls);
        self.items.extend_from_slice(sprites);
        sort_far_to_near(&mut self.items);
    }

    pub fn items(&self) -> &[ProjectedDrawable] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Stable descending sort on depth; NaN sorts as farther than everything.
pub fn sort_far_to_near(items: &mut [ProjectedDrawable]) {
    items.sort_by(|a, b| b.depth.total_cmp(&a.depth));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(depth: f64, tag: u32) -> ProjectedDrawable {
        ProjectedDrawable {
            depth,
            drawable: Drawable { image: ImageKey::Sprite(tag), src: SourceRect::default() },
            pos: (0.0, 0.0),
            size: (1.0, 1.0),
        }
    }

    fn tags(list: &RenderList) -> Vec<ImageKey> {
        list.items().iter().map(|p| p.drawable.image).collect()
    }

    #[test]
    fn farther_entry_is_drawn_first_regardless_of_insertion() {
        let mut list = RenderList::new();
        list.compose(&[entry(2.0, 0)], &[entry(5.0, 1)]);
        assert_eq!(tags(&list), vec![ImageKey::Sprite(1), ImageKey::Sprite(0)]);

        list.compose(&[entry(5.0, 1)], &[entry(2.0, 0)]);
        assert_eq!(tags(&list), vec![ImageKey::Sprite(1), ImageKey::Sprite(0)]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut list = RenderList::new();
        list.compose(&[entry(3.0, 0), entry(3.0, 1)], &[entry(3.0, 2), entry(4.0, 3)]);
        let expected: Vec<ImageKey> = [3, 0, 1, 2].into_iter().map(ImageKey::Sprite).collect();
        assert_eq!(tags(&list), expected);
    }

    #[test]
    fn compose_replaces_the_previous_frame() {
        let mut list = RenderList::new();
        list.compose(&[entry(1.0, 0), entry(2.0, 1)], &[]);
        list.compose(&[entry(1.0, 7)], &[]);
        assert_eq!(list.len(), 1);
        list.clear();
        assert!(list.is_empty());
    }
}
