//! Axis-aligned rectangle overlap
//!
//! The only collision primitive the game needs: notes and the paddle are
//! both axis-aligned boxes, and any overlap counts as a full catch.

/// An axis-aligned rectangle, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Overlap test with both boxes treated as half-open intervals:
    /// rectangles that merely share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_note_and_paddle() {
        let note = Rect::new(100.0, 100.0, 80.0, 80.0);
        let paddle = Rect::new(90.0, 90.0, 150.0, 250.0);
        assert!(note.overlaps(&paddle));
        assert!(paddle.overlaps(&note));
    }

    #[test]
    fn separated_note_and_paddle() {
        let note = Rect::new(300.0, 100.0, 80.0, 80.0);
        let paddle = Rect::new(90.0, 90.0, 150.0, 250.0);
        assert!(!note.overlaps(&paddle));
        assert!(!paddle.overlaps(&note));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn containment_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 10.0, 10.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }
}
