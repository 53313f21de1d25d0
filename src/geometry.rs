/// Axis-aligned box, `[left, right] × [top, bottom]`, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Aabb {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_center(cx: f64, cy: f64, half_w: f64, half_h: f64) -> Self {
        Self::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}
