use crate::vertex::Vertex;

/// Axis-aligned rectangle, origin at the top-left corner
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Length of the hypotenuse of a right triangle with the given legs
pub fn hypotenuse(base: i32, height: i32) -> f64 {
    let base = f64::from(base);
    let height = f64::from(height);
    (base * base + height * height).sqrt()
}

/// Euclidean distance between two vertices
pub fn distance(a: Vertex, b: Vertex) -> f64 {
    hypotenuse(a.x - b.x, a.y - b.y)
}

/// Smallest rectangle containing every point.
///
/// An empty slice yields a zero-sized rectangle at the origin.
pub fn bounding_box(points: &[Vertex]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::default();
    };

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for point in &points[1..] {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}
