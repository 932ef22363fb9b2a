/// A point of the cube outline, in logical (pixel-like) coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    pub const fn new(x: i32, y: i32) -> Self {
        Vertex { x, y }
    }

    /// Returns this vertex shifted by (dx, dy)
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Vertex {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}
