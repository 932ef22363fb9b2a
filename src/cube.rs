use crate::math::{bounding_box, distance, Rect};
use crate::vertex::Vertex;
use crossterm::style::Color;

pub const DEFAULT_SIDE_LENGTH: i32 = 100;
pub const DEFAULT_OFFSET_SCALE: f64 = 0.33;
pub const DEFAULT_SPEED: i32 = 1;
pub const DEFAULT_COLOR: Color = Color::Black;
pub const DEFAULT_STROKE_WIDTH: u16 = 2;

/// Number of points in the cube outline
pub const OUTLINE_LEN: usize = 16;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("vertex index {index} out of range (outline has {len} points)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Direction a velocity component can be pointed toward
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Line attributes used when drawing the outline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stroke {
    pub color: Color,
    pub width: u16,
}

/// A wireframe cube drawn as a single closed 2D path.
///
/// The outline is built once from a fixed template and afterwards only ever
/// translated as a whole, so its size and skew never change.
#[derive(Clone, Debug)]
pub struct Cube {
    side_length: i32,
    offset: i32,
    outline: [Vertex; OUTLINE_LEN],
    velocity: [i32; 2],
    stroke: Stroke,
}

impl Default for Cube {
    fn default() -> Self {
        Cube::new(
            DEFAULT_SIDE_LENGTH,
            DEFAULT_OFFSET_SCALE,
            DEFAULT_SPEED,
            Vertex::default(),
        )
    }
}

impl Cube {
    /// Creates a cube whose outline's local origin sits at `position`.
    ///
    /// The depth offset is `side_length * offset_scale` truncated toward zero.
    /// The cube starts out moving up and to the left at `speed` per axis.
    pub fn new(side_length: i32, offset_scale: f64, speed: i32, position: Vertex) -> Self {
        let s = side_length;
        let o = (f64::from(side_length) * offset_scale) as i32;

        let outline = [
            Vertex::new(o, 0),
            Vertex::new(o + s, 0),
            Vertex::new(s, o),
            Vertex::new(0, o),
            Vertex::new(o, 0),
            Vertex::new(o, s),
            Vertex::new(o + s, s),
            Vertex::new(s, o + s),
            Vertex::new(0, o + s),
            Vertex::new(o, s),
            Vertex::new(o + s, s),
            Vertex::new(o + s, 0),
            Vertex::new(s, o),
            Vertex::new(s, o + s),
            Vertex::new(0, o + s),
            Vertex::new(0, o),
        ]
        .map(|v| v.offset(position.x, position.y));

        let speed = speed.saturating_abs();
        Cube {
            side_length,
            offset: o,
            outline,
            velocity: [-speed, -speed],
            stroke: Stroke {
                color: DEFAULT_COLOR,
                width: DEFAULT_STROKE_WIDTH,
            },
        }
    }

    pub fn side_length(&self) -> i32 {
        self.side_length
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Current per-tick step as (dx, dy)
    pub fn velocity(&self) -> [i32; 2] {
        self.velocity
    }

    pub fn stroke(&self) -> Stroke {
        self.stroke
    }

    /// The outline points in drawing order
    pub fn points(&self) -> &[Vertex; OUTLINE_LEN] {
        &self.outline
    }

    pub fn bounding_box(&self) -> Rect {
        bounding_box(&self.outline)
    }

    pub fn point_at(&self, index: usize) -> Result<Vertex, ShapeError> {
        self.outline
            .get(index)
            .copied()
            .ok_or(ShapeError::IndexOutOfRange {
                index,
                len: OUTLINE_LEN,
            })
    }

    /// Index of the outline point closest to `target`.
    ///
    /// Points at equal distance resolve to the lowest index.
    pub fn nearest_point_index(&self, target: Vertex) -> usize {
        let mut min_index = 0;
        let mut min_length = distance(target, self.outline[0]);

        for (index, &point) in self.outline.iter().enumerate().skip(1) {
            let length = distance(target, point);
            if length < min_length {
                min_length = length;
                min_index = index;
            }
        }

        min_index
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        for point in self.outline.iter_mut() {
            *point = point.offset(dx, dy);
        }
    }

    /// Moves the cube horizontally so its bounding box starts at `x`
    pub fn set_left_edge(&mut self, x: i32) {
        let current = self.bounding_box().x;
        self.translate(x - current, 0);
    }

    /// Moves the cube vertically so its bounding box starts at `y`
    pub fn set_top_edge(&mut self, y: i32) {
        let current = self.bounding_box().y;
        self.translate(0, y - current);
    }

    /// Points one velocity component toward `direction`, keeping its magnitude
    pub fn flip_toward(&mut self, direction: Direction) {
        let [dx, dy] = &mut self.velocity;
        match direction {
            Direction::Left => *dx = -dx.abs(),
            Direction::Right => *dx = dx.abs(),
            Direction::Up => *dy = -dy.abs(),
            Direction::Down => *dy = dy.abs(),
        }
    }

    /// Advances the cube by one velocity step
    pub fn step(&mut self) {
        let [dx, dy] = self.velocity;
        self.translate(dx, dy);
    }
}
