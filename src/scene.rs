use crate::cube::{Cube, Direction, ShapeError, Stroke, OUTLINE_LEN};
use crate::vertex::Vertex;
use tracing::{debug, info};

/// Segment from the drag anchor vertex to the pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuideLine {
    pub from: Vertex,
    pub to: Vertex,
}

/// Everything a renderer needs to draw one frame
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSnapshot {
    pub outline: [Vertex; OUTLINE_LEN],
    pub guide_line: Option<GuideLine>,
    pub stroke: Stroke,
}

/// Owns the cube and applies timer ticks and pointer input to it
#[derive(Debug)]
pub struct Scene {
    cube: Cube,
    width: i32,
    height: i32,
    /// Vertex picked by the last pointer press
    anchor: usize,
    /// Pointer position while dragging
    target: Vertex,
    dragging: bool,
    bounce_enabled: bool,
    translate_enabled: bool,
}

impl Scene {
    /// Wraps `cube` with bouncing on and translation off
    pub fn new(cube: Cube) -> Self {
        Scene {
            cube,
            width: 0,
            height: 0,
            anchor: 0,
            target: Vertex::default(),
            dragging: false,
            bounce_enabled: true,
            translate_enabled: false,
        }
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn viewport(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn bounce_enabled(&self) -> bool {
        self.bounce_enabled
    }

    pub fn translate_enabled(&self) -> bool {
        self.translate_enabled
    }

    pub fn set_viewport(&mut self, width: i32, height: i32) {
        if (width, height) != (self.width, self.height) {
            debug!(width, height, "viewport resized");
        }
        self.width = width;
        self.height = height;
    }

    pub fn set_mode(&mut self, bounce_enabled: bool, translate_enabled: bool) {
        info!(bounce_enabled, translate_enabled, "mode changed");
        self.bounce_enabled = bounce_enabled;
        self.translate_enabled = translate_enabled;
    }

    /// Swaps in a fresh cube and forgets any drag in progress
    pub fn reset(&mut self, cube: Cube) {
        self.cube = cube;
        self.anchor = 0;
        self.dragging = false;
        self.enforce_bounds();
    }

    /// Abandons a drag in progress without moving the cube
    pub fn cancel_drag(&mut self) {
        self.dragging = false;
    }

    /// Processes a single timer tick
    pub fn tick(&mut self) {
        if !self.bounce_enabled {
            return;
        }
        self.enforce_bounds();
        self.cube.step();
    }

    /// Reflects the cube off any viewport edge it touches.
    ///
    /// Touching an edge only turns the cube around; the cube is pulled back
    /// onto the edge when it has strictly crossed it.
    pub fn enforce_bounds(&mut self) {
        let rect = self.cube.bounding_box();

        if rect.x <= 0 {
            debug!(x = rect.x, "bounced off left edge");
            self.cube.flip_toward(Direction::Right);
            if rect.x < 0 {
                self.cube.set_left_edge(0);
            }
        } else if rect.right() >= self.width {
            debug!(x = rect.x, "bounced off right edge");
            self.cube.flip_toward(Direction::Left);
            if rect.right() > self.width {
                self.cube.set_left_edge(self.width - rect.width);
            }
        }

        if rect.y <= 0 {
            debug!(y = rect.y, "bounced off top edge");
            self.cube.flip_toward(Direction::Down);
            if rect.y < 0 {
                self.cube.set_top_edge(0);
            }
        } else if rect.bottom() >= self.height {
            debug!(y = rect.y, "bounced off bottom edge");
            self.cube.flip_toward(Direction::Up);
            if rect.bottom() > self.height {
                self.cube.set_top_edge(self.height - rect.height);
            }
        }
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) {
        if !self.translate_enabled {
            return;
        }
        self.target = Vertex::new(x, y);
        self.anchor = self.cube.nearest_point_index(self.target);
        self.dragging = true;
        debug!(anchor = self.anchor, x, y, "drag started");
    }

    pub fn pointer_drag(&mut self, x: i32, y: i32) {
        if !self.translate_enabled {
            return;
        }
        self.target = Vertex::new(x, y);
    }

    /// Drops the anchor vertex onto (x, y), moving the whole cube with it
    pub fn pointer_up(&mut self, x: i32, y: i32) -> Result<(), ShapeError> {
        if !self.translate_enabled {
            return Ok(());
        }
        let anchor = self.cube.point_at(self.anchor)?;
        let (dx, dy) = (x - anchor.x, y - anchor.y);
        self.cube.translate(dx, dy);
        info!(anchor = self.anchor, dx, dy, "cube translated");

        self.dragging = false;
        self.enforce_bounds();
        Ok(())
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let guide_line = if self.dragging && self.translate_enabled {
            self.cube.point_at(self.anchor).ok().map(|from| GuideLine {
                from,
                to: self.target,
            })
        } else {
            None
        };

        RenderSnapshot {
            outline: *self.cube.points(),
            guide_line,
            stroke: self.cube.stroke(),
        }
    }
}
