//! Mapping from viewport pointer coordinates to surface-local coordinates.

/// A position in surface-local space, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Nearest pixel cell, for stamping into the paint buffer.
    pub fn to_pixel(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// Where the drawing surface sits in the host viewport, as reported by the
/// host on mount and on every layout change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundsRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Translates a viewport position into surface-local space.
    pub fn to_local(&self, client_x: f32, client_y: f32) -> Point {
        Point::new(client_x - self.left, client_y - self.top)
    }

    /// Backing-buffer dimensions for this rect. Degenerate rects still get a
    /// one-pixel buffer so painting never divides by zero.
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = self.width.round().max(1.0) as u32;
        let h = self.height.round().max(1.0) as u32;
        (w, h)
    }
}

/// One contact point of a touch event, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// A pointer event as delivered by the host. Touch events carry the full
/// contact list; only the first contact drives the brush.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Mouse { client_x: f32, client_y: f32 },
    Touch { touches: Vec<TouchPoint> },
}

impl PointerInput {
    pub const fn mouse(client_x: f32, client_y: f32) -> Self {
        Self::Mouse { client_x, client_y }
    }

    pub fn touch(touches: Vec<TouchPoint>) -> Self {
        Self::Touch { touches }
    }
}

/// Maps a pointer event to surface-local coordinates. Returns `None` when no
/// surface rect is known yet or when a touch event arrives with an empty
/// contact list.
pub fn surface_point(input: &PointerInput, rect: Option<&BoundsRect>) -> Option<Point> {
    let rect = rect?;
    match input {
        PointerInput::Mouse { client_x, client_y } => Some(rect.to_local(*client_x, *client_y)),
        PointerInput::Touch { touches } => {
            let first = touches.first()?;
            Some(rect.to_local(first.client_x, first.client_y))
        }
    }
}
