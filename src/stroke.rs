use crate::geometry::Point;
use crate::model::Color;
use crate::paint;
use crate::surface::Surface;

/// Recorder state. Colour and width are latched when the stroke begins, so
/// picker changes mid-stroke never affect ink already committed to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeState {
    Idle,
    Active { color: Color, width: u32, last: Point },
}

/// What ending a stroke amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeEnd {
    /// An active stroke finished; the caller owes a history capture.
    Committed,
    /// There was nothing in flight.
    Ignored,
}

/// Turns begin/extend/end pointer gestures into paint on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeRecorder {
    state: StrokeState,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self { state: StrokeState::Idle }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, StrokeState::Active { .. })
    }

    /// Starts a stroke and stamps a dot at its origin, so a tap without
    /// movement still leaves a mark. A second begin while a stroke is in
    /// flight is ignored.
    pub fn begin(&mut self, surface: &mut Surface, point: Point, color: Color, width: u32) {
        if self.is_active() {
            tracing::debug!("stroke begin ignored, another stroke is active");
            return;
        }
        paint::draw_dot(surface, point.to_pixel(), color, width);
        self.state = StrokeState::Active { color, width, last: point };
    }

    /// Extends the active stroke to `point`. A benign no-op while idle,
    /// which is what stray move events after pointer-up become.
    pub fn extend(&mut self, surface: &mut Surface, point: Point) {
        let StrokeState::Active { color, width, last } = self.state else {
            return;
        };
        paint::draw_segment(surface, last.to_pixel(), point.to_pixel(), color, width);
        self.state = StrokeState::Active { color, width, last: point };
    }

    /// Ends the active stroke, reporting whether anything was committed.
    pub fn end(&mut self) -> StrokeEnd {
        match self.state {
            StrokeState::Idle => StrokeEnd::Ignored,
            StrokeState::Active { .. } => {
                self.state = StrokeState::Idle;
                StrokeEnd::Committed
            }
        }
    }
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new()
    }
}
