use std::str::FromStr;

/// Pixel coordinates relative to the displayed image's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl FromStr for Point {
    type Err = String;

    /// Parses `"X,Y"` pairs as passed on the command line.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y coordinates, got '{s}'"))?;
        let x = x
            .trim()
            .parse()
            .map_err(|e| format!("invalid x coordinate '{x}': {e}"))?;
        let y = y
            .trim()
            .parse()
            .map_err(|e| format!("invalid y coordinate '{y}': {e}"))?;
        Ok(Point { x, y })
    }
}

/// An anchor point plus signed extents. While a drag is in progress the
/// extents follow the pointer, so `width`/`height` may be negative when the
/// pointer is left of or above the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SelectionRect {
    pub fn from_anchor(anchor: Point) -> Self {
        Self {
            x: anchor.x,
            y: anchor.y,
            width: 0.0,
            height: 0.0,
        }
    }

    /// The axis-aligned box spanned by the anchor and the drag endpoint:
    /// `(left, top, width, height)` with non-negative dimensions.
    pub fn normalized(&self) -> (f32, f32, f32, f32) {
        let left = self.x.min(self.x + self.width);
        let top = self.y.min(self.y + self.height);
        (left, top, self.width.abs(), self.height.abs())
    }
}

/// Whether a selection looks like column-like (vertical) or row-like
/// (horizontal) text. Derived from the finalized rectangle, never set
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Classify a rectangle by aspect ratio: vertical when
    /// `|height / width|` exceeds `ratio`. A zero-width rectangle is
    /// horizontal by convention; the division is never evaluated for it.
    pub fn classify(rect: &SelectionRect, ratio: f32) -> Self {
        if rect.width == 0.0 {
            return Orientation::Horizontal;
        }
        if (rect.height / rect.width).abs() > ratio {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

/// A finalized drag: the rectangle as drawn plus its derived orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub rect: SelectionRect,
    pub orientation: Orientation,
}

#[derive(Debug)]
enum DragState {
    Idle,
    Dragging(SelectionRect),
}

/// State machine over a drag gesture. A rectangle is only emitted by the
/// drag-end transition; moves update the in-progress extents and keep the
/// anchor fixed.
#[derive(Debug)]
pub struct DragTracker {
    state: DragState,
    orientation_ratio: f32,
}

impl DragTracker {
    pub fn new(orientation_ratio: f32) -> Self {
        Self {
            state: DragState::Idle,
            orientation_ratio,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// The rectangle currently being drawn, for UI layers that mirror it.
    pub fn current_rect(&self) -> Option<SelectionRect> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging(rect) => Some(rect),
        }
    }

    /// Begin a drag at `anchor`. Starting a new drag discards any previous
    /// in-progress rectangle.
    pub fn on_drag_start(&mut self, anchor: Point) {
        self.state = DragState::Dragging(SelectionRect::from_anchor(anchor));
    }

    /// Update the signed extents to follow the pointer. Ignored while idle.
    pub fn on_drag_move(&mut self, pointer: Point) {
        if let DragState::Dragging(rect) = &mut self.state {
            rect.width = pointer.x - rect.x;
            rect.height = pointer.y - rect.y;
        }
    }

    /// Finalize the gesture. Returns the rectangle and its orientation, or
    /// `None` when no drag was in progress. A click without movement still
    /// emits a degenerate rectangle; rejecting it is the rasterizer's job.
    pub fn on_drag_end(&mut self) -> Option<Selection> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => None,
            DragState::Dragging(rect) => Some(Selection {
                orientation: Orientation::classify(&rect, self.orientation_ratio),
                rect,
            }),
        }
    }
}
