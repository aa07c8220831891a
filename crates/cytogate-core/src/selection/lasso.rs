use crate::consts::MIN_LASSO_VERTICES;
use crate::geom::ScreenPoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LassoState {
    Idle,
    Drawing,
    Panning { last: ScreenPoint },
}

/// Closed screen-space polygon; the last vertex repeats the first.
#[derive(Clone, Debug, PartialEq)]
pub struct LassoPath {
    points: Vec<ScreenPoint>,
}

impl LassoPath {
    fn close(mut points: Vec<ScreenPoint>) -> Self {
        if let Some(&first) = points.first() {
            points.push(first);
        }
        Self { points }
    }

    pub fn points(&self) -> &[ScreenPoint] {
        &self.points
    }

    /// Distinct vertices, without the closing repeat.
    pub fn vertices(&self) -> &[ScreenPoint] {
        &self.points[..self.points.len().saturating_sub(1)]
    }
}

/// What a pointer event did to the gesture, for the session to act on.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureEvent {
    None,
    Started,
    Extended,
    PanBy(ScreenPoint),
    PanEnded,
    Completed(LassoPath),
    Discarded,
}

/// Pointer state machine: primary drag draws a lasso, secondary or middle
/// drag pans. The two never overlap.
#[derive(Debug)]
pub struct LassoCapture {
    state: LassoState,
    path: Vec<ScreenPoint>,
    outline: Option<LassoPath>,
}

impl Default for LassoCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl LassoCapture {
    pub fn new() -> Self {
        Self {
            state: LassoState::Idle,
            path: Vec::new(),
            outline: None,
        }
    }

    pub fn state(&self) -> LassoState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == LassoState::Drawing
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, LassoState::Panning { .. })
    }

    /// A press while another gesture is active is ignored.
    pub fn press(&mut self, button: PointerButton, pos: ScreenPoint) -> GestureEvent {
        if self.state != LassoState::Idle {
            return GestureEvent::None;
        }
        self.outline = None;
        match button {
            PointerButton::Primary => {
                self.path.clear();
                self.path.push(pos);
                self.state = LassoState::Drawing;
            }
            PointerButton::Secondary | PointerButton::Middle => {
                self.state = LassoState::Panning { last: pos };
            }
        }
        GestureEvent::Started
    }

    pub fn move_to(&mut self, pos: ScreenPoint) -> GestureEvent {
        match self.state {
            LassoState::Idle => GestureEvent::None,
            LassoState::Drawing => {
                self.path.push(pos);
                GestureEvent::Extended
            }
            LassoState::Panning { last } => {
                self.state = LassoState::Panning { last: pos };
                GestureEvent::PanBy(pos - last)
            }
        }
    }

    pub fn release(&mut self, button: PointerButton) -> GestureEvent {
        match (self.state, button) {
            (LassoState::Drawing, PointerButton::Primary) => {
                self.state = LassoState::Idle;
                let points = std::mem::take(&mut self.path);
                if points.len() < MIN_LASSO_VERTICES {
                    return GestureEvent::Discarded;
                }
                let path = LassoPath::close(points);
                self.outline = Some(path.clone());
                GestureEvent::Completed(path)
            }
            (LassoState::Panning { .. }, PointerButton::Secondary | PointerButton::Middle) => {
                self.state = LassoState::Idle;
                GestureEvent::PanEnded
            }
            _ => GestureEvent::None,
        }
    }

    /// Abort any gesture and drop the outline.
    pub fn cancel(&mut self) {
        self.state = LassoState::Idle;
        self.path.clear();
        self.outline = None;
    }

    pub fn clear_outline(&mut self) {
        self.outline = None;
    }

    /// Path to draw this frame: the stroke in progress (open) or the last
    /// completed lasso (closed).
    pub fn visible_path(&self) -> Option<(&[ScreenPoint], bool)> {
        if self.is_drawing() && !self.path.is_empty() {
            Some((self.path.as_slice(), false))
        } else {
            self.outline.as_ref().map(|p| (p.points(), true))
        }
    }
}
